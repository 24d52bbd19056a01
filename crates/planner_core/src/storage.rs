use std::collections::BTreeMap;

use log::warn;

use crate::catalog::CatalogProvider;
use crate::error::{CoreError, CoreErrorCode};
use crate::record::BuildRecord;
use crate::state::BuildState;

/// Key prefix under which saved builds are stored, followed by the
/// character name.
pub const CHAR_PREFIX: &str = "char.";

/// Synchronous string key-value storage, such as browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError>;

    fn keys(&self) -> Result<Vec<String>, CoreError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, CoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

pub fn storage_key(character_name: &str) -> String {
    format!("{CHAR_PREFIX}{character_name}")
}

/// Writes `state` under `char.<name>`, replacing any build already saved
/// under that name. The state takes the new name only once the write
/// succeeds.
pub fn save_build<S, P>(
    store: &mut S,
    state: &mut BuildState<P>,
    character_name: &str,
) -> Result<(), CoreError>
where
    S: KeyValueStore + ?Sized,
    P: CatalogProvider,
{
    let record = BuildRecord {
        name: character_name.to_string(),
        ..state.serialize()
    };
    store.set(&storage_key(character_name), &record.to_json()?)?;
    state.set_character_name(character_name);
    Ok(())
}

/// Replaces `state` with the build saved as `character_name`. On error the
/// state is left as it was.
pub fn load_build<S, P>(
    store: &S,
    state: &mut BuildState<P>,
    character_name: &str,
) -> Result<(), CoreError>
where
    S: KeyValueStore + ?Sized,
    P: CatalogProvider,
{
    let key = storage_key(character_name);
    let Some(raw) = store.get(&key)? else {
        return Err(CoreError::new(
            CoreErrorCode::NotFound,
            format!("no saved character named '{character_name}'"),
        ));
    };

    BuildRecord::from_json(&raw)
        .and_then(|record| state.deserialize(&record))
        .inspect_err(|e| warn!("rejected saved build '{key}': {e}"))
}

/// Character names with a saved build, sorted.
pub fn saved_character_names<S>(store: &S) -> Result<Vec<String>, CoreError>
where
    S: KeyValueStore + ?Sized,
{
    let mut names: Vec<String> = store
        .keys()?
        .into_iter()
        .filter_map(|key| key.strip_prefix(CHAR_PREFIX).map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}
