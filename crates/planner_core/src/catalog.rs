use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use log::info;
use serde::Deserialize;
use serde::de::{self, Deserializer, MapAccess, Visitor};

use crate::attribute::{AttributeKind, BonusVector};
use crate::error::{CoreError, CoreErrorCode};

pub const ARCHETYPES_FILE: &str = "archetypes.json";
pub const CLASSES_FILE: &str = "classes.json";

/// Largest magnitude a single catalog bonus may have. Keeps every
/// attribute total well inside `i32`.
pub const MAX_CATALOG_BONUS: i32 = 1_000_000;

const BUNDLED_ARCHETYPES: &str = include_str!("../data/archetypes.json");
const BUNDLED_CLASSES: &str = include_str!("../data/classes.json");

/// Read-only lookups over archetype, class and background definitions.
///
/// Name listings are returned in a stable order. Lookups of unknown names
/// fail with [`CoreErrorCode::NotFound`].
pub trait CatalogProvider {
    fn archetype_names(&self) -> Vec<&str>;

    fn archetype_bonus(&self, name: &str) -> Result<BonusVector, CoreError>;

    fn class_names(&self) -> Vec<&str>;

    fn class_bonus(&self, name: &str) -> Result<BonusVector, CoreError>;

    /// Backgrounds valid for `class_name`.
    fn background_names(&self, class_name: &str) -> Result<Vec<&str>, CoreError>;

    fn background_bonus(
        &self,
        class_name: &str,
        background_name: &str,
    ) -> Result<BonusVector, CoreError>;
}

macro_rules! forward_catalog_provider {
    ($($wrapper:ty),*) => {
        $(
            impl<P: CatalogProvider + ?Sized> CatalogProvider for $wrapper {
                fn archetype_names(&self) -> Vec<&str> {
                    (**self).archetype_names()
                }

                fn archetype_bonus(&self, name: &str) -> Result<BonusVector, CoreError> {
                    (**self).archetype_bonus(name)
                }

                fn class_names(&self) -> Vec<&str> {
                    (**self).class_names()
                }

                fn class_bonus(&self, name: &str) -> Result<BonusVector, CoreError> {
                    (**self).class_bonus(name)
                }

                fn background_names(&self, class_name: &str) -> Result<Vec<&str>, CoreError> {
                    (**self).background_names(class_name)
                }

                fn background_bonus(
                    &self,
                    class_name: &str,
                    background_name: &str,
                ) -> Result<BonusVector, CoreError> {
                    (**self).background_bonus(class_name, background_name)
                }
            }
        )*
    };
}

forward_catalog_provider!(&P, Rc<P>, Arc<P>);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassEntry {
    bonus: BonusVector,
    backgrounds: BTreeMap<String, BonusVector>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    archetypes: BTreeMap<String, BonusVector>,
    classes: BTreeMap<String, ClassEntry>,
}

impl Catalog {
    /// The definitions shipped with the crate.
    pub fn bundled() -> Result<Self, CoreError> {
        Self::from_json_strs(BUNDLED_ARCHETYPES, BUNDLED_CLASSES)
    }

    /// Loads `archetypes.json` and `classes.json` from `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<Self, CoreError> {
        let archetypes = read_definition(&dir.join(ARCHETYPES_FILE))?;
        let classes = read_definition(&dir.join(CLASSES_FILE))?;
        Self::from_json_strs(&archetypes, &classes)
    }

    pub fn from_json_strs(archetypes_json: &str, classes_json: &str) -> Result<Self, CoreError> {
        let raw_archetypes: UniqueMap<RawBonus> =
            serde_json::from_str(archetypes_json).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::CatalogLoad,
                    format!("failed to parse {ARCHETYPES_FILE}: {e}"),
                )
            })?;
        let raw_classes: UniqueMap<RawClass> =
            serde_json::from_str(classes_json).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::CatalogLoad,
                    format!("failed to parse {CLASSES_FILE}: {e}"),
                )
            })?;

        let mut archetypes = BTreeMap::new();
        for (name, raw) in raw_archetypes.0 {
            require_name(&name, "archetype")?;
            let bonus = raw.into_bonus(&name)?;
            archetypes.insert(name, bonus);
        }

        let mut classes = BTreeMap::new();
        for (class_name, raw) in raw_classes.0 {
            require_name(&class_name, "class")?;
            let mut backgrounds = BTreeMap::new();
            for (background_name, raw_background) in raw.backgrounds.0 {
                require_name(&background_name, "background")?;
                let bonus = raw_background.into_bonus(&background_name)?;
                backgrounds.insert(background_name, bonus);
            }
            let entry = ClassEntry {
                bonus: raw.attributes.into_bonus(&class_name)?,
                backgrounds,
            };
            classes.insert(class_name, entry);
        }

        info!(
            "loaded catalog with {} archetypes and {} classes",
            archetypes.len(),
            classes.len()
        );

        Ok(Self {
            archetypes,
            classes,
        })
    }

    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty() && self.classes.is_empty()
    }

    fn class_entry(&self, name: &str) -> Result<&ClassEntry, CoreError> {
        self.classes
            .get(name)
            .ok_or_else(|| CoreError::not_found("class", name))
    }
}

impl CatalogProvider for Catalog {
    fn archetype_names(&self) -> Vec<&str> {
        self.archetypes.keys().map(String::as_str).collect()
    }

    fn archetype_bonus(&self, name: &str) -> Result<BonusVector, CoreError> {
        self.archetypes
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::not_found("archetype", name))
    }

    fn class_names(&self) -> Vec<&str> {
        self.classes.keys().map(String::as_str).collect()
    }

    fn class_bonus(&self, name: &str) -> Result<BonusVector, CoreError> {
        self.class_entry(name).map(|entry| entry.bonus.clone())
    }

    fn background_names(&self, class_name: &str) -> Result<Vec<&str>, CoreError> {
        let entry = self.class_entry(class_name)?;
        Ok(entry.backgrounds.keys().map(String::as_str).collect())
    }

    fn background_bonus(
        &self,
        class_name: &str,
        background_name: &str,
    ) -> Result<BonusVector, CoreError> {
        let entry = self.class_entry(class_name)?;
        entry
            .backgrounds
            .get(background_name)
            .cloned()
            .ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::NotFound,
                    format!("class '{class_name}' has no background '{background_name}'"),
                )
            })
    }
}

fn read_definition(path: &Path) -> Result<String, CoreError> {
    fs::read_to_string(path).map_err(|e| {
        CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("failed to read {}: {e}", path.display()),
        )
    })
}

fn require_name(name: &str, kind: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::new(
            CoreErrorCode::CatalogLoad,
            format!("{kind} names must not be blank"),
        ));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawBonus {
    #[serde(rename = "Accuracy")]
    accuracy: i32,
    #[serde(rename = "Damage")]
    damage: i32,
    #[serde(rename = "Speed")]
    speed: i32,
    #[serde(rename = "Mastery")]
    mastery: i32,
}

impl RawBonus {
    fn into_bonus(self, source: &str) -> Result<BonusVector, CoreError> {
        let bonus = BonusVector::new(self.accuracy, self.damage, self.speed, self.mastery);
        if let Some(attr) = AttributeKind::ALL
            .into_iter()
            .find(|&attr| !(-MAX_CATALOG_BONUS..=MAX_CATALOG_BONUS).contains(&bonus[attr]))
        {
            return Err(CoreError::new(
                CoreErrorCode::CatalogLoad,
                format!(
                    "{source} {attr} bonus {} is outside -{MAX_CATALOG_BONUS}..={MAX_CATALOG_BONUS}",
                    bonus[attr]
                ),
            ));
        }
        Ok(bonus.tagged(source))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawClass {
    attributes: RawBonus,
    backgrounds: UniqueMap<RawBonus>,
}

/// A JSON object whose keys must not repeat.
#[derive(Debug)]
struct UniqueMap<T>(BTreeMap<String, T>);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for UniqueMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(UniqueMapVisitor(PhantomData))
    }
}

struct UniqueMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for UniqueMapVisitor<T> {
    type Value = UniqueMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object keyed by unique names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some(name) = access.next_key::<String>()? {
            if entries.contains_key(&name) {
                return Err(de::Error::custom(format!("duplicate name '{name}'")));
            }
            let value = access.next_value::<T>()?;
            entries.insert(name, value);
        }
        Ok(UniqueMap(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, CatalogProvider};
    use crate::error::CoreErrorCode;

    const ARCHETYPES: &str = r#"{
        "Brute": { "Accuracy": 0, "Damage": 2, "Speed": 0, "Mastery": 0 },
        "Agile": { "Accuracy": 1, "Damage": 0, "Speed": 1, "Mastery": 0 }
    }"#;

    const CLASSES: &str = r#"{
        "Warrior": {
            "attributes": { "Accuracy": 1, "Damage": 0, "Speed": 0, "Mastery": 0 },
            "backgrounds": {
                "Noble": { "Accuracy": 0, "Damage": 0, "Speed": 1, "Mastery": 0 }
            }
        }
    }"#;

    #[test]
    fn names_are_listed_in_sorted_order() {
        let catalog = Catalog::from_json_strs(ARCHETYPES, CLASSES).expect("catalog should load");
        assert_eq!(catalog.archetype_names(), vec!["Agile", "Brute"]);
        assert_eq!(catalog.class_names(), vec!["Warrior"]);
        assert_eq!(
            catalog
                .background_names("Warrior")
                .expect("warrior should exist"),
            vec!["Noble"]
        );
    }

    #[test]
    fn bonuses_are_tagged_with_their_source_name() {
        let catalog = Catalog::from_json_strs(ARCHETYPES, CLASSES).expect("catalog should load");
        let brute = catalog.archetype_bonus("Brute").expect("brute should exist");
        assert_eq!(brute.source(), Some("Brute"));
        let noble = catalog
            .background_bonus("Warrior", "Noble")
            .expect("noble should exist");
        assert_eq!(noble.source(), Some("Noble"));
    }

    #[test]
    fn duplicate_background_names_are_rejected() {
        let classes = r#"{
            "Warrior": {
                "attributes": { "Accuracy": 1, "Damage": 0, "Speed": 0, "Mastery": 0 },
                "backgrounds": {
                    "Noble": { "Accuracy": 0, "Damage": 0, "Speed": 1, "Mastery": 0 },
                    "Noble": { "Accuracy": 0, "Damage": 1, "Speed": 0, "Mastery": 0 }
                }
            }
        }"#;
        let err = Catalog::from_json_strs(ARCHETYPES, classes)
            .expect_err("duplicate background should fail");
        assert_eq!(err.code, CoreErrorCode::CatalogLoad);
        assert!(err.message.contains("duplicate name 'Noble'"));
    }

    #[test]
    fn blank_names_are_rejected() {
        let archetypes = r#"{ " ": { "Accuracy": 0, "Damage": 0, "Speed": 0, "Mastery": 0 } }"#;
        let err =
            Catalog::from_json_strs(archetypes, CLASSES).expect_err("blank name should fail");
        assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    }

    #[test]
    fn bundled_catalog_loads() {
        let catalog = Catalog::bundled().expect("bundled catalog should load");
        assert!(catalog.archetype_count() > 0);
        assert!(catalog.class_count() > 0);
        for class_name in catalog.class_names() {
            let backgrounds = catalog
                .background_names(class_name)
                .expect("listed class should resolve");
            assert!(!backgrounds.is_empty(), "{class_name} has no backgrounds");
        }
    }
}
