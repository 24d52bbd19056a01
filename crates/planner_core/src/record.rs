use serde::{Deserialize, Deserializer, Serialize};

use crate::attribute::BonusVector;
use crate::error::{CoreError, CoreErrorCode};

/// Flat, persisted form of a build.
///
/// Field names are the stored format and must not change: saved builds
/// look like `{"name":"Grok","Archetype":"Brute","Class":"Warrior",
/// "Background":"Noble","Accuracy":0,"Damage":3,"Speed":0,"Mastery":0}`.
/// Only spent points are stored; catalog bonuses are re-resolved from the
/// three selection names on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    #[serde(default, deserialize_with = "name_or_empty")]
    pub name: String,
    #[serde(rename = "Archetype", default, deserialize_with = "name_or_empty")]
    pub archetype: String,
    #[serde(rename = "Class", default, deserialize_with = "name_or_empty")]
    pub class: String,
    #[serde(rename = "Background", default, deserialize_with = "name_or_empty")]
    pub background: String,
    #[serde(rename = "Accuracy")]
    pub accuracy: i32,
    #[serde(rename = "Damage")]
    pub damage: i32,
    #[serde(rename = "Speed")]
    pub speed: i32,
    #[serde(rename = "Mastery")]
    pub mastery: i32,
}

impl BuildRecord {
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        serde_json::from_str(raw).map_err(|e| {
            CoreError::new(
                CoreErrorCode::CorruptRecord,
                format!("failed to parse build record: {e}"),
            )
        })
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string(self).map_err(|e| {
            CoreError::new(
                CoreErrorCode::CorruptRecord,
                format!("failed to serialize build record: {e}"),
            )
        })
    }

    pub fn spent_points(&self) -> BonusVector {
        BonusVector::new(self.accuracy, self.damage, self.speed, self.mastery)
    }
}

// Older saves write `null` for an unselected background.
fn name_or_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
