use std::fmt;
use std::ops::Index;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKind {
    Accuracy,
    Damage,
    Speed,
    Mastery,
}

impl AttributeKind {
    /// Every attribute in sheet order.
    pub const ALL: [AttributeKind; 4] = [
        AttributeKind::Accuracy,
        AttributeKind::Damage,
        AttributeKind::Speed,
        AttributeKind::Mastery,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Accuracy => "Accuracy",
            Self::Damage => "Damage",
            Self::Speed => "Speed",
            Self::Mastery => "Mastery",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match *self {
            Self::Accuracy => "ACC",
            Self::Damage => "DMG",
            Self::Speed => "SPD",
            Self::Mastery => "MST",
        }
    }

    /// Accepts either the display name or the three-letter short name,
    /// ignoring case and surrounding whitespace.
    pub fn from_name(raw: &str) -> Option<Self> {
        let normalized = raw.trim();
        Self::ALL.into_iter().find(|kind| {
            kind.as_str().eq_ignore_ascii_case(normalized)
                || kind.short_name().eq_ignore_ascii_case(normalized)
        })
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Four per-attribute values, optionally tagged with the name of the
/// catalog entry they came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusVector {
    source: Option<String>,
    accuracy: i32,
    damage: i32,
    speed: i32,
    mastery: i32,
}

impl BonusVector {
    pub fn new(accuracy: i32, damage: i32, speed: i32, mastery: i32) -> Self {
        Self {
            source: None,
            accuracy,
            damage,
            speed,
            mastery,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn tagged(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn get(&self, attr: AttributeKind) -> i32 {
        self[attr]
    }

    pub(crate) fn get_mut(&mut self, attr: AttributeKind) -> &mut i32 {
        match attr {
            AttributeKind::Accuracy => &mut self.accuracy,
            AttributeKind::Damage => &mut self.damage,
            AttributeKind::Speed => &mut self.speed,
            AttributeKind::Mastery => &mut self.mastery,
        }
    }

    pub fn sum(&self) -> i32 {
        AttributeKind::ALL.iter().map(|&attr| self.get(attr)).sum()
    }

    pub fn is_zero(&self) -> bool {
        AttributeKind::ALL.iter().all(|&attr| self.get(attr) == 0)
    }
}

impl Index<AttributeKind> for BonusVector {
    type Output = i32;

    fn index(&self, attr: AttributeKind) -> &i32 {
        match attr {
            AttributeKind::Accuracy => &self.accuracy,
            AttributeKind::Damage => &self.damage,
            AttributeKind::Speed => &self.speed,
            AttributeKind::Mastery => &self.mastery,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AttributeKind, BonusVector};

    #[test]
    fn from_name_accepts_display_and_short_names() {
        assert_eq!(
            AttributeKind::from_name("Accuracy"),
            Some(AttributeKind::Accuracy)
        );
        assert_eq!(AttributeKind::from_name("dmg"), Some(AttributeKind::Damage));
        assert_eq!(AttributeKind::from_name(" SPEED "), Some(AttributeKind::Speed));
        assert_eq!(AttributeKind::from_name("mst"), Some(AttributeKind::Mastery));
        assert_eq!(AttributeKind::from_name("Luck"), None);
        assert_eq!(AttributeKind::from_name(""), None);
    }

    #[test]
    fn index_and_get_agree() {
        let bonus = BonusVector::new(1, -2, 3, 4).tagged("Brute");
        for attr in AttributeKind::ALL {
            assert_eq!(bonus[attr], bonus.get(attr));
        }
        assert_eq!(bonus.sum(), 6);
        assert_eq!(bonus.source(), Some("Brute"));
        assert!(!bonus.is_zero());
        assert!(BonusVector::zero().is_zero());
    }
}
