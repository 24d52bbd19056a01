use log::{debug, warn};

use crate::attribute::{AttributeKind, BonusVector};
use crate::catalog::CatalogProvider;
use crate::error::{CoreError, CoreErrorCode};
use crate::record::BuildRecord;

/// Size of the free point pool a build can distribute.
pub const MAX_SPENDABLE_POINTS: i32 = 3;

/// One character build in progress.
///
/// Invariants held after every public call:
/// - `0 <= remaining_points() <= MAX_SPENDABLE_POINTS`
/// - `remaining_points() + spent_points().sum() == MAX_SPENDABLE_POINTS`
/// - every spent-point entry is non-negative
///
/// Selections never fail: a name the catalog does not know leaves the
/// corresponding bonus at zero.
#[derive(Debug, Clone)]
pub struct BuildState<P> {
    catalog: P,
    archetype: BonusVector,
    class: BonusVector,
    background: BonusVector,
    spent: BonusVector,
    remaining_points: i32,
    character_name: String,
}

impl<P: CatalogProvider> BuildState<P> {
    pub fn new(catalog: P) -> Self {
        Self {
            catalog,
            archetype: BonusVector::zero(),
            class: BonusVector::zero(),
            background: BonusVector::zero(),
            spent: BonusVector::zero(),
            remaining_points: MAX_SPENDABLE_POINTS,
            character_name: String::new(),
        }
    }

    pub fn catalog(&self) -> &P {
        &self.catalog
    }

    pub fn select_archetype(&mut self, name: &str) {
        self.archetype = self
            .catalog
            .archetype_bonus(name)
            .unwrap_or_else(degrade);
    }

    /// Also clears the background, since backgrounds belong to a class.
    pub fn select_class(&mut self, name: &str) {
        self.class = self
            .catalog
            .class_bonus(name)
            .unwrap_or_else(degrade);
        self.background = BonusVector::zero();
    }

    /// Resolves `name` against the currently selected class.
    pub fn select_background(&mut self, name: &str) {
        let Some(class_name) = self.class.source() else {
            debug!("background '{name}' selected without a class");
            self.background = BonusVector::zero();
            return;
        };
        self.background = self
            .catalog
            .background_bonus(class_name, name)
            .unwrap_or_else(degrade);
    }

    pub fn spend_point(&mut self, attr: AttributeKind) {
        if self.remaining_points <= 0 {
            debug!("no points left to spend on {attr}");
            return;
        }
        *self.spent.get_mut(attr) += 1;
        self.remaining_points -= 1;
    }

    /// Gives back a point previously spent on `attr`. Points that came
    /// from the catalog cannot be refunded.
    pub fn refund_point(&mut self, attr: AttributeKind) {
        if self.spent[attr] <= 0 || self.remaining_points >= MAX_SPENDABLE_POINTS {
            debug!("no spent points to refund on {attr}");
            return;
        }
        *self.spent.get_mut(attr) -= 1;
        self.remaining_points += 1;
    }

    pub fn total_for(&self, attr: AttributeKind) -> i32 {
        self.archetype[attr] + self.class[attr] + self.background[attr] + self.spent[attr]
    }

    pub fn modifier_for(&self, attr: AttributeKind) -> i32 {
        self.total_for(attr) / 2
    }

    pub fn total_stats(&self) -> BonusVector {
        BonusVector::new(
            self.total_for(AttributeKind::Accuracy),
            self.total_for(AttributeKind::Damage),
            self.total_for(AttributeKind::Speed),
            self.total_for(AttributeKind::Mastery),
        )
        .tagged("Total")
    }

    pub fn reset(&mut self) {
        self.archetype = BonusVector::zero();
        self.class = BonusVector::zero();
        self.background = BonusVector::zero();
        self.spent = BonusVector::zero();
        self.remaining_points = MAX_SPENDABLE_POINTS;
        self.character_name.clear();
    }

    pub fn serialize(&self) -> BuildRecord {
        BuildRecord {
            name: self.character_name.clone(),
            archetype: self.archetype_name().unwrap_or_default().to_string(),
            class: self.class_name().unwrap_or_default().to_string(),
            background: self.background_name().unwrap_or_default().to_string(),
            accuracy: self.spent[AttributeKind::Accuracy],
            damage: self.spent[AttributeKind::Damage],
            speed: self.spent[AttributeKind::Speed],
            mastery: self.spent[AttributeKind::Mastery],
        }
    }

    /// Replaces this build with `record`.
    ///
    /// The point fields are validated before anything changes, so a
    /// rejected record leaves the current build untouched.
    pub fn deserialize(&mut self, record: &BuildRecord) -> Result<(), CoreError> {
        let remaining = remaining_after(record)?;

        self.reset();
        self.select_archetype(&record.archetype);
        self.select_class(&record.class);
        self.select_background(&record.background);
        warn_if_unresolved("archetype", &record.archetype, self.archetype_name());
        warn_if_unresolved("class", &record.class, self.class_name());
        warn_if_unresolved("background", &record.background, self.background_name());

        self.spent = record.spent_points();
        self.remaining_points = remaining;
        self.character_name = record.name.clone();
        Ok(())
    }

    pub fn archetype_bonus(&self) -> &BonusVector {
        &self.archetype
    }

    pub fn class_bonus(&self) -> &BonusVector {
        &self.class
    }

    pub fn background_bonus(&self) -> &BonusVector {
        &self.background
    }

    pub fn spent_points(&self) -> &BonusVector {
        &self.spent
    }

    pub fn archetype_name(&self) -> Option<&str> {
        self.archetype.source()
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class.source()
    }

    pub fn background_name(&self) -> Option<&str> {
        self.background.source()
    }

    pub fn remaining_points(&self) -> i32 {
        self.remaining_points
    }

    pub fn spent_total(&self) -> i32 {
        self.spent.sum()
    }

    pub fn character_name(&self) -> &str {
        &self.character_name
    }

    pub fn set_character_name(&mut self, name: impl Into<String>) {
        self.character_name = name.into();
    }

    /// Backgrounds the current class allows; empty with no class selected.
    pub fn available_backgrounds(&self) -> Vec<&str> {
        self.class_name()
            .and_then(|class_name| self.catalog.background_names(class_name).ok())
            .unwrap_or_default()
    }
}

fn degrade(err: CoreError) -> BonusVector {
    debug!("selection cleared: {err}");
    BonusVector::zero()
}

fn warn_if_unresolved(kind: &str, wanted: &str, resolved: Option<&str>) {
    if !wanted.is_empty() && resolved != Some(wanted) {
        warn!("saved {kind} '{wanted}' is no longer in the catalog");
    }
}

fn remaining_after(record: &BuildRecord) -> Result<i32, CoreError> {
    let points = [
        ("Accuracy", record.accuracy),
        ("Damage", record.damage),
        ("Speed", record.speed),
        ("Mastery", record.mastery),
    ];
    if let Some((field, value)) = points.iter().find(|(_, value)| *value < 0) {
        return Err(CoreError::new(
            CoreErrorCode::CorruptRecord,
            format!("negative {field} points ({value})"),
        ));
    }

    let spent: i64 = points.iter().map(|&(_, value)| i64::from(value)).sum();
    let remaining = i64::from(MAX_SPENDABLE_POINTS) - spent;
    if !(0..=i64::from(MAX_SPENDABLE_POINTS)).contains(&remaining) {
        return Err(CoreError::new(
            CoreErrorCode::CorruptRecord,
            format!("record spends {spent} points, budget is {MAX_SPENDABLE_POINTS}"),
        ));
    }
    Ok(remaining as i32)
}
