use std::fmt::Write as _;

use planner_core::{AttributeKind, BonusVector, BuildState, CatalogProvider};
use serde::Serialize;
use serde_json::{Map as JsonMap, Value as JsonValue};

const LABEL_COL_WIDTH: usize = 12;
const NAME_COL_WIDTH: usize = 16;
const ATTRIBUTE_COL_WIDTH: usize = 18;
const NUMBER_COL_WIDTH: usize = 6;
const NO_SELECTION: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub attribute: AttributeKind,
    pub short_name: String,
    /// e.g. `Accuracy (ACC)`
    pub label: String,
    pub total: i32,
    pub modifier: i32,
}

/// Everything a planner screen shows for one build, detached from the
/// state it was taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetView {
    pub character_name: String,
    pub attributes: Vec<AttributeRow>,
    pub archetype: Option<String>,
    pub class: Option<String>,
    pub background: Option<String>,
    pub archetype_bonuses: String,
    pub class_bonuses: String,
    pub background_bonuses: String,
    pub remaining_points: i32,
    pub spent_points: String,
    pub available_backgrounds: Vec<String>,
}

pub fn sheet_view<P: CatalogProvider>(state: &BuildState<P>) -> SheetView {
    SheetView {
        character_name: state.character_name().to_string(),
        attributes: attribute_rows(state),
        archetype: state.archetype_name().map(str::to_string),
        class: state.class_name().map(str::to_string),
        background: state.background_name().map(str::to_string),
        archetype_bonuses: selection_label(state.archetype_bonus()),
        class_bonuses: selection_label(state.class_bonus()),
        background_bonuses: selection_label(state.background_bonus()),
        remaining_points: state.remaining_points(),
        spent_points: format_bonuses(state.spent_points()),
        available_backgrounds: state
            .available_backgrounds()
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub fn attribute_rows<P: CatalogProvider>(state: &BuildState<P>) -> Vec<AttributeRow> {
    AttributeKind::ALL
        .iter()
        .map(|&attr| AttributeRow {
            attribute: attr,
            short_name: attr.short_name().to_string(),
            label: format!("{} ({})", attr.as_str(), attr.short_name()),
            total: state.total_for(attr),
            modifier: state.modifier_for(attr),
        })
        .collect()
}

/// `ACC +1, DMG +0, SPD -1, MST +2`
pub fn format_bonuses(bonus: &BonusVector) -> String {
    AttributeKind::ALL
        .iter()
        .map(|&attr| format!("{} {:+}", attr.short_name(), bonus[attr]))
        .collect::<Vec<_>>()
        .join(", ")
}

// Summary labels stay blank until something is selected.
fn selection_label(bonus: &BonusVector) -> String {
    match bonus.source() {
        Some(_) => format_bonuses(bonus),
        None => String::new(),
    }
}

pub fn render_json<P: CatalogProvider>(state: &BuildState<P>) -> JsonValue {
    JsonValue::Object(canonical_json(&sheet_view(state), state))
}

fn canonical_json<P: CatalogProvider>(
    view: &SheetView,
    state: &BuildState<P>,
) -> JsonMap<String, JsonValue> {
    let mut map = JsonMap::new();
    map.insert(
        "character_name".to_string(),
        JsonValue::String(view.character_name.clone()),
    );
    map.insert(
        "archetype".to_string(),
        optional_string(view.archetype.as_deref()),
    );
    map.insert("class".to_string(), optional_string(view.class.as_deref()));
    map.insert(
        "background".to_string(),
        optional_string(view.background.as_deref()),
    );

    let attributes = view
        .attributes
        .iter()
        .map(|row| {
            let mut entry = JsonMap::new();
            entry.insert(
                "attribute".to_string(),
                JsonValue::String(row.attribute.as_str().to_string()),
            );
            entry.insert(
                "short_name".to_string(),
                JsonValue::String(row.short_name.clone()),
            );
            entry.insert("total".to_string(), JsonValue::from(row.total));
            entry.insert("modifier".to_string(), JsonValue::from(row.modifier));
            JsonValue::Object(entry)
        })
        .collect();
    map.insert("attributes".to_string(), JsonValue::Array(attributes));

    map.insert(
        "bonuses".to_string(),
        JsonValue::Object(
            [
                ("archetype", state.archetype_bonus()),
                ("class", state.class_bonus()),
                ("background", state.background_bonus()),
                ("spent", state.spent_points()),
            ]
            .into_iter()
            .map(|(key, bonus)| (key.to_string(), bonus_json(bonus)))
            .collect(),
        ),
    );
    map.insert(
        "remaining_points".to_string(),
        JsonValue::from(view.remaining_points),
    );
    map.insert(
        "available_backgrounds".to_string(),
        JsonValue::Array(
            view.available_backgrounds
                .iter()
                .cloned()
                .map(JsonValue::String)
                .collect(),
        ),
    );
    map
}

fn bonus_json(bonus: &BonusVector) -> JsonValue {
    let mut map = JsonMap::new();
    for attr in AttributeKind::ALL {
        map.insert(attr.as_str().to_string(), JsonValue::from(bonus[attr]));
    }
    JsonValue::Object(map)
}

fn optional_string(value: Option<&str>) -> JsonValue {
    value
        .map(|v| JsonValue::String(v.to_string()))
        .unwrap_or(JsonValue::Null)
}

pub fn render_text_sheet<P: CatalogProvider>(state: &BuildState<P>) -> String {
    let view = sheet_view(state);
    let mut out = String::new();

    let title = if view.character_name.is_empty() {
        "CHARACTER BUILD".to_string()
    } else {
        format!("CHARACTER BUILD: {}", view.character_name)
    };
    writeln!(&mut out, "{title}").expect("writing to String cannot fail");
    writeln!(&mut out, "{}", "=".repeat(title.chars().count()))
        .expect("writing to String cannot fail");

    for (label, name, bonuses) in [
        ("Archetype:", &view.archetype, &view.archetype_bonuses),
        ("Class:", &view.class, &view.class_bonuses),
        ("Background:", &view.background, &view.background_bonuses),
    ] {
        let name = name.as_deref().unwrap_or(NO_SELECTION);
        let line = format!("{label:<LABEL_COL_WIDTH$}{name:<NAME_COL_WIDTH$}{bonuses}");
        writeln!(&mut out, "{}", line.trim_end()).expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(
        &mut out,
        "{:<ATTRIBUTE_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}",
        "Attribute", "Total", "Mod"
    )
    .expect("writing to String cannot fail");
    for row in &view.attributes {
        writeln!(
            &mut out,
            "{:<ATTRIBUTE_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}{:>NUMBER_COL_WIDTH$}",
            row.label, row.total, row.modifier
        )
        .expect("writing to String cannot fail");
    }
    writeln!(&mut out).expect("writing to String cannot fail");

    writeln!(&mut out, "Remaining Points: {}", view.remaining_points)
        .expect("writing to String cannot fail");
    writeln!(&mut out, "Spent Points:     {}", view.spent_points)
        .expect("writing to String cannot fail");
    out
}

#[cfg(test)]
mod tests {
    use planner_core::BonusVector;

    use super::{format_bonuses, selection_label};

    #[test]
    fn format_bonuses_signs_every_value() {
        let bonus = BonusVector::new(1, 0, -1, 2);
        assert_eq!(format_bonuses(&bonus), "ACC +1, DMG +0, SPD -1, MST +2");
    }

    #[test]
    fn selection_label_is_blank_without_source() {
        assert_eq!(selection_label(&BonusVector::new(1, 0, 0, 0)), "");
        assert_eq!(
            selection_label(&BonusVector::new(1, 0, 0, 0).tagged("Warrior")),
            "ACC +1, DMG +0, SPD +0, MST +0"
        );
    }
}
