use std::path::PathBuf;

use planner_core::{
    AttributeKind, BuildState, Catalog, CatalogProvider, CoreErrorCode, MAX_CATALOG_BONUS,
};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..")
}

const CLASSES: &str = r#"{
    "Warrior": {
        "attributes": { "Accuracy": 1, "Damage": 0, "Speed": 0, "Mastery": 0 },
        "backgrounds": {
            "Noble": { "Accuracy": 0, "Damage": 0, "Speed": 1, "Mastery": 0 }
        }
    }
}"#;

#[test]
fn fixture_catalog_answers_lookups() {
    let catalog = Catalog::load_from_dir(&workspace_root().join("tests/fixtures"))
        .expect("fixture catalog should load");

    assert_eq!(
        catalog.archetype_names(),
        vec!["Brute", "Cursed", "Sharpshooter"]
    );
    assert_eq!(catalog.class_names(), vec!["Mage", "Warrior"]);

    let brute = catalog.archetype_bonus("Brute").expect("brute should exist");
    assert_eq!(brute[AttributeKind::Damage], 2);
    assert_eq!(brute.sum(), 2);

    let cursed = catalog.archetype_bonus("Cursed").expect("cursed should exist");
    assert_eq!(cursed[AttributeKind::Accuracy], -1);

    let warrior = catalog.class_bonus("Warrior").expect("warrior should exist");
    assert_eq!(warrior[AttributeKind::Accuracy], 1);

    assert_eq!(
        catalog
            .background_names("Warrior")
            .expect("warrior backgrounds should list"),
        vec!["Mercenary", "Noble"]
    );
    let noble = catalog
        .background_bonus("Warrior", "Noble")
        .expect("noble should exist under warrior");
    assert_eq!(noble[AttributeKind::Speed], 1);
}

#[test]
fn unknown_names_are_not_found() {
    let catalog = Catalog::load_from_dir(&workspace_root().join("tests/fixtures"))
        .expect("fixture catalog should load");

    let err = catalog
        .archetype_bonus("Goblin")
        .expect_err("unknown archetype should fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);

    let err = catalog
        .class_bonus("Bard")
        .expect_err("unknown class should fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);

    let err = catalog
        .background_names("Bard")
        .expect_err("backgrounds of unknown class should fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);

    let err = catalog
        .background_bonus("Mage", "Noble")
        .expect_err("background of another class should fail");
    assert_eq!(err.code, CoreErrorCode::NotFound);
    assert!(err.message.contains("Mage"));
}

#[test]
fn missing_attribute_key_fails_load() {
    let err = Catalog::load_from_dir(&workspace_root().join("tests/fixtures/malformed"))
        .expect_err("archetype without Mastery should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    assert!(err.message.contains("archetypes.json"));
    assert!(err.message.contains("Mastery"));
}

#[test]
fn missing_directory_fails_load() {
    let err = Catalog::load_from_dir(&workspace_root().join("tests/fixtures/does-not-exist"))
        .expect_err("missing files should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
}

#[test]
fn non_integer_bonus_fails_load() {
    let archetypes = r#"{ "Brute": { "Accuracy": 0, "Damage": 1.5, "Speed": 0, "Mastery": 0 } }"#;
    let err = Catalog::from_json_strs(archetypes, CLASSES)
        .expect_err("fractional bonus should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);

    let archetypes = r#"{ "Brute": { "Accuracy": "0", "Damage": 1, "Speed": 0, "Mastery": 0 } }"#;
    let err =
        Catalog::from_json_strs(archetypes, CLASSES).expect_err("string bonus should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
}

#[test]
fn duplicate_archetype_fails_load() {
    let archetypes = r#"{
        "Brute": { "Accuracy": 0, "Damage": 2, "Speed": 0, "Mastery": 0 },
        "Brute": { "Accuracy": 0, "Damage": 3, "Speed": 0, "Mastery": 0 }
    }"#;
    let err = Catalog::from_json_strs(archetypes, CLASSES)
        .expect_err("duplicate archetype should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    assert!(err.message.contains("duplicate name 'Brute'"));
}

#[test]
fn unknown_attribute_key_fails_load() {
    let archetypes =
        r#"{ "Brute": { "Accuracy": 0, "Damage": 2, "Speed": 0, "Mastery": 0, "Luck": 1 } }"#;
    let err = Catalog::from_json_strs(archetypes, CLASSES)
        .expect_err("unknown attribute should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
}

#[test]
fn class_without_backgrounds_fails_load() {
    let classes = r#"{
        "Warrior": { "attributes": { "Accuracy": 1, "Damage": 0, "Speed": 0, "Mastery": 0 } }
    }"#;
    let err = Catalog::from_json_strs("{}", classes)
        .expect_err("class without backgrounds should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    assert!(err.message.contains("backgrounds"));
}

#[test]
fn out_of_range_bonus_fails_load() {
    let archetypes =
        r#"{ "Titan": { "Accuracy": 2147483647, "Damage": 0, "Speed": 0, "Mastery": 0 } }"#;
    let err =
        Catalog::from_json_strs(archetypes, CLASSES).expect_err("huge bonus should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    assert!(err.message.contains("Titan Accuracy"));

    let classes = r#"{
        "Warrior": {
            "attributes": { "Accuracy": 0, "Damage": 0, "Speed": 0, "Mastery": 0 },
            "backgrounds": {
                "Cursed": { "Accuracy": 0, "Damage": 0, "Speed": -2147483648, "Mastery": 0 }
            }
        }
    }"#;
    let err = Catalog::from_json_strs("{}", classes).expect_err("huge penalty should fail");
    assert_eq!(err.code, CoreErrorCode::CatalogLoad);
    assert!(err.message.contains("Cursed Speed"));
}

#[test]
fn largest_allowed_bonuses_total_without_overflow() {
    let archetypes = format!(
        r#"{{ "Titan": {{ "Accuracy": {MAX_CATALOG_BONUS}, "Damage": 0, "Speed": 0, "Mastery": 0 }} }}"#
    );
    let classes = format!(
        r#"{{
            "Giant": {{
                "attributes": {{ "Accuracy": {MAX_CATALOG_BONUS}, "Damage": 0, "Speed": 0, "Mastery": 0 }},
                "backgrounds": {{
                    "Colossus": {{ "Accuracy": {MAX_CATALOG_BONUS}, "Damage": 0, "Speed": 0, "Mastery": 0 }}
                }}
            }}
        }}"#
    );
    let catalog =
        Catalog::from_json_strs(&archetypes, &classes).expect("bonuses at the limit should load");

    let mut state = BuildState::new(&catalog);
    state.select_archetype("Titan");
    state.select_class("Giant");
    state.select_background("Colossus");
    for _ in 0..3 {
        state.spend_point(AttributeKind::Accuracy);
    }
    assert_eq!(
        state.total_for(AttributeKind::Accuracy),
        3 * MAX_CATALOG_BONUS + 3
    );
    assert_eq!(
        state.modifier_for(AttributeKind::Accuracy),
        (3 * MAX_CATALOG_BONUS + 3) / 2
    );
}
