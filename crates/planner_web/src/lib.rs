use std::rc::Rc;

use log::info;
use planner_core::{
    AttributeKind, BuildState, Catalog, CatalogProvider, CoreError, CoreErrorCode, KeyValueStore,
    load_build, save_build, saved_character_names,
};
use planner_render::{render_text_sheet, sheet_view};
use serde::Serialize;
use wasm_bindgen::prelude::*;

mod local_storage;

pub use local_storage::LocalStorage;

#[derive(Debug, Clone)]
struct WebError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Clone, Serialize)]
struct WebErrorPayload {
    code: String,
    message: String,
}

impl WebError {
    fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    fn to_js_value(&self) -> JsValue {
        let payload = WebErrorPayload {
            code: self.code.to_string(),
            message: self.message.clone(),
        };
        serde_wasm_bindgen::to_value(&payload).unwrap_or_else(|_| {
            JsValue::from_str(&format!("{}: {}", payload.code, payload.message))
        })
    }
}

impl From<CoreError> for WebError {
    fn from(err: CoreError) -> Self {
        let code = match err.code {
            CoreErrorCode::CatalogLoad => "catalog_load_failed",
            CoreErrorCode::NotFound => "not_found",
            CoreErrorCode::CorruptRecord => "corrupt_record",
            CoreErrorCode::Storage => "storage_failed",
        };
        Self::new(code, err.message)
    }
}

fn js_error(err: impl Into<WebError>) -> JsValue {
    err.into().to_js_value()
}

/// One planning session: a build bound to its catalog.
#[wasm_bindgen]
pub struct Planner {
    state: BuildState<Rc<Catalog>>,
}

#[wasm_bindgen]
impl Planner {
    /// Planner over the bundled archetype and class definitions.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Planner, JsValue> {
        Self::from_catalog(Catalog::bundled()).map_err(js_error)
    }

    pub fn with_catalog(archetypes_json: &str, classes_json: &str) -> Result<Planner, JsValue> {
        Self::from_catalog(Catalog::from_json_strs(archetypes_json, classes_json))
            .map_err(js_error)
    }

    pub fn archetype_names(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.catalog().archetype_names())
    }

    pub fn class_names(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.catalog().class_names())
    }

    /// Backgrounds of the selected class.
    pub fn background_names(&self) -> Result<JsValue, JsValue> {
        to_js(&self.state.available_backgrounds())
    }

    pub fn select_archetype(&mut self, name: &str) {
        self.state.select_archetype(name);
    }

    pub fn select_class(&mut self, name: &str) {
        self.state.select_class(name);
    }

    pub fn select_background(&mut self, name: &str) {
        self.state.select_background(name);
    }

    pub fn spend_point(&mut self, attribute: &str) -> Result<(), JsValue> {
        let attr = parse_attribute(attribute).map_err(js_error)?;
        self.state.spend_point(attr);
        Ok(())
    }

    pub fn refund_point(&mut self, attribute: &str) -> Result<(), JsValue> {
        let attr = parse_attribute(attribute).map_err(js_error)?;
        self.state.refund_point(attr);
        Ok(())
    }

    pub fn total_for(&self, attribute: &str) -> Result<i32, JsValue> {
        let attr = parse_attribute(attribute).map_err(js_error)?;
        Ok(self.state.total_for(attr))
    }

    pub fn modifier_for(&self, attribute: &str) -> Result<i32, JsValue> {
        let attr = parse_attribute(attribute).map_err(js_error)?;
        Ok(self.state.modifier_for(attr))
    }

    pub fn remaining_points(&self) -> i32 {
        self.state.remaining_points()
    }

    pub fn character_name(&self) -> String {
        self.state.character_name().to_string()
    }

    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Everything needed to draw the planner screen, as a plain JS object.
    pub fn view(&self) -> Result<JsValue, JsValue> {
        to_js(&sheet_view(&self.state))
    }

    pub fn render_text(&self) -> String {
        render_text_sheet(&self.state)
    }

    pub fn save(&mut self, name: &str) -> Result<(), JsValue> {
        let mut storage = LocalStorage::open().map_err(js_error)?;
        self.save_impl(&mut storage, name).map_err(js_error)
    }

    /// Replaces the current build with a saved one. A failed load keeps
    /// the current build.
    pub fn load(&mut self, name: &str) -> Result<(), JsValue> {
        let storage = LocalStorage::open().map_err(js_error)?;
        self.load_impl(&storage, name).map_err(js_error)
    }

    pub fn saved_characters(&self) -> Result<JsValue, JsValue> {
        let storage = LocalStorage::open().map_err(js_error)?;
        let names = saved_characters_impl(&storage).map_err(js_error)?;
        to_js(&names)
    }
}

impl Planner {
    fn from_catalog(catalog: Result<Catalog, CoreError>) -> Result<Self, WebError> {
        let catalog = catalog?;
        Ok(Self {
            state: BuildState::new(Rc::new(catalog)),
        })
    }

    fn save_impl<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &mut S,
        name: &str,
    ) -> Result<(), WebError> {
        save_build(store, &mut self.state, name)?;
        info!("saved build '{name}'");
        Ok(())
    }

    fn load_impl<S: KeyValueStore + ?Sized>(
        &mut self,
        store: &S,
        name: &str,
    ) -> Result<(), WebError> {
        load_build(store, &mut self.state, name)?;
        info!("loaded build '{name}'");
        Ok(())
    }
}

fn saved_characters_impl<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<String>, WebError> {
    Ok(saved_character_names(store)?)
}

fn parse_attribute(raw: &str) -> Result<AttributeKind, WebError> {
    AttributeKind::from_name(raw).ok_or_else(|| {
        WebError::new(
            "invalid_attribute",
            format!(
                "Invalid attribute '{raw}'. Expected one of: Accuracy, Damage, Speed, Mastery, ACC, DMG, SPD, MST"
            ),
        )
    })
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|err| {
        WebError::new(
            "render_failed",
            format!("failed to convert value for JavaScript: {err}"),
        )
        .to_js_value()
    })
}
