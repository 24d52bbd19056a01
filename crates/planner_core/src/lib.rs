pub mod attribute;
pub mod catalog;
mod error;
pub mod record;
pub mod state;
pub mod storage;

pub use attribute::{AttributeKind, BonusVector};
pub use catalog::{Catalog, CatalogProvider, MAX_CATALOG_BONUS};
pub use error::{CoreError, CoreErrorCode};
pub use record::BuildRecord;
pub use state::{BuildState, MAX_SPENDABLE_POINTS};
pub use storage::{
    CHAR_PREFIX, KeyValueStore, MemoryStore, load_build, save_build, saved_character_names,
    storage_key,
};
