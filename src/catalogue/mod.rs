//! Record catalogue wiring.
//!
//! `identity` holds the closed vocabularies (field keys and categorical
//! enumerations), `schema` the per-category field sets, `record` the validated
//! field maps, `matcher` the query-by-example rule and `index` the ordered
//! store. `model` loads catalogue documents from JSON.

pub mod identity;
pub mod index;
pub mod matcher;
pub mod model;
pub mod record;
pub mod schema;

pub use identity::{Choice, Enumeration, FieldKey, Genre, Kind, Region, Subject};
pub use index::Catalogue;
pub use matcher::is_match;
pub use model::{
    CATALOGUE_SCHEMA_VERSION, CatalogueDocument, LoadOptions, bundled_library,
    load_catalogue_from_path, load_catalogue_from_str,
};
pub use record::{Record, declared_kind};
pub use schema::{Schema, SchemaSet};
