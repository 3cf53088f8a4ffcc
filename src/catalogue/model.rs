//! Deserializable catalogue documents and the loader that turns them into a
//! `Catalogue`.
//!
//! A document is validated against the catalogue JSON Schema first, then each
//! entry goes through `Record::create`, so the schema file and the in-code
//! schemas both have to agree before a record is stored.

use crate::catalogue::identity::{FieldKey, Kind};
use crate::catalogue::index::Catalogue;
use crate::schema_loader::{
    SchemaLoadOptions, SchemaLoadResult, load_json_schema_from_path, load_json_schema_from_str,
};
use crate::value::{TextMode, Value, ValueTag};
use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const CATALOGUE_SCHEMA_VERSION: &str = "catalogue_v1";

const BUNDLED_SCHEMA: &str = include_str!("../../schema/catalogue.schema.json");
const BUNDLED_LIBRARY: &str = include_str!("../../fixtures/library.json");

/// Catalogue document as stored on disk.
#[derive(Clone, Debug, Deserialize)]
pub struct CatalogueDocument {
    pub schema_version: String,
    #[serde(default)]
    pub text_mode: Option<TextMode>,
    pub records: Vec<BTreeMap<String, serde_json::Value>>,
}

/// Knobs for loading a document.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    /// Overrides the document's `text_mode` when set.
    pub text_mode: Option<TextMode>,
    /// Validate against this schema file instead of the bundled schema.
    pub schema_path: Option<PathBuf>,
}

/// Read, validate and load a catalogue document from disk.
pub fn load_catalogue_from_path(path: &Path, options: &LoadOptions) -> Result<Catalogue> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load_catalogue_from_str(&text, &path.display().to_string(), options)
}

/// Validate and load a catalogue document held in memory; `label` names it in
/// error messages.
pub fn load_catalogue_from_str(text: &str, label: &str, options: &LoadOptions) -> Result<Catalogue> {
    let raw: serde_json::Value =
        serde_json::from_str(text).with_context(|| format!("parsing {label}"))?;
    let schema = document_schema(options.schema_path.as_deref())?;
    schema.validate(&raw, label)?;

    let document: CatalogueDocument =
        serde_json::from_value(raw).with_context(|| format!("decoding {label}"))?;
    if document.schema_version != schema.schema_version {
        bail!(
            "{label} declares schema_version '{}', expected '{}'",
            document.schema_version,
            schema.schema_version
        );
    }
    build_catalogue(document, label, options.text_mode)
}

/// The stock library: eleven novels, ten cookbooks and one how-to book.
pub fn bundled_library(text_mode: Option<TextMode>) -> Result<Catalogue> {
    load_catalogue_from_str(
        BUNDLED_LIBRARY,
        "bundled library",
        &LoadOptions {
            text_mode,
            schema_path: None,
        },
    )
}

fn document_schema(path: Option<&Path>) -> Result<SchemaLoadResult> {
    let allowed = BTreeSet::from([CATALOGUE_SCHEMA_VERSION.to_string()]);
    let options = SchemaLoadOptions {
        allowed_versions: Some(&allowed),
        ..Default::default()
    };
    match path {
        Some(path) => load_json_schema_from_path(path, options)
            .with_context(|| format!("loading catalogue schema {}", path.display())),
        None => load_json_schema_from_str(BUNDLED_SCHEMA, "bundled catalogue schema", options),
    }
}

fn build_catalogue(
    document: CatalogueDocument,
    label: &str,
    text_mode: Option<TextMode>,
) -> Result<Catalogue> {
    let mode = text_mode.or(document.text_mode).unwrap_or_default();
    let mut catalogue = Catalogue::with_text_mode(mode);

    if document.records.is_empty() {
        warn!(source = label, "catalogue document contains no records");
    }

    for (idx, entry) in document.records.iter().enumerate() {
        let pairs = entry
            .iter()
            .map(|(name, raw)| field_from_json(name, raw))
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("{label}: record {}", idx + 1))?;
        catalogue
            .insert(Kind::Unspecified, pairs)
            .with_context(|| format!("{label}: record {}", idx + 1))?;
    }

    debug!(
        source = label,
        records = catalogue.len(),
        text_mode = %mode,
        "catalogue loaded"
    );
    Ok(catalogue)
}

fn field_from_json(name: &str, raw: &serde_json::Value) -> Result<(FieldKey, Value)> {
    let key = FieldKey::parse(name).ok_or_else(|| anyhow!("unknown field '{name}'"))?;
    let value = match (key.tag(), raw) {
        (ValueTag::Integer, serde_json::Value::Number(number)) => number
            .as_i64()
            .map(Value::Integer)
            .ok_or_else(|| anyhow!("{key} must be a 64-bit integer, got {number}"))?,
        (_, serde_json::Value::String(text)) => Value::parse_for(key, text)?,
        (tag, other) => bail!("{key} expects {tag}, got {other}"),
    };
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(doc: serde_json::Value) -> Result<Catalogue> {
        load_catalogue_from_str(&doc.to_string(), "fixture", &LoadOptions::default())
    }

    #[test]
    fn bundled_library_loads_every_category() {
        let catalogue = bundled_library(None).expect("bundled library loads");
        let counts = catalogue.count_by_kind();
        assert_eq!(counts.get(&Kind::Fiction), Some(&11));
        assert_eq!(counts.get(&Kind::Cookbook), Some(&10));
        assert_eq!(counts.get(&Kind::HowTo), Some(&1));
        assert_eq!(catalogue.schemas().text_mode(), TextMode::Exact);
    }

    #[test]
    fn text_mode_override_wins_over_document() {
        let catalogue = bundled_library(Some(TextMode::Prefix)).unwrap();
        assert_eq!(catalogue.schemas().text_mode(), TextMode::Prefix);
    }

    #[test]
    fn entries_without_kind_are_uncategorised() {
        let catalogue = load(json!({
            "schema_version": "catalogue_v1",
            "records": [{"last": "King", "subject": "writing"}]
        }))
        .unwrap();
        let record = catalogue.iter().next().unwrap();
        assert_eq!(record.kind(), Kind::Unspecified);
        assert_eq!(record.to_string(), "{LAST: 'King', SUBJECT: writing}");
    }

    #[test]
    fn json_schema_rejects_unknown_fields() {
        let err = load(json!({
            "schema_version": "catalogue_v1",
            "records": [{"kind": "fiction", "isbn": "123"}]
        }))
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed schema validation"));
    }

    #[test]
    fn category_schema_rejects_foreign_field() {
        let err = load(json!({
            "schema_version": "catalogue_v1",
            "records": [
                {"kind": "fiction", "title": "Carrie"},
                {"kind": "fiction", "title": "Vegetarian India", "region": "india"}
            ]
        }))
        .unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("record 2"), "{message}");
        assert!(message.contains("REGION is not a field of the fiction schema"), "{message}");
    }

    #[test]
    fn wrong_version_fails_validation() {
        let err = load(json!({"schema_version": "catalogue_v2", "records": []})).unwrap_err();
        assert!(format!("{err:#}").contains("failed schema validation"));
    }

    #[test]
    fn empty_document_loads_empty_catalogue() {
        let catalogue = load(json!({"schema_version": "catalogue_v1", "records": []})).unwrap();
        assert!(catalogue.is_empty());
    }
}
