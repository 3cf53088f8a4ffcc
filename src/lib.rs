//! In-memory record catalogue queried by example.
//!
//! Records are partial field maps validated against a per-category schema.
//! A query is itself a record: absent keys and wildcard values (empty text,
//! zero, `Unspecified`) impose nothing, every other field must match the
//! stored value. Categorised queries only see records of their category.
//! The `catalogue-find` binary wraps this for the command line.

use anyhow::{Context, Result, anyhow, bail};

pub mod catalogue;
pub mod error;
mod schema_loader;
pub mod value;

pub use catalogue::{
    CATALOGUE_SCHEMA_VERSION, Catalogue, CatalogueDocument, Choice, Enumeration, FieldKey, Genre,
    Kind, LoadOptions, Record, Region, Schema, SchemaSet, Subject, bundled_library, declared_kind,
    is_match, load_catalogue_from_path, load_catalogue_from_str,
};
pub use error::{CatalogueError, SchemaViolation};
pub use value::{TextMode, Value, ValueTag};

/// Environment variable consulted for the text mode when no flag sets it.
pub const TEXT_MODE_ENV: &str = "RECORDMATCH_TEXT_MODE";

/// Parse `KEY=value` query terms into typed pairs.
///
/// Keys are case-insensitive field names; values are parsed according to the
/// key's tag. An empty value (`TITLE=`) is the text wildcard.
pub fn parse_query_terms<S: AsRef<str>>(terms: &[S]) -> Result<Vec<(FieldKey, Value)>> {
    terms
        .iter()
        .map(|term| {
            let term = term.as_ref();
            let (name, raw) = term
                .split_once('=')
                .ok_or_else(|| anyhow!("query term '{term}' must look like KEY=value"))?;
            let key = FieldKey::parse(name)
                .ok_or_else(|| anyhow!("unknown field '{}' in query term '{term}'", name.trim()))?;
            let value = Value::parse_for(key, raw)
                .with_context(|| format!("query term '{term}'"))?;
            Ok((key, value))
        })
        .collect()
}

/// Resolve the text mode from an explicit setting or `RECORDMATCH_TEXT_MODE`.
///
/// Returns `None` when neither is set so the catalogue document decides.
pub fn resolve_text_mode(explicit: Option<&str>) -> Result<Option<TextMode>> {
    let from_env = std::env::var(TEXT_MODE_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty());
    let Some(raw) = explicit.map(str::to_string).or(from_env) else {
        return Ok(None);
    };
    match TextMode::parse(&raw) {
        Some(mode) => Ok(Some(mode)),
        None => bail!("unknown text mode '{raw}'; expected 'exact' or 'prefix'"),
    }
}
