//! Typed failures surfaced by record construction and catalogue queries.
//!
//! File handling and the binary wrap these in `anyhow`; library callers can
//! match on the variants directly.

use crate::catalogue::identity::{FieldKey, Kind};
use crate::value::ValueTag;
use thiserror::Error;

/// A field set that does not fit the schema it was built against.
///
/// Raised before any record exists, so a rejected field set never reaches a
/// catalogue.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("{key} is not a field of the {kind} schema")]
    UnknownKey { kind: Kind, key: FieldKey },

    #[error("{key} expects {expected} but got {actual}")]
    WrongTag {
        key: FieldKey,
        expected: ValueTag,
        actual: ValueTag,
    },

    #[error("{key} supplied more than once")]
    DuplicateKey { key: FieldKey },

    #[error("KIND {declared} conflicts with the {kind} schema")]
    KindConflict { kind: Kind, declared: Kind },
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CatalogueError {
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),

    /// A query handed to a category-scoped finder for another category.
    #[error("{query} query presented to the {expected} finder")]
    CategoryMismatch { expected: Kind, query: Kind },

    #[error("{key} expects {expected}, cannot parse '{raw}'")]
    InvalidLiteral {
        key: FieldKey,
        expected: ValueTag,
        raw: String,
    },
}
