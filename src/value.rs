//! Field values and the per-tag wildcard rules.
//!
//! A `Value` is one of three closed shapes. Each shape has a sentinel that
//! means "no constraint" when it appears in a query: empty text, the integer
//! zero, or the `Unspecified` variant of a categorical enumeration. Sentinels
//! are ordinary values, not an extra optional layer, so a query field can be
//! present and still impose nothing.

use crate::catalogue::identity::{Choice, Enumeration, FieldKey, Genre, Kind, Region, Subject};
use crate::error::CatalogueError;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// The shape a value has, and for categoricals which enumeration it is from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ValueTag {
    Text,
    Integer,
    Categorical(Enumeration),
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueTag::Text => f.write_str("text"),
            ValueTag::Integer => f.write_str("integer"),
            ValueTag::Categorical(enumeration) => write!(f, "categorical({enumeration})"),
        }
    }
}

/// How query text is compared with stored text. Both modes ignore case.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    /// Stored text must equal the query text.
    #[default]
    Exact,
    /// Stored text must start with the query text.
    Prefix,
}

impl TextMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TextMode::Exact => "exact",
            TextMode::Prefix => "prefix",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(TextMode::Exact),
            "prefix" => Some(TextMode::Prefix),
            _ => None,
        }
    }
}

impl fmt::Display for TextMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Value {
    Text(String),
    Integer(i64),
    Categorical(Choice),
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn tag(&self) -> ValueTag {
        match self {
            Value::Text(_) => ValueTag::Text,
            Value::Integer(_) => ValueTag::Integer,
            Value::Categorical(choice) => ValueTag::Categorical(choice.enumeration()),
        }
    }

    /// The sentinel for `tag`.
    pub fn wildcard(tag: ValueTag) -> Self {
        match tag {
            ValueTag::Text => Value::Text(String::new()),
            ValueTag::Integer => Value::Integer(0),
            ValueTag::Categorical(enumeration) => {
                Value::Categorical(Choice::unspecified(enumeration))
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        match self {
            Value::Text(text) => text.is_empty(),
            Value::Integer(number) => *number == 0,
            Value::Categorical(choice) => choice.is_unspecified(),
        }
    }

    /// Returns true when `self`, used as a query value, accepts `stored`.
    ///
    /// # Panics
    ///
    /// Panics when the two values carry different tags. Records are validated
    /// against a static key→tag binding, so a mismatch here means a schema
    /// defect upstream rather than a query that simply failed.
    pub fn matches(&self, stored: &Value, mode: TextMode) -> bool {
        assert_eq!(
            self.tag(),
            stored.tag(),
            "tag mismatch comparing query {self:?} with stored {stored:?}"
        );
        if self.is_wildcard() {
            return true;
        }
        match (self, stored) {
            (Value::Text(wanted), Value::Text(have)) => text_matches(wanted, have, mode),
            (Value::Integer(wanted), Value::Integer(have)) => wanted == have,
            (Value::Categorical(wanted), Value::Categorical(have)) => wanted == have,
            _ => unreachable!("tags compared equal above"),
        }
    }

    /// Parse a literal into the shape `key` requires.
    ///
    /// Integers are parsed as base-10 `i64`; categorical names match their
    /// canonical spelling case-insensitively; text is kept verbatim.
    pub fn parse_for(key: FieldKey, raw: &str) -> Result<Self, CatalogueError> {
        let invalid = || CatalogueError::InvalidLiteral {
            key,
            expected: key.tag(),
            raw: raw.to_string(),
        };
        match key.tag() {
            ValueTag::Text => Ok(Value::Text(raw.to_string())),
            ValueTag::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| invalid()),
            ValueTag::Categorical(enumeration) => Choice::parse(enumeration, raw)
                .map(Value::Categorical)
                .ok_or_else(invalid),
        }
    }
}

fn text_matches(wanted: &str, have: &str, mode: TextMode) -> bool {
    let wanted = wanted.to_lowercase();
    let have = have.to_lowercase();
    match mode {
        TextMode::Exact => have == wanted,
        TextMode::Prefix => have.starts_with(&wanted),
    }
}

/// Rendering used by record output: text is single-quoted, categoricals are
/// lower-case variant names, integers print as-is.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => write!(f, "'{text}'"),
            Value::Integer(number) => write!(f, "{number}"),
            Value::Categorical(choice) => f.write_str(choice.variant_name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Integer(number) => serializer.serialize_i64(*number),
            Value::Categorical(choice) => serializer.serialize_str(choice.variant_name()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<Kind> for Value {
    fn from(value: Kind) -> Self {
        Value::Categorical(Choice::Kind(value))
    }
}

impl From<Genre> for Value {
    fn from(value: Genre) -> Self {
        Value::Categorical(Choice::Genre(value))
    }
}

impl From<Region> for Value {
    fn from(value: Region) -> Self {
        Value::Categorical(Choice::Region(value))
    }
}

impl From<Subject> for Value {
    fn from(value: Subject) -> Self {
        Value::Categorical(Choice::Subject(value))
    }
}
