//! Per-category field sets.
//!
//! A schema names the keys a category admits and the text comparison mode of
//! each. Tags are not stored here: every key is bound to exactly one tag by
//! `FieldKey::tag`, and a schema only selects which keys apply.

use crate::catalogue::identity::{FieldKey, Kind};
use crate::error::SchemaViolation;
use crate::value::{TextMode, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

const SHARED_KEYS: [FieldKey; 4] = [
    FieldKey::Kind,
    FieldKey::Title,
    FieldKey::Last,
    FieldKey::First,
];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schema {
    kind: Kind,
    fields: BTreeMap<FieldKey, TextMode>,
}

impl Schema {
    /// Schema for `kind` admitting `keys`, every text key compared with `mode`.
    pub fn new(kind: Kind, keys: impl IntoIterator<Item = FieldKey>, mode: TextMode) -> Self {
        Self {
            kind,
            fields: keys.into_iter().map(|key| (key, mode)).collect(),
        }
    }

    /// Override the comparison mode of one key. Keys outside the schema are
    /// left out.
    pub fn with_field_mode(mut self, key: FieldKey, mode: TextMode) -> Self {
        if let Some(slot) = self.fields.get_mut(&key) {
            *slot = mode;
        }
        self
    }

    /// The open schema admits every key and has no category of its own.
    pub fn open(mode: TextMode) -> Self {
        Self::new(Kind::Unspecified, FieldKey::ALL, mode)
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.kind.is_unspecified()
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldKey> + '_ {
        self.fields.keys().copied()
    }

    /// Comparison mode for `key`; keys outside the schema fall back to exact.
    pub fn text_mode(&self, key: FieldKey) -> TextMode {
        self.fields.get(&key).copied().unwrap_or_default()
    }

    /// Check one pair against the schema.
    pub fn check(&self, key: FieldKey, value: &Value) -> Result<(), SchemaViolation> {
        if !self.contains(key) {
            return Err(SchemaViolation::UnknownKey {
                kind: self.kind,
                key,
            });
        }
        let expected = key.tag();
        let actual = value.tag();
        if expected != actual {
            return Err(SchemaViolation::WrongTag {
                key,
                expected,
                actual,
            });
        }
        Ok(())
    }
}

/// The schemas of the library catalogue, shared by every record built from it.
#[derive(Clone, Debug)]
pub struct SchemaSet {
    text_mode: TextMode,
    fiction: Arc<Schema>,
    cookbook: Arc<Schema>,
    howto: Arc<Schema>,
    open: Arc<Schema>,
}

impl SchemaSet {
    /// Fiction, cookbook and how-to schemas plus the open schema, with every
    /// text field compared using `mode`.
    pub fn library(mode: TextMode) -> Self {
        let with = |kind: Kind, extra: FieldKey| {
            Arc::new(Schema::new(
                kind,
                SHARED_KEYS.into_iter().chain([extra]),
                mode,
            ))
        };
        Self {
            text_mode: mode,
            fiction: Arc::new(Schema::new(
                Kind::Fiction,
                SHARED_KEYS
                    .into_iter()
                    .chain([FieldKey::Year, FieldKey::Genre]),
                mode,
            )),
            cookbook: with(Kind::Cookbook, FieldKey::Region),
            howto: with(Kind::HowTo, FieldKey::Subject),
            open: Arc::new(Schema::open(mode)),
        }
    }

    pub fn text_mode(&self) -> TextMode {
        self.text_mode
    }

    /// Schema for `kind`; `Kind::Unspecified` yields the open schema.
    pub fn schema(&self, kind: Kind) -> &Arc<Schema> {
        match kind {
            Kind::Fiction => &self.fiction,
            Kind::Cookbook => &self.cookbook,
            Kind::HowTo => &self.howto,
            Kind::Unspecified => &self.open,
        }
    }
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self::library(TextMode::default())
    }
}
