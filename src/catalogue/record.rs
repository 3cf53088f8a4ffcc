//! Immutable field maps built through schema validation.

use crate::catalogue::identity::{Choice, FieldKey, Kind};
use crate::catalogue::schema::Schema;
use crate::error::SchemaViolation;
use crate::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A validated, possibly partial, set of fields tagged with a category.
///
/// The same type serves as stored entry and as query. A key that is absent
/// is "don't care" when the record is used as a query.
#[derive(Clone, Debug)]
pub struct Record {
    kind: Kind,
    schema: Arc<Schema>,
    fields: BTreeMap<FieldKey, Value>,
}

impl Record {
    /// Validate `pairs` against `schema` and build the record.
    ///
    /// Construction is all-or-nothing: the first offending pair aborts it.
    /// Against a category schema the record always ends up with a `KIND`
    /// field naming that category; an explicit `KIND` naming another
    /// category is rejected. The open schema only builds uncategorised
    /// records, so a concrete `KIND` there is a conflict too; resolve it
    /// with `declared_kind` and pick that category's schema instead.
    pub fn create(
        schema: &Arc<Schema>,
        pairs: impl IntoIterator<Item = (FieldKey, Value)>,
    ) -> Result<Self, SchemaViolation> {
        let mut fields = BTreeMap::new();
        for (key, value) in pairs {
            schema.check(key, &value)?;
            if fields.insert(key, value).is_some() {
                return Err(SchemaViolation::DuplicateKey { key });
            }
        }

        let declared = match fields.get(&FieldKey::Kind) {
            Some(Value::Categorical(Choice::Kind(kind))) => *kind,
            _ => Kind::Unspecified,
        };
        if !declared.is_unspecified() && declared != schema.kind() {
            return Err(SchemaViolation::KindConflict {
                kind: schema.kind(),
                declared,
            });
        }
        if !schema.is_open() {
            fields.insert(FieldKey::Kind, Value::from(schema.kind()));
        }

        Ok(Self {
            kind: schema.kind(),
            schema: Arc::clone(schema),
            fields,
        })
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The schema that validated this record; it also supplies the text
    /// comparison mode when the record is used as a query.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn get(&self, key: FieldKey) -> Option<&Value> {
        self.fields.get(&key)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    /// Fields in key order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &Value)> + '_ {
        self.fields.iter().map(|(key, value)| (*key, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// The category named by the first `KIND` pair, `Unspecified` when there is
/// none.
pub fn declared_kind<'a>(pairs: impl IntoIterator<Item = &'a (FieldKey, Value)>) -> Kind {
    pairs
        .into_iter()
        .find_map(|(key, value)| match (key, value) {
            (FieldKey::Kind, Value::Categorical(Choice::Kind(kind))) => Some(*kind),
            _ => None,
        })
        .unwrap_or(Kind::Unspecified)
}

/// Records compare by category and fields; the schema handle is not part of
/// a record's identity.
impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.fields == other.fields
    }
}

impl Eq for Record {}

/// `{KIND: fiction, TITLE: 'Carrie', YEAR: 1974}`, keys in declaration order.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (idx, (key, value)) in self.fields.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key.field_name(), value)?;
        }
        map.end()
    }
}
