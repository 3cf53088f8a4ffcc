//! Ordered, append-only record store with query-by-example lookup.
//!
//! Lookups scan every record in insertion order; the store is meant for
//! catalogues of a few thousand entries at most. Matches come back in the
//! order they were added and duplicates are kept.

use crate::catalogue::identity::{FieldKey, Kind};
use crate::catalogue::matcher::is_match;
use crate::catalogue::record::{Record, declared_kind};
use crate::catalogue::schema::SchemaSet;
use crate::error::CatalogueError;
use crate::value::{TextMode, Value};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Clone, Debug, Default)]
pub struct Catalogue {
    schemas: SchemaSet,
    records: Vec<Record>,
}

impl Catalogue {
    pub fn new(schemas: SchemaSet) -> Self {
        Self {
            schemas,
            records: Vec::new(),
        }
    }

    /// Empty catalogue over the library schemas compared with `mode`.
    pub fn with_text_mode(mode: TextMode) -> Self {
        Self::new(SchemaSet::library(mode))
    }

    pub fn schemas(&self) -> &SchemaSet {
        &self.schemas
    }

    /// Append an already validated record.
    pub fn add(&mut self, record: Record) {
        debug!(kind = %record.kind(), position = self.records.len(), "adding record");
        self.records.push(record);
    }

    /// Validate `pairs` against the `kind` schema and append the result.
    ///
    /// Nothing is appended when validation fails.
    pub fn insert(
        &mut self,
        kind: Kind,
        pairs: impl IntoIterator<Item = (FieldKey, Value)>,
    ) -> Result<&Record, CatalogueError> {
        let record = self.query(kind, pairs)?;
        let position = self.records.len();
        self.add(record);
        Ok(&self.records[position])
    }

    /// Build a query record against this catalogue's schemas.
    ///
    /// With `Kind::Unspecified` a `KIND` pair picks the category schema and
    /// every other pair is checked against it. Without one the query is open:
    /// it may name any key and crosses categories.
    pub fn query(
        &self,
        kind: Kind,
        pairs: impl IntoIterator<Item = (FieldKey, Value)>,
    ) -> Result<Record, CatalogueError> {
        let pairs: Vec<(FieldKey, Value)> = pairs.into_iter().collect();
        let kind = if kind.is_unspecified() {
            declared_kind(&pairs)
        } else {
            kind
        };
        Ok(Record::create(self.schemas.schema(kind), pairs)?)
    }

    /// Every stored record matching `query`, in insertion order.
    ///
    /// An empty result means no matches; this never fails.
    pub fn find(&self, query: &Record) -> Vec<&Record> {
        let matches: Vec<&Record> = self
            .records
            .iter()
            .filter(|candidate| is_match(query, candidate))
            .collect();
        debug!(
            kind = %query.kind(),
            scanned = self.records.len(),
            matched = matches.len(),
            "find complete"
        );
        matches
    }

    /// Category-scoped lookup: only `kind` records are scanned, and a query
    /// of any other category is refused rather than answered with nothing.
    pub fn find_in(&self, kind: Kind, query: &Record) -> Result<Vec<&Record>, CatalogueError> {
        if query.kind() != kind {
            return Err(CatalogueError::CategoryMismatch {
                expected: kind,
                query: query.kind(),
            });
        }
        Ok(self
            .records
            .iter()
            .filter(|candidate| candidate.kind() == kind)
            .filter(|candidate| is_match(query, candidate))
            .collect())
    }

    /// Number of stored records per category, uncategorised ones under
    /// `Kind::Unspecified`.
    pub fn count_by_kind(&self) -> BTreeMap<Kind, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            *counts.entry(record.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::identity::{Genre, Region};
    use crate::error::SchemaViolation;

    fn two_novels() -> Catalogue {
        let mut catalogue = Catalogue::default();
        catalogue
            .insert(
                Kind::Fiction,
                [
                    (FieldKey::Title, Value::text("Life of Pi")),
                    (FieldKey::Last, Value::text("Martel")),
                    (FieldKey::First, Value::text("Yann")),
                    (FieldKey::Year, Value::Integer(2003)),
                    (FieldKey::Genre, Value::from(Genre::Adventure)),
                ],
            )
            .unwrap();
        catalogue
            .insert(
                Kind::Fiction,
                [
                    (FieldKey::Title, Value::text("Carrie")),
                    (FieldKey::Last, Value::text("King")),
                    (FieldKey::First, Value::text("Stephen")),
                    (FieldKey::Year, Value::Integer(1974)),
                    (FieldKey::Genre, Value::from(Genre::Horror)),
                ],
            )
            .unwrap();
        catalogue
    }

    #[test]
    fn failed_insert_leaves_catalogue_untouched() {
        let mut catalogue = two_novels();
        let err = catalogue
            .insert(Kind::Fiction, [(FieldKey::Region, Value::from(Region::India))])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogueError::Schema(SchemaViolation::UnknownKey { .. })
        ));
        assert_eq!(catalogue.len(), 2);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let mut catalogue = two_novels();
        let copy = catalogue.iter().next().cloned().unwrap();
        catalogue.add(copy.clone());
        let matches = catalogue.find(&copy);
        assert_eq!(matches.len(), 2);
        assert!(std::ptr::eq(matches[0], catalogue.iter().next().unwrap()));
    }

    #[test]
    fn find_in_rejects_foreign_query() {
        let catalogue = two_novels();
        let query = catalogue
            .query(Kind::Cookbook, [(FieldKey::Region, Value::from(Region::China))])
            .unwrap();
        assert_eq!(
            catalogue.find_in(Kind::Fiction, &query).unwrap_err(),
            CatalogueError::CategoryMismatch {
                expected: Kind::Fiction,
                query: Kind::Cookbook
            }
        );
        assert!(catalogue.find_in(Kind::Cookbook, &query).unwrap().is_empty());
    }

    #[test]
    fn declared_kind_selects_category_schema() {
        let mut catalogue = two_novels();
        let err = catalogue
            .insert(
                Kind::Unspecified,
                [
                    (FieldKey::Kind, Value::from(Kind::Fiction)),
                    (FieldKey::Region, Value::from(Region::China)),
                ],
            )
            .unwrap_err();
        assert_eq!(
            err,
            CatalogueError::Schema(SchemaViolation::UnknownKey {
                kind: Kind::Fiction,
                key: FieldKey::Region
            })
        );
        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.count_by_kind().get(&Kind::Fiction), Some(&2));

        let err = catalogue
            .query(
                Kind::Unspecified,
                [
                    (FieldKey::Kind, Value::from(Kind::Cookbook)),
                    (FieldKey::Genre, Value::from(Genre::Horror)),
                ],
            )
            .unwrap_err();
        assert_eq!(
            err,
            CatalogueError::Schema(SchemaViolation::UnknownKey {
                kind: Kind::Cookbook,
                key: FieldKey::Genre
            })
        );

        let query = catalogue
            .query(
                Kind::Unspecified,
                [
                    (FieldKey::Kind, Value::from(Kind::Fiction)),
                    (FieldKey::Last, Value::text("King")),
                ],
            )
            .unwrap();
        assert_eq!(query.kind(), Kind::Fiction);
        assert!(query.schema().contains(FieldKey::Genre));
        assert!(!query.schema().contains(FieldKey::Region));
        assert_eq!(catalogue.find_in(Kind::Fiction, &query).unwrap().len(), 1);
    }

    #[test]
    fn counts_group_by_kind() {
        let mut catalogue = two_novels();
        catalogue
            .insert(Kind::Cookbook, [(FieldKey::Last, Value::text("Child"))])
            .unwrap();
        let counts = catalogue.count_by_kind();
        assert_eq!(counts.get(&Kind::Fiction), Some(&2));
        assert_eq!(counts.get(&Kind::Cookbook), Some(&1));
        assert_eq!(counts.get(&Kind::HowTo), None);
    }
}
