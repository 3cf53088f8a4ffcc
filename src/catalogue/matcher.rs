//! Query-by-example comparison between two records.

use crate::catalogue::record::Record;

/// Returns true when `candidate` satisfies every constraint in `query`.
///
/// Rules, in order:
/// - a categorised query only matches records of the same category;
/// - a key absent from the query imposes nothing;
/// - a key present with its wildcard value imposes nothing;
/// - any other query key must exist on the candidate and match under the
///   query schema's comparison mode for that key.
///
/// A candidate missing a key the query constrains is a mismatch, not a
/// wildcard. This asymmetry with query-side absence is deliberate and kept.
pub fn is_match(query: &Record, candidate: &Record) -> bool {
    let kind = query.kind();
    if !kind.is_unspecified() && kind != candidate.kind() {
        return false;
    }
    let schema = query.schema();
    query.fields().all(|(key, wanted)| {
        if wanted.is_wildcard() {
            return true;
        }
        match candidate.get(key) {
            Some(stored) => wanted.matches(stored, schema.text_mode(key)),
            None => false,
        }
    })
}
