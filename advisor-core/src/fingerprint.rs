//! Deterministic fingerprint of a decision record.
//!
//! Canonical form is the serde_json rendering: struct fields serialize in
//! declaration order and every map in the record is a `BTreeMap`, so the
//! same record always produces the same bytes. Two runs over identical
//! inputs must fingerprint identically.

use crate::enrich::DecisionRecord;

/// BLAKE3 hex digest of the record's canonical JSON.
pub fn fingerprint(record: &DecisionRecord) -> String {
    let json = serde_json::to_string(record).expect("decision record serialization failed");
    blake3::hash(json.as_bytes()).to_hex().to_string()
}
