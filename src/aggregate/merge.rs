//! Ordered merge with first-seen deduplication

use super::identity::IdentityKey;
use crate::types::UserRecord;
use serde_json::Value;
use std::collections::HashSet;

/// Accumulates region results in the order they are pushed.
///
/// A record whose identity key was already seen is dropped, so the first
/// occurrence (earlier region, then earlier position) wins.
#[derive(Debug, Default)]
pub struct Merger {
    seen: HashSet<IdentityKey>,
    records: Vec<UserRecord>,
    duplicates: usize,
}

impl Merger {
    /// Create an empty merger
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one record. Returns `false` when it was a duplicate.
    pub fn push(&mut self, record: UserRecord) -> bool {
        if self.seen.insert(IdentityKey::of(&record)) {
            self.records.push(record);
            true
        } else {
            self.duplicates += 1;
            false
        }
    }

    /// Push the records of one region, tagging them with its code
    pub fn push_region(&mut self, region: &str, records: Vec<UserRecord>) {
        for record in records {
            let key = IdentityKey::of(&record);
            if self.seen.insert(key) {
                self.records.push(annotate_region(record, region));
            } else {
                self.duplicates += 1;
            }
        }
    }

    /// Number of dropped duplicates
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of merged records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether nothing was merged
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the merger and return the records
    pub fn into_records(self) -> Vec<UserRecord> {
        self.records
    }
}

/// Deduplicate records by identity key, keeping the first occurrence
pub fn dedupe(records: impl IntoIterator<Item = UserRecord>) -> Vec<UserRecord> {
    let mut merger = Merger::new();
    for record in records {
        merger.push(record);
    }
    merger.into_records()
}

/// Set `region` on an object record that has no usable region of its own
pub fn annotate_region(mut record: UserRecord, region: &str) -> UserRecord {
    if let Value::Object(map) = &mut record {
        let missing = match map.get("region") {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty(),
            Some(_) => false,
        };
        if missing {
            map.insert("region".to_string(), Value::String(region.to_string()));
        }
    }
    record
}
