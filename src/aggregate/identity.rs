//! Identity keys for deduplication

use crate::fields::{first_of, ID_KEYS};
use crate::types::UserRecord;

/// Key under which two records are considered the same user
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IdentityKey {
    /// First non-empty of `id`, `user_id`, `uuid`
    Id(String),
    /// `email:first_name:last_name` for records without an identifier.
    ///
    /// Distinct users sharing all three fields collapse into one.
    Fields(String),
    /// Serialized record, used when nothing else identifies it
    Value(String),
}

impl IdentityKey {
    /// Compute the identity key of a record
    pub fn of(record: &UserRecord) -> Self {
        if let Some(id) = first_of(record, ID_KEYS) {
            return Self::Id(id);
        }

        let parts = ["email", "first_name", "last_name"].map(|key| {
            first_of(record, &[key]).unwrap_or_default()
        });
        if parts.iter().any(|part| !part.is_empty()) {
            return Self::Fields(parts.join(":"));
        }

        Self::Value(record.to_string())
    }
}
