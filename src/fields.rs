//! Field extraction for schemaless user records
//!
//! Backends disagree on field names, so each logical field is read through
//! an ordered list of candidate keys. The first non-empty scalar wins.

use crate::types::UserRecord;
use serde_json::Value;

/// Candidate keys for the user identifier
pub const ID_KEYS: &[&str] = &["id", "user_id", "uuid"];

/// Candidate keys for the email address
pub const EMAIL_KEYS: &[&str] = &["email"];

/// Candidate keys for the display name
pub const NAME_KEYS: &[&str] = &["name", "full_name"];

/// Candidate keys for the region
pub const REGION_KEYS: &[&str] = &["region", "location"];

/// Candidate keys for the status
pub const STATUS_KEYS: &[&str] = &["status", "enabled", "active"];

/// Render a scalar as a string. Empty strings and non-scalars yield `None`.
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-empty scalar among `keys`
pub fn first_of(record: &UserRecord, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find_map(scalar_string)
}

/// User identifier
pub fn id(record: &UserRecord) -> Option<String> {
    first_of(record, ID_KEYS)
}

/// Email address
pub fn email(record: &UserRecord) -> Option<String> {
    first_of(record, EMAIL_KEYS)
}

/// Display name, falling back to first and last name joined
pub fn name(record: &UserRecord) -> Option<String> {
    first_of(record, NAME_KEYS).or_else(|| {
        let joined = [first_of(record, &["first_name"]), first_of(record, &["last_name"])]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    })
}

/// Region code
pub fn region(record: &UserRecord) -> Option<String> {
    first_of(record, REGION_KEYS)
}

/// Account status
pub fn status(record: &UserRecord) -> Option<String> {
    first_of(record, STATUS_KEYS)
}
