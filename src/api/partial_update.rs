//! Declarative partial-update restrictions.
//!
//! Each entity declares the set of fields a PATCH payload may touch.
//! The check runs once, before any validation or mutation: an unknown
//! or disallowed key rejects the whole request, and a payload that
//! touches no permitted field is rejected as a no-op. Node, Relation
//! and Category permit all writable fields; Skill is deliberately
//! narrowed to the user-facing pair.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const NODE_PATCH_FIELDS: &[&str] =
    &["name", "node_type", "category", "description", "tags"];
pub const RELATION_PATCH_FIELDS: &[&str] = &[
    "from_node_id",
    "to_node_id",
    "relation_type",
    "strength",
    "context",
];
pub const SKILL_PATCH_FIELDS: &[&str] = &["level", "user_comment"];
pub const CATEGORY_PATCH_FIELDS: &[&str] = &["name", "color"];

/// Gate a PATCH payload against an entity's allowlist.
pub fn check_patch_fields(
    payload: &Map<String, Value>,
    allowed: &[&str],
) -> Result<(), ApiError> {
    for key in payload.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(ApiError::DisallowedField { field: key.clone() });
        }
    }
    if payload.is_empty() {
        return Err(ApiError::EmptyUpdate);
    }
    Ok(())
}

/// Extract and deserialize one field from a PATCH payload. `None`
/// means the field is absent (leave the stored value alone); a present
/// value of the wrong shape is a field-keyed validation error.
pub fn take_field<T: DeserializeOwned>(
    payload: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<T>, ApiError> {
    match payload.get(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| ApiError::validation(key, e.to_string())),
    }
}
