//! Error handling for the techtree API
//!
//! All client-visible failures are represented as `ApiError` and
//! rendered as field-keyed JSON bodies, so a caller always learns
//! which field violated which constraint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Errors surfaced by API handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("field '{field}' is not allowed in a partial update")]
    DisallowedField { field: String },

    #[error("partial update payload contains no updatable fields")]
    EmptyUpdate,

    #[error("{field}: {message}")]
    Conflict { field: &'static str, message: String },

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl ApiError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ApiError::NotFound { entity, id }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // Unique-name violations come back from Postgres as 23505;
        // translate them instead of surfacing a generic 500.
        if let sqlx::Error::Database(ref db) = err {
            if db.code().as_deref() == Some("23505") {
                return ApiError::Conflict {
                    field: "name",
                    message: "a record with this name already exists".to_string(),
                };
            }
        }
        ApiError::Database(err)
    }
}

/// Body keyed by the offending field, DRF-style: `{"level": ["..."]}`.
fn field_keyed(field: &str, message: &str) -> Value {
    let mut map = serde_json::Map::new();
    map.insert(field.to_string(), json!([message]));
    Value::Object(map)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::NotFound { .. } => {
                (StatusCode::NOT_FOUND, json!({ "detail": self.to_string() }))
            }
            ApiError::Validation { field, message } => {
                (StatusCode::BAD_REQUEST, field_keyed(field, message))
            }
            ApiError::DisallowedField { field } => (
                StatusCode::BAD_REQUEST,
                field_keyed(field, "this field is not allowed in a partial update"),
            ),
            ApiError::EmptyUpdate => (
                StatusCode::BAD_REQUEST,
                json!({ "non_field_errors": ["payload contains no updatable fields"] }),
            ),
            ApiError::Conflict { field, message } => {
                (StatusCode::CONFLICT, field_keyed(field, message))
            }
            ApiError::Database(err) => {
                tracing::error!("database error: {:?}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "detail": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
