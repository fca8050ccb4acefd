//! CRUD endpoints for categories.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use sqlx::PgPool;

use crate::api::partial_update::{check_patch_fields, take_field, CATEGORY_PATCH_FIELDS};
use crate::database::CategoryRepository;
use crate::error::ApiError;
use crate::models::{Category, CategoryInput};

/// GET /api/categories
async fn list_categories(State(pool): State<PgPool>) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = CategoryRepository::new(pool).list().await?;
    Ok(Json(categories))
}

/// POST /api/categories
async fn create_category(
    State(pool): State<PgPool>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = CategoryRepository::new(pool).create(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories/{id}
async fn get_category(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<Category>, ApiError> {
    let category = CategoryRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;
    Ok(Json(category))
}

/// PUT /api/categories/{id}
async fn replace_category(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    let category = CategoryRepository::new(pool)
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;
    Ok(Json(category))
}

/// PATCH /api/categories/{id}
async fn patch_category(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<Category>, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("non_field_errors", "expected a JSON object"))?;
    check_patch_fields(payload, CATEGORY_PATCH_FIELDS)?;

    let repo = CategoryRepository::new(pool);
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;

    let mut input = CategoryInput {
        name: current.name,
        color: current.color,
    };
    if let Some(name) = take_field::<String>(payload, "name")? {
        input.name = name;
    }
    if let Some(color) = take_field::<String>(payload, "color")? {
        input.color = color;
    }

    let category = repo
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("category", id))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
async fn delete_category(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !CategoryRepository::new(pool).delete(id).await? {
        return Err(ApiError::not_found("category", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_category_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/categories", get(list_categories).post(create_category))
        .route(
            "/api/categories/:id",
            get(get_category)
                .put(replace_category)
                .patch(patch_category)
                .delete(delete_category),
        )
        .with_state(pool)
}
