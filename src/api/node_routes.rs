//! CRUD endpoints for graph nodes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use sqlx::PgPool;

use crate::api::partial_update::{check_patch_fields, take_field, NODE_PATCH_FIELDS};
use crate::database::NodeRepository;
use crate::error::ApiError;
use crate::models::{Node, NodeInput, NodeType};

/// GET /api/nodes
async fn list_nodes(State(pool): State<PgPool>) -> Result<Json<Vec<Node>>, ApiError> {
    let nodes = NodeRepository::new(pool).list().await?;
    Ok(Json(nodes))
}

/// POST /api/nodes
async fn create_node(
    State(pool): State<PgPool>,
    Json(input): Json<NodeInput>,
) -> Result<(StatusCode, Json<Node>), ApiError> {
    let node = NodeRepository::new(pool).create(&input).await?;
    Ok((StatusCode::CREATED, Json(node)))
}

/// GET /api/nodes/{id}
async fn get_node(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<Node>, ApiError> {
    let node = NodeRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("node", id))?;
    Ok(Json(node))
}

/// PUT /api/nodes/{id}
async fn replace_node(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(input): Json<NodeInput>,
) -> Result<Json<Node>, ApiError> {
    let node = NodeRepository::new(pool)
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("node", id))?;
    Ok(Json(node))
}

/// PATCH /api/nodes/{id}
async fn patch_node(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<Node>, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("non_field_errors", "expected a JSON object"))?;
    check_patch_fields(payload, NODE_PATCH_FIELDS)?;

    let repo = NodeRepository::new(pool);
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("node", id))?;

    let mut input = NodeInput {
        name: current.name,
        node_type: current.node_type,
        category: current.category,
        description: current.description,
        tags: current.tags,
    };
    if let Some(name) = take_field::<String>(payload, "name")? {
        input.name = name;
    }
    if let Some(node_type) = take_field::<NodeType>(payload, "node_type")? {
        input.node_type = node_type;
    }
    if let Some(category) = take_field::<String>(payload, "category")? {
        input.category = category;
    }
    if let Some(description) = take_field::<String>(payload, "description")? {
        input.description = description;
    }
    if let Some(tags) = take_field::<Vec<String>>(payload, "tags")? {
        input.tags = tags;
    }

    let node = repo
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("node", id))?;
    Ok(Json(node))
}

/// DELETE /api/nodes/{id}
///
/// Relations referencing the node are cascaded away by the store.
async fn delete_node(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !NodeRepository::new(pool).delete(id).await? {
        return Err(ApiError::not_found("node", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_node_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/nodes", get(list_nodes).post(create_node))
        .route(
            "/api/nodes/:id",
            get(get_node)
                .put(replace_node)
                .patch(patch_node)
                .delete(delete_node),
        )
        .with_state(pool)
}
