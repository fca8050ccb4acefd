//! CRUD endpoints for typed edges, with list-time narrowing.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::PgPool;

use crate::api::partial_update::{check_patch_fields, take_field, RELATION_PATCH_FIELDS};
use crate::database::{NodeRepository, RelationRepository};
use crate::error::ApiError;
use crate::models::validation::{parse_strength_bound, validate_strength};
use crate::models::{Relation, RelationFilter, RelationInput, RelationType};

/// Query parameters for the relation list. The strength bounds arrive
/// as raw strings: an unparseable bound is dropped (fail-open) rather
/// than rejected, so filtering stays lenient while writes stay strict.
#[derive(Debug, Deserialize)]
pub struct RelationListQuery {
    pub relation_type: Option<String>,
    pub context: Option<String>,
    pub min_strength: Option<String>,
    pub max_strength: Option<String>,
}

impl RelationListQuery {
    fn into_filter(self) -> RelationFilter {
        RelationFilter {
            relation_type: self.relation_type,
            context: self.context,
            min_strength: parse_strength_bound(self.min_strength.as_deref()),
            max_strength: parse_strength_bound(self.max_strength.as_deref()),
        }
    }
}

/// Both endpoints of an edge must resolve before anything is written,
/// so a dangling reference fails with the field named instead of a
/// raw constraint error.
async fn check_endpoints(pool: &PgPool, input: &RelationInput) -> Result<(), ApiError> {
    let nodes = NodeRepository::new(pool.clone());
    if !nodes.exists(input.from_node_id).await? {
        return Err(ApiError::validation(
            "from_node_id",
            format!("unknown node {}", input.from_node_id),
        ));
    }
    if !nodes.exists(input.to_node_id).await? {
        return Err(ApiError::validation(
            "to_node_id",
            format!("unknown node {}", input.to_node_id),
        ));
    }
    Ok(())
}

/// GET /api/relations?relation_type=&context=&min_strength=&max_strength=
async fn list_relations(
    State(pool): State<PgPool>,
    Query(query): Query<RelationListQuery>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    let relations = RelationRepository::new(pool)
        .list(&query.into_filter())
        .await?;
    Ok(Json(relations))
}

/// POST /api/relations
async fn create_relation(
    State(pool): State<PgPool>,
    Json(input): Json<RelationInput>,
) -> Result<(StatusCode, Json<Relation>), ApiError> {
    validate_strength(input.strength)?;
    check_endpoints(&pool, &input).await?;
    let relation = RelationRepository::new(pool).create(&input).await?;
    Ok((StatusCode::CREATED, Json(relation)))
}

/// GET /api/relations/{id}
async fn get_relation(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<Relation>, ApiError> {
    let relation = RelationRepository::new(pool)
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("relation", id))?;
    Ok(Json(relation))
}

/// PUT /api/relations/{id}
async fn replace_relation(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(input): Json<RelationInput>,
) -> Result<Json<Relation>, ApiError> {
    validate_strength(input.strength)?;
    check_endpoints(&pool, &input).await?;
    let relation = RelationRepository::new(pool)
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("relation", id))?;
    Ok(Json(relation))
}

/// PATCH /api/relations/{id}
async fn patch_relation(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<Relation>, ApiError> {
    let payload = payload
        .as_object()
        .ok_or_else(|| ApiError::validation("non_field_errors", "expected a JSON object"))?;
    check_patch_fields(payload, RELATION_PATCH_FIELDS)?;

    let repo = RelationRepository::new(pool.clone());
    let current = repo
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("relation", id))?;

    let mut input = RelationInput {
        from_node_id: current.from_node_id,
        to_node_id: current.to_node_id,
        relation_type: current.relation_type,
        strength: current.strength,
        context: current.context,
    };
    if let Some(from) = take_field::<i64>(payload, "from_node_id")? {
        input.from_node_id = from;
    }
    if let Some(to) = take_field::<i64>(payload, "to_node_id")? {
        input.to_node_id = to;
    }
    if let Some(kind) = take_field::<RelationType>(payload, "relation_type")? {
        input.relation_type = kind;
    }
    if let Some(strength) = take_field::<f64>(payload, "strength")? {
        input.strength = strength;
    }
    if let Some(context) = take_field::<Option<String>>(payload, "context")? {
        input.context = context;
    }

    validate_strength(input.strength)?;
    check_endpoints(&pool, &input).await?;

    let relation = repo
        .replace(id, &input)
        .await?
        .ok_or_else(|| ApiError::not_found("relation", id))?;
    Ok(Json(relation))
}

/// DELETE /api/relations/{id}
async fn delete_relation(
    State(pool): State<PgPool>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !RelationRepository::new(pool).delete(id).await? {
        return Err(ApiError::not_found("relation", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_relation_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/relations", get(list_relations).post(create_relation))
        .route(
            "/api/relations/:id",
            get(get_relation)
                .put(replace_relation)
                .patch(patch_relation)
                .delete(delete_relation),
        )
        .with_state(pool)
}
