//! REST API surface.
//!
//! One router per entity, merged into a single application router.
//! The surface is fully open: no authentication, permissive CORS.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;

pub mod category_routes;
pub mod node_routes;
pub mod partial_update;
pub mod relation_routes;
pub mod skill_routes;

pub use category_routes::create_category_router;
pub use node_routes::create_node_router;
pub use relation_routes::create_relation_router;
pub use skill_routes::create_skill_router;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Assemble the full API router over a shared connection pool.
pub fn create_api_router(pool: PgPool) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .merge(create_node_router(pool.clone()))
        .merge(create_relation_router(pool.clone()))
        .merge(create_skill_router(pool.clone()))
        .merge(create_category_router(pool))
}
