//! Database connection management and per-entity repositories.
//!
//! The schema is externally owned: repositories only read and write
//! rows, never issue DDL. Reference definitions live in
//! `sql/schema.sql`.

use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

mod category_repository;
mod node_repository;
mod relation_repository;
mod skill_repository;

pub use category_repository::CategoryRepository;
pub use node_repository::NodeRepository;
pub use relation_repository::RelationRepository;
pub use skill_repository::SkillRepository;

/// Connection settings, read from the environment.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub connection_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost:5432/techtree".to_string()),
            max_connections: std::env::var("DATABASE_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            connection_timeout: Duration::from_secs(30),
        }
    }
}

/// Build a connection pool from the given configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("connecting to database: {}", config.database_url);
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connection_timeout)
        .connect(&config.database_url)
        .await
}
