//! Persistence for graph nodes.

use sqlx::PgPool;

use crate::models::{Node, NodeInput, NodeRow};

/// Repository over the `nodes` table. Receives already-validated
/// input; no field checks happen here.
#[derive(Clone, Debug)]
pub struct NodeRepository {
    pool: PgPool,
}

/// A stored enum column failing to parse means the table holds data
/// this build does not know about; surface it as a decode error.
fn into_node(row: NodeRow) -> Result<Node, sqlx::Error> {
    Node::try_from(row).map_err(|e| sqlx::Error::Decode(e.into()))
}

impl NodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Node>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NodeRow>(
            r#"
            SELECT id, name, node_type, category, description, tags
            FROM nodes
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_node).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Node>, sqlx::Error> {
        let row = sqlx::query_as::<_, NodeRow>(
            r#"
            SELECT id, name, node_type, category, description, tags
            FROM nodes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_node).transpose()
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM nodes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, input: &NodeInput) -> Result<Node, sqlx::Error> {
        let row = sqlx::query_as::<_, NodeRow>(
            r#"
            INSERT INTO nodes (name, node_type, category, description, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, node_type, category, description, tags
            "#,
        )
        .bind(&input.name)
        .bind(input.node_type.to_string())
        .bind(&input.category)
        .bind(&input.description)
        .bind(&input.tags)
        .fetch_one(&self.pool)
        .await?;

        into_node(row)
    }

    /// Full replace. Returns `None` when the id is unknown.
    pub async fn replace(&self, id: i64, input: &NodeInput) -> Result<Option<Node>, sqlx::Error> {
        let row = sqlx::query_as::<_, NodeRow>(
            r#"
            UPDATE nodes
            SET name = $2, node_type = $3, category = $4, description = $5, tags = $6
            WHERE id = $1
            RETURNING id, name, node_type, category, description, tags
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.node_type.to_string())
        .bind(&input.category)
        .bind(&input.description)
        .bind(&input.tags)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_node).transpose()
    }

    /// Returns `true` when a row was deleted. Relations referencing
    /// the node go with it via the store's ON DELETE CASCADE.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
