//! Persistence for typed edges between nodes.

use sqlx::PgPool;

use crate::models::{Relation, RelationFilter, RelationInput, RelationRow};

#[derive(Clone, Debug)]
pub struct RelationRepository {
    pool: PgPool,
}

fn into_relation(row: RelationRow) -> Result<Relation, sqlx::Error> {
    Relation::try_from(row).map_err(|e| sqlx::Error::Decode(e.into()))
}

impl RelationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List edges matching the filter, ordered by id. Strength bounds
    /// are inclusive on both ends; a `None` criterion is a no-op.
    pub async fn list(&self, filter: &RelationFilter) -> Result<Vec<Relation>, sqlx::Error> {
        let rows = sqlx::query_as::<_, RelationRow>(
            r#"
            SELECT id, from_node_id, to_node_id, relation_type, strength, context
            FROM relations
            WHERE ($1::text IS NULL OR relation_type = $1)
              AND ($2::text IS NULL OR context = $2)
              AND ($3::float8 IS NULL OR strength >= $3)
              AND ($4::float8 IS NULL OR strength <= $4)
            ORDER BY id
            "#,
        )
        .bind(&filter.relation_type)
        .bind(&filter.context)
        .bind(filter.min_strength)
        .bind(filter.max_strength)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_relation).collect()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Relation>, sqlx::Error> {
        let row = sqlx::query_as::<_, RelationRow>(
            r#"
            SELECT id, from_node_id, to_node_id, relation_type, strength, context
            FROM relations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_relation).transpose()
    }

    pub async fn create(&self, input: &RelationInput) -> Result<Relation, sqlx::Error> {
        let row = sqlx::query_as::<_, RelationRow>(
            r#"
            INSERT INTO relations (from_node_id, to_node_id, relation_type, strength, context)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, from_node_id, to_node_id, relation_type, strength, context
            "#,
        )
        .bind(input.from_node_id)
        .bind(input.to_node_id)
        .bind(input.relation_type.to_string())
        .bind(input.strength)
        .bind(&input.context)
        .fetch_one(&self.pool)
        .await?;

        into_relation(row)
    }

    pub async fn replace(
        &self,
        id: i64,
        input: &RelationInput,
    ) -> Result<Option<Relation>, sqlx::Error> {
        let row = sqlx::query_as::<_, RelationRow>(
            r#"
            UPDATE relations
            SET from_node_id = $2, to_node_id = $3, relation_type = $4,
                strength = $5, context = $6
            WHERE id = $1
            RETURNING id, from_node_id, to_node_id, relation_type, strength, context
            "#,
        )
        .bind(id)
        .bind(input.from_node_id)
        .bind(input.to_node_id)
        .bind(input.relation_type.to_string())
        .bind(input.strength)
        .bind(&input.context)
        .fetch_optional(&self.pool)
        .await?;

        row.map(into_relation).transpose()
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM relations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
