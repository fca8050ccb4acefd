//! Persistence for skills.
//!
//! Reads always join the owning category so the API can expose the
//! denormalized `category`/`category_id`/`category_color` trio in one
//! round trip.

use std::collections::HashSet;

use sqlx::PgPool;

use crate::models::{SkillRecord, SkillView};

const SELECT_VIEW: &str = r#"
    SELECT s.id, s.name, c.name AS category, s.category_id,
           c.color AS category_color, s.level, s.description,
           s.user_comment, s.parent_id
    FROM skills s
    JOIN categories c ON c.id = s.category_id
"#;

#[derive(Clone, Debug)]
pub struct SkillRepository {
    pool: PgPool,
}

impl SkillRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<SkillView>, sqlx::Error> {
        sqlx::query_as::<_, SkillView>(&format!("{SELECT_VIEW} ORDER BY s.id"))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<SkillView>, sqlx::Error> {
        sqlx::query_as::<_, SkillView>(&format!("{SELECT_VIEW} WHERE s.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn create(&self, record: &SkillRecord) -> Result<SkillView, sqlx::Error> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO skills (name, category_id, level, description, user_comment, parent_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&record.name)
        .bind(record.category_id)
        .bind(record.level)
        .bind(&record.description)
        .bind(&record.user_comment)
        .bind(record.parent_id)
        .fetch_one(&self.pool)
        .await?;

        // The row was just inserted, so the joined read cannot miss.
        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }

    /// Write all fields of an existing skill at once. Both the full
    /// replace and the allowlisted partial update funnel through here,
    /// so a partial update is applied in a single statement.
    pub async fn update(
        &self,
        id: i64,
        record: &SkillRecord,
    ) -> Result<Option<SkillView>, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE skills
            SET name = $2, category_id = $3, level = $4,
                description = $5, user_comment = $6, parent_id = $7
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&record.name)
        .bind(record.category_id)
        .bind(record.level)
        .bind(&record.description)
        .bind(&record.user_comment)
        .bind(record.parent_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get(id).await
    }

    /// Children keep their rows on parent deletion; the store's
    /// ON DELETE SET NULL clears their parent_id.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Walk the parent chain starting at `parent_id` and report
    /// whether it reaches `skill_id`. Used to keep parent chains
    /// acyclic at write time. The visited set guards against walking
    /// forever over pre-existing corrupt data.
    pub async fn chain_contains(
        &self,
        parent_id: i64,
        skill_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut visited = HashSet::new();
        let mut current = Some(parent_id);

        while let Some(id) = current {
            if id == skill_id {
                return Ok(true);
            }
            if !visited.insert(id) {
                return Ok(false);
            }
            current = sqlx::query_scalar::<_, Option<i64>>(
                "SELECT parent_id FROM skills WHERE id = $1",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .flatten();
        }

        Ok(false)
    }
}
