//! Persistence for categories.

use sqlx::PgPool;

use crate::models::{Category, CategoryInput};

#[derive(Clone, Debug)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, color FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }

    pub async fn get(&self, id: i64) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, color FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Skills reference categories by name; this is the resolution
    /// point for their writes.
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>("SELECT id, name, color FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn create(&self, input: &CategoryInput) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, color)
            VALUES ($1, $2)
            RETURNING id, name, color
            "#,
        )
        .bind(&input.name)
        .bind(&input.color)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn replace(
        &self,
        id: i64,
        input: &CategoryInput,
    ) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, color = $3
            WHERE id = $1
            RETURNING id, name, color
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.color)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
