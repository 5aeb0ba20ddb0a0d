//! Category database operations

use sqlx::PgPool;

use crate::models::Category;

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, description FROM categories ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: Option<&str>,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO categories (name, description) VALUES ($1, $2)
         RETURNING id, name, description",
    )
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE categories SET name = $1, description = $2 WHERE id = $3
         RETURNING id, name, description",
    )
    .bind(name)
    .bind(description)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
