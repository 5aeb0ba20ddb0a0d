//! Store (branch) database operations

use sqlx::PgPool;

use crate::models::Store;

pub async fn list(pool: &PgPool) -> Result<Vec<Store>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, address FROM stores ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, name: &str, address: &str) -> Result<Store, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO stores (name, address) VALUES ($1, $2)
         RETURNING id, name, address",
    )
    .bind(name)
    .bind(address)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    name: &str,
    address: &str,
) -> Result<Option<Store>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE stores SET name = $1, address = $2 WHERE id = $3
         RETURNING id, name, address",
    )
    .bind(name)
    .bind(address)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM stores WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
