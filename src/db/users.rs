//! User database operations

use sqlx::PgPool;

use crate::models::{PublicUser, User};

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<PublicUser, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO users (name, email, password_hash, role)
         VALUES ($1, $2, $3, $4)
         RETURNING id, name, email, role",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
}

pub async fn find_public(pool: &PgPool, id: i64) -> Result<Option<PublicUser>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, email, role FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Partial profile update; None fields keep their current value
pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    name: Option<&str>,
    email: Option<&str>,
    password_hash: Option<&str>,
) -> Result<Option<PublicUser>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE users SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            password_hash = COALESCE($3, password_hash)
         WHERE id = $4
         RETURNING id, name, email, role",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<PublicUser>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, email, role FROM users ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// Returns true when a row was actually deleted
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
