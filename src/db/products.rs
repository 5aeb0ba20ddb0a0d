//! Product database operations
//!
//! `create_product` is the one multi-statement write on this resource: the
//! product row, its image rows, and its initial stock rows commit as a single
//! transaction, so a constraint failure (e.g. duplicate SKU) leaves nothing
//! behind.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::models::{ProductSummary, StockEntry};

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.sku, p.category_id, \
     c.name AS category_name, p.created_at, p.updated_at";

pub async fn list(
    pool: &PgPool,
    category: Option<&str>,
) -> Result<Vec<ProductSummary>, sqlx::Error> {
    match category {
        Some(name) => {
            sqlx::query_as(&format!(
                "SELECT {PRODUCT_COLUMNS}
                 FROM products p
                 LEFT JOIN categories c ON p.category_id = c.id
                 WHERE c.name = $1
                 ORDER BY p.created_at DESC"
            ))
            .bind(name)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as(&format!(
                "SELECT {PRODUCT_COLUMNS}
                 FROM products p
                 LEFT JOIN categories c ON p.category_id = c.id
                 ORDER BY p.created_at DESC"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ProductSummary>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {PRODUCT_COLUMNS}
         FROM products p
         LEFT JOIN categories c ON p.category_id = c.id
         WHERE p.id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_image_filenames(pool: &PgPool, product_id: i64) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT filename FROM product_images WHERE product_id = $1 ORDER BY id")
        .bind(product_id)
        .fetch_all(pool)
        .await
}

/// Fields for a new product row
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: Decimal,
    pub sku: &'a str,
    pub category_id: i64,
}

/// Create a product with its image rows and initial stock rows, atomically.
///
/// The first image becomes the thumbnail. Empty `image_filenames` or `stock`
/// are valid (product with no images / no initial inventory).
pub async fn create_product(
    pool: &PgPool,
    data: &NewProduct<'_>,
    image_filenames: &[String],
    stock: &[StockEntry],
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (product_id,): (i64,) = sqlx::query_as(
        "INSERT INTO products (name, description, price, sku, category_id)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.sku)
    .bind(data.category_id)
    .fetch_one(&mut *tx)
    .await?;

    for (i, filename) in image_filenames.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_images (product_id, filename, is_thumbnail)
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(filename)
        .bind(i == 0)
        .execute(&mut *tx)
        .await?;
    }

    if !stock.is_empty() {
        let product_ids: Vec<i64> = stock.iter().map(|_| product_id).collect();
        let store_ids: Vec<i64> = stock.iter().map(|s| s.store_id).collect();
        let quantities: Vec<i32> = stock.iter().map(|s| s.quantity).collect();
        sqlx::query(
            "INSERT INTO product_stock (product_id, store_id, quantity)
             SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[])",
        )
        .bind(&product_ids)
        .bind(&store_ids)
        .bind(&quantities)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(product_id)
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    data: &NewProduct<'_>,
) -> Result<Option<ProductSummary>, sqlx::Error> {
    let updated: Option<(i64,)> = sqlx::query_as(
        "UPDATE products SET
            name = $1,
            description = $2,
            price = $3,
            sku = $4,
            category_id = $5,
            updated_at = now()
         WHERE id = $6
         RETURNING id",
    )
    .bind(data.name)
    .bind(data.description)
    .bind(data.price)
    .bind(data.sku)
    .bind(data.category_id)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match updated {
        Some(_) => find_by_id(pool, id).await,
        None => Ok(None),
    }
}

/// Delete a product; image and stock rows cascade. Returns the filenames of
/// the deleted image rows so the caller can remove the files from disk.
pub async fn delete(pool: &PgPool, id: i64) -> Result<Option<Vec<String>>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let filenames: Vec<String> =
        sqlx::query_scalar("SELECT filename FROM product_images WHERE product_id = $1")
            .bind(id)
            .fetch_all(&mut *tx)
            .await?;

    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }
    Ok(Some(filenames))
}
