//! Order database operations
//!
//! `place_order` is the consistency-critical path: stock validation, stock
//! decrement, order + order_items insertion, and the stock_movements audit
//! rows all happen inside one transaction. The conditional UPDATE with
//! `quantity >= $n` holds a row lock per stock row, so concurrent orders
//! against the same (product, store) cannot drive quantity negative; the
//! loser of the race either decrements the remainder or fails cleanly.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{AppError, ErrorCode, ServiceError};
use crate::models::{Order, OrderItemDetail, OrderItemInput, OrderWithUser};

/// Place an order: all-or-nothing.
///
/// Returns the new order id. Insufficient stock (or a missing stock row for
/// the product/store pair) aborts the whole transaction with a descriptive
/// business error.
pub async fn place_order(
    pool: &PgPool,
    user_id: i64,
    store_id: i64,
    items: &[OrderItemInput],
) -> Result<i64, ServiceError> {
    let mut tx = pool.begin().await?;

    let mut total = Decimal::ZERO;
    for item in items {
        let updated = sqlx::query(
            "UPDATE product_stock
             SET quantity = quantity - $1
             WHERE product_id = $2 AND store_id = $3 AND quantity >= $1",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .bind(store_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Dropping the transaction rolls back every decrement so far
            return Err(ServiceError::App(AppError::with_message(
                ErrorCode::InsufficientStock,
                format!(
                    "No hay stock suficiente para el producto {}",
                    item.product_id
                ),
            )));
        }

        total += item.unit_price * Decimal::from(item.quantity);
    }

    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (user_id, store_id, total, status)
         VALUES ($1, $2, $3, 'pending')
         RETURNING id",
    )
    .bind(user_id)
    .bind(store_id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    let order_ids: Vec<i64> = items.iter().map(|_| order_id).collect();
    let product_ids: Vec<i64> = items.iter().map(|i| i.product_id).collect();
    let quantities: Vec<i32> = items.iter().map(|i| i.quantity).collect();
    let unit_prices: Vec<Decimal> = items.iter().map(|i| i.unit_price).collect();

    sqlx::query(
        "INSERT INTO order_items (order_id, product_id, quantity, unit_price)
         SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::numeric[])",
    )
    .bind(&order_ids)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&unit_prices)
    .execute(&mut *tx)
    .await?;

    let store_ids: Vec<i64> = items.iter().map(|_| store_id).collect();
    let changes: Vec<i32> = items.iter().map(|i| -i.quantity).collect();
    let reasons: Vec<String> = items.iter().map(|_| format!("order:{order_id}")).collect();

    sqlx::query(
        "INSERT INTO stock_movements (product_id, store_id, change, reason)
         SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::integer[], $4::text[])",
    )
    .bind(&product_ids)
    .bind(&store_ids)
    .bind(&changes)
    .bind(&reasons)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(order_id)
}

pub async fn list_by_user(pool: &PgPool, user_id: i64) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_items(pool: &PgPool, order_id: i64) -> Result<Vec<OrderItemDetail>, sqlx::Error> {
    sqlx::query_as(
        "SELECT oi.product_id, p.name, oi.quantity, oi.unit_price
         FROM order_items oi
         JOIN products p ON oi.product_id = p.id
         WHERE oi.order_id = $1
         ORDER BY oi.id",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<OrderWithUser>, sqlx::Error> {
    sqlx::query_as(
        "SELECT o.id, o.user_id, o.store_id, o.total, o.status, o.created_at,
                u.name AS user_name
         FROM orders o
         JOIN users u ON o.user_id = u.id
         ORDER BY o.created_at DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn update_status(
    pool: &PgPool,
    id: i64,
    status: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("UPDATE orders SET status = $1 WHERE id = $2 RETURNING *")
        .bind(status)
        .bind(id)
        .fetch_optional(pool)
        .await
}
