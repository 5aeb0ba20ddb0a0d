//! Order endpoints
//!
//! Placement delegates to `db::orders::place_order`, the transactional path
//! that validates and decrements stock. Its business errors (insufficient
//! stock) pass through to the caller verbatim; everything else becomes a
//! generic server error.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::auth::{AuthUser, Role};
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::{Order, OrderItemDetail, OrderItemInput, OrderStatus, OrderWithUser};
use crate::state::AppState;

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub store_id: i64,
    pub items: Vec<OrderItemInput>,
}

/// Reject empty orders and non-positive quantities before touching the db
pub(crate) fn validate_items(items: &[OrderItemInput]) -> Result<(), AppError> {
    if items.is_empty() {
        return Err(AppError::validation("Faltan datos para crear la orden"));
    }
    if items.iter().any(|i| i.quantity <= 0) {
        return Err(AppError::validation(
            "La cantidad de cada producto debe ser positiva",
        ));
    }
    if items.iter().any(|i| i.unit_price.is_sign_negative()) {
        return Err(AppError::validation(
            "El precio unitario no puede ser negativo",
        ));
    }
    Ok(())
}

/// POST /api/orders
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    validate_items(&req.items)?;

    let order_id = db::orders::place_order(&state.pool, user.id, req.store_id, &req.items).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Orden creada exitosamente",
            "orderId": order_id,
        })),
    ))
}

/// GET /api/orders/myorders
pub async fn my_orders(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Order>> {
    let orders = db::orders::list_by_user(&state.pool, user.id)
        .await
        .map_err(internal)?;
    Ok(Json(orders))
}

/// Order detail with its line items
#[derive(Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// GET /api/orders/{id} — owner or admin only
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<OrderDetail> {
    let order = db::orders::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Orden no encontrada"))?;

    if order.user_id != user.id && user.role != Role::Admin {
        return Err(AppError::with_message(
            ErrorCode::PermissionDenied,
            "No autorizado para ver esta orden",
        ));
    }

    let items = db::orders::list_items(&state.pool, id)
        .await
        .map_err(internal)?;

    Ok(Json(OrderDetail { order, items }))
}

/// GET /api/orders (admin)
pub async fn list_orders(State(state): State<AppState>) -> ApiResult<Vec<OrderWithUser>> {
    let orders = db::orders::list_all(&state.pool).await.map_err(internal)?;
    Ok(Json(orders))
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /api/orders/{id}/status (admin)
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Order> {
    let status = OrderStatus::from_db(&req.status)
        .ok_or_else(|| AppError::validation("Estado de orden inválido"))?;

    let order = db::orders::update_status(&state.pool, id, status.as_str())
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Orden no encontrada"))?;

    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn item(product_id: i64, quantity: i32, unit_price: &str) -> OrderItemInput {
        OrderItemInput {
            product_id,
            quantity,
            unit_price: unit_price.parse::<Decimal>().unwrap(),
        }
    }

    #[test]
    fn empty_order_is_rejected() {
        let err = validate_items(&[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn non_positive_quantity_is_rejected() {
        assert!(validate_items(&[item(1, 0, "9.99")]).is_err());
        assert!(validate_items(&[item(1, -2, "9.99")]).is_err());
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        assert!(validate_items(&[item(1, 1, "-0.01")]).is_err());
    }

    #[test]
    fn well_formed_items_pass() {
        assert!(validate_items(&[item(1, 2, "19.99"), item(2, 1, "5.00")]).is_ok());
    }
}
