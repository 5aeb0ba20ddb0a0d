//! Store (branch) CRUD endpoints — public read, admin write

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::models::Store;
use crate::state::AppState;

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct StoreRequest {
    pub name: String,
    pub address: String,
}

/// GET /api/stores
pub async fn list_stores(State(state): State<AppState>) -> ApiResult<Vec<Store>> {
    let stores = db::stores::list(&state.pool).await.map_err(internal)?;
    Ok(Json(stores))
}

/// POST /api/stores
pub async fn create_store(
    State(state): State<AppState>,
    Json(req): Json<StoreRequest>,
) -> Result<(StatusCode, Json<Store>), AppError> {
    if req.name.trim().is_empty() || req.address.trim().is_empty() {
        return Err(AppError::validation("Nombre y dirección son requeridos"));
    }
    let store = db::stores::create(&state.pool, req.name.trim(), req.address.trim())
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(store)))
}

/// PUT /api/stores/{id}
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<StoreRequest>,
) -> ApiResult<Store> {
    let store = db::stores::update(&state.pool, id, req.name.trim(), req.address.trim())
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Sucursal no encontrada"))?;
    Ok(Json(store))
}

/// DELETE /api/stores/{id}
pub async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::stores::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::not_found("Sucursal no encontrada"));
    }
    Ok(Json(serde_json::json!({ "message": "Sucursal eliminada" })))
}
