//! Category CRUD endpoints — public read, admin write

use axum::{
    Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::Deserialize;

use crate::db;
use crate::error::AppError;
use crate::models::Category;
use crate::state::AppState;

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub description: Option<String>,
}

/// GET /api/categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = db::categories::list(&state.pool).await.map_err(internal)?;
    Ok(Json(categories))
}

/// POST /api/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::validation("El nombre es requerido"));
    }
    let category = db::categories::create(&state.pool, req.name.trim(), req.description.as_deref())
        .await
        .map_err(internal)?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> ApiResult<Category> {
    let category =
        db::categories::update(&state.pool, id, req.name.trim(), req.description.as_deref())
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::not_found("Categoría no encontrada"))?;
    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::categories::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if !deleted {
        return Err(AppError::not_found("Categoría no encontrada"));
    }
    Ok(Json(serde_json::json!({ "message": "Categoría eliminada" })))
}
