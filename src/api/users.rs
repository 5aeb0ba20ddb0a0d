//! User endpoints — self-service profile plus admin user management

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::models::PublicUser;
use crate::state::AppState;
use crate::util::hash_password;

use super::{ApiResult, internal};

/// GET /api/users/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<PublicUser> {
    let profile = db::users::find_public(&state.pool, user.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::not_found("Usuario no encontrado"))?;
    Ok(Json(profile))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// PUT /api/users/profile — partial update, password re-hashed when supplied
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<PublicUser> {
    let password_hash = match req.password.as_deref() {
        Some(password) if !password.is_empty() => Some(hash_password(password).map_err(|e| {
            tracing::error!("Password hashing failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?),
        _ => None,
    };

    let email = req.email.as_deref().map(|e| e.trim().to_lowercase());

    let profile = db::users::update_profile(
        &state.pool,
        user.id,
        req.name.as_deref(),
        email.as_deref(),
        password_hash.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or_else(|| AppError::not_found("Usuario no encontrado"))?;

    Ok(Json(profile))
}

/// GET /api/users (admin)
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<PublicUser>> {
    let users = db::users::list_all(&state.pool).await.map_err(internal)?;
    Ok(Json(users))
}

/// DELETE /api/users/{id} (admin)
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<serde_json::Value> {
    let deleted = db::users::delete(&state.pool, id).await.map_err(internal)?;
    if !deleted {
        return Err(AppError::not_found("Usuario no encontrado"));
    }
    Ok(Json(
        serde_json::json!({ "message": "Usuario eliminado correctamente" }),
    ))
}
