//! Authentication endpoints: register, login

use axum::{Json, extract::State};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::auth::{Role, create_token};
use crate::db;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::{ApiResult, internal};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration and login answer with the same shape
#[derive(Serialize)]
pub struct AuthResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub token: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::validation(
            "Por favor, introduce todos los campos",
        ));
    }

    let email = req.email.trim().to_lowercase();

    let existing = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(internal)?;
    if existing.is_some() {
        return Err(AppError::with_message(
            ErrorCode::ValidationFailed,
            "El usuario ya existe",
        ));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = db::users::create(
        &state.pool,
        req.name.trim(),
        &email,
        &password_hash,
        Role::Customer.as_str(),
    )
    .await
    .map_err(internal)?;

    let token = create_token(user.id, Role::Customer, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            token,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }

    let role = Role::from_db(&user.role).ok_or_else(|| {
        tracing::error!(user_id = user.id, role = %user.role, "Unknown role in users table");
        AppError::new(ErrorCode::InternalError)
    })?;

    let token = create_token(user.id, role, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(AuthResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
        token,
    }))
}
