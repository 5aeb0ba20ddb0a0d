//! JWT authentication and role gating
//!
//! Two middlewares compose in sequence: `auth_middleware` verifies the bearer
//! token and inserts an [`AuthUser`] extension; `require_admin` rejects
//! requests whose role claim is not admin.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorCode};
use crate::state::AppState;

/// User role claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    /// Parse a role as stored in the users table
    pub fn from_db(s: &str) -> Option<Self> {
        match s {
            "customer" => Some(Self::Customer),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }
}

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub id: i64,
    /// User role
    pub role: Role,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user identity extracted from JWT
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub role: Role,
}

/// Tokens are valid for 30 days; there is no revocation list
const JWT_EXPIRY_DAYS: i64 = 30;

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    role: Role,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        id: user_id,
        role,
        exp: (now + chrono::Duration::days(JWT_EXPIRY_DAYS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and return its claims
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::new(ErrorCode::TokenExpired),
        _ => AppError::new(ErrorCode::TokenInvalid),
    })
}

/// Middleware that extracts and verifies the user JWT from the Authorization header
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let claims = verify_token(token, &state.jwt_secret).map_err(|e| {
        tracing::debug!("JWT validation failed: {}", e.message);
        e.into_response()
    })?;

    request.extensions_mut().insert(AuthUser {
        id: claims.id,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Middleware that requires the role claim populated by `auth_middleware` to be admin
pub async fn require_admin(request: Request, next: Next) -> Result<Response, Response> {
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.role == Role::Admin => Ok(next.run(request).await),
        Some(_) => Err(AppError::new(ErrorCode::AdminRequired).into_response()),
        None => Err(AppError::new(ErrorCode::NotAuthenticated).into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip() {
        let token = create_token(42, Role::Customer, SECRET).unwrap();
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.id, 42);
        assert_eq!(claims.role, Role::Customer);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(1, Role::Admin, SECRET).unwrap();
        let err = verify_token(&token, "other-secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = chrono::Utc::now();
        let claims = Claims {
            id: 1,
            role: Role::Customer,
            exp: (now - chrono::Duration::hours(1)).timestamp() as usize,
            iat: (now - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        let err = verify_token(&token, SECRET).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn role_serializes_as_legacy_strings() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(Role::from_db("customer"), Some(Role::Customer));
        assert_eq!(Role::from_db("root"), None);
    }
}
