//! Unified error system for movistore-server
//!
//! - [`ErrorCode`]: standardized error codes with HTTP status mapping
//! - [`AppError`]: error type carried through handlers
//! - [`ApiResponse`]: JSON envelope used for error bodies
//! - [`ServiceError`]: service-layer bridge between the db layer and [`AppError`]

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Unified error code enum
///
/// Codes are organized by category:
/// - 0xxx: general errors
/// - 1xxx: authentication errors
/// - 2xxx: permission errors
/// - 6xxx: catalog/stock errors
/// - 9xxx: system errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,

    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    /// Permission denied
    PermissionDenied = 2001,
    /// Admin role required
    AdminRequired = 2003,

    /// Not enough stock to fulfil a requested quantity
    InsufficientStock = 6003,

    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
}

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AlreadyExists => StatusCode::CONFLICT,
            Self::NotAuthenticated | Self::TokenExpired | Self::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,
            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,
            // InvalidCredentials deliberately maps to 400: the public API has
            // always answered failed logins with 400 "Credenciales inválidas".
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidCredentials
            | Self::InsufficientStock => StatusCode::BAD_REQUEST,
        }
    }

    /// Default user-facing message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::ValidationFailed => "Faltan campos requeridos",
            Self::NotFound => "Recurso no encontrado",
            Self::AlreadyExists => "El recurso ya existe",
            Self::InvalidRequest => "Solicitud inválida",
            Self::NotAuthenticated => "No autorizado, no hay token",
            Self::InvalidCredentials => "Credenciales inválidas",
            Self::TokenExpired => "No autorizado, el token expiró",
            Self::TokenInvalid => "No autorizado, el token falló",
            Self::PermissionDenied => "Acceso denegado",
            Self::AdminRequired => "Acceso denegado, no eres administrador",
            Self::InsufficientStock => "No hay stock suficiente",
            Self::InternalError | Self::DatabaseError => "Error del servidor",
        }
    }

    /// Numeric code value
    pub fn code(&self) -> u16 {
        *self as u16
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// Error returned when deserializing an unknown error code
#[derive(Debug, Clone, Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Success),
            2 => Ok(Self::ValidationFailed),
            3 => Ok(Self::NotFound),
            4 => Ok(Self::AlreadyExists),
            5 => Ok(Self::InvalidRequest),
            1001 => Ok(Self::NotAuthenticated),
            1002 => Ok(Self::InvalidCredentials),
            1003 => Ok(Self::TokenExpired),
            1004 => Ok(Self::TokenInvalid),
            2001 => Ok(Self::PermissionDenied),
            2003 => Ok(Self::AdminRequired),
            6003 => Ok(Self::InsufficientStock),
            9001 => Ok(Self::InternalError),
            9002 => Ok(Self::DatabaseError),
            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Application error with structured error code and message
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, msg)
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }
}

/// Unified API response envelope used for error bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Error code (0 for success, non-zero for errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    /// Human-readable message
    pub message: String,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiResponse<()> {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::<()>::error(&self);

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }

        (status, Json(body)).into_response()
    }
}

/// Service-layer error — only two variants, keeps things simple.
///
/// - `Db`: database/infrastructure errors (auto-logged, mapped to InternalError)
/// - `App`: business-rule errors (transparent pass-through to client)
#[derive(Debug)]
pub enum ServiceError {
    /// Database or infrastructure error
    Db(BoxError),
    /// Business-rule error (already an AppError with the correct ErrorCode)
    App(AppError),
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_status_follows_taxonomy() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ErrorCode::TokenExpired.http_status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_credentials_is_bad_request() {
        // Login failures have always been 400, not 401
        let err = AppError::new(ErrorCode::InvalidCredentials);
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "Credenciales inválidas");
    }

    #[test]
    fn insufficient_stock_keeps_custom_message() {
        let err = AppError::with_message(
            ErrorCode::InsufficientStock,
            "No hay stock suficiente para el producto 7",
        );
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
        let body = ApiResponse::<()>::error(&err);
        assert_eq!(body.code, Some(6003));
        assert_eq!(body.message, "No hay stock suficiente para el producto 7");
    }

    #[test]
    fn error_code_round_trips_through_u16() {
        for code in [
            ErrorCode::ValidationFailed,
            ErrorCode::InvalidCredentials,
            ErrorCode::AdminRequired,
            ErrorCode::InsufficientStock,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()).unwrap(), code);
        }
        assert!(ErrorCode::try_from(4242).is_err());
    }

    #[test]
    fn service_error_maps_db_to_internal() {
        let err: AppError = ServiceError::Db("connection reset".into()).into();
        assert_eq!(err.code, ErrorCode::InternalError);

        let app = AppError::new(ErrorCode::NotFound);
        let err: AppError = ServiceError::App(app.clone()).into();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
