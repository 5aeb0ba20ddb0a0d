//! API routes for movistore-server

pub mod auth;
pub mod categories;
pub mod health;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, require_admin};
use crate::error::AppError;
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Log a db-layer error and hide it behind a generic server error
pub(crate) fn internal(e: impl Into<BoxError>) -> AppError {
    let e = e.into();
    tracing::error!(error = %e, "Database error");
    AppError::new(crate::error::ErrorCode::InternalError)
}

/// Create the full application router
pub fn create_router(state: AppState) -> Router {
    // Public catalog reads and account endpoints
    let public = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/products", get(products::list_products))
        .route("/api/products/{id}", get(products::get_product))
        .route("/api/categories", get(categories::list_categories))
        .route("/api/stores", get(stores::list_stores));

    // Any authenticated user
    let authenticated = Router::new()
        .route("/api/orders", post(orders::create_order))
        .route("/api/orders/myorders", get(orders::my_orders))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/users/profile", get(users::get_profile))
        .route("/api/users/profile", put(users::update_profile))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Admin only
    let admin = Router::new()
        .route("/api/products", post(products::create_product))
        .route("/api/products/{id}", put(products::update_product))
        .route("/api/products/{id}", delete(products::delete_product))
        .route("/api/categories", post(categories::create_category))
        .route("/api/categories/{id}", put(categories::update_category))
        .route("/api/categories/{id}", delete(categories::delete_category))
        .route("/api/stores", post(stores::create_store))
        .route("/api/stores/{id}", put(stores::update_store))
        .route("/api/stores/{id}", delete(stores::delete_store))
        .route("/api/orders", get(orders::list_orders))
        .route("/api/orders/{id}/status", put(orders::update_order_status))
        .route("/api/users", get(users::list_users))
        .route("/api/users/{id}", delete(users::delete_user))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(authenticated)
        .merge(admin)
        .nest_service("/images", ServeDir::new(&state.image_dir))
        // Room for 5 image files of 5 MB each plus the form fields
        .layer(DefaultBodyLimit::max(30 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
