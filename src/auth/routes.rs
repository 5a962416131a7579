//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/register` - Email/password registration
/// - `POST /api/auth/login` - Email/password login
/// - `POST /api/auth/session` - Identity-provider session exchange
/// - `POST /api/auth/logout` - Delete cookie session
/// - `GET /api/me` - Get current user information
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/session", post(handlers::exchange_session))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/me", get(handlers::me_handler))
}
