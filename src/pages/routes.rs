use super::handlers;
use axum::{routing::get, Router};

/// Creates the marketing pages router
pub fn pages_routes() -> Router {
    Router::new()
        .route("/api/pages", get(handlers::list_pages))
        .route(
            "/api/pages/:id",
            get(handlers::get_page).put(handlers::update_page),
        )
}
