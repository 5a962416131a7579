use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the payments router
///
/// # Routes
/// - `POST /api/checkout/create` - Open a video checkout session
/// - `POST /api/shop/checkout` - Open a shop checkout session
/// - `GET /api/checkout/status/:session_id` - Poll and settle
/// - `POST /api/webhook/stripe` - Processor webhook
pub fn payments_routes() -> Router {
    Router::new()
        .route("/api/checkout/create", post(handlers::create_video_checkout))
        .route("/api/shop/checkout", post(handlers::create_shop_checkout))
        .route(
            "/api/checkout/status/:session_id",
            get(handlers::checkout_status),
        )
        .route("/api/webhook/stripe", post(handlers::stripe_webhook))
}
