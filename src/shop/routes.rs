use super::handlers;
use axum::{
    routing::{get, put},
    Router,
};

/// Creates the shop router with item and order routes
pub fn shop_routes() -> Router {
    Router::new()
        .route(
            "/api/shop/items",
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/api/shop/items/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/api/shop/orders", get(handlers::my_orders))
        .route("/api/admin/orders", get(handlers::all_orders))
        .route(
            "/api/admin/orders/:id/status",
            put(handlers::update_order_status),
        )
}
