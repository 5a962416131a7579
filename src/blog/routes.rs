use super::handlers;
use axum::{
    routing::{delete, get},
    Router,
};

/// Creates the blog router with post and comment routes
pub fn blog_routes() -> Router {
    Router::new()
        .route(
            "/api/blog",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/blog/:id",
            get(handlers::get_post).delete(handlers::delete_post),
        )
        .route(
            "/api/blog/:id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/api/comments/:id", delete(handlers::delete_comment))
}
