use super::handlers;
use axum::{
    routing::{get, post},
    Router,
};

/// Creates the video catalog router
pub fn videos_routes() -> Router {
    Router::new()
        .route(
            "/api/videos",
            get(handlers::list_videos).post(handlers::create_video),
        )
        .route(
            "/api/videos/:id",
            get(handlers::get_video).delete(handlers::delete_video),
        )
        .route("/api/my-videos", get(handlers::my_videos))
}
