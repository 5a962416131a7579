//! Video catalog handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{CreateVideoRequest, MessageResponse, Video, VideoResponse};
use super::validators::VideoValidator;
use crate::auth::{AuthedUser, MaybeUser};
use crate::common::{generate_id, now_rfc3339, ApiError, AppState, EntityPrefix, Validator};

/// GET /api/videos - List the catalog
///
/// Anonymous callers see every video without playback URLs; signed-in
/// callers additionally see which videos they own.
pub async fn list_videos(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(user): MaybeUser,
) -> Result<Json<Vec<VideoResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    let videos: Vec<Video> = sqlx::query_as::<_, Video>("SELECT * FROM videos ORDER BY created_at")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let purchased = match &user {
        Some(user) => purchased_video_ids(&state, &user.user_id).await?,
        None => HashSet::new(),
    };

    let result = videos
        .into_iter()
        .map(|video| {
            let is_purchased = purchased.contains(&video.video_id);
            VideoResponse::from_video(video, is_purchased)
        })
        .collect();

    Ok(Json(result))
}

/// GET /api/videos/:id - Get a single video
pub async fn get_video(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    MaybeUser(user): MaybeUser,
    Path(video_id): Path<String>,
) -> Result<Json<VideoResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let video: Video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE video_id = ?")
        .bind(&video_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    let is_purchased = match &user {
        Some(user) => has_completed_purchase(&state, &user.user_id, &video_id).await?,
        None => false,
    };

    Ok(Json(VideoResponse::from_video(video, is_purchased)))
}

/// POST /api/videos - Create a video (admin)
pub async fn create_video(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateVideoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let validation = VideoValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let video = Video {
        video_id: generate_id(EntityPrefix::Video),
        title: request.title,
        description: request.description,
        thumbnail_url: request.thumbnail_url,
        video_url: request.video_url,
        price: request.price,
        duration: request.duration,
        category: request.category,
        created_at: now_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO videos (video_id, title, description, thumbnail_url, video_url, price, duration, category, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&video.video_id)
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.thumbnail_url)
    .bind(&video.video_url)
    .bind(video.price)
    .bind(&video.duration)
    .bind(&video.category)
    .bind(&video.created_at)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(video_id = %video.video_id, "Video created");

    Ok((
        StatusCode::CREATED,
        Json(VideoResponse::from_video(video, false)),
    ))
}

/// DELETE /api/videos/:id - Delete a video (admin)
pub async fn delete_video(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(video_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query("DELETE FROM videos WHERE video_id = ?")
        .bind(&video_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Video not found".to_string()));
    }

    info!(video_id = %video_id, "Video deleted");

    Ok(Json(MessageResponse {
        message: "Video deleted successfully".to_string(),
    }))
}

/// GET /api/my-videos - Videos the caller has completed purchases for
pub async fn my_videos(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
) -> Result<Json<Vec<VideoResponse>>, ApiError> {
    let state = state_lock.read().await.clone();

    let videos: Vec<Video> = sqlx::query_as::<_, Video>(
        "SELECT v.* FROM videos v \
         JOIN purchases p ON p.video_id = v.video_id \
         WHERE p.user_id = ? AND p.status = 'completed' \
         ORDER BY v.created_at",
    )
    .bind(&user.user_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let result = videos
        .into_iter()
        .map(|video| VideoResponse::from_video(video, true))
        .collect();

    Ok(Json(result))
}

// ---- Helper Functions ----

async fn purchased_video_ids(
    state: &AppState,
    user_id: &str,
) -> Result<HashSet<String>, ApiError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT video_id FROM purchases WHERE user_id = ? AND status = 'completed'",
    )
    .bind(user_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(rows.into_iter().map(|(video_id,)| video_id).collect())
}

pub async fn has_completed_purchase(
    state: &AppState,
    user_id: &str,
    video_id: &str,
) -> Result<bool, ApiError> {
    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT purchase_id FROM purchases \
         WHERE user_id = ? AND video_id = ? AND status = 'completed'",
    )
    .bind(user_id)
    .bind(video_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(existing.is_some())
}
