//! Marketing page handlers

use axum::{
    extract::{Extension, Path},
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{Page, UpdatePageRequest};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/pages - List all pages
pub async fn list_pages(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<Page>>, ApiError> {
    let state = state_lock.read().await.clone();

    let pages: Vec<Page> = sqlx::query_as::<_, Page>("SELECT * FROM pages ORDER BY page_id")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(pages))
}

/// GET /api/pages/:id - Get a page by slug
pub async fn get_page(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(page_id): Path<String>,
) -> Result<Json<Page>, ApiError> {
    let state = state_lock.read().await.clone();

    let page: Page = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE page_id = ?")
        .bind(&page_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Page not found".to_string()))?;

    Ok(Json(page))
}

/// PUT /api/pages/:id - Update a page (admin); absent fields are untouched
pub async fn update_page(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(page_id): Path<String>,
    Json(request): Json<UpdatePageRequest>,
) -> Result<Json<Page>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();

    let features = match &request.features {
        Some(features) => Some(
            serde_json::to_string(features)
                .map_err(|e| ApiError::BadRequest(format!("invalid features: {}", e)))?,
        ),
        None => None,
    };

    let result = sqlx::query(
        "UPDATE pages SET \
         title = COALESCE(?, title), \
         subtitle = COALESCE(?, subtitle), \
         content = COALESCE(?, content), \
         image_url = COALESCE(?, image_url), \
         features = COALESCE(?, features) \
         WHERE page_id = ?",
    )
    .bind(request.title.as_deref())
    .bind(request.subtitle.as_deref())
    .bind(request.content.as_deref())
    .bind(request.image_url.as_deref())
    .bind(features.as_deref())
    .bind(&page_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Page not found".to_string()));
    }

    let page: Page = sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE page_id = ?")
        .bind(&page_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(page_id = %page_id, "Page content updated");

    Ok(Json(page))
}
