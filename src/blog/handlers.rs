//! Blog post and comment handlers

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{
    BlogPost, BlogPostWithCount, Comment, CreateBlogPostRequest, CreateCommentRequest,
    MessageResponse,
};
use super::validators::{BlogPostValidator, CommentValidator};
use crate::auth::AuthedUser;
use crate::common::{generate_id, now_rfc3339, ApiError, AppState, EntityPrefix, Validator};

/// GET /api/blog - List posts with comment counts, newest first
pub async fn list_posts(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
) -> Result<Json<Vec<BlogPostWithCount>>, ApiError> {
    let state = state_lock.read().await.clone();

    let posts: Vec<BlogPostWithCount> = sqlx::query_as::<_, BlogPostWithCount>(
        "SELECT b.*, \
         (SELECT COUNT(*) FROM comments c WHERE c.post_id = b.post_id) AS comments_count \
         FROM blog_posts b ORDER BY b.created_at DESC",
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(posts))
}

/// GET /api/blog/:id - Get a single post with its comment count
pub async fn get_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(post_id): Path<String>,
) -> Result<Json<BlogPostWithCount>, ApiError> {
    let state = state_lock.read().await.clone();

    let post: BlogPostWithCount = sqlx::query_as::<_, BlogPostWithCount>(
        "SELECT b.*, \
         (SELECT COUNT(*) FROM comments c WHERE c.post_id = b.post_id) AS comments_count \
         FROM blog_posts b WHERE b.post_id = ?",
    )
    .bind(&post_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?
    .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// POST /api/blog - Create a post (admin); the caller becomes the author
pub async fn create_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CreateBlogPostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let validation = BlogPostValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();
    let post = BlogPost {
        post_id: generate_id(EntityPrefix::BlogPost),
        title: request.title,
        content: request.content,
        excerpt: request.excerpt,
        cover_image: request.cover_image,
        category: request.category,
        author_id: user.user_id,
        author_name: user.name,
        created_at: now_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO blog_posts (post_id, title, content, excerpt, cover_image, category, author_id, author_name, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&post.post_id)
    .bind(&post.title)
    .bind(&post.content)
    .bind(&post.excerpt)
    .bind(&post.cover_image)
    .bind(&post.category)
    .bind(&post.author_id)
    .bind(&post.author_name)
    .bind(&post.created_at)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(post_id = %post.post_id, "Blog post created");

    Ok((StatusCode::CREATED, Json(post)))
}

/// DELETE /api/blog/:id - Delete a post and its comments (admin)
pub async fn delete_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(post_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query("DELETE FROM blog_posts WHERE post_id = ?")
        .bind(&post_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    sqlx::query("DELETE FROM comments WHERE post_id = ?")
        .bind(&post_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(post_id = %post_id, "Blog post deleted with its comments");

    Ok(Json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

/// GET /api/blog/:id/comments - List a post's comments, oldest first
pub async fn list_comments(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let state = state_lock.read().await.clone();

    let comments: Vec<Comment> = sqlx::query_as::<_, Comment>(
        "SELECT * FROM comments WHERE post_id = ? ORDER BY created_at",
    )
    .bind(&post_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(comments))
}

/// POST /api/blog/:id/comments - Comment on a post (requires auth)
pub async fn create_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(post_id): Path<String>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let validation = CommentValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let state = state_lock.read().await.clone();

    let post_exists: Option<(String,)> =
        sqlx::query_as("SELECT post_id FROM blog_posts WHERE post_id = ?")
            .bind(&post_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;
    if post_exists.is_none() {
        return Err(ApiError::NotFound("Post not found".to_string()));
    }

    let comment = Comment {
        comment_id: generate_id(EntityPrefix::Comment),
        post_id,
        user_id: user.user_id,
        user_name: user.name,
        content: request.content,
        created_at: now_rfc3339(),
    };

    sqlx::query(
        "INSERT INTO comments (comment_id, post_id, user_id, user_name, content, created_at) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&comment.comment_id)
    .bind(&comment.post_id)
    .bind(&comment.user_id)
    .bind(&comment.user_name)
    .bind(&comment.content)
    .bind(&comment.created_at)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// DELETE /api/comments/:id - Delete a comment (admin)
pub async fn delete_comment(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Path(comment_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !user.is_admin {
        return Err(ApiError::Forbidden("Admin access required".to_string()));
    }

    let state = state_lock.read().await.clone();
    let result = sqlx::query("DELETE FROM comments WHERE comment_id = ?")
        .bind(&comment_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Comment not found".to_string()));
    }

    Ok(Json(MessageResponse {
        message: "Comment deleted successfully".to_string(),
    }))
}
