// src/blog/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Blog post database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct BlogPost {
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: String,
}

/// Blog post projection carrying its comment count
#[derive(FromRow, Serialize, Debug)]
pub struct BlogPostWithCount {
    pub post_id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: String,
    pub comments_count: i64,
}

/// Comment database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Comment {
    pub comment_id: String,
    pub post_id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateBlogPostRequest {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub cover_image: String,
    pub category: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
