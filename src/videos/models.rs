// src/videos/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog video database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub price: f64,
    pub duration: String,
    pub category: String,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub price: f64,
    pub duration: String,
    pub category: String,
}

/// API view of a video. The playback URL is withheld unless the caller has
/// a completed purchase.
#[derive(Serialize, Debug)]
pub struct VideoResponse {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: Option<String>,
    pub price: f64,
    pub duration: String,
    pub category: String,
    pub created_at: String,
    pub is_purchased: bool,
}

impl VideoResponse {
    pub fn from_video(video: Video, is_purchased: bool) -> Self {
        Self {
            video_id: video.video_id,
            title: video.title,
            description: video.description,
            thumbnail_url: video.thumbnail_url,
            video_url: if is_purchased {
                Some(video.video_url)
            } else {
                None
            },
            price: video.price,
            duration: video.duration,
            category: video.category,
            created_at: video.created_at,
            is_purchased,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
