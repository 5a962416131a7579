// src/pages/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::serialize_json_array_column;

/// Marketing page content, keyed by slug.
///
/// `features` is a JSON array stored in a TEXT column and serialized back
/// to a real array in responses.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Page {
    pub page_id: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub image_url: String,
    #[serde(serialize_with = "serialize_json_array_column")]
    pub features: Option<String>,
}

/// Partial update payload; absent fields keep their stored value
#[derive(Deserialize, Debug)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub features: Option<Vec<serde_json::Value>>,
}
