// src/shop/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::serialize_json_column;

/// Shop item database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct ShopItem {
    pub item_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    pub stock: i64,
    pub created_at: String,
}

/// Shop order database model
///
/// `shipping_address` is a JSON snapshot taken at checkout time; it is
/// serialized back to a JSON object in API responses.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub user_id: String,
    pub item_id: String,
    pub item_name: String,
    pub quantity: i64,
    pub total_amount: f64,
    #[serde(serialize_with = "serialize_json_column")]
    pub shipping_address: Option<String>,
    pub status: String,
    pub payment_status: String,
    pub session_id: Option<String>,
    pub created_at: String,
}

/// Create/update payload for a shop item
#[derive(Deserialize, Debug)]
pub struct ShopItemRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
    pub category: String,
    #[serde(default)]
    pub stock: i64,
}

#[derive(Deserialize, Debug)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Serialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
