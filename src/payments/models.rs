// src/payments/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Purchase-kind discriminator carried in transaction rows and processor
/// metadata
pub const KIND_VIDEO: &str = "video";
pub const KIND_SHOP: &str = "shop";

/// Payment transaction database model, one row per checkout session.
///
/// `status` is the local lifecycle state; `payment_status` mirrors the
/// processor's report.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct PaymentTransaction {
    pub transaction_id: String,
    pub session_id: String,
    pub user_id: String,
    pub kind: String,
    pub video_id: Option<String>,
    pub order_id: Option<String>,
    pub item_id: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub status: String,
    pub payment_status: String,
    pub created_at: String,
}

/// Video entitlement database model
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct Purchase {
    pub purchase_id: String,
    pub user_id: String,
    pub video_id: String,
    pub session_id: String,
    pub amount: Option<f64>,
    pub status: String,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct CheckoutRequest {
    pub video_id: String,
    pub origin_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ShippingAddress {
    pub full_name: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: String,
}

#[derive(Deserialize, Debug)]
pub struct ShopCheckoutRequest {
    pub item_id: String,
    pub quantity: i64,
    pub shipping_address: ShippingAddress,
    pub origin_url: String,
}

#[derive(Serialize, Debug)]
pub struct CheckoutResponse {
    pub url: String,
    pub session_id: String,
}

#[derive(Serialize, Debug)]
pub struct CheckoutStatusResponse {
    pub status: String,
    pub payment_status: String,
}

/// Webhook acknowledgment; always `received: true`
#[derive(Serialize, Debug)]
pub struct WebhookAck {
    pub received: bool,
}
