//! Checkout and webhook handlers

use axum::{
    extract::{Extension, Path},
    http::HeaderMap,
    Json,
};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use super::models::{
    CheckoutRequest, CheckoutResponse, CheckoutStatusResponse, PaymentTransaction,
    ShopCheckoutRequest, WebhookAck, KIND_SHOP, KIND_VIDEO,
};
use super::reconcile;
use super::validators::{CheckoutValidator, ShopCheckoutValidator};
use crate::auth::AuthedUser;
use crate::common::{generate_id, now_rfc3339, safe_email_log, ApiError, AppState, EntityPrefix, Validator};
use crate::services::stripe::{CheckoutSessionRequest, WebhookEvent};
use crate::shop::models::ShopItem;
use crate::videos::handlers::has_completed_purchase;
use crate::videos::models::Video;

/// POST /api/checkout/create - Open a checkout session for a single video
///
/// An already-owned video is rejected with a conflict before any processor
/// call is made. A pending or failed earlier attempt does not block a retry.
pub async fn create_video_checkout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = CheckoutValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let video: Video = sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE video_id = ?")
        .bind(&request.video_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    if has_completed_purchase(&state, &user.user_id, &request.video_id).await? {
        return Err(ApiError::Conflict("video already purchased".to_string()));
    }

    let origin = request.origin_url.trim_end_matches('/');
    // {CHECKOUT_SESSION_ID} is substituted by the processor on redirect.
    let success_url = format!(
        "{}/payment-success?session_id={{CHECKOUT_SESSION_ID}}",
        origin
    );
    let cancel_url = format!("{}/videos/{}", origin, request.video_id);

    // The metadata payload is the only channel through which the webhook
    // learns what was purchased; it must fully describe the intent.
    let mut metadata = HashMap::new();
    metadata.insert("kind".to_string(), KIND_VIDEO.to_string());
    metadata.insert("video_id".to_string(), request.video_id.clone());
    metadata.insert("user_id".to_string(), user.user_id.clone());
    metadata.insert("video_title".to_string(), video.title.clone());

    let session = state
        .stripe
        .create_checkout_session(&CheckoutSessionRequest {
            amount: video.price,
            currency: "usd".to_string(),
            product_name: video.title.clone(),
            success_url,
            cancel_url,
            metadata,
        })
        .await?;

    // The transaction row lands before the checkout URL is handed back.
    sqlx::query(
        "INSERT INTO payment_transactions \
         (transaction_id, session_id, user_id, kind, video_id, order_id, item_id, amount, currency, status, payment_status, created_at) \
         VALUES (?, ?, ?, ?, ?, NULL, NULL, ?, 'usd', 'pending', 'initiated', ?)",
    )
    .bind(generate_id(EntityPrefix::Transaction))
    .bind(&session.session_id)
    .bind(&user.user_id)
    .bind(KIND_VIDEO)
    .bind(&request.video_id)
    .bind(video.price)
    .bind(now_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.user_id,
        email = %safe_email_log(&user.email),
        video_id = %request.video_id,
        session_id = %session.session_id,
        "Video checkout session opened"
    );

    Ok(Json(CheckoutResponse {
        url: session.url,
        session_id: session.session_id,
    }))
}

/// POST /api/shop/checkout - Open a checkout session for a shop order
///
/// Stock is checked here but only decremented once the payment settles.
pub async fn create_shop_checkout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    user: AuthedUser,
    Json(request): Json<ShopCheckoutRequest>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = ShopCheckoutValidator.validate(&request);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let item: ShopItem = sqlx::query_as::<_, ShopItem>("SELECT * FROM shop_items WHERE item_id = ?")
        .bind(&request.item_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Item not found".to_string()))?;

    if item.stock < request.quantity {
        return Err(ApiError::Conflict("not enough stock available".to_string()));
    }

    let total_amount = item.price * request.quantity as f64;
    let order_id = generate_id(EntityPrefix::Order);
    let shipping_address = serde_json::to_string(&request.shipping_address)
        .map_err(|e| ApiError::BadRequest(format!("invalid shipping address: {}", e)))?;

    sqlx::query(
        "INSERT INTO orders \
         (order_id, user_id, item_id, item_name, quantity, total_amount, shipping_address, status, payment_status, session_id, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, 'pending', 'initiated', NULL, ?)",
    )
    .bind(&order_id)
    .bind(&user.user_id)
    .bind(&request.item_id)
    .bind(&item.name)
    .bind(request.quantity)
    .bind(total_amount)
    .bind(&shipping_address)
    .bind(now_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let origin = request.origin_url.trim_end_matches('/');
    let success_url = format!(
        "{}/shop/order-success?session_id={{CHECKOUT_SESSION_ID}}",
        origin
    );
    let cancel_url = format!("{}/shop/{}", origin, request.item_id);

    let mut metadata = HashMap::new();
    metadata.insert("kind".to_string(), KIND_SHOP.to_string());
    metadata.insert("order_id".to_string(), order_id.clone());
    metadata.insert("item_id".to_string(), request.item_id.clone());
    metadata.insert("user_id".to_string(), user.user_id.clone());
    metadata.insert("item_name".to_string(), item.name.clone());

    let session = state
        .stripe
        .create_checkout_session(&CheckoutSessionRequest {
            amount: total_amount,
            currency: "usd".to_string(),
            product_name: item.name.clone(),
            success_url,
            cancel_url,
            metadata,
        })
        .await?;

    sqlx::query("UPDATE orders SET session_id = ? WHERE order_id = ?")
        .bind(&session.session_id)
        .bind(&order_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    sqlx::query(
        "INSERT INTO payment_transactions \
         (transaction_id, session_id, user_id, kind, video_id, order_id, item_id, amount, currency, status, payment_status, created_at) \
         VALUES (?, ?, ?, ?, NULL, ?, ?, ?, 'usd', 'pending', 'initiated', ?)",
    )
    .bind(generate_id(EntityPrefix::Transaction))
    .bind(&session.session_id)
    .bind(&user.user_id)
    .bind(KIND_SHOP)
    .bind(&order_id)
    .bind(&request.item_id)
    .bind(total_amount)
    .bind(now_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %user.user_id,
        email = %safe_email_log(&user.email),
        order_id = %order_id,
        session_id = %session.session_id,
        quantity = request.quantity,
        "Shop checkout session opened"
    );

    Ok(Json(CheckoutResponse {
        url: session.url,
        session_id: session.session_id,
    }))
}

/// GET /api/checkout/status/:session_id - Client-driven settlement path
///
/// Safe to call repeatedly: once the transaction reached paid, further polls
/// neither rewrite it nor grant again.
pub async fn checkout_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _user: AuthedUser,
    Path(session_id): Path<String>,
) -> Result<Json<CheckoutStatusResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let status = state.stripe.get_checkout_status(&session_id).await?;

    let txn: Option<PaymentTransaction> = sqlx::query_as::<_, PaymentTransaction>(
        "SELECT * FROM payment_transactions WHERE session_id = ?",
    )
    .bind(&session_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if let Some(txn) = txn {
        if txn.payment_status != "paid" {
            reconcile::record_transaction_status(
                &state.db,
                &session_id,
                &status.status,
                &status.payment_status,
            )
            .await
            .map_err(ApiError::DatabaseError)?;

            if status.payment_status == "paid" {
                settle_transaction(&state.db, &txn).await?;
            }
        }
    }

    Ok(Json(CheckoutStatusResponse {
        status: status.status,
        payment_status: status.payment_status,
    }))
}

/// POST /api/webhook/stripe - Processor-driven settlement path
///
/// The processor is always acknowledged, whatever happened internally; an
/// error response would only trigger retries of a delivery that will fail
/// the same way again.
pub async fn stripe_webhook(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    headers: HeaderMap,
    body: String,
) -> Json<WebhookAck> {
    let state = state_lock.read().await.clone();

    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    match state.stripe.handle_webhook(&body, signature) {
        Ok(event) => {
            if event.payment_status == "paid" {
                if let Err(e) = apply_paid_event(&state.db, &event).await {
                    error!(
                        error = %e,
                        session_id = %event.session_id,
                        "Webhook settlement failed"
                    );
                }
            } else {
                debug!(
                    event_type = %event.event_type,
                    payment_status = %event.payment_status,
                    "Ignoring non-paid webhook event"
                );
            }
        }
        Err(e) => error!(error = %e, "Webhook rejected"),
    }

    Json(WebhookAck { received: true })
}

// ---- Helper Functions ----

/// Settle a paid transaction from the locally stored row (poll path)
async fn settle_transaction(db: &SqlitePool, txn: &PaymentTransaction) -> Result<(), ApiError> {
    match txn.kind.as_str() {
        KIND_VIDEO => match &txn.video_id {
            Some(video_id) => {
                reconcile::grant_video_purchase(
                    db,
                    &txn.user_id,
                    video_id,
                    &txn.session_id,
                    Some(txn.amount),
                )
                .await
                .map_err(ApiError::DatabaseError)?;
            }
            None => warn!(
                transaction_id = %txn.transaction_id,
                "Video transaction missing video_id"
            ),
        },
        KIND_SHOP => match reconcile::fetch_order_by_session(db, &txn.session_id)
            .await
            .map_err(ApiError::DatabaseError)?
        {
            Some(order) => {
                reconcile::mark_order_paid(db, &order)
                    .await
                    .map_err(ApiError::DatabaseError)?;
            }
            None => warn!(
                session_id = %txn.session_id,
                "No order found for paid shop transaction"
            ),
        },
        other => warn!(kind = %other, "Unknown transaction kind"),
    }

    Ok(())
}

/// Settle a paid event from processor metadata (webhook path)
async fn apply_paid_event(db: &SqlitePool, event: &WebhookEvent) -> Result<(), sqlx::Error> {
    reconcile::record_transaction_status(db, &event.session_id, &event.status, &event.payment_status)
        .await?;

    match event.metadata.get("kind").map(String::as_str) {
        Some(KIND_VIDEO) => {
            match (event.metadata.get("video_id"), event.metadata.get("user_id")) {
                (Some(video_id), Some(user_id)) => {
                    reconcile::grant_video_purchase(db, user_id, video_id, &event.session_id, None)
                        .await?;
                }
                _ => warn!(
                    session_id = %event.session_id,
                    "Paid video event missing video_id/user_id metadata"
                ),
            }
        }
        Some(KIND_SHOP) => {
            let order = match event.metadata.get("order_id") {
                Some(order_id) => reconcile::fetch_order_by_id(db, order_id).await?,
                None => reconcile::fetch_order_by_session(db, &event.session_id).await?,
            };
            match order {
                Some(order) => {
                    reconcile::mark_order_paid(db, &order).await?;
                }
                None => warn!(
                    session_id = %event.session_id,
                    "Paid shop event with no matching order"
                ),
            }
        }
        _ => warn!(
            session_id = %event.session_id,
            "Paid event with unknown purchase kind"
        ),
    }

    Ok(())
}
