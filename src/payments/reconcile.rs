//! Entitlement materialization shared by the status poll and the webhook.
//!
//! Both paths can observe the same paid checkout session, possibly
//! concurrently. Every write here is guarded by an existence predicate on
//! the natural key, so redundant or racing delivery converges on exactly
//! one entitlement. The read-then-insert guard on purchases leaves a narrow
//! race window; the order transition uses a conditional UPDATE and has none.

use sqlx::SqlitePool;
use tracing::{info, warn};

use super::models::Purchase;
use crate::common::{generate_id, now_rfc3339, EntityPrefix};
use crate::shop::models::Order;

/// Insert a completed purchase unless one already exists for (user, video).
///
/// Returns true when a new entitlement row was created.
pub async fn grant_video_purchase(
    db: &SqlitePool,
    user_id: &str,
    video_id: &str,
    session_id: &str,
    amount: Option<f64>,
) -> Result<bool, sqlx::Error> {
    let existing: Option<Purchase> = sqlx::query_as::<_, Purchase>(
        "SELECT * FROM purchases \
         WHERE user_id = ? AND video_id = ? AND status = 'completed'",
    )
    .bind(user_id)
    .bind(video_id)
    .fetch_optional(db)
    .await?;

    if existing.is_some() {
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO purchases (purchase_id, user_id, video_id, session_id, amount, status, created_at) \
         VALUES (?, ?, ?, ?, ?, 'completed', ?)",
    )
    .bind(generate_id(EntityPrefix::Purchase))
    .bind(user_id)
    .bind(video_id)
    .bind(session_id)
    .bind(amount)
    .bind(now_rfc3339())
    .execute(db)
    .await?;

    info!(
        user_id = %user_id,
        video_id = %video_id,
        session_id = %session_id,
        "Video entitlement granted"
    );

    Ok(true)
}

/// Transition an order to paid at most once.
///
/// Stock decrements only on the actual pending-to-paid transition, and the
/// decrement re-validates available stock.
pub async fn mark_order_paid(db: &SqlitePool, order: &Order) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE orders SET status = 'paid', payment_status = 'paid' \
         WHERE order_id = ? AND payment_status != 'paid'",
    )
    .bind(&order.order_id)
    .execute(db)
    .await?
    .rows_affected();

    if updated == 0 {
        return Ok(false);
    }

    let decremented =
        sqlx::query("UPDATE shop_items SET stock = stock - ? WHERE item_id = ? AND stock >= ?")
            .bind(order.quantity)
            .bind(&order.item_id)
            .bind(order.quantity)
            .execute(db)
            .await?
            .rows_affected();

    if decremented == 0 {
        warn!(
            order_id = %order.order_id,
            item_id = %order.item_id,
            quantity = order.quantity,
            "Order paid but stock was insufficient at settlement"
        );
    }

    info!(order_id = %order.order_id, "Order marked paid");

    Ok(true)
}

/// Record the processor-reported status pair on the transaction row, unless
/// it already reached paid. Returns true when a row was updated.
pub async fn record_transaction_status(
    db: &SqlitePool,
    session_id: &str,
    status: &str,
    payment_status: &str,
) -> Result<bool, sqlx::Error> {
    let updated = sqlx::query(
        "UPDATE payment_transactions SET status = ?, payment_status = ? \
         WHERE session_id = ? AND payment_status != 'paid'",
    )
    .bind(status)
    .bind(payment_status)
    .bind(session_id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(updated > 0)
}

pub async fn fetch_order_by_session(
    db: &SqlitePool,
    session_id: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE session_id = ?")
        .bind(session_id)
        .fetch_optional(db)
        .await
}

pub async fn fetch_order_by_id(
    db: &SqlitePool,
    order_id: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE order_id = ?")
        .bind(order_id)
        .fetch_optional(db)
        .await
}
