//! Tests for payments module
//!
//! These tests exercise the settlement guards against an in-memory
//! database: repeated or racing delivery of a paid status must converge on
//! exactly one entitlement, and stock must move exactly once per order.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;
    use crate::payments::reconcile;
    use chrono::Utc;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn insert_shop_item(pool: &SqlitePool, item_id: &str, stock: i64) {
        sqlx::query(
            "INSERT INTO shop_items (item_id, name, description, price, image_url, category, stock, created_at) \
             VALUES (?, 'Wellness Journal', 'A journal', 24.99, 'https://example.com/j.jpg', 'Journals', ?, ?)",
        )
        .bind(item_id)
        .bind(stock)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .expect("Failed to insert shop item");
    }

    async fn insert_order(pool: &SqlitePool, order_id: &str, item_id: &str, quantity: i64, session_id: &str) {
        sqlx::query(
            "INSERT INTO orders \
             (order_id, user_id, item_id, item_name, quantity, total_amount, shipping_address, status, payment_status, session_id, created_at) \
             VALUES (?, 'user_T', ?, 'Wellness Journal', ?, 49.98, '{}', 'pending', 'initiated', ?, ?)",
        )
        .bind(order_id)
        .bind(item_id)
        .bind(quantity)
        .bind(session_id)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .expect("Failed to insert order");
    }

    async fn insert_transaction(pool: &SqlitePool, session_id: &str) {
        sqlx::query(
            "INSERT INTO payment_transactions \
             (transaction_id, session_id, user_id, kind, video_id, order_id, item_id, amount, currency, status, payment_status, created_at) \
             VALUES ('txn_T', ?, 'user_T', 'video', 'vid_T', NULL, NULL, 29.99, 'usd', 'pending', 'initiated', ?)",
        )
        .bind(session_id)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await
        .expect("Failed to insert transaction");
    }

    async fn count(pool: &SqlitePool, sql: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(sql)
            .fetch_one(pool)
            .await
            .expect("Failed to count rows");
        row.0
    }

    async fn item_stock(pool: &SqlitePool, item_id: &str) -> i64 {
        let row: (i64,) = sqlx::query_as("SELECT stock FROM shop_items WHERE item_id = ?")
            .bind(item_id)
            .fetch_one(pool)
            .await
            .expect("Failed to read stock");
        row.0
    }

    #[tokio::test]
    async fn test_repeated_grant_creates_one_purchase() {
        let pool = test_pool().await;

        let first = reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_1", Some(29.99))
            .await
            .expect("grant should succeed");
        let second = reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_1", Some(29.99))
            .await
            .expect("second grant should succeed");

        assert!(first, "first delivery creates the entitlement");
        assert!(!second, "redundant delivery must not create another row");
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM purchases").await, 1);
    }

    #[tokio::test]
    async fn test_poll_and_webhook_paths_converge_on_one_purchase() {
        let pool = test_pool().await;

        // Poll path settles from the stored transaction (amount known).
        reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_1", Some(29.99))
            .await
            .expect("poll-path grant should succeed");
        // Webhook path settles from metadata (no amount available).
        let webhook = reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_1", None)
            .await
            .expect("webhook-path grant should succeed");

        assert!(!webhook);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM purchases").await, 1);
    }

    #[tokio::test]
    async fn test_distinct_sessions_still_grant_once_per_video() {
        let pool = test_pool().await;

        // Two concurrent checkout attempts for the same user+video produce
        // distinct sessions; entitlement still deduplicates.
        reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_1", Some(29.99))
            .await
            .expect("grant should succeed");
        let second = reconcile::grant_video_purchase(&pool, "user_A", "vid_X", "cs_2", Some(29.99))
            .await
            .expect("grant should succeed");

        assert!(!second);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM purchases").await, 1);
    }

    #[tokio::test]
    async fn test_mark_order_paid_decrements_stock_once() {
        let pool = test_pool().await;
        insert_shop_item(&pool, "item_J", 10).await;
        insert_order(&pool, "ord_1", "item_J", 3, "cs_shop_1").await;

        let order = reconcile::fetch_order_by_session(&pool, "cs_shop_1")
            .await
            .expect("fetch should succeed")
            .expect("order should exist");

        let first = reconcile::mark_order_paid(&pool, &order)
            .await
            .expect("first settle should succeed");
        let second = reconcile::mark_order_paid(&pool, &order)
            .await
            .expect("second settle should succeed");

        assert!(first);
        assert!(!second, "an already-paid order must not settle again");
        assert_eq!(item_stock(&pool, "item_J").await, 7, "stock moves exactly once");

        let row: (String, String) =
            sqlx::query_as("SELECT status, payment_status FROM orders WHERE order_id = 'ord_1'")
                .fetch_one(&pool)
                .await
                .expect("Failed to read order");
        assert_eq!(row, ("paid".to_string(), "paid".to_string()));
    }

    #[tokio::test]
    async fn test_mark_order_paid_tolerates_oversell() {
        let pool = test_pool().await;
        insert_shop_item(&pool, "item_J", 1).await;
        insert_order(&pool, "ord_1", "item_J", 5, "cs_shop_1").await;

        let order = reconcile::fetch_order_by_id(&pool, "ord_1")
            .await
            .expect("fetch should succeed")
            .expect("order should exist");

        let settled = reconcile::mark_order_paid(&pool, &order)
            .await
            .expect("settle should succeed");

        assert!(settled, "payment settles even when stock ran out");
        assert_eq!(
            item_stock(&pool, "item_J").await,
            1,
            "stock never goes negative"
        );
    }

    #[tokio::test]
    async fn test_transaction_status_is_final_after_paid() {
        let pool = test_pool().await;
        insert_transaction(&pool, "cs_1").await;

        let first = reconcile::record_transaction_status(&pool, "cs_1", "complete", "paid")
            .await
            .expect("update should succeed");
        let second = reconcile::record_transaction_status(&pool, "cs_1", "expired", "unpaid")
            .await
            .expect("update should succeed");

        assert!(first);
        assert!(!second, "a paid transaction is never rewritten");

        let row: (String, String) = sqlx::query_as(
            "SELECT status, payment_status FROM payment_transactions WHERE session_id = 'cs_1'",
        )
        .fetch_one(&pool)
        .await
        .expect("Failed to read transaction");
        assert_eq!(row, ("complete".to_string(), "paid".to_string()));
    }

    #[tokio::test]
    async fn test_intermediate_status_can_be_recorded_repeatedly() {
        let pool = test_pool().await;
        insert_transaction(&pool, "cs_1").await;

        let first = reconcile::record_transaction_status(&pool, "cs_1", "open", "unpaid")
            .await
            .expect("update should succeed");
        let second = reconcile::record_transaction_status(&pool, "cs_1", "complete", "paid")
            .await
            .expect("update should succeed");

        assert!(first);
        assert!(second, "non-terminal statuses keep tracking the processor");
    }

    #[test]
    fn test_shop_checkout_validator_rejects_zero_quantity() {
        let request = models::ShopCheckoutRequest {
            item_id: "item_J".to_string(),
            quantity: 0,
            shipping_address: sample_address(),
            origin_url: "https://shop.example.com".to_string(),
        };

        let result = validators::ShopCheckoutValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "quantity"));
    }

    #[test]
    fn test_shop_checkout_validator_requires_address_fields() {
        let mut address = sample_address();
        address.city = "".to_string();
        let request = models::ShopCheckoutRequest {
            item_id: "item_J".to_string(),
            quantity: 1,
            shipping_address: address,
            origin_url: "https://shop.example.com".to_string(),
        };

        let result = validators::ShopCheckoutValidator.validate(&request);
        assert!(result.errors.iter().any(|e| e.field == "city"));
    }

    #[test]
    fn test_checkout_validator_rejects_relative_origin() {
        let request = models::CheckoutRequest {
            video_id: "vid_X".to_string(),
            origin_url: "/not-absolute".to_string(),
        };

        let result = validators::CheckoutValidator.validate(&request);
        assert!(result.errors.iter().any(|e| e.field == "origin_url"));
    }

    fn sample_address() -> models::ShippingAddress {
        models::ShippingAddress {
            full_name: "Alice Example".to_string(),
            address_line1: "1 Main St".to_string(),
            address_line2: "".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
            country: "US".to_string(),
            phone: "+1 555 0100".to_string(),
        }
    }
}
