//! Tests for shop module
//!
//! These tests verify shop item validation, order status validation, and
//! the JSON round-trip of shipping address snapshots.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    fn sample_item_request() -> models::ShopItemRequest {
        models::ShopItemRequest {
            name: "Wellness Journal".to_string(),
            description: "A journal for tracking your wellness journey".to_string(),
            price: 24.99,
            image_url: "https://example.com/journal.jpg".to_string(),
            category: "Journals".to_string(),
            stock: 50,
        }
    }

    #[test]
    fn test_item_validator_accepts_valid_request() {
        let result = validators::ShopItemValidator.validate(&sample_item_request());
        assert!(result.is_valid());
    }

    #[test]
    fn test_item_validator_rejects_negative_stock() {
        let mut request = sample_item_request();
        request.stock = -5;

        let result = validators::ShopItemValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "stock"));
    }

    #[test]
    fn test_item_validator_rejects_negative_price() {
        let mut request = sample_item_request();
        request.price = -0.01;

        let result = validators::ShopItemValidator.validate(&request);
        assert!(result.errors.iter().any(|e| e.field == "price"));
    }

    #[test]
    fn test_order_status_validator_accepts_known_statuses() {
        for status in ["pending", "paid", "shipped", "delivered", "cancelled"] {
            let request = models::UpdateOrderStatusRequest {
                status: status.to_string(),
            };
            assert!(
                validators::OrderStatusValidator.validate(&request).is_valid(),
                "{} should be a valid status",
                status
            );
        }
    }

    #[test]
    fn test_order_status_validator_rejects_unknown_status() {
        let request = models::UpdateOrderStatusRequest {
            status: "teleported".to_string(),
        };
        assert!(!validators::OrderStatusValidator.validate(&request).is_valid());
    }

    #[test]
    fn test_order_serializes_address_as_json_object() {
        let order = models::Order {
            order_id: "ord_TEST00000001".to_string(),
            user_id: "user_TEST0000001".to_string(),
            item_id: "item_TEST000001".to_string(),
            item_name: "Wellness Journal".to_string(),
            quantity: 2,
            total_amount: 49.98,
            shipping_address: Some(
                r#"{"full_name":"Alice Example","city":"Springfield"}"#.to_string(),
            ),
            status: "pending".to_string(),
            payment_status: "initiated".to_string(),
            session_id: Some("cs_test_1".to_string()),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&order).expect("Failed to serialize order");
        assert_eq!(
            value["shipping_address"]["full_name"],
            serde_json::json!("Alice Example")
        );
        assert_eq!(value["quantity"], serde_json::json!(2));
    }

    #[test]
    fn test_order_serializes_unparseable_address_as_null() {
        let order = models::Order {
            order_id: "ord_TEST00000001".to_string(),
            user_id: "user_TEST0000001".to_string(),
            item_id: "item_TEST000001".to_string(),
            item_name: "Wellness Journal".to_string(),
            quantity: 1,
            total_amount: 24.99,
            shipping_address: Some("not json".to_string()),
            status: "pending".to_string(),
            payment_status: "initiated".to_string(),
            session_id: None,
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        };

        let value = serde_json::to_value(&order).expect("Failed to serialize order");
        assert!(value["shipping_address"].is_null());
    }
}
