// src/payments/validators.rs

use super::models::{CheckoutRequest, ShopCheckoutRequest};
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Checkout Validators
// ============================================================================

pub struct CheckoutValidator;

impl Validator<CheckoutRequest> for CheckoutValidator {
    fn validate(&self, data: &CheckoutRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.video_id.trim().is_empty() {
            result.add_error("video_id", "Video id is required");
        }

        validate_origin_url(&mut result, &data.origin_url);

        result
    }
}

pub struct ShopCheckoutValidator;

impl Validator<ShopCheckoutRequest> for ShopCheckoutValidator {
    fn validate(&self, data: &ShopCheckoutRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.item_id.trim().is_empty() {
            result.add_error("item_id", "Item id is required");
        }

        if data.quantity < 1 {
            result.add_error("quantity", "Quantity must be at least 1");
        }

        validate_origin_url(&mut result, &data.origin_url);

        let address = &data.shipping_address;
        let required = [
            ("full_name", &address.full_name),
            ("address_line1", &address.address_line1),
            ("city", &address.city),
            ("state", &address.state),
            ("postal_code", &address.postal_code),
            ("country", &address.country),
            ("phone", &address.phone),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                result.add_error(field, "Shipping address field is required");
            }
        }

        result
    }
}

fn validate_origin_url(result: &mut ValidationResult, origin_url: &str) {
    if !(origin_url.starts_with("http://") || origin_url.starts_with("https://")) {
        result.add_error("origin_url", "Origin URL must be an absolute http(s) URL");
    }
}
