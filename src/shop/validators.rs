// src/shop/validators.rs

use super::models::{ShopItemRequest, UpdateOrderStatusRequest};
use crate::common::{ValidationResult, Validator};
use std::collections::HashSet;

// ============================================================================
// Shop Validators
// ============================================================================

pub struct ShopItemValidator;

impl Validator<ShopItemRequest> for ShopItemValidator {
    fn validate(&self, data: &ShopItemRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.name.trim().is_empty() {
            result.add_error("name", "Item name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Item name must be less than 255 characters");
        }

        if data.description.trim().is_empty() {
            result.add_error("description", "Description is required");
        }

        if data.price < 0.0 || !data.price.is_finite() {
            result.add_error("price", "Price must be a non-negative number");
        }

        if data.stock < 0 {
            result.add_error("stock", "Stock cannot be negative");
        }

        result
    }
}

pub struct OrderStatusValidator;

impl Validator<UpdateOrderStatusRequest> for OrderStatusValidator {
    fn validate(&self, data: &UpdateOrderStatusRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        let valid_statuses = HashSet::from(["pending", "paid", "shipped", "delivered", "cancelled"]);
        if !valid_statuses.contains(data.status.as_str()) {
            result.add_error("status", "Invalid order status");
        }

        result
    }
}
