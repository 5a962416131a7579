// src/auth/validators.rs

use super::models::{LoginRequest, RegisterRequest};
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Auth Validators
// ============================================================================

pub struct RegisterValidator;

impl Validator<RegisterRequest> for RegisterValidator {
    fn validate(&self, data: &RegisterRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_email(&mut result, &data.email);

        if data.password.len() < 8 {
            result.add_error("password", "Password must be at least 8 characters");
        } else if data.password.len() > 128 {
            result.add_error("password", "Password must be less than 128 characters");
        }

        if data.name.trim().is_empty() {
            result.add_error("name", "Name is required");
        } else if data.name.len() > 255 {
            result.add_error("name", "Name must be less than 255 characters");
        }

        result
    }
}

pub struct LoginValidator;

impl Validator<LoginRequest> for LoginValidator {
    fn validate(&self, data: &LoginRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        validate_email(&mut result, &data.email);

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        }

        result
    }
}

fn validate_email(result: &mut ValidationResult, email: &str) {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        result.add_error("email", "Email is required");
        return;
    }
    if trimmed.len() > 255 {
        result.add_error("email", "Email must be less than 255 characters");
        return;
    }

    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
        _ => result.add_error("email", "Email address is not valid"),
    }
}
