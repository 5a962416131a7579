// src/videos/validators.rs

use super::models::CreateVideoRequest;
use crate::common::{ValidationResult, Validator};

pub struct VideoValidator;

impl Validator<CreateVideoRequest> for VideoValidator {
    fn validate(&self, data: &CreateVideoRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if data.title.len() > 255 {
            result.add_error("title", "Title must be less than 255 characters");
        }

        if data.description.trim().is_empty() {
            result.add_error("description", "Description is required");
        }

        if data.price < 0.0 || !data.price.is_finite() {
            result.add_error("price", "Price must be a non-negative number");
        }

        if data.video_url.trim().is_empty() {
            result.add_error("video_url", "Video URL is required");
        }

        result
    }
}
