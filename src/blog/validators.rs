// src/blog/validators.rs

use super::models::{CreateBlogPostRequest, CreateCommentRequest};
use crate::common::{ValidationResult, Validator};

pub struct BlogPostValidator;

impl Validator<CreateBlogPostRequest> for BlogPostValidator {
    fn validate(&self, data: &CreateBlogPostRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.title.trim().is_empty() {
            result.add_error("title", "Title is required");
        } else if data.title.len() > 255 {
            result.add_error("title", "Title must be less than 255 characters");
        }

        if data.content.trim().is_empty() {
            result.add_error("content", "Content is required");
        }

        if data.excerpt.len() > 500 {
            result.add_error("excerpt", "Excerpt must be less than 500 characters");
        }

        result
    }
}

pub struct CommentValidator;

impl Validator<CreateCommentRequest> for CommentValidator {
    fn validate(&self, data: &CreateCommentRequest) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.content.trim().is_empty() {
            result.add_error("content", "Comment content is required");
        } else if data.content.len() > 2000 {
            result.add_error("content", "Comment must be less than 2000 characters");
        }

        result
    }
}
