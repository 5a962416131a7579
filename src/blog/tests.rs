//! Tests for blog module

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    #[test]
    fn test_post_validator_accepts_valid_request() {
        let request = models::CreateBlogPostRequest {
            title: "5 Morning Rituals".to_string(),
            content: "Starting your day with intention...".to_string(),
            excerpt: "Transform your mornings".to_string(),
            cover_image: "https://example.com/cover.jpg".to_string(),
            category: "Lifestyle".to_string(),
        };

        assert!(validators::BlogPostValidator.validate(&request).is_valid());
    }

    #[test]
    fn test_post_validator_rejects_empty_title_and_content() {
        let request = models::CreateBlogPostRequest {
            title: "".to_string(),
            content: "  ".to_string(),
            excerpt: "".to_string(),
            cover_image: "".to_string(),
            category: "".to_string(),
        };

        let result = validators::BlogPostValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "title"));
        assert!(result.errors.iter().any(|e| e.field == "content"));
    }

    #[test]
    fn test_comment_validator_rejects_oversized_content() {
        let request = models::CreateCommentRequest {
            content: "x".repeat(2001),
        };

        let result = validators::CommentValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "content"));
    }

    #[test]
    fn test_comment_validator_accepts_normal_content() {
        let request = models::CreateCommentRequest {
            content: "Lovely post, thank you".to_string(),
        };

        assert!(validators::CommentValidator.validate(&request).is_valid());
    }
}
