//! Tests for videos module
//!
//! These tests verify video model shaping and creation validation,
//! in particular that playback URLs are withheld from non-purchasers.

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::common::Validator;

    fn sample_video() -> models::Video {
        models::Video {
            video_id: "vid_TEST00000001".to_string(),
            title: "Introduction to Mindfulness".to_string(),
            description: "Foundations of mindfulness meditation".to_string(),
            thumbnail_url: "https://example.com/thumb.jpg".to_string(),
            video_url: "https://example.com/full.mp4".to_string(),
            price: 29.99,
            duration: "2h 30m".to_string(),
            category: "Meditation".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_response_withholds_url_without_purchase() {
        let response = models::VideoResponse::from_video(sample_video(), false);
        assert!(response.video_url.is_none());
        assert!(!response.is_purchased);
    }

    #[test]
    fn test_response_includes_url_with_purchase() {
        let response = models::VideoResponse::from_video(sample_video(), true);
        assert_eq!(
            response.video_url.as_deref(),
            Some("https://example.com/full.mp4")
        );
        assert!(response.is_purchased);
    }

    #[test]
    fn test_video_validator_accepts_valid_request() {
        let request = models::CreateVideoRequest {
            title: "Better Sleep Workshop".to_string(),
            description: "Sleep hygiene practices".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            video_url: "https://example.com/v.mp4".to_string(),
            price: 24.99,
            duration: "1h 45m".to_string(),
            category: "Wellness".to_string(),
        };

        assert!(validators::VideoValidator.validate(&request).is_valid());
    }

    #[test]
    fn test_video_validator_rejects_negative_price() {
        let request = models::CreateVideoRequest {
            title: "Title".to_string(),
            description: "Description".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            video_url: "https://example.com/v.mp4".to_string(),
            price: -1.0,
            duration: "1h".to_string(),
            category: "Wellness".to_string(),
        };

        let result = validators::VideoValidator.validate(&request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "price"));
    }

    #[test]
    fn test_video_validator_rejects_empty_title() {
        let request = models::CreateVideoRequest {
            title: "   ".to_string(),
            description: "Description".to_string(),
            thumbnail_url: "https://example.com/t.jpg".to_string(),
            video_url: "https://example.com/v.mp4".to_string(),
            price: 10.0,
            duration: "1h".to_string(),
            category: "Wellness".to_string(),
        };

        let result = validators::VideoValidator.validate(&request);
        assert!(result.errors.iter().any(|e| e.field == "title"));
    }
}
