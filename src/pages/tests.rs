//! Tests for pages module

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_page_serializes_features_as_array() {
        let page = models::Page {
            page_id: "bio".to_string(),
            title: "About Me".to_string(),
            subtitle: "My Journey".to_string(),
            content: "Hello".to_string(),
            image_url: "https://example.com/bio.jpg".to_string(),
            features: Some(r#"[{"title":"Holistic Approach"}]"#.to_string()),
        };

        let value = serde_json::to_value(&page).expect("Failed to serialize page");
        assert!(value["features"].is_array());
        assert_eq!(
            value["features"][0]["title"],
            serde_json::json!("Holistic Approach")
        );
    }

    #[test]
    fn test_page_serializes_missing_features_as_empty_array() {
        let page = models::Page {
            page_id: "bio".to_string(),
            title: "About Me".to_string(),
            subtitle: "My Journey".to_string(),
            content: "Hello".to_string(),
            image_url: "https://example.com/bio.jpg".to_string(),
            features: None,
        };

        let value = serde_json::to_value(&page).expect("Failed to serialize page");
        assert_eq!(value["features"], serde_json::json!([]));
    }
}
