// Helper functions for safe logging, timestamps, and serialization

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Serialize, Serializer};

/// Masks email addresses for safe logging
/// Prevents sensitive data exposure while preserving debugging utility
///
/// # Example
/// ```
/// let masked = safe_email_log("user@example.com");
/// // Returns: "u***@example.com"
/// ```
pub fn safe_email_log(email: &str) -> String {
    if email.len() > 3 {
        let parts: Vec<&str> = email.split('@').collect();
        if parts.len() == 2 {
            format!("{}***@{}", &parts[0][..1.min(parts[0].len())], parts[1])
        } else {
            "***@***.***".to_string()
        }
    } else {
        "***@***.***".to_string()
    }
}

/// Masks tokens for safe logging
/// Shows only first and last 4 characters
#[allow(dead_code)]
pub fn safe_token_log(token: &str) -> String {
    if token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "***".to_string()
    }
}

/// Current instant as an RFC 3339 UTC string, the storage format for every
/// timestamp column
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Parses a stored timestamp into a timezone-aware UTC instant.
///
/// Accepts RFC 3339 with an offset; a naive timestamp (no offset) is treated
/// as UTC. Returns None for anything unparseable.
pub fn parse_utc_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serializes a JSON document stored in a TEXT column as real JSON in API
/// responses. Unparseable or missing content serializes as null.
pub fn serialize_json_column<S>(raw: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match raw {
        Some(text) => {
            let value: serde_json::Value =
                serde_json::from_str(text).unwrap_or(serde_json::Value::Null);
            value.serialize(serializer)
        }
        None => serde_json::Value::Null.serialize(serializer),
    }
}

/// Serializes a JSON array stored in a TEXT column, falling back to an empty
/// array instead of null.
pub fn serialize_json_array_column<S>(
    raw: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match raw {
        Some(text) => {
            let value: Vec<serde_json::Value> =
                serde_json::from_str(text).unwrap_or_else(|_| Vec::new());
            value.serialize(serializer)
        }
        None => Vec::<serde_json::Value>::new().serialize(serializer),
    }
}
