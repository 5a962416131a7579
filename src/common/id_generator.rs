// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: prefix_XXXXXXXXXXXX (e.g., vid_K7NP3XW2Q4RT for videos)
//!
//! Benefits:
//! - No ambiguous characters (excludes I, L, O, U)
//! - Case-insensitive
//! - Easy to read, type, and communicate verbally

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Random-part length for entity IDs
const ENTITY_ID_LENGTH: usize = 12;

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// User account (user_)
    User,
    /// Catalog video (vid_)
    Video,
    /// Video entitlement (pur_)
    Purchase,
    /// Payment transaction (txn_)
    Transaction,
    /// Shop item (item_)
    ShopItem,
    /// Shop order (ord_)
    Order,
    /// Blog post (post_)
    BlogPost,
    /// Blog comment (cmt_)
    Comment,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::User => "user",
            EntityPrefix::Video => "vid",
            EntityPrefix::Purchase => "pur",
            EntityPrefix::Transaction => "txn",
            EntityPrefix::ShopItem => "item",
            EntityPrefix::Order => "ord",
            EntityPrefix::BlogPost => "post",
            EntityPrefix::Comment => "cmt",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID using Crockford Base32 encoding
///
/// # Example
/// ```ignore
/// let video_id = generate_id(EntityPrefix::Video);
/// // Returns something like "vid_K7NP3XW2Q4RT"
/// ```
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_raw_id(ENTITY_ID_LENGTH))
}

/// Generate a raw (unprefixed) Crockford Base32 string
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Generate an opaque session token.
///
/// Session tokens are bearer secrets, not entity IDs, so they carry a longer
/// random part (128 bits via uuid) than entity IDs.
pub fn generate_session_token() -> String {
    format!("sess_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_id_has_prefix_and_length() {
        let id = generate_id(EntityPrefix::Video);
        assert!(id.starts_with("vid_"));
        assert_eq!(id.len(), "vid_".len() + ENTITY_ID_LENGTH);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = generate_id(EntityPrefix::User);
        let b = generate_id(EntityPrefix::User);
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_uses_crockford_alphabet() {
        let id = generate_raw_id(64);
        for c in id.bytes() {
            assert!(CROCKFORD_ALPHABET.contains(&c), "unexpected char {}", c as char);
        }
    }

    #[test]
    fn test_session_token_shape() {
        let token = generate_session_token();
        assert!(token.starts_with("sess_"));
        assert_eq!(token.len(), "sess_".len() + 32);
    }
}
