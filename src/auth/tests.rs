//! Tests for auth module
//!
//! These tests verify core authentication functionality including:
//! - JWT token minting and validation
//! - Password hashing
//! - Admin derivation from the allow-list
//! - Session expiry handling and credential fallthrough

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::auth::extractors::{is_admin_email, resolve_identity};
    use crate::auth::password::{hash_password, verify_password};
    use crate::common::{parse_utc_timestamp, AppState};
    use crate::services::{IdentityService, StripeClient};
    use chrono::{Duration, TimeZone, Utc};
    use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
    use sqlx::sqlite::SqlitePoolOptions;
    use std::collections::HashSet;
    use std::sync::Arc;

    const TEST_SECRET: &str = "test_secret_key";

    async fn test_state() -> AppState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");
        crate::common::migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let http = reqwest::Client::new();
        let admin_emails: HashSet<String> =
            HashSet::from(["admin@example.com".to_string()]);

        AppState {
            db: pool,
            jwt_secret: TEST_SECRET.to_string(),
            admin_emails,
            stripe: Arc::new(StripeClient::new("sk_test".to_string(), None, http.clone())),
            identity: Arc::new(IdentityService::new(http)),
        }
    }

    async fn insert_user(state: &AppState, user_id: &str, email: &str) {
        sqlx::query(
            "INSERT INTO users (user_id, email, name, picture, password_hash, created_at) \
             VALUES (?, ?, 'Test User', NULL, NULL, ?)",
        )
        .bind(user_id)
        .bind(email)
        .bind(Utc::now().to_rfc3339())
        .execute(&state.db)
        .await
        .expect("Failed to insert user");
    }

    async fn insert_session(state: &AppState, token: &str, user_id: &str, expires_at: &str) {
        sqlx::query(
            "INSERT INTO user_sessions (session_token, user_id, expires_at, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(Utc::now().to_rfc3339())
        .execute(&state.db)
        .await
        .expect("Failed to insert session");
    }

    fn mint_test_token(user_id: &str, email: &str, exp: i64) -> String {
        let claims = models::Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp as usize,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to encode token")
    }

    fn request_parts(headers: &[(&str, String)]) -> axum::http::request::Parts {
        let mut builder = axum::http::Request::builder().uri("/api/me");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        let request = builder.body(()).expect("Failed to build request");
        request.into_parts().0
    }

    #[test]
    fn test_jwt_encoding_and_decoding() {
        let exp = (Utc::now() + Duration::days(7)).timestamp();
        let token = mint_test_token("user_TEST12345678", "test@example.com", exp);

        let decoded = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("Failed to decode token");

        assert_eq!(decoded.claims.sub, "user_TEST12345678");
        assert_eq!(decoded.claims.email, "test@example.com");
    }

    #[test]
    fn test_jwt_validation_fails_with_wrong_secret() {
        let exp = (Utc::now() + Duration::days(7)).timestamp();
        let token = mint_test_token("user_TEST12345678", "test@example.com", exp);

        let result = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(b"wrong_secret_key"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(
            result.is_err(),
            "Token validation should fail with wrong secret"
        );
    }

    #[test]
    fn test_jwt_validation_fails_when_expired() {
        let exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = mint_test_token("user_TEST12345678", "test@example.com", exp);

        let result = decode::<models::Claims>(
            &token,
            &DecodingKey::from_secret(TEST_SECRET.as_bytes()),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err(), "Expired token should fail validation");
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("correct horse battery").expect("Failed to hash");
        assert_ne!(hash, "correct horse battery");
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_password_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-hash"));
    }

    #[test]
    fn test_parse_utc_timestamp_accepts_rfc3339() {
        let parsed = parse_utc_timestamp("2030-01-02T03:04:05+02:00").expect("should parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 2, 1, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_utc_timestamp_treats_naive_as_utc() {
        let parsed = parse_utc_timestamp("2030-01-02T03:04:05").expect("should parse");
        assert_eq!(parsed, Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap());
    }

    #[test]
    fn test_parse_utc_timestamp_rejects_garbage() {
        assert!(parse_utc_timestamp("not a timestamp").is_none());
    }

    #[tokio::test]
    async fn test_admin_derivation_is_case_insensitive() {
        let state = test_state().await;
        assert!(is_admin_email(&state, "admin@example.com"));
        assert!(is_admin_email(&state, "Admin@Example.COM"));
        assert!(!is_admin_email(&state, "user@example.com"));
    }

    #[tokio::test]
    async fn test_live_session_resolves_identity() {
        let state = test_state().await;
        insert_user(&state, "user_A", "admin@example.com").await;
        let expires = (Utc::now() + Duration::days(1)).to_rfc3339();
        insert_session(&state, "sess_live", "user_A", &expires).await;

        let parts = request_parts(&[("Cookie", "session_token=sess_live".to_string())]);
        let identity = resolve_identity(&parts, &state).await.expect("should resolve");

        assert_eq!(identity.user_id, "user_A");
        assert!(identity.is_admin, "admin flag should be derived per request");
    }

    #[tokio::test]
    async fn test_expired_session_falls_through_to_bearer() {
        let state = test_state().await;
        insert_user(&state, "user_B", "user@example.com").await;
        let expired = (Utc::now() - Duration::hours(1)).to_rfc3339();
        insert_session(&state, "sess_stale", "user_B", &expired).await;

        let exp = (Utc::now() + Duration::days(1)).timestamp();
        let token = mint_test_token("user_B", "user@example.com", exp);

        let parts = request_parts(&[
            ("Cookie", "session_token=sess_stale".to_string()),
            ("Authorization", format!("Bearer {}", token)),
        ]);
        let identity = resolve_identity(&parts, &state).await;

        assert!(
            identity.is_some(),
            "expired session must fall through to the bearer token"
        );
        assert_eq!(identity.unwrap().user_id, "user_B");
    }

    #[tokio::test]
    async fn test_expired_session_alone_is_anonymous() {
        let state = test_state().await;
        insert_user(&state, "user_C", "user@example.com").await;
        let expired = (Utc::now() - Duration::hours(1)).to_rfc3339();
        insert_session(&state, "sess_old", "user_C", &expired).await;

        let parts = request_parts(&[("Cookie", "session_token=sess_old".to_string())]);
        assert!(resolve_identity(&parts, &state).await.is_none());
    }

    #[tokio::test]
    async fn test_tampered_bearer_is_anonymous() {
        let state = test_state().await;
        insert_user(&state, "user_D", "user@example.com").await;

        let parts = request_parts(&[(
            "Authorization",
            "Bearer not.a.valid-token".to_string(),
        )]);
        assert!(resolve_identity(&parts, &state).await.is_none());
    }

    #[test]
    fn test_register_validator_rejects_bad_input() {
        let request = models::RegisterRequest {
            email: "no-at-sign".to_string(),
            password: "short".to_string(),
            name: "".to_string(),
        };

        let result = crate::common::Validator::validate(&validators::RegisterValidator, &request);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "email"));
        assert!(result.errors.iter().any(|e| e.field == "password"));
        assert!(result.errors.iter().any(|e| e.field == "name"));
    }

    #[test]
    fn test_register_validator_accepts_valid_input() {
        let request = models::RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "a sufficiently long one".to_string(),
            name: "Alice".to_string(),
        };

        let result = crate::common::Validator::validate(&validators::RegisterValidator, &request);
        assert!(result.is_valid());
    }
}
