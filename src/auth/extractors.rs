//! Authentication extractors for Axum
//!
//! Identity resolution tries the session cookie first, then the bearer
//! token. Failures along the chain never reject the request by themselves;
//! a resolver that yields nothing just hands over to the next one.

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Claims, Session, User};
use crate::common::{parse_utc_timestamp, safe_email_log, ApiError, AppState};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "session_token";

/// Authenticated user extractor
///
/// Resolves the session cookie, then the bearer token, and rejects with 401
/// when neither yields a live identity. Admin status is derived from the
/// admin_emails allow-list on every request, never read from storage.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

/// Optional-identity extractor for routes that serve both anonymous and
/// signed-in callers. Never rejects.
#[derive(Debug)]
pub struct MaybeUser(pub Option<AuthedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        match resolve_identity(parts, &app_state).await {
            Some(user) => Ok(user),
            None => {
                warn!("Authentication failed: no live session or valid bearer token");
                Err(ApiError::Unauthorized("authentication required".to_string()))
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        Ok(MaybeUser(resolve_identity(parts, &app_state).await))
    }
}

/// Ordered credential chain: cookie session, then bearer token.
///
/// An expired or tampered credential is indistinguishable from an absent
/// one; every failure falls through.
pub(crate) async fn resolve_identity(parts: &Parts, state: &AppState) -> Option<AuthedUser> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(user) = identity_from_session(state, cookie.value()).await {
            return Some(user);
        }
    }

    if let Some(token) = bearer_token(parts) {
        if let Some(user) = identity_from_bearer(state, &token).await {
            return Some(user);
        }
    }

    None
}

/// Extract the raw token from the Authorization header, accepting both
/// "Bearer <token>" and a bare token
fn bearer_token(parts: &Parts) -> Option<String> {
    let raw = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())?;

    match raw.strip_prefix("Bearer ") {
        Some(rest) => Some(rest.to_string()),
        None => Some(raw.to_string()),
    }
}

async fn identity_from_session(state: &AppState, session_token: &str) -> Option<AuthedUser> {
    let session: Session = match sqlx::query_as::<_, Session>(
        "SELECT * FROM user_sessions WHERE session_token = ?",
    )
    .bind(session_token)
    .fetch_optional(&state.db)
    .await
    {
        Ok(Some(session)) => session,
        Ok(None) => return None,
        Err(e) => {
            error!(error = %e, "Database error during session lookup");
            return None;
        }
    };

    // Naive stored timestamps are interpreted as UTC before comparing.
    let expires_at = parse_utc_timestamp(&session.expires_at)?;
    if expires_at <= Utc::now() {
        debug!(user_id = %session.user_id, "Session expired, falling through");
        return None;
    }

    load_user(state, &session.user_id).await
}

async fn identity_from_bearer(state: &AppState, token: &str) -> Option<AuthedUser> {
    let decoded = match decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    ) {
        Ok(d) => d,
        Err(e) => {
            debug!(error = %e, "Bearer token validation failed, falling through");
            return None;
        }
    };

    load_user(state, &decoded.claims.sub).await
}

async fn load_user(state: &AppState, user_id: &str) -> Option<AuthedUser> {
    let user: Option<User> = match sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            error!(error = %e, user_id = %user_id, "Database error during user lookup");
            return None;
        }
    };

    let user = user?;
    let is_admin = is_admin_email(state, &user.email);
    debug!(
        user_id = %user.user_id,
        email = %safe_email_log(&user.email),
        is_admin = is_admin,
        "Identity resolved"
    );

    Some(AuthedUser {
        user_id: user.user_id,
        email: user.email,
        name: user.name,
        is_admin,
    })
}

/// Admin status is a pure function of allow-list membership, compared
/// case-insensitively
pub fn is_admin_email(state: &AppState, email: &str) -> bool {
    state.admin_emails.contains(&email.to_lowercase())
}
