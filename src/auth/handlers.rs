//! Authentication handlers

use axum::extract::{Extension, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::{is_admin_email, AuthedUser, SESSION_COOKIE};
use super::models::{Claims, ExternalSessionRequest, LoginRequest, RegisterRequest, User};
use super::password::{hash_password, verify_password};
use super::validators::{LoginValidator, RegisterValidator};
use crate::common::{
    generate_id, generate_session_token, now_rfc3339, safe_email_log, ApiError, AppState,
    EntityPrefix, Validator,
};

/// Bearer tokens and cookie sessions share the same 7-day lifetime
const TOKEN_TTL_DAYS: i64 = 7;
const SESSION_TTL_DAYS: i64 = 7;

/// POST /api/auth/register
/// Creates a local-password account and returns a bearer token
///
/// # Request Body
/// ```json
/// {
///   "email": "alice@example.com",
///   "password": "...",
///   "name": "Alice"
/// }
/// ```
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = RegisterValidator.validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(
            email = %safe_email_log(&payload.email),
            "Registration rejected: email already registered"
        );
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let user_id = generate_id(EntityPrefix::User);
    let password_hash = hash_password(&payload.password)?;

    sqlx::query(
        "INSERT INTO users (user_id, email, name, picture, password_hash, created_at) \
         VALUES (?, ?, ?, NULL, ?, ?)",
    )
    .bind(&user_id)
    .bind(&payload.email)
    .bind(&payload.name)
    .bind(&password_hash)
    .bind(now_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let token = mint_token(&user_id, &payload.email, &state.jwt_secret)?;
    let is_admin = is_admin_email(&state, &payload.email);

    info!(
        user_id = %user_id,
        email = %safe_email_log(&payload.email),
        "New user registered"
    );

    Ok(Json(serde_json::json!({
        "token": token,
        "user": {
            "user_id": user_id,
            "email": payload.email,
            "name": payload.name,
            "is_admin": is_admin,
        },
    })))
}

/// POST /api/auth/login
/// Verifies email/password and returns a bearer token
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = LoginValidator.validate(&payload);
    if !validation.is_valid() {
        return Err(validation.into());
    }

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&payload.email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    // Unknown email, password-less account, and wrong password all produce
    // the same response.
    let user = match user {
        Some(user)
            if user
                .password_hash
                .as_deref()
                .map(|hash| verify_password(&payload.password, hash))
                .unwrap_or(false) =>
        {
            user
        }
        _ => {
            warn!(
                email = %safe_email_log(&payload.email),
                "Login failed: invalid credentials"
            );
            return Err(ApiError::Unauthorized("invalid credentials".to_string()));
        }
    };

    let token = mint_token(&user.user_id, &user.email, &state.jwt_secret)?;
    let is_admin = is_admin_email(&state, &user.email);

    info!(
        user_id = %user.user_id,
        email = %safe_email_log(&user.email),
        "User logged in"
    );

    Ok(Json(serde_json::json!({
        "token": token,
        "user": {
            "user_id": user.user_id,
            "email": user.email,
            "name": user.name,
            "is_admin": is_admin,
        },
    })))
}

/// POST /api/auth/session
/// Exchanges an identity-provider session id for a local account and a
/// cookie session
///
/// Fresh claims win: an existing account's name and picture are overwritten
/// with whatever the provider reports.
pub async fn exchange_session(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
    Json(payload): Json<ExternalSessionRequest>,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    if payload.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest("session_id required".to_string()));
    }

    // No local user is created or touched unless the exchange succeeds.
    let claims = state.identity.exchange_session(&payload.session_id).await?;

    let existing: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&claims.email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user_id = match existing {
        Some(user) => {
            sqlx::query("UPDATE users SET name = ?, picture = ? WHERE user_id = ?")
                .bind(&claims.name)
                .bind(&claims.picture)
                .bind(&user.user_id)
                .execute(&state.db)
                .await
                .map_err(ApiError::DatabaseError)?;
            user.user_id
        }
        None => {
            let user_id = generate_id(EntityPrefix::User);
            // Provider-backed accounts have no local password.
            sqlx::query(
                "INSERT INTO users (user_id, email, name, picture, password_hash, created_at) \
                 VALUES (?, ?, ?, ?, NULL, ?)",
            )
            .bind(&user_id)
            .bind(&claims.email)
            .bind(&claims.name)
            .bind(&claims.picture)
            .bind(now_rfc3339())
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(
                user_id = %user_id,
                email = %safe_email_log(&claims.email),
                "New user created via identity provider"
            );
            user_id
        }
    };

    let session_token = generate_session_token();
    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).to_rfc3339();

    sqlx::query(
        "INSERT INTO user_sessions (session_token, user_id, expires_at, created_at) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(&session_token)
    .bind(&user_id)
    .bind(&expires_at)
    .bind(now_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let jar = jar.add(session_cookie(session_token));
    let is_admin = is_admin_email(&state, &claims.email);

    info!(
        user_id = %user_id,
        email = %safe_email_log(&claims.email),
        "Session minted via identity provider"
    );

    Ok((
        jar,
        Json(serde_json::json!({
            "user_id": user_id,
            "email": claims.email,
            "name": claims.name,
            "picture": claims.picture,
            "is_admin": is_admin,
        })),
    ))
}

/// GET /api/me
/// Returns the current authenticated user's information
pub async fn me_handler(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let user: User = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_id = ?")
        .bind(&authed.user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "user_id": user.user_id,
        "email": user.email,
        "name": user.name,
        "picture": user.picture,
        "is_admin": authed.is_admin,
    })))
}

/// POST /api/auth/logout
/// Deletes the cookie session (if any) and clears the cookie
pub async fn logout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    let state = state_lock.read().await.clone();

    let session_token = jar.get(SESSION_COOKIE).map(|c| c.value().to_string());
    if let Some(token) = session_token {
        sqlx::query("DELETE FROM user_sessions WHERE session_token = ?")
            .bind(&token)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;
    }

    let jar = jar.remove(Cookie::build((SESSION_COOKIE, "")).path("/").build());

    info!("User logged out");

    Ok((
        jar,
        Json(serde_json::json!({"message": "Logged out successfully"})),
    ))
}

// ---- Helper Functions ----

/// Mint a 7-day HS256 bearer token
fn mint_token(user_id: &str, email: &str, jwt_secret: &str) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, user_id = %user_id, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Session cookie: http-only, secure, cross-site-sendable, whole-site scope
fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .max_age(time::Duration::days(SESSION_TTL_DAYS))
        .build()
}
