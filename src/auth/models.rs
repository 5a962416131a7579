//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

/// User database model
///
/// The password hash never leaves the process; it is skipped on
/// serialization.
#[derive(FromRow, Serialize, Debug, Clone)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: String,
}

/// Cookie-backed session database model
#[derive(FromRow, Serialize, Debug)]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    pub expires_at: String,
    pub created_at: String,
}

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Opaque session id handed to the frontend by the identity provider
#[derive(Deserialize, Debug)]
pub struct ExternalSessionRequest {
    pub session_id: String,
}
