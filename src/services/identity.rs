// src/services/identity.rs
//! Identity-provider session exchange
//!
//! Trades the opaque session id handed to the frontend after a third-party
//! login for verified identity claims.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Fixed trust anchor for the claims exchange. Must never be made
/// configurable or given a fallback: an attacker-supplied endpoint could
/// forge claims.
const SESSION_DATA_ENDPOINT: &str =
    "https://demobackend.emergentagent.com/auth/v1/env/oauth/session-data";

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider rejected session ({0})")]
    Rejected(u16),

    #[error("identity provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed identity claims: {0}")]
    MalformedClaims(String),
}

/// Verified claims returned by the identity provider
#[derive(Debug, Deserialize)]
pub struct IdentityClaims {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
}

#[derive(Debug)]
pub struct IdentityService {
    http: Client,
}

impl IdentityService {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Exchange an opaque third-party session id for verified claims.
    ///
    /// Any non-success status is a hard rejection; no claims are trusted
    /// from an error response.
    pub async fn exchange_session(&self, session_id: &str) -> Result<IdentityClaims, IdentityError> {
        debug!("Exchanging external session with identity provider");

        let response = self
            .http
            .get(SESSION_DATA_ENDPOINT)
            .header("X-Session-ID", session_id)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(http_status = %status, "Identity provider rejected session exchange");
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        response
            .json::<IdentityClaims>()
            .await
            .map_err(|e| IdentityError::MalformedClaims(e.to_string()))
    }
}
