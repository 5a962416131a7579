// src/services/stripe.rs
//! Stripe Checkout client
//!
//! Covers the three interactions the payment flow needs: opening a hosted
//! checkout session, querying a session's status, and verifying + decoding
//! webhook events.

use hmac::{Hmac, Mac};
use reqwest::Client;
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

const CHECKOUT_SESSIONS_URL: &str = "https://api.stripe.com/v1/checkout/sessions";

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("stripe returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("missing webhook signature")]
    MissingSignature,

    #[error("invalid webhook signature")]
    InvalidSignature,

    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
}

/// Parameters for opening a hosted checkout session.
///
/// `metadata` must fully describe the purchase intent: it is the only channel
/// through which the webhook path learns what was bought.
#[derive(Debug)]
pub struct CheckoutSessionRequest {
    pub amount: f64,
    pub currency: String,
    pub product_name: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: HashMap<String, String>,
}

/// A newly opened checkout session
#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    #[serde(rename = "id")]
    pub session_id: String,
    pub url: String,
}

/// Current processor-side view of a checkout session
#[derive(Debug)]
pub struct CheckoutStatus {
    pub status: String,
    pub payment_status: String,
}

/// A verified, decoded webhook event
#[derive(Debug)]
pub struct WebhookEvent {
    pub event_type: String,
    pub session_id: String,
    pub status: String,
    pub payment_status: String,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug)]
pub struct StripeClient {
    api_key: String,
    webhook_secret: Option<String>,
    http: Client,
}

impl StripeClient {
    pub fn new(api_key: String, webhook_secret: Option<String>, http: Client) -> Self {
        Self {
            api_key,
            webhook_secret,
            http,
        }
    }

    /// Open a hosted checkout session and return its id and redirect URL
    pub async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<CheckoutSession, StripeError> {
        let unit_amount = to_minor_units(request.amount);

        let mut form: Vec<(String, String)> = vec![
            ("mode".to_string(), "payment".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            (
                "line_items[0][price_data][currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                request.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                unit_amount.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        for (key, value) in &request.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .http
            .post(CHECKOUT_SESSIONS_URL)
            .basic_auth(&self.api_key, None::<&str>)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<CheckoutSession>().await?)
    }

    /// Query the processor for a checkout session's current status pair
    pub async fn get_checkout_status(
        &self,
        session_id: &str,
    ) -> Result<CheckoutStatus, StripeError> {
        let url = format!("{}/{}", CHECKOUT_SESSIONS_URL, session_id);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.api_key, None::<&str>)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StripeError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: serde_json::Value = response.json().await?;
        Ok(CheckoutStatus {
            status: json_str(&body, "status"),
            payment_status: json_str(&body, "payment_status"),
        })
    }

    /// Verify a webhook payload's signature and decode the event.
    ///
    /// With no webhook secret configured, verification is skipped with a
    /// warning (development mode).
    pub fn handle_webhook(
        &self,
        body: &str,
        signature_header: Option<&str>,
    ) -> Result<WebhookEvent, StripeError> {
        if let Some(secret) = &self.webhook_secret {
            let header = signature_header.ok_or(StripeError::MissingSignature)?;
            verify_signature(body, header, secret)?;
        } else {
            warn!("STRIPE_WEBHOOK_SECRET not configured - skipping signature verification");
        }

        parse_event(body)
    }
}

/// Convert a decimal major-unit amount to integer minor units (cents)
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

fn json_str(value: &serde_json::Value, key: &str) -> String {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string()
}

fn parse_event(body: &str) -> Result<WebhookEvent, StripeError> {
    let event: serde_json::Value =
        serde_json::from_str(body).map_err(|e| StripeError::MalformedPayload(e.to_string()))?;

    let event_type = json_str(&event, "type");
    let object = event
        .get("data")
        .and_then(|d| d.get("object"))
        .ok_or_else(|| StripeError::MalformedPayload("missing data.object".to_string()))?;

    let session_id = object
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| StripeError::MalformedPayload("missing session id".to_string()))?
        .to_string();

    let mut metadata = HashMap::new();
    if let Some(map) = object.get("metadata").and_then(|m| m.as_object()) {
        for (key, value) in map {
            if let Some(text) = value.as_str() {
                metadata.insert(key.clone(), text.to_string());
            }
        }
    }

    Ok(WebhookEvent {
        event_type,
        session_id,
        status: json_str(object, "status"),
        payment_status: json_str(object, "payment_status"),
        metadata,
    })
}

/// Verify a `Stripe-Signature` header against the raw body.
///
/// The header carries `t=<timestamp>,v1=<hex hmac>`; the signed payload is
/// `"{t}.{body}"` keyed with the webhook secret.
fn verify_signature(body: &str, header: &str, secret: &str) -> Result<(), StripeError> {
    let (timestamp, candidates) = parse_signature_header(header)?;

    let signed_payload = format!("{}.{}", timestamp, body);
    let expected = hmac_sha256_hex(secret, &signed_payload);

    if candidates
        .iter()
        .any(|candidate| constant_time_eq(&expected, candidate))
    {
        Ok(())
    } else {
        Err(StripeError::InvalidSignature)
    }
}

/// Split the signature header into its timestamp and the v1 signature values
fn parse_signature_header(header: &str) -> Result<(String, Vec<String>), StripeError> {
    let mut timestamp = None;
    let mut candidates = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = Some(value.to_string()),
            Some(("v1", value)) => candidates.push(value.to_string()),
            _ => {}
        }
    }

    match (timestamp, candidates.is_empty()) {
        (Some(t), false) => Ok((t, candidates)),
        _ => Err(StripeError::InvalidSignature),
    }
}

/// Compute HMAC-SHA256 and return hex-encoded result
fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    // HMAC-SHA256 accepts keys of any size per RFC 2104, so new_from_slice
    // only fails if the Hmac implementation is broken.
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC-SHA256 accepts any key size");
    mac.update(message.as_bytes());
    let result = mac.finalize();

    hex::encode(result.into_bytes())
}

/// Constant-time string comparison to prevent timing attacks
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
