//! # Payments Module
//!
//! Owns the checkout lifecycle: opening processor sessions, recording
//! payment transactions, and settling entitlements from either the
//! client-driven status poll or the processor webhook.

pub mod handlers;
pub mod models;
pub mod reconcile;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use models::*;
pub use routes::payments_routes;
