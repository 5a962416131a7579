//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Email/password registration and login
//! - Identity-provider session exchange and cookie sessions
//! - JWT token generation and validation
//! - MaybeUser / AuthedUser extractors for optional and protected routes

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod routes;
pub mod validators;

#[cfg(test)]
mod tests;

pub use extractors::{AuthedUser, MaybeUser};
pub use models::User;
pub use routes::auth_routes;
