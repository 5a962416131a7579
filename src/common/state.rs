// Application state shared across all modules

use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::Arc;

use crate::services::{IdentityService, StripeClient};

/// Application state containing the database pool, outbound integration
/// clients, and fixed configuration read once at startup
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    pub admin_emails: HashSet<String>,
    pub stripe: Arc<StripeClient>,
    pub identity: Arc<IdentityService>,
}
