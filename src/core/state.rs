// Application state (AppState)

use crate::auth::token::TokenIssuer;
use crate::core::config::Config;
use crate::stores::{sweet_store::SweetStore, user_store::UserStore};
use std::sync::Arc;

/// Shared application state
///
/// Contains all shared components accessed by request handlers. All fields
/// are wrapped in Arc for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Catalog store holding sweet records
    pub sweets: Arc<SweetStore>,

    /// Identity store holding user accounts
    pub users: Arc<UserStore>,

    /// Token issuer consumed by login and the access gate
    pub tokens: Arc<TokenIssuer>,

    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let tokens = Arc::new(TokenIssuer::new(
            config.auth.jwt_secret.clone(),
            config.auth.token_ttl_hours,
        ));

        Self {
            sweets: Arc::new(SweetStore::new()),
            users: Arc::new(UserStore::new()),
            tokens,
            config: Arc::new(config),
        }
    }
}
