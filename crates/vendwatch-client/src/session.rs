//! Authenticated session state
//!
//! Tokens live in an explicit session object handed to the client at
//! construction time, never in process-wide globals. Callers initialize the
//! session after login, the client refreshes the access token inside it, and
//! `clear` ends it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Access and refresh token pair issued by the token endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenPair {
    /// Short-lived bearer token attached to each request
    pub access: String,
    /// Long-lived token used to mint a new access token
    pub refresh: String,
}

impl TokenPair {
    /// Create a token pair
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Shared, mutable session state
///
/// Cloning is cheap and every clone observes the same tokens.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    tokens: Arc<RwLock<Option<TokenPair>>>,
}

impl AuthSession {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a token pair, replacing any previous one
    pub async fn init(&self, tokens: TokenPair) {
        *self.tokens.write().await = Some(tokens);
    }

    /// Drop the tokens, returning the session to the unauthenticated state
    pub async fn clear(&self) {
        *self.tokens.write().await = None;
    }

    /// Check whether a token pair is held
    pub async fn is_authenticated(&self) -> bool {
        self.tokens.read().await.is_some()
    }

    /// Current access token, if any
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.access.clone())
    }

    /// Current refresh token, if any
    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|t| t.refresh.clone())
    }

    /// Copy of the full token pair, if any
    pub async fn tokens(&self) -> Option<TokenPair> {
        self.tokens.read().await.clone()
    }

    /// Swap in a fresh access token, keeping the refresh token
    ///
    /// No-op when the session was cleared in the meantime.
    pub async fn set_access(&self, access: String) {
        if let Some(tokens) = self.tokens.write().await.as_mut() {
            tokens.access = access;
        }
    }
}
