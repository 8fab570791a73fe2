//! HTTP client core
//!
//! One request path for every endpoint: build the URL from the configured
//! base, attach the session's access token, and classify the response. A 401
//! triggers a single transparent token refresh followed by one retry; a failed
//! refresh ends the session so callers see a clean authentication error
//! instead of a cascade of 401s.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::AuthSession;
use crate::store::{MemoryTokenStore, TokenStore};

/// Client for the vendor management REST API
///
/// Cheap to clone; clones share the session and token store.
#[derive(Clone)]
pub struct VendorClient {
    config: ClientConfig,
    session: AuthSession,
    store: Arc<dyn TokenStore>,
    http: reqwest::Client,
}

impl VendorClient {
    /// Create a client with an explicit session and token store
    pub fn new(
        config: ClientConfig,
        session: AuthSession,
        store: Arc<dyn TokenStore>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                ClientError::configuration_error(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            config,
            session,
            store,
            http,
        })
    }

    /// Create a client with a fresh session and an in-memory token store
    pub fn with_memory_store(config: ClientConfig) -> ClientResult<Self> {
        Self::new(config, AuthSession::new(), Arc::new(MemoryTokenStore::new()))
    }

    /// The session this client authenticates with
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// The client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Load a cached token pair from the store into the session
    ///
    /// Returns `true` when a pair was found. Stale tokens are fine: the first
    /// request refreshes or rejects them.
    pub async fn restore_session(&self) -> ClientResult<bool> {
        match self.store.load().await? {
            Some(tokens) => {
                self.session.init(tokens).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Issue a request and decode the JSON response body
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        let response = self.execute(method, path, query, body).await?;
        Self::decode(response).await
    }

    /// Issue a request outside the session: no auth header, no refresh
    ///
    /// Login, registration, and token verification take this path. Running
    /// them through the authenticated path would misread a credentials 401 as
    /// an expired access token.
    pub(crate) async fn request_public<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
    ) -> ClientResult<T> {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "sending unauthenticated request");
        let response = self.http.request(method, &url).json(&body).send().await?;
        Self::decode(response).await
    }

    /// Issue a request that returns no body on success
    pub(crate) async fn request_no_content(
        &self,
        method: Method,
        path: &str,
    ) -> ClientResult<()> {
        let response = self.execute(method, path, None, None).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(Self::classify_failure(status, text))
    }

    /// Send a request, refreshing the access token once on 401
    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> ClientResult<reqwest::Response> {
        let request_id = Uuid::new_v4();
        let url = self.config.endpoint(path);
        debug!(%request_id, %method, %url, "sending request");

        let response = self
            .send_once(method.clone(), &url, query, body.as_ref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let refresh = match self.session.refresh_token().await {
            Some(token) => token,
            None => {
                return Err(ClientError::authentication_error(
                    "Not authenticated, log in first",
                ))
            }
        };

        debug!(%request_id, "access token rejected, refreshing");
        match self.refresh_access(&refresh).await {
            Ok(()) => {
                self.send_once(method, &url, query, body.as_ref())
                    .await
            }
            Err(err) => {
                warn!(%request_id, error = %err, "token refresh failed, ending session");
                self.session.clear().await;
                if let Err(store_err) = self.store.clear().await {
                    warn!(error = %store_err, "failed to clear token store");
                }
                Err(ClientError::authentication_error(
                    "Session expired, log in again",
                ))
            }
        }
    }

    /// Build and send one request with the current access token attached
    async fn send_once(
        &self,
        method: Method,
        url: &str,
        query: Option<&[(&str, String)]>,
        body: Option<&serde_json::Value>,
    ) -> ClientResult<reqwest::Response> {
        let mut request = self.http.request(method, url);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(token) = self.session.access_token().await {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Persist the session's current tokens to the store
    pub(crate) async fn save_session_tokens(&self) -> ClientResult<()> {
        if let Some(tokens) = self.session.tokens().await {
            self.store.save(&tokens).await?;
        }
        Ok(())
    }

    /// Remove any cached tokens from the store
    pub(crate) async fn clear_session_tokens(&self) -> ClientResult<()> {
        self.store.clear().await
    }

    /// Exchange the refresh token for a new access token and persist it
    async fn refresh_access(&self, refresh: &str) -> ClientResult<()> {
        #[derive(Deserialize)]
        struct Refreshed {
            access: String,
        }

        let response = self
            .http
            .post(self.config.endpoint("/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await?;
        let refreshed: Refreshed = Self::decode(response).await?;

        self.session.set_access(refreshed.access).await;
        if let Some(tokens) = self.session.tokens().await {
            self.store.save(&tokens).await?;
        }
        Ok(())
    }

    /// Decode a JSON body, turning non-success statuses into typed errors
    pub(crate) async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::classify_failure(status, text));
        }
        response.json().await.map_err(|e| ClientError::SerializationError {
            message: format!("Failed to parse response: {}", e),
        })
    }

    fn classify_failure(status: StatusCode, text: String) -> ClientError {
        if status == StatusCode::UNAUTHORIZED {
            let message = if text.is_empty() {
                "Unauthorized".to_string()
            } else {
                text
            };
            return ClientError::authentication_error(message);
        }
        ClientError::api_error(status.as_u16(), text)
    }
}

impl std::fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}
