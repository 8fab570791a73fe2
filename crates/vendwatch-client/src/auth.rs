//! Authentication endpoints
//!
//! Login obtains a JWT pair and initializes the session; logout ends it.
//! Register and verify are plain endpoints with no session side effects.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use crate::error::{ClientError, ClientResult};
use crate::http::VendorClient;
use crate::session::TokenPair;

/// Payload for the account registration endpoint
///
/// The backend insists on a confirmation copy of the password, so the
/// constructor fills `password2` from `password`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub password2: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

impl RegisterRequest {
    /// Create a registration payload
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        let password = password.into();
        Self {
            username: username.into(),
            email: email.into(),
            password2: password.clone(),
            password,
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }
}

/// Account facts echoed back after registration
#[derive(Debug, Clone, Deserialize)]
pub struct RegisteredUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl VendorClient {
    /// Obtain a token pair for the given credentials and start a session
    ///
    /// The pair is installed in the session and written to the token store so
    /// later processes can resume without a fresh login.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenPair> {
        debug!(username, "logging in");
        let response = self
            .request_public::<TokenPair>(
                reqwest::Method::POST,
                "/token/",
                serde_json::json!({
                    "username": username,
                    "password": password,
                }),
            )
            .await?;

        self.session().init(response.clone()).await;
        self.save_session_tokens().await?;
        Ok(response)
    }

    /// Check whether the session's access token is still accepted
    ///
    /// Returns `false` for a rejected or missing token. Other failures are
    /// reported as errors.
    pub async fn verify(&self) -> ClientResult<bool> {
        let access = match self.session().access_token().await {
            Some(token) => token,
            None => return Ok(false),
        };
        let result = self
            .request_public::<serde_json::Value>(
                reqwest::Method::POST,
                "/token/verify/",
                serde_json::json!({ "token": access }),
            )
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(err) if err.is_auth_error() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create a new account
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisteredUser> {
        request.validate()?;
        if request.password != request.password2 {
            return Err(ClientError::ValidationError {
                message: "password fields do not match".to_string(),
            });
        }
        debug!(username = %request.username, "registering account");
        self.request_public(
            reqwest::Method::POST,
            "/register/",
            serde_json::to_value(request)?,
        )
        .await
    }

    /// End the session and drop any cached tokens
    pub async fn logout(&self) -> ClientResult<()> {
        debug!("logging out");
        self.session().clear().await;
        self.clear_session_tokens().await
    }
}
