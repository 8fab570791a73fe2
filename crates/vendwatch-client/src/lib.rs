//! # Vendwatch Client
//!
//! Async REST client for the vendwatch vendor management backend.
//!
//! ## Features
//!
//! - **Explicit sessions**: tokens live in an [`AuthSession`] object with an
//!   init/clear lifecycle, never in process globals
//! - **Transparent refresh**: a 401 triggers one token refresh and one retry;
//!   a failed refresh ends the session cleanly
//! - **Pluggable token cache**: in-memory or JSON-file [`TokenStore`]
//! - **Typed endpoints**: vendors, services, filtered service views, reminder
//!   sweep, and a dashboard aggregate, all returning `vendwatch-core` types
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vendwatch_client::{AuthSession, ClientConfig, FileTokenStore, VendorClient};
//! use vendwatch_core::model::PageRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:8000/api");
//!     let store = Arc::new(FileTokenStore::new("/tmp/vendwatch-tokens.json"));
//!     let client = VendorClient::new(config, AuthSession::new(), store)?;
//!
//!     client.login("admin", "password").await?;
//!     let services = client.list_services(PageRequest::default()).await?;
//!     println!("{} services", services.count);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`config`]: client configuration
//! - [`session`]: token pair and shared session state
//! - [`store`]: token persistence behind the [`TokenStore`] trait
//! - [`http`]: request path with the 401 refresh-and-retry rule
//! - [`auth`]: login, registration, verification, logout
//! - [`vendors`], [`services`]: typed endpoint groups
//! - [`dashboard`]: overview aggregate assembled from count endpoints
//! - [`error`]: client error types

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod http;
pub mod services;
pub mod session;
pub mod store;
pub mod vendors;

// Re-export main types for convenience
pub use auth::{RegisterRequest, RegisteredUser};
pub use config::ClientConfig;
pub use dashboard::DashboardSummary;
pub use error::{ClientError, ClientResult};
pub use http::VendorClient;
pub use services::ReminderOutcome;
pub use session::{AuthSession, TokenPair};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Common imports for working with the client
pub mod prelude {
    pub use crate::auth::{RegisterRequest, RegisteredUser};
    pub use crate::config::ClientConfig;
    pub use crate::dashboard::DashboardSummary;
    pub use crate::error::{ClientError, ClientResult};
    pub use crate::http::VendorClient;
    pub use crate::services::ReminderOutcome;
    pub use crate::session::{AuthSession, TokenPair};
    pub use crate::store::{FileTokenStore, MemoryTokenStore, TokenStore};
}
