//! Token persistence
//!
//! The session cache that survives process restarts. The CLI points a
//! [`FileTokenStore`] at its config directory; tests and one-shot tools use
//! [`MemoryTokenStore`].

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::session::TokenPair;

/// Persistence seam for the session's token pair
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the cached pair, if any
    async fn load(&self) -> ClientResult<Option<TokenPair>>;

    /// Persist the pair
    async fn save(&self, tokens: &TokenPair) -> ClientResult<()>;

    /// Drop the cached pair
    async fn clear(&self) -> ClientResult<()>;
}

/// In-memory token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<Option<TokenPair>>>,
}

impl MemoryTokenStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ClientResult<Option<TokenPair>> {
        Ok(self.tokens.read().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> ClientResult<()> {
        *self.tokens.write().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.tokens.write().await = None;
        Ok(())
    }
}

/// JSON-file token store
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file. The file and its parent
    /// directory are created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ClientResult<Option<TokenPair>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(ClientError::store_error(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    err
                )))
            }
        };
        let tokens = serde_json::from_slice(&data).map_err(|err| {
            ClientError::store_error(format!(
                "Failed to parse {}: {}",
                self.path.display(),
                err
            ))
        })?;
        Ok(Some(tokens))
    }

    async fn save(&self, tokens: &TokenPair) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|err| {
                ClientError::store_error(format!(
                    "Failed to create {}: {}",
                    parent.display(),
                    err
                ))
            })?;
        }
        let data = serde_json::to_vec_pretty(tokens)?;
        tokio::fs::write(&self.path, data).await.map_err(|err| {
            ClientError::store_error(format!(
                "Failed to write {}: {}",
                self.path.display(),
                err
            ))
        })?;
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ClientError::store_error(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                err
            ))),
        }
    }
}
