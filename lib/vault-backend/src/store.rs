use async_trait::async_trait;

use crate::error::VaultError;
use crate::models::Secret;

/// Low-level access to a Vault-compatible secret store.
///
/// Paths are relative to the API root (`/v1`); a leading `/` is allowed.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Read a secret; `None` when nothing exists at `path`
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError>;

    /// Immediate children of `path`; directories end with `/`.
    /// Empty when nothing exists at `path`.
    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError>;

    /// Unparsed response body of a read
    async fn raw_read(&self, path: &str) -> Result<Vec<u8>, VaultError>;

    async fn write(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<Secret>, VaultError>;

    fn set_token(&mut self, token: String);

    fn token(&self) -> Option<&str>;
}
