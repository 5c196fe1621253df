use async_trait::async_trait;

use super::AuthMethod;
use super::params::{self, AuthParams};
use crate::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

const LOOKUP_SELF_PATH: &str = "auth/token/lookup-self";

/// Static token authentication, validated with a lookup-self read
pub struct TokenAuth {
    token: String,
}

impl TokenAuth {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub fn from_params(params: &AuthParams) -> Result<Self, VaultError> {
        Ok(Self::new(params.require(params::TOKEN)?.to_string()))
    }
}

#[async_trait]
impl AuthMethod for TokenAuth {
    async fn login(&self, store: &mut dyn SecretStore) -> Result<Option<Secret>, VaultError> {
        store.set_token(self.token.clone());
        store.read(LOOKUP_SELF_PATH).await
    }

    fn sets_token(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[tokio::test]
    async fn test_token_set_before_lookup() {
        let auth = TokenAuth::new("my-token".to_string());
        let mut store = MemoryStore::new();
        let calls = store.calls();

        let response = auth.login(&mut store).await.unwrap();

        assert!(response.is_none());
        assert_eq!(store.token(), Some("my-token"));
        assert_eq!(
            calls.lock().unwrap().as_slice(),
            &["read auth/token/lookup-self".to_string()]
        );
        assert!(auth.sets_token());
    }

    #[tokio::test]
    async fn test_failed_lookup_propagates() {
        let auth = TokenAuth::new("bad-token".to_string());
        let mut store = MemoryStore::new().failing(LOOKUP_SELF_PATH);

        let result = auth.login(&mut store).await;
        assert!(matches!(result, Err(VaultError::ClientError { status: 500, .. })));
    }
}
