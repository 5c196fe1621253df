use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;

use super::params::{self, AuthParams};
use super::{AuthMethod, AuthType, login_path};
use crate::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

pub const DEFAULT_JWT_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Kubernetes service-account authentication
#[derive(Debug)]
pub struct KubernetesAuth {
    pub path: String,
    pub role: String,
    pub jwt_path: PathBuf,
}

impl KubernetesAuth {
    pub fn new(path: String, role: String) -> Self {
        Self {
            path,
            role,
            jwt_path: PathBuf::from(DEFAULT_JWT_PATH),
        }
    }

    /// `role-id` is sent as the Vault role
    pub fn from_params(params: &AuthParams) -> Result<Self, VaultError> {
        let role = params.require(params::ROLE_ID)?;
        Ok(Self::new(
            login_path(AuthType::Kubernetes, params),
            role.to_string(),
        ))
    }

    pub fn with_jwt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.jwt_path = path.into();
        self
    }

    fn read_jwt(&self) -> Result<String, VaultError> {
        std::fs::read_to_string(&self.jwt_path)
            .map(|s| s.trim().to_string())
            .map_err(|source| VaultError::KubernetesJwt {
                path: self.jwt_path.clone(),
                source,
            })
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    jwt: String,
    role: &'a str,
}

#[async_trait]
impl AuthMethod for KubernetesAuth {
    async fn login(&self, store: &mut dyn SecretStore) -> Result<Option<Secret>, VaultError> {
        let jwt = self.read_jwt()?;
        let body = serde_json::to_value(LoginRequest {
            jwt,
            role: &self.role,
        })?;
        store.write(&self.path, body).await
    }
}
