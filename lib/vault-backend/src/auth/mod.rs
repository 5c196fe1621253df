mod credentials;
mod kubernetes;
pub mod params;
mod token;

pub use credentials::CredentialAuth;
pub use kubernetes::{DEFAULT_JWT_PATH, KubernetesAuth};
pub use params::AuthParams;
pub use token::TokenAuth;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use async_trait::async_trait;

use crate::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

/// Trait for authentication methods
#[async_trait]
pub trait AuthMethod: Send + Sync {
    /// Perform the login exchange; returns the raw login response
    async fn login(&self, store: &mut dyn SecretStore) -> Result<Option<Secret>, VaultError>;

    /// Whether `login` installs the token on the store itself
    fn sets_token(&self) -> bool {
        false
    }
}

/// Supported authentication backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    AppRole,
    AppId,
    Github,
    Token,
    Userpass,
    Kubernetes,
    Cert,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::AppRole => "app-role",
            AuthType::AppId => "app-id",
            AuthType::Github => "github",
            AuthType::Token => "token",
            AuthType::Userpass => "userpass",
            AuthType::Kubernetes => "kubernetes",
            AuthType::Cert => "cert",
        }
    }

    /// Mount segment used when no `path` option is given
    fn default_mount(&self) -> &'static str {
        match self {
            AuthType::AppRole => "approle",
            other => other.as_str(),
        }
    }
}

impl FromStr for AuthType {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(VaultError::MissingAuthType),
            "app-role" => Ok(AuthType::AppRole),
            "app-id" => Ok(AuthType::AppId),
            "github" => Ok(AuthType::Github),
            "token" => Ok(AuthType::Token),
            "userpass" => Ok(AuthType::Userpass),
            "kubernetes" => Ok(AuthType::Kubernetes),
            "cert" => Ok(AuthType::Cert),
            other => Err(VaultError::UnknownAuthType(other.to_string())),
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `auth/<mount>/login`, honouring the `path` override
fn login_path(auth_type: AuthType, params: &AuthParams) -> String {
    let mount = params
        .get(params::PATH)
        .unwrap_or_else(|| auth_type.default_mount());
    format!("auth/{}/login", mount.trim_matches('/'))
}

/// Negotiates a session token for one auth backend
#[derive(Debug, Clone)]
pub struct Authenticator {
    auth_type: AuthType,
    jwt_path: PathBuf,
}

impl Authenticator {
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type,
            jwt_path: PathBuf::from(DEFAULT_JWT_PATH),
        }
    }

    /// Service-account token file read by the kubernetes method
    pub fn with_jwt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.jwt_path = path.into();
        self
    }

    /// Validates `params` and builds the login strategy
    pub fn method(&self, params: &AuthParams) -> Result<Box<dyn AuthMethod>, VaultError> {
        let method: Box<dyn AuthMethod> = match self.auth_type {
            AuthType::AppRole => Box::new(CredentialAuth::app_role(params)?),
            AuthType::AppId => Box::new(CredentialAuth::app_id(params)?),
            AuthType::Github => Box::new(CredentialAuth::github(params)?),
            AuthType::Userpass => Box::new(CredentialAuth::userpass(params)?),
            AuthType::Cert => Box::new(CredentialAuth::cert(params)),
            AuthType::Token => Box::new(TokenAuth::from_params(params)?),
            AuthType::Kubernetes => Box::new(
                KubernetesAuth::from_params(params)?.with_jwt_path(self.jwt_path.clone()),
            ),
        };
        Ok(method)
    }

    /// Logs in and installs the resulting token on `store`
    pub async fn authenticate(
        &self,
        store: &mut dyn SecretStore,
        params: &AuthParams,
    ) -> Result<(), VaultError> {
        let method = self.method(params)?;
        let response = method.login(store).await?;

        if method.sets_token() && store.token().is_some() {
            tracing::debug!("client authenticated with auth backend: {}", self.auth_type);
            return Ok(());
        }

        let token = response
            .and_then(|secret| secret.auth)
            .map(|auth| auth.client_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| VaultError::Auth("unable to authenticate".to_string()))?;

        tracing::debug!("client authenticated with auth backend: {}", self.auth_type);
        store.set_token(token);
        Ok(())
    }
}
