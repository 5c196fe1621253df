use async_trait::async_trait;
use serde_json::json;

use super::params::{self, AuthParams};
use super::{AuthMethod, AuthType, login_path};
use crate::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

/// Login by writing a credential body to `auth/<mount>/login[/<user>]`.
///
/// Covers every method whose exchange is a single write: app-role, app-id,
/// github, userpass and cert.
#[derive(Debug)]
pub struct CredentialAuth {
    pub path: String,
    body: serde_json::Value,
}

impl CredentialAuth {
    pub fn app_role(params: &AuthParams) -> Result<Self, VaultError> {
        Ok(Self {
            body: json!({
                "role_id": params.require(params::ROLE_ID)?,
                "secret_id": params.require(params::SECRET_ID)?,
            }),
            path: login_path(AuthType::AppRole, params),
        })
    }

    pub fn app_id(params: &AuthParams) -> Result<Self, VaultError> {
        Ok(Self {
            body: json!({
                "app_id": params.require(params::APP_ID)?,
                "user_id": params.require(params::USER_ID)?,
            }),
            path: login_path(AuthType::AppId, params),
        })
    }

    pub fn github(params: &AuthParams) -> Result<Self, VaultError> {
        Ok(Self {
            body: json!({ "token": params.require(params::TOKEN)? }),
            path: login_path(AuthType::Github, params),
        })
    }

    pub fn userpass(params: &AuthParams) -> Result<Self, VaultError> {
        let username = params.require(params::USERNAME)?;
        let password = params.require(params::PASSWORD)?;
        Ok(Self {
            body: json!({ "password": password }),
            path: format!("{}/{}", login_path(AuthType::Userpass, params), username),
        })
    }

    /// The client certificate configured on the transport is the credential
    pub fn cert(params: &AuthParams) -> Self {
        Self {
            body: json!({}),
            path: login_path(AuthType::Cert, params),
        }
    }
}

#[async_trait]
impl AuthMethod for CredentialAuth {
    async fn login(&self, store: &mut dyn SecretStore) -> Result<Option<Secret>, VaultError> {
        store.write(&self.path, self.body.clone()).await
    }
}
