use std::collections::HashMap;

use crate::error::VaultError;

pub const ROLE_ID: &str = "role-id";
pub const SECRET_ID: &str = "secret-id";
pub const APP_ID: &str = "app-id";
pub const USER_ID: &str = "user-id";
pub const TOKEN: &str = "token";
pub const USERNAME: &str = "username";
pub const PASSWORD: &str = "password";
/// Overrides the mount segment of the login path
pub const PATH: &str = "path";
pub const CERT: &str = "cert";
pub const KEY: &str = "key";
pub const CA_CERT: &str = "caCert";

/// Options passed to the authentication backend
#[derive(Debug, Clone, Default)]
pub struct AuthParams(HashMap<String, String>);

impl AuthParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Value for `key`, treating an empty string as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn require(&self, key: &str) -> Result<&str, VaultError> {
        self.get(key).ok_or_else(|| VaultError::MissingParameter {
            key: key.to_string(),
        })
    }
}

impl From<HashMap<String, String>> for AuthParams {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AuthParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for AuthParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
