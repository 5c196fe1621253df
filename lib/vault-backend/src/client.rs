use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::auth::{AuthParams, AuthType, Authenticator, params};
use crate::engine::{self, KvVersion};
use crate::error::VaultError;
use crate::flatten::flatten;
use crate::http::{HttpStore, TransportConfig};
use crate::lister::list_secrets;
use crate::mounts::{dedupe, mount_of};
use crate::report::{Reporter, TracingReporter};
use crate::store::SecretStore;

/// Environment variables read by [`VaultClientBuilder::from_env`], mapped to auth options
const PARAM_ENV: &[(&str, &str)] = &[
    ("VAULT_TOKEN", params::TOKEN),
    ("VAULT_ROLE_ID", params::ROLE_ID),
    ("VAULT_SECRET_ID", params::SECRET_ID),
    ("VAULT_AUTH_PATH", params::PATH),
    ("VAULT_CACERT", params::CA_CERT),
    ("VAULT_CLIENT_CERT", params::CERT),
    ("VAULT_CLIENT_KEY", params::KEY),
];

pub struct VaultClientBuilder {
    address: Option<String>,
    auth_type: Option<String>,
    params: AuthParams,
    k8s_jwt_path: Option<PathBuf>,
    reporter: Option<Arc<dyn Reporter>>,
}

impl Default for VaultClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultClientBuilder {
    pub fn new() -> Self {
        Self {
            address: None,
            auth_type: None,
            params: AuthParams::new(),
            k8s_jwt_path: None,
            reporter: None,
        }
    }

    /// Builder pre-populated from `VAULT_ADDR`, `VAULT_AUTH_TYPE`,
    /// `K8S_JWT_TOKEN_PATH` and the credential variables.
    pub fn from_env() -> Self {
        let mut builder = Self::new();
        builder.address = std::env::var("VAULT_ADDR").ok();
        builder.auth_type = std::env::var("VAULT_AUTH_TYPE").ok();
        builder.k8s_jwt_path = std::env::var("K8S_JWT_TOKEN_PATH").ok().map(PathBuf::from);
        for (var, key) in PARAM_ENV {
            if let Ok(value) = std::env::var(var) {
                builder.params.insert(*key, value);
            }
        }
        builder
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn auth_type(mut self, auth_type: impl Into<String>) -> Self {
        self.auth_type = Some(auth_type.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.params.extend(params);
        self
    }

    pub fn k8s_jwt_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.k8s_jwt_path = Some(path.into());
        self
    }

    /// Where recovered errors go; defaults to [`TracingReporter`]
    pub fn reporter(mut self, reporter: Arc<dyn Reporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    fn authenticator(&self) -> Result<Authenticator, VaultError> {
        let auth_type: AuthType = self
            .auth_type
            .as_deref()
            .ok_or(VaultError::MissingAuthType)?
            .parse()?;
        tracing::info!("Vault authentication backend set to {}", auth_type);

        let authenticator = Authenticator::new(auth_type);
        Ok(match &self.k8s_jwt_path {
            Some(path) => authenticator.with_jwt_path(path.clone()),
            None => authenticator,
        })
    }

    fn transport(&self) -> Result<TransportConfig, VaultError> {
        let address = self
            .address
            .clone()
            .filter(|address| !address.is_empty())
            .ok_or(VaultError::MissingAddress)?;

        let mut transport = TransportConfig::new(address);
        if let (Some(cert), Some(key)) = (self.params.get(params::CERT), self.params.get(params::KEY)) {
            transport = transport.client_cert(cert, key);
        }
        if let Some(ca) = self.params.get(params::CA_CERT) {
            transport = transport.ca_cert(ca);
        }
        Ok(transport)
    }

    /// Connects over HTTP and authenticates
    pub async fn build(self) -> Result<VaultClient, VaultError> {
        let authenticator = self.authenticator()?;
        let store = HttpStore::new(&self.transport()?)?;
        self.finish(authenticator, Box::new(store)).await
    }

    /// Authenticates against a caller-provided store
    pub async fn build_with_store(
        self,
        store: impl SecretStore + 'static,
    ) -> Result<VaultClient, VaultError> {
        let authenticator = self.authenticator()?;
        self.finish(authenticator, Box::new(store)).await
    }

    async fn finish(
        self,
        authenticator: Authenticator,
        mut store: Box<dyn SecretStore>,
    ) -> Result<VaultClient, VaultError> {
        authenticator.authenticate(store.as_mut(), &self.params).await?;

        Ok(VaultClient {
            store,
            reporter: self
                .reporter
                .unwrap_or_else(|| Arc::new(TracingReporter)),
        })
    }
}

/// Authenticated client that flattens kv mounts into key/value pairs
pub struct VaultClient {
    store: Box<dyn SecretStore>,
    reporter: Arc<dyn Reporter>,
}

impl VaultClient {
    pub fn builder() -> VaultClientBuilder {
        VaultClientBuilder::new()
    }

    /// Session token obtained at construction
    pub fn token(&self) -> Option<&str> {
        self.store.token()
    }

    /// Reads every secret of the mounts `prefixes` live in.
    ///
    /// Keys are secret paths (holding the JSON of the whole secret) and the
    /// flattened paths of each string field. Failures are reported and the
    /// affected mount, path or field is skipped.
    pub async fn fetch<S: AsRef<str>>(&self, prefixes: &[S]) -> HashMap<String, String> {
        let reporter = self.reporter.as_ref();
        let mounts = dedupe(prefixes.iter().filter_map(|prefix| {
            let mount = mount_of(prefix.as_ref());
            if mount.is_none() {
                reporter.report(&VaultError::InvalidPrefix {
                    prefix: prefix.as_ref().to_string(),
                });
            }
            mount
        }));

        let mut vars = HashMap::new();
        for mount in mounts {
            let info = match engine::probe(self.store.as_ref(), &mount).await {
                Ok(info) => info,
                Err(e) => {
                    reporter.report(&e);
                    continue;
                }
            };
            let Some(version) = info.supported_version() else {
                reporter.report(&info.unsupported(&mount));
                continue;
            };

            tracing::debug!(mount = %mount, version = ?version, "listing secrets");
            for path in list_secrets(self.store.as_ref(), &mount, version, reporter).await {
                if let Err(e) = self.fetch_secret(&path, version, &mut vars).await {
                    reporter.report(&e);
                }
            }
        }
        vars
    }

    async fn fetch_secret(
        &self,
        path: &str,
        version: KvVersion,
        vars: &mut HashMap<String, String>,
    ) -> Result<(), VaultError> {
        let read_error = |reason: String| VaultError::Read {
            path: path.to_string(),
            reason,
        };

        let secret = self
            .store
            .read(path)
            .await
            .map_err(|e| read_error(e.to_string()))?
            .ok_or_else(|| read_error("secret not found".to_string()))?;
        let mut data = secret
            .data
            .ok_or_else(|| read_error("response has no data".to_string()))?;

        let payload = match version {
            KvVersion::V2 => data
                .remove("data")
                .filter(|inner| !inner.is_null())
                .ok_or_else(|| read_error("kv v2 response has no data field".to_string()))?,
            _ => Value::Object(data),
        };

        vars.insert(path.to_string(), serde_json::to_string(&payload)?);
        flatten(path, &payload, vars, self.reporter.as_ref());
        Ok(())
    }

    /// Change watching is not implemented: waits for `stop` and reports no change.
    pub async fn watch_prefix(
        &self,
        _prefix: &str,
        _keys: &[String],
        _wait_index: u64,
        stop: oneshot::Receiver<bool>,
    ) -> Result<u64, VaultError> {
        // a dropped sender counts as a stop
        let _ = stop.await;
        Ok(0)
    }
}
