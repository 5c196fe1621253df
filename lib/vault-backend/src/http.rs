use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};

use crate::error::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

const TOKEN_HEADER: &str = "X-Vault-Token";

/// Address and TLS material used to reach Vault
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub address: String,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub ca_cert: Option<PathBuf>,
}

impl TransportConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Client certificate and key for mutual TLS. Both must be set to take effect.
    pub fn client_cert(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.client_cert = Some(cert.into());
        self.client_key = Some(key.into());
        self
    }

    /// PEM bundle used to verify the server
    pub fn ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert = Some(path.into());
        self
    }

    fn build_client(&self) -> Result<Client, VaultError> {
        let mut builder = Client::builder().use_rustls_tls();

        if let (Some(cert), Some(key)) = (&self.client_cert, &self.client_key) {
            let mut pem = read_pem(cert)?;
            pem.push(b'\n');
            pem.extend(read_pem(key)?);
            let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                VaultError::Transport(format!("Invalid client certificate {}: {}", cert.display(), e))
            })?;
            builder = builder.identity(identity);
        }

        if let Some(ca) = &self.ca_cert {
            let pem = read_pem(ca)?;
            let certs = reqwest::Certificate::from_pem_bundle(&pem).map_err(|e| {
                VaultError::Transport(format!("Invalid CA bundle {}: {}", ca.display(), e))
            })?;
            for cert in certs {
                builder = builder.add_root_certificate(cert);
            }
        }

        builder
            .build()
            .map_err(|e| VaultError::Transport(format!("Failed to create HTTP client: {}", e)))
    }
}

fn read_pem(path: &Path) -> Result<Vec<u8>, VaultError> {
    std::fs::read(path)
        .map_err(|e| VaultError::Transport(format!("Failed to read {}: {}", path.display(), e)))
}

/// [`SecretStore`] over the Vault HTTP API
pub struct HttpStore {
    address: String,
    client: Client,
    token: Option<String>,
}

impl HttpStore {
    pub fn new(config: &TransportConfig) -> Result<Self, VaultError> {
        if config.address.is_empty() {
            return Err(VaultError::MissingAddress);
        }
        Ok(Self {
            address: config.address.trim_end_matches('/').to_string(),
            client: config.build_client()?,
            token: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.address, path.trim_start_matches('/'))
    }

    /// Sends the request; `None` for 404 and 204
    async fn send(&self, mut request: RequestBuilder) -> Result<Option<Response>, VaultError> {
        if let Some(ref token) = self.token {
            request = request.header(TOKEN_HEADER, token);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => return Ok(None),
            status if !status.is_success() => {
                let message = response.text().await.unwrap_or_default();
                return Err(VaultError::ClientError {
                    status: status.as_u16(),
                    message,
                });
            }
            _ => {}
        }

        Ok(Some(response))
    }

    async fn parse(response: Option<Response>) -> Result<Option<Secret>, VaultError> {
        let Some(response) = response else {
            return Ok(None);
        };
        let body = response.bytes().await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&body)?))
    }
}

#[async_trait]
impl SecretStore for HttpStore {
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        Self::parse(response).await
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError> {
        let url = format!("{}?list=true", self.url(path));
        let response = self.send(self.client.get(url)).await?;
        Ok(Self::parse(response)
            .await?
            .map(|secret| secret.keys())
            .unwrap_or_default())
    }

    async fn raw_read(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        match self.send(self.client.get(self.url(path))).await? {
            Some(response) => Ok(response.bytes().await?.to_vec()),
            None => Err(VaultError::SecretNotFound {
                path: path.to_string(),
            }),
        }
    }

    async fn write(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<Secret>, VaultError> {
        let response = self.send(self.client.put(self.url(path)).json(&body)).await?;
        Self::parse(response).await
    }

    fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
