//! In-memory store used by unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::VaultError;
use crate::models::Secret;
use crate::store::SecretStore;

#[derive(Default)]
pub struct MemoryStore {
    pub secrets: HashMap<String, Secret>,
    pub lists: HashMap<String, Vec<String>>,
    pub raw: HashMap<String, Vec<u8>>,
    pub writes: HashMap<String, Secret>,
    pub failing: Vec<String>,
    token: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
    bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, path: &str, data: serde_json::Value) -> Self {
        self.secrets.insert(path.to_string(), secret(data));
        self
    }

    pub fn with_list(mut self, path: &str, keys: &[&str]) -> Self {
        self.lists.insert(
            path.to_string(),
            keys.iter().map(|k| k.to_string()).collect(),
        );
        self
    }

    pub fn with_mount(mut self, mount: &str, body: serde_json::Value) -> Self {
        self.raw.insert(
            format!("sys/internal/ui/mounts{}", mount),
            body.to_string().into_bytes(),
        );
        self
    }

    pub fn with_write(mut self, path: &str, response: serde_json::Value) -> Self {
        self.writes
            .insert(path.to_string(), serde_json::from_value(response).unwrap());
        self
    }

    /// Every call to `path` fails
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.push(path.to_string());
        self
    }

    /// Shared log of `"<op> <path>"` entries
    pub fn calls(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.calls)
    }

    /// Bodies passed to `write`, in order
    pub fn bodies(&self) -> Arc<Mutex<Vec<serde_json::Value>>> {
        Arc::clone(&self.bodies)
    }

    fn record(&self, op: &str, path: &str) -> Result<(), VaultError> {
        self.calls.lock().unwrap().push(format!("{} {}", op, path));
        if self.failing.iter().any(|p| p == path) {
            return Err(VaultError::ClientError {
                status: 500,
                message: format!("{} failed", path),
            });
        }
        Ok(())
    }
}

pub fn secret(data: serde_json::Value) -> Secret {
    serde_json::from_value(serde_json::json!({ "data": data })).unwrap()
}

#[async_trait]
impl SecretStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<Secret>, VaultError> {
        self.record("read", path)?;
        Ok(self.secrets.get(path).cloned())
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, VaultError> {
        self.record("list", path)?;
        Ok(self.lists.get(path).cloned().unwrap_or_default())
    }

    async fn raw_read(&self, path: &str) -> Result<Vec<u8>, VaultError> {
        self.record("raw_read", path)?;
        self.raw
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::SecretNotFound {
                path: path.to_string(),
            })
    }

    async fn write(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Option<Secret>, VaultError> {
        self.record("write", path)?;
        self.bodies.lock().unwrap().push(body);
        Ok(self.writes.get(path).cloned())
    }

    fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
