use serde_json::Value;

use crate::error::VaultError;
use crate::models::MountResponse;
use crate::store::SecretStore;

const MOUNTS_PATH: &str = "sys/internal/ui/mounts";
const KV_ENGINE: &str = "kv";

/// Key-value schema version of a mount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvVersion {
    V1,
    V2,
    Unknown,
}

impl KvVersion {
    /// Missing or empty version means v1
    fn parse(version: Option<&Value>) -> Self {
        match version {
            None | Some(Value::Null) => KvVersion::V1,
            Some(Value::String(v)) if v.is_empty() || v == "1" => KvVersion::V1,
            Some(Value::String(v)) if v == "2" => KvVersion::V2,
            Some(_) => KvVersion::Unknown,
        }
    }

    /// Path listed for the directory `key` (empty or starting with `/`)
    pub fn list_path(&self, mount: &str, key: &str) -> String {
        match self {
            KvVersion::V2 => format!("{}/metadata{}", mount, key),
            _ => format!("{}{}", mount, key),
        }
    }

    /// Readable path of the secret `key` (empty or starting with `/`)
    pub fn secret_path(&self, mount: &str, key: &str) -> String {
        match self {
            KvVersion::V2 => format!("{}/data{}", mount, key),
            _ => format!("{}{}", mount, key),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub engine_type: String,
    pub kv_version: KvVersion,
}

impl EngineInfo {
    /// Version to walk the mount with, `None` if the engine can't be walked
    pub fn supported_version(&self) -> Option<KvVersion> {
        match (self.engine_type.as_str(), self.kv_version) {
            (KV_ENGINE, KvVersion::V1) => Some(KvVersion::V1),
            (KV_ENGINE, KvVersion::V2) => Some(KvVersion::V2),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match (self.engine_type.as_str(), self.kv_version) {
            (KV_ENGINE, KvVersion::Unknown) => format!("{} (unknown version)", KV_ENGINE),
            (engine, _) => engine.to_string(),
        }
    }

    pub(crate) fn unsupported(&self, mount: &str) -> VaultError {
        VaultError::EngineUnsupported {
            mount: mount.to_string(),
            engine: self.describe(),
        }
    }
}

/// Reads the mount metadata of `mount` and extracts engine type and kv version
pub async fn probe(store: &dyn SecretStore, mount: &str) -> Result<EngineInfo, VaultError> {
    let path = format!("{}/{}", MOUNTS_PATH, mount.trim_start_matches('/'));
    let probe_error = |reason: String| VaultError::Probe {
        mount: mount.to_string(),
        reason,
    };

    let body = store
        .raw_read(&path)
        .await
        .map_err(|e| probe_error(e.to_string()))?;
    let response: MountResponse =
        serde_json::from_slice(&body).map_err(|e| probe_error(e.to_string()))?;
    let data = response
        .data
        .ok_or_else(|| probe_error("response has no data".to_string()))?;

    let kv_version = if data.engine_type == KV_ENGINE {
        KvVersion::parse(data.options.as_ref().and_then(|o| o.get("version")))
    } else {
        KvVersion::Unknown
    };

    Ok(EngineInfo {
        engine_type: data.engine_type,
        kv_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_probe_kv_v2() {
        let store = MemoryStore::new().with_mount(
            "/secret",
            json!({ "data": { "type": "kv", "options": { "version": "2" } } }),
        );
        let info = probe(&store, "/secret").await.unwrap();
        assert_eq!(info.engine_type, "kv");
        assert_eq!(info.kv_version, KvVersion::V2);
        assert_eq!(info.supported_version(), Some(KvVersion::V2));
    }

    #[tokio::test]
    async fn test_probe_kv_without_version_is_v1() {
        for options in [json!(null), json!({}), json!({ "version": "" }), json!({ "version": "1" })] {
            let store = MemoryStore::new().with_mount(
                "/kv",
                json!({ "data": { "type": "kv", "options": options.clone() } }),
            );
            let info = probe(&store, "/kv").await.unwrap();
            assert_eq!(info.kv_version, KvVersion::V1, "options {}", options);
        }
    }

    #[tokio::test]
    async fn test_probe_other_engine_is_unsupported() {
        let store = MemoryStore::new()
            .with_mount("/pki", json!({ "data": { "type": "pki", "options": null } }));
        let info = probe(&store, "/pki").await.unwrap();
        assert_eq!(info.supported_version(), None);
        assert_eq!(
            info.unsupported("/pki").to_string(),
            "Engine type pki is not supported (mount /pki)"
        );
    }

    #[tokio::test]
    async fn test_probe_unknown_kv_version() {
        let store = MemoryStore::new().with_mount(
            "/kv",
            json!({ "data": { "type": "kv", "options": { "version": "3" } } }),
        );
        let info = probe(&store, "/kv").await.unwrap();
        assert_eq!(info.kv_version, KvVersion::Unknown);
        assert_eq!(info.supported_version(), None);
    }

    #[tokio::test]
    async fn test_probe_read_failure() {
        let store = MemoryStore::new();
        let result = probe(&store, "/missing").await;
        assert!(matches!(result, Err(VaultError::Probe { mount, .. }) if mount == "/missing"));
    }

    #[tokio::test]
    async fn test_probe_parse_failure() {
        let mut store = MemoryStore::new();
        store
            .raw
            .insert("sys/internal/ui/mounts/broken".to_string(), b"<html>".to_vec());
        let result = probe(&store, "/broken").await;
        assert!(matches!(result, Err(VaultError::Probe { .. })));
    }

    #[test]
    fn test_paths_per_version() {
        assert_eq!(KvVersion::V1.list_path("/secret", "/app"), "/secret/app");
        assert_eq!(KvVersion::V2.list_path("/secret", "/app"), "/secret/metadata/app");
        assert_eq!(KvVersion::V1.secret_path("/secret", "/app/db"), "/secret/app/db");
        assert_eq!(KvVersion::V2.secret_path("/secret", "/app/db"), "/secret/data/app/db");
    }
}
