use serde::Deserialize;
use serde_json::{Map, Value};

/// Response envelope returned by Vault for reads, lists and logins
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secret {
    #[serde(default)]
    pub request_id: String,
    #[serde(default)]
    pub lease_id: String,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
    #[serde(default)]
    pub auth: Option<SecretAuth>,
}

impl Secret {
    /// Child names from a list response (`data.keys`)
    pub fn keys(&self) -> Vec<String> {
        self.data
            .as_ref()
            .and_then(|data| data.get("keys"))
            .and_then(Value::as_array)
            .map(|keys| {
                keys.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Auth block of a login response
#[derive(Debug, Clone, Deserialize)]
pub struct SecretAuth {
    pub client_token: String,
    #[serde(default)]
    pub accessor: String,
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub lease_duration: u64,
    #[serde(default)]
    pub renewable: bool,
}

/// `sys/internal/ui/mounts/{mount}` response
#[derive(Debug, Deserialize)]
pub(crate) struct MountResponse {
    pub data: Option<MountData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MountData {
    #[serde(rename = "type")]
    pub engine_type: String,
    #[serde(default)]
    pub options: Option<Map<String, Value>>,
}
