use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Vault address is not configured")]
    MissingAddress,

    #[error("you have to set the auth type when using the vault backend")]
    MissingAuthType,

    #[error("Unknown auth type: {0}")]
    UnknownAuthType(String),

    #[error("{key} is missing from configuration")]
    MissingParameter { key: String },

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Failed to read kubernetes JWT from {}: {source}", path.display())]
    KubernetesJwt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport setup failed: {0}")]
    Transport(String),

    #[error("Secret not found: {path}")]
    SecretNotFound { path: String },

    #[error("Vault client error ({status}): {message}")]
    ClientError { status: u16, message: String },

    #[error("Vault request error: {0}")]
    RequestError(String),

    #[error("there was an error getting {mount} engine info: {reason}")]
    Probe { mount: String, reason: String },

    #[error("Engine type {engine} is not supported (mount {mount})")]
    EngineUnsupported { mount: String, engine: String },

    #[error("Couldn't list {path}: {reason}")]
    List { path: String, reason: String },

    #[error("Couldn't read secret {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("type of '{key}' is not supported ({kind})")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("Prefix {prefix:?} does not name a mount")]
    InvalidPrefix { prefix: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VaultError {
    /// Construction-time configuration problems, never retried.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            VaultError::MissingAddress
                | VaultError::MissingAuthType
                | VaultError::UnknownAuthType(_)
                | VaultError::MissingParameter { .. }
        )
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        VaultError::RequestError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_parameter_names_key() {
        let err = VaultError::MissingParameter {
            key: "role-id".to_string(),
        };
        assert_eq!(err.to_string(), "role-id is missing from configuration");
        assert!(err.is_config());
    }

    #[test]
    fn test_runtime_errors_are_not_config() {
        let err = VaultError::Read {
            path: "/secret/foo".to_string(),
            reason: "boom".to_string(),
        };
        assert!(!err.is_config());
    }
}
