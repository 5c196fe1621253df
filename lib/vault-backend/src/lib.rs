//! vault-backend - flattens HashiCorp Vault kv mounts into key/value pairs
//!
//! Authenticates with one of the supported auth backends (app-role, app-id,
//! github, token, userpass, kubernetes, cert), then walks every kv v1/v2
//! mount named by the requested prefixes and flattens each secret into
//! slash-joined keys for configuration templating.

pub mod auth;
mod client;
mod engine;
mod error;
mod flatten;
mod http;
mod lister;
mod models;
mod mounts;
mod report;
mod store;

#[cfg(test)]
mod testing;

pub use auth::{AuthMethod, AuthParams, AuthType, Authenticator};
pub use client::{VaultClient, VaultClientBuilder};
pub use engine::{EngineInfo, KvVersion, probe};
pub use error::VaultError;
pub use flatten::{Field, flatten};
pub use http::{HttpStore, TransportConfig};
pub use lister::list_secrets;
pub use models::{Secret, SecretAuth};
pub use mounts::{dedupe, mount_of, normalize_prefix};
pub use report::{CollectingReporter, Reporter, TracingReporter};
pub use store::SecretStore;
