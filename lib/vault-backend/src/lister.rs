use std::future::Future;
use std::pin::Pin;

use crate::engine::KvVersion;
use crate::error::VaultError;
use crate::report::Reporter;
use crate::store::SecretStore;

type Walk<'a> = Pin<Box<dyn Future<Output = bool> + Send + 'a>>;

/// Every secret path under `mount`, depth-first in discovery order.
///
/// A mount that lists nothing at its root yields its own base path as the
/// only entry.
pub async fn list_secrets(
    store: &dyn SecretStore,
    mount: &str,
    version: KvVersion,
    reporter: &dyn Reporter,
) -> Vec<String> {
    let mut found = Vec::new();
    let listed = walk(store, mount, version, String::new(), &mut found, reporter).await;
    if !listed {
        found.push(version.secret_path(mount, ""));
    }
    found
}

/// Lists `key` and recurses into subdirectories; false if `key` listed nothing
fn walk<'a>(
    store: &'a dyn SecretStore,
    mount: &'a str,
    version: KvVersion,
    key: String,
    found: &'a mut Vec<String>,
    reporter: &'a dyn Reporter,
) -> Walk<'a> {
    Box::pin(async move {
        let path = version.list_path(mount, &key);
        let entries = match store.list(&path).await {
            Ok(entries) => entries,
            Err(e) => {
                reporter.report(&VaultError::List {
                    path,
                    reason: e.to_string(),
                });
                Vec::new()
            }
        };

        if entries.is_empty() {
            return false;
        }

        for entry in entries {
            let child = format!("{}/{}", key, entry.trim_end_matches('/'));
            if entry.ends_with('/') {
                walk(store, mount, version, child, found, reporter).await;
            } else {
                found.push(version.secret_path(mount, &child));
            }
        }
        true
    })
}
