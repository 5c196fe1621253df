use std::sync::Mutex;

use crate::error::VaultError;

/// Receives errors that were recovered while walking the store.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &VaultError);
}

/// Default reporter: emits a `tracing` event per error
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, error: &VaultError) {
        match error {
            VaultError::Probe { mount, .. } => tracing::error!(mount = %mount, "{}", error),
            VaultError::EngineUnsupported { mount, .. } => {
                tracing::error!(mount = %mount, "{}", error)
            }
            VaultError::Read { path, .. } => tracing::error!(path = %path, "{}", error),
            VaultError::List { path, .. } => tracing::warn!(path = %path, "{}", error),
            VaultError::UnsupportedValue { key, .. } => tracing::warn!(key = %key, "{}", error),
            _ => tracing::warn!("{}", error),
        }
    }
}

/// Keeps every reported error as its message, in order
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: Mutex<Vec<String>>,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Reporter for CollectingReporter {
    fn report(&self, error: &VaultError) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(error.to_string());
    }
}
