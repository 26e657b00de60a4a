// ABOUTME: Durable key-value storage used by the onboarding wizard
// Stands in for browser local storage: string keys, string (JSON) values

use std::sync::Arc;
use thiserror::Error;

pub mod file;
pub mod form_store;
pub mod memory;

pub use file::FileStore;
pub use form_store::FormStore;
pub use memory::MemoryStore;

/// Key holding the combined step registry / completion tracker collection
pub const STEPS_KEY: &str = "onboardingSteps";

/// Prefix of every per-step form record key (`formState_step1` ...)
pub const FORM_KEY_PREFIX: &str = "formState_";

/// Session authentication markers owned by [`crate::auth::SessionAuth`]
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const USER_EMAIL_KEY: &str = "userEmail";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage quota exceeded: limit {limit} bytes, required {required} bytes")]
    QuotaExceeded {
        /// Configured quota
        limit: usize,
        /// Size the store would have after the write
        required: usize,
    },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value contract the wizard needs from its storage backend.
///
/// All methods take `&self`; implementations handle their own interior
/// mutability so one store can be shared by the form store, the step
/// registry and the session markers.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// List every key currently stored
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Store handle shared between wizard components
pub type SharedStore = Arc<dyn KeyValueStore>;
