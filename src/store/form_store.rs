// ABOUTME: Per-step form record persistence on top of a key-value store
// Save failures are logged and swallowed; unreadable records fall back to defaults

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::{SharedStore, FORM_KEY_PREFIX, STEPS_KEY};
use crate::wizard::{StepData, StepId};

#[derive(Clone)]
pub struct FormStore {
    store: SharedStore,
}

impl FormStore {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// Full storage key for a step key (`step1` -> `formState_step1`)
    pub fn storage_key(step_key: &str) -> String {
        format!("{FORM_KEY_PREFIX}{step_key}")
    }

    /// Overwrite the record stored under `step_key`.
    ///
    /// Never fails: serialization or storage errors are logged and the call
    /// becomes a no-op. Returns whether the record was written.
    pub fn save<T: Serialize + ?Sized>(&self, step_key: &str, data: &T) -> bool {
        let json = match serde_json::to_string(data) {
            Ok(json) => json,
            Err(e) => {
                error!("Error serializing form data for step {}: {}", step_key, e);
                return false;
            }
        };

        match self.store.set(&Self::storage_key(step_key), &json) {
            Ok(()) => {
                debug!("Saved form data for step {}", step_key);
                true
            }
            Err(e) => {
                error!("Error saving form data for step {}: {}", step_key, e);
                false
            }
        }
    }

    /// Load the record under `step_key`, or `default` if it is missing or
    /// does not decode as `T`
    pub fn load<T: DeserializeOwned>(&self, step_key: &str, default: T) -> T {
        let raw = match self.store.get(&Self::storage_key(step_key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(e) => {
                error!("Error loading form data for step {}: {}", step_key, e);
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error loading form data for step {}: {}", step_key, e);
                default
            }
        }
    }

    /// Save a typed record under its owning step's key
    pub fn save_step(&self, data: &StepData) -> bool {
        self.save(data.step().form_key(), data)
    }

    /// Load the typed record for `step`, validated against its schema.
    ///
    /// Missing and malformed records both yield `None`.
    pub fn load_step(&self, step: StepId) -> Option<StepData> {
        let value: Option<serde_json::Value> = self.load(step.form_key(), None);
        let value = value?;
        match StepData::from_value(step, value) {
            Ok(data) => Some(data),
            Err(e) => {
                warn!("Stored record for {} does not match its schema: {}", step.form_key(), e);
                None
            }
        }
    }

    /// Typed record for `step`, or the panel's initial record
    pub fn load_step_or_default(&self, step: StepId) -> StepData {
        self.load_step(step).unwrap_or_else(|| StepData::default_for(step))
    }

    /// Remove every per-step record and the step registry. Idempotent.
    pub fn clear_all(&self) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                error!("Error listing stored keys: {}", e);
                Vec::new()
            }
        };

        let mut removed = 0usize;
        for key in keys.iter().filter(|k| k.starts_with(FORM_KEY_PREFIX)) {
            match self.store.delete(key) {
                Ok(()) => removed += 1,
                Err(e) => error!("Error removing {}: {}", key, e),
            }
        }
        if let Err(e) = self.store.delete(STEPS_KEY) {
            error!("Error removing step registry: {}", e);
        }

        debug!("Cleared {} form records and the step registry", removed);
    }
}
