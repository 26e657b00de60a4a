// ABOUTME: Persisted registry of the six step definitions
// Seeds the canonical steps when the stored collection is missing or unreadable

use tracing::{debug, error, warn};

use super::step::{StepDefinition, StepId};
use crate::store::{SharedStore, STEPS_KEY};

#[derive(Clone)]
pub struct StepRegistry {
    store: SharedStore,
}

impl StepRegistry {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// The six steps in order, all incomplete
    pub fn canonical() -> Vec<StepDefinition> {
        StepId::all().iter().copied().map(StepDefinition::new).collect()
    }

    /// Read the registry, seeding and persisting it if absent.
    ///
    /// Titles, paths and order always come from [`StepId`]; only the
    /// `completed` flags are taken from storage. A stored collection that
    /// cannot be decoded is treated as absent.
    pub fn steps(&self) -> Vec<StepDefinition> {
        match self.read() {
            Some(stored) => Self::normalize(stored),
            None => {
                let steps = Self::canonical();
                debug!("Seeding step registry with {} steps", steps.len());
                self.persist(&steps);
                steps
            }
        }
    }

    pub fn step(&self, id: StepId) -> StepDefinition {
        self.steps()
            .into_iter()
            .find(|s| s.id == id)
            .unwrap_or_else(|| StepDefinition::new(id))
    }

    pub fn is_completed(&self, id: StepId) -> bool {
        self.step(id).completed
    }

    fn read(&self) -> Option<Vec<StepDefinition>> {
        let raw = match self.store.get(STEPS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Error reading step registry: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Vec<StepDefinition>>(&raw) {
            Ok(steps) => Some(steps),
            Err(e) => {
                warn!("Discarding malformed step registry: {}", e);
                None
            }
        }
    }

    /// Rebuild the canonical list carrying over stored completion flags
    fn normalize(stored: Vec<StepDefinition>) -> Vec<StepDefinition> {
        Self::canonical()
            .into_iter()
            .map(|mut def| {
                def.completed = stored.iter().any(|s| s.id == def.id && s.completed);
                def
            })
            .collect()
    }

    /// Write the full registry. Failures are logged, never propagated.
    pub(crate) fn persist(&self, steps: &[StepDefinition]) {
        let json = match serde_json::to_string(steps) {
            Ok(json) => json,
            Err(e) => {
                error!("Error serializing step registry: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(STEPS_KEY, &json) {
            error!("Error saving step registry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn registry() -> (Arc<MemoryStore>, StepRegistry) {
        let store = Arc::new(MemoryStore::new());
        (store.clone(), StepRegistry::new(store))
    }

    #[test]
    fn test_fresh_registry_is_seeded_and_persisted() {
        let (store, registry) = registry();
        assert!(store.get(STEPS_KEY).unwrap().is_none());

        let steps = registry.steps();
        assert_eq!(steps.len(), 6);
        assert!(steps.iter().all(|s| !s.completed));
        assert_eq!(
            steps.iter().map(|s| s.id.number()).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );

        let raw = store.get(STEPS_KEY).unwrap().unwrap();
        let stored: Vec<StepDefinition> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored, steps);
    }

    #[test]
    fn test_malformed_registry_is_reseeded() {
        let (store, registry) = registry();
        store.set(STEPS_KEY, "[{\"id\": 1").unwrap();

        let steps = registry.steps();
        assert_eq!(steps, StepRegistry::canonical());
    }

    #[test]
    fn test_partial_registry_keeps_completion_and_order() {
        let (store, registry) = registry();
        store
            .set(
                STEPS_KEY,
                r#"[{"id":3,"title":"Renamed","path":"/x","completed":true},
                    {"id":1,"title":"Basic Information","path":"/onboard/step1","completed":false}]"#,
            )
            .unwrap();

        let steps = registry.steps();
        assert_eq!(steps.len(), 6);
        assert_eq!(steps[2].title, "Authentication Setup");
        assert_eq!(steps[2].path, "/onboard/step3");
        assert!(steps[2].completed);
        assert_eq!(steps.iter().filter(|s| s.completed).count(), 1);
    }
}
