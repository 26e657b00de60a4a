// ABOUTME: Completion tracker for onboarding steps
// Listens on the completion signal and flips `completed` flags in the registry

use serde::Serialize;
use tracing::{debug, info};

use super::registry::StepRegistry;
use super::signal::{CompletionSignal, StepCompleted, Subscription};
use super::step::{StepDefinition, StepId};
use crate::store::SharedStore;

/// Which steps are completed, out of how many
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Completed step ids in step order
    pub completed: Vec<u32>,
    pub completed_count: usize,
    pub total_count: usize,
}

impl Progress {
    pub fn percent(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.completed_count as f64 / self.total_count as f64 * 100.0;
        pct
    }

    pub const fn is_complete(&self) -> bool {
        self.total_count > 0 && self.completed_count == self.total_count
    }
}

pub struct CompletionTracker {
    registry: StepRegistry,
    signal: CompletionSignal,
    _listener: Subscription,
}

impl CompletionTracker {
    /// Create a tracker and attach it to `signal`.
    ///
    /// The tracker registers before any other observer it is handed to, so
    /// observers that re-read the registry on a completion see it updated.
    pub fn new(store: SharedStore, signal: CompletionSignal) -> Self {
        let registry = StepRegistry::new(store);
        let listener_registry = registry.clone();
        let listener = signal.subscribe(move |event: &StepCompleted| {
            Self::mark_in(&listener_registry, event.step_id);
        });

        Self {
            registry,
            signal,
            _listener: listener,
        }
    }

    pub fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    /// Mark `step_id` complete and persist the registry.
    ///
    /// Unknown ids and already-completed steps are no-ops. Returns whether
    /// the registry changed.
    pub fn mark_completed(&self, step_id: u32) -> bool {
        Self::mark_in(&self.registry, step_id)
    }

    fn mark_in(registry: &StepRegistry, step_id: u32) -> bool {
        let mut steps = registry.steps();
        let Some(step) = steps.iter_mut().find(|s| s.id.number() == step_id) else {
            debug!("Ignoring completion for unknown step {}", step_id);
            return false;
        };
        if step.completed {
            return false;
        }

        step.completed = true;
        registry.persist(&steps);
        info!("Step {} marked completed", step_id);
        true
    }

    /// Observe completions; the handler receives the completed step id
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.signal.subscribe(move |event: &StepCompleted| handler(event.step_id))
    }

    pub fn progress(&self) -> Progress {
        let steps = self.registry.steps();
        let completed: Vec<u32> = steps
            .iter()
            .filter(|s| s.completed)
            .map(|s| s.id.number())
            .collect();
        Progress {
            completed_count: completed.len(),
            total_count: steps.len(),
            completed,
        }
    }

    pub fn completed_steps(&self) -> Vec<StepDefinition> {
        self.registry.steps().into_iter().filter(|s| s.completed).collect()
    }

    /// First step not yet completed, if any
    pub fn first_incomplete(&self) -> Option<StepId> {
        self.registry
            .steps()
            .into_iter()
            .find(|s| !s.completed)
            .map(|s| s.id)
    }
}
