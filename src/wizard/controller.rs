// ABOUTME: Flow controller for the onboarding wizard
// The active step is always derived from the location; Next is gated on the
// step's validation, Previous and direct navigation never are

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

use super::data::{FieldIssue, StepData};
use super::review::ReviewReport;
use super::signal::{CompletionSignal, StepCompleted};
use super::step::StepId;
use super::tracker::CompletionTracker;
use crate::store::{FormStore, SharedStore};

/// How direct navigation (sidebar links, typed locations) is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    /// Any step can be opened regardless of earlier completion
    #[default]
    Permissive,
    /// Steps beyond the first incomplete one redirect to it
    Linear,
}

/// Result of a controller action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    /// Validation passed and the wizard moved forward
    Advanced { from: StepId, to: StepId },
    /// Validation passed on the final step; there is nowhere further to go
    Finished { step: StepId },
    /// Validation failed; the wizard stays put
    Rejected { step: StepId },
    /// Moved back one step
    Retreated { from: StepId, to: StepId },
    /// Previous on the first step
    Stayed { step: StepId },
}

impl Transition {
    /// Step active after this transition
    pub const fn step(&self) -> StepId {
        match self {
            Self::Advanced { to, .. } | Self::Retreated { to, .. } => *to,
            Self::Finished { step } | Self::Rejected { step } | Self::Stayed { step } => *step,
        }
    }

    /// Location to render after this transition
    pub const fn location(&self) -> &'static str {
        self.step().path()
    }

    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Outcome of submitting a typed record through [`FlowController::submit`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub transition: Transition,
    pub issues: Vec<FieldIssue>,
}

pub struct FlowController {
    forms: FormStore,
    tracker: CompletionTracker,
    signal: CompletionSignal,
    policy: NavigationPolicy,
}

impl FlowController {
    pub fn new(
        forms: FormStore,
        tracker: CompletionTracker,
        signal: CompletionSignal,
        policy: NavigationPolicy,
    ) -> Self {
        Self {
            forms,
            tracker,
            signal,
            policy,
        }
    }

    /// Wire a controller, tracker and signal around one shared store
    pub fn from_store(store: SharedStore, policy: NavigationPolicy) -> Self {
        let signal = CompletionSignal::new();
        let tracker = CompletionTracker::new(store.clone(), signal.clone());
        Self::new(FormStore::new(store), tracker, signal, policy)
    }

    pub fn forms(&self) -> &FormStore {
        &self.forms
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    pub fn signal(&self) -> &CompletionSignal {
        &self.signal
    }

    pub const fn policy(&self) -> NavigationPolicy {
        self.policy
    }

    /// Active step for `location`; unknown locations resolve to step 1
    pub fn current_step(&self, location: &str) -> StepId {
        StepId::resolve_path(location)
    }

    /// Next from the step at `location`.
    ///
    /// `validate` may be absent (always valid). It resolves to `Ok(true)` to
    /// proceed; `Ok(false)` and `Err(_)` both keep the wizard on the current
    /// step with no signal emitted. On success the completion signal for the
    /// step is emitted before the transition is returned.
    pub async fn next<F, Fut>(&self, location: &str, validate: Option<F>) -> Transition
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let step = self.current_step(location);

        let valid = match validate {
            None => true,
            Some(validate) => match validate().await {
                Ok(valid) => valid,
                Err(e) => {
                    warn!("Validation for {} failed with error: {:#}", step, e);
                    false
                }
            },
        };

        if !valid {
            debug!("{} rejected, staying", step);
            return Transition::Rejected { step };
        }

        self.signal.emit(StepCompleted {
            step_id: step.number(),
        });

        match step.next() {
            Some(to) => {
                info!("Advancing from {} to {}", step, to);
                Transition::Advanced { from: step, to }
            }
            None => {
                info!("Wizard finished at {}", step);
                Transition::Finished { step }
            }
        }
    }

    /// Next with a synchronous validation result
    pub async fn next_with(&self, location: &str, valid: bool) -> Transition {
        self.next(location, Some(|| async move { Ok::<bool, anyhow::Error>(valid) }))
            .await
    }

    /// Validate `data` with its own schema rules, persist it, then advance.
    ///
    /// The record must belong to the step at `location`. Nothing is written
    /// when validation fails, so the previously stored record is untouched.
    /// On the final step the stored configuration must also pass review.
    pub async fn submit(&self, location: &str, data: StepData) -> Submission {
        let step = self.current_step(location);

        let mut issues = Vec::new();
        if data.step() != step {
            issues.push(FieldIssue::new(
                "step",
                format!("record belongs to {}, not {}", data.step(), step),
            ));
        }
        issues.extend(data.validate());
        if step.is_final() {
            let report = ReviewReport::from_forms(&self.forms);
            issues.extend(
                report
                    .errors()
                    .filter(|item| item.step != step.number())
                    .map(|item| FieldIssue::new(format!("review.step{}", item.step), item.message.clone())),
            );
        }

        let valid = issues.is_empty();
        let forms = self.forms.clone();
        let transition = self
            .next(
                location,
                Some(move || async move {
                    if valid {
                        // Completion is only signalled after the record is stored
                        forms.save_step(&data);
                    }
                    Ok::<bool, anyhow::Error>(valid)
                }),
            )
            .await;

        Submission { transition, issues }
    }

    /// Previous from the step at `location`. `cleanup` runs first, even on
    /// step 1 where no transition happens.
    pub fn previous<F: FnOnce()>(&self, location: &str, cleanup: Option<F>) -> Transition {
        let step = self.current_step(location);
        if let Some(cleanup) = cleanup {
            cleanup();
        }

        match step.previous() {
            Some(to) => {
                debug!("Going back from {} to {}", step, to);
                Transition::Retreated { from: step, to }
            }
            None => Transition::Stayed { step },
        }
    }

    /// Direct navigation to `location`, returning the step to render
    pub fn navigate(&self, location: &str) -> StepId {
        let target = self.current_step(location);

        match self.policy {
            NavigationPolicy::Permissive => target,
            NavigationPolicy::Linear => match self.tracker.first_incomplete() {
                Some(frontier) if target > frontier => {
                    debug!("Linear navigation: {} redirected to {}", target, frontier);
                    frontier
                }
                _ => target,
            },
        }
    }
}
