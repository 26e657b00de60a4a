// ABOUTME: Simulated gateway deployment for the final wizard step
// Reports progress on a fixed tick, then records and signals step 6 completion

use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use super::controller::{FlowController, Transition};
use super::data::{FieldIssue, ReviewDeployData, StepData};
use super::review::{ReviewItem, ReviewReport};
use super::step::StepId;

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Please fix all validation errors before deploying ({} errors)", .0.len())]
    NotReady(Vec<ReviewItem>),

    #[error("Deployment record rejected: {0:?}")]
    Rejected(Vec<FieldIssue>),
}

/// Progress percentage reported per tick
const PROGRESS_STEP: u8 = 10;

/// Run the simulated deployment.
///
/// `on_progress` receives 0, 10, ... 100, one value per `tick`. On success
/// the step 6 record is stored with a deployment timestamp and the step is
/// signalled complete.
pub async fn deploy<P>(
    controller: &FlowController,
    tick: Duration,
    mut on_progress: P,
) -> Result<Transition, DeployError>
where
    P: FnMut(u8),
{
    let report = ReviewReport::from_forms(controller.forms());
    if report.has_errors() {
        return Err(DeployError::NotReady(report.errors().cloned().collect()));
    }

    info!("Starting deployment");
    let mut ticker = interval(tick.max(Duration::from_millis(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut progress = 0u8;
    loop {
        ticker.tick().await;
        on_progress(progress);
        if progress >= 100 {
            break;
        }
        progress = progress.saturating_add(PROGRESS_STEP).min(100);
    }

    let record = StepData::ReviewDeploy(ReviewDeployData {
        confirmed: true,
        deployed_at: Some(Utc::now()),
    });
    let submission = controller
        .submit(StepId::ReviewDeploy.path(), record)
        .await;

    if submission.transition.is_rejected() {
        return Err(DeployError::Rejected(submission.issues));
    }

    info!("Deployment finished");
    Ok(submission.transition)
}
