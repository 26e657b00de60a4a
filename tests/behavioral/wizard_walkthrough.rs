// ABOUTME: Behavioral test walking the whole wizard, review and deployment included

use super::fixtures::Wizard;
use gatewise::wizard::{
    deploy, DeployError, NavigationPolicy, ReviewReport, ReviewStatus, StepId, Transition,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[tokio::test]
async fn walkthrough_reaches_deployment() {
    let wizard = Wizard::with_policy(NavigationPolicy::Linear);
    let tracker = wizard.controller.tracker();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = tracker.subscribe(move |id| sink.lock().unwrap().push(id));

    wizard.complete_until(StepId::ReviewDeploy).await;
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    assert_eq!(wizard.controller.navigate("/onboard/step6"), StepId::ReviewDeploy);

    let report = ReviewReport::from_forms(wizard.controller.forms());
    assert!(!report.has_errors());
    assert_eq!(report.items.len(), 6);
    assert_eq!(report.items.last().unwrap().message, "Ready for deployment");

    let mut ticks = Vec::new();
    let transition = deploy(&wizard.controller, Duration::from_millis(1), |p| ticks.push(p))
        .await
        .unwrap();

    assert_eq!(
        transition,
        Transition::Finished {
            step: StepId::ReviewDeploy
        }
    );
    assert_eq!(ticks, (0..=100).step_by(10).collect::<Vec<u8>>());
    assert!(tracker.progress().is_complete());
    assert_eq!(seen.lock().unwrap().last(), Some(&6));
}

#[tokio::test]
async fn deployment_is_refused_without_mappings() {
    let wizard = Wizard::new();
    wizard.complete_until(StepId::EndpointMapping).await;
    wizard
        .controller
        .forms()
        .save("step4", &serde_json::json!({ "mappings": [] }));

    let report = ReviewReport::from_forms(wizard.controller.forms());
    let errors: Vec<_> = report.errors().map(|i| i.step).collect();
    assert_eq!(errors, vec![4, 6]);
    assert_eq!(report.items[3].status, ReviewStatus::Error);

    let result = deploy(&wizard.controller, Duration::from_millis(1), |_| {}).await;
    assert!(matches!(result, Err(DeployError::NotReady(items)) if items.len() == 2));
    assert!(!wizard.controller.tracker().registry().is_completed(StepId::ReviewDeploy));
}
