// ABOUTME: Behavioral tests for wizard state persisted through the file store

use super::fixtures::{valid_basic_info, valid_record, StoreDir};
use gatewise::store::{FileStore, FormStore, KeyValueStore, STEPS_KEY};
use gatewise::wizard::{FlowController, NavigationPolicy, StepData, StepId, Transition};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn progress_survives_reopening_the_store() {
    let dir = StoreDir::new();

    {
        let controller = FlowController::from_store(dir.open(), NavigationPolicy::Permissive);
        let submission = controller
            .submit("/onboard/step1", valid_record(StepId::BasicInfo))
            .await;
        assert_eq!(submission.transition.location(), "/onboard/step2");
    }

    let controller = FlowController::from_store(dir.open(), NavigationPolicy::Linear);
    let registry = controller.tracker().registry();
    assert!(registry.is_completed(StepId::BasicInfo));
    assert!(!registry.is_completed(StepId::ApiConfig));
    assert_eq!(
        controller.forms().load_step(StepId::BasicInfo),
        Some(StepData::BasicInfo(valid_basic_info()))
    );

    // Linear navigation resumes at the first incomplete step
    assert_eq!(controller.navigate("/onboard/step5"), StepId::ApiConfig);
}

#[test]
fn store_file_is_a_single_json_object() {
    let dir = StoreDir::new();
    let store = dir.open();
    let forms = FormStore::new(store.clone());
    assert!(forms.save("step1", &serde_json::json!({"gatewayName": "edge"})));

    let raw = std::fs::read_to_string(&dir.path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored = parsed["formState_step1"].as_str().unwrap();
    assert_eq!(
        serde_json::from_str::<serde_json::Value>(stored).unwrap(),
        serde_json::json!({"gatewayName": "edge"})
    );
}

#[test]
fn corrupt_store_file_starts_fresh() {
    let dir = StoreDir::new();
    std::fs::create_dir_all(dir.path.parent().unwrap()).unwrap();
    std::fs::write(&dir.path, "{ not json").unwrap();

    let controller = FlowController::from_store(dir.open(), NavigationPolicy::Permissive);
    let steps = controller.tracker().registry().steps();

    assert_eq!(steps.len(), 6);
    assert!(steps.iter().all(|s| !s.completed));
    assert!(controller.forms().load_step(StepId::BasicInfo).is_none());
}

#[tokio::test]
async fn clear_all_is_durable() {
    let dir = StoreDir::new();
    {
        let controller = FlowController::from_store(dir.open(), NavigationPolicy::Permissive);
        controller.submit("/onboard/step1", valid_record(StepId::BasicInfo)).await;
        controller.forms().clear_all();
    }

    let store = dir.open();
    assert!(store.get("formState_step1").unwrap().is_none());
    assert!(store.get(STEPS_KEY).unwrap().is_none());
}

#[tokio::test]
async fn full_store_does_not_block_the_wizard() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::open(&dir.path).unwrap().with_quota(Some(16)));
    let controller = FlowController::from_store(store.clone(), NavigationPolicy::Permissive);

    let submission = controller
        .submit("/onboard/step1", valid_record(StepId::BasicInfo))
        .await;

    assert_eq!(
        submission.transition,
        Transition::Advanced {
            from: StepId::BasicInfo,
            to: StepId::ApiConfig
        }
    );
    assert!(store.get("formState_step1").unwrap().is_none());
    assert!(!dir.path.exists());
}
