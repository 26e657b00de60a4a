// ABOUTME: Behavioral tests for login gating and logout cleanup

use super::fixtures::StoreDir;
use gatewise::auth::{AuthGate, SessionAuth};
use gatewise::routing::{Resolution, Route, Router};
use gatewise::store::KeyValueStore;
use gatewise::wizard::{FlowController, NavigationPolicy, StepId};
use std::time::Duration;

#[tokio::test]
async fn login_opens_the_wizard_and_logout_wipes_it() {
    let dir = StoreDir::new();
    let store = dir.open();
    let auth = SessionAuth::new(store.clone(), Duration::ZERO);
    let controller = FlowController::from_store(store.clone(), NavigationPolicy::Permissive);
    let router = Router::new(true);

    assert_eq!(
        router.resolve_with("/onboard/step2", &auth, &controller),
        Resolution::Redirect(Route::Login)
    );

    assert!(auth.login("ops@example.com", "correct horse").await);
    assert_eq!(
        router.resolve_with("/onboard/step2", &auth, &controller),
        Resolution::Render(Route::Step(StepId::ApiConfig))
    );

    controller.next_with("/onboard/step1", true).await;
    assert!(controller.tracker().registry().is_completed(StepId::BasicInfo));
    store.set("uiTheme", "dark").unwrap();

    auth.logout();

    assert!(!auth.is_authenticated());
    assert_eq!(store.keys().unwrap(), vec!["uiTheme".to_string()]);

    // A reopened store sees the same state
    let reopened = dir.open();
    assert_eq!(reopened.keys().unwrap(), vec!["uiTheme".to_string()]);
    assert!(!controller.tracker().registry().is_completed(StepId::BasicInfo));
}

#[tokio::test(start_paused = true)]
async fn login_waits_for_the_configured_delay() {
    let dir = StoreDir::new();
    let auth = SessionAuth::new(dir.open(), Duration::from_secs(1));

    let started = tokio::time::Instant::now();
    assert!(auth.login("ops@example.com", "pw").await);
    assert!(started.elapsed() >= Duration::from_secs(1));
}

#[test]
fn root_goes_to_login_without_session() {
    let dir = StoreDir::new();
    let auth = SessionAuth::new(dir.open(), Duration::ZERO);
    assert_eq!(Router::new(true).resolve("/", &auth), Resolution::Redirect(Route::Login));
    assert_eq!(
        Router::new(false).resolve("/", &auth),
        Resolution::Redirect(Route::Step(StepId::BasicInfo))
    );
}
