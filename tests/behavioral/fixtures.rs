// ABOUTME: Shared test fixtures for behavioral tests
//
// Provides:
// - Wizard: controller wired to an in-memory store
// - StoreDir: scratch directory for file-backed stores
// - valid_*(): records that pass each step's validation

use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use gatewise::store::{FileStore, MemoryStore, SharedStore};
use gatewise::wizard::{
    ApiConfigData, AuthSetupData, BasicInfoData, EndpointMappingData, EndpointMappingRule,
    FlowController, NavigationPolicy, NewEndpoint, ReviewDeployData, SecuritySettingsData,
    StepData, StepId,
};

/// Controller over an in-memory store, with the store kept for inspection
pub struct Wizard {
    pub store: Arc<MemoryStore>,
    pub controller: FlowController,
}

impl Wizard {
    pub fn new() -> Self {
        Self::with_policy(NavigationPolicy::Permissive)
    }

    pub fn with_policy(policy: NavigationPolicy) -> Self {
        let store = Arc::new(MemoryStore::new());
        let controller = FlowController::from_store(store.clone(), policy);
        Self { store, controller }
    }

    /// Submit a valid record for every step before `stop`
    pub async fn complete_until(&self, stop: StepId) {
        for &step in StepId::all().iter().take_while(|&&s| s < stop) {
            let submission = self.controller.submit(step.path(), valid_record(step)).await;
            assert!(
                !submission.transition.is_rejected(),
                "fixture record for {step} rejected: {:?}",
                submission.issues
            );
        }
    }
}

/// Temporary directory holding a store file
pub struct StoreDir {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl StoreDir {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let path = dir.path().join("state").join("store.json");
        Self { dir, path }
    }

    pub fn open(&self) -> SharedStore {
        Arc::new(FileStore::open(&self.path).expect("open file store"))
    }
}

pub fn valid_basic_info() -> BasicInfoData {
    BasicInfoData {
        gateway_name: "payments-edge".to_string(),
        description: "Public payments API".to_string(),
        environment: "production".to_string(),
        region: "eu-west-1".to_string(),
        ..BasicInfoData::default()
    }
}

pub fn valid_api_config() -> ApiConfigData {
    let mut data = ApiConfigData::default();
    data.add_endpoint(NewEndpoint::new("Ledger", "https://ledger.internal:8443"))
        .expect("endpoint accepted");
    data
}

pub fn valid_auth_setup() -> AuthSetupData {
    let mut data = AuthSetupData::default();
    data.generate_secret_key();
    data
}

pub fn valid_mappings() -> EndpointMappingData {
    let mut data = EndpointMappingData::default();
    data.add_mapping(EndpointMappingRule::new("Charges", "/v1/charges", "/charges"))
        .expect("mapping accepted");
    data
}

pub fn valid_record(step: StepId) -> StepData {
    match step {
        StepId::BasicInfo => StepData::BasicInfo(valid_basic_info()),
        StepId::ApiConfig => StepData::ApiConfig(valid_api_config()),
        StepId::AuthSetup => StepData::AuthSetup(valid_auth_setup()),
        StepId::EndpointMapping => StepData::EndpointMapping(valid_mappings()),
        StepId::SecuritySettings => StepData::SecuritySettings(SecuritySettingsData::default()),
        StepId::ReviewDeploy => StepData::ReviewDeploy(ReviewDeployData {
            confirmed: true,
            deployed_at: None,
        }),
    }
}
