// ABOUTME: Gateway onboarding wizard - step model, completion tracking and flow control

pub mod controller;
pub mod data;
pub mod deploy;
pub mod registry;
pub mod review;
pub mod signal;
pub mod step;
pub mod tracker;

pub use controller::{FlowController, NavigationPolicy, Submission, Transition};
pub use data::{
    ApiConfigData, AuthMethod, AuthSetupData, BasicInfoData, EndpointMappingData,
    EndpointMappingRule, FieldIssue, HttpMethod, IpRuleKind, NewEndpoint, RateLimitScope,
    ReviewDeployData, SecuritySettingsData, StepData,
};
pub use deploy::{deploy, DeployError};
pub use registry::StepRegistry;
pub use review::{ReviewItem, ReviewReport, ReviewStatus, ReviewSummary};
pub use signal::{CompletionSignal, StepCompleted, Subscription};
pub use step::{StepDefinition, StepId};
pub use tracker::{CompletionTracker, Progress};
