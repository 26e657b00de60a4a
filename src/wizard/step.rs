// ABOUTME: The six fixed onboarding steps and their persisted definitions
// Step order, titles and routable paths never change at runtime

use serde::{Deserialize, Serialize};
use std::fmt;

/// Steps in the gateway onboarding wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum StepId {
    BasicInfo,
    ApiConfig,
    AuthSetup,
    EndpointMapping,
    SecuritySettings,
    ReviewDeploy,
}

/// Route prefix shared by every step path
pub const STEP_PATH_PREFIX: &str = "/onboard/";

impl StepId {
    /// Get all steps in order
    pub const fn all() -> &'static [Self] {
        &[
            Self::BasicInfo,
            Self::ApiConfig,
            Self::AuthSetup,
            Self::EndpointMapping,
            Self::SecuritySettings,
            Self::ReviewDeploy,
        ]
    }

    /// Get the step number (1-indexed, as stored)
    pub const fn number(self) -> u32 {
        match self {
            Self::BasicInfo => 1,
            Self::ApiConfig => 2,
            Self::AuthSetup => 3,
            Self::EndpointMapping => 4,
            Self::SecuritySettings => 5,
            Self::ReviewDeploy => 6,
        }
    }

    /// Get the total number of steps
    pub const fn total() -> usize {
        6
    }

    pub fn from_number(number: u32) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.number() == number)
    }

    /// Get display title for this step
    pub const fn title(self) -> &'static str {
        match self {
            Self::BasicInfo => "Basic Information",
            Self::ApiConfig => "API Configuration",
            Self::AuthSetup => "Authentication Setup",
            Self::EndpointMapping => "Endpoint Mapping",
            Self::SecuritySettings => "Security Settings",
            Self::ReviewDeploy => "Review & Deploy",
        }
    }

    /// Get description for this step
    pub const fn description(self) -> &'static str {
        match self {
            Self::BasicInfo => {
                "Configure basic gateway settings including name, environment, and region."
            }
            Self::ApiConfig => "Define upstream API endpoints and connection behaviour.",
            Self::AuthSetup => {
                "Configure authentication methods and security headers for your API gateway."
            }
            Self::EndpointMapping => "Map incoming gateway routes to upstream services.",
            Self::SecuritySettings => {
                "Configure security policies including rate limiting, IP filtering, and request validation."
            }
            Self::ReviewDeploy => "Review the configuration and deploy the gateway.",
        }
    }

    /// Routable path of this step (`/onboard/stepN`)
    pub const fn path(self) -> &'static str {
        match self {
            Self::BasicInfo => "/onboard/step1",
            Self::ApiConfig => "/onboard/step2",
            Self::AuthSetup => "/onboard/step3",
            Self::EndpointMapping => "/onboard/step4",
            Self::SecuritySettings => "/onboard/step5",
            Self::ReviewDeploy => "/onboard/step6",
        }
    }

    /// Key suffix of this step's form record (`step1` ...)
    pub const fn form_key(self) -> &'static str {
        match self {
            Self::BasicInfo => "step1",
            Self::ApiConfig => "step2",
            Self::AuthSetup => "step3",
            Self::EndpointMapping => "step4",
            Self::SecuritySettings => "step5",
            Self::ReviewDeploy => "step6",
        }
    }

    pub fn from_form_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.form_key() == key)
    }

    /// Map a location onto a step, if it names one exactly.
    ///
    /// Query strings, fragments and a single trailing slash are ignored.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };

        Self::all().iter().copied().find(|s| s.path() == path)
    }

    /// Current step for a location; anything unrecognised is step 1
    pub fn resolve_path(path: &str) -> Self {
        Self::from_path(path).unwrap_or(Self::BasicInfo)
    }

    /// Get the next step, if any
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::ApiConfig),
            Self::ApiConfig => Some(Self::AuthSetup),
            Self::AuthSetup => Some(Self::EndpointMapping),
            Self::EndpointMapping => Some(Self::SecuritySettings),
            Self::SecuritySettings => Some(Self::ReviewDeploy),
            Self::ReviewDeploy => None,
        }
    }

    /// Get the previous step, if any
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInfo => None,
            Self::ApiConfig => Some(Self::BasicInfo),
            Self::AuthSetup => Some(Self::ApiConfig),
            Self::EndpointMapping => Some(Self::AuthSetup),
            Self::SecuritySettings => Some(Self::EndpointMapping),
            Self::ReviewDeploy => Some(Self::SecuritySettings),
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::ReviewDeploy)
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.number(), self.title())
    }
}

impl TryFrom<u32> for StepId {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_number(value).ok_or_else(|| format!("unknown step id {value}"))
    }
}

impl From<StepId> for u32 {
    fn from(step: StepId) -> Self {
        step.number()
    }
}

impl std::str::FromStr for StepId {
    type Err = String;

    /// Accepts `3`, `step3` or `/onboard/step3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u32>() {
            return Self::try_from(n);
        }
        Self::from_form_key(s)
            .or_else(|| Self::from_path(s))
            .ok_or_else(|| format!("unknown step '{s}' (expected 1-6, step1-step6 or a step path)"))
    }
}

/// One entry of the persisted step registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: String,
    pub path: String,
    pub completed: bool,
}

impl StepDefinition {
    pub fn new(id: StepId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            path: id.path().to_string(),
            completed: false,
        }
    }
}
