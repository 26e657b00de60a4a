// ABOUTME: Review of the stored configuration before deployment
// Summarises steps 1-5 and decides whether the gateway is ready to deploy

use serde::Serialize;

use super::data::StepData;
use super::step::StepId;
use crate::store::FormStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem {
    pub step: u32,
    pub title: String,
    pub status: ReviewStatus,
    pub message: String,
}

impl ReviewItem {
    fn new(step: StepId, status: ReviewStatus, message: impl Into<String>) -> Self {
        Self {
            step: step.number(),
            title: step.title().to_string(),
            status,
            message: message.into(),
        }
    }
}

/// Headline figures of the configuration about to be deployed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    pub gateway_name: String,
    pub endpoint_count: usize,
    pub mapping_count: usize,
    pub rate_limiting_enabled: bool,
    pub auth_method: String,
}

impl ReviewSummary {
    /// Missing records count as empty; an unnamed gateway and a missing auth
    /// record get placeholder labels
    pub fn from_forms(forms: &FormStore) -> Self {
        let gateway_name = match forms.load_step(StepId::BasicInfo) {
            Some(StepData::BasicInfo(d)) if !d.gateway_name.trim().is_empty() => d.gateway_name,
            _ => "Unnamed Gateway".to_string(),
        };
        let endpoint_count = match forms.load_step(StepId::ApiConfig) {
            Some(StepData::ApiConfig(d)) => d.endpoints.len(),
            _ => 0,
        };
        let mapping_count = match forms.load_step(StepId::EndpointMapping) {
            Some(StepData::EndpointMapping(d)) => d.mappings.len(),
            _ => 0,
        };
        let rate_limiting_enabled = matches!(
            forms.load_step(StepId::SecuritySettings),
            Some(StepData::SecuritySettings(d)) if d.security_settings.enable_rate_limiting
        );
        let auth_method = match forms.load_step(StepId::AuthSetup) {
            Some(StepData::AuthSetup(d)) => d.auth_method.label().to_string(),
            _ => "None".to_string(),
        };

        Self {
            gateway_name,
            endpoint_count,
            mapping_count,
            rate_limiting_enabled,
            auth_method,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewReport {
    pub items: Vec<ReviewItem>,
    pub summary: ReviewSummary,
}

impl ReviewReport {
    /// Build the report from whatever records are stored.
    ///
    /// Steps without a (readable) record are left out; the closing "Review"
    /// entry is an error if any earlier entry is.
    pub fn from_forms(forms: &FormStore) -> Self {
        let mut items: Vec<ReviewItem> = StepId::all()
            .iter()
            .filter(|s| !s.is_final())
            .filter_map(|&step| forms.load_step(step).map(|data| Self::review(&data)))
            .collect();

        let all_valid = items.iter().all(|i| i.status != ReviewStatus::Error);
        items.push(ReviewItem {
            step: StepId::ReviewDeploy.number(),
            title: "Review".to_string(),
            status: if all_valid {
                ReviewStatus::Success
            } else {
                ReviewStatus::Error
            },
            message: if all_valid {
                "Ready for deployment".to_string()
            } else {
                "Fix errors before deploying".to_string()
            },
        });

        Self {
            items,
            summary: ReviewSummary::from_forms(forms),
        }
    }

    fn review(data: &StepData) -> ReviewItem {
        let step = data.step();
        match data {
            StepData::BasicInfo(d) => {
                let complete = !d.gateway_name.is_empty() && !d.environment.is_empty() && !d.region.is_empty();
                let message = if d.gateway_name.is_empty() {
                    "Missing gateway name".to_string()
                } else {
                    format!("Gateway: {}", d.gateway_name)
                };
                ReviewItem::new(
                    step,
                    if complete { ReviewStatus::Success } else { ReviewStatus::Warning },
                    message,
                )
            }
            StepData::ApiConfig(d) => match d.endpoints.len() {
                0 => ReviewItem::new(step, ReviewStatus::Error, "No API endpoints configured"),
                n => ReviewItem::new(step, ReviewStatus::Success, format!("{n} upstream APIs configured")),
            },
            StepData::AuthSetup(d) => {
                if d.is_complete() {
                    ReviewItem::new(
                        step,
                        ReviewStatus::Success,
                        format!("{} authentication configured", d.auth_method.label()),
                    )
                } else {
                    ReviewItem::new(step, ReviewStatus::Warning, "Authentication configuration incomplete")
                }
            }
            StepData::EndpointMapping(d) => match d.mappings.len() {
                0 => ReviewItem::new(step, ReviewStatus::Error, "No endpoint mappings configured"),
                n => ReviewItem::new(step, ReviewStatus::Success, format!("{n} endpoint mappings configured")),
            },
            StepData::SecuritySettings(_) => {
                ReviewItem::new(step, ReviewStatus::Success, "Security policies configured")
            }
            StepData::ReviewDeploy(_) => ReviewItem::new(step, ReviewStatus::Success, "Reviewed"),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|i| i.status == ReviewStatus::Error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &ReviewItem> {
        self.items.iter().filter(|i| i.status == ReviewStatus::Error)
    }
}
