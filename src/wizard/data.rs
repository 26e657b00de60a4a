// ABOUTME: Typed form records for each onboarding step
// Each step owns one schema; records are decoded against the schema of the
// step that owns the key, and validation results are returned as values

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

use super::step::StepId;

lazy_static! {
    /// `/`, or one or more non-empty segments (literal, `{param}` or `:param`)
    /// with an optional trailing slash
    static ref ROUTE_PATH: Regex =
        Regex::new(r"^(/|(/([A-Za-z0-9._~\-]+|\{[A-Za-z_][A-Za-z0-9_]*\}|:[A-Za-z_][A-Za-z0-9_]*))+/?)$")
            .expect("route path regex is valid");
}

pub const ENVIRONMENTS: &[&str] = &["development", "staging", "production", "testing"];
pub const REGIONS: &[&str] = &["us-east-1", "us-west-2", "eu-west-1", "ap-southeast-1"];
pub const UPSTREAM_PROTOCOLS: &[&str] = &["https", "http", "grpc", "websocket"];

/// A single user-correctable problem reported by a step's validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Next free id after the largest in use; `None` once ids are exhausted
fn next_id<'a>(ids: impl Iterator<Item = &'a u32>) -> Option<u32> {
    ids.max().map_or(Some(1), |max| max.checked_add(1))
}

fn assign_id<'a>(field: &str, ids: impl Iterator<Item = &'a u32>) -> Result<u32, FieldIssue> {
    next_id(ids).ok_or_else(|| FieldIssue::new(field, "No ids left; remove an entry first"))
}

// === Step 1: Basic Information ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfoData {
    pub gateway_name: String,
    pub description: String,
    pub environment: String,
    pub region: String,
    pub version: String,
}

impl Default for BasicInfoData {
    fn default() -> Self {
        Self {
            gateway_name: String::new(),
            description: String::new(),
            environment: String::new(),
            region: String::new(),
            version: "1.0.0".to_string(),
        }
    }
}

impl BasicInfoData {
    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.gateway_name.trim().is_empty() {
            issues.push(FieldIssue::new("gatewayName", "Gateway name is required"));
        }
        if self.environment.is_empty() {
            issues.push(FieldIssue::new("environment", "Please select an environment"));
        } else if !ENVIRONMENTS.contains(&self.environment.as_str()) {
            issues.push(FieldIssue::new(
                "environment",
                format!("Unknown environment '{}'", self.environment),
            ));
        }
        if self.region.is_empty() {
            issues.push(FieldIssue::new("region", "Please select a region"));
        } else if !REGIONS.contains(&self.region.as_str()) {
            issues.push(FieldIssue::new("region", format!("Unknown region '{}'", self.region)));
        }
        issues
    }
}

// === Step 2: API Configuration ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamEndpoint {
    pub id: u32,
    pub name: String,
    pub base_url: String,
    pub timeout: u32,
    pub rate_limit: u32,
}

/// Endpoint fields entered before an id is assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEndpoint {
    pub name: String,
    pub base_url: String,
    pub timeout: u32,
    pub rate_limit: u32,
}

impl NewEndpoint {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout: 30,
            rate_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfigData {
    pub upstream_protocol: String,
    pub request_timeout: u32,
    pub max_retries: u32,
    pub enable_caching: bool,
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u32,
    pub enable_circuit_breaker: bool,
    pub circuit_breaker_threshold: u32,
    pub endpoints: Vec<UpstreamEndpoint>,
}

impl Default for ApiConfigData {
    fn default() -> Self {
        Self {
            upstream_protocol: "https".to_string(),
            request_timeout: 30,
            max_retries: 3,
            enable_caching: true,
            cache_ttl: 300,
            enable_circuit_breaker: true,
            circuit_breaker_threshold: 5,
            endpoints: Vec::new(),
        }
    }
}

impl ApiConfigData {
    /// Append an endpoint, returning its id. Name and URL are required.
    pub fn add_endpoint(&mut self, endpoint: NewEndpoint) -> Result<u32, FieldIssue> {
        if endpoint.name.trim().is_empty() || endpoint.base_url.trim().is_empty() {
            return Err(FieldIssue::new(
                "endpoints",
                "Please fill in endpoint name and URL",
            ));
        }
        let id = assign_id("endpoints", self.endpoints.iter().map(|e| &e.id))?;
        self.endpoints.push(UpstreamEndpoint {
            id,
            name: endpoint.name,
            base_url: endpoint.base_url,
            timeout: endpoint.timeout,
            rate_limit: endpoint.rate_limit,
        });
        Ok(id)
    }

    pub fn remove_endpoint(&mut self, id: u32) -> bool {
        let before = self.endpoints.len();
        self.endpoints.retain(|e| e.id != id);
        before != self.endpoints.len()
    }

    pub fn duplicate_endpoint(&mut self, id: u32) -> Option<u32> {
        let source = self.endpoints.iter().find(|e| e.id == id)?.clone();
        let new_id = next_id(self.endpoints.iter().map(|e| &e.id))?;
        self.endpoints.push(UpstreamEndpoint {
            id: new_id,
            name: format!("{} (Copy)", source.name),
            ..source
        });
        Some(new_id)
    }

    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.endpoints.is_empty() {
            issues.push(FieldIssue::new("endpoints", "Please add at least one API endpoint"));
        }
        if self.upstream_protocol.is_empty() {
            issues.push(FieldIssue::new("upstreamProtocol", "Please select upstream protocol"));
        } else if !UPSTREAM_PROTOCOLS.contains(&self.upstream_protocol.as_str()) {
            issues.push(FieldIssue::new(
                "upstreamProtocol",
                format!("Unsupported protocol '{}'", self.upstream_protocol),
            ));
        }
        for endpoint in &self.endpoints {
            if let Err(e) = url::Url::parse(&endpoint.base_url) {
                issues.push(FieldIssue::new(
                    format!("endpoints[{}].baseUrl", endpoint.id),
                    format!("'{}' is not a valid URL: {}", endpoint.base_url, e),
                ));
            }
        }
        issues
    }
}

// === Step 3: Authentication Setup ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    #[default]
    Jwt,
    ApiKey,
    #[serde(rename = "oauth")]
    OAuth,
}

impl AuthMethod {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Jwt => "JWT",
            Self::ApiKey => "API-KEY",
            Self::OAuth => "OAUTH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub secret_key: String,
    pub expiration: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyConfig {
    pub header_name: String,
    pub query_param: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub authorization_url: String,
    pub token_url: String,
    pub scopes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityHeaders {
    #[serde(rename = "enableCORS")]
    pub enable_cors: bool,
    #[serde(rename = "enableCSP")]
    pub enable_csp: bool,
    #[serde(rename = "enableHSTS")]
    pub enable_hsts: bool,
    #[serde(rename = "enableXSS")]
    pub enable_xss: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSetupData {
    pub auth_method: AuthMethod,
    pub jwt_config: JwtConfig,
    pub api_key_config: ApiKeyConfig,
    pub oauth_config: OAuthConfig,
    pub security_headers: SecurityHeaders,
}

impl Default for AuthSetupData {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::Jwt,
            jwt_config: JwtConfig {
                issuer: "api-gateway".to_string(),
                audience: "api-consumers".to_string(),
                secret_key: String::new(),
                expiration: 3600,
            },
            api_key_config: ApiKeyConfig {
                header_name: "X-API-Key".to_string(),
                query_param: "api_key".to_string(),
            },
            oauth_config: OAuthConfig {
                client_id: String::new(),
                client_secret: String::new(),
                authorization_url: "https://auth.example.com/oauth/authorize".to_string(),
                token_url: "https://auth.example.com/oauth/token".to_string(),
                scopes: "read write".to_string(),
            },
            security_headers: SecurityHeaders {
                enable_cors: true,
                enable_csp: true,
                enable_hsts: true,
                enable_xss: true,
            },
        }
    }
}

impl AuthSetupData {
    /// Replace the JWT secret with a fresh 64-character random key
    pub fn generate_secret_key(&mut self) {
        self.jwt_config.secret_key = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
    }

    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        match self.auth_method {
            AuthMethod::Jwt if self.jwt_config.secret_key.is_empty() => {
                issues.push(FieldIssue::new("jwtConfig.secretKey", "JWT secret key is required"));
            }
            AuthMethod::OAuth
                if self.oauth_config.client_id.is_empty()
                    || self.oauth_config.client_secret.is_empty() =>
            {
                issues.push(FieldIssue::new(
                    "oauthConfig",
                    "OAuth client ID and secret are required",
                ));
            }
            _ => {}
        }
        issues
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_empty()
    }
}

// === Step 4: Endpoint Mapping ===

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointMappingRule {
    pub id: u32,
    pub name: String,
    pub path: String,
    pub method: HttpMethod,
    pub upstream_path: String,
    pub timeout: u32,
    pub rate_limit: u32,
    pub authentication_required: bool,
    pub caching_enabled: bool,
    #[serde(rename = "cacheTTL")]
    pub cache_ttl: u32,
}

impl EndpointMappingRule {
    /// A mapping with the panel's defaults; the id is assigned on insert
    pub fn new(name: impl Into<String>, path: impl Into<String>, upstream_path: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            path: path.into(),
            method: HttpMethod::Get,
            upstream_path: upstream_path.into(),
            timeout: 30,
            rate_limit: 100,
            authentication_required: true,
            caching_enabled: false,
            cache_ttl: 300,
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EndpointMappingData {
    pub mappings: Vec<EndpointMappingRule>,
}

impl EndpointMappingData {
    /// Append a mapping, assigning the next id. Name, path and upstream path are required.
    pub fn add_mapping(&mut self, mut mapping: EndpointMappingRule) -> Result<u32, FieldIssue> {
        if mapping.name.is_empty() || mapping.path.is_empty() || mapping.upstream_path.is_empty() {
            return Err(FieldIssue::new("mappings", "Please fill in required fields"));
        }
        mapping.id = assign_id("mappings", self.mappings.iter().map(|m| &m.id))?;
        let id = mapping.id;
        self.mappings.push(mapping);
        Ok(id)
    }

    /// Replace the mapping with the same id
    pub fn replace_mapping(&mut self, mapping: EndpointMappingRule) -> bool {
        match self.mappings.iter_mut().find(|m| m.id == mapping.id) {
            Some(slot) => {
                *slot = mapping;
                true
            }
            None => false,
        }
    }

    pub fn remove_mapping(&mut self, id: u32) -> bool {
        let before = self.mappings.len();
        self.mappings.retain(|m| m.id != id);
        before != self.mappings.len()
    }

    pub fn duplicate_mapping(&mut self, id: u32) -> Option<u32> {
        let source = self.mappings.iter().find(|m| m.id == id)?.clone();
        let new_id = next_id(self.mappings.iter().map(|m| &m.id))?;
        self.mappings.push(EndpointMappingRule {
            id: new_id,
            name: format!("{} (Copy)", source.name),
            ..source
        });
        Some(new_id)
    }

    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.mappings.is_empty() {
            issues.push(FieldIssue::new("mappings", "Please add at least one endpoint mapping"));
            return issues;
        }

        let mut seen = HashSet::new();
        for mapping in &self.mappings {
            if !seen.insert((mapping.path.as_str(), mapping.method)) {
                issues.push(FieldIssue::new(
                    "mappings",
                    "Duplicate endpoint path/method combinations found",
                ));
                break;
            }
        }

        for mapping in &self.mappings {
            if !ROUTE_PATH.is_match(&mapping.path) {
                issues.push(FieldIssue::new(
                    format!("mappings[{}].path", mapping.id),
                    format!("'{}' is not an absolute route path", mapping.path),
                ));
            }
            if !ROUTE_PATH.is_match(&mapping.upstream_path) {
                issues.push(FieldIssue::new(
                    format!("mappings[{}].upstreamPath", mapping.id),
                    format!("'{}' is not an absolute route path", mapping.upstream_path),
                ));
            }
        }
        issues
    }
}

// === Step 5: Security Settings ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    pub enable_rate_limiting: bool,
    #[serde(rename = "enableIPWhitelist")]
    pub enable_ip_whitelist: bool,
    #[serde(rename = "enableIPBlacklist")]
    pub enable_ip_blacklist: bool,
    pub enable_request_validation: bool,
    pub enable_response_validation: bool,
    pub max_request_body_size: u64,
    pub max_request_header_size: u64,
    #[serde(rename = "enableSQLInjectionProtection")]
    pub enable_sql_injection_protection: bool,
    #[serde(rename = "enableXSSProtection")]
    pub enable_xss_protection: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitScope {
    Global,
    Ip,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitRule {
    pub id: u32,
    pub name: String,
    pub requests: u32,
    pub window: u32,
    pub scope: RateLimitScope,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpRuleKind {
    Allow,
    Block,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpRule {
    pub id: u32,
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: IpRuleKind,
    pub description: String,
}

/// Accepts a bare IP address or a CIDR block with an in-range prefix
fn is_ip_or_cidr(value: &str) -> bool {
    match value.split_once('/') {
        None => value.parse::<IpAddr>().is_ok(),
        Some((addr, prefix)) => {
            let Ok(addr) = addr.parse::<IpAddr>() else {
                return false;
            };
            let Ok(prefix) = prefix.parse::<u8>() else {
                return false;
            };
            match addr {
                IpAddr::V4(_) => prefix <= 32,
                IpAddr::V6(_) => prefix <= 128,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettingsData {
    pub security_settings: SecurityPolicy,
    pub rate_limits: Vec<RateLimitRule>,
    pub ip_rules: Vec<IpRule>,
}

impl Default for SecuritySettingsData {
    fn default() -> Self {
        Self {
            security_settings: SecurityPolicy {
                enable_rate_limiting: true,
                enable_ip_whitelist: false,
                enable_ip_blacklist: true,
                enable_request_validation: true,
                enable_response_validation: false,
                max_request_body_size: 1_048_576,
                max_request_header_size: 8192,
                enable_sql_injection_protection: true,
                enable_xss_protection: true,
            },
            rate_limits: vec![
                RateLimitRule {
                    id: 1,
                    name: "Global Limit".to_string(),
                    requests: 1000,
                    window: 60,
                    scope: RateLimitScope::Global,
                },
                RateLimitRule {
                    id: 2,
                    name: "IP Limit".to_string(),
                    requests: 100,
                    window: 60,
                    scope: RateLimitScope::Ip,
                },
                RateLimitRule {
                    id: 3,
                    name: "Auth Limit".to_string(),
                    requests: 30,
                    window: 60,
                    scope: RateLimitScope::User,
                },
            ],
            ip_rules: vec![
                IpRule {
                    id: 1,
                    ip_address: "192.168.1.1".to_string(),
                    kind: IpRuleKind::Allow,
                    description: "Internal Admin".to_string(),
                },
                IpRule {
                    id: 2,
                    ip_address: "10.0.0.0/8".to_string(),
                    kind: IpRuleKind::Allow,
                    description: "Corporate Network".to_string(),
                },
                IpRule {
                    id: 3,
                    ip_address: "203.0.113.0/24".to_string(),
                    kind: IpRuleKind::Block,
                    description: "Malicious IP Range".to_string(),
                },
            ],
        }
    }
}

impl SecuritySettingsData {
    pub fn add_ip_rule(
        &mut self,
        ip_address: impl Into<String>,
        kind: IpRuleKind,
        description: impl Into<String>,
    ) -> Result<u32, FieldIssue> {
        let ip_address = ip_address.into();
        if !is_ip_or_cidr(&ip_address) {
            return Err(FieldIssue::new(
                "ipRules",
                format!("'{ip_address}' is not an IP address or CIDR block"),
            ));
        }
        let id = assign_id("ipRules", self.ip_rules.iter().map(|r| &r.id))?;
        self.ip_rules.push(IpRule {
            id,
            ip_address,
            kind,
            description: description.into(),
        });
        Ok(id)
    }

    pub fn add_rate_limit(
        &mut self,
        name: impl Into<String>,
        requests: u32,
        window: u32,
        scope: RateLimitScope,
    ) -> Result<u32, FieldIssue> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(FieldIssue::new("rateLimits", "Rate limit name is required"));
        }
        let id = assign_id("rateLimits", self.rate_limits.iter().map(|r| &r.id))?;
        self.rate_limits.push(RateLimitRule {
            id,
            name,
            requests,
            window,
            scope,
        });
        Ok(id)
    }

    pub fn validate(&self) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        if self.security_settings.enable_ip_whitelist
            && !self.ip_rules.iter().any(|r| r.kind == IpRuleKind::Allow)
        {
            issues.push(FieldIssue::new(
                "ipRules",
                "IP whitelist is enabled but no allowed IPs are configured",
            ));
        }
        for rule in &self.ip_rules {
            if !is_ip_or_cidr(&rule.ip_address) {
                issues.push(FieldIssue::new(
                    format!("ipRules[{}].ipAddress", rule.id),
                    format!("'{}' is not an IP address or CIDR block", rule.ip_address),
                ));
            }
        }
        issues
    }
}

// === Step 6: Review & Deploy ===

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDeployData {
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<DateTime<Utc>>,
}

impl ReviewDeployData {
    pub fn validate(&self) -> Vec<FieldIssue> {
        if self.confirmed {
            Vec::new()
        } else {
            vec![FieldIssue::new("confirmed", "Confirm the configuration before deploying")]
        }
    }
}

// === Sum type over all steps ===

/// A form record, tagged by the step that owns it.
///
/// Serializes as the bare record (no tag); the owning step is implied by the
/// storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StepData {
    BasicInfo(BasicInfoData),
    ApiConfig(ApiConfigData),
    AuthSetup(AuthSetupData),
    EndpointMapping(EndpointMappingData),
    SecuritySettings(SecuritySettingsData),
    ReviewDeploy(ReviewDeployData),
}

impl StepData {
    pub const fn step(&self) -> StepId {
        match self {
            Self::BasicInfo(_) => StepId::BasicInfo,
            Self::ApiConfig(_) => StepId::ApiConfig,
            Self::AuthSetup(_) => StepId::AuthSetup,
            Self::EndpointMapping(_) => StepId::EndpointMapping,
            Self::SecuritySettings(_) => StepId::SecuritySettings,
            Self::ReviewDeploy(_) => StepId::ReviewDeploy,
        }
    }

    /// The panel's initial record for `step`
    pub fn default_for(step: StepId) -> Self {
        match step {
            StepId::BasicInfo => Self::BasicInfo(BasicInfoData::default()),
            StepId::ApiConfig => Self::ApiConfig(ApiConfigData::default()),
            StepId::AuthSetup => Self::AuthSetup(AuthSetupData::default()),
            StepId::EndpointMapping => Self::EndpointMapping(EndpointMappingData::default()),
            StepId::SecuritySettings => Self::SecuritySettings(SecuritySettingsData::default()),
            StepId::ReviewDeploy => Self::ReviewDeploy(ReviewDeployData::default()),
        }
    }

    /// Decode a JSON record against the schema of `step`
    pub fn from_json(step: StepId, json: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(step, value)
    }

    pub fn from_value(step: StepId, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        Ok(match step {
            StepId::BasicInfo => Self::BasicInfo(serde_json::from_value(value)?),
            StepId::ApiConfig => Self::ApiConfig(serde_json::from_value(value)?),
            StepId::AuthSetup => Self::AuthSetup(serde_json::from_value(value)?),
            StepId::EndpointMapping => Self::EndpointMapping(serde_json::from_value(value)?),
            StepId::SecuritySettings => Self::SecuritySettings(serde_json::from_value(value)?),
            StepId::ReviewDeploy => Self::ReviewDeploy(serde_json::from_value(value)?),
        })
    }

    /// Run the step's own field validation
    pub fn validate(&self) -> Vec<FieldIssue> {
        match self {
            Self::BasicInfo(d) => d.validate(),
            Self::ApiConfig(d) => d.validate(),
            Self::AuthSetup(d) => d.validate(),
            Self::EndpointMapping(d) => d.validate(),
            Self::SecuritySettings(d) => d.validate(),
            Self::ReviewDeploy(d) => d.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_basic_info() -> BasicInfoData {
        BasicInfoData {
            gateway_name: "edge-gw".to_string(),
            environment: "production".to_string(),
            region: "eu-west-1".to_string(),
            ..BasicInfoData::default()
        }
    }

    #[test]
    fn test_basic_info_requires_name_environment_region() {
        let issues = BasicInfoData::default().validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["gatewayName", "environment", "region"]);

        assert!(valid_basic_info().validate().is_empty());

        let blank_name = BasicInfoData {
            gateway_name: "   ".to_string(),
            ..valid_basic_info()
        };
        assert_eq!(blank_name.validate().len(), 1);
    }

    #[test]
    fn test_basic_info_json_field_names() {
        let json = serde_json::to_value(valid_basic_info()).unwrap();
        assert_eq!(json["gatewayName"], "edge-gw");
        assert_eq!(json["version"], "1.0.0");
    }

    #[test]
    fn test_api_config_endpoint_ids_follow_max() {
        let mut config = ApiConfigData::default();
        let first = config
            .add_endpoint(NewEndpoint::new("users", "https://users.internal"))
            .unwrap();
        let second = config
            .add_endpoint(NewEndpoint::new("orders", "https://orders.internal"))
            .unwrap();
        assert_eq!((first, second), (1, 2));

        assert!(config.remove_endpoint(1));
        let third = config
            .add_endpoint(NewEndpoint::new("billing", "https://billing.internal"))
            .unwrap();
        assert_eq!(third, 3);

        let copy = config.duplicate_endpoint(2).unwrap();
        assert_eq!(copy, 4);
        assert_eq!(config.endpoints.last().unwrap().name, "orders (Copy)");
    }

    #[test]
    fn test_endpoint_ids_exhausted_at_u32_max() {
        let mut config = ApiConfigData::default();
        config
            .add_endpoint(NewEndpoint::new("users", "https://users.internal"))
            .unwrap();
        config.endpoints[0].id = u32::MAX;

        let err = config
            .add_endpoint(NewEndpoint::new("orders", "https://orders.internal"))
            .unwrap_err();
        assert_eq!(err.field, "endpoints");
        assert_eq!(config.duplicate_endpoint(u32::MAX), None);
        assert_eq!(config.endpoints.len(), 1);

        let mut data = EndpointMappingData::default();
        data.add_mapping(EndpointMappingRule::new("health", "/health", "/status"))
            .unwrap();
        data.mappings[0].id = u32::MAX;
        assert!(data
            .add_mapping(EndpointMappingRule::new("ready", "/ready", "/status"))
            .is_err());
        assert_eq!(data.duplicate_mapping(u32::MAX), None);
        assert_eq!(data.mappings.len(), 1);
    }

    #[test]
    fn test_api_config_rejects_incomplete_endpoint() {
        let mut config = ApiConfigData::default();
        assert!(config.add_endpoint(NewEndpoint::new("users", "")).is_err());
        assert!(config.endpoints.is_empty());
    }

    #[test]
    fn test_api_config_validation() {
        let mut config = ApiConfigData::default();
        assert_eq!(config.validate().len(), 1);

        config.add_endpoint(NewEndpoint::new("users", "not a url")).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "endpoints[1].baseUrl");

        config.endpoints[0].base_url = "https://users.internal:8443/v1".to_string();
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_api_config_cache_ttl_field_name() {
        let json = serde_json::to_value(ApiConfigData::default()).unwrap();
        assert_eq!(json["cacheTTL"], 300);
        assert_eq!(json["upstreamProtocol"], "https");
    }

    #[test]
    fn test_auth_setup_rules_depend_on_method() {
        let mut auth = AuthSetupData::default();
        assert_eq!(auth.validate()[0].field, "jwtConfig.secretKey");

        auth.generate_secret_key();
        assert_eq!(auth.jwt_config.secret_key.len(), 64);
        assert!(auth.is_complete());

        auth.auth_method = AuthMethod::OAuth;
        assert_eq!(auth.validate()[0].field, "oauthConfig");
        auth.oauth_config.client_id = "client".to_string();
        auth.oauth_config.client_secret = "secret".to_string();
        assert!(auth.is_complete());

        let api_key = AuthSetupData {
            auth_method: AuthMethod::ApiKey,
            ..AuthSetupData::default()
        };
        assert!(api_key.is_complete());
    }

    #[test]
    fn test_auth_method_wire_names() {
        assert_eq!(serde_json::to_value(AuthMethod::ApiKey).unwrap(), "api-key");
        assert_eq!(serde_json::to_value(AuthMethod::OAuth).unwrap(), "oauth");
        assert_eq!(serde_json::to_value(AuthMethod::Jwt).unwrap(), "jwt");
        let json = serde_json::to_value(AuthSetupData::default()).unwrap();
        assert_eq!(json["securityHeaders"]["enableCORS"], true);
    }

    #[test]
    fn test_endpoint_mapping_duplicates_rejected() {
        let mut data = EndpointMappingData::default();
        assert_eq!(data.validate().len(), 1);

        data.add_mapping(EndpointMappingRule::new("list users", "/users", "/v1/users"))
            .unwrap();
        data.add_mapping(
            EndpointMappingRule::new("create user", "/users", "/v1/users").with_method(HttpMethod::Post),
        )
        .unwrap();
        assert!(data.validate().is_empty());

        data.duplicate_mapping(1).unwrap();
        let issues = data.validate();
        assert_eq!(issues[0].message, "Duplicate endpoint path/method combinations found");
    }

    #[test]
    fn test_endpoint_mapping_paths_must_be_absolute() {
        let mut data = EndpointMappingData::default();
        data.add_mapping(EndpointMappingRule::new("user", "users/{id}", "/v1/users/:id"))
            .unwrap();
        let issues = data.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "mappings[1].path");

        data.mappings[0].path = "/users/{id}".to_string();
        assert!(data.validate().is_empty());
    }

    #[test]
    fn test_route_path_segments_must_be_non_empty() {
        for ok in ["/", "/v1", "/v1/", "/users/{id}", "/users/:id/orders"] {
            assert!(ROUTE_PATH.is_match(ok), "{ok} should match");
        }
        for bad in ["", "//", "/v1//users", "//v1", "/v1//", "users"] {
            assert!(!ROUTE_PATH.is_match(bad), "{bad} should not match");
        }
    }

    #[test]
    fn test_endpoint_mapping_replace_and_remove() {
        let mut data = EndpointMappingData::default();
        let id = data
            .add_mapping(EndpointMappingRule::new("health", "/health", "/status"))
            .unwrap();

        let mut edited = data.mappings[0].clone();
        edited.timeout = 5;
        assert!(data.replace_mapping(edited));
        assert_eq!(data.mappings[0].timeout, 5);

        assert!(data.remove_mapping(id));
        assert!(!data.remove_mapping(id));
    }

    #[test]
    fn test_security_defaults_are_valid() {
        let data = SecuritySettingsData::default();
        assert_eq!(data.rate_limits.len(), 3);
        assert_eq!(data.ip_rules.len(), 3);
        assert!(data.validate().is_empty());
    }

    #[test]
    fn test_security_whitelist_needs_allow_rule() {
        let mut data = SecuritySettingsData::default();
        data.security_settings.enable_ip_whitelist = true;
        data.ip_rules.retain(|r| r.kind == IpRuleKind::Block);
        assert_eq!(data.validate().len(), 1);

        data.add_ip_rule("172.16.0.0/12", IpRuleKind::Allow, "VPN").unwrap();
        assert!(data.validate().is_empty());
    }

    #[test]
    fn test_ip_or_cidr() {
        assert!(is_ip_or_cidr("10.0.0.1"));
        assert!(is_ip_or_cidr("10.0.0.0/8"));
        assert!(is_ip_or_cidr("2001:db8::/32"));
        assert!(!is_ip_or_cidr("10.0.0.0/33"));
        assert!(!is_ip_or_cidr("example.com"));
        assert!(!is_ip_or_cidr("10.0.0.0/abc"));
    }

    #[test]
    fn test_security_field_names() {
        let json = serde_json::to_value(SecuritySettingsData::default()).unwrap();
        assert_eq!(json["securitySettings"]["enableIPWhitelist"], false);
        assert_eq!(json["securitySettings"]["maxRequestBodySize"], 1_048_576);
        assert_eq!(json["ipRules"][2]["type"], "block");
        assert_eq!(json["rateLimits"][1]["scope"], "ip");
    }

    #[test]
    fn test_step_data_decodes_against_owner_schema() {
        let json = r#"{"gatewayName":"gw","description":"","environment":"staging","region":"us-west-2","version":"2.0.0"}"#;
        let data = StepData::from_json(StepId::BasicInfo, json).unwrap();
        assert_eq!(data.step(), StepId::BasicInfo);
        assert!(data.validate().is_empty());

        // Same JSON is not a valid step 2 record
        assert!(StepData::from_json(StepId::ApiConfig, json).is_err());
    }

    #[test]
    fn test_step_data_serializes_without_tag() {
        let data = StepData::EndpointMapping(EndpointMappingData::default());
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            serde_json::json!({ "mappings": [] })
        );
    }

    #[test]
    fn test_review_requires_confirmation() {
        assert_eq!(ReviewDeployData::default().validate().len(), 1);
        let confirmed = ReviewDeployData {
            confirmed: true,
            deployed_at: None,
        };
        assert!(confirmed.validate().is_empty());
    }
}
