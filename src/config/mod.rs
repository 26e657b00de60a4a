// ABOUTME: Configuration management for gatewise
// Handles store location, wizard behaviour and logging, layered from TOML files and env

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::wizard::NavigationPolicy;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Durable key-value store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Wizard behaviour
    #[serde(default)]
    pub wizard: WizardConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Store file; defaults to ~/.gatewise/store.json
    pub path: Option<PathBuf>,

    /// Maximum store size in bytes, emulating browser storage quota
    pub quota_bytes: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Redirect to /login when no session exists
    #[serde(default = "default_true")]
    pub require_auth: bool,

    /// Direct navigation policy
    #[serde(default)]
    pub navigation: NavigationPolicy,

    /// Simulated login latency in milliseconds (default: 1000)
    #[serde(default = "default_login_delay")]
    pub login_delay_ms: u64,

    /// Interval between deployment progress updates in milliseconds (default: 500)
    #[serde(default = "default_deploy_tick")]
    pub deploy_tick_ms: u64,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            require_auth: default_true(),
            navigation: NavigationPolicy::default(),
            login_delay_ms: default_login_delay(),
            deploy_tick_ms: default_deploy_tick(),
        }
    }
}

impl WizardConfig {
    pub const fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }

    pub const fn deploy_tick(&self) -> Duration {
        Duration::from_millis(self.deploy_tick_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Log directory; defaults to ~/.gatewise/logs
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            directory: None,
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_true() -> bool {
    true
}

fn default_login_delay() -> u64 {
    1000
}

fn default_deploy_tick() -> u64 {
    500
}

fn default_log_filter() -> String {
    "gatewise=info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            store: StoreConfig::default(),
            wizard: WizardConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Partial view of a config file; only keys actually present override
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    store: StoreLayer,
    #[serde(default)]
    wizard: WizardLayer,
    #[serde(default)]
    logging: LoggingLayer,
}

#[derive(Debug, Default, Deserialize)]
struct StoreLayer {
    path: Option<PathBuf>,
    quota_bytes: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct WizardLayer {
    require_auth: Option<bool>,
    navigation: Option<NavigationPolicy>,
    login_delay_ms: Option<u64>,
    deploy_tick_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingLayer {
    filter: Option<String>,
    directory: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from default locations, then apply env overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        for path in Self::get_config_paths() {
            if path.exists() {
                config.merge_file(&path)?;
            }
        }

        config.apply_env(load_from_env());
        Ok(config)
    }

    /// Load a single file on top of the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::default();
        config.merge_file(path)?;
        Ok(config)
    }

    /// Configuration file paths, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        // 1. System config
        paths.push(PathBuf::from("/etc/gatewise/config.toml"));

        // 2. User config (~/.gatewise/config/config.toml)
        if let Ok(config_dir) = Self::get_user_config_dir() {
            paths.push(config_dir.join("config.toml"));
        }

        // 3. Local project config
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".gatewise").join("config.toml"));
        }

        paths
    }

    /// Base directory for everything gatewise writes
    pub fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".gatewise"))
    }

    fn get_user_config_dir() -> Result<PathBuf> {
        Ok(Self::base_dir()?.join("config"))
    }

    /// Store file in effect
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store.path {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::base_dir()?.join("store.json")),
        }
    }

    /// Log directory in effect
    pub fn log_dir(&self) -> PathBuf {
        self.logging.directory.clone().unwrap_or_else(|| {
            Self::base_dir()
                .map(|base| base.join("logs"))
                .unwrap_or_else(|_| PathBuf::from(".gatewise/logs"))
        })
    }

    fn merge_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let layer: ConfigLayer = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        self.merge(layer);
        Ok(())
    }

    fn merge(&mut self, other: ConfigLayer) {
        if let Some(path) = other.store.path {
            self.store.path = Some(path);
        }
        if let Some(quota) = other.store.quota_bytes {
            self.store.quota_bytes = Some(quota);
        }

        if let Some(require_auth) = other.wizard.require_auth {
            self.wizard.require_auth = require_auth;
        }
        if let Some(navigation) = other.wizard.navigation {
            self.wizard.navigation = navigation;
        }
        if let Some(delay) = other.wizard.login_delay_ms {
            self.wizard.login_delay_ms = delay;
        }
        if let Some(tick) = other.wizard.deploy_tick_ms {
            self.wizard.deploy_tick_ms = tick;
        }

        if let Some(filter) = other.logging.filter {
            self.logging.filter = filter;
        }
        if let Some(directory) = other.logging.directory {
            self.logging.directory = Some(directory);
        }
    }

    fn apply_env(&mut self, env: Vec<(String, String)>) {
        for (key, value) in env {
            match key.as_str() {
                "GATEWISE_STORE_PATH" if !value.is_empty() => {
                    self.store.path = Some(PathBuf::from(value));
                }
                "GATEWISE_LOG_FILTER" if !value.is_empty() => {
                    self.logging.filter = value;
                }
                _ => {}
            }
        }
    }
}

/// Load configuration overrides from environment
pub fn load_from_env() -> Vec<(String, String)> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with("GATEWISE_"))
        .collect()
}
