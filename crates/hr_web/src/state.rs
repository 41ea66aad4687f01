use std::path::PathBuf;

use hr_core::{PresetRegistry, DEFAULT_BATCH_SIZE};
use serde::Serialize;

const NOT_SET: &str = "not set";

/// Deployment metadata echoed by the diagnostics endpoint.
#[derive(Debug, Clone, Default)]
pub struct DeploymentInfo {
    pub app_env: Option<String>,
    pub deploy_env: Option<String>,
    pub deploy_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeploymentView {
    pub app_env: String,
    pub deploy_env: String,
    pub deploy_url: String,
}

impl DeploymentInfo {
    pub fn view(&self) -> DeploymentView {
        let or_not_set = |value: &Option<String>| value.clone().unwrap_or_else(|| NOT_SET.to_string());
        DeploymentView {
            app_env: or_not_set(&self.app_env),
            deploy_env: or_not_set(&self.deploy_env),
            deploy_url: or_not_set(&self.deploy_url),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub batch_size: usize,
    /// Every request generates from a fresh RNG seeded with this value.
    pub seed: Option<u64>,
    pub static_dir: Option<PathBuf>,
    pub deployment: DeploymentInfo,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            seed: None,
            static_dir: None,
            deployment: DeploymentInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub registry: PresetRegistry,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(registry: PresetRegistry, config: ServerConfig) -> Self {
        Self { registry, config }
    }
}
