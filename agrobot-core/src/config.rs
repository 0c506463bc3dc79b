// Runtime settings and bundle file formats

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_DIR: &str = "AGROBOT_CONFIG_DIR";
pub const ENV_ROBOT_ID: &str = "AGROBOT_ROBOT_ID";
pub const ENV_LOG_LEVEL: &str = "AGROBOT_LOG_LEVEL";

/// Process-level settings: where robot bundles live and which robot this is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSettings {
    pub config_dir: PathBuf,
    pub robot_id: Option<String>,
    pub log_level: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("./robots"),
            robot_id: None,
            log_level: "info".to_string(),
        }
    }
}

impl RuntimeSettings {
    /// Load settings from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(dir) = lookup(ENV_CONFIG_DIR).filter(|v| !v.trim().is_empty()) {
            settings.config_dir = PathBuf::from(dir);
        }

        if let Some(robot) = lookup(ENV_ROBOT_ID).filter(|v| !v.trim().is_empty()) {
            settings.robot_id = Some(robot.trim().to_string());
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            settings.log_level = level.trim().to_lowercase();
        }

        settings
    }
}

/// On-disk encoding of a configuration bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleFormat {
    Json,
    Toml,
    Yaml,
}

impl BundleFormat {
    /// Format implied by a file extension, if it is one we read
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(BundleFormat::Json),
            "toml" => Some(BundleFormat::Toml),
            "yaml" | "yml" => Some(BundleFormat::Yaml),
            _ => None,
        }
    }

    /// Parse bundle text into an untyped mapping
    pub fn parse(&self, content: &str) -> Result<Value> {
        match self {
            BundleFormat::Json => serde_json::from_str::<Value>(content)
                .map_err(|e| Error::Parse(format!("JSON: {}", e))),
            BundleFormat::Toml => toml::from_str::<Value>(content)
                .map_err(|e| Error::Parse(format!("TOML: {}", e))),
            BundleFormat::Yaml => serde_yaml::from_str::<Value>(content)
                .map_err(|e| Error::Parse(format!("YAML: {}", e))),
        }
    }
}
