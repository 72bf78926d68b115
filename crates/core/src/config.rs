//! Plugin configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration:
//!
//! ```
//! use sounding_core::{DeploymentMode, PluginConfig};
//!
//! let config = PluginConfig::from_json_str("{}").unwrap();
//! assert_eq!(config.deployment, DeploymentMode::Standalone);
//! assert_eq!(config.analysis_base_url, "http://localhost:7861");
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ConfigError;

/// How the plugin is wired into the host map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentMode {
    /// Overlay script listening to raw map clicks
    #[default]
    Standalone,
    /// Host plugin module listening to the picker
    HostModule,
}

/// Runtime configuration of a plugin instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginConfig {
    /// Host integration variant
    pub deployment: DeploymentMode,
    /// Base URL of the detailed analysis tool
    pub analysis_base_url: String,
    /// Delay before simulated results are delivered (ms)
    pub simulated_latency_ms: u64,
    /// Delay before the single retry when the map is not ready (ms)
    pub attach_retry_delay_ms: u64,
    /// Forecast model requested from the profile service
    pub model: String,
    /// Seed for reproducible simulation; `None` seeds from the OS
    pub simulation_seed: Option<u64>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            deployment: DeploymentMode::Standalone,
            analysis_base_url: "http://localhost:7861".to_string(),
            simulated_latency_ms: 1000,
            attach_retry_delay_ms: 2000,
            model: "ecmwf".to_string(),
            simulation_seed: None,
        }
    }
}

impl PluginConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or unknown fields,
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.analysis_base_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid {
                field: "analysis_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if url.contains('?') {
            return Err(ConfigError::Invalid {
                field: "analysis_base_url",
                reason: "must not carry a query string".to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "model",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Simulated latency as a duration
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Attach retry delay as a duration
    pub fn attach_retry_delay(&self) -> Duration {
        Duration::from_millis(self.attach_retry_delay_ms)
    }
}
