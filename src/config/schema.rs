//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace to report on; empty uses the kubeconfig context namespace
    #[serde(default)]
    pub default_namespace: String,

    /// Command line tool named in suggestions and the summary line
    #[serde(default = "default_cli_name")]
    pub cli_name: String,

    /// Show warnings and suggestions without `-v`
    #[serde(default)]
    pub verbose: bool,

    /// Upper bound on loading the whole project; 0 disables the timeout
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// Logger configuration
    #[serde(default)]
    pub logger: LoggerConfig,
}

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_cli_name() -> String {
    "oc".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.request_timeout_seconds))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: String::new(),
            cli_name: default_cli_name(),
            verbose: false,
            request_timeout_seconds: default_request_timeout_seconds(),
            logger: LoggerConfig::default(),
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
