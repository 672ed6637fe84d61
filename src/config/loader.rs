//! Configuration loading
//!
//! Layers, lowest to highest precedence: built-in defaults, the root
//! config file, then `KSTATUS_*` environment variables. Command line flags
//! are applied by the caller on top.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

pub const NAMESPACE_ENV: &str = "KSTATUS_NAMESPACE";
pub const CLI_NAME_ENV: &str = "KSTATUS_CLI_NAME";
pub const VERBOSE_ENV: &str = "KSTATUS_VERBOSE";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the root config file with environment overrides applied
    pub fn load() -> Result<Config> {
        Self::load_from(&paths::root_config_path())
    }

    /// Load `path` (defaults when it does not exist) with environment overrides applied
    pub fn load_from(path: &Path) -> Result<Config> {
        let config = if path.exists() {
            Self::load_file(path)?
        } else {
            Self::load_defaults()
        };
        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Check the root config file parses and holds usable values
    pub fn validate() -> Result<()> {
        let config = Self::load().context("Failed to load configuration")?;
        Self::check(&config)
    }

    /// Reject values that parse but cannot be used
    pub fn check(config: &Config) -> Result<()> {
        if config.cli_name.trim().is_empty() {
            anyhow::bail!("cliName must not be empty");
        }
        tracing_subscriber::EnvFilter::try_new(&config.logger.level)
            .with_context(|| format!("Invalid logger.level: {}", config.logger.level))?;
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    fn apply_env_overrides(config: Config) -> Config {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    /// Apply `KSTATUS_*` overrides read through `lookup`
    fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
        if let Some(namespace) = lookup(NAMESPACE_ENV) {
            config.default_namespace = namespace;
        }

        if let Some(cli_name) = lookup(CLI_NAME_ENV).filter(|name| !name.is_empty()) {
            config.cli_name = cli_name;
        }

        if let Some(verbose) = lookup(VERBOSE_ENV) {
            match verbose.parse::<bool>() {
                Ok(val) => config.verbose = val,
                Err(_) => tracing::warn!(value = %verbose, "Ignoring non-boolean {}", VERBOSE_ENV),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}
