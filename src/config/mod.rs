//! Configuration system for kstatus
//!
//! A single YAML file under the config directory, layered over built-in
//! defaults and overridden by environment variables.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, LoggerConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "cliName" => Ok(config.cli_name.clone()),
        "verbose" => Ok(config.verbose.to_string()),
        "requestTimeoutSeconds" => Ok(config.request_timeout_seconds.to_string()),
        "logger.level" => Ok(config.logger.level.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "cliName" => {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("cliName must not be empty"));
            }
            config.cli_name = value.to_string();
        }
        "verbose" => {
            config.verbose = value
                .parse()
                .context("verbose must be 'true' or 'false'")?;
        }
        "requestTimeoutSeconds" => {
            config.request_timeout_seconds = value
                .parse()
                .context("requestTimeoutSeconds must be a number")?;
        }
        "logger.level" => {
            config.logger.level = value.to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_set() {
        let mut config = Config::default();
        set_config_value(&mut config, "requestTimeoutSeconds", "5").unwrap();
        set_config_value(&mut config, "verbose", "true").unwrap();
        set_config_value(&mut config, "logger.level", "info").unwrap();

        assert_eq!(get_config_value(&config, "requestTimeoutSeconds").unwrap(), "5");
        assert_eq!(get_config_value(&config, "verbose").unwrap(), "true");
        assert_eq!(get_config_value(&config, "logger.level").unwrap(), "info");
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        assert!(set_config_value(&mut config, "verbose", "yes").is_err());
        assert!(set_config_value(&mut config, "requestTimeoutSeconds", "-1").is_err());
        assert!(set_config_value(&mut config, "cliName", "").is_err());
        assert!(set_config_value(&mut config, "ui.skin", "dracula").is_err());
        assert!(get_config_value(&config, "readOnly").is_err());
    }
}
