//! CLI command handling module
//!
//! Argument parsing, subcommands and logging setup.

mod commands;
mod logging;
mod version;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use version::display_version;

use clap::{Parser, Subcommand};

/// Summarize the state of a project: services, deployments, builds and pods,
/// plus anything that looks wrong
#[derive(Parser, Debug)]
#[command(name = "kstatus", version)]
pub struct Cli {
    /// Namespace to report on (defaults to the config file, then the kubeconfig context)
    #[arg(long, short = 'n', conflicts_with = "all_namespaces")]
    pub namespace: Option<String>,

    /// Report on every namespace
    #[arg(long, short = 'A')]
    pub all_namespaces: bool,

    /// Show warnings and suggested fixes
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,

    /// Seconds to wait for the cluster before giving up (0 waits forever)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
    /// Show version information
    Version,
}

impl Cli {
    /// Namespace to report on; `None` means all namespaces
    ///
    /// An explicit flag wins over `configured`, which wins over `context`.
    pub fn target_namespace(&self, configured: &str, context: &str) -> Option<String> {
        if self.all_namespaces {
            return None;
        }
        let namespace = self
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .or(Some(configured).filter(|ns| !ns.is_empty()))
            .unwrap_or(context);
        let namespace = if namespace.is_empty() { "default" } else { namespace };
        Some(namespace.to_string())
    }
}
