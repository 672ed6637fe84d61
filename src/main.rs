//! kstatus - a one-screen status report for an OpenShift project
//!
//! Lists the project's services, deployments, builds, images, routes and
//! pods, shows how they connect, and points out what looks broken.

use anyhow::{Context, Result};
use clap::Parser;
use kstatus::cli::{self, Cli, Command};
use kstatus::config::ConfigLoader;
use kstatus::describe::{ReportOptions, StatusDescriber};
use kstatus::kube::{self, KubeLister};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let mut args = Cli::parse();

    match args.command.take() {
        Some(Command::Config { subcommand }) => return cli::handle_config_command(subcommand),
        Some(Command::Version) => {
            cli::display_version();
            return Ok(());
        }
        None => {}
    }

    let config = ConfigLoader::load().unwrap_or_else(|e| {
        eprintln!("Ignoring configuration: {:#}", e);
        ConfigLoader::load_defaults()
    });

    let log_file = cli::init_logging(args.debug, &config.logger.level)?;
    if let Some(ref log_path) = log_file {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }
    tracing::debug!(?config, "Configuration loaded");

    let connection = kube::connect().await?;
    let namespace = args.target_namespace(&config.default_namespace, &connection.default_namespace);

    let mut options = ReportOptions::new(config.cli_name.clone(), connection.server.clone());
    options.suggest = args.verbose || config.verbose;

    let lister = Arc::new(KubeLister::new(connection.client));
    let describer = StatusDescriber::new(lister, options);

    let timeout = match args.timeout {
        Some(0) => None,
        Some(secs) => Some(Duration::from_secs(secs)),
        None => config.request_timeout(),
    };
    let describe = describer.describe(namespace.as_deref());
    let result = match timeout {
        Some(limit) => tokio::time::timeout(limit, describe)
            .await
            .with_context(|| format!("Timed out after {}s waiting for the cluster", limit.as_secs()))?,
        None => describe.await,
    };

    let report = result.context("Unable to load project status")?;
    print!("{}", report);
    Ok(())
}
