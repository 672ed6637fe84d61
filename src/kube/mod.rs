//! Kubernetes client module
//!
//! Connects to the API server named by the active kubeconfig context and
//! exposes a [`KubeLister`] that lists every resource kind the status
//! report reads.
//!
//! Supports HTTP/HTTPS proxy configuration via standard environment variables:
//! - `HTTP_PROXY` / `http_proxy`: HTTP proxy URL
//! - `HTTPS_PROXY` / `https_proxy`: HTTPS proxy URL
//! - `NO_PROXY` / `no_proxy`: Comma-separated list of hosts to bypass proxy
//!
//! Internal cluster hosts are added to NO_PROXY automatically.

mod lister;

pub use lister::{KubeLister, classify_kube_error};

use anyhow::{Context, Result};
use kube::{Client, Config};
use url::Url;

/// A connected client plus what the report header needs to know
pub struct ClusterConnection {
    pub client: Client,
    /// API server URL as configured
    pub server: String,
    /// Namespace of the active kubeconfig context
    pub default_namespace: String,
}

/// Infer configuration and connect to the cluster
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
pub async fn connect() -> Result<ClusterConnection> {
    let config = Config::infer()
        .await
        .context("Failed to load kubeconfig")?;

    let server = config.cluster_url.to_string();
    let server = server.trim_end_matches('/').to_string();
    if let Ok(url) = Url::parse(&server)
        && let Some(host) = url.host_str()
    {
        ensure_no_proxy_bypass(host);
    }
    let default_namespace = config.default_namespace.clone();
    tracing::debug!(server = %server, namespace = %default_namespace, "Connecting to cluster");

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(ClusterConnection {
        client,
        server,
        default_namespace,
    })
}

/// Add an internal API host to NO_PROXY unless a pattern already covers it
fn ensure_no_proxy_bypass(host: &str) {
    if !is_internal_host(host) {
        return;
    }

    let no_proxy = std::env::var("NO_PROXY").unwrap_or_default();
    let current_no_proxy = if !no_proxy.is_empty() {
        no_proxy
    } else {
        std::env::var("no_proxy").unwrap_or_default()
    };

    if no_proxy_contains(&current_no_proxy, host) {
        return;
    }

    let updated_no_proxy = if current_no_proxy.is_empty() {
        host.to_string()
    } else {
        format!("{},{}", current_no_proxy, host)
    };
    tracing::debug!(host, "Adding API server host to NO_PROXY");

    // SAFETY: called once during startup before the client spawns any threads
    unsafe {
        std::env::set_var("NO_PROXY", &updated_no_proxy);
        std::env::set_var("no_proxy", &updated_no_proxy);
    }
}

/// Private addresses, localhost and cluster-internal domains
fn is_internal_host(host: &str) -> bool {
    const PRIVATE_PREFIXES: [&str; 3] = ["10.", "172.", "192.168."];
    const LOOPBACK: [&str; 3] = ["localhost", "127.0.0.1", "::1"];
    const INTERNAL_SUFFIXES: [&str; 2] = [".local", ".internal"];

    if PRIVATE_PREFIXES.iter().any(|p| host.starts_with(p)) || LOOPBACK.contains(&host) {
        return true;
    }
    if INTERNAL_SUFFIXES.iter().any(|s| host.ends_with(s)) {
        return true;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    // Second-level label such as api.corp or svc.int
    if matches!(labels[labels.len() - 2], "corp" | "internal" | "int" | "local") {
        return true;
    }
    // Any non-TLD label starting with an environment prefix
    labels[..labels.len() - 1].iter().any(|label| {
        ["dev", "test", "staging", "qa", "uat", "internal"]
            .iter()
            .any(|prefix| label.starts_with(prefix))
    })
}

/// True if a NO_PROXY list already covers `host`
///
/// Entries match exactly, or as a domain suffix with or without a leading dot.
fn no_proxy_contains(no_proxy: &str, host: &str) -> bool {
    no_proxy
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .any(|entry| {
            let domain = entry.strip_prefix('.').unwrap_or(entry);
            host == domain || host.ends_with(&format!(".{}", domain))
        })
}
