//! Diagnostic markers
//!
//! Analyzers are plain functions over the graph. The pipeline here runs
//! them in a fixed order, prepends advisories for kinds that could not be
//! listed, drops markers that reach outside the reported namespace, and
//! sorts what is left so output is stable between runs.

pub mod builds;
pub mod deployments;
pub mod pods;
pub mod routes;

use crate::graph::{Node, NodeId, ResourceGraph};
use crate::models::ResourceKind;
use std::collections::BTreeSet;

pub const FORBIDDEN_LIST_WARNING: &str = "Forbidden";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// A single finding about the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub severity: Severity,
    /// Stable identifier of the kind of finding
    pub key: &'static str,
    pub node: Option<NodeId>,
    pub related_nodes: Vec<NodeId>,
    pub message: String,
    /// A command or explanation, possibly spanning several lines
    pub suggestion: Option<String>,
}

impl Marker {
    pub fn new(severity: Severity, key: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            key,
            node: None,
            related_nodes: Vec::new(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn error(key: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, key, message)
    }

    pub fn warning(key: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, key, message)
    }

    pub fn on(mut self, node: NodeId) -> Self {
        self.node = Some(node);
        self
    }

    pub fn related(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.related_nodes.extend(nodes);
        self
    }

    pub fn suggest(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Renders a node as `<short kind>/<name>` for messages
pub trait Namer {
    fn resource_name(&self, node: &Node) -> String;
}

pub type Analyzer = Box<dyn Fn(&ResourceGraph, &dyn Namer) -> Vec<Marker> + Send + Sync>;

/// The standard analyzer list, in run order
///
/// `cli_name` is the command line tool named in suggestions.
pub fn default_analyzers(cli_name: &str) -> Vec<Analyzer> {
    let cli = cli_name.to_string();
    let with_cli = |analyzer: fn(&ResourceGraph, &dyn Namer, &str) -> Vec<Marker>| -> Analyzer {
        let cli = cli.clone();
        Box::new(move |g: &ResourceGraph, f: &dyn Namer| analyzer(g, f, &cli))
    };

    let mut analyzers: Vec<Analyzer> = Vec::new();
    analyzers.push(with_cli(pods::find_restarting_pods));
    analyzers.push(Box::new(pods::find_dueling_replication_controllers));
    analyzers.push(Box::new(pods::find_missing_secrets));
    analyzers.push(with_cli(builds::find_unpushable_build_configs));
    analyzers.push(Box::new(builds::find_circular_builds));
    analyzers.push(with_cli(builds::find_pending_tags));
    analyzers.push(Box::new(deployments::find_deployment_config_trigger_errors));
    analyzers.push(Box::new(builds::find_missing_input_image_streams));
    analyzers.push(with_cli(deployments::find_readiness_warnings));
    analyzers.push(Box::new(routes::find_port_mapping_issues));
    analyzers.push(with_cli(routes::find_missing_tls_termination));
    analyzers.push(with_cli(routes::find_path_based_passthrough_routes));
    analyzers.push(Box::new(routes::find_route_admission_failures));
    analyzers.push(with_cli(routes::find_missing_router));
    analyzers
}

/// One advisory per kind that could not be listed, in kind order
pub fn forbidden_markers(forbidden: &BTreeSet<ResourceKind>) -> Vec<Marker> {
    forbidden
        .iter()
        .map(|kind| {
            Marker::warning(
                FORBIDDEN_LIST_WARNING,
                format!(
                    "Unable to list {} resources.  Not all status relationships can be established.",
                    kind.plural()
                ),
            )
        })
        .collect()
}

/// Drop markers touching a node outside `namespace`; `None` keeps everything
pub fn filter_by_namespace(
    markers: Vec<Marker>,
    graph: &ResourceGraph,
    namespace: Option<&str>,
) -> Vec<Marker> {
    let Some(namespace) = namespace.filter(|ns| !ns.is_empty()) else {
        return markers;
    };
    markers
        .into_iter()
        .filter(|marker| {
            marker
                .node
                .iter()
                .chain(marker.related_nodes.iter())
                .all(|id| graph.node(*id).namespace() == namespace)
        })
        .collect()
}

/// Stable sort by key, then stable sort by node identity (markers without a node first)
pub fn sort_markers(markers: &mut [Marker], graph: &ResourceGraph) {
    markers.sort_by(|a, b| a.key.cmp(b.key));
    markers.sort_by(|a, b| {
        let a = a.node.map(|id| &graph.node(id).key);
        let b = b.node.map(|id| &graph.node(id).key);
        a.cmp(&b)
    });
}

/// Sorted markers split by severity
#[derive(Debug, Default)]
pub struct MarkerReport {
    pub errors: Vec<Marker>,
    pub warnings: Vec<Marker>,
}

impl MarkerReport {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Run the full marker pipeline
pub fn collect_markers(
    graph: &ResourceGraph,
    namer: &dyn Namer,
    analyzers: &[Analyzer],
    forbidden: &BTreeSet<ResourceKind>,
    namespace: Option<&str>,
) -> MarkerReport {
    let mut markers = forbidden_markers(forbidden);
    for analyzer in analyzers {
        markers.extend(analyzer(graph, namer));
    }
    let total = markers.len();

    let mut markers = filter_by_namespace(markers, graph, namespace);
    tracing::debug!(total, kept = markers.len(), "Collected markers");
    sort_markers(&mut markers, graph);

    let (errors, warnings) = markers
        .into_iter()
        .partition(|m| m.severity == Severity::Error);
    MarkerReport { errors, warnings }
}
