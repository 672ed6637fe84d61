//! Project status report rendering
//!
//! [`render_report`] turns a loaded graph into the text report: a header,
//! one block per display group, the marker sections and a closing summary.
//! [`StatusDescriber`] wires loading and rendering together.

mod formatter;
mod sections;
mod summary;
pub mod text;

pub use formatter::NamespacedFormatter;
pub use sections::Sections;
pub use summary::{SummaryCounts, render_markers, summary_lines};

use crate::analysis::{Analyzer, collect_markers, default_analyzers};
use crate::graph::ResourceGraph;
use crate::graphview::partition;
use crate::loader::{LoadError, ResourceLister, make_graph};
use crate::models::ResourceKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use text::{print_lines, sort_exposed};

const INDENT: &str = "  ";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Print warnings and suggestions
    pub suggest: bool,
    /// Command line tool named in the summary and suggestions
    pub cli_name: String,
    /// API server URL for the header; may be empty
    pub server: String,
    /// Reference instant for relative times
    pub now: DateTime<Utc>,
}

impl ReportOptions {
    pub fn new(cli_name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            suggest: false,
            cli_name: cli_name.into(),
            server: server.into(),
            now: Utc::now(),
        }
    }
}

fn header(namespace: Option<&str>, server: &str) -> String {
    match namespace {
        Some(ns) => format!("In project {} on server {}", ns, server),
        None if server.is_empty() => "Showing all projects".to_string(),
        None => format!("Showing all projects on server {}", server),
    }
}

/// Render the status report of `graph`
///
/// `namespace` of `None` renders every namespace and keeps all markers.
pub fn render_report(
    graph: &ResourceGraph,
    forbidden: &BTreeSet<ResourceKind>,
    namespace: Option<&str>,
    options: &ReportOptions,
    analyzers: &[Analyzer],
) -> String {
    let namespace = namespace.filter(|ns| !ns.is_empty());
    let f = NamespacedFormatter::new(namespace.unwrap_or_default());
    let sections = Sections::new(graph, options.now);
    let groups = partition(graph);
    tracing::debug!(
        services = groups.service_groups.len(),
        deployments = groups.deployment_pipelines.len(),
        controllers = groups.controllers.len(),
        images = groups.image_pipelines.len(),
        pods = groups.pods.len(),
        orphans = groups.orphans(graph).len(),
        "Partitioned graph"
    );

    let mut out = vec![header(namespace, &options.server)];

    for group in &groups.service_groups {
        let local = NamespacedFormatter::new(graph.node(group.service).namespace());
        let mut exposed: Vec<String> = group
            .routes
            .iter()
            .flat_map(|route| sections.route_in_service_group(&local, *route))
            .collect();
        sort_exposed(&mut exposed);

        out.push(String::new());
        print_lines(
            &mut out,
            "",
            0,
            sections.service_in_service_group(&f, group, exposed),
        );
        for pipeline in &group.deployment_pipelines {
            print_lines(
                &mut out,
                INDENT,
                1,
                sections.deployment_in_service_group(&local, pipeline),
            );
        }
        for rc in group.displayed_controllers(graph) {
            print_lines(&mut out, INDENT, 1, sections.rc_in_service_group(&local, rc));
        }
        for pod in group.displayed_pods(graph) {
            print_lines(&mut out, INDENT, 1, sections.pod(&local, pod));
        }
    }

    for pipeline in &groups.deployment_pipelines {
        out.push(String::new());
        print_lines(
            &mut out,
            INDENT,
            0,
            sections.deployment_in_service_group(&f, pipeline),
        );
    }

    for pipeline in &groups.image_pipelines {
        out.push(String::new());
        let mut lines =
            sections.standalone_build_group(&f, pipeline, namespace.unwrap_or_default());
        lines.extend(sections.additional_build_detail(pipeline, true));
        print_lines(&mut out, INDENT, 0, lines);
    }

    for controller in &groups.controllers {
        out.push(String::new());
        print_lines(
            &mut out,
            INDENT,
            0,
            sections.rc_in_service_group(&f, controller.rc),
        );
    }

    for monopod in groups.monopods(graph) {
        out.push(String::new());
        print_lines(&mut out, INDENT, 0, sections.pod(&f, monopod.pod));
    }

    let markers = collect_markers(graph, &f, analyzers, forbidden, namespace);
    out.push(String::new());
    let has_groups = !groups.service_groups.is_empty()
        || !groups.deployment_pipelines.is_empty()
        || !groups.image_pipelines.is_empty();
    let counts = render_markers(&mut out, &markers, options.suggest, has_groups);
    out.extend(summary_lines(&counts, &options.cli_name));

    let mut report = out.join("\n");
    report.push('\n');
    report
}

/// Loads a namespace and renders its report
pub struct StatusDescriber {
    lister: Arc<dyn ResourceLister>,
    analyzers: Vec<Analyzer>,
    options: ReportOptions,
}

impl StatusDescriber {
    /// A describer running the standard analyzers
    pub fn new(lister: Arc<dyn ResourceLister>, options: ReportOptions) -> Self {
        let analyzers = default_analyzers(&options.cli_name);
        Self {
            lister,
            analyzers,
            options,
        }
    }

    /// Replace the analyzer list
    pub fn with_analyzers(mut self, analyzers: Vec<Analyzer>) -> Self {
        self.analyzers = analyzers;
        self
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Fetch everything in `namespace` (all namespaces for `None`) and render it
    ///
    /// Fails only when some kind could not be listed for a reason other than
    /// a permission error.
    pub async fn describe(&self, namespace: Option<&str>) -> Result<String, LoadError> {
        let outcome = make_graph(Arc::clone(&self.lister), namespace).await?;
        tracing::debug!(
            nodes = outcome.graph.len(),
            edges = outcome.graph.edge_count(),
            forbidden = outcome.forbidden.len(),
            "Loaded project graph"
        );
        Ok(render_report(
            &outcome.graph,
            &outcome.forbidden,
            namespace,
            &self.options,
            &self.analyzers,
        ))
    }
}
