//! Resource loading
//!
//! Lists every resource kind concurrently, waits for all of them, then
//! commits the results into a fresh [`ResourceGraph`] and infers edges.
//! No node is inserted until every list call has returned.

mod error;

pub use error::{ListError, LoadError};

use crate::graph::{ResourceGraph, edges};
use crate::models::openshift::ImageStreamTag;
use crate::models::{ResourceKind, ResourceObject};
use async_trait::async_trait;
use futures::future::join_all;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Lists all resources of one kind
///
/// `namespace` of `None` lists across all namespaces.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceLister: Send + Sync {
    async fn list(
        &self,
        namespace: Option<String>,
        kind: ResourceKind,
    ) -> Result<Vec<ResourceObject>, ListError>;
}

/// One independent fetch in the fan-out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderTask {
    pub kind: ResourceKind,
    /// Treat "kind not found" as an empty list
    pub tolerate_not_found: bool,
}

impl LoaderTask {
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            tolerate_not_found: kind.tolerates_not_found(),
        }
    }
}

/// The standard loader set, in commit order
pub fn default_loaders() -> Vec<LoaderTask> {
    ResourceKind::loadable()
        .iter()
        .copied()
        .map(LoaderTask::new)
        .collect()
}

/// A usable snapshot, possibly degraded by forbidden kinds
#[derive(Debug)]
pub struct LoadOutcome {
    pub graph: ResourceGraph,
    pub forbidden: BTreeSet<ResourceKind>,
}

/// Load the standard resource set into a graph
pub async fn make_graph(
    lister: Arc<dyn ResourceLister>,
    namespace: Option<&str>,
) -> Result<LoadOutcome, LoadError> {
    run_loaders(lister, namespace, &default_loaders()).await
}

/// Run `tasks` concurrently and build a graph from their results
pub async fn run_loaders(
    lister: Arc<dyn ResourceLister>,
    namespace: Option<&str>,
    tasks: &[LoaderTask],
) -> Result<LoadOutcome, LoadError> {
    let handles = tasks.iter().map(|task| {
        let lister = Arc::clone(&lister);
        let namespace = namespace.map(str::to_string);
        let kind = task.kind;
        tokio::spawn(async move { lister.list(namespace, kind).await })
    });
    let results = join_all(handles).await;

    let mut staged: Vec<Vec<ResourceObject>> = Vec::with_capacity(tasks.len());
    let mut forbidden = BTreeSet::new();
    let mut failures = Vec::new();

    for (task, joined) in tasks.iter().zip(results) {
        let result = match joined {
            Ok(result) => result,
            Err(join_error) => Err(ListError::Failed {
                kind: task.kind,
                source: anyhow::Error::new(join_error),
            }),
        };
        match result {
            Ok(items) => {
                tracing::debug!(kind = %task.kind, count = items.len(), "Listed resources");
                staged.push(items);
            }
            Err(ListError::Forbidden(kind)) => {
                tracing::warn!(kind = %kind, "Listing forbidden, continuing without it");
                forbidden.insert(kind);
            }
            Err(ListError::NotFound(kind)) if task.tolerate_not_found => {
                tracing::debug!(kind = %kind, "Resource kind not served, treating as empty");
            }
            Err(err) => {
                tracing::warn!(kind = %task.kind, error = %err, "Listing failed");
                failures.push(err);
            }
        }
    }

    if !failures.is_empty() {
        return Err(LoadError(failures));
    }

    let mut graph = ResourceGraph::new();
    for items in staged {
        commit(&mut graph, items);
    }
    edges::build_edges(&mut graph);

    Ok(LoadOutcome { graph, forbidden })
}

/// Insert one loader's items; image streams also contribute their tags
fn commit(graph: &mut ResourceGraph, items: Vec<ResourceObject>) {
    for object in items {
        let tags: Vec<ImageStreamTag> = object
            .as_image_stream()
            .map(|stream| {
                stream
                    .tag_names()
                    .into_iter()
                    .map(|tag| ImageStreamTag::from_stream(stream, tag))
                    .collect()
            })
            .unwrap_or_default();
        graph.ensure_node(object);
        for tag in tags {
            graph.ensure_node(ResourceObject::ImageStreamTag(tag));
        }
    }
}
