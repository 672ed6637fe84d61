//! Coverage partitioning
//!
//! Splits the graph into non-overlapping display groups. Passes run in a
//! fixed priority order; each receives everything claimed so far and
//! returns the groups it found plus the nodes those groups claimed.

mod pipeline;
mod service_group;
mod standalone;

pub use pipeline::{
    DeploymentPipeline, ImagePipeline, ImageRef, deployment_pipeline,
    image_pipeline_from_build_config, image_pipeline_from_tag,
};
pub use service_group::{ServiceGroup, all_service_groups};
pub use standalone::{
    StandaloneController, StandalonePod, all_controllers, all_deployment_pipelines,
    all_image_pipelines, all_pods, is_boring_pod,
};

use crate::graph::{NodeId, ResourceGraph};
use std::collections::BTreeSet;

/// Nodes claimed by a display group. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoveredSet(BTreeSet<NodeId>);

impl CoveredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.0.contains(&id)
    }

    pub fn insert(&mut self, id: NodeId) -> bool {
        self.0.insert(id)
    }

    pub fn extend(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.0.extend(ids);
    }

    pub fn union(&mut self, other: &CoveredSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().copied()
    }
}

/// Every display group of one graph, in render order by kind
#[derive(Debug, Default)]
pub struct Partition {
    pub service_groups: Vec<ServiceGroup>,
    pub deployment_pipelines: Vec<DeploymentPipeline>,
    pub controllers: Vec<StandaloneController>,
    pub image_pipelines: Vec<ImagePipeline>,
    pub pods: Vec<StandalonePod>,
    pub covered: CoveredSet,
}

impl Partition {
    /// Standalone pods worth printing
    pub fn monopods(&self, graph: &ResourceGraph) -> Vec<StandalonePod> {
        self.pods
            .iter()
            .copied()
            .filter(|p| !is_boring(graph, p.pod))
            .collect()
    }

    /// Standalone pods covered but hidden from the report
    pub fn boring_pods(&self, graph: &ResourceGraph) -> Vec<NodeId> {
        self.pods
            .iter()
            .map(|p| p.pod)
            .filter(|id| is_boring(graph, *id))
            .collect()
    }

    /// Nodes no group claimed
    pub fn orphans(&self, graph: &ResourceGraph) -> Vec<NodeId> {
        graph
            .nodes()
            .map(|n| n.id)
            .filter(|id| !self.covered.contains(*id))
            .collect()
    }
}

fn is_boring(graph: &ResourceGraph, id: NodeId) -> bool {
    graph.node(id).object.as_pod().is_some_and(is_boring_pod)
}

/// Run all five passes in priority order
pub fn partition(graph: &ResourceGraph) -> Partition {
    let mut covered = CoveredSet::new();

    let (service_groups, by_services) = all_service_groups(graph, &covered);
    covered.union(&by_services);

    let (deployment_pipelines, by_configs) = all_deployment_pipelines(graph, &covered);
    covered.union(&by_configs);

    let (controllers, by_controllers) = all_controllers(graph, &covered);
    covered.union(&by_controllers);

    let (image_pipelines, by_images) = all_image_pipelines(graph, &covered);
    covered.union(&by_images);

    let (pods, by_pods) = all_pods(graph, &covered);
    covered.union(&by_pods);

    Partition {
        service_groups,
        deployment_pipelines,
        controllers,
        image_pipelines,
        pods,
        covered,
    }
}
