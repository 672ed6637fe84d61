//! Service groups: a service with everything that fulfils or exposes it

use super::CoveredSet;
use super::pipeline::{DeploymentPipeline, deployment_pipeline};
use crate::graph::{EdgeKind, NodeId, ResourceGraph};
use crate::models::ResourceKind;

#[derive(Debug, Clone)]
pub struct ServiceGroup {
    pub service: NodeId,
    /// Routes pointing at the service
    pub routes: Vec<NodeId>,
    pub deployment_pipelines: Vec<DeploymentPipeline>,
    /// Controllers whose pod template the service selects
    pub controllers: Vec<NodeId>,
    /// Pods the service selects
    pub pods: Vec<NodeId>,
}

impl ServiceGroup {
    /// Controllers not already shown as a deployment of one of the group's configs
    pub fn displayed_controllers(&self, graph: &ResourceGraph) -> Vec<NodeId> {
        self.controllers
            .iter()
            .copied()
            .filter(|rc| {
                !self
                    .deployment_pipelines
                    .iter()
                    .any(|p| graph.has_edge(p.config, *rc, EdgeKind::Deploys))
            })
            .collect()
    }

    /// Pods not already rolled up under one of the group's controllers
    pub fn displayed_pods(&self, graph: &ResourceGraph) -> Vec<NodeId> {
        let controllers: Vec<NodeId> = self
            .controllers
            .iter()
            .copied()
            .chain(self.deployment_pipelines.iter().flat_map(|p| p.controllers()))
            .collect();
        self.pods
            .iter()
            .copied()
            .filter(|pod| {
                !controllers
                    .iter()
                    .any(|rc| graph.has_edge(*rc, *pod, EdgeKind::Manages))
            })
            .collect()
    }
}

/// First pass: one group per service not yet covered
pub fn all_service_groups(
    graph: &ResourceGraph,
    covered: &CoveredSet,
) -> (Vec<ServiceGroup>, CoveredSet) {
    let mut groups = Vec::new();
    let mut claimed = covered.clone();
    let mut newly = CoveredSet::new();

    for svc_id in graph.nodes_by_kind(ResourceKind::Service) {
        if claimed.contains(svc_id) {
            continue;
        }
        let (group, by_group) = service_group(graph, svc_id, &claimed);
        claimed.union(&by_group);
        newly.union(&by_group);
        groups.push(group);
    }

    tracing::debug!(groups = groups.len(), covered = newly.len(), "Service group pass");
    (groups, newly)
}

fn service_group(
    graph: &ResourceGraph,
    svc_id: NodeId,
    claimed: &CoveredSet,
) -> (ServiceGroup, CoveredSet) {
    let mut covered = CoveredSet::new();
    covered.insert(svc_id);

    let unclaimed = |ids: Vec<NodeId>| -> Vec<NodeId> {
        ids.into_iter().filter(|id| !claimed.contains(*id)).collect()
    };
    let exposed = graph.successors(svc_id, EdgeKind::Exposes);
    let of_kind = |kind: ResourceKind| -> Vec<NodeId> {
        unclaimed(
            exposed
                .iter()
                .copied()
                .filter(|id| graph.node(*id).kind() == kind)
                .collect(),
        )
    };

    let routes = unclaimed(graph.predecessors(svc_id, EdgeKind::Routes));
    let configs = of_kind(ResourceKind::DeploymentConfig);
    let controllers = of_kind(ResourceKind::ReplicationController);
    let pods = of_kind(ResourceKind::Pod);

    covered.extend(routes.iter().copied());
    covered.extend(controllers.iter().copied());
    covered.extend(pods.iter().copied());

    // Pipelines see the group's own controllers; only earlier pipelines compete
    let mut deployment_pipelines = Vec::new();
    let mut by_pipelines = CoveredSet::new();
    for dc_id in configs {
        let mut before = claimed.clone();
        before.union(&by_pipelines);
        let (pipeline, by_pipeline) = deployment_pipeline(graph, dc_id, &before);
        by_pipelines.union(&by_pipeline);
        deployment_pipelines.push(pipeline);
    }
    covered.union(&by_pipelines);

    for rc_id in &controllers {
        for pod_id in graph.successors(*rc_id, EdgeKind::Manages) {
            if !claimed.contains(pod_id) {
                covered.insert(pod_id);
            }
        }
    }

    (
        ServiceGroup {
            service: svc_id,
            routes,
            deployment_pipelines,
            controllers,
            pods,
        },
        covered,
    )
}
