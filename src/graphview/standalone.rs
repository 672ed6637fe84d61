//! Passes for resources no service claimed

use super::CoveredSet;
use super::pipeline::{DeploymentPipeline, ImagePipeline, deployment_pipeline, image_pipeline_from_build_config};
use crate::graph::{EdgeKind, NodeId, ResourceGraph};
use crate::models::ResourceKind;
use crate::models::openshift::{BUILD_ANNOTATION, DEPLOYER_POD_LABEL};
use k8s_openapi::api::core::v1::Pod;

#[derive(Debug, Clone)]
pub struct StandaloneController {
    pub rc: NodeId,
    pub pods: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy)]
pub struct StandalonePod {
    pub pod: NodeId,
}

/// Run `build` for every uncovered node of `kind`, accumulating claims
fn claim_each<T>(
    graph: &ResourceGraph,
    kind: ResourceKind,
    covered: &CoveredSet,
    mut build: impl FnMut(NodeId, &CoveredSet) -> (T, CoveredSet),
) -> (Vec<T>, CoveredSet) {
    let mut claimed = covered.clone();
    let mut newly = CoveredSet::new();
    let mut views = Vec::new();
    for id in graph.nodes_by_kind(kind) {
        if claimed.contains(id) {
            continue;
        }
        let (view, by_view) = build(id, &claimed);
        claimed.union(&by_view);
        newly.union(&by_view);
        views.push(view);
    }
    tracing::debug!(kind = %kind, views = views.len(), covered = newly.len(), "Standalone pass");
    (views, newly)
}

/// Second pass: deployment configs outside any service group
pub fn all_deployment_pipelines(
    graph: &ResourceGraph,
    covered: &CoveredSet,
) -> (Vec<DeploymentPipeline>, CoveredSet) {
    claim_each(graph, ResourceKind::DeploymentConfig, covered, |id, claimed| {
        deployment_pipeline(graph, id, claimed)
    })
}

/// Third pass: bare replication controllers and the pods they manage
pub fn all_controllers(
    graph: &ResourceGraph,
    covered: &CoveredSet,
) -> (Vec<StandaloneController>, CoveredSet) {
    claim_each(graph, ResourceKind::ReplicationController, covered, |rc, claimed| {
        let pods: Vec<NodeId> = graph
            .successors(rc, EdgeKind::Manages)
            .into_iter()
            .filter(|pod| !claimed.contains(*pod))
            .collect();
        let mut by_rc = CoveredSet::new();
        by_rc.insert(rc);
        by_rc.extend(pods.iter().copied());
        (StandaloneController { rc, pods }, by_rc)
    })
}

/// Fourth pass: build configs whose output no deployment consumes
pub fn all_image_pipelines(
    graph: &ResourceGraph,
    covered: &CoveredSet,
) -> (Vec<ImagePipeline>, CoveredSet) {
    claim_each(graph, ResourceKind::BuildConfig, covered, |bc, claimed| {
        image_pipeline_from_build_config(graph, bc, claimed)
    })
}

/// Fifth pass: every remaining pod
pub fn all_pods(graph: &ResourceGraph, covered: &CoveredSet) -> (Vec<StandalonePod>, CoveredSet) {
    claim_each(graph, ResourceKind::Pod, covered, |pod, _| {
        let mut by_pod = CoveredSet::new();
        by_pod.insert(pod);
        (StandalonePod { pod }, by_pod)
    })
}

/// Deployer pods, builder pods and finished pods are not worth printing
pub fn is_boring_pod(pod: &Pod) -> bool {
    let is_deployer = pod
        .metadata
        .labels
        .as_ref()
        .is_some_and(|labels| labels.contains_key(DEPLOYER_POD_LABEL));
    let is_builder = pod
        .metadata
        .annotations
        .as_ref()
        .is_some_and(|annotations| annotations.contains_key(BUILD_ANNOTATION));
    let is_finished = matches!(
        pod.status.as_ref().and_then(|s| s.phase.as_deref()),
        Some("Succeeded") | Some("Failed")
    );
    is_deployer || is_builder || is_finished
}
