//! Relationship inference
//!
//! Every function here reads node payloads and adds typed edges between
//! nodes that already exist. The one exception is image references: a
//! reference to a tag no listed stream carries gets a placeholder image
//! stream tag node. Running any of them twice leaves the graph unchanged.

use super::{EdgeKind, NodeId, ResourceGraph};
use crate::models::openshift::{ImageStreamTag, deployment_config_name};
use crate::models::{ResourceKind, ResourceObject};
use k8s_openapi::api::core::v1::ObjectReference;
use std::collections::BTreeMap;

/// Run every inference step in a fixed order
pub fn build_edges(graph: &mut ResourceGraph) {
    add_exposed_edges(graph);
    add_managed_pod_edges(graph);
    add_service_account_edges(graph);
    add_mounted_secret_edges(graph);
    add_build_edges(graph);
    add_input_output_edges(graph);
    add_trigger_edges(graph);
    add_deployment_edges(graph);
    add_route_edges(graph);
    tracing::debug!(
        nodes = graph.len(),
        edges = graph.edge_count(),
        "Inferred graph relationships"
    );
}

/// True when `selector` is non-empty and every pair appears in `labels`
pub fn selector_matches(
    selector: &BTreeMap<String, String>,
    labels: Option<&BTreeMap<String, String>>,
) -> bool {
    if selector.is_empty() {
        return false;
    }
    let Some(labels) = labels else {
        return false;
    };
    selector.iter().all(|(k, v)| labels.get(k) == Some(v))
}

fn template_labels(graph: &ResourceGraph, id: NodeId) -> Option<&BTreeMap<String, String>> {
    let object = &graph.node(id).object;
    let template = if let Some(rc) = object.as_replication_controller() {
        rc.spec.as_ref().and_then(|s| s.template.as_ref())
    } else if let Some(dc) = object.as_deployment_config() {
        dc.spec.template.as_ref()
    } else {
        None
    };
    template
        .and_then(|t| t.metadata.as_ref())
        .and_then(|m| m.labels.as_ref())
}

fn pod_labels(graph: &ResourceGraph, id: NodeId) -> Option<&BTreeMap<String, String>> {
    graph.node(id).object.meta().labels.as_ref()
}

/// Service selects pods and the pod templates of controllers and deployment configs
pub fn add_exposed_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    let pods = graph.nodes_by_kind(ResourceKind::Pod);
    let templated: Vec<NodeId> = graph
        .nodes_by_kind(ResourceKind::ReplicationController)
        .into_iter()
        .chain(graph.nodes_by_kind(ResourceKind::DeploymentConfig))
        .collect();

    for svc_id in graph.nodes_by_kind(ResourceKind::Service) {
        let svc = graph.node(svc_id);
        let Some(selector) = svc
            .object
            .as_service()
            .and_then(|s| s.spec.as_ref())
            .and_then(|spec| spec.selector.as_ref())
        else {
            continue;
        };
        let namespace = svc.namespace();

        for &pod_id in &pods {
            if graph.node(pod_id).namespace() == namespace
                && selector_matches(selector, pod_labels(graph, pod_id))
            {
                pending.push((svc_id, pod_id));
            }
        }
        for &owner_id in &templated {
            if graph.node(owner_id).namespace() == namespace
                && selector_matches(selector, template_labels(graph, owner_id))
            {
                pending.push((svc_id, owner_id));
            }
        }
    }

    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::Exposes);
    }
}

/// Replication controller owns the pods its selector matches
pub fn add_managed_pod_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    let pods = graph.nodes_by_kind(ResourceKind::Pod);

    for rc_id in graph.nodes_by_kind(ResourceKind::ReplicationController) {
        let node = graph.node(rc_id);
        let Some(spec) = node
            .object
            .as_replication_controller()
            .and_then(|rc| rc.spec.as_ref())
        else {
            continue;
        };
        // An empty selector defaults to the template labels
        let selector = match spec.selector.as_ref().filter(|s| !s.is_empty()) {
            Some(selector) => selector,
            None => match template_labels(graph, rc_id) {
                Some(labels) => labels,
                None => continue,
            },
        };
        for &pod_id in &pods {
            if graph.node(pod_id).namespace() == node.namespace()
                && selector_matches(selector, pod_labels(graph, pod_id))
            {
                pending.push((rc_id, pod_id));
            }
        }
    }

    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::Manages);
    }
}

pub fn add_service_account_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    for pod_id in graph.nodes_by_kind(ResourceKind::Pod) {
        let node = graph.node(pod_id);
        let Some(name) = node
            .object
            .as_pod()
            .and_then(|p| p.spec.as_ref())
            .and_then(|s| s.service_account_name.as_deref())
            .filter(|n| !n.is_empty())
        else {
            continue;
        };
        if let Some(sa_id) = graph.find(ResourceKind::ServiceAccount, node.namespace(), name) {
            pending.push((pod_id, sa_id));
        }
    }
    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::RunsAs);
    }
}

/// Names of the secrets a pod mounts as volumes
pub fn mounted_secret_names(graph: &ResourceGraph, pod_id: NodeId) -> Vec<&str> {
    graph
        .node(pod_id)
        .object
        .as_pod()
        .and_then(|p| p.spec.as_ref())
        .and_then(|s| s.volumes.as_ref())
        .map(|volumes| {
            volumes
                .iter()
                .filter_map(|v| v.secret.as_ref())
                .filter_map(|s| s.secret_name.as_deref())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

pub fn add_mounted_secret_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    for pod_id in graph.nodes_by_kind(ResourceKind::Pod) {
        let namespace = graph.node(pod_id).namespace();
        for name in mounted_secret_names(graph, pod_id) {
            if let Some(secret_id) = graph.find(ResourceKind::Secret, namespace, name) {
                pending.push((pod_id, secret_id));
            }
        }
    }
    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::MountsSecret);
    }
}

/// Build config produced each build that names it
pub fn add_build_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    for build_id in graph.nodes_by_kind(ResourceKind::Build) {
        let node = graph.node(build_id);
        let Some(config) = node.object.as_build().and_then(|b| b.config_name()) else {
            continue;
        };
        if let Some(bc_id) = graph.find(ResourceKind::BuildConfig, node.namespace(), config) {
            pending.push((bc_id, build_id));
        }
    }
    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::Builds);
    }
}

/// `(namespace, stream, tag)` named by an image stream tag reference
///
/// A bare stream name refers to its `latest` tag.
pub fn image_stream_tag_reference<'a>(
    reference: &'a ObjectReference,
    default_namespace: &'a str,
) -> Option<(&'a str, &'a str, &'a str)> {
    if reference.kind.as_deref() != Some("ImageStreamTag") {
        return None;
    }
    let name = reference.name.as_deref().filter(|n| !n.is_empty())?;
    let namespace = reference
        .namespace
        .as_deref()
        .filter(|ns| !ns.is_empty())
        .unwrap_or(default_namespace);
    let (stream, tag) = name.split_once(':').unwrap_or((name, "latest"));
    Some((namespace, stream, tag))
}

/// Resolve an image reference to its image stream tag node, placeholder or not
pub fn find_image_stream_tag(
    graph: &ResourceGraph,
    reference: &ObjectReference,
    default_namespace: &str,
) -> Option<NodeId> {
    let (namespace, stream, tag) = image_stream_tag_reference(reference, default_namespace)?;
    graph.find(
        ResourceKind::ImageStreamTag,
        namespace,
        &format!("{}:{}", stream, tag),
    )
}

/// Resolve an image reference, inserting a placeholder tag if nothing lists it
pub fn ensure_image_stream_tag(
    graph: &mut ResourceGraph,
    reference: &ObjectReference,
    default_namespace: &str,
) -> Option<NodeId> {
    let (namespace, stream, tag) = image_stream_tag_reference(reference, default_namespace)?;
    let placeholder = ImageStreamTag::placeholder(namespace, stream, tag);
    Some(graph.ensure_node(ResourceObject::ImageStreamTag(placeholder)))
}

/// True when the tag was listed by its image stream rather than only referenced
pub fn image_stream_tag_found(graph: &ResourceGraph, tag_id: NodeId) -> bool {
    graph
        .node(tag_id)
        .object
        .as_image_stream_tag()
        .is_some_and(|tag| tag.found)
}

/// The listed image stream a tag belongs to
pub fn image_stream_of_tag(graph: &ResourceGraph, tag_id: NodeId) -> Option<NodeId> {
    let node = graph.node(tag_id);
    let tag = node.object.as_image_stream_tag()?;
    graph.find(ResourceKind::ImageStream, node.namespace(), &tag.image_stream)
}

/// Build config pushes to its output tag and is fed by its base image tag
pub fn add_input_output_edges(graph: &mut ResourceGraph) {
    let mut outputs = Vec::new();
    let mut inputs = Vec::new();
    for bc_id in graph.nodes_by_kind(ResourceKind::BuildConfig) {
        let node = graph.node(bc_id);
        let Some(bc) = node.object.as_build_config() else {
            continue;
        };
        let namespace = node.namespace().to_string();
        if let Some(to) = bc.spec.output.to.as_ref() {
            outputs.push((bc_id, to.clone(), namespace.clone()));
        }
        if let Some(from) = bc.spec.strategy.from_reference() {
            inputs.push((bc_id, from.clone(), namespace));
        }
    }
    for (bc_id, to, namespace) in outputs {
        if let Some(tag_id) = ensure_image_stream_tag(graph, &to, &namespace) {
            graph.add_edge(bc_id, tag_id, EdgeKind::PushesTo);
        }
    }
    for (bc_id, from, namespace) in inputs {
        if let Some(tag_id) = ensure_image_stream_tag(graph, &from, &namespace) {
            graph.add_edge(tag_id, bc_id, EdgeKind::BuildInput);
        }
    }
}

/// Image stream tag triggers the deployment configs watching it
pub fn add_trigger_edges(graph: &mut ResourceGraph) {
    let mut references = Vec::new();
    for dc_id in graph.nodes_by_kind(ResourceKind::DeploymentConfig) {
        let node = graph.node(dc_id);
        let Some(dc) = node.object.as_deployment_config() else {
            continue;
        };
        for params in dc
            .spec
            .triggers
            .iter()
            .filter_map(|t| t.image_change_params.as_ref())
        {
            references.push((dc_id, params.from.clone(), node.namespace().to_string()));
        }
    }
    for (dc_id, from, namespace) in references {
        if let Some(tag_id) = ensure_image_stream_tag(graph, &from, &namespace) {
            graph.add_edge(tag_id, dc_id, EdgeKind::Triggers);
        }
    }
}

/// Deployment config produced the controllers annotated with its name
pub fn add_deployment_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    for rc_id in graph.nodes_by_kind(ResourceKind::ReplicationController) {
        let node = graph.node(rc_id);
        let Some(dc_name) = node
            .object
            .as_replication_controller()
            .and_then(deployment_config_name)
        else {
            continue;
        };
        if let Some(dc_id) = graph.find(ResourceKind::DeploymentConfig, node.namespace(), dc_name) {
            pending.push((dc_id, rc_id));
        }
    }
    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::Deploys);
    }
}

pub fn add_route_edges(graph: &mut ResourceGraph) {
    let mut pending = Vec::new();
    for route_id in graph.nodes_by_kind(ResourceKind::Route) {
        let node = graph.node(route_id);
        let Some(route) = node.object.as_route() else {
            continue;
        };
        let target = &route.spec.to;
        if !(target.kind.is_empty() || target.kind == "Service") || target.name.is_empty() {
            continue;
        }
        if let Some(svc_id) = graph.find(ResourceKind::Service, node.namespace(), &target.name) {
            pending.push((route_id, svc_id));
        }
    }
    for (from, to) in pending {
        graph.add_edge(from, to, EdgeKind::Routes);
    }
}
