//! Deployment config analyzers

use super::{Marker, Namer};
use crate::graph::edges::{find_image_stream_tag, image_stream_of_tag, image_stream_tag_found};
use crate::graph::{EdgeKind, ResourceGraph};
use crate::models::ResourceKind;
use crate::models::openshift::{TRIGGER_IMAGE_CHANGE, image_reference_spec};

pub const MISSING_IMAGE_STREAM_ERROR: &str = "MissingImageStream";
pub const MISSING_IMAGE_STREAM_TAG_WARNING: &str = "MissingImageStreamTag";
pub const MISSING_READINESS_PROBE_WARNING: &str = "MissingReadinessProbe";

/// Image change triggers pointing at streams or tags that do not exist
///
/// A missing tag is fine while some build config pushes to it.
pub fn find_deployment_config_trigger_errors(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();
    for dc_id in graph.nodes_by_kind(ResourceKind::DeploymentConfig) {
        let node = graph.node(dc_id);
        let Some(dc) = node.object.as_deployment_config() else {
            continue;
        };
        let dc_name = f.resource_name(node);

        for params in dc
            .spec
            .triggers
            .iter()
            .filter(|t| t.type_ == TRIGGER_IMAGE_CHANGE)
            .filter_map(|t| t.image_change_params.as_ref())
        {
            let Some(tag_id) = find_image_stream_tag(graph, &params.from, node.namespace()) else {
                continue;
            };
            if image_stream_of_tag(graph, tag_id).is_none() {
                let stream = graph
                    .node(tag_id)
                    .object
                    .as_image_stream_tag()
                    .map(|tag| tag.image_stream.clone())
                    .unwrap_or_default();
                markers.push(
                    Marker::error(
                        MISSING_IMAGE_STREAM_ERROR,
                        format!(
                            "The image trigger for {} will have no effect because is/{} does not exist.",
                            dc_name, stream
                        ),
                    )
                    .on(dc_id),
                );
            } else if !image_stream_tag_found(graph, tag_id)
                && graph.predecessors(tag_id, EdgeKind::PushesTo).is_empty()
            {
                markers.push(
                    Marker::warning(
                        MISSING_IMAGE_STREAM_TAG_WARNING,
                        format!(
                            "The image trigger for {} will have no effect until {} is imported or created by a build.",
                            dc_name,
                            image_reference_spec(&params.from, node.namespace())
                        ),
                    )
                    .on(dc_id),
                );
            }
        }
    }
    markers
}

/// Deployment configs where no container has a readiness probe
pub fn find_readiness_warnings(graph: &ResourceGraph, f: &dyn Namer, cli_name: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for dc_id in graph.nodes_by_kind(ResourceKind::DeploymentConfig) {
        let node = graph.node(dc_id);
        let containers = node
            .object
            .as_deployment_config()
            .and_then(|dc| dc.spec.template.as_ref())
            .and_then(|t| t.spec.as_ref())
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default();
        if containers.is_empty() || containers.iter().any(|c| c.readiness_probe.is_some()) {
            continue;
        }
        let dc_name = f.resource_name(node);
        markers.push(
            Marker::warning(
                MISSING_READINESS_PROBE_WARNING,
                format!(
                    "{} has no readiness probe to verify pods are ready to accept traffic or ensure deployment is successful.",
                    dc_name
                ),
            )
            .on(dc_id)
            .suggest(format!("{} set probe {} --readiness ...", cli_name, dc_name)),
        );
    }
    markers
}
