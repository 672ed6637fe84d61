//! Build and deployment pipelines
//!
//! A deployment pipeline is a deployment config, the controllers it
//! produced and the image pipelines feeding its containers. An image
//! pipeline is an image plus the build config that pushes to it.

use super::CoveredSet;
use crate::graph::edges::{find_image_stream_tag, image_stream_of_tag};
use crate::graph::{EdgeKind, NodeId, ResourceGraph};
use crate::models::openshift::{
    BuildPhase, TRIGGER_IMAGE_CHANGE, deployment_version_for, image_reference_spec,
};
use std::cmp::Reverse;

/// Where the image of a pipeline lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// An image stream tag node in the graph
    Tag(NodeId),
    /// A pull spec with no node of its own
    External(String),
}

#[derive(Debug, Clone, Default)]
pub struct ImagePipeline {
    pub image: Option<ImageRef>,
    pub build_config: Option<NodeId>,
    /// Pull spec of the builder or base image
    pub base_image: Option<String>,
    pub last_successful: Option<NodeId>,
    pub last_unsuccessful: Option<NodeId>,
    /// Builds not yet in a terminal phase, newest first
    pub active_builds: Vec<NodeId>,
    /// False when the build output names an image stream that does not exist
    pub destination_resolved: bool,
}

impl ImagePipeline {
    fn external(spec: String) -> Self {
        Self {
            image: Some(ImageRef::External(spec)),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeploymentPipeline {
    pub config: NodeId,
    /// Controller for the current deployment version, if it exists
    pub active: Option<NodeId>,
    /// Older controllers, newest first
    pub inactive: Vec<NodeId>,
    pub images: Vec<ImagePipeline>,
}

impl DeploymentPipeline {
    pub fn controllers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.active.iter().copied().chain(self.inactive.iter().copied())
    }
}

/// Build the pipeline for one build config
///
/// `claimed` holds nodes already owned by other groups. The returned set
/// is what this pipeline claims.
pub fn image_pipeline_from_build_config(
    graph: &ResourceGraph,
    bc_id: NodeId,
    claimed: &CoveredSet,
) -> (ImagePipeline, CoveredSet) {
    let mut covered = CoveredSet::new();
    covered.insert(bc_id);

    let node = graph.node(bc_id);
    let namespace = node.namespace();
    let bc = node.object.as_build_config();
    let output = bc.and_then(|bc| bc.spec.output.to.as_ref());

    let mut image = None;
    let mut destination_resolved = false;
    if let Some(to) = output {
        match find_image_stream_tag(graph, to, namespace) {
            Some(tag_id) => {
                destination_resolved = image_stream_of_tag(graph, tag_id).is_some();
                if claimed.contains(tag_id) {
                    image = Some(ImageRef::External(image_reference_spec(to, namespace)));
                } else {
                    covered.insert(tag_id);
                    image = Some(ImageRef::Tag(tag_id));
                }
            }
            None => {
                destination_resolved = to.kind.as_deref() == Some("DockerImage");
                image = Some(ImageRef::External(image_reference_spec(to, namespace)));
            }
        }
    }

    let base_image = bc
        .and_then(|bc| bc.spec.strategy.from_reference())
        .map(|from| match find_image_stream_tag(graph, from, namespace) {
            Some(tag_id) => tag_image_spec(graph, tag_id),
            None => image_reference_spec(from, namespace),
        });

    let mut pipeline = ImagePipeline {
        image,
        build_config: Some(bc_id),
        base_image,
        destination_resolved,
        ..Default::default()
    };
    classify_builds(graph, bc_id, claimed, &mut pipeline, &mut covered);
    (pipeline, covered)
}

/// Build the pipeline ending in an image stream tag
///
/// The tag is claimed along with the build config that pushes to it.
pub fn image_pipeline_from_tag(
    graph: &ResourceGraph,
    tag_id: NodeId,
    claimed: &CoveredSet,
) -> (ImagePipeline, CoveredSet) {
    let builder = graph
        .predecessors(tag_id, EdgeKind::PushesTo)
        .into_iter()
        .find(|bc| !claimed.contains(*bc));

    match builder {
        Some(bc_id) => image_pipeline_from_build_config(graph, bc_id, claimed),
        None => {
            let mut covered = CoveredSet::new();
            covered.insert(tag_id);
            let pipeline = ImagePipeline {
                image: Some(ImageRef::Tag(tag_id)),
                destination_resolved: image_stream_of_tag(graph, tag_id).is_some(),
                ..Default::default()
            };
            (pipeline, covered)
        }
    }
}

/// Sort a build config's unclaimed builds into last success, last failure and active
fn classify_builds(
    graph: &ResourceGraph,
    bc_id: NodeId,
    claimed: &CoveredSet,
    pipeline: &mut ImagePipeline,
    covered: &mut CoveredSet,
) {
    let mut builds: Vec<NodeId> = graph
        .successors(bc_id, EdgeKind::Builds)
        .into_iter()
        .filter(|id| !claimed.contains(*id))
        .collect();
    // Newest first; the sort is stable so ties keep identity order
    builds.sort_by_key(|id| Reverse(graph.node(*id).object.creation_time()));

    for build_id in builds {
        covered.insert(build_id);
        let Some(build) = graph.node(build_id).object.as_build() else {
            continue;
        };
        match build.status.phase {
            BuildPhase::Complete => {
                pipeline.last_successful.get_or_insert(build_id);
            }
            phase if phase.is_unsuccessful() => {
                pipeline.last_unsuccessful.get_or_insert(build_id);
            }
            _ => pipeline.active_builds.push(build_id),
        }
    }
}

fn tag_image_spec(graph: &ResourceGraph, tag_id: NodeId) -> String {
    graph
        .node(tag_id)
        .object
        .as_image_stream_tag()
        .map(|tag| tag.image_spec())
        .unwrap_or_else(|| graph.node(tag_id).name().to_string())
}

/// Build the pipeline for one deployment config
pub fn deployment_pipeline(
    graph: &ResourceGraph,
    dc_id: NodeId,
    claimed: &CoveredSet,
) -> (DeploymentPipeline, CoveredSet) {
    let mut covered = CoveredSet::new();
    covered.insert(dc_id);

    let node = graph.node(dc_id);
    let namespace = node.namespace();
    let dc = node.object.as_deployment_config();

    // Controllers, newest deployment version first
    let mut controllers: Vec<NodeId> = graph
        .successors(dc_id, EdgeKind::Deploys)
        .into_iter()
        .filter(|id| !claimed.contains(*id))
        .collect();
    controllers.sort_by_key(|id| Reverse(controller_version(graph, *id)));

    let latest = dc.map(|dc| dc.status.latest_version).unwrap_or(0);
    let active = controllers
        .first()
        .copied()
        .filter(|id| controller_version(graph, *id) == latest);
    let inactive: Vec<NodeId> = controllers
        .iter()
        .copied()
        .filter(|id| Some(*id) != active)
        .collect();

    for &rc_id in &controllers {
        covered.insert(rc_id);
        for pod_id in graph.successors(rc_id, EdgeKind::Manages) {
            if !claimed.contains(pod_id) {
                covered.insert(pod_id);
            }
        }
    }

    let mut images = Vec::new();
    let mut triggered_containers: Vec<&str> = Vec::new();
    if let Some(dc) = dc {
        for params in dc
            .spec
            .triggers
            .iter()
            .filter(|t| t.type_ == TRIGGER_IMAGE_CHANGE)
            .filter_map(|t| t.image_change_params.as_ref())
        {
            triggered_containers.extend(params.container_names.iter().map(String::as_str));
            match find_image_stream_tag(graph, &params.from, namespace) {
                Some(tag_id) if !claimed.contains(tag_id) && !covered.contains(tag_id) => {
                    let mut both = claimed.clone();
                    both.union(&covered);
                    let (pipeline, by_image) = image_pipeline_from_tag(graph, tag_id, &both);
                    covered.union(&by_image);
                    images.push(pipeline);
                }
                Some(tag_id) => {
                    images.push(ImagePipeline::external(tag_image_spec(graph, tag_id)));
                }
                None => {
                    images.push(ImagePipeline::external(image_reference_spec(
                        &params.from,
                        namespace,
                    )));
                }
            }
        }

        let containers = dc
            .spec
            .template
            .as_ref()
            .and_then(|t| t.spec.as_ref())
            .map(|spec| spec.containers.as_slice())
            .unwrap_or_default();
        for container in containers {
            if triggered_containers.contains(&container.name.as_str()) {
                continue;
            }
            if let Some(image) = container.image.as_deref().filter(|i| !i.is_empty()) {
                images.push(ImagePipeline::external(image.to_string()));
            }
        }
    }

    (
        DeploymentPipeline {
            config: dc_id,
            active,
            inactive,
            images,
        },
        covered,
    )
}

fn controller_version(graph: &ResourceGraph, rc_id: NodeId) -> i64 {
    graph
        .node(rc_id)
        .object
        .as_replication_controller()
        .map(deployment_version_for)
        .unwrap_or(0)
}
