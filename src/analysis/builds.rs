//! Build and image stream analyzers

use super::{Marker, Namer};
use crate::graph::edges::{image_stream_of_tag, image_stream_tag_found};
use crate::graph::{EdgeKind, NodeId, ResourceGraph};
use crate::models::ResourceKind;
use std::cmp::Reverse;

pub const MISSING_IMAGE_STREAM_ERROR: &str = "MissingImageStream";
pub const MISSING_REQUIRED_REGISTRY_ERROR: &str = "MissingRequiredRegistry";
pub const CYCLE_DETECTED_WARNING: &str = "CycleDetectedInBuild";
pub const TAG_NOT_AVAILABLE_WARNING: &str = "TagNotAvailable";
pub const LATEST_BUILD_FAILED_ERROR: &str = "LatestBuildFailed";
pub const MISSING_INPUT_IMAGE_STREAM_WARNING: &str = "MissingInputImageStream";

/// Build configs pushing to a stream that is missing or has no registry
pub fn find_unpushable_build_configs(
    graph: &ResourceGraph,
    f: &dyn Namer,
    cli_name: &str,
) -> Vec<Marker> {
    let mut markers = Vec::new();
    for bc_id in graph.nodes_by_kind(ResourceKind::BuildConfig) {
        let bc_name = f.resource_name(graph.node(bc_id));
        for tag_id in graph.successors(bc_id, EdgeKind::PushesTo) {
            let tag_name = f.resource_name(graph.node(tag_id));
            let stream = image_stream_of_tag(graph, tag_id)
                .and_then(|id| graph.node(id).object.as_image_stream());

            match stream {
                None => markers.push(
                    Marker::error(
                        MISSING_IMAGE_STREAM_ERROR,
                        format!(
                            "{} is pushing to {}, but the image stream for that tag does not exist.",
                            bc_name, tag_name
                        ),
                    )
                    .on(bc_id)
                    .related([tag_id]),
                ),
                Some(stream) if stream.status.docker_image_repository.is_empty() => markers.push(
                    Marker::error(
                        MISSING_REQUIRED_REGISTRY_ERROR,
                        format!(
                            "{} is pushing to {}, but the administrator has not configured the integrated container image registry.",
                            bc_name, tag_name
                        ),
                    )
                    .on(bc_id)
                    .related([tag_id])
                    .suggest(format!("{} adm registry -h", cli_name)),
                ),
                Some(_) => {}
            }
        }
    }
    markers
}

/// Build configs that, through their output and input tags, trigger themselves
pub fn find_circular_builds(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut cycles = Vec::new();
    for bc_id in graph.nodes_by_kind(ResourceKind::BuildConfig) {
        let mut path = vec![bc_id];
        walk_builds(graph, bc_id, bc_id, &mut path, &mut cycles);
    }

    cycles
        .into_iter()
        .map(|cycle: Vec<NodeId>| {
            let names: Vec<String> = cycle
                .iter()
                .chain(cycle.first())
                .map(|id| f.resource_name(graph.node(*id)))
                .collect();
            Marker::warning(
                CYCLE_DETECTED_WARNING,
                format!(
                    "Cycle detected in build configurations: {}",
                    names.join(" -> ")
                ),
            )
            .on(cycle[0])
            .related(cycle.iter().copied().skip(1))
        })
        .collect()
}

/// Depth-first search for cycles whose smallest build config is `start`
fn walk_builds(
    graph: &ResourceGraph,
    start: NodeId,
    current: NodeId,
    path: &mut Vec<NodeId>,
    cycles: &mut Vec<Vec<NodeId>>,
) {
    let start_key = &graph.node(start).key;
    for tag in graph.successors(current, EdgeKind::PushesTo) {
        for next in graph.successors(tag, EdgeKind::BuildInput) {
            if next == start {
                let mut cycle = path.clone();
                cycle.push(tag);
                cycles.push(cycle);
            } else if graph.node(next).key > *start_key && !path.contains(&next) {
                path.push(tag);
                path.push(next);
                walk_builds(graph, start, next, path, cycles);
                path.pop();
                path.pop();
            }
        }
    }
}

/// Build outputs that have never received an image
///
/// Tags of missing streams are left to [`find_unpushable_build_configs`].
pub fn find_pending_tags(graph: &ResourceGraph, f: &dyn Namer, cli_name: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for tag_id in graph.nodes_by_kind(ResourceKind::ImageStreamTag) {
        let node = graph.node(tag_id);
        let Some(tag) = node.object.as_image_stream_tag() else {
            continue;
        };
        if tag.docker_image_reference.is_some() || image_stream_of_tag(graph, tag_id).is_none() {
            continue;
        }

        let tag_name = f.resource_name(node);
        for bc_id in graph.predecessors(tag_id, EdgeKind::PushesTo) {
            let mut builds = graph.successors(bc_id, EdgeKind::Builds);
            builds.sort_by_key(|id| Reverse(graph.node(*id).object.creation_time()));
            let latest = builds
                .first()
                .and_then(|id| graph.node(*id).object.as_build().map(|b| (*id, b)));

            match latest {
                None => markers.push(
                    Marker::warning(
                        TAG_NOT_AVAILABLE_WARNING,
                        format!("{} needs to be imported or created by a build.", tag_name),
                    )
                    .on(tag_id)
                    .related([bc_id])
                    .suggest(format!(
                        "{} start-build {}",
                        cli_name,
                        graph.node(bc_id).name()
                    )),
                ),
                Some((build_id, build)) if build.status.phase.is_unsuccessful() => {
                    let build_name = f.resource_name(graph.node(build_id));
                    markers.push(
                        Marker::error(
                            LATEST_BUILD_FAILED_ERROR,
                            format!(
                                "{} has failed builds and {} is not available.",
                                f.resource_name(graph.node(bc_id)),
                                tag_name
                            ),
                        )
                        .on(tag_id)
                        .related([bc_id, build_id])
                        .suggest(format!("{} logs {}", cli_name, build_name)),
                    )
                }
                Some(_) => {}
            }
        }
    }
    markers
}

/// Build configs whose base image stream or tag does not exist in their own namespace
pub fn find_missing_input_image_streams(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();
    for bc_id in graph.nodes_by_kind(ResourceKind::BuildConfig) {
        let node = graph.node(bc_id);
        for tag_id in graph.predecessors(bc_id, EdgeKind::BuildInput) {
            // Other namespaces were not listed, so nothing can be concluded there
            if graph.node(tag_id).namespace() != node.namespace() {
                continue;
            }
            let missing = if image_stream_of_tag(graph, tag_id).is_none() {
                "the image stream for that tag does not exist"
            } else if !image_stream_tag_found(graph, tag_id) {
                "the image stream tag does not exist"
            } else {
                continue;
            };
            markers.push(
                Marker::warning(
                    MISSING_INPUT_IMAGE_STREAM_WARNING,
                    format!(
                        "{} builds from {}, but {}.",
                        f.resource_name(node),
                        f.resource_name(graph.node(tag_id)),
                        missing
                    ),
                )
                .on(bc_id)
                .related([tag_id]),
            );
        }
    }
    markers
}
