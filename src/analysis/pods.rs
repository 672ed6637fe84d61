//! Pod and replication controller analyzers

use super::{Marker, Namer};
use crate::graph::edges::mounted_secret_names;
use crate::graph::{EdgeKind, ResourceGraph};
use crate::models::ResourceKind;

pub const CRASH_LOOPING_POD_ERROR: &str = "CrashLoopingPod";
pub const RESTARTING_POD_WARNING: &str = "RestartingPod";
pub const DUELING_REPLICATION_CONTROLLER_WARNING: &str = "DuelingReplicationControllers";
pub const MISSING_SECRET_WARNING: &str = "MissingSecret";

/// Restart count above which a running container is reported
pub const RESTART_THRESHOLD: i32 = 5;

/// Containers stuck in a crash loop, or restarting often
pub fn find_restarting_pods(graph: &ResourceGraph, f: &dyn Namer, cli_name: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    for pod_id in graph.nodes_by_kind(ResourceKind::Pod) {
        let node = graph.node(pod_id);
        let statuses = node
            .object
            .as_pod()
            .and_then(|p| p.status.as_ref())
            .and_then(|s| s.container_statuses.as_ref());
        let Some(statuses) = statuses else {
            continue;
        };
        let pod_name = f.resource_name(node);

        for status in statuses {
            let crash_looping = status
                .state
                .as_ref()
                .and_then(|s| s.waiting.as_ref())
                .and_then(|w| w.reason.as_deref())
                == Some("CrashLoopBackOff");
            let logs = format!("{} logs -p {} -c {}", cli_name, pod_name, status.name);

            if crash_looping {
                markers.push(
                    Marker::error(
                        CRASH_LOOPING_POD_ERROR,
                        format!("container {:?} in {} is crash-looping", status.name, pod_name),
                    )
                    .on(pod_id)
                    .suggest(logs),
                );
            } else if status.restart_count > RESTART_THRESHOLD {
                markers.push(
                    Marker::warning(
                        RESTARTING_POD_WARNING,
                        format!(
                            "container {:?} in {} has restarted {} times",
                            status.name, pod_name, status.restart_count
                        ),
                    )
                    .on(pod_id)
                    .suggest(logs),
                );
            }
        }
    }
    markers
}

/// Pods selected by more than one replication controller
pub fn find_dueling_replication_controllers(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();
    for rc_id in graph.nodes_by_kind(ResourceKind::ReplicationController) {
        for pod_id in graph.successors(rc_id, EdgeKind::Manages) {
            let owners = graph.predecessors(pod_id, EdgeKind::Manages);
            if owners.len() < 2 {
                continue;
            }
            let others: Vec<String> = owners
                .iter()
                .filter(|id| **id != rc_id)
                .map(|id| f.resource_name(graph.node(*id)))
                .collect();
            markers.push(
                Marker::warning(
                    DUELING_REPLICATION_CONTROLLER_WARNING,
                    format!(
                        "{} is competing for {} with {}",
                        f.resource_name(graph.node(rc_id)),
                        f.resource_name(graph.node(pod_id)),
                        others.join(", ")
                    ),
                )
                .on(rc_id)
                .related(owners),
            );
        }
    }
    markers
}

/// Secret volumes naming a secret that does not exist
///
/// Namespaces with no listed secrets at all are skipped.
pub fn find_missing_secrets(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let secrets = graph.nodes_by_kind(ResourceKind::Secret);
    let mut markers = Vec::new();
    for pod_id in graph.nodes_by_kind(ResourceKind::Pod) {
        let node = graph.node(pod_id);
        if !secrets
            .iter()
            .any(|id| graph.node(*id).namespace() == node.namespace())
        {
            continue;
        }
        for name in mounted_secret_names(graph, pod_id) {
            if graph
                .find(ResourceKind::Secret, node.namespace(), name)
                .is_some()
            {
                continue;
            }
            markers.push(
                Marker::warning(
                    MISSING_SECRET_WARNING,
                    format!(
                        "{} is attempting to mount a missing secret secret/{}",
                        f.resource_name(node),
                        name
                    ),
                )
                .on(pod_id),
            );
        }
    }
    markers
}
