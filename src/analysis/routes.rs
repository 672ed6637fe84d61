//! Route analyzers

use super::{Marker, Namer};
use crate::graph::{EdgeKind, NodeId, ResourceGraph};
use crate::models::ResourceKind;
use crate::models::openshift::{Route, TLS_TERMINATION_PASSTHROUGH};
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

pub const MISSING_ROUTE_SERVICE_WARNING: &str = "MissingRouteService";
pub const MISSING_ROUTE_PORT_WARNING: &str = "MissingRoutePort";
pub const WRONG_ROUTE_PORT_WARNING: &str = "WrongRoutePort";
pub const MISSING_TLS_TERMINATION_ERROR: &str = "MissingTLSTermination";
pub const PATH_BASED_PASSTHROUGH_ERROR: &str = "PathBasedPassthroughRoute";
pub const ROUTE_NOT_ADMITTED_ERROR: &str = "RouteNotAdmitted";
pub const MISSING_ROUTER_WARNING: &str = "MissingRouter";

fn routes(graph: &ResourceGraph) -> impl Iterator<Item = (NodeId, &Route)> + '_ {
    graph
        .nodes_by_kind(ResourceKind::Route)
        .into_iter()
        .filter_map(|id| graph.node(id).object.as_route().map(|r| (id, r)))
}

/// True when the service has a port the route's target port can name
fn service_has_port(service: &Service, target: &IntOrString) -> bool {
    let ports = service
        .spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .map(Vec::as_slice)
        .unwrap_or_default();
    ports.iter().any(|port| match target {
        IntOrString::Int(n) => match &port.target_port {
            Some(IntOrString::Int(t)) => t == n,
            Some(IntOrString::String(_)) => false,
            None => port.port == *n,
        },
        IntOrString::String(name) => {
            port.name.as_deref() == Some(name.as_str())
                || port.target_port == Some(IntOrString::String(name.clone()))
        }
    })
}

fn port_count(service: &Service) -> usize {
    service
        .spec
        .as_ref()
        .and_then(|s| s.ports.as_ref())
        .map_or(0, Vec::len)
}

/// Routes to missing services, or to ports the service does not have
pub fn find_port_mapping_issues(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (route_id, route) in routes(graph) {
        let route_name = f.resource_name(graph.node(route_id));
        let services = graph.successors(route_id, EdgeKind::Routes);
        let Some(svc_id) = services.first().copied() else {
            if !route.spec.to.name.is_empty() {
                markers.push(
                    Marker::warning(
                        MISSING_ROUTE_SERVICE_WARNING,
                        format!(
                            "{} is supposed to route traffic to svc/{} but svc/{} doesn't exist.",
                            route_name, route.spec.to.name, route.spec.to.name
                        ),
                    )
                    .on(route_id),
                );
            }
            continue;
        };
        let Some(service) = graph.node(svc_id).object.as_service() else {
            continue;
        };
        let svc_name = f.resource_name(graph.node(svc_id));

        match route.spec.port.as_ref().and_then(|p| p.target_port.as_ref()) {
            None if port_count(service) > 1 => markers.push(
                Marker::warning(
                    MISSING_ROUTE_PORT_WARNING,
                    format!(
                        "{} doesn't have a port specified and is routing traffic to {} which uses multiple ports.",
                        route_name, svc_name
                    ),
                )
                .on(route_id)
                .related([svc_id]),
            ),
            None => {}
            Some(target) if !service_has_port(service, target) => {
                let target = match target {
                    IntOrString::Int(n) => n.to_string(),
                    IntOrString::String(s) => s.clone(),
                };
                markers.push(
                    Marker::warning(
                        WRONG_ROUTE_PORT_WARNING,
                        format!(
                            "{} has a port specified ({}) but {} has no such port.",
                            route_name, target, svc_name
                        ),
                    )
                    .on(route_id)
                    .related([svc_id]),
                )
            }
            Some(_) => {}
        }
    }
    markers
}

/// TLS blocks with no termination type
pub fn find_missing_tls_termination(
    graph: &ResourceGraph,
    f: &dyn Namer,
    cli_name: &str,
) -> Vec<Marker> {
    routes(graph)
        .filter(|(_, route)| {
            route
                .spec
                .tls
                .as_ref()
                .is_some_and(|tls| tls.termination.is_empty())
        })
        .map(|(route_id, _)| {
            let route_name = f.resource_name(graph.node(route_id));
            Marker::error(
                MISSING_TLS_TERMINATION_ERROR,
                format!(
                    "{} has a TLS configuration but no termination type specified.",
                    route_name
                ),
            )
            .on(route_id)
            .suggest(format!(
                "{} patch {} -p '{{\"spec\":{{\"tls\":{{\"termination\":\"<type>\"}}}}}}' (replace <type> with a valid termination type: edge, passthrough, reencrypt)",
                cli_name, route_name
            ))
        })
        .collect()
}

/// Passthrough routes cannot route on path
pub fn find_path_based_passthrough_routes(
    graph: &ResourceGraph,
    f: &dyn Namer,
    cli_name: &str,
) -> Vec<Marker> {
    routes(graph)
        .filter(|(_, route)| {
            !route.spec.path.is_empty()
                && route
                    .spec
                    .tls
                    .as_ref()
                    .is_some_and(|tls| tls.termination == TLS_TERMINATION_PASSTHROUGH)
        })
        .map(|(route_id, _)| {
            let route_name = f.resource_name(graph.node(route_id));
            Marker::error(
                PATH_BASED_PASSTHROUGH_ERROR,
                format!(
                    "{} is a passthrough route, but has a path specified. Passthrough routes cannot route on path.",
                    route_name
                ),
            )
            .on(route_id)
            .suggest(format!(
                "{} patch {} -p '{{\"spec\":{{\"path\":\"\"}}}}'",
                cli_name, route_name
            ))
        })
        .collect()
}

/// Routers that refused a route
pub fn find_route_admission_failures(graph: &ResourceGraph, f: &dyn Namer) -> Vec<Marker> {
    let mut markers = Vec::new();
    for (route_id, route) in routes(graph) {
        for ingress in &route.status.ingress {
            let Some(condition) = ingress.admitted().filter(|c| c.status == "False") else {
                continue;
            };
            let reason = if condition.reason.is_empty() {
                "unknown reason".to_string()
            } else {
                condition.reason.clone()
            };
            markers.push(
                Marker::error(
                    ROUTE_NOT_ADMITTED_ERROR,
                    format!(
                        "{} was not accepted by router {:?}: {}",
                        f.resource_name(graph.node(route_id)),
                        ingress.router_name,
                        reason
                    ),
                )
                .on(route_id),
            );
        }
    }
    markers
}

/// Routes with a host that no router has reported on
pub fn find_missing_router(graph: &ResourceGraph, f: &dyn Namer, cli_name: &str) -> Vec<Marker> {
    routes(graph)
        .filter(|(_, route)| !route.spec.host.is_empty() && route.status.ingress.is_empty())
        .map(|(route_id, route)| {
            Marker::warning(
                MISSING_ROUTER_WARNING,
                format!(
                    "{} is routing traffic to svc/{}, but either the administrator has not installed a router or the router is not selecting this route.",
                    f.resource_name(graph.node(route_id)),
                    route.spec.to.name
                ),
            )
            .on(route_id)
            .suggest(format!("{} adm router -h", cli_name))
        })
        .collect()
}
