//! Text for each kind of display group

use super::formatter::NamespacedFormatter;
use super::text::{
    describe_pod_summary_inline, describe_service_ports, indent_lines, relative_time,
};
use crate::analysis::Namer;
use crate::graph::{NodeId, ResourceGraph};
use crate::graphview::{DeploymentPipeline, ImagePipeline, ImageRef, ServiceGroup};
use crate::models::openshift::{
    Build, BuildConfig, BuildPhase, BuildSource, DeploymentConfig, DeploymentStatus, Route,
    SourceControlUser, SourceRevision, TLS_TERMINATION_EDGE, TLS_TERMINATION_PASSTHROUGH,
    TLS_TERMINATION_REENCRYPT, TRIGGER_CONFIG_CHANGE, TRIGGER_IMAGE_CHANGE,
    deployment_status_for, deployment_status_reason_for, deployment_version_for,
};
use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{PodSpec, ReplicationController, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use std::collections::BTreeSet;

/// Deployment history entries shown per deployment config
const DEPLOYMENTS_SHOWN: usize = 3;

/// Longest deployment config line before the image is wrapped
const MAX_DEPLOYS_LINE: usize = 120;

/// Renders groups of one graph at one instant
pub struct Sections<'a> {
    pub graph: &'a ResourceGraph,
    pub now: DateTime<Utc>,
}

impl<'a> Sections<'a> {
    pub fn new(graph: &'a ResourceGraph, now: DateTime<Utc>) -> Self {
        Self { graph, now }
    }

    fn name(&self, f: &NamespacedFormatter, id: NodeId) -> String {
        f.resource_name(self.graph.node(id))
    }

    /// The first line of a service group, followed by any extra exposures
    pub fn service_in_service_group(
        &self,
        f: &NamespacedFormatter,
        group: &ServiceGroup,
        exposed: Vec<String>,
    ) -> Vec<String> {
        let svc_name = self.name(f, group.service);
        let default_spec = ServiceSpec::default();
        let spec = self
            .graph
            .node(group.service)
            .object
            .as_service()
            .and_then(|s| s.spec.as_ref())
            .unwrap_or(&default_spec);
        let ip = spec.cluster_ip.as_deref().unwrap_or_default();
        let port = describe_service_ports(spec);

        let mut exposed = exposed.into_iter();
        if let Some(first) = exposed.next() {
            let mut lines = vec![format!("{} ({})", first, svc_name)];
            lines.extend(exposed);
            return lines;
        }
        let line = if spec.type_.as_deref() == Some("NodePort") {
            format!("{} (all nodes){}", svc_name, port)
        } else if ip == "None" {
            format!("{} (headless){}", svc_name, port)
        } else if ip.is_empty() {
            format!("{} <initializing>{}", svc_name, port)
        } else {
            format!("{} - {}{}", svc_name, ip, port)
        };
        vec![line]
    }

    /// How a route exposes its service, one line per reachable host
    pub fn route_in_service_group(&self, f: &NamespacedFormatter, route_id: NodeId) -> Vec<String> {
        let Some(route) = self.graph.node(route_id).object.as_route() else {
            return Vec::new();
        };
        let (requested, other, errors) = extract_route_info(route);
        let has_errors = !errors.is_empty();

        let mut lines = Vec::new();
        if requested {
            lines.push(describe_route_exposed(&route.spec.host, route, has_errors));
        }
        for host in &other {
            lines.push(describe_route_exposed(host, route, has_errors));
        }
        if lines.is_empty() {
            let route_name = self.name(f, route_id);
            let line = if let Some(reason) = errors.first() {
                format!("{} not accepted: {}", route_name, reason)
            } else if route.spec.host.is_empty() {
                format!("{} has no host set", route_name)
            } else if route.status.ingress.is_empty() {
                describe_route_exposed(&route.spec.host, route, false)
            } else {
                format!("exposed as {} by {}", route.spec.host, route_name)
            };
            lines.push(line);
        }
        lines
    }

    pub fn deployment_in_service_group(
        &self,
        f: &NamespacedFormatter,
        pipeline: &DeploymentPipeline,
    ) -> Vec<String> {
        let node = self.graph.node(pipeline.config);
        let Some(dc) = node.object.as_deployment_config() else {
            return Vec::new();
        };
        let local = NamespacedFormatter::new(node.namespace());
        let include_last_pass = pipeline.active.is_none();
        let verb = if dc.spec.test { "test deploys" } else { "deploys" };
        let trigger = describe_deployment_config_trigger(dc);

        let mut lines = Vec::new();
        if let [image] = pipeline.images.as_slice() {
            let parts = [
                self.name(f, pipeline.config),
                verb.to_string(),
                self.image_in_pipeline(&local, image, node.namespace()),
                trigger.to_string(),
            ];
            let first = join_words(&parts);
            match first.split_once(" <- ") {
                Some((head, tail)) if first.len() > MAX_DEPLOYS_LINE => {
                    lines.push(format!("{} <-", head));
                    lines.push(tail.to_string());
                }
                _ => lines.push(first),
            }
            lines.extend(indent_lines(
                "  ",
                self.additional_build_detail(image, include_last_pass),
            ));
        } else {
            let parts = [
                self.name(f, pipeline.config),
                verb.to_string(),
                trigger.to_string(),
            ];
            lines.push(join_words(&parts));
            for image in &pipeline.images {
                lines.push(self.image_in_pipeline(&local, image, node.namespace()));
                lines.extend(indent_lines(
                    "  ",
                    self.additional_build_detail(image, include_last_pass),
                ));
            }
        }
        lines.extend(self.deployments(dc, pipeline, DEPLOYMENTS_SHOWN));
        lines
    }

    /// Recent deployments of a config, active first
    fn deployments(
        &self,
        dc: &DeploymentConfig,
        pipeline: &DeploymentPipeline,
        count: usize,
    ) -> Vec<String> {
        let mut out = Vec::new();
        if pipeline.active.is_none() {
            let (on, auto) = describe_deployment_config_triggers(dc);
            if dc.status.latest_version == 0 {
                out.push(format!("deployment #1 waiting {}", on));
            } else if auto {
                out.push(format!(
                    "deployment #{} pending {}",
                    dc.status.latest_version, on
                ));
            }
        }

        let to_print = pipeline
            .controllers()
            .filter_map(|id| self.graph.node(id).object.as_replication_controller())
            .take(count);
        for (i, rc) in to_print.enumerate() {
            out.push(self.deployment_status(rc, i == 0, dc.spec.test));
        }
        out
    }

    fn deployment_status(&self, rc: &ReplicationController, first: bool, test: bool) -> String {
        let time_at = relative_time(crate::models::creation_time(&rc.metadata), self.now);
        let version = deployment_version_for(rc);
        match deployment_status_for(rc) {
            DeploymentStatus::Failed => {
                let reason = deployment_status_reason_for(rc)
                    .map(|r| format!(": {}", r))
                    .unwrap_or_default();
                format!(
                    "deployment #{} failed {} ago{}{}",
                    version,
                    time_at,
                    reason,
                    describe_pod_summary_inline(rc, false)
                )
            }
            DeploymentStatus::Complete if test => {
                format!("test deployment #{} deployed {} ago", version, time_at)
            }
            DeploymentStatus::Complete => format!(
                "deployment #{} deployed {} ago{}",
                version,
                time_at,
                describe_pod_summary_inline(rc, first)
            ),
            DeploymentStatus::Running => format!(
                "{}deployment #{} running for {}{}",
                if test { "test " } else { "" },
                version,
                time_at,
                describe_pod_summary_inline(rc, false)
            ),
            status => format!(
                "deployment #{} {} {} ago{}",
                version,
                status.as_str().to_lowercase(),
                time_at,
                describe_pod_summary_inline(rc, false)
            ),
        }
    }

    pub fn rc_in_service_group(&self, f: &NamespacedFormatter, rc_id: NodeId) -> Vec<String> {
        let Some(rc) = self.graph.node(rc_id).object.as_replication_controller() else {
            return Vec::new();
        };
        let Some(pod_spec) = rc
            .spec
            .as_ref()
            .and_then(|s| s.template.as_ref())
            .and_then(|t| t.spec.as_ref())
        else {
            return Vec::new();
        };
        vec![
            format!("{} runs {}", self.name(f, rc_id), container_images(pod_spec)),
            format!(
                "rc/{} created {} ago{}",
                self.graph.node(rc_id).name(),
                relative_time(crate::models::creation_time(&rc.metadata), self.now),
                describe_pod_summary_inline(rc, false)
            ),
        ]
    }

    pub fn pod(&self, f: &NamespacedFormatter, pod_id: NodeId) -> Vec<String> {
        let images = self
            .graph
            .node(pod_id)
            .object
            .as_pod()
            .and_then(|p| p.spec.as_ref())
            .map(container_images)
            .unwrap_or_default();
        vec![format!("{} runs {}", self.name(f, pod_id), images)]
    }

    /// A build pipeline that feeds no deployment
    pub fn standalone_build_group(
        &self,
        f: &NamespacedFormatter,
        pipeline: &ImagePipeline,
        namespace: &str,
    ) -> Vec<String> {
        match (self.build_config(pipeline), pipeline.image.as_ref()) {
            (Some(bc), image) => {
                let mut lines = vec![describe_build_in_pipeline(bc, pipeline.base_image.as_deref())];
                if let Some(image) = image {
                    lines.push(format!("pushes to {}", self.image_tag(f, image, namespace)));
                }
                lines
            }
            (None, Some(image)) => vec![self.image_tag(f, image, namespace)],
            (None, None) => vec!["<unknown>".to_string()],
        }
    }

    fn build_config(&self, pipeline: &ImagePipeline) -> Option<&'a BuildConfig> {
        pipeline
            .build_config
            .and_then(|id| self.graph.node(id).object.as_build_config())
    }

    fn image_in_pipeline(
        &self,
        f: &NamespacedFormatter,
        pipeline: &ImagePipeline,
        namespace: &str,
    ) -> String {
        let bc = self.build_config(pipeline);
        let base = pipeline.base_image.as_deref();
        match (pipeline.image.as_ref(), bc) {
            (Some(image), Some(bc)) => format!(
                "{} <- {}",
                self.image_tag(f, image, namespace),
                describe_build_in_pipeline(bc, base)
            ),
            (Some(image), None) => self.image_tag(f, image, namespace),
            (None, Some(bc)) => describe_build_in_pipeline(bc, base),
            (None, None) => "<unknown>".to_string(),
        }
    }

    fn image_tag(&self, f: &NamespacedFormatter, image: &ImageRef, namespace: &str) -> String {
        match image {
            ImageRef::Tag(id) => {
                let node = self.graph.node(*id);
                match node.object.as_image_stream_tag() {
                    Some(tag) if node.namespace() != namespace => tag.image_spec(),
                    _ => f.resource_name(node),
                }
            }
            ImageRef::External(spec) => spec.clone(),
        }
    }

    /// Recent build history of a pipeline
    pub fn additional_build_detail(
        &self,
        pipeline: &ImagePipeline,
        include_success: bool,
    ) -> Vec<String> {
        let Some(bc_id) = pipeline.build_config else {
            return Vec::new();
        };
        let parent = self.graph.node(bc_id).name();
        let build = |id: Option<NodeId>| id.and_then(|id| self.graph.node(id).object.as_build());
        let last_successful = build(pipeline.last_successful);
        let last_unsuccessful = build(pipeline.last_unsuccessful);
        let active: Vec<&Build> = pipeline
            .active_builds
            .iter()
            .filter_map(|id| build(Some(*id)))
            .collect();
        let resolved = pipeline.destination_resolved;

        // An absent timestamp orders before every real one
        let pass_time = last_successful.and_then(Build::timestamp);
        let fail_time = last_unsuccessful.and_then(Build::timestamp);
        let last_time = if pass_time > fail_time { pass_time } else { fail_time };

        let mut out = Vec::new();
        if let Some(b) = last_successful
            && (include_success || !active.is_empty())
        {
            out.push(self.build_phase(b, parent, resolved));
        }
        if pass_time < fail_time
            && let Some(b) = last_unsuccessful
        {
            out.push(self.build_phase(b, parent, resolved));
        }

        if let Some(first_active) = active.first() {
            let mut active_out: Vec<String> = active
                .iter()
                .map(|b| self.build_phase(b, parent, resolved))
                .collect();
            if first_active.timestamp() < last_time {
                out.extend(active_out);
            } else {
                active_out.extend(out);
                out = active_out;
            }
        }
        if out.is_empty() && last_successful.is_none() {
            out.push("not built yet".to_string());
        }
        out
    }

    fn build_phase(&self, build: &Build, parent: &str, push_target_resolved: bool) -> String {
        let image_stream_failure = if build.spec.output.to.is_some() && !push_target_resolved {
            " (can't push to image)"
        } else {
            ""
        };
        let time = relative_time(build.timestamp(), self.now);
        let name = build.metadata.name.as_deref().unwrap_or_default();
        let identification = name
            .strip_prefix(parent)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok())
            .map(|n| format!("build #{}", n))
            .unwrap_or_else(|| format!("build/{}", name));
        let revision = describe_source_revision(build.spec.revision.as_ref())
            .map(|r| format!(" - {}", r))
            .unwrap_or_default();

        match build.status.phase {
            BuildPhase::Complete => format!(
                "{} succeeded {} ago{}{}",
                identification, time, revision, image_stream_failure
            ),
            BuildPhase::Error => format!(
                "{} stopped with an error {} ago{}{}",
                identification, time, revision, image_stream_failure
            ),
            BuildPhase::Failed => format!(
                "{} failed {} ago{}{}",
                identification, time, revision, image_stream_failure
            ),
            phase => format!(
                "{} {} for {}{}{}",
                identification,
                phase.as_str().to_lowercase(),
                time,
                revision,
                image_stream_failure
            ),
        }
    }
}

/// Join non-empty words with single spaces
fn join_words(parts: &[String]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

fn container_images(spec: &PodSpec) -> String {
    spec.containers
        .iter()
        .map(|c| c.image.as_deref().unwrap_or_default())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `(admitted at the requested host, other admitted hosts, rejection reasons)`
fn extract_route_info(route: &Route) -> (bool, Vec<String>, Vec<String>) {
    let mut requested = false;
    let mut other = Vec::new();
    let mut reasons = BTreeSet::new();
    for ingress in &route.status.ingress {
        match ingress.admitted() {
            Some(condition) if condition.status == "False" => {
                reasons.insert(condition.reason.clone());
            }
            _ if ingress.host == route.spec.host => requested = true,
            _ => other.push(ingress.host.clone()),
        }
    }
    (requested, other, reasons.into_iter().collect())
}

fn describe_route_exposed(host: &str, route: &Route, errors: bool) -> String {
    let trailer = if errors { " (!)" } else { "" };
    let prefix = match route.spec.tls.as_ref() {
        None => format!("http://{}", host),
        Some(tls) if tls.termination == TLS_TERMINATION_PASSTHROUGH => {
            format!("https://{} (passthrough)", host)
        }
        Some(tls) if tls.termination == TLS_TERMINATION_REENCRYPT => {
            format!("https://{} (reencrypt)", host)
        }
        Some(tls) if tls.termination != TLS_TERMINATION_EDGE => format!("https://{}", host),
        Some(tls) if tls.insecure_edge_termination_policy == "Redirect" => {
            format!("https://{} (redirects)", host)
        }
        Some(tls) if tls.insecure_edge_termination_policy == "Allow" => {
            format!("https://{} (and http)", host)
        }
        Some(_) => format!("https://{}", host),
    };

    let port = route
        .spec
        .port
        .as_ref()
        .and_then(|p| p.target_port.as_ref())
        .map(|target| match target {
            IntOrString::Int(n) => n.to_string(),
            IntOrString::String(s) => s.clone(),
        })
        .filter(|p| !p.is_empty());
    match port {
        Some(port) => format!("{} to pod port {}{}", prefix, port, trailer),
        None => format!("{}{}", prefix, trailer),
    }
}

fn describe_deployment_config_trigger(dc: &DeploymentConfig) -> &'static str {
    if dc.spec.triggers.is_empty() {
        "(manual)"
    } else {
        ""
    }
}

/// How a new deployment would start, and whether it starts automatically
fn describe_deployment_config_triggers(dc: &DeploymentConfig) -> (&'static str, bool) {
    let has_config = dc.spec.triggers.iter().any(|t| t.type_ == TRIGGER_CONFIG_CHANGE);
    let has_image = dc.spec.triggers.iter().any(|t| t.type_ == TRIGGER_IMAGE_CHANGE);
    match (has_config, has_image) {
        (true, true) => ("on image or update", true),
        (true, false) => ("on update", true),
        (false, true) => ("on image", true),
        (false, false) => ("for manual", false),
    }
}

fn describe_source_in_pipeline(source: &BuildSource) -> Option<String> {
    if let Some(git) = &source.git {
        if git.ref_.is_empty() {
            return Some(git.uri.clone());
        }
        return Some(format!("{}#{}", git.uri, git.ref_));
    }
    source.dockerfile.as_ref().map(|_| "Dockerfile".to_string())
}

fn describe_build_in_pipeline(bc: &BuildConfig, base_image: Option<&str>) -> String {
    let name = bc.metadata.name.as_deref().unwrap_or_default();
    let strategy = &bc.spec.strategy;
    let source = describe_source_in_pipeline(&bc.spec.source);

    if strategy.docker_strategy.is_some() {
        match source {
            Some(source) => format!("bc/{} docker build of {}", name, source),
            None => format!("bc/{} unconfigured docker build - no source set", name),
        }
    } else if strategy.source_strategy.is_some() {
        match (source, base_image) {
            (None, _) => format!("bc/{} unconfigured source build", name),
            (Some(source), None) => format!("bc/{} {}; no image set", name, source),
            (Some(source), Some(base)) => format!("bc/{} builds {} with {}", name, source, base),
        }
    } else if strategy.custom_strategy.is_some() {
        match source {
            Some(source) => format!("bc/{} custom build of {}", name, source),
            None => format!("bc/{} custom build ", name),
        }
    } else {
        format!("bc/{} unrecognized build", name)
    }
}

/// `abcdef1: message (Author <mail>)`
fn describe_source_revision(revision: Option<&SourceRevision>) -> Option<String> {
    let git = revision?.git.as_ref()?;
    let author = describe_source_control_user(&git.author)
        .or_else(|| describe_source_control_user(&git.committer))
        .map(|a| format!(" ({})", a))
        .unwrap_or_default();
    let commit: String = git.commit.chars().take(7).collect();
    Some(format!("{}: {}{}", commit, git.message, author))
}

fn describe_source_control_user(user: &SourceControlUser) -> Option<String> {
    match (user.name.is_empty(), user.email.is_empty()) {
        (true, true) => None,
        (true, false) => Some(user.email.clone()),
        (false, true) => Some(user.name.clone()),
        (false, false) => Some(format!("{} <{}>", user.name, user.email)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route(value: serde_json::Value) -> Route {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_describe_route_exposed() {
        let plain = route(json!({"spec": {"host": "a.com"}}));
        assert_eq!(describe_route_exposed("a.com", &plain, false), "http://a.com");

        let redirect = route(json!({"spec": {"host": "a.com", "tls": {
            "termination": "edge", "insecureEdgeTerminationPolicy": "Redirect"
        }}}));
        assert_eq!(
            describe_route_exposed("a.com", &redirect, false),
            "https://a.com (redirects)"
        );

        let allow = route(json!({"spec": {"host": "a.com", "tls": {
            "termination": "edge", "insecureEdgeTerminationPolicy": "Allow"
        }}}));
        assert_eq!(describe_route_exposed("a.com", &allow, false), "https://a.com (and http)");

        let passthrough = route(json!({"spec": {"host": "a.com",
            "port": {"targetPort": "https"},
            "tls": {"termination": "passthrough"}}}));
        assert_eq!(
            describe_route_exposed("a.com", &passthrough, true),
            "https://a.com (passthrough) to pod port https (!)"
        );
    }

    #[test]
    fn test_extract_route_info() {
        let r = route(json!({
            "spec": {"host": "a.com"},
            "status": {"ingress": [
                {"host": "a.com", "conditions": [{"type": "Admitted", "status": "True"}]},
                {"host": "b.com", "conditions": [{"type": "Admitted", "status": "True"}]},
                {"host": "a.com", "conditions": [
                    {"type": "Admitted", "status": "False", "reason": "HostAlreadyClaimed"}
                ]}
            ]}
        }));
        let (requested, other, errors) = extract_route_info(&r);
        assert!(requested);
        assert_eq!(other, vec!["b.com"]);
        assert_eq!(errors, vec!["HostAlreadyClaimed"]);
    }

    #[test]
    fn test_describe_build_in_pipeline() {
        let bc: BuildConfig = serde_json::from_value(json!({
            "metadata": {"name": "web"},
            "spec": {
                "source": {"git": {"uri": "https://github.com/org/web", "ref": "main"}},
                "strategy": {"sourceStrategy": {}}
            }
        }))
        .unwrap();
        assert_eq!(
            describe_build_in_pipeline(&bc, Some("openshift/ruby:2.7")),
            "bc/web builds https://github.com/org/web#main with openshift/ruby:2.7"
        );
        assert_eq!(
            describe_build_in_pipeline(&bc, None),
            "bc/web https://github.com/org/web#main; no image set"
        );

        let docker: BuildConfig = serde_json::from_value(json!({
            "metadata": {"name": "api"},
            "spec": {"source": {"dockerfile": "FROM scratch"}, "strategy": {"dockerStrategy": {}}}
        }))
        .unwrap();
        assert_eq!(
            describe_build_in_pipeline(&docker, None),
            "bc/api docker build of Dockerfile"
        );

        let empty: BuildConfig =
            serde_json::from_value(json!({"metadata": {"name": "x"}})).unwrap();
        assert_eq!(describe_build_in_pipeline(&empty, None), "bc/x unrecognized build");
    }

    #[test]
    fn test_describe_source_revision() {
        let revision: SourceRevision = serde_json::from_value(json!({"git": {
            "commit": "0123456789abcdef",
            "message": "Fix login",
            "author": {"name": "Jo", "email": "jo@example.com"}
        }}))
        .unwrap();
        assert_eq!(
            describe_source_revision(Some(&revision)).as_deref(),
            Some("0123456: Fix login (Jo <jo@example.com>)")
        );

        let committer_only: SourceRevision = serde_json::from_value(json!({"git": {
            "commit": "abc", "message": "m", "committer": {"email": "ci@example.com"}
        }}))
        .unwrap();
        assert_eq!(
            describe_source_revision(Some(&committer_only)).as_deref(),
            Some("abc: m (ci@example.com)")
        );
        assert_eq!(describe_source_revision(None), None);
    }

    #[test]
    fn test_deployment_config_triggers() {
        let dc: DeploymentConfig = serde_json::from_value(json!({
            "spec": {"triggers": [{"type": "ConfigChange"}, {"type": "ImageChange"}]}
        }))
        .unwrap();
        assert_eq!(describe_deployment_config_triggers(&dc), ("on image or update", true));
        assert_eq!(describe_deployment_config_trigger(&dc), "");

        let manual = DeploymentConfig::default();
        assert_eq!(describe_deployment_config_triggers(&manual), ("for manual", false));
        assert_eq!(describe_deployment_config_trigger(&manual), "(manual)");
    }
}
