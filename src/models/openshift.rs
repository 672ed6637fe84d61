//! OpenShift API payloads
//!
//! Only the fields the status report reads are modelled. Every field is
//! defaulted so partially populated objects from older API servers still
//! decode.

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{ObjectReference, PodTemplateSpec, ReplicationController};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Annotation on a replication controller naming its deployment config
pub const DEPLOYMENT_CONFIG_ANNOTATION: &str = "openshift.io/deployment-config.name";
/// Annotation on a replication controller holding its deployment version
pub const DEPLOYMENT_VERSION_ANNOTATION: &str = "openshift.io/deployment-config.latest-version";
/// Annotation on a replication controller holding the deployment phase
pub const DEPLOYMENT_PHASE_ANNOTATION: &str = "openshift.io/deployment.phase";
/// Annotation on a replication controller explaining a failed deployment
pub const DEPLOYMENT_STATUS_REASON_ANNOTATION: &str = "openshift.io/deployment.status-reason";
/// Label present on deployer helper pods
pub const DEPLOYER_POD_LABEL: &str = "openshift.io/deployer-pod-for.name";
/// Annotation present on builder helper pods
pub const BUILD_ANNOTATION: &str = "openshift.io/build.name";
/// Label/annotation on a build naming its build config
pub const BUILD_CONFIG_LABEL: &str = "openshift.io/build-config.name";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: BuildConfigSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfigSpec {
    #[serde(default)]
    pub triggers: Vec<BuildTriggerPolicy>,
    #[serde(default)]
    pub source: BuildSource,
    #[serde(default)]
    pub strategy: BuildStrategy,
    #[serde(default)]
    pub output: BuildOutput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildTriggerPolicy {
    #[serde(rename = "type", default)]
    pub type_: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSource {
    #[serde(default)]
    pub git: Option<GitBuildSource>,
    #[serde(default)]
    pub dockerfile: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitBuildSource {
    #[serde(default)]
    pub uri: String,
    #[serde(rename = "ref", default)]
    pub ref_: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStrategy {
    #[serde(default)]
    pub docker_strategy: Option<StrategyOptions>,
    #[serde(default)]
    pub source_strategy: Option<StrategyOptions>,
    #[serde(default)]
    pub custom_strategy: Option<StrategyOptions>,
}

impl BuildStrategy {
    /// The base image reference of whichever strategy is configured
    pub fn from_reference(&self) -> Option<&ObjectReference> {
        self.docker_strategy
            .as_ref()
            .or(self.source_strategy.as_ref())
            .or(self.custom_strategy.as_ref())
            .and_then(|options| options.from.as_ref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyOptions {
    #[serde(default)]
    pub from: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOutput {
    #[serde(default)]
    pub to: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: BuildSpec,
    #[serde(default)]
    pub status: BuildStatus,
}

impl Build {
    /// Name of the owning build config, from status, label or annotation
    pub fn config_name(&self) -> Option<&str> {
        if let Some(name) = self.status.config.as_ref().and_then(|c| c.name.as_deref()) {
            return Some(name);
        }
        self.metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(BUILD_CONFIG_LABEL))
            .or_else(|| {
                self.metadata
                    .annotations
                    .as_ref()
                    .and_then(|annotations| annotations.get(BUILD_CONFIG_LABEL))
            })
            .map(String::as_str)
    }

    /// Completion, then start, then creation time
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.status
            .completion_timestamp
            .or(self.status.start_timestamp)
            .or_else(|| super::creation_time(&self.metadata))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSpec {
    #[serde(default)]
    pub source: BuildSource,
    #[serde(default)]
    pub strategy: BuildStrategy,
    #[serde(default)]
    pub output: BuildOutput,
    #[serde(default)]
    pub revision: Option<SourceRevision>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildStatus {
    #[serde(default)]
    pub phase: BuildPhase,
    #[serde(default)]
    pub start_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completion_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub config: Option<ObjectReference>,
}

/// Lifecycle phase of a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildPhase {
    #[default]
    New,
    Pending,
    Running,
    Complete,
    Failed,
    Error,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl BuildPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildPhase::New => "New",
            BuildPhase::Pending => "Pending",
            BuildPhase::Running => "Running",
            BuildPhase::Complete => "Complete",
            BuildPhase::Failed => "Failed",
            BuildPhase::Error => "Error",
            BuildPhase::Cancelled => "Cancelled",
            BuildPhase::Unknown => "Unknown",
        }
    }

    /// Failed, errored and cancelled builds
    pub fn is_unsuccessful(&self) -> bool {
        matches!(
            self,
            BuildPhase::Failed | BuildPhase::Error | BuildPhase::Cancelled
        )
    }
}

impl fmt::Display for BuildPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceRevision {
    #[serde(default)]
    pub git: Option<GitSourceRevision>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitSourceRevision {
    #[serde(default)]
    pub commit: String,
    #[serde(default)]
    pub author: SourceControlUser,
    #[serde(default)]
    pub committer: SourceControlUser,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceControlUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStream {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ImageStreamSpec,
    #[serde(default)]
    pub status: ImageStreamStatus,
}

impl ImageStream {
    /// Tag names from spec and status, deduplicated, in first-seen order
    pub fn tag_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let spec_tags = self.spec.tags.iter().map(|t| t.name.as_str());
        let status_tags = self.status.tags.iter().map(|t| t.tag.as_str());
        for name in spec_tags.chain(status_tags) {
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Most recent pushed image reference for a tag
    pub fn latest_image_for(&self, tag: &str) -> Option<&str> {
        self.status
            .tags
            .iter()
            .find(|t| t.tag == tag)
            .and_then(|t| t.items.first())
            .map(|event| event.docker_image_reference.as_str())
            .filter(|reference| !reference.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamSpec {
    #[serde(default)]
    pub tags: Vec<TagReference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagReference {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub from: Option<ObjectReference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageStreamStatus {
    #[serde(default)]
    pub docker_image_repository: String,
    #[serde(default)]
    pub tags: Vec<NamedTagEventList>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedTagEventList {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub items: Vec<TagEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEvent {
    #[serde(default)]
    pub docker_image_reference: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// A single tag of an image stream
///
/// Tags listed by a committed stream are `found`. Tags that something
/// references but no stream lists are placeholders with `found` unset.
#[derive(Debug, Clone, Default)]
pub struct ImageStreamTag {
    /// Name is `<stream>:<tag>`
    pub metadata: ObjectMeta,
    pub image_stream: String,
    pub tag: String,
    pub docker_image_reference: Option<String>,
    pub found: bool,
}

impl ImageStreamTag {
    pub fn from_stream(stream: &ImageStream, tag: &str) -> Self {
        let image_stream = stream.metadata.name.clone().unwrap_or_default();
        let namespace = stream.metadata.namespace.clone().unwrap_or_default();
        Self {
            docker_image_reference: stream.latest_image_for(tag).map(str::to_string),
            found: true,
            ..Self::placeholder(&namespace, &image_stream, tag)
        }
    }

    /// A tag referenced by a build or deployment that no listed stream carries
    pub fn placeholder(namespace: &str, image_stream: &str, tag: &str) -> Self {
        Self {
            metadata: ObjectMeta {
                name: Some(format!("{}:{}", image_stream, tag)),
                namespace: Some(namespace.to_string()).filter(|ns| !ns.is_empty()),
                ..Default::default()
            },
            image_stream: image_stream.to_string(),
            tag: tag.to_string(),
            docker_image_reference: None,
            found: false,
        }
    }

    /// `<namespace>/<stream>:<tag>`
    pub fn image_spec(&self) -> String {
        let name = format!("{}:{}", self.image_stream, self.tag);
        match self.metadata.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{}/{}", ns, name),
            _ => name,
        }
    }
}

/// Render an image reference (`from`/`to` fields) the way a pull spec reads
pub fn image_reference_spec(reference: &ObjectReference, default_namespace: &str) -> String {
    let name = reference.name.clone().unwrap_or_default();
    match reference.kind.as_deref() {
        Some("ImageStreamTag") | Some("ImageStreamImage") => {
            let ns = reference
                .namespace
                .as_deref()
                .filter(|ns| !ns.is_empty())
                .unwrap_or(default_namespace);
            if ns.is_empty() {
                name
            } else {
                format!("{}/{}", ns, name)
            }
        }
        _ => name,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfig {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: DeploymentConfigSpec,
    #[serde(default)]
    pub status: DeploymentConfigStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigSpec {
    #[serde(default)]
    pub replicas: i32,
    #[serde(default)]
    pub test: bool,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default)]
    pub triggers: Vec<DeploymentTriggerPolicy>,
    #[serde(default)]
    pub template: Option<PodTemplateSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerPolicy {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub image_change_params: Option<DeploymentTriggerImageChangeParams>,
}

pub const TRIGGER_CONFIG_CHANGE: &str = "ConfigChange";
pub const TRIGGER_IMAGE_CHANGE: &str = "ImageChange";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentTriggerImageChangeParams {
    #[serde(default)]
    pub automatic: bool,
    #[serde(default)]
    pub container_names: Vec<String>,
    #[serde(default)]
    pub from: ObjectReference,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentConfigStatus {
    #[serde(default)]
    pub latest_version: i64,
}

/// Phase of a single deployment, recorded on its replication controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentStatus {
    New,
    Pending,
    Running,
    Complete,
    Failed,
    Unknown,
}

impl DeploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::New => "New",
            DeploymentStatus::Pending => "Pending",
            DeploymentStatus::Running => "Running",
            DeploymentStatus::Complete => "Complete",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Unknown => "",
        }
    }
}

fn rc_annotation<'a>(rc: &'a ReplicationController, key: &str) -> Option<&'a str> {
    rc.metadata
        .annotations
        .as_ref()
        .and_then(|annotations| annotations.get(key))
        .map(String::as_str)
}

/// Deployment config that produced this controller, if any
pub fn deployment_config_name(rc: &ReplicationController) -> Option<&str> {
    rc_annotation(rc, DEPLOYMENT_CONFIG_ANNOTATION)
}

pub fn deployment_version_for(rc: &ReplicationController) -> i64 {
    rc_annotation(rc, DEPLOYMENT_VERSION_ANNOTATION)
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

pub fn deployment_status_for(rc: &ReplicationController) -> DeploymentStatus {
    match rc_annotation(rc, DEPLOYMENT_PHASE_ANNOTATION) {
        Some("New") => DeploymentStatus::New,
        Some("Pending") => DeploymentStatus::Pending,
        Some("Running") => DeploymentStatus::Running,
        Some("Complete") => DeploymentStatus::Complete,
        Some("Failed") => DeploymentStatus::Failed,
        _ => DeploymentStatus::Unknown,
    }
}

pub fn deployment_status_reason_for(rc: &ReplicationController) -> Option<&str> {
    rc_annotation(rc, DEPLOYMENT_STATUS_REASON_ANNOTATION).filter(|r| !r.is_empty())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RouteSpec,
    #[serde(default)]
    pub status: RouteStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSpec {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub to: RouteTargetReference,
    #[serde(default)]
    pub port: Option<RoutePort>,
    #[serde(default)]
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTargetReference {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePort {
    #[serde(default)]
    pub target_port: Option<IntOrString>,
}

pub const TLS_TERMINATION_EDGE: &str = "edge";
pub const TLS_TERMINATION_PASSTHROUGH: &str = "passthrough";
pub const TLS_TERMINATION_REENCRYPT: &str = "reencrypt";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TlsConfig {
    #[serde(default)]
    pub termination: String,
    #[serde(default)]
    pub insecure_edge_termination_policy: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStatus {
    #[serde(default)]
    pub ingress: Vec<RouteIngress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIngress {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub router_name: String,
    #[serde(default)]
    pub conditions: Vec<RouteIngressCondition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteIngressCondition {
    #[serde(rename = "type", default)]
    pub type_: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: String,
}

impl RouteIngress {
    /// The `Admitted` condition, if the router reported one
    pub fn admitted(&self) -> Option<&RouteIngressCondition> {
        self.conditions.iter().find(|c| c.type_ == "Admitted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_decodes_with_missing_fields() {
        let build: Build = serde_json::from_value(json!({
            "metadata": {"name": "app-3", "namespace": "ns"},
            "status": {"phase": "Complete", "completionTimestamp": "2024-01-01T10:00:00Z"}
        }))
        .unwrap();
        assert_eq!(build.status.phase, BuildPhase::Complete);
        assert!(build.spec.revision.is_none());
        assert_eq!(
            build.timestamp().map(|t| t.to_rfc3339()),
            Some("2024-01-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_unknown_build_phase() {
        let build: Build =
            serde_json::from_value(json!({"status": {"phase": "Paused"}})).unwrap();
        assert_eq!(build.status.phase, BuildPhase::Unknown);
        assert!(!build.status.phase.is_unsuccessful());
    }

    #[test]
    fn test_build_config_name_falls_back_to_label() {
        let build: Build = serde_json::from_value(json!({
            "metadata": {"name": "app-1", "labels": {BUILD_CONFIG_LABEL: "app"}}
        }))
        .unwrap();
        assert_eq!(build.config_name(), Some("app"));

        let build: Build = serde_json::from_value(json!({
            "metadata": {"name": "app-1", "labels": {BUILD_CONFIG_LABEL: "app"}},
            "status": {"config": {"name": "other"}}
        }))
        .unwrap();
        assert_eq!(build.config_name(), Some("other"));
    }

    #[test]
    fn test_image_stream_tags() {
        let stream: ImageStream = serde_json::from_value(json!({
            "metadata": {"name": "web", "namespace": "ns"},
            "spec": {"tags": [{"name": "latest"}]},
            "status": {
                "dockerImageRepository": "registry/ns/web",
                "tags": [
                    {"tag": "latest", "items": [{"dockerImageReference": "registry/ns/web@sha256:1"}]},
                    {"tag": "v1", "items": []}
                ]
            }
        }))
        .unwrap();
        assert_eq!(stream.tag_names(), vec!["latest", "v1"]);
        assert_eq!(
            stream.latest_image_for("latest"),
            Some("registry/ns/web@sha256:1")
        );
        assert_eq!(stream.latest_image_for("v1"), None);

        let tag = ImageStreamTag::from_stream(&stream, "latest");
        assert_eq!(tag.metadata.name.as_deref(), Some("web:latest"));
        assert_eq!(tag.image_spec(), "ns/web:latest");
        assert!(tag.found);

        let missing = ImageStreamTag::placeholder("ns", "web", "v2");
        assert_eq!(missing.metadata.name.as_deref(), Some("web:v2"));
        assert_eq!(missing.image_spec(), "ns/web:v2");
        assert_eq!(missing.docker_image_reference, None);
        assert!(!missing.found);
    }

    #[test]
    fn test_image_reference_spec() {
        let istag = ObjectReference {
            kind: Some("ImageStreamTag".into()),
            name: Some("web:latest".into()),
            ..Default::default()
        };
        assert_eq!(image_reference_spec(&istag, "ns"), "ns/web:latest");

        let docker = ObjectReference {
            kind: Some("DockerImage".into()),
            name: Some("nginx:1.25".into()),
            ..Default::default()
        };
        assert_eq!(image_reference_spec(&docker, "ns"), "nginx:1.25");
    }

    #[test]
    fn test_deployment_annotations() {
        let mut rc = ReplicationController::default();
        assert_eq!(deployment_status_for(&rc), DeploymentStatus::Unknown);
        assert_eq!(deployment_version_for(&rc), 0);

        rc.metadata.annotations = Some(
            [
                (DEPLOYMENT_CONFIG_ANNOTATION.to_string(), "web".to_string()),
                (DEPLOYMENT_VERSION_ANNOTATION.to_string(), "4".to_string()),
                (DEPLOYMENT_PHASE_ANNOTATION.to_string(), "Failed".to_string()),
                (DEPLOYMENT_STATUS_REASON_ANNOTATION.to_string(), "timeout".to_string()),
            ]
            .into_iter()
            .collect(),
        );
        assert_eq!(deployment_config_name(&rc), Some("web"));
        assert_eq!(deployment_version_for(&rc), 4);
        assert_eq!(deployment_status_for(&rc), DeploymentStatus::Failed);
        assert_eq!(deployment_status_reason_for(&rc), Some("timeout"));
    }

    #[test]
    fn test_route_decodes_tls_and_port() {
        let route: Route = serde_json::from_value(json!({
            "metadata": {"name": "web"},
            "spec": {
                "host": "web.example.com",
                "to": {"kind": "Service", "name": "web"},
                "port": {"targetPort": 8080},
                "tls": {"termination": "edge", "insecureEdgeTerminationPolicy": "Redirect"}
            },
            "status": {"ingress": [{"host": "web.example.com", "conditions": [
                {"type": "Admitted", "status": "True"}
            ]}]}
        }))
        .unwrap();
        assert_eq!(route.spec.to.name, "web");
        assert_eq!(
            route.spec.port.and_then(|p| p.target_port),
            Some(IntOrString::Int(8080))
        );
        let tls = route.spec.tls.unwrap();
        assert_eq!(tls.termination, TLS_TERMINATION_EDGE);
        assert_eq!(tls.insecure_edge_termination_policy, "Redirect");
        assert_eq!(
            route.status.ingress[0].admitted().map(|c| c.status.as_str()),
            Some("True")
        );
    }
}
