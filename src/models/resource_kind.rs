//! Resource kind definitions
//!
//! Central enum for every resource kind that can appear in the status graph.
//! Kind strings, short display names and API coordinates all live here so the
//! rest of the crate never hardcodes them.

use std::fmt;
use std::str::FromStr;

/// Enumeration of all resource kinds tracked by the status report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    // Core resources
    Service,
    ServiceAccount,
    Secret,
    ReplicationController,
    Pod,
    // Build resources
    BuildConfig,
    Build,
    // Image resources
    ImageStream,
    /// Derived from image streams and image references, never listed directly
    ImageStreamTag,
    // Deployment resources
    DeploymentConfig,
    // Route resources
    Route,
}

impl ResourceKind {
    /// Get the kind name as used by the API server
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Service => "Service",
            ResourceKind::ServiceAccount => "ServiceAccount",
            ResourceKind::Secret => "Secret",
            ResourceKind::ReplicationController => "ReplicationController",
            ResourceKind::Pod => "Pod",
            ResourceKind::BuildConfig => "BuildConfig",
            ResourceKind::Build => "Build",
            ResourceKind::ImageStream => "ImageStream",
            ResourceKind::ImageStreamTag => "ImageStreamTag",
            ResourceKind::DeploymentConfig => "DeploymentConfig",
            ResourceKind::Route => "Route",
        }
    }

    /// Short name used when rendering a node as `<short>/<name>`
    pub fn short_name(&self) -> &'static str {
        match self {
            ResourceKind::Service => "svc",
            ResourceKind::ServiceAccount => "sa",
            ResourceKind::Secret => "secret",
            ResourceKind::ReplicationController => "rc",
            ResourceKind::Pod => "pod",
            ResourceKind::BuildConfig => "bc",
            ResourceKind::Build => "build",
            ResourceKind::ImageStream => "is",
            ResourceKind::ImageStreamTag => "istag",
            ResourceKind::DeploymentConfig => "dc",
            ResourceKind::Route => "route",
        }
    }

    /// Plural resource name used in API paths
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Service => "services",
            ResourceKind::ServiceAccount => "serviceaccounts",
            ResourceKind::Secret => "secrets",
            ResourceKind::ReplicationController => "replicationcontrollers",
            ResourceKind::Pod => "pods",
            ResourceKind::BuildConfig => "buildconfigs",
            ResourceKind::Build => "builds",
            ResourceKind::ImageStream => "imagestreams",
            ResourceKind::ImageStreamTag => "imagestreamtags",
            ResourceKind::DeploymentConfig => "deploymentconfigs",
            ResourceKind::Route => "routes",
        }
    }

    /// API group ("" for the core group)
    pub fn api_group(&self) -> &'static str {
        match self {
            ResourceKind::Service
            | ResourceKind::ServiceAccount
            | ResourceKind::Secret
            | ResourceKind::ReplicationController
            | ResourceKind::Pod => "",
            ResourceKind::BuildConfig | ResourceKind::Build => "build.openshift.io",
            ResourceKind::ImageStream | ResourceKind::ImageStreamTag => "image.openshift.io",
            ResourceKind::DeploymentConfig => "apps.openshift.io",
            ResourceKind::Route => "route.openshift.io",
        }
    }

    /// API version within the group
    pub fn api_version(&self) -> &'static str {
        "v1"
    }

    /// Whether a missing API for this kind is treated as an empty list.
    ///
    /// The build API is optional on some clusters.
    pub fn tolerates_not_found(&self) -> bool {
        matches!(self, ResourceKind::BuildConfig | ResourceKind::Build)
    }

    /// Kinds that are fetched from the API server, in loader order
    pub fn loadable() -> &'static [Self] {
        &[
            ResourceKind::Service,
            ResourceKind::ServiceAccount,
            ResourceKind::Secret,
            ResourceKind::ReplicationController,
            ResourceKind::Pod,
            ResourceKind::BuildConfig,
            ResourceKind::Build,
            ResourceKind::ImageStream,
            ResourceKind::DeploymentConfig,
            ResourceKind::Route,
        ]
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Service" => Ok(ResourceKind::Service),
            "ServiceAccount" => Ok(ResourceKind::ServiceAccount),
            "Secret" => Ok(ResourceKind::Secret),
            "ReplicationController" => Ok(ResourceKind::ReplicationController),
            "Pod" => Ok(ResourceKind::Pod),
            "BuildConfig" => Ok(ResourceKind::BuildConfig),
            "Build" => Ok(ResourceKind::Build),
            "ImageStream" => Ok(ResourceKind::ImageStream),
            "ImageStreamTag" => Ok(ResourceKind::ImageStreamTag),
            "DeploymentConfig" => Ok(ResourceKind::DeploymentConfig),
            "Route" => Ok(ResourceKind::Route),
            _ => Err(format!("Unknown resource kind: {}", s)),
        }
    }
}
