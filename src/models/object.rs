//! Typed payloads carried by graph nodes

use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{Pod, ReplicationController, Secret, Service, ServiceAccount};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use serde_json::{Value, from_value};

use super::ResourceKind;
use super::openshift::{Build, BuildConfig, DeploymentConfig, ImageStream, ImageStreamTag, Route};

/// A single listed resource, tagged by kind
#[derive(Debug, Clone)]
pub enum ResourceObject {
    Service(Service),
    ServiceAccount(ServiceAccount),
    Secret(Secret),
    ReplicationController(ReplicationController),
    Pod(Pod),
    BuildConfig(BuildConfig),
    Build(Build),
    ImageStream(ImageStream),
    ImageStreamTag(ImageStreamTag),
    DeploymentConfig(DeploymentConfig),
    Route(Route),
}

macro_rules! accessor {
    ($fn_name:ident, $variant:ident, $ty:ty) => {
        pub fn $fn_name(&self) -> Option<&$ty> {
            match self {
                ResourceObject::$variant(inner) => Some(inner),
                _ => None,
            }
        }
    };
}

impl ResourceObject {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceObject::Service(_) => ResourceKind::Service,
            ResourceObject::ServiceAccount(_) => ResourceKind::ServiceAccount,
            ResourceObject::Secret(_) => ResourceKind::Secret,
            ResourceObject::ReplicationController(_) => ResourceKind::ReplicationController,
            ResourceObject::Pod(_) => ResourceKind::Pod,
            ResourceObject::BuildConfig(_) => ResourceKind::BuildConfig,
            ResourceObject::Build(_) => ResourceKind::Build,
            ResourceObject::ImageStream(_) => ResourceKind::ImageStream,
            ResourceObject::ImageStreamTag(_) => ResourceKind::ImageStreamTag,
            ResourceObject::DeploymentConfig(_) => ResourceKind::DeploymentConfig,
            ResourceObject::Route(_) => ResourceKind::Route,
        }
    }

    pub fn meta(&self) -> &ObjectMeta {
        match self {
            ResourceObject::Service(o) => &o.metadata,
            ResourceObject::ServiceAccount(o) => &o.metadata,
            ResourceObject::Secret(o) => &o.metadata,
            ResourceObject::ReplicationController(o) => &o.metadata,
            ResourceObject::Pod(o) => &o.metadata,
            ResourceObject::BuildConfig(o) => &o.metadata,
            ResourceObject::Build(o) => &o.metadata,
            ResourceObject::ImageStream(o) => &o.metadata,
            ResourceObject::ImageStreamTag(o) => &o.metadata,
            ResourceObject::DeploymentConfig(o) => &o.metadata,
            ResourceObject::Route(o) => &o.metadata,
        }
    }

    pub fn name(&self) -> &str {
        self.meta().name.as_deref().unwrap_or_default()
    }

    pub fn namespace(&self) -> &str {
        self.meta().namespace.as_deref().unwrap_or_default()
    }

    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        creation_time(self.meta())
    }

    /// Decode an API payload of a known kind
    pub fn from_value(kind: ResourceKind, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            ResourceKind::Service => ResourceObject::Service(from_value(value)?),
            ResourceKind::ServiceAccount => ResourceObject::ServiceAccount(from_value(value)?),
            ResourceKind::Secret => ResourceObject::Secret(from_value(value)?),
            ResourceKind::ReplicationController => {
                ResourceObject::ReplicationController(from_value(value)?)
            }
            ResourceKind::Pod => ResourceObject::Pod(from_value(value)?),
            ResourceKind::BuildConfig => ResourceObject::BuildConfig(from_value(value)?),
            ResourceKind::Build => ResourceObject::Build(from_value(value)?),
            ResourceKind::ImageStream => ResourceObject::ImageStream(from_value(value)?),
            ResourceKind::DeploymentConfig => ResourceObject::DeploymentConfig(from_value(value)?),
            ResourceKind::Route => ResourceObject::Route(from_value(value)?),
            ResourceKind::ImageStreamTag => {
                return Err(serde::de::Error::custom(
                    "image stream tags are derived from image streams",
                ));
            }
        })
    }

    /// Decode a manifest, taking the kind from its `kind` field
    pub fn from_manifest(value: Value) -> Result<Self, serde_json::Error> {
        let kind: ResourceKind = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or_else(|| <serde_json::Error as serde::de::Error>::missing_field("kind"))?
            .parse()
            .map_err(<serde_json::Error as serde::de::Error>::custom)?;
        Self::from_value(kind, value)
    }

    accessor!(as_service, Service, Service);
    accessor!(as_service_account, ServiceAccount, ServiceAccount);
    accessor!(as_secret, Secret, Secret);
    accessor!(as_replication_controller, ReplicationController, ReplicationController);
    accessor!(as_pod, Pod, Pod);
    accessor!(as_build_config, BuildConfig, BuildConfig);
    accessor!(as_build, Build, Build);
    accessor!(as_image_stream, ImageStream, ImageStream);
    accessor!(as_image_stream_tag, ImageStreamTag, ImageStreamTag);
    accessor!(as_deployment_config, DeploymentConfig, DeploymentConfig);
    accessor!(as_route, Route, Route);
}

/// Convert an API timestamp into a chrono UTC time
///
/// Goes through the wire form so it does not depend on which date library
/// backs `Time`.
pub fn to_utc(time: &Time) -> Option<DateTime<Utc>> {
    let value = serde_json::to_value(time).ok()?;
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub fn creation_time(meta: &ObjectMeta) -> Option<DateTime<Utc>> {
    meta.creation_timestamp.as_ref().and_then(to_utc)
}
