//! Listing resources from the API server

use crate::loader::{ListError, ResourceLister};
use crate::models::{ResourceKind, ResourceObject};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, ReplicationController, Secret, Service, ServiceAccount};
use kube::api::{ApiResource, DynamicObject, GroupVersionKind, ListParams};
use kube::{Api, Client};

/// [`ResourceLister`] backed by a kube-rs client
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// List an OpenShift kind through the dynamic API and decode each item
    async fn list_dynamic(
        &self,
        namespace: Option<&str>,
        kind: ResourceKind,
    ) -> Result<Vec<ResourceObject>, ListError> {
        let gvk = GroupVersionKind::gvk(kind.api_group(), kind.api_version(), kind.as_str());
        let resource = ApiResource::from_gvk_with_plural(&gvk, kind.plural());
        let api: Api<DynamicObject> = match namespace {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, &resource),
            None => Api::all_with(self.client.clone(), &resource),
        };
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| classify_kube_error(kind, e))?;

        let mut items = Vec::with_capacity(list.items.len());
        for object in list.items {
            let name = object.metadata.name.clone().unwrap_or_default();
            let decoded = serde_json::to_value(&object)
                .and_then(|value| ResourceObject::from_value(kind, value));
            match decoded {
                Ok(item) => items.push(item),
                Err(e) => {
                    tracing::warn!(kind = %kind, name = %name, error = %e, "Skipping undecodable item")
                }
            }
        }
        Ok(items)
    }
}

/// Map a kube-rs error onto the loader's failure classes
pub fn classify_kube_error(kind: ResourceKind, error: kube::Error) -> ListError {
    match &error {
        kube::Error::Api(response) if response.code == 403 => ListError::Forbidden(kind),
        kube::Error::Api(response) if response.code == 404 => ListError::NotFound(kind),
        _ => ListError::Failed {
            kind,
            source: anyhow::Error::new(error),
        },
    }
}

#[async_trait]
impl ResourceLister for KubeLister {
    async fn list(
        &self,
        namespace: Option<String>,
        kind: ResourceKind,
    ) -> Result<Vec<ResourceObject>, ListError> {
        let namespace = namespace.as_deref();

        macro_rules! list_typed {
            ($type:ty, $variant:ident) => {{
                let api: Api<$type> = match namespace {
                    Some(ns) => Api::namespaced(self.client.clone(), ns),
                    None => Api::all(self.client.clone()),
                };
                let list = api
                    .list(&ListParams::default())
                    .await
                    .map_err(|e| classify_kube_error(kind, e))?;
                Ok(list.items.into_iter().map(ResourceObject::$variant).collect())
            }};
        }

        match kind {
            ResourceKind::Service => list_typed!(Service, Service),
            ResourceKind::ServiceAccount => list_typed!(ServiceAccount, ServiceAccount),
            ResourceKind::Secret => list_typed!(Secret, Secret),
            ResourceKind::ReplicationController => {
                list_typed!(ReplicationController, ReplicationController)
            }
            ResourceKind::Pod => list_typed!(Pod, Pod),
            ResourceKind::BuildConfig
            | ResourceKind::Build
            | ResourceKind::ImageStream
            | ResourceKind::DeploymentConfig
            | ResourceKind::Route => self.list_dynamic(namespace, kind).await,
            ResourceKind::ImageStreamTag => Err(ListError::Failed {
                kind,
                source: anyhow::anyhow!("image stream tags are derived from image streams"),
            }),
        }
    }
}
