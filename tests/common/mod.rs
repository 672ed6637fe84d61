//! Shared fixtures for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use kstatus::graph::ResourceGraph;
use kstatus::loader::{ListError, LoadOutcome, ResourceLister, make_graph};
use kstatus::models::{ResourceKind, ResourceObject};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const NS: &str = "example";

/// How a fake list call fails
#[derive(Debug, Clone)]
pub enum Failure {
    Forbidden,
    NotFound,
    Failed(String),
}

/// In-memory lister returning canned objects per kind
#[derive(Default)]
pub struct FakeLister {
    items: HashMap<ResourceKind, Vec<ResourceObject>>,
    failures: HashMap<ResourceKind, Failure>,
    pub calls: Mutex<Vec<(Option<String>, ResourceKind)>>,
}

impl FakeLister {
    pub fn with_manifests(manifests: Vec<Value>) -> Self {
        let mut lister = Self::default();
        for manifest in manifests {
            let object = ResourceObject::from_manifest(manifest).unwrap();
            lister.items.entry(object.kind()).or_default().push(object);
        }
        lister
    }

    pub fn failing(mut self, kind: ResourceKind, failure: Failure) -> Self {
        self.failures.insert(kind, failure);
        self
    }
}

#[async_trait]
impl ResourceLister for FakeLister {
    async fn list(
        &self,
        namespace: Option<String>,
        kind: ResourceKind,
    ) -> Result<Vec<ResourceObject>, ListError> {
        self.calls.lock().unwrap().push((namespace, kind));
        match self.failures.get(&kind) {
            Some(Failure::Forbidden) => Err(ListError::Forbidden(kind)),
            Some(Failure::NotFound) => Err(ListError::NotFound(kind)),
            Some(Failure::Failed(message)) => Err(ListError::Failed {
                kind,
                source: anyhow::anyhow!(message.clone()),
            }),
            None => Ok(self.items.get(&kind).cloned().unwrap_or_default()),
        }
    }
}

pub async fn load(manifests: Vec<Value>) -> LoadOutcome {
    make_graph(Arc::new(FakeLister::with_manifests(manifests)), Some(NS))
        .await
        .unwrap()
}

pub async fn load_graph(manifests: Vec<Value>) -> ResourceGraph {
    load(manifests).await.graph
}

pub fn service(name: &str, selector: Value) -> Value {
    json!({
        "kind": "Service",
        "metadata": {"name": name, "namespace": NS},
        "spec": {
            "selector": selector,
            "clusterIP": "172.30.0.10",
            "ports": [{"port": 80, "targetPort": 8080}]
        }
    })
}

pub fn pod(name: &str, labels: Value, image: &str) -> Value {
    json!({
        "kind": "Pod",
        "metadata": {"name": name, "namespace": NS, "labels": labels},
        "spec": {"containers": [{"name": "main", "image": image}]},
        "status": {"phase": "Running"}
    })
}

pub fn deployment_config(name: &str, labels: Value, image: &str, latest_version: i64) -> Value {
    json!({
        "kind": "DeploymentConfig",
        "metadata": {"name": name, "namespace": NS},
        "spec": {
            "replicas": 1,
            "selector": labels,
            "triggers": [{"type": "ConfigChange"}],
            "template": {
                "metadata": {"labels": labels},
                "spec": {"containers": [{"name": "main", "image": image}]}
            }
        },
        "status": {"latestVersion": latest_version}
    })
}

/// Controller for deployment `version` of `dc`
pub fn deployment(dc: &str, version: i64, phase: &str, created: &str, labels: Value) -> Value {
    let name = format!("{}-{}", dc, version);
    let mut template_labels = labels;
    template_labels["deployment"] = json!(name);
    json!({
        "kind": "ReplicationController",
        "metadata": {
            "name": name,
            "namespace": NS,
            "creationTimestamp": created,
            "annotations": {
                "openshift.io/deployment-config.name": dc,
                "openshift.io/deployment-config.latest-version": version.to_string(),
                "openshift.io/deployment.phase": phase
            }
        },
        "spec": {
            "replicas": 1,
            "selector": {"deployment": name},
            "template": {
                "metadata": {"labels": template_labels},
                "spec": {"containers": [{"name": "main", "image": "unused"}]}
            }
        },
        "status": {"replicas": 1}
    })
}

pub fn route(name: &str, service: &str, host: &str, admitted: bool) -> Value {
    let (status, reason) = if admitted {
        ("True", "")
    } else {
        ("False", "HostAlreadyClaimed")
    };
    json!({
        "kind": "Route",
        "metadata": {"name": name, "namespace": NS},
        "spec": {"host": host, "to": {"kind": "Service", "name": service}},
        "status": {"ingress": [{
            "host": host,
            "routerName": "default",
            "conditions": [{
                "type": "Admitted",
                "status": status,
                "reason": reason
            }]
        }]}
    })
}

pub fn image_stream(name: &str, tags: &[&str]) -> Value {
    let status_tags: Vec<Value> = tags
        .iter()
        .map(|tag| {
            json!({"tag": tag, "items": [{
                "dockerImageReference": format!("172.30.1.1:5000/{}/{}@sha256:abc", NS, name)
            }]})
        })
        .collect();
    json!({
        "kind": "ImageStream",
        "metadata": {"name": name, "namespace": NS},
        "status": {
            "dockerImageRepository": format!("172.30.1.1:5000/{}/{}", NS, name),
            "tags": status_tags
        }
    })
}

pub fn build_config(name: &str, output_tag: &str) -> Value {
    json!({
        "kind": "BuildConfig",
        "metadata": {"name": name, "namespace": NS},
        "spec": {
            "source": {"git": {"uri": format!("https://github.com/org/{}", name)}},
            "strategy": {"dockerStrategy": {}},
            "output": {"to": {"kind": "ImageStreamTag", "name": output_tag}}
        }
    })
}

pub fn build(bc: &str, number: u32, phase: &str, created: &str) -> Value {
    json!({
        "kind": "Build",
        "metadata": {
            "name": format!("{}-{}", bc, number),
            "namespace": NS,
            "creationTimestamp": created,
            "labels": {"openshift.io/build-config.name": bc}
        },
        "spec": {"output": {"to": {"kind": "ImageStreamTag", "name": format!("{}:latest", bc)}}},
        "status": {"phase": phase, "completionTimestamp": created}
    })
}

/// Build config running a source build on `input_tag` and pushing to `output_tag`
pub fn source_build_config(name: &str, input_tag: &str, output_tag: &str) -> Value {
    json!({
        "kind": "BuildConfig",
        "metadata": {"name": name, "namespace": NS},
        "spec": {
            "source": {"git": {"uri": format!("https://github.com/org/{}", name)}},
            "strategy": {"sourceStrategy": {"from": {"kind": "ImageStreamTag", "name": input_tag}}},
            "output": {"to": {"kind": "ImageStreamTag", "name": output_tag}}
        }
    })
}

/// Add an automatic image change trigger on `tag` for the `main` container
pub fn with_image_trigger(mut dc: Value, tag: &str) -> Value {
    if let Some(triggers) = dc["spec"]["triggers"].as_array_mut() {
        triggers.push(json!({
            "type": "ImageChange",
            "imageChangeParams": {
                "automatic": true,
                "containerNames": ["main"],
                "from": {"kind": "ImageStreamTag", "name": tag}
            }
        }));
    }
    dc
}
