//! Node identity and relationship types

use crate::models::{ResourceKind, ResourceObject};
use std::fmt;

/// Stable index of a node inside a [`super::ResourceGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// Identity of a node: `(kind, namespace, name)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: ResourceKind,
    pub namespace: String,
    pub name: String,
}

impl NodeKey {
    pub fn new(kind: ResourceKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn of(object: &ResourceObject) -> Self {
        Self::new(object.kind(), object.namespace(), object.name())
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.short_name(), self.name)?;
        if !self.namespace.is_empty() {
            write!(f, "[{}]", self.namespace)?;
        }
        Ok(())
    }
}

/// A resource in the graph. Immutable once inserted.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub key: NodeKey,
    pub object: ResourceObject,
}

impl Node {
    pub fn kind(&self) -> ResourceKind {
        self.key.kind
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn namespace(&self) -> &str {
        &self.key.namespace
    }
}

/// Type of relationship between two nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EdgeKind {
    /// Service selects a pod, controller template or deployment config template
    Exposes,
    /// Replication controller owns a pod by selector
    Manages,
    /// Pod runs as a service account
    RunsAs,
    /// Pod mounts a secret volume
    MountsSecret,
    /// Build config produced a build
    Builds,
    /// Build config pushes its output to an image stream tag
    PushesTo,
    /// Image stream tag is the base image of a build config
    BuildInput,
    /// Image stream tag triggers a deployment config
    Triggers,
    /// Deployment config produced a replication controller
    Deploys,
    /// Route sends traffic to a service
    Routes,
}

/// Directed, labelled edge between two existing nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
}
