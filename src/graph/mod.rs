//! Relationship graph
//!
//! An arena of nodes addressed by stable integer ids. Nodes are inserted
//! once by the loader; edges are inferred afterwards by [`edges::build_edges`],
//! which adds placeholder image stream tags for unlisted image references.

pub mod edges;
mod node;

pub use node::{Edge, EdgeKind, Node, NodeId, NodeKey};

use crate::models::{ResourceKind, ResourceObject};
use std::collections::{HashMap, HashSet};

/// Directed graph of typed resources and typed relationships
#[derive(Debug, Default)]
pub struct ResourceGraph {
    nodes: Vec<Node>,
    index: HashMap<NodeKey, NodeId>,
    outgoing: Vec<Vec<Edge>>,
    incoming: Vec<Vec<Edge>>,
    edges: HashSet<Edge>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, or return the id of the node already holding its identity
    ///
    /// The payload of an existing node is never replaced.
    pub fn ensure_node(&mut self, object: ResourceObject) -> NodeId {
        let key = NodeKey::of(&object);
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(Node { id, key, object });
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn find(&self, kind: ResourceKind, namespace: &str, name: &str) -> Option<NodeId> {
        self.index
            .get(&NodeKey::new(kind, namespace, name))
            .copied()
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Nodes of one kind, ordered by identity
    pub fn nodes_by_kind(&self, kind: ResourceKind) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.kind() == kind)
            .map(|n| n.id)
            .collect();
        ids.sort_by(|a, b| self.node(*a).key.cmp(&self.node(*b).key));
        ids
    }

    /// Add an edge between two existing nodes
    ///
    /// Returns false if the edge was already present or is a self loop.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) -> bool {
        if from == to || from.0 >= self.nodes.len() || to.0 >= self.nodes.len() {
            return false;
        }
        let edge = Edge { from, to, kind };
        if !self.edges.insert(edge) {
            return false;
        }
        self.outgoing[from.0].push(edge);
        self.incoming[to.0].push(edge);
        true
    }

    pub fn has_edge(&self, from: NodeId, to: NodeId, kind: EdgeKind) -> bool {
        self.edges.contains(&Edge { from, to, kind })
    }

    /// Targets of outgoing edges of one kind, ordered by identity
    pub fn successors(&self, id: NodeId, kind: EdgeKind) -> Vec<NodeId> {
        self.sorted(
            self.outgoing[id.0]
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.to),
        )
    }

    /// Sources of incoming edges of one kind, ordered by identity
    pub fn predecessors(&self, id: NodeId, kind: EdgeKind) -> Vec<NodeId> {
        self.sorted(
            self.incoming[id.0]
                .iter()
                .filter(|e| e.kind == kind)
                .map(|e| e.from),
        )
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn sorted(&self, ids: impl Iterator<Item = NodeId>) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = ids.collect();
        ids.sort_by(|a, b| self.node(*a).key.cmp(&self.node(*b).key));
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::api::core::v1::{Pod, Service};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn meta(name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("ns".to_string()),
            ..Default::default()
        }
    }

    fn service(name: &str) -> ResourceObject {
        ResourceObject::Service(Service {
            metadata: meta(name),
            ..Default::default()
        })
    }

    fn pod(name: &str) -> ResourceObject {
        ResourceObject::Pod(Pod {
            metadata: meta(name),
            ..Default::default()
        })
    }

    #[test]
    fn test_ensure_node_is_idempotent() {
        let mut graph = ResourceGraph::new();
        let a = graph.ensure_node(service("web"));
        let b = graph.ensure_node(service("web"));
        assert_eq!(a, b);
        assert_eq!(graph.len(), 1);

        // Same name, different kind is a different identity
        let c = graph.ensure_node(pod("web"));
        assert_ne!(a, c);
        assert_eq!(graph.find(ResourceKind::Pod, "ns", "web"), Some(c));
        assert_eq!(graph.find(ResourceKind::Pod, "other", "web"), None);
    }

    #[test]
    fn test_add_edge_dedups() {
        let mut graph = ResourceGraph::new();
        let svc = graph.ensure_node(service("web"));
        let p = graph.ensure_node(pod("web-1"));
        assert!(graph.add_edge(svc, p, EdgeKind::Exposes));
        assert!(!graph.add_edge(svc, p, EdgeKind::Exposes));
        assert!(!graph.add_edge(svc, svc, EdgeKind::Exposes));
        assert_eq!(graph.edge_count(), 1);
        assert!(graph.has_edge(svc, p, EdgeKind::Exposes));
        assert!(!graph.has_edge(p, svc, EdgeKind::Exposes));
    }

    #[test]
    fn test_neighbours_are_sorted_by_identity() {
        let mut graph = ResourceGraph::new();
        let svc = graph.ensure_node(service("web"));
        let z = graph.ensure_node(pod("z"));
        let a = graph.ensure_node(pod("a"));
        graph.add_edge(svc, z, EdgeKind::Exposes);
        graph.add_edge(svc, a, EdgeKind::Exposes);
        assert_eq!(graph.successors(svc, EdgeKind::Exposes), vec![a, z]);
        assert_eq!(graph.predecessors(a, EdgeKind::Exposes), vec![svc]);
        assert!(graph.successors(svc, EdgeKind::Manages).is_empty());
        assert_eq!(graph.nodes_by_kind(ResourceKind::Pod), vec![a, z]);
    }

    #[test]
    fn test_node_key_display() {
        let key = NodeKey::new(ResourceKind::DeploymentConfig, "ns", "web");
        assert_eq!(key.to_string(), "dc/web[ns]");
    }
}
