//! Resource naming relative to a current namespace

use crate::analysis::Namer;
use crate::graph::Node;
use crate::models::ResourceKind;

/// Names resources as `<short>/<name>`, adding `[<namespace>]` when the
/// resource lives outside the current namespace
#[derive(Debug, Clone, Default)]
pub struct NamespacedFormatter {
    pub current_namespace: String,
}

impl NamespacedFormatter {
    pub fn new(current_namespace: impl Into<String>) -> Self {
        Self {
            current_namespace: current_namespace.into(),
        }
    }

    pub fn name_with_kind(&self, kind: ResourceKind, name: &str, namespace: &str) -> String {
        if namespace == self.current_namespace || namespace.is_empty() {
            format!("{}/{}", kind.short_name(), name)
        } else {
            format!("{}/{}[{}]", kind.short_name(), name, namespace)
        }
    }
}

impl Namer for NamespacedFormatter {
    fn resource_name(&self, node: &Node) -> String {
        self.name_with_kind(node.kind(), node.name(), node.namespace())
    }
}
