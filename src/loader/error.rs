//! Loader errors

use crate::models::ResourceKind;
use std::fmt;

/// Failure of a single list call
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("{} is forbidden", .0.plural())]
    Forbidden(ResourceKind),

    #[error("the server could not find the requested resource ({})", .0.plural())]
    NotFound(ResourceKind),

    #[error("failed to list {}: {source}", .kind.plural())]
    Failed {
        kind: ResourceKind,
        #[source]
        source: anyhow::Error,
    },
}

impl ListError {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ListError::Forbidden(kind) | ListError::NotFound(kind) => *kind,
            ListError::Failed { kind, .. } => *kind,
        }
    }
}

/// Every genuine failure from one fan-out
///
/// Returned instead of a graph when any loader failed for a reason other
/// than a tolerated one.
#[derive(Debug, thiserror::Error)]
pub struct LoadError(pub Vec<ListError>);

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [single] => write!(f, "{}", single),
            errors => {
                let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", joined.join(", "))
            }
        }
    }
}

impl LoadError {
    pub fn errors(&self) -> &[ListError] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_display() {
        let single = LoadError(vec![ListError::Failed {
            kind: ResourceKind::Pod,
            source: anyhow::anyhow!("connection refused"),
        }]);
        assert_eq!(single.to_string(), "failed to list pods: connection refused");

        let many = LoadError(vec![
            ListError::Failed {
                kind: ResourceKind::Pod,
                source: anyhow::anyhow!("timeout"),
            },
            ListError::NotFound(ResourceKind::Route),
        ]);
        assert_eq!(
            many.to_string(),
            "[failed to list pods: timeout, the server could not find the requested resource (routes)]"
        );
    }

    #[test]
    fn test_list_error_kind() {
        assert_eq!(
            ListError::Forbidden(ResourceKind::Secret).kind(),
            ResourceKind::Secret
        );
    }
}
