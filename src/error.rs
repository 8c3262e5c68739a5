//! Structural errors raised while turning a pipeline definition into a tree.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("duplicate service name: {0}")]
    DuplicateServiceName(String),

    #[error("unknown service reference: {name}{}", referenced_by_suffix(.referenced_by))]
    UnknownServiceReference {
        name: String,
        /// Parent whose `children` list named the missing service; `None` for the root.
        referenced_by: Option<String>,
    },

    #[error("cyclic topology at service {name}: {}", join_path(.path))]
    CyclicTopology {
        name: String,
        /// Active resolution path, ending with the repeated name.
        path: Vec<String>,
    },

    #[error("service {name} is nested deeper than {limit} levels")]
    DepthLimitExceeded { name: String, limit: usize },
}

fn join_path(path: &[String]) -> String {
    path.join(" -> ")
}

fn referenced_by_suffix(parent: &Option<String>) -> String {
    match parent {
        Some(p) => format!(" (child of {})", p),
        None => " (declared root)".to_string(),
    }
}

impl TopologyError {
    /// Stable, snake_case identifier used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TopologyError::DuplicateServiceName(_) => "duplicate_service_name",
            TopologyError::UnknownServiceReference { .. } => "unknown_service_reference",
            TopologyError::CyclicTopology { .. } => "cyclic_topology",
            TopologyError::DepthLimitExceeded { .. } => "depth_limit_exceeded",
        }
    }

    /// The service name that triggered the error.
    pub fn service(&self) -> &str {
        match self {
            TopologyError::DuplicateServiceName(name)
            | TopologyError::UnknownServiceReference { name, .. }
            | TopologyError::CyclicTopology { name, .. }
            | TopologyError::DepthLimitExceeded { name, .. } => name,
        }
    }
}

/// A structural error tagged with the pipeline it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pipeline {pipeline} is misconfigured: {source}")]
pub struct PipelineError {
    pub pipeline: String,
    #[source]
    pub source: TopologyError,
}
