//! Pipeline model: validated, health-annotated trees built from a snapshot.
//!
//! Each definition goes through the same stages:
//! index the flat service list, resolve the root into a tree, annotate health.
//! A structural error stops only the pipeline that raised it.

pub mod health;

pub use health::{HealthEvaluator, ServiceNode, Status, SubtreeStats, Walk};

use crate::error::{PipelineError, TopologyError};
use crate::spec::{PipelineDefinition, ServiceIndex, TreeBuilder};

use log::{Level, debug, log_enabled, warn};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSnapshot {
    pub name: String,
    pub max_seconds_to_reach_end: u64,
    pub root_node: ServiceNode,
}

impl PipelineSnapshot {
    /// Names of degraded services, in pre-order.
    pub fn degraded_services(&self) -> Vec<&str> {
        self.root_node
            .walk()
            .filter(|n| !n.is_healthy())
            .map(|n| n.name.as_str())
            .collect()
    }
}

/// Valid snapshots plus per-pipeline errors, both in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelOutput {
    pub snapshots: Vec<PipelineSnapshot>,
    pub errors: Vec<PipelineError>,
}

impl ModelOutput {
    /// True when no pipeline was rejected.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn snapshot(&self, name: &str) -> Option<&PipelineSnapshot> {
        self.snapshots.iter().find(|s| s.name == name)
    }
}

pub struct PipelineModel;

impl PipelineModel {
    pub fn from_definitions(defs: &[PipelineDefinition]) -> ModelOutput {
        let mut out = ModelOutput::default();
        for def in defs {
            match Self::build_pipeline(def) {
                Ok(snapshot) => out.snapshots.push(snapshot),
                Err(source) => {
                    warn!("pipeline {} rejected: {}", def.name, source);
                    out.errors.push(PipelineError {
                        pipeline: def.name.clone(),
                        source,
                    });
                }
            }
        }
        out
    }

    /// Build a single pipeline; the error is not yet tagged with its name.
    pub fn build_pipeline(def: &PipelineDefinition) -> Result<PipelineSnapshot, TopologyError> {
        let index = ServiceIndex::build(&def.services)?;
        let resolved = TreeBuilder::build(&index, &def.root)?;
        let root_node = HealthEvaluator::annotate(resolved);

        if log_enabled!(Level::Debug) {
            let unreferenced = index.unreferenced(&root_node);
            if !unreferenced.is_empty() {
                debug!(
                    "pipeline {}: {} service(s) not reachable from root {}: {}",
                    def.name,
                    unreferenced.len(),
                    def.root,
                    unreferenced.join(", ")
                );
            }
            debug!(
                "pipeline {}: {} node(s), subtree lost {}",
                def.name,
                root_node.node_count(),
                root_node.subtree_stats.lost
            );
        }

        Ok(PipelineSnapshot {
            name: def.name.clone(),
            max_seconds_to_reach_end: def.max_seconds_to_reach_end,
            root_node,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ServiceRecord, Stats};
    use pretty_assertions::assert_eq;

    fn record(name: &str, children: &[&str], seen: u64, expected: u64) -> ServiceRecord {
        ServiceRecord {
            name: name.to_string(),
            children: children.iter().map(|c| c.to_string()).collect(),
            required: false,
            stats: Stats::new(seen, expected),
        }
    }

    fn pipeline(name: &str, root: &str, services: Vec<ServiceRecord>) -> PipelineDefinition {
        PipelineDefinition {
            name: name.to_string(),
            max_seconds_to_reach_end: 60,
            root: root.to_string(),
            services,
        }
    }

    #[test]
    fn duplicate_names_fail_before_tree_resolution() {
        // root is missing too, but the duplicate check runs first
        let def = pipeline(
            "p",
            "missing",
            vec![record("a", &[], 1, 1), record("a", &[], 1, 1)],
        );
        let err = PipelineModel::build_pipeline(&def).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateServiceName("a".to_string()));
    }

    #[test]
    fn failures_are_isolated_per_pipeline() {
        let defs = vec![
            pipeline("first", "a", vec![record("a", &[], 5, 5)]),
            pipeline("broken", "a", vec![record("a", &["nope"], 5, 5)]),
            pipeline("third", "x", vec![record("x", &[], 1, 2)]),
        ];
        let out = PipelineModel::from_definitions(&defs);

        let names: Vec<&str> = out.snapshots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "third"]);
        assert!(!out.is_complete());
        assert_eq!(out.errors.len(), 1);
        assert_eq!(out.errors[0].pipeline, "broken");
        assert_eq!(out.errors[0].source.kind(), "unknown_service_reference");
        assert_eq!(out.snapshot("third").map(|s| s.degraded_services()), Some(vec!["x"]));
    }

    #[test]
    fn empty_input_is_empty_output() {
        let out = PipelineModel::from_definitions(&[]);
        assert!(out.is_complete());
        assert!(out.snapshots.is_empty());
    }

    #[test]
    fn snapshot_carries_definition_metadata() {
        let def = pipeline("p", "a", vec![record("a", &[], 3, 3), record("unused", &[], 0, 9)]);
        let snapshot = PipelineModel::build_pipeline(&def).unwrap();
        assert_eq!(snapshot.name, "p");
        assert_eq!(snapshot.max_seconds_to_reach_end, 60);
        assert_eq!(snapshot.root_node.node_count(), 1);
        assert!(snapshot.degraded_services().is_empty());
    }
}
