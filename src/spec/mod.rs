//! Spec layer: JSON schema + validated in-memory structures.
//!
//! This module is intentionally separate from health evaluation and reporting.
//! It owns:
//! - Snapshot schema (pipelines, flat service records, raw counters)
//! - Service index (name lookup, duplicate detection)
//! - Tree builder (reference resolution, cycle detection)

pub mod index;
pub mod snapshot;
pub mod tree;

pub use index::ServiceIndex;
pub use snapshot::{PipelineDefinition, ServiceRecord, Snapshot, Stats};
pub use tree::{MAX_DEPTH, ResolvedService, TreeBuilder};
