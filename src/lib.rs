//! Topology and health model for multi-stage event pipelines.
//!
//! A snapshot lists pipelines as flat sets of services with event counters.
//! This crate turns each one into a validated rooted tree, marks services whose
//! observed count differs from the expected count, and rolls loss up per
//! subtree. Rendering and fetching are left to the caller.
//!
//! ```text
//! Snapshot (raw JSON)
//!        │
//!        ▼
//! ServiceIndex::build()      duplicate names
//!        │
//!        ▼
//! TreeBuilder::build()       unknown references, cycles
//!        │
//!        ▼
//! HealthEvaluator::annotate()
//!        │
//!        ▼
//! PipelineSnapshot / PipelineError
//! ```

pub mod error;
pub mod model;
pub mod report;
pub mod spec;

pub type Result<T> = anyhow::Result<T>;

pub use error::{PipelineError, TopologyError};
pub use model::{
    HealthEvaluator, ModelOutput, PipelineModel, PipelineSnapshot, ServiceNode, Status,
    SubtreeStats,
};
pub use report::{Report, ReportError};
pub use spec::{PipelineDefinition, ServiceIndex, ServiceRecord, Snapshot, Stats, TreeBuilder};
