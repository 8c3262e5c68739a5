//! Resolve a root name against a `ServiceIndex` into an owned tree.
//!
//! Resolution is a depth-first walk from the root. A name may show up in
//! several branches (diamond reuse); each appearance gets its own copy of the
//! subtree. A name that reappears on its own ancestor path is a cycle and
//! fails the whole pipeline.
//!
//! Resolution, annotation, serialization and drop all recurse once per level,
//! so trees deeper than `MAX_DEPTH` are rejected up front.

use crate::error::TopologyError;
use crate::spec::{ServiceIndex, Stats};

use std::collections::HashSet;

/// Deepest root-to-leaf path accepted, counting the root as level 1.
pub const MAX_DEPTH: usize = 256;

/// A service with its children resolved, before health annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedService {
    pub name: String,
    pub required: bool,
    pub stats: Stats,
    pub children: Vec<ResolvedService>,
}

pub struct TreeBuilder<'i, 'a> {
    index: &'i ServiceIndex<'a>,
    /// Names on the current root-to-node path, in order.
    stack: Vec<&'a str>,
    on_path: HashSet<&'a str>,
}

impl<'i, 'a> TreeBuilder<'i, 'a> {
    pub fn new(index: &'i ServiceIndex<'a>) -> Self {
        Self {
            index,
            stack: Vec::new(),
            on_path: HashSet::new(),
        }
    }

    pub fn build(index: &'i ServiceIndex<'a>, root: &str) -> Result<ResolvedService, TopologyError> {
        Self::new(index).resolve(root, None)
    }

    fn resolve(
        &mut self,
        name: &str,
        parent: Option<&str>,
    ) -> Result<ResolvedService, TopologyError> {
        let record = self
            .index
            .get(name)
            .ok_or_else(|| TopologyError::UnknownServiceReference {
                name: name.to_string(),
                referenced_by: parent.map(str::to_string),
            })?;
        let name: &'a str = record.name.as_str();

        if self.on_path.contains(name) {
            // name is already an ancestor of itself => cycle
            let mut path: Vec<String> = self.stack.iter().map(|s| s.to_string()).collect();
            path.push(name.to_string());
            return Err(TopologyError::CyclicTopology {
                name: name.to_string(),
                path,
            });
        }

        if self.stack.len() >= MAX_DEPTH {
            return Err(TopologyError::DepthLimitExceeded {
                name: name.to_string(),
                limit: MAX_DEPTH,
            });
        }

        self.on_path.insert(name);
        self.stack.push(name);

        let mut children = Vec::with_capacity(record.children.len());
        for child in &record.children {
            children.push(self.resolve(child, Some(name))?);
        }

        self.stack.pop();
        self.on_path.remove(name);

        Ok(ResolvedService {
            name: record.name.clone(),
            required: record.required,
            stats: record.stats,
            children,
        })
    }
}
