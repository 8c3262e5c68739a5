//! Name lookup over a pipeline's flat service list.

use crate::error::TopologyError;
use crate::model::ServiceNode;
use crate::spec::ServiceRecord;

use std::collections::{BTreeSet, HashMap};

/// Services keyed by exact (case-sensitive) name.
///
/// Records that the tree never reaches stay in the index; they are simply
/// not rendered.
#[derive(Debug, Clone)]
pub struct ServiceIndex<'a> {
    records: HashMap<&'a str, &'a ServiceRecord>,
}

impl<'a> ServiceIndex<'a> {
    pub fn build(records: &'a [ServiceRecord]) -> Result<Self, TopologyError> {
        let mut map: HashMap<&'a str, &'a ServiceRecord> = HashMap::with_capacity(records.len());
        for record in records {
            if map.insert(record.name.as_str(), record).is_some() {
                return Err(TopologyError::DuplicateServiceName(record.name.clone()));
            }
        }
        Ok(Self { records: map })
    }

    pub fn get(&self, name: &str) -> Option<&'a ServiceRecord> {
        self.records.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Indexed names that do not appear anywhere in `tree`, sorted.
    pub fn unreferenced(&self, tree: &ServiceNode) -> Vec<&'a str> {
        let reached: BTreeSet<&str> = tree.walk().map(|n| n.name.as_str()).collect();
        let mut orphans: Vec<&'a str> = self
            .records
            .keys()
            .copied()
            .filter(|name| !reached.contains(name))
            .collect();
        orphans.sort_unstable();
        orphans
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Stats;
    use pretty_assertions::assert_eq;

    fn record(name: &str) -> ServiceRecord {
        ServiceRecord {
            name: name.to_string(),
            children: vec![],
            required: false,
            stats: Stats::default(),
        }
    }

    #[test]
    fn indexes_by_name() {
        let records = vec![record("a"), record("b")];
        let index = ServiceIndex::build(&records).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("b").map(|r| r.name.as_str()), Some("b"));
        assert!(index.get("c").is_none());
    }

    #[test]
    fn names_are_case_sensitive() {
        let records = vec![record("step"), record("Step")];
        let index = ServiceIndex::build(&records).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.get("STEP").is_none());
    }

    #[test]
    fn rejects_duplicate_names() {
        let records = vec![record("a"), record("b"), record("a")];
        let err = ServiceIndex::build(&records).unwrap_err();
        assert_eq!(err, TopologyError::DuplicateServiceName("a".to_string()));
    }

    #[test]
    fn empty_list_builds_empty_index() {
        let index = ServiceIndex::build(&[]).unwrap();
        assert!(index.is_empty());
    }
}
