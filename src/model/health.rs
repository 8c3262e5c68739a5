//! Health annotation: per-service status and bottom-up subtree roll-ups.

use crate::spec::{ResolvedService, Stats};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Healthy,
    Degraded,
}

impl Status {
    /// Node-local: descendants are not considered.
    pub fn of(stats: &Stats) -> Self {
        if stats.events_seen == stats.events_expected {
            Status::Healthy
        } else {
            Status::Degraded
        }
    }
}

/// Counters summed over a service and all of its descendants.
///
/// Totals are `u128` so that summing `u64` counters stays exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubtreeStats {
    pub events_seen: u128,
    pub events_expected: u128,
    pub lost: i128,
}

impl SubtreeStats {
    fn from_totals(events_seen: u128, events_expected: u128) -> Self {
        // both totals stay below 2^127 unless the tree has ~2^63 nodes
        let lost = i128::try_from(events_expected)
            .unwrap_or(i128::MAX)
            .saturating_sub(i128::try_from(events_seen).unwrap_or(i128::MAX));
        Self {
            events_seen,
            events_expected,
            lost,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceNode {
    pub name: String,
    pub required: bool,
    pub stats: Stats,
    pub subtree_stats: SubtreeStats,
    /// Own `expected - seen`; may be negative.
    pub lost: i128,
    pub status: Status,
    pub children: Vec<ServiceNode>,
}

impl ServiceNode {
    pub fn lost(&self) -> i128 {
        self.lost
    }

    pub fn is_healthy(&self) -> bool {
        self.status == Status::Healthy
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    pub fn node_count(&self) -> usize {
        self.walk().count()
    }

    /// First node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&ServiceNode> {
        self.walk().find(|n| n.name == name)
    }
}

pub struct Walk<'a> {
    stack: Vec<&'a ServiceNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ServiceNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // reversed so the first child is visited next
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Computes loss, status and subtree counters for a resolved tree.
pub struct HealthEvaluator;

impl HealthEvaluator {
    /// Post-order: children are annotated before their parent sums them.
    pub fn annotate(service: ResolvedService) -> ServiceNode {
        let ResolvedService {
            name,
            required,
            stats,
            children,
        } = service;

        let children: Vec<ServiceNode> = children.into_iter().map(Self::annotate).collect();

        let (seen, expected) = children.iter().fold(
            (
                u128::from(stats.events_seen),
                u128::from(stats.events_expected),
            ),
            |(seen, expected), child| {
                (
                    seen + child.subtree_stats.events_seen,
                    expected + child.subtree_stats.events_expected,
                )
            },
        );

        ServiceNode {
            name,
            required,
            lost: stats.lost(),
            status: Status::of(&stats),
            stats,
            subtree_stats: SubtreeStats::from_totals(seen, expected),
            children,
        }
    }
}
