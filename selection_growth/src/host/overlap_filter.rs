/// Overlap query filter.
///
/// Passed to [`NeighborFinder::query_overlap`](super::NeighborFinder::query_overlap).
/// Leaves are tested individually against the mask, the ignore-set and the
/// optional predicate; `grouping` then decides whether hits are reported as
/// leaves or collapsed to their grouping roots.

use std::fmt;
use rustc_hash::FxHashSet;
use crate::scene::{InstanceKey, InstanceKind, InstanceMask};

/// Granularity of reported hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    /// Report every intersecting leaf instance
    Leaves,
    /// Report each intersecting leaf's grouping root, once
    GroupingRoots,
}

/// Filter applied to every leaf tested by an overlap query.
#[derive(Clone, Copy)]
pub struct OverlapFilter<'a> {
    /// Only instances whose kind is in this mask are reported
    pub mask: InstanceMask,
    /// Instances never reported (and never matched by themselves)
    pub ignore: &'a FxHashSet<InstanceKey>,
    /// Extra caller-side test; `false` rejects the leaf
    pub predicate: Option<&'a dyn Fn(InstanceKey) -> bool>,
    /// Granularity of reported hits
    pub grouping: Grouping,
}

impl<'a> OverlapFilter<'a> {
    /// Filter on kind and ignore-set only, reporting leaves.
    pub fn new(mask: InstanceMask, ignore: &'a FxHashSet<InstanceKey>) -> Self {
        Self { mask, ignore, predicate: None, grouping: Grouping::Leaves }
    }

    pub fn with_predicate(mut self, predicate: &'a dyn Fn(InstanceKey) -> bool) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    /// `true` if a leaf of the given kind passes mask, ignore-set and predicate.
    pub fn accepts(&self, key: InstanceKey, kind: InstanceKind) -> bool {
        self.mask.includes(kind)
            && !self.ignore.contains(&key)
            && self.predicate.map_or(true, |predicate| predicate(key))
    }
}

impl fmt::Debug for OverlapFilter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlapFilter")
            .field("mask", &self.mask)
            .field("ignore", &self.ignore.len())
            .field("predicate", &self.predicate.is_some())
            .field("grouping", &self.grouping)
            .finish()
    }
}

#[cfg(test)]
#[path = "overlap_filter_tests.rs"]
mod tests;
