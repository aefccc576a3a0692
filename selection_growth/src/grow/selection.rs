/// SelectionSet — ordered, duplicate-free collection of instance keys.
///
/// Insertion order is preserved (it is the discovery order of a growth run)
/// while membership tests stay O(1) through a side hash set.

use rustc_hash::FxHashSet;
use crate::host::SceneQuery;
use crate::scene::InstanceKey;

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    /// Members in insertion order
    items: Vec<InstanceKey>,
    /// Membership lookup, always equal to the contents of `items`
    lookup: FxHashSet<InstanceKey>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            lookup: FxHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Add a key at the end. Returns false if it was already a member.
    pub fn insert(&mut self, key: InstanceKey) -> bool {
        if self.lookup.insert(key) {
            self.items.push(key);
            true
        } else {
            false
        }
    }

    /// Remove a key, preserving the order of the others. Returns false if absent.
    pub fn remove(&mut self, key: InstanceKey) -> bool {
        if self.lookup.remove(&key) {
            self.items.retain(|&k| k != key);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, key: InstanceKey) -> bool {
        self.lookup.contains(&key)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.lookup.clear();
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = InstanceKey> + '_ {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &[InstanceKey] {
        &self.items
    }

    /// `true` if both sets hold the same members, in any order.
    pub fn same_members(&self, other: &SelectionSet) -> bool {
        self.lookup == other.lookup
    }

    /// `true` if every member of `other` is also a member of `self`.
    pub fn is_superset(&self, other: &SelectionSet) -> bool {
        other.lookup.is_subset(&self.lookup)
    }

    /// Collapse every member to its grouping root.
    ///
    /// Keys unknown to the host are dropped. Siblings that share a root
    /// collapse to one entry, placed where the first of them stood.
    pub fn grouping_roots<H: SceneQuery + ?Sized>(&self, host: &H) -> SelectionSet {
        let mut roots = SelectionSet::with_capacity(self.len());
        for key in self.iter().filter(|&key| host.contains(key)) {
            roots.insert(host.grouping_root(key));
        }
        roots
    }
}

impl PartialEq for SelectionSet {
    /// Order-sensitive equality. Use `same_members` to ignore order.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for SelectionSet {}

impl FromIterator<InstanceKey> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = InstanceKey>>(iter: I) -> Self {
        let mut set = SelectionSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<InstanceKey> for SelectionSet {
    fn extend<I: IntoIterator<Item = InstanceKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a> IntoIterator for &'a SelectionSet {
    type Item = InstanceKey;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, InstanceKey>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter().copied()
    }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
