/// Scene — an in-memory level: placed instances, hierarchy, and the active selection.
///
/// Uses a SlotMap for O(1) insert/remove with stable keys. Implements the
/// full growth host contract (SceneQuery + BoundsProvider + NeighborFinder)
/// with a brute-force overlap query in slot order. For large levels, pair it
/// with a SceneIndex through IndexedNeighborFinder.

use glam::{Mat4, Quat};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use crate::error::Result;
use crate::geometry::{Frustum, AABB, OBB};
use crate::grow::{GrowConstraintConfig, GrowOutcome, SelectionGrower, SelectionSet};
use crate::host::{BoundsProvider, Grouping, NeighborFinder, OverlapFilter, SceneQuery};
use super::instance::{
    AssetId, InstanceKey, InstanceKind, InstanceMask, SceneInstance, SceneInstanceDesc, Transform,
};
use super::scene_index::SceneIndex;

const SOURCE: &str = "growth::Scene";

/// A level containing placed instances.
///
/// Keys remain valid until their instance (or an ancestor) is removed.
#[derive(Debug, Default)]
pub struct Scene {
    /// Instances stored in a slot map for O(1) insert/remove
    instances: SlotMap<InstanceKey, SceneInstance>,
    /// The host's active selection
    selection: SelectionSet,
    /// Bumped every time a new selection is installed
    selection_revision: u64,
    /// Set when the view needs to refresh; drained by take_redraw_request()
    redraw_requested: bool,
    /// An exclusive transform edit (gizmo drag) is in progress
    transform_session_active: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== INSTANCE LIFECYCLE =====

    /// Place a new top-level instance.
    pub fn create_instance(&mut self, desc: SceneInstanceDesc) -> InstanceKey {
        self.instances.insert(SceneInstance::from_desc(desc))
    }

    /// Place a new instance under `parent`.
    pub fn create_child_instance(
        &mut self,
        parent: InstanceKey,
        desc: SceneInstanceDesc,
    ) -> Result<InstanceKey> {
        if !self.instances.contains_key(parent) {
            return Err(crate::grow_err!(SOURCE, UnknownInstance,
                "Parent {:?} does not exist", parent));
        }
        let key = self.instances.insert(SceneInstance::from_desc(desc));
        self.link(key, parent);
        Ok(key)
    }

    /// Re-parent an instance (`None` detaches it to the top level).
    ///
    /// The local transform is kept as-is, so the world placement follows the new parent.
    pub fn set_parent(&mut self, child: InstanceKey, parent: Option<InstanceKey>) -> Result<()> {
        if !self.instances.contains_key(child) {
            return Err(crate::grow_err!(SOURCE, UnknownInstance,
                "Child {:?} does not exist", child));
        }
        if let Some(parent) = parent {
            if !self.instances.contains_key(parent) {
                return Err(crate::grow_err!(SOURCE, UnknownInstance,
                    "Parent {:?} does not exist", parent));
            }
            if self.is_ancestor_or_self(child, parent) {
                return Err(crate::grow_err!(SOURCE, InvalidHierarchy,
                    "Parenting {:?} under {:?} would create a cycle", child, parent));
            }
        }

        self.unlink(child);
        if let Some(parent) = parent {
            self.link(child, parent);
        }
        Ok(())
    }

    /// Remove an instance and its whole sub-hierarchy.
    ///
    /// Removed keys are also dropped from the active selection.
    /// Returns false if the key is invalid.
    pub fn remove_instance(&mut self, key: InstanceKey) -> bool {
        if !self.instances.contains_key(key) {
            return false;
        }

        self.unlink(key);
        let mut doomed = Vec::new();
        self.collect_hierarchy(key, &mut doomed);

        let mut selection_changed = false;
        for key in doomed {
            self.instances.remove(key);
            selection_changed |= self.selection.remove(key);
        }
        if selection_changed {
            self.bump_selection();
        }
        true
    }

    /// Remove all instances and clear the selection.
    pub fn clear(&mut self) {
        self.instances.clear();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.bump_selection();
        }
    }

    fn link(&mut self, child: InstanceKey, parent: InstanceKey) {
        if let Some(p) = self.instances.get_mut(parent) {
            p.add_child(child);
        }
        if let Some(c) = self.instances.get_mut(child) {
            c.set_parent(Some(parent));
        }
    }

    fn unlink(&mut self, child: InstanceKey) {
        let old_parent = self.instances.get(child).and_then(SceneInstance::parent);
        if let Some(old_parent) = old_parent {
            if let Some(p) = self.instances.get_mut(old_parent) {
                p.remove_child(child);
            }
        }
        if let Some(c) = self.instances.get_mut(child) {
            c.set_parent(None);
        }
    }

    /// `true` if `ancestor` is `key` itself or one of its ancestors.
    fn is_ancestor_or_self(&self, ancestor: InstanceKey, key: InstanceKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.instances.get(k).and_then(SceneInstance::parent);
        }
        false
    }

    // ===== ACCESSORS =====

    pub fn instance(&self, key: InstanceKey) -> Option<&SceneInstance> {
        self.instances.get(key)
    }

    /// Iterate over all instances (key, instance) in slot order.
    pub fn instances(&self) -> impl Iterator<Item = (InstanceKey, &SceneInstance)> {
        self.instances.iter()
    }

    pub fn instance_keys(&self) -> impl Iterator<Item = InstanceKey> + '_ {
        self.instances.keys()
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Set the local transform of an instance. Returns false if key is invalid.
    pub fn set_transform(&mut self, key: InstanceKey, transform: Transform) -> bool {
        match self.instances.get_mut(key) {
            Some(instance) => {
                instance.set_transform(transform);
                true
            }
            None => false,
        }
    }

    /// World matrix: the local transforms of all ancestors composed root-first.
    pub fn world_matrix(&self, key: InstanceKey) -> Option<Mat4> {
        let mut instance = self.instances.get(key)?;
        let mut matrix = instance.transform().matrix();
        while let Some(parent) = instance.parent() {
            instance = self.instances.get(parent)?;
            matrix = instance.transform().matrix() * matrix;
        }
        Some(matrix)
    }

    /// World OBB of this instance's own geometry (descendants excluded).
    pub fn world_obb(&self, key: InstanceKey) -> Option<OBB> {
        let bounds = self.instances.get(key)?.local_bounds()?;
        Some(OBB::from_local_aabb(bounds, &self.world_matrix(key)?))
    }

    /// World AABB of this instance's own geometry (descendants excluded).
    pub fn world_aabb(&self, key: InstanceKey) -> Option<AABB> {
        let bounds = self.instances.get(key)?.local_bounds()?;
        Some(bounds.transformed(&self.world_matrix(key)?))
    }

    /// Insert every instance with geometry into a spatial index, keyed by world AABB.
    pub fn populate_index(&self, index: &mut dyn SceneIndex) {
        index.clear();
        for key in self.instances.keys() {
            if let Some(aabb) = self.world_aabb(key).filter(AABB::is_valid) {
                index.insert(key, &aabb);
            }
        }
    }

    // ===== SELECTION =====

    /// The active selection.
    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Install a new active selection, dropping unknown keys.
    pub fn set_selection(&mut self, selection: SelectionSet) {
        self.selection = selection
            .iter()
            .filter(|&key| self.instances.contains_key(key))
            .collect();
        self.bump_selection();
    }

    /// Incremented each time a selection is installed.
    pub fn selection_revision(&self) -> u64 {
        self.selection_revision
    }

    /// Take and clear the pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn bump_selection(&mut self) {
        self.selection_revision += 1;
        self.redraw_requested = true;
    }

    // ===== TRANSFORM SESSION =====

    /// Start an exclusive transform edit. Returns false if one is already active.
    pub fn begin_transform_session(&mut self) -> bool {
        !std::mem::replace(&mut self.transform_session_active, true)
    }

    /// End the exclusive transform edit (no-op if none is active).
    pub fn end_transform_session(&mut self) {
        self.transform_session_active = false;
    }

    // ===== GROWTH =====

    /// Grow the active selection and install the result.
    ///
    /// Nothing is installed when the run is refused; the outcome says why.
    pub fn grow_selection(
        &mut self,
        config: &GrowConstraintConfig,
        view: Option<&Frustum>,
    ) -> Result<GrowOutcome> {
        let outcome = SelectionGrower::new(&*self).grow(&self.selection, config, view)?;
        if let GrowOutcome::Grown(report) = &outcome {
            self.selection = report.selection.clone();
            self.bump_selection();
        }
        Ok(outcome)
    }

    // ===== OVERLAP =====

    /// Narrow-phase overlap over a candidate key sequence, shared by the
    /// brute-force query and IndexedNeighborFinder.
    pub(crate) fn collect_overlaps<I>(
        &self,
        keys: I,
        region: &OBB,
        filter: &OverlapFilter<'_>,
        results: &mut Vec<InstanceKey>,
    ) where
        I: IntoIterator<Item = InstanceKey>,
    {
        let region_aabb = region.to_aabb();
        let mut reported_roots = FxHashSet::default();

        for key in keys {
            let Some(instance) = self.instances.get(key) else { continue };
            if !filter.accepts(key, instance.kind()) {
                continue;
            }
            let Some(obb) = self.world_obb(key).filter(OBB::is_valid) else { continue };
            if !region_aabb.intersects(&obb.to_aabb()) || !region.intersects(&obb) {
                continue;
            }

            match filter.grouping {
                Grouping::Leaves => results.push(key),
                Grouping::GroupingRoots => {
                    let root = self.grouping_root(key);
                    if reported_roots.insert(root) {
                        results.push(root);
                    }
                }
            }
        }
    }
}

// ===== HOST CONTRACT =====

impl SceneQuery for Scene {
    fn contains(&self, key: InstanceKey) -> bool {
        self.instances.contains_key(key)
    }

    fn grouping_root(&self, key: InstanceKey) -> InstanceKey {
        let mut root = key;
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(instance) = self.instances.get(k) else { break };
            if instance.is_grouping_root() {
                root = k;
            }
            current = instance.parent();
        }
        root
    }

    fn kind(&self, key: InstanceKey) -> Option<InstanceKind> {
        self.instances.get(key).map(SceneInstance::kind)
    }

    fn asset_id(&self, key: InstanceKey) -> Option<AssetId> {
        self.instances.get(key)?.asset_id()
    }

    fn world_rotation(&self, key: InstanceKey) -> Option<Quat> {
        let (_, rotation, _) = self.world_matrix(key)?.to_scale_rotation_translation();
        Some(rotation)
    }

    fn collect_hierarchy(&self, key: InstanceKey, out: &mut Vec<InstanceKey>) {
        if !self.instances.contains_key(key) {
            return;
        }
        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            out.push(k);
            if let Some(instance) = self.instances.get(k) {
                stack.extend(instance.children().iter().rev());
            }
        }
    }

    fn transform_session_active(&self) -> bool {
        self.transform_session_active
    }
}

impl BoundsProvider for Scene {
    /// Box aligned with the root's world rotation, enclosing every
    /// contributing member's local bounds.
    fn hierarchy_obb(&self, key: InstanceKey, mask: InstanceMask) -> Option<OBB> {
        let (_, rotation, translation) = self.world_matrix(key)?.to_scale_rotation_translation();
        let frame = Mat4::from_rotation_translation(rotation, translation);
        let to_frame = frame.inverse();

        let mut members = Vec::new();
        self.collect_hierarchy(key, &mut members);

        let mut points = Vec::with_capacity(members.len() * 8);
        for member in members {
            let Some(instance) = self.instances.get(member) else { continue };
            if !mask.includes(instance.kind()) {
                continue;
            }
            let (Some(bounds), Some(world)) = (instance.local_bounds(), self.world_matrix(member)) else {
                continue;
            };
            let to_root = to_frame * world;
            points.extend(bounds.corners().iter().map(|&c| to_root.transform_point3(c)));
        }

        if points.is_empty() {
            return None;
        }

        let local = AABB::from_points(points);
        Some(OBB::new(frame.transform_point3(local.center()), local.half_extents(), rotation))
    }

    fn hierarchy_aabb(&self, key: InstanceKey) -> Option<AABB> {
        let mut members = Vec::new();
        self.collect_hierarchy(key, &mut members);

        let aabb = members
            .into_iter()
            .filter_map(|member| self.world_aabb(member))
            .fold(AABB::EMPTY, |acc, aabb| acc.union(&aabb));

        aabb.is_valid().then_some(aabb)
    }
}

impl NeighborFinder for Scene {
    fn query_overlap(&self, region: &OBB, filter: &OverlapFilter<'_>, results: &mut Vec<InstanceKey>) {
        self.collect_overlaps(self.instances.keys(), region, filter, results);
    }
}

#[cfg(test)]
#[path = "scene_tests.rs"]
mod tests;
