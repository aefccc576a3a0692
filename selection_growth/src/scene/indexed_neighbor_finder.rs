/// IndexedNeighborFinder — overlap queries accelerated by a SceneIndex.
///
/// Broad phase: the query OBB's enclosing AABB against the index.
/// Narrow phase: the exact OBB test from `Scene`. Reports the same set as
/// the brute-force `Scene` query; only the discovery order may differ
/// (index traversal order instead of slot order).
///
/// The index must be kept in sync with the scene by the caller
/// (`Scene::populate_index` after edits).

use glam::Quat;
use crate::geometry::{AABB, OBB};
use crate::host::{BoundsProvider, NeighborFinder, OverlapFilter, SceneQuery};
use super::instance::{AssetId, InstanceKey, InstanceKind, InstanceMask};
use super::scene::Scene;
use super::scene_index::SceneIndex;

/// A Scene paired with a broad-phase index. Forwards metadata and bounds to the scene.
pub struct IndexedNeighborFinder<'a> {
    scene: &'a Scene,
    index: &'a dyn SceneIndex,
}

impl<'a> IndexedNeighborFinder<'a> {
    pub fn new(scene: &'a Scene, index: &'a dyn SceneIndex) -> Self {
        Self { scene, index }
    }

    pub fn scene(&self) -> &'a Scene {
        self.scene
    }
}

impl NeighborFinder for IndexedNeighborFinder<'_> {
    fn query_overlap(&self, region: &OBB, filter: &OverlapFilter<'_>, results: &mut Vec<InstanceKey>) {
        let mut broad = Vec::new();
        self.index.query_region(&region.to_aabb(), &mut broad);
        self.scene.collect_overlaps(broad, region, filter, results);
    }
}

impl SceneQuery for IndexedNeighborFinder<'_> {
    fn contains(&self, key: InstanceKey) -> bool {
        self.scene.contains(key)
    }

    fn grouping_root(&self, key: InstanceKey) -> InstanceKey {
        self.scene.grouping_root(key)
    }

    fn kind(&self, key: InstanceKey) -> Option<InstanceKind> {
        self.scene.kind(key)
    }

    fn asset_id(&self, key: InstanceKey) -> Option<AssetId> {
        self.scene.asset_id(key)
    }

    fn world_rotation(&self, key: InstanceKey) -> Option<Quat> {
        self.scene.world_rotation(key)
    }

    fn collect_hierarchy(&self, key: InstanceKey, out: &mut Vec<InstanceKey>) {
        self.scene.collect_hierarchy(key, out);
    }

    fn transform_session_active(&self) -> bool {
        self.scene.transform_session_active()
    }
}

impl BoundsProvider for IndexedNeighborFinder<'_> {
    fn hierarchy_obb(&self, key: InstanceKey, mask: InstanceMask) -> Option<OBB> {
        self.scene.hierarchy_obb(key, mask)
    }

    fn hierarchy_aabb(&self, key: InstanceKey) -> Option<AABB> {
        self.scene.hierarchy_aabb(key)
    }
}
