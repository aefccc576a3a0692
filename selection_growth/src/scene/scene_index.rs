/// Spatial acceleration structures for overlap queries.
///
/// A SceneIndex indexes scene instances by their world-space AABB so that
/// neighborhood queries during growth touch only nearby instances instead of
/// the whole level. Implementations include Octree, BVH, grid, etc.
///
/// Ownership: the caller creates and owns the SceneIndex, fills it with
/// `Scene::populate_index`, and lends it to an IndexedNeighborFinder.

use crate::geometry::AABB;
use super::instance::InstanceKey;

/// Trait for spatial indexing of scene instances (broad phase only).
///
/// Queries are conservative: every instance whose stored AABB overlaps the
/// query volume is reported; exact tests are left to the caller.
pub trait SceneIndex: Send + Sync {
    /// Insert an instance with its world-space AABB.
    fn insert(&mut self, key: InstanceKey, world_aabb: &AABB);

    /// Remove an instance from the index.
    fn remove(&mut self, key: InstanceKey);

    /// Update an instance's world-space AABB (e.g. after transform change).
    fn update(&mut self, key: InstanceKey, world_aabb: &AABB);

    /// Query all instances whose world AABB intersects `region`.
    /// Results are appended to `results`.
    fn query_region(&self, region: &AABB, results: &mut Vec<InstanceKey>);

    /// Number of indexed instances.
    fn len(&self) -> usize;

    /// `true` if nothing is indexed.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove all instances from the index.
    fn clear(&mut self);
}
