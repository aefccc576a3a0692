//! Scene module
//!
//! An in-memory level that implements the growth host contract: placed
//! instances with a parent/child hierarchy, grouping roots, bounds, the
//! active selection, and overlap queries (brute force or octree-backed).

mod instance;
mod scene;
mod scene_index;
mod octree_scene_index;
mod indexed_neighbor_finder;

pub use instance::{
    InstanceKey, InstanceKind, InstanceMask, AssetId,
    Transform, SceneInstance, SceneInstanceDesc,
};
pub use scene::Scene;
pub use scene_index::SceneIndex;
pub use octree_scene_index::OctreeSceneIndex;
pub use indexed_neighbor_finder::IndexedNeighborFinder;
