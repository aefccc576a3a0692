//! Host contracts — what the growth engine needs from a scene.
//!
//! The engine never owns scene data. It reads instance metadata through
//! [`SceneQuery`], bounding volumes through [`BoundsProvider`], and discovers
//! neighbors through [`NeighborFinder`]. Any type implementing all three is a
//! [`GrowthHost`]. The in-memory [`Scene`](crate::scene::Scene) is one such
//! host; editors plug in their own scene graph and broad phase.

mod overlap_filter;

pub use overlap_filter::{OverlapFilter, Grouping};

use glam::Quat;
use crate::geometry::{AABB, OBB};
use crate::scene::{AssetId, InstanceKey, InstanceKind, InstanceMask};

/// Read-only access to instance metadata and hierarchy.
pub trait SceneQuery {
    /// `true` if the key refers to a live instance.
    fn contains(&self, key: InstanceKey) -> bool;

    /// The top-most ancestor that must be selected and grown as one unit.
    ///
    /// Returns `key` itself for ungrouped instances. Must be pure: the same
    /// key always maps to the same root for a fixed scene state.
    fn grouping_root(&self, key: InstanceKey) -> InstanceKey;

    /// Type classification, `None` for unknown keys.
    fn kind(&self, key: InstanceKey) -> Option<InstanceKind>;

    /// Asset identity tag, `None` for unknown keys or untagged instances.
    fn asset_id(&self, key: InstanceKey) -> Option<AssetId>;

    /// World-space rotation, `None` for unknown keys.
    fn world_rotation(&self, key: InstanceKey) -> Option<Quat>;

    /// Append `key` and all of its descendants to `out`.
    fn collect_hierarchy(&self, key: InstanceKey, out: &mut Vec<InstanceKey>);

    /// `true` while an exclusive transform edit (gizmo drag) is in progress.
    ///
    /// Growth refuses to run while this returns `true`.
    fn transform_session_active(&self) -> bool {
        false
    }
}

/// Bounding volume computation.
pub trait BoundsProvider {
    /// World OBB over `key` and its descendants, counting only geometry whose
    /// kind is in `mask`. `None` if no such geometry exists.
    fn hierarchy_obb(&self, key: InstanceKey, mask: InstanceMask) -> Option<OBB>;

    /// World AABB over `key` and all of its descendants, regardless of kind.
    fn hierarchy_aabb(&self, key: InstanceKey) -> Option<AABB>;
}

/// Spatial overlap query service.
pub trait NeighborFinder {
    /// Append every instance whose geometry intersects `region` and passes
    /// `filter` to `results`, in the finder's own (stable) discovery order.
    fn query_overlap(&self, region: &OBB, filter: &OverlapFilter<'_>, results: &mut Vec<InstanceKey>);
}

/// Everything the growth engine needs from a scene.
pub trait GrowthHost: SceneQuery + BoundsProvider + NeighborFinder {}

impl<T: SceneQuery + BoundsProvider + NeighborFinder + ?Sized> GrowthHost for T {}
