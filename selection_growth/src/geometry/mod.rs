//! Geometry module — bounding volumes and view frustum.
//!
//! Passive value types used by the growth engine and by scene hosts:
//! axis-aligned boxes for broad-phase and visibility tests, oriented boxes
//! for neighborhood queries, and six-plane frustums for view culling.

mod aabb;
mod obb;
mod frustum;

pub use aabb::AABB;
pub use obb::OBB;
pub use frustum::{
    Frustum,
    PLANE_LEFT, PLANE_RIGHT, PLANE_BOTTOM, PLANE_TOP, PLANE_NEAR, PLANE_FAR,
};
