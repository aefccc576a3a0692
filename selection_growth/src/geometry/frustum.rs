/// Frustum — six clipping planes for the "ignore out of view" constraint.
///
/// Each plane is represented as a Vec4 (A, B, C, D) where:
/// - (A, B, C) is the inward-pointing unit normal
/// - D is the signed distance
/// - A point P is inside if dot(plane, P_homogeneous) >= 0 for all planes
///
/// The host supplies the frustum of its active viewport; the growth engine
/// only tests candidate hierarchy bounds against it.

use glam::{Mat4, Vec3, Vec4};
use super::aabb::AABB;

/// Frustum plane indices
pub const PLANE_LEFT: usize = 0;
pub const PLANE_RIGHT: usize = 1;
pub const PLANE_BOTTOM: usize = 2;
pub const PLANE_TOP: usize = 3;
pub const PLANE_NEAR: usize = 4;
pub const PLANE_FAR: usize = 5;

/// Six frustum planes: left, right, bottom, top, near, far.
///
/// Works with both perspective and orthographic projections that map depth
/// to [0, 1] in clip space, as glam's `*_rh` and `*_lh` projections do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Frustum planes, indexed by the `PLANE_*` constants
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Build a frustum from explicit planes, normalizing each one.
    pub fn from_planes(planes: [Vec4; 6]) -> Self {
        Self { planes: planes.map(normalize_plane) }
    }

    /// Extract frustum planes from a view-projection matrix.
    ///
    /// Gribb & Hartmann: each side plane is a sum or difference of the fourth
    /// row with one of the first two rows. With [0, 1] clip depth the near
    /// plane is the third row alone (`z >= 0`), the far plane `w - z >= 0`.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let row = |i: usize| vp.row(i);
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));

        Self::from_planes([
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near
            r3 - r2, // far
        ])
    }

    /// Test if an AABB intersects this frustum.
    ///
    /// For each plane, only the corner most aligned with the normal (the
    /// "positive vertex") needs testing. Conservative: may return false
    /// positives near frustum corners, never false negatives.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.planes.iter().all(|plane| signed_distance(plane, positive_vertex(plane, aabb)) >= 0.0)
    }

    /// Test if a point is inside all six planes.
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes.iter().all(|plane| signed_distance(plane, point) >= 0.0)
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let normal_len = plane.truncate().length();
    if normal_len > 0.0 { plane / normal_len } else { plane }
}

fn signed_distance(plane: &Vec4, point: Vec3) -> f32 {
    plane.truncate().dot(point) + plane.w
}

/// Corner of the box furthest along the plane normal.
fn positive_vertex(plane: &Vec4, aabb: &AABB) -> Vec3 {
    Vec3::select(plane.truncate().cmpge(Vec3::ZERO), aabb.max, aabb.min)
}

#[cfg(test)]
#[path = "frustum_tests.rs"]
mod tests;
