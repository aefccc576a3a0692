/// Oriented bounding box.
///
/// The growth engine builds one OBB per frontier member (its hierarchy
/// bounds, inflated by the distance threshold) and asks the host which
/// instances overlap it. Overlap uses the separating axis theorem over the
/// 15 candidate axes of two boxes.

use glam::{Mat3, Mat4, Quat, Vec3};
use super::aabb::AABB;

/// Tolerance added to the rotation terms of the SAT test so that nearly
/// parallel edge pairs do not produce false separations.
const SAT_EPSILON: f32 = 1e-6;

/// Oriented Bounding Box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OBB {
    /// World-space center
    pub center: Vec3,
    /// Half size along each local axis (always >= 0 for a valid box)
    pub half_extents: Vec3,
    /// Orientation of the local axes
    pub rotation: Quat,
}

impl OBB {
    /// Create a box from center, half extents, and rotation.
    pub fn new(center: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self { center, half_extents, rotation }
    }

    /// Axis-aligned box viewed as an OBB with identity rotation.
    pub fn from_aabb(aabb: &AABB) -> Self {
        Self {
            center: aabb.center(),
            half_extents: aabb.half_extents(),
            rotation: Quat::IDENTITY,
        }
    }

    /// Place a local-space box in the world.
    ///
    /// The matrix is decomposed into scale, rotation and translation; the
    /// absolute scale is folded into the half extents. Shear from non-uniform
    /// parent scales is not representable and is dropped.
    pub fn from_local_aabb(local: &AABB, world: &Mat4) -> Self {
        let (scale, rotation, _) = world.to_scale_rotation_translation();
        Self {
            center: world.transform_point3(local.center()),
            half_extents: local.half_extents() * scale.abs(),
            rotation,
        }
    }

    /// The three unit local axes in world space.
    pub fn axes(&self) -> [Vec3; 3] {
        let m = Mat3::from_quat(self.rotation);
        [m.x_axis, m.y_axis, m.z_axis]
    }

    /// Grow the box by `amount` in total along every axis.
    ///
    /// Inflation is symmetric: each face moves out by `amount / 2`.
    pub fn inflated(&self, amount: f32) -> OBB {
        OBB {
            half_extents: self.half_extents + Vec3::splat(amount * 0.5),
            ..*self
        }
    }

    /// The eight world-space corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let [x, y, z] = self.axes();
        let h = self.half_extents;
        std::array::from_fn(|i| {
            let sx = if i & 1 == 0 { -h.x } else { h.x };
            let sy = if i & 2 == 0 { -h.y } else { h.y };
            let sz = if i & 4 == 0 { -h.z } else { h.z };
            self.center + x * sx + y * sy + z * sz
        })
    }

    /// Smallest world AABB enclosing this box.
    pub fn to_aabb(&self) -> AABB {
        let [x, y, z] = self.axes();
        let h = self.half_extents;
        let extent = x.abs() * h.x + y.abs() * h.y + z.abs() * h.z;
        AABB::from_center_half_extents(self.center, extent)
    }

    /// `false` for non-finite data, negative extents, a zero-size box, or a
    /// rotation that is not a unit quaternion.
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.half_extents.is_finite()
            && self.half_extents.cmpge(Vec3::ZERO).all()
            && self.half_extents != Vec3::ZERO
            && self.rotation.is_finite()
            && self.rotation.is_normalized()
    }

    /// Test if a world point lies inside or on the boundary.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let d = point - self.center;
        let [x, y, z] = self.axes();
        let h = self.half_extents;
        d.dot(x).abs() <= h.x && d.dot(y).abs() <= h.y && d.dot(z).abs() <= h.z
    }

    /// Separating-axis overlap test against another OBB.
    ///
    /// Touching boxes count as overlapping.
    pub fn intersects(&self, other: &OBB) -> bool {
        let a = self.axes();
        let b = other.axes();
        let ea = self.half_extents;
        let eb = other.half_extents;

        // Rotation of `other` expressed in `self`'s frame
        let mut r = [[0.0f32; 3]; 3];
        let mut abs_r = [[0.0f32; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                r[i][j] = a[i].dot(b[j]);
                abs_r[i][j] = r[i][j].abs() + SAT_EPSILON;
            }
        }

        let d = other.center - self.center;
        let t = [d.dot(a[0]), d.dot(a[1]), d.dot(a[2])];

        // Axes of self
        for i in 0..3 {
            let ra = ea[i];
            let rb = eb[0] * abs_r[i][0] + eb[1] * abs_r[i][1] + eb[2] * abs_r[i][2];
            if t[i].abs() > ra + rb {
                return false;
            }
        }

        // Axes of other
        for j in 0..3 {
            let ra = ea[0] * abs_r[0][j] + ea[1] * abs_r[1][j] + ea[2] * abs_r[2][j];
            let rb = eb[j];
            let tj = t[0] * r[0][j] + t[1] * r[1][j] + t[2] * r[2][j];
            if tj.abs() > ra + rb {
                return false;
            }
        }

        // Cross products a[i] x b[j]
        for i in 0..3 {
            let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
            for j in 0..3 {
                let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
                let ra = ea[i1] * abs_r[i2][j] + ea[i2] * abs_r[i1][j];
                let rb = eb[j1] * abs_r[i][j2] + eb[j2] * abs_r[i][j1];
                let tl = t[i2] * r[i1][j] - t[i1] * r[i2][j];
                if tl.abs() > ra + rb {
                    return false;
                }
            }
        }

        true
    }

    /// Overlap test against a world AABB.
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        self.intersects(&OBB::from_aabb(aabb))
    }
}

#[cfg(test)]
#[path = "obb_tests.rs"]
mod tests;
