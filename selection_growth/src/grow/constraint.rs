/// Constraint evaluation for growth candidates.
///
/// ConstraintEvaluator decides whether a discovered grouping root may join
/// the selection. Checks run cheapest first and short-circuit:
///
/// 1. Identity: the candidate's asset id is one of the seeds' ids
/// 2. Visibility: the candidate's hierarchy AABB intersects the view frustum
/// 3. Positional: some seed position satisfies every enabled axis
/// 4. Rotation: exact or flexible match
///
/// The evaluator is pure: it reads a per-run snapshot and never touches the host.

use glam::{EulerRot, Quat, Vec3};
use rustc_hash::FxHashSet;
use crate::geometry::{Frustum, AABB, OBB};
use crate::host::BoundsProvider;
use crate::scene::{AssetId, InstanceKey, InstanceMask};
use super::config::{GrowConstraintConfig, RotationConstraint};
use super::selection::SelectionSet;

/// Projections within this distance of zero lie on the seed's plane.
pub const AXIS_EPSILON: f32 = 1e-5;

/// Per-component tolerance (radians) for exact rotation matching.
pub const EULER_EPSILON: f32 = 1e-4;

// ===== ORIGINAL POSITIONS =====

/// Bounding-volume centers of the seeds, captured once at the start of a run.
///
/// Positional constraints are measured from these, never from the frontier,
/// so directional growth cannot drift away from where the user started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OriginalPositions {
    centers: Vec<Vec3>,
}

impl OriginalPositions {
    /// Snapshot the hierarchy OBB center of every seed with valid bounds.
    pub fn snapshot<H: BoundsProvider + ?Sized>(host: &H, seeds: &SelectionSet, mask: InstanceMask) -> Self {
        let centers = seeds
            .iter()
            .filter_map(|key| host.hierarchy_obb(key, mask))
            .filter(OBB::is_valid)
            .map(|obb| obb.center)
            .collect();
        Self { centers }
    }

    pub fn from_centers(centers: Vec<Vec3>) -> Self {
        Self { centers }
    }

    pub fn centers(&self) -> &[Vec3] {
        &self.centers
    }

    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }
}

// ===== CANDIDATE / NEIGHBORHOOD =====

/// Everything the evaluator needs to know about a candidate grouping root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub key: InstanceKey,
    pub asset_id: Option<AssetId>,
    /// Center of the candidate's hierarchy OBB
    pub center: Vec3,
    /// World rotation of the candidate root
    pub rotation: Quat,
    /// Hierarchy AABB for the visibility test (None = treated as visible)
    pub view_bounds: Option<AABB>,
}

/// The frontier member a candidate was discovered from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    /// World rotation of the expanding frontier member
    pub source_rotation: Quat,
    /// The inflated query box that found the candidate
    pub query_box: OBB,
}

// ===== EVALUATOR =====

pub struct ConstraintEvaluator<'a> {
    config: &'a GrowConstraintConfig,
    origins: &'a OriginalPositions,
    /// Asset ids of the seeds (only consulted when identity matching is on)
    seed_identities: FxHashSet<AssetId>,
    /// Frustum for the visibility test (None = everything is visible)
    view: Option<&'a Frustum>,
}

impl<'a> ConstraintEvaluator<'a> {
    pub fn new(
        config: &'a GrowConstraintConfig,
        origins: &'a OriginalPositions,
        seed_identities: FxHashSet<AssetId>,
        view: Option<&'a Frustum>,
    ) -> Self {
        Self { config, origins, seed_identities, view }
    }

    /// `true` if the candidate passes every enabled constraint.
    pub fn accepts(&self, candidate: &Candidate, neighborhood: &Neighborhood) -> bool {
        self.identity_ok(candidate)
            && self.visibility_ok(candidate)
            && self.position_ok(candidate.center)
            && self.rotation_ok(candidate.rotation, neighborhood)
    }

    fn identity_ok(&self, candidate: &Candidate) -> bool {
        if !self.config.match_asset_identity {
            return true;
        }
        candidate.asset_id.is_some_and(|id| self.seed_identities.contains(&id))
    }

    fn visibility_ok(&self, candidate: &Candidate) -> bool {
        if !self.config.ignore_out_of_view {
            return true;
        }
        match (self.view, candidate.view_bounds.filter(AABB::is_valid)) {
            (Some(frustum), Some(bounds)) => frustum.intersects_aabb(&bounds),
            _ => true,
        }
    }

    /// Some single original position must satisfy all enabled axes at once.
    pub fn position_ok(&self, center: Vec3) -> bool {
        let axes = self.config.axes();
        if axes.iter().all(|(_, axis)| !axis.enabled) {
            return true;
        }

        self.origins.centers().iter().any(|&origin| {
            let offset = center - origin;
            axes.iter()
                .filter(|(_, axis)| axis.enabled)
                .all(|(direction, axis)| axis.permits(offset.dot(*direction), AXIS_EPSILON))
        })
    }

    fn rotation_ok(&self, rotation: Quat, neighborhood: &Neighborhood) -> bool {
        match self.config.rotation {
            RotationConstraint::None => true,
            RotationConstraint::Exact => euler_matches(rotation, neighborhood.source_rotation),
            RotationConstraint::Flexible { max_angle } => {
                axes_aligned(rotation, neighborhood.query_box.rotation, max_angle)
            }
        }
    }
}

/// Component-wise XYZ Euler comparison, modulo full turns.
fn euler_matches(a: Quat, b: Quat) -> bool {
    let (ax, ay, az) = a.to_euler(EulerRot::XYZ);
    let (bx, by, bz) = b.to_euler(EulerRot::XYZ);
    [(ax, bx), (ay, by), (az, bz)]
        .iter()
        .all(|&(x, y)| angle_difference(x, y) <= EULER_EPSILON)
}

fn angle_difference(a: f32, b: f32) -> f32 {
    let d = (a - b).rem_euclid(std::f32::consts::TAU);
    d.min(std::f32::consts::TAU - d)
}

/// Every local axis of `rotation` lies within `max_angle` of some axis of
/// `reference` (either sign).
fn axes_aligned(rotation: Quat, reference: Quat, max_angle: f32) -> bool {
    let reference_axes = [reference * Vec3::X, reference * Vec3::Y, reference * Vec3::Z];
    let min_cos = max_angle.cos();

    [Vec3::X, Vec3::Y, Vec3::Z].iter().all(|&local| {
        let axis = rotation * local;
        reference_axes
            .iter()
            .any(|r| axis.dot(*r).abs() >= min_cos - AXIS_EPSILON)
    })
}

#[cfg(test)]
#[path = "constraint_tests.rs"]
mod tests;
