use glam::{Quat, Vec3};
use rustc_hash::FxHashSet;
use slotmap::SlotMap;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};
use crate::geometry::{Frustum, AABB, OBB};
use crate::grow::{AxisConstraint, GrowConstraintConfig, RotationConstraint};
use crate::scene::{AssetId, InstanceKey};
use super::*;

fn some_key() -> InstanceKey {
    let mut keys: SlotMap<InstanceKey, ()> = SlotMap::with_key();
    keys.insert(())
}

fn candidate_at(center: Vec3) -> Candidate {
    Candidate {
        key: some_key(),
        asset_id: None,
        center,
        rotation: Quat::IDENTITY,
        view_bounds: Some(AABB::from_center_half_extents(center, Vec3::splat(0.5))),
    }
}

fn neighborhood() -> Neighborhood {
    Neighborhood {
        source_rotation: Quat::IDENTITY,
        query_box: OBB::new(Vec3::ZERO, Vec3::splat(1.0), Quat::IDENTITY),
    }
}

fn origins(centers: &[Vec3]) -> OriginalPositions {
    OriginalPositions::from_centers(centers.to_vec())
}

// ============================================================================
// No constraints
// ============================================================================

#[test]
fn test_accepts_everything_when_unconstrained() {
    let config = GrowConstraintConfig::default();
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.accepts(&candidate_at(Vec3::new(100.0, -3.0, 7.0)), &neighborhood()));
}

// ============================================================================
// Identity
// ============================================================================

#[test]
fn test_identity_requires_seed_asset() {
    let config = GrowConstraintConfig::default().with_asset_identity(true);
    let origins = OriginalPositions::default();
    let identities: FxHashSet<AssetId> = [AssetId(1), AssetId(2)].into_iter().collect();
    let evaluator = ConstraintEvaluator::new(&config, &origins, identities, None);

    let mut candidate = candidate_at(Vec3::X);
    candidate.asset_id = Some(AssetId(2));
    assert!(evaluator.accepts(&candidate, &neighborhood()));

    candidate.asset_id = Some(AssetId(3));
    assert!(!evaluator.accepts(&candidate, &neighborhood()));

    candidate.asset_id = None;
    assert!(!evaluator.accepts(&candidate, &neighborhood()));
}

#[test]
fn test_identity_ignored_when_disabled() {
    let config = GrowConstraintConfig::default();
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    let mut candidate = candidate_at(Vec3::X);
    candidate.asset_id = Some(AssetId(99));
    assert!(evaluator.accepts(&candidate, &neighborhood()));
}

// ============================================================================
// Visibility
// ============================================================================

fn looking_down_negative_z() -> Frustum {
    let view = glam::Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
    let projection = glam::Mat4::perspective_rh(FRAC_PI_2, 1.0, 0.1, 100.0);
    Frustum::from_view_projection(&(projection * view))
}

#[test]
fn test_visibility_rejects_out_of_view() {
    let config = GrowConstraintConfig::default().with_ignore_out_of_view(true);
    let origins = OriginalPositions::default();
    let frustum = looking_down_negative_z();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), Some(&frustum));

    assert!(evaluator.accepts(&candidate_at(Vec3::new(0.0, 0.0, -10.0)), &neighborhood()));
    assert!(!evaluator.accepts(&candidate_at(Vec3::new(0.0, 0.0, 10.0)), &neighborhood()));
}

#[test]
fn test_visibility_treats_missing_bounds_as_visible() {
    let config = GrowConstraintConfig::default().with_ignore_out_of_view(true);
    let origins = OriginalPositions::default();
    let frustum = looking_down_negative_z();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), Some(&frustum));

    let mut candidate = candidate_at(Vec3::new(0.0, 0.0, 10.0));
    candidate.view_bounds = None;
    assert!(evaluator.accepts(&candidate, &neighborhood()));

    candidate.view_bounds = Some(AABB::EMPTY);
    assert!(evaluator.accepts(&candidate, &neighborhood()));
}

#[test]
fn test_visibility_without_frustum_accepts() {
    let config = GrowConstraintConfig::default().with_ignore_out_of_view(true);
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.accepts(&candidate_at(Vec3::new(0.0, 0.0, 10.0)), &neighborhood()));
}

#[test]
fn test_visibility_ignored_when_disabled() {
    let config = GrowConstraintConfig::default();
    let origins = OriginalPositions::default();
    let frustum = looking_down_negative_z();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), Some(&frustum));

    assert!(evaluator.accepts(&candidate_at(Vec3::new(0.0, 0.0, 10.0)), &neighborhood()));
}

// ============================================================================
// Positional
// ============================================================================

#[test]
fn test_positive_x_only() {
    let config = GrowConstraintConfig::default().with_x_axis(AxisConstraint::positive_only());
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.position_ok(Vec3::new(2.0, 0.0, 0.0)));
    assert!(!evaluator.position_ok(Vec3::new(-2.0, 0.0, 0.0)));
    // Off-axis offsets do not matter for the X test
    assert!(evaluator.position_ok(Vec3::new(2.0, 5.0, -5.0)));
}

#[test]
fn test_both_directions_is_symmetric() {
    let config = GrowConstraintConfig::default().with_x_axis(AxisConstraint::both_directions());
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    for d in [0.5, 2.0, 10.0] {
        assert_eq!(
            evaluator.position_ok(Vec3::new(d, 0.0, 0.0)),
            evaluator.position_ok(Vec3::new(-d, 0.0, 0.0))
        );
        assert!(evaluator.position_ok(Vec3::new(d, 0.0, 0.0)));
    }
}

#[test]
fn test_zero_projection_passes_directional_axis() {
    let config = GrowConstraintConfig::default().with_x_axis(AxisConstraint::positive_only());
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.position_ok(Vec3::new(0.0, 3.0, 0.0)));
}

#[test]
fn test_axis_threshold_measured_from_original_position() {
    let config = GrowConstraintConfig::default()
        .with_x_axis(AxisConstraint::both_directions().with_threshold(3.0));
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.position_ok(Vec3::new(3.0, 0.0, 0.0)));
    assert!(!evaluator.position_ok(Vec3::new(4.0, 0.0, 0.0)));
}

#[test]
fn test_any_single_origin_must_satisfy_all_axes() {
    // +X from one seed and +Y from the other, but neither alone
    let config = GrowConstraintConfig::default()
        .with_x_axis(AxisConstraint::positive_only())
        .with_y_axis(AxisConstraint::positive_only());
    let origins = origins(&[Vec3::new(0.0, 10.0, 0.0), Vec3::new(10.0, 0.0, 0.0)]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(!evaluator.position_ok(Vec3::new(5.0, 5.0, 0.0)));
    assert!(evaluator.position_ok(Vec3::new(11.0, 11.0, 0.0)));
}

#[test]
fn test_positional_without_origins_rejects() {
    let config = GrowConstraintConfig::default().with_x_axis(AxisConstraint::both_directions());
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(!evaluator.position_ok(Vec3::X));
}

#[test]
fn test_positional_uses_axis_frame() {
    // Frame rotated 90 degrees about Z: constraint X points along world +Y
    let config = GrowConstraintConfig::default()
        .with_axis_frame(Quat::from_rotation_z(FRAC_PI_2))
        .with_x_axis(AxisConstraint::positive_only());
    let origins = origins(&[Vec3::ZERO]);
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    assert!(evaluator.position_ok(Vec3::new(0.0, 2.0, 0.0)));
    assert!(!evaluator.position_ok(Vec3::new(0.0, -2.0, 0.0)));
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_exact_rotation_matches_source() {
    let config = GrowConstraintConfig::default().with_rotation(RotationConstraint::Exact);
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    let source = Quat::from_rotation_y(FRAC_PI_4);
    let hood = Neighborhood { source_rotation: source, ..neighborhood() };

    let mut candidate = candidate_at(Vec3::X);
    candidate.rotation = source;
    assert!(evaluator.accepts(&candidate, &hood));

    candidate.rotation = Quat::from_rotation_y(FRAC_PI_4 + 0.1);
    assert!(!evaluator.accepts(&candidate, &hood));
}

#[test]
fn test_exact_rotation_tolerates_float_noise() {
    let config = GrowConstraintConfig::default().with_rotation(RotationConstraint::Exact);
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    let mut candidate = candidate_at(Vec3::X);
    candidate.rotation = Quat::from_rotation_z(1e-6);
    assert!(evaluator.accepts(&candidate, &neighborhood()));
}

#[test]
fn test_flexible_rotation_accepts_quarter_turns() {
    let config = GrowConstraintConfig::default()
        .with_rotation(RotationConstraint::Flexible { max_angle: 0.1 });
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    let mut candidate = candidate_at(Vec3::X);
    for rotation in [Quat::IDENTITY, Quat::from_rotation_y(FRAC_PI_2), Quat::from_rotation_x(PI)] {
        candidate.rotation = rotation;
        assert!(evaluator.accepts(&candidate, &neighborhood()));
    }

    candidate.rotation = Quat::from_rotation_y(0.05);
    assert!(evaluator.accepts(&candidate, &neighborhood()));

    candidate.rotation = Quat::from_rotation_y(FRAC_PI_4);
    assert!(!evaluator.accepts(&candidate, &neighborhood()));
}

#[test]
fn test_flexible_rotation_anchors_to_query_box() {
    let config = GrowConstraintConfig::default()
        .with_rotation(RotationConstraint::Flexible { max_angle: 0.1 });
    let origins = OriginalPositions::default();
    let evaluator = ConstraintEvaluator::new(&config, &origins, FxHashSet::default(), None);

    let tilted = Quat::from_rotation_y(FRAC_PI_4);
    let hood = Neighborhood {
        source_rotation: Quat::IDENTITY,
        query_box: OBB::new(Vec3::ZERO, Vec3::ONE, tilted),
    };

    let mut candidate = candidate_at(Vec3::X);
    candidate.rotation = tilted;
    assert!(evaluator.accepts(&candidate, &hood));

    candidate.rotation = Quat::IDENTITY;
    assert!(!evaluator.accepts(&candidate, &hood));
}

// ============================================================================
// OriginalPositions
// ============================================================================

#[test]
fn test_original_positions_from_centers() {
    let positions = origins(&[Vec3::X, Vec3::Y]);
    assert_eq!(positions.len(), 2);
    assert!(!positions.is_empty());
    assert_eq!(positions.centers(), &[Vec3::X, Vec3::Y]);
    assert!(OriginalPositions::default().is_empty());
}
