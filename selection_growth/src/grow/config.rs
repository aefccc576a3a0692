/// Growth constraint configuration.
///
/// A plain settings snapshot. The editor owns and persists it; the growth
/// engine reads it once per run and never mutates it. Defaults match the
/// least constrained behavior: grow to every growable instance within the
/// distance threshold.

use glam::{Quat, Vec3};
use crate::error::Result;
use crate::scene::InstanceMask;

const SOURCE: &str = "growth::GrowConstraintConfig";

/// Distance thresholds below this are raised to it before inflating query boxes.
pub const MIN_DISTANCE_THRESHOLD: f32 = 0.001;

/// Default reach between neighboring instances (world units).
pub const DEFAULT_DISTANCE_THRESHOLD: f32 = 0.1;

/// Directional constraint along one axis of the constraint frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisConstraint {
    /// The axis participates in the positional test
    pub enabled: bool,
    /// Candidates may lie on the positive side of a seed
    pub allow_positive: bool,
    /// Candidates may lie on the negative side of a seed
    pub allow_negative: bool,
    /// Maximum |offset| from a seed along this axis, if any
    pub threshold: Option<f32>,
}

impl AxisConstraint {
    /// Disabled axis (allows both directions once enabled).
    pub const DISABLED: AxisConstraint = AxisConstraint {
        enabled: false,
        allow_positive: true,
        allow_negative: true,
        threshold: None,
    };

    /// Enabled, both directions, no threshold.
    pub fn both_directions() -> Self {
        Self { enabled: true, ..Self::DISABLED }
    }

    /// Enabled, positive side only.
    pub fn positive_only() -> Self {
        Self { enabled: true, allow_negative: false, ..Self::DISABLED }
    }

    /// Enabled, negative side only.
    pub fn negative_only() -> Self {
        Self { enabled: true, allow_positive: false, ..Self::DISABLED }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Test a signed offset from a seed along this axis.
    ///
    /// Offsets within `tolerance` of zero lie on the seed's plane and
    /// count as permitted whenever either direction is allowed.
    pub fn permits(&self, offset: f32, tolerance: f32) -> bool {
        let direction_ok = if offset > tolerance {
            self.allow_positive
        } else if offset < -tolerance {
            self.allow_negative
        } else {
            self.allow_positive || self.allow_negative
        };

        direction_ok && self.threshold.map_or(true, |limit| offset.abs() <= limit)
    }
}

impl Default for AxisConstraint {
    fn default() -> Self {
        Self::DISABLED
    }
}

/// Rotation compatibility between a candidate and the instance it was found from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RotationConstraint {
    /// Rotation is ignored
    #[default]
    None,
    /// World Euler angles must match the expanding instance's, component-wise
    Exact,
    /// Every local axis must lie within `max_angle` (radians) of an axis of the query box
    Flexible {
        max_angle: f32,
    },
}

/// Snapshot of all growth constraints for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowConstraintConfig {
    /// Gap allowed between neighboring instances' bounds
    pub distance_threshold: f32,
    /// Orientation of the X/Y/Z constraint axes (grid frame); identity = world axes
    pub axis_frame: Quat,
    pub x_axis: AxisConstraint,
    pub y_axis: AxisConstraint,
    pub z_axis: AxisConstraint,
    /// Candidates must share an asset identity with some seed
    pub match_asset_identity: bool,
    pub rotation: RotationConstraint,
    pub use_max_count: bool,
    /// Cap on the total selection size (seeds included) when `use_max_count` is set
    pub max_count: usize,
    /// Candidates whose hierarchy bounds are outside the view frustum are rejected
    pub ignore_out_of_view: bool,
    /// Kinds that may act as growth sources and be discovered as candidates
    pub growable_kinds: InstanceMask,
    /// Kinds whose geometry contributes to hierarchy bounds
    pub bounds_kinds: InstanceMask,
}

impl Default for GrowConstraintConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            axis_frame: Quat::IDENTITY,
            x_axis: AxisConstraint::DISABLED,
            y_axis: AxisConstraint::DISABLED,
            z_axis: AxisConstraint::DISABLED,
            match_asset_identity: false,
            rotation: RotationConstraint::None,
            use_max_count: false,
            max_count: 100,
            ignore_out_of_view: false,
            growable_kinds: InstanceMask::GROWABLE,
            bounds_kinds: InstanceMask::RENDERABLE,
        }
    }
}

impl GrowConstraintConfig {
    // ===== BUILDERS =====

    pub fn with_distance_threshold(mut self, threshold: f32) -> Self {
        self.distance_threshold = threshold;
        self
    }

    pub fn with_axis_frame(mut self, frame: Quat) -> Self {
        self.axis_frame = frame;
        self
    }

    pub fn with_x_axis(mut self, axis: AxisConstraint) -> Self {
        self.x_axis = axis;
        self
    }

    pub fn with_y_axis(mut self, axis: AxisConstraint) -> Self {
        self.y_axis = axis;
        self
    }

    pub fn with_z_axis(mut self, axis: AxisConstraint) -> Self {
        self.z_axis = axis;
        self
    }

    pub fn with_asset_identity(mut self, enabled: bool) -> Self {
        self.match_asset_identity = enabled;
        self
    }

    pub fn with_rotation(mut self, rotation: RotationConstraint) -> Self {
        self.rotation = rotation;
        self
    }

    /// Enable the max-count constraint with the given cap.
    pub fn with_max_count(mut self, max_count: usize) -> Self {
        self.use_max_count = true;
        self.max_count = max_count;
        self
    }

    pub fn with_ignore_out_of_view(mut self, enabled: bool) -> Self {
        self.ignore_out_of_view = enabled;
        self
    }

    pub fn with_growable_kinds(mut self, kinds: InstanceMask) -> Self {
        self.growable_kinds = kinds;
        self
    }

    pub fn with_bounds_kinds(mut self, kinds: InstanceMask) -> Self {
        self.bounds_kinds = kinds;
        self
    }

    // ===== DERIVED VALUES =====

    /// Total amount added to each query box dimension.
    ///
    /// Inflation is symmetric, so the one-sided reach equals the threshold.
    pub fn query_inflation(&self) -> f32 {
        2.0 * self.distance_threshold.max(MIN_DISTANCE_THRESHOLD)
    }

    /// The cap, if the max-count constraint is enabled.
    pub fn count_cap(&self) -> Option<usize> {
        self.use_max_count.then_some(self.max_count)
    }

    /// The three constraint axes in world space, paired with their settings.
    pub fn axes(&self) -> [(Vec3, &AxisConstraint); 3] {
        [
            (self.axis_frame * Vec3::X, &self.x_axis),
            (self.axis_frame * Vec3::Y, &self.y_axis),
            (self.axis_frame * Vec3::Z, &self.z_axis),
        ]
    }

    /// Number of enabled axis constraints.
    pub fn active_axis_count(&self) -> usize {
        self.axes().iter().filter(|(_, axis)| axis.enabled).count()
    }

    pub fn has_positional_constraint(&self) -> bool {
        self.active_axis_count() > 0
    }

    // ===== VALIDATION =====

    /// Check every value is in range.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.distance_threshold.is_finite() || self.distance_threshold <= 0.0 {
            return Err(crate::grow_err!(SOURCE, InvalidConfig,
                "distance threshold must be a positive number, got {}", self.distance_threshold));
        }

        if !self.axis_frame.is_finite() || !self.axis_frame.is_normalized() {
            return Err(crate::grow_err!(SOURCE, InvalidConfig,
                "axis frame must be a unit quaternion, got {:?}", self.axis_frame));
        }

        for (name, axis) in [("X", &self.x_axis), ("Y", &self.y_axis), ("Z", &self.z_axis)] {
            if !axis.enabled {
                continue;
            }
            if !axis.allow_positive && !axis.allow_negative {
                return Err(crate::grow_err!(SOURCE, InvalidConfig,
                    "{} axis constraint allows neither direction", name));
            }
            if let Some(threshold) = axis.threshold {
                if !threshold.is_finite() || threshold < 0.0 {
                    return Err(crate::grow_err!(SOURCE, InvalidConfig,
                        "{} axis threshold must be >= 0, got {}", name, threshold));
                }
            }
        }

        if let RotationConstraint::Flexible { max_angle } = self.rotation {
            if !max_angle.is_finite() || !(0.0..=std::f32::consts::FRAC_PI_2).contains(&max_angle) {
                return Err(crate::grow_err!(SOURCE, InvalidConfig,
                    "flexible rotation angle must be within [0, PI/2], got {}", max_angle));
            }
        }

        if self.use_max_count && self.max_count == 0 {
            return Err(crate::grow_err!(SOURCE, InvalidConfig,
                "max count must be > 0 when the max-count constraint is enabled"));
        }

        if self.growable_kinds.is_empty() {
            return Err(crate::grow_err!(SOURCE, InvalidConfig,
                "growable kinds mask is empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
