//! Grow module
//!
//! Expands a selection to nearby instances that satisfy a set of
//! constraints, one breadth-first pass at a time.

mod selection;
mod config;
mod constraint;
mod grower;

pub use selection::SelectionSet;
pub use config::{
    AxisConstraint, RotationConstraint, GrowConstraintConfig,
    DEFAULT_DISTANCE_THRESHOLD, MIN_DISTANCE_THRESHOLD,
};
pub use constraint::{
    Candidate, Neighborhood, OriginalPositions, ConstraintEvaluator,
    AXIS_EPSILON, EULER_EPSILON,
};
pub use grower::{SelectionGrower, GrowOutcome, GrowReport, RefusalReason};
