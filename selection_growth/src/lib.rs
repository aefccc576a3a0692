/*!
# Selection Growth

Constraint-driven selection growth for level editors.

Starting from a set of selected instances, the engine repeatedly queries the
neighborhood of every newly selected instance and adds the neighbors that pass
a configurable set of constraints (direction, identity, rotation, visibility,
count). Growth is breadth-first over an implicit graph: neighbors are
discovered on demand through spatial overlap queries, never precomputed.

## Architecture

- **SelectionGrower**: the breadth-first growth run
- **ConstraintEvaluator**: pure accept/reject decision per candidate
- **GrowConstraintConfig**: the settings snapshot for one run
- **SceneQuery / BoundsProvider / NeighborFinder**: host contracts the engine reads through
- **Scene**: in-memory reference host, with an optional octree broad phase

The engine never owns scene data. Hosts implement the three contracts and
receive the grown selection back.
*/

// Internal modules
mod error;
pub mod log;
pub mod geometry;
pub mod scene;
pub mod host;
pub mod grow;

// Main growth namespace module
pub mod growth {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        pub use crate::log::{set_logger, reset_logger, set_min_severity, min_severity};
    }

    // Geometry sub-module
    pub mod geometry {
        pub use crate::geometry::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Host contracts
    pub mod host {
        pub use crate::host::*;
    }

    // Growth engine
    pub use crate::grow::{
        SelectionSet,
        GrowConstraintConfig, AxisConstraint, RotationConstraint,
        ConstraintEvaluator, OriginalPositions, Candidate, Neighborhood,
        SelectionGrower, GrowOutcome, GrowReport, RefusalReason,
    };
}

// Re-export math library at crate root
pub use glam;
