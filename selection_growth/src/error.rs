//! Error types for the selection growth engine
//!
//! Growth itself degrades gracefully and never fails mid-run. Errors only
//! surface for invalid constraint configurations and for scene edits that
//! reference unknown instances or would corrupt the hierarchy.

use std::fmt;

/// Result type for selection growth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Selection growth errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A constraint configuration value is out of range
    InvalidConfig(String),

    /// An instance key does not refer to a live scene instance
    UnknownInstance(String),

    /// A parent/child edit would break the scene hierarchy (cycle, self-parenting)
    InvalidHierarchy(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
            Error::UnknownInstance(msg) => write!(f, "Unknown instance: {}", msg),
            Error::InvalidHierarchy(msg) => write!(f, "Invalid hierarchy: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

/// Build an [`Error`] variant, logging it at ERROR severity first.
///
/// # Example
///
/// ```ignore
/// return Err(grow_err!("growth::Config", InvalidConfig,
///     "distance threshold must be positive, got {}", value));
/// ```
#[macro_export]
macro_rules! grow_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::grow_error!($source, "{}", message);
        $crate::growth::Error::$variant(message)
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
