//! Error handling for threadmill
//!
//! Provides the validation taxonomy used by the thread milling engine:
//! - Geometry errors (thread dimensions, plane heights)
//! - Pass count errors (radial split policy)
//! - Tool errors (cutter dimensions and cutting data)
//! - Speed/feed errors (degenerate derived values)
//!
//! Every validation error names the offending field and the constraint it
//! violated. All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Validation error raised before any toolpath is synthesized
///
/// None of these are ever corrected silently: the caller surfaces the
/// specific constraint to the user and no program text is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThreadMillError {
    /// Inconsistent or non-positive thread dimensions
    #[error("Invalid geometry: '{field}' {constraint}")]
    InvalidGeometry {
        /// The offending field.
        field: String,
        /// The violated constraint.
        constraint: String,
    },

    /// Radial pass count outside the published tables
    #[error("Invalid pass count {count}: must be 1, 2, 3 or 4")]
    InvalidPassCount {
        /// The requested pass count.
        count: i64,
    },

    /// Cutter dimensions or cutting data are unusable
    #[error("Invalid tool: '{field}' {constraint}")]
    InvalidTool {
        /// The offending field.
        field: String,
        /// The violated constraint.
        constraint: String,
    },

    /// Derived spindle speed or feed rate is degenerate
    #[error("Invalid speed/feed: '{field}' {constraint}")]
    InvalidSpeedFeed {
        /// The offending derived value.
        field: String,
        /// The violated constraint.
        constraint: String,
    },
}

impl ThreadMillError {
    /// Build an [`ThreadMillError::InvalidGeometry`]
    pub fn geometry(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Build an [`ThreadMillError::InvalidTool`]
    pub fn tool(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::InvalidTool {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Build an [`ThreadMillError::InvalidSpeedFeed`]
    pub fn speed_feed(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::InvalidSpeedFeed {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Name of the field that failed validation, if the error carries one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidGeometry { field, .. }
            | Self::InvalidTool { field, .. }
            | Self::InvalidSpeedFeed { field, .. } => Some(field),
            Self::InvalidPassCount { .. } => None,
        }
    }
}

/// Main error type for threadmill
///
/// A unified error type for callers that mix engine validation with I/O.
#[derive(Error, Debug)]
pub enum Error {
    /// Engine validation error
    #[error(transparent)]
    ThreadMill(#[from] ThreadMillError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an engine validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::ThreadMill(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for engine validation
pub type ThreadMillResult<T> = std::result::Result<T, ThreadMillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ThreadMillError::geometry("minor_diameter", "must be less than major_diameter");
        assert_eq!(
            err.to_string(),
            "Invalid geometry: 'minor_diameter' must be less than major_diameter"
        );

        let err = ThreadMillError::InvalidPassCount { count: 5 };
        assert_eq!(err.to_string(), "Invalid pass count 5: must be 1, 2, 3 or 4");

        let err = ThreadMillError::tool("surface_speed_sfm", "must be > 0");
        assert_eq!(err.to_string(), "Invalid tool: 'surface_speed_sfm' must be > 0");
    }

    #[test]
    fn test_field_accessor() {
        let err = ThreadMillError::speed_feed("spindle_rpm", "must be finite");
        assert_eq!(err.field(), Some("spindle_rpm"));
        assert_eq!(ThreadMillError::InvalidPassCount { count: 0 }.field(), None);
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ThreadMillError::InvalidPassCount { count: 7 }.into();
        assert!(err.is_validation_error());
        assert_eq!(err.to_string(), "Invalid pass count 7: must be 1, 2, 3 or 4");

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(!err.is_validation_error());
        assert!(matches!(err, Error::Io(_)));
    }
}
