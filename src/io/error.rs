//! Error types for model construction, closure evaluation and output

use std::fmt;
use std::path::PathBuf;

use crate::model::{State, Time};

/// Main error type for all estimation operations
#[derive(Debug)]
pub enum RisqError {
    /// Transition model failed validation at construction time
    InvalidModel {
        /// Description of what's wrong with the model
        reason: String,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Queried state is not part of the model
    InvalidState {
        /// The invalid state index
        state: State,
        /// Number of states in the model
        num_states: usize,
    },

    /// Pattern shape the closure engines cannot evaluate
    UnsupportedPattern {
        /// Number of cells in the offending pattern
        length: usize,
    },

    /// A probability left the unit interval by more than the tolerance
    ///
    /// Self-consistent models never produce this; it points at a modeling bug
    /// rather than floating-point noise.
    Inconsistency {
        /// Name of the computation that produced the value
        operation: &'static str,
        /// Time step of the offending value
        time: Time,
        /// The offending value
        value: f64,
    },

    /// Failed to save an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Numerical computation produced invalid result
    Computation {
        /// Name of the computation that failed
        operation: &'static str,
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for RisqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidModel { reason } => {
                write!(f, "Invalid model: {reason}")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidState { state, num_states } => {
                write!(
                    f,
                    "State {state} is out of bounds (model has {num_states} states)"
                )
            }
            Self::UnsupportedPattern { length } => {
                write!(f, "Unsupported pattern of length {length}")
            }
            Self::Inconsistency {
                operation,
                time,
                value,
            } => {
                write!(
                    f,
                    "Inconsistent probability {value} in {operation} at time {time}"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Computation { operation, reason } => {
                write!(f, "Computation error in {operation}: {reason}")
            }
        }
    }
}

impl std::error::Error for RisqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for estimation results
pub type Result<T> = std::result::Result<T, RisqError>;

impl From<std::io::Error> for RisqError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<stdout>"),
            operation: "write",
            source: err,
        }
    }
}

/// Create an invalid model error
pub fn invalid_model(reason: &impl ToString) -> RisqError {
    RisqError::InvalidModel {
        reason: reason.to_string(),
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> RisqError {
    RisqError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a computation error
pub fn computation_error(operation: &'static str, reason: &impl ToString) -> RisqError {
    RisqError::Computation {
        operation,
        reason: reason.to_string(),
    }
}
