//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// Unmodeled-state and empty-model errors are expected conditions the caller
/// can recover from, e.g., by not planning from a state-action pair yet.
/// [`TdrlError::InconsistentModel`] indicates a bug in frequency accounting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TdrlError {
    /// The queried state was never recorded in the transition model.
    #[error("State is not modeled: {0}")]
    UnmodeledState(String),

    /// A next state was requested from a transition model without transitions.
    #[error("Transition model is empty")]
    EmptyModel,

    /// Weighted sampling exhausted the states without selecting one.
    #[error("Transition model is inconsistent: {0}")]
    InconsistentModel(String),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Length of a parameter vector does not match the dimensionality.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected number of dimensions.
        expected: usize,
        /// Given number of dimensions.
        actual: usize,
    },

    /// A grid coordinate falls outside of the grid of its dimension.
    #[error("Grid coordinate {coordinate} is out of range in dimension {dimension}")]
    CoordinateOutOfRange {
        /// Index of the dimension.
        dimension: usize,
        /// The offending grid coordinate.
        coordinate: i64,
    },

    /// A parameter is NaN or infinite.
    #[error("Parameter {value} in dimension {dimension} is not finite")]
    NonFiniteParameter {
        /// Index of the dimension.
        dimension: usize,
        /// The offending parameter value.
        value: f32,
    },

    /// A feature index is outside of the weight table.
    #[error("Feature index {index} is out of range for {size} weights")]
    FeatureOutOfRange {
        /// The offending index.
        index: usize,
        /// Size of the weight table.
        size: usize,
    },

    /// Action selection over no actions.
    #[error("Action set is empty")]
    EmptyActionSet,

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}
