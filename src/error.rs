//! Error types for model construction, solving, and cross-checking

use thiserror::Error;

/// Errors returned by the modeling and checking layers of this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Objective or variable values were read before `solve` completed.
    #[error("objective value not computed yet (solve has not run)")]
    NotComputed,

    /// A bounded-k constraint generator was invoked with an unsupported k.
    ///
    /// Only k = 2 and k = 3 have known closed-form inequalities.
    #[error("unsupported cluster bound k = {k} (only k = 2 and k = 3 are supported)")]
    UnsupportedK {
        /// The requested bound.
        k: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// The input matrix is not a valid signed graph.
    #[error("invalid signed graph: {0}")]
    InvalidGraph(String),

    /// Two or more models disagree on the optimal objective value.
    #[error("objective value mismatch across models: {}",
        .objectives.iter().map(|(n, v)| format!("{n}={v}")).collect::<Vec<_>>().join(", "))]
    ObjectiveMismatch {
        /// Per-model objective values, in run order.
        objectives: Vec<(String, u64)>,
    },

    /// The supplied known-optimal objective disagrees with the models.
    #[error("baseline mismatch: expected {expected}, actual {actual}")]
    BaselineMismatch {
        /// The known-optimal value supplied by the caller.
        expected: u64,
        /// The value the models agreed on.
        actual: u64,
    },

    /// The solver reported infeasibility.
    ///
    /// No encoding in this crate is infeasible for a valid signed graph, so
    /// this always indicates a modeling bug and is fatal.
    #[error("solver reported infeasible status for model {model}")]
    Infeasible {
        /// Name of the model whose solve failed.
        model: String,
    },
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
