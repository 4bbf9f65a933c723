use thiserror::Error;

/// The errors raised while building a TCPC model or decoding a solution.
///
/// None of these errors is transient: retrying the same operation with the same input fails the same way.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TcpcError {
    /// The number of students cannot be seated at full 2-seat and 3-seat tables.
    #[error("invalid class size {n_students}: {reason}")]
    InvalidSize {
        /// the number of students
        n_students: usize,
        /// a human readable explanation
        reason: String,
    },

    /// An objective encoding mode string is neither a maximizing nor a minimizing one.
    #[error(r#"invalid encoding mode "{0}"; expected "max" or "min""#)]
    InvalidEncodingMode(String),

    /// The preference data is malformed.
    #[error("malformed preference data: {0}")]
    MalformedPreferenceData(String),

    /// The engine returned no assignment (infeasibility, timeout, unknown result).
    #[error("no solution: {0}")]
    NoSolution(String),

    /// An assignment violates the partition invariants.
    #[error("inconsistent assignment: {0}")]
    DecodeInconsistency(String),
}

/// A result type for the operations of the TCPC core.
pub type Result<T> = std::result::Result<T, TcpcError>;
