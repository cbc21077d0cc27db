use std::error::Error;
use std::fmt;

/// Errors raised at the boundary of a balancing call.
///
/// Degenerate data (all-zero rows or columns, zero margins) is never an error;
/// only inputs that make the problem ill-posed are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceError {
    /// A margin vector does not match the benchmark matrix dimension it totals.
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
    /// Tolerance must be finite and strictly positive.
    InvalidTolerance(f64),
    /// At least one sweep is required.
    InvalidIterationCap,
}

impl fmt::Display for BalanceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BalanceError::ShapeMismatch {
                what,
                expected,
                found,
            } => write!(
                f,
                "{} has length {} but the benchmark matrix requires {}",
                what, found, expected
            ),
            BalanceError::InvalidTolerance(tol) => {
                write!(f, "Tolerance must be finite and > 0, got {}", tol)
            }
            BalanceError::InvalidIterationCap => {
                write!(f, "Iteration cap must allow at least one sweep")
            }
        }
    }
}

impl Error for BalanceError {}
