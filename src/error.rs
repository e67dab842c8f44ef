//! Error module for the Rusty Tuning library.
use thiserror::Error;

/// Error types for the library.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum TuningError {
    /// Error for invalid parameters, e.g., non-positive duration or time step.
    #[error("Invalid parameters: {0}")]
    InvalidParameter(String),
    /// Error for collections that should be positionally aligned but are not.
    #[error("Length mismatch: expected {expected} elements, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    /// Error for invalid spike times, e.g., NaN values or times outside the trial.
    #[error("Invalid spike train: {0}")]
    InvalidSpikeTrain(String),
    /// Convergence error from the curve fitting, e.g., too few points or a singular Jacobian.
    #[error("Convergence error: {0}")]
    ConvergenceError(String),
    /// Error for I/O operations, e.g., while reading a configuration file.
    #[error("I/O error: {0}")]
    IOError(String),
}

impl TuningError {
    /// Returns true if the error stems from ill-formed inputs rather than from the fitting itself.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            TuningError::InvalidParameter(_)
                | TuningError::LengthMismatch { .. }
                | TuningError::InvalidSpikeTrain(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            TuningError::LengthMismatch {
                expected: 8,
                found: 7
            }
            .to_string(),
            "Length mismatch: expected 8 elements, found 7"
        );
        assert_eq!(
            TuningError::ConvergenceError("singular Jacobian".to_string()).to_string(),
            "Convergence error: singular Jacobian"
        );
    }

    #[test]
    fn test_is_invalid_argument() {
        assert!(TuningError::InvalidParameter("dt".to_string()).is_invalid_argument());
        assert!(TuningError::LengthMismatch {
            expected: 1,
            found: 2
        }
        .is_invalid_argument());
        assert!(!TuningError::ConvergenceError("too few points".to_string()).is_invalid_argument());
    }
}
