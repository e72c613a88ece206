//! Error types for the handrail engine.
//!
//! Every surface action is a real-world effect with no rollback, so the
//! taxonomy separates the expected-and-recoverable (an expired wait) from
//! the genuinely fatal (a step with no recovery path).

use thiserror::Error;

/// The main error type for handrail operations.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A wait expired before its condition became true.
    ///
    /// Recoverable: the sequencer turns this into a fallback run or a
    /// manual handoff, depending on the step.
    #[error("condition '{condition}' not met within {timeout_ms}ms")]
    ConditionTimeout {
        /// Description of the condition that never held.
        condition: String,
        /// The bounded wait that expired.
        timeout_ms: u64,
    },

    /// More than one element matched a locator query.
    ///
    /// Must be resolved by scoping the query, never by picking one match
    /// arbitrarily.
    #[error("locator '{target}' matched {matches} elements; scope the query")]
    LocatorAmbiguous {
        /// The ambiguous locator.
        target: String,
        /// How many elements matched.
        matches: usize,
    },

    /// A surface-level action (click, type, upload, evaluate) failed.
    #[error("actuation failed: {reason}")]
    Actuation {
        /// What the surface reported.
        reason: String,
    },

    /// A step had no recovery path and halted the run.
    #[error("step '{step}' failed with no recovery path: {reason}")]
    UnrecoverableStep {
        /// The step that halted the run.
        step: String,
        /// Why it could not complete.
        reason: String,
    },

    /// A normalized coordinate fell outside [0, 1].
    #[error("percent coordinate out of range on {axis} axis: {value}")]
    InvalidPercent {
        /// Which axis the value was for ('x' or 'y').
        axis: char,
        /// The offending value.
        value: f64,
    },

    /// A surface rectangle was captured before the surface stabilized and
    /// came back zero-sized.
    #[error("surface rectangle is empty; capture after the surface has settled")]
    EmptySurface,

    /// A step definition violated its construction invariants.
    #[error("invalid step '{step}': {reason}")]
    InvalidStep {
        /// The step being defined.
        step: String,
        /// Which invariant was violated.
        reason: String,
    },

    /// An artifact write failed.
    ///
    /// Fatal for that capture, non-fatal for the run unless a later step
    /// depends on the file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowError {
    /// Creates a condition timeout error.
    #[must_use]
    pub fn condition_timeout(condition: impl Into<String>, timeout_ms: u64) -> Self {
        Self::ConditionTimeout {
            condition: condition.into(),
            timeout_ms,
        }
    }

    /// Creates an ambiguous locator error.
    #[must_use]
    pub fn locator_ambiguous(target: impl Into<String>, matches: usize) -> Self {
        Self::LocatorAmbiguous {
            target: target.into(),
            matches,
        }
    }

    /// Creates an actuation error.
    #[must_use]
    pub fn actuation(reason: impl Into<String>) -> Self {
        Self::Actuation {
            reason: reason.into(),
        }
    }

    /// Creates an unrecoverable step error.
    #[must_use]
    pub fn unrecoverable(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnrecoverableStep {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid step error.
    #[must_use]
    pub fn invalid_step(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStep {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if the sequencer may recover from this error via a
    /// fallback or manual handoff.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConditionTimeout { .. } | Self::Actuation { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type FlowResult<T> = Result<T, FlowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_timeout_message() {
        let err = FlowError::condition_timeout("password field visible", 8000);
        assert_eq!(
            err.to_string(),
            "condition 'password field visible' not met within 8000ms"
        );
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_locator_ambiguous_message() {
        let err = FlowError::locator_ambiguous("button 'Copy Results'", 2);
        assert!(err.to_string().contains("matched 2 elements"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_unrecoverable_names_the_step() {
        let err = FlowError::unrecoverable("select-device", "dropdown never appeared");
        assert!(err.to_string().contains("select-device"));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err: FlowError = io.into();
        assert!(matches!(err, FlowError::Io(_)));
    }
}
