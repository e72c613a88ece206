//! Run status, step kind, and step outcome enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a step interacts with the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// The step runs without operator involvement.
    Automatic,
    /// The step may pause the run for an out-of-band operator action
    /// (e.g. entering an OTP directly on the live surface).
    ManualHandoff,
}

impl Default for StepKind {
    fn default() -> Self {
        Self::Automatic
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Automatic => write!(f, "automatic"),
            Self::ManualHandoff => write!(f, "manual_handoff"),
        }
    }
}

/// The lifecycle status of a flow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Steps are executing in order.
    Running,
    /// The run is blocked waiting for an operator action on the live
    /// surface. Reachable only from `Running`, returns only to `Running`.
    PausedForManual,
    /// Every step executed and logged an outcome.
    Completed,
    /// A step failed with no recovery path; remaining steps never ran.
    Failed,
}

impl Default for RunStatus {
    fn default() -> Self {
        Self::Running
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::PausedForManual => write!(f, "paused_for_manual"),
            Self::Completed => write!(f, "completed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

impl RunStatus {
    /// Returns true if no further steps may execute.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns true if the run is waiting on the operator.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self, Self::PausedForManual)
    }
}

/// The logged outcome of a single step.
///
/// Replaces catch-and-log-and-proceed control flow with an explicit
/// tri-state (plus the manual-resume variant), so the continue-vs-halt
/// policy is a testable table rather than implicit exception suppression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The wait condition held and the primary action ran.
    Success,
    /// The primary path was unavailable; the fallback action ran instead
    /// and the run continued.
    Degraded {
        /// Why the primary path was abandoned.
        reason: String,
    },
    /// The run paused for the operator and resumed when the wait
    /// condition became true.
    ManualResume,
    /// The step had no recovery path; the run halted here.
    Failed {
        /// Why the step could not complete.
        reason: String,
    },
}

impl StepOutcome {
    /// Creates a degraded outcome.
    #[must_use]
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded {
            reason: reason.into(),
        }
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    /// Returns true if the run advanced past the step.
    #[must_use]
    pub fn advanced(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Returns true if the step took its primary path.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Degraded { reason } => write!(f, "degraded ({reason})"),
            Self::ManualResume => write!(f, "manual_resume"),
            Self::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}
