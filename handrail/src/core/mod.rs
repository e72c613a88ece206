//! Core domain model types for handrail.
//!
//! This module contains the fundamental types used throughout the engine:
//! - Step kind, run status, and step outcome enums
//! - The append-only run log of per-step outcomes
//! - Artifact records for persisted captures

mod artifact;
mod record;
mod status;

pub use artifact::Artifact;
pub use record::{OutcomeRecord, RunLog};
pub use status::{RunStatus, StepKind, StepOutcome};
