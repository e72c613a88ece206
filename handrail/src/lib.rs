//! # Handrail
//!
//! A human-in-the-loop step sequencer for remote interactive surfaces.
//!
//! Handrail runs an ordered list of steps against any UI-automatable
//! target (a browser page, a remote device canvas), where each step can:
//!
//! - **succeed silently** when its wait condition holds,
//! - **time out and fall back** to a degraded action without halting the
//!   run, or
//! - **pause for an operator** to act out-of-band on the live surface
//!   before resuming.
//!
//! Supporting pieces: an [`actuator::Actuator`] boundary for input
//! synthesis, a [`surface::CoordinateMapper`] for blind percentage taps
//! on opaque canvases, and an [`artifacts::ArtifactSink`] for screenshot
//! checkpoints.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use handrail::prelude::*;
//! use std::sync::Arc;
//!
//! let steps = vec![
//!     Step::automatic("fill-name")
//!         .wait(WaitCondition::Visible(Target::label("First name")))
//!         .primary(FillNameAction)
//!         .build()?,
//!     Step::manual_handoff("await-otp")
//!         .wait(WaitCondition::Visible(Target::css("input[name=\"Passwd\"]")))
//!         .primary(FillPasswordAction)
//!         .build()?,
//! ];
//!
//! let sequencer = Sequencer::new(FlowConfig::default())
//!     .with_event_sink(Arc::new(LoggingEventSink::default()));
//! let run = sequencer.run(&steps, &actuator).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod actuator;
pub mod artifacts;
pub mod config;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod sequencer;
pub mod step;
pub mod surface;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::actuator::{Actuator, Target, TypingProfile, WaitCondition};
    pub use crate::artifacts::ArtifactSink;
    pub use crate::config::FlowConfig;
    pub use crate::core::{
        Artifact, OutcomeRecord, RunLog, RunStatus, StepKind, StepOutcome,
    };
    pub use crate::errors::{FlowError, FlowResult};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::sequencer::{FlowRun, Sequencer};
    pub use crate::step::{Action, FnAction, NoOpAction, Step, StepBuilder};
    pub use crate::surface::{CoordinateMapper, SurfaceRect};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::testing::ScriptedActuator;

    #[tokio::test]
    async fn prelude_covers_a_minimal_flow() {
        let steps = vec![Step::automatic("noop")
            .wait(WaitCondition::Settled(std::time::Duration::ZERO))
            .primary(NoOpAction)
            .build()
            .unwrap()];

        let sequencer = Sequencer::new(FlowConfig::fast());
        let actuator = ScriptedActuator::new();
        let run = sequencer.run(&steps, &actuator).await;

        assert_eq!(run.status(), RunStatus::Completed);
    }
}
