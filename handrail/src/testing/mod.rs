//! Testing utilities for handrail flows.
//!
//! This module provides:
//! - A scripted actuator mock that records calls and answers waits
//! - Canned actions and step fixtures for sequencer tests

mod fixtures;
mod mocks;

pub use fixtures::{
    bare_step, fallback_step, instant_wait, manual_step, success_step, CountingAction,
    FailingAction,
};
pub use mocks::{ScriptedActuator, WaitScript};
