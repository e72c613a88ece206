//! Canned actions and steps for sequencer tests.

use crate::actuator::{Actuator, WaitCondition};
use crate::errors::{FlowError, FlowResult};
use crate::step::{Action, Step};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// An action that counts how many times it ran.
///
/// Clones share the counter, so a test can keep a handle while the step
/// owns the action.
#[derive(Debug, Clone, Default)]
pub struct CountingAction {
    count: Arc<Mutex<usize>>,
}

impl CountingAction {
    /// Creates an action with a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the action has run.
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock()
    }
}

#[async_trait]
impl Action for CountingAction {
    async fn run(&self, _actuator: &dyn Actuator) -> FlowResult<()> {
        *self.count.lock() += 1;
        Ok(())
    }
}

/// An action that always fails.
#[derive(Debug, Clone)]
pub struct FailingAction {
    reason: String,
}

impl FailingAction {
    /// Creates an action failing with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Action for FailingAction {
    async fn run(&self, _actuator: &dyn Actuator) -> FlowResult<()> {
        Err(FlowError::actuation(self.reason.clone()))
    }
}

/// A settled-immediately wait, for steps whose condition is not under
/// test.
#[must_use]
pub fn instant_wait() -> WaitCondition {
    WaitCondition::Settled(Duration::ZERO)
}

/// An automatic step whose wait holds immediately and whose primary
/// action counts its runs.
#[must_use]
pub fn success_step(name: &str, action: CountingAction) -> Step {
    Step::automatic(name)
        .wait(instant_wait())
        .primary(action)
        .build()
        .unwrap_or_else(|_| unreachable!("fixture step is well-formed"))
}

/// An automatic step over the given wait condition with a counting
/// primary and a counting fallback.
#[must_use]
pub fn fallback_step(
    name: &str,
    wait: WaitCondition,
    primary: CountingAction,
    fallback: CountingAction,
) -> Step {
    Step::automatic(name)
        .wait(wait)
        .timeout(Duration::from_millis(10))
        .primary(primary)
        .fallback(fallback)
        .build()
        .unwrap_or_else(|_| unreachable!("fixture step is well-formed"))
}

/// A manual-handoff step over the given wait condition.
#[must_use]
pub fn manual_step(name: &str, wait: WaitCondition, primary: CountingAction) -> Step {
    Step::manual_handoff(name)
        .wait(wait)
        .timeout(Duration::from_millis(10))
        .primary(primary)
        .build()
        .unwrap_or_else(|_| unreachable!("fixture step is well-formed"))
}

/// An automatic step with no fallback over the given wait condition.
#[must_use]
pub fn bare_step(name: &str, wait: WaitCondition, primary: CountingAction) -> Step {
    Step::automatic(name)
        .wait(wait)
        .timeout(Duration::from_millis(10))
        .primary(primary)
        .build()
        .unwrap_or_else(|_| unreachable!("fixture step is well-formed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedActuator;

    #[tokio::test]
    async fn test_counting_action_shares_count_across_clones() {
        let action = CountingAction::new();
        let handle = action.clone();

        let actuator = ScriptedActuator::new();
        action.run(&actuator).await.unwrap();
        action.run(&actuator).await.unwrap();

        assert_eq!(handle.count(), 2);
    }

    #[tokio::test]
    async fn test_failing_action() {
        let action = FailingAction::new("element detached");
        let actuator = ScriptedActuator::new();

        let err = action.run(&actuator).await;
        assert!(matches!(err, Err(FlowError::Actuation { .. })));
    }
}
