//! Step definitions: the unit of work in a flow.
//!
//! A step declares what must become true before it can act, what it does
//! on the primary path, and what (if anything) it does instead when the
//! wait expires. Steps are constructed at flow-definition time, are not
//! mutated after construction, and execute exactly once per run.

use crate::actuator::{Actuator, WaitCondition};
use crate::core::StepKind;
use crate::errors::{FlowError, FlowResult};
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;
use std::time::Duration;

/// A surface effect performed by a step.
#[async_trait]
pub trait Action: Send + Sync {
    /// Performs the effect against the target surface.
    async fn run(&self, actuator: &dyn Actuator) -> FlowResult<()>;
}

/// An action built from an async closure over the actuator.
pub struct FnAction<F>
where
    F: for<'a> Fn(&'a dyn Actuator) -> BoxFuture<'a, FlowResult<()>> + Send + Sync,
{
    func: F,
}

impl<F> FnAction<F>
where
    F: for<'a> Fn(&'a dyn Actuator) -> BoxFuture<'a, FlowResult<()>> + Send + Sync,
{
    /// Wraps an async closure as an action.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> fmt::Debug for FnAction<F>
where
    F: for<'a> Fn(&'a dyn Actuator) -> BoxFuture<'a, FlowResult<()>> + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAction").finish()
    }
}

#[async_trait]
impl<F> Action for FnAction<F>
where
    F: for<'a> Fn(&'a dyn Actuator) -> BoxFuture<'a, FlowResult<()>> + Send + Sync,
{
    async fn run(&self, actuator: &dyn Actuator) -> FlowResult<()> {
        (self.func)(actuator).await
    }
}

/// An action that does nothing.
///
/// Useful for steps whose whole purpose is the wait itself (e.g. pausing
/// until an operator-entered value makes a field appear).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpAction;

#[async_trait]
impl Action for NoOpAction {
    async fn run(&self, _actuator: &dyn Actuator) -> FlowResult<()> {
        Ok(())
    }
}

/// A named unit of work with a wait condition, a primary action, and an
/// optional fallback.
pub struct Step {
    name: String,
    kind: StepKind,
    wait: WaitCondition,
    timeout: Option<Duration>,
    primary: Box<dyn Action>,
    fallback: Option<Box<dyn Action>>,
}

impl Step {
    /// Starts defining an automatic step.
    #[must_use]
    pub fn automatic(name: impl Into<String>) -> StepBuilder {
        StepBuilder::new(name, StepKind::Automatic)
    }

    /// Starts defining a manual-handoff step.
    #[must_use]
    pub fn manual_handoff(name: impl Into<String>) -> StepBuilder {
        StepBuilder::new(name, StepKind::ManualHandoff)
    }

    /// The step name, unique within a run.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the step may pause the run for the operator.
    #[must_use]
    pub fn kind(&self) -> StepKind {
        self.kind
    }

    /// The condition that must hold before the primary action runs.
    #[must_use]
    pub fn wait(&self) -> &WaitCondition {
        &self.wait
    }

    /// The step's own wait bound, if it declared one.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The primary action.
    #[must_use]
    pub fn primary(&self) -> &dyn Action {
        self.primary.as_ref()
    }

    /// The fallback action, if any.
    #[must_use]
    pub fn fallback(&self) -> Option<&dyn Action> {
        self.fallback.as_deref()
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("wait", &self.wait)
            .field("timeout", &self.timeout)
            .field("has_fallback", &self.fallback.is_some())
            .finish()
    }
}

/// Builder for [`Step`].
pub struct StepBuilder {
    name: String,
    kind: StepKind,
    wait: Option<WaitCondition>,
    timeout: Option<Duration>,
    primary: Option<Box<dyn Action>>,
    fallback: Option<Box<dyn Action>>,
}

impl StepBuilder {
    fn new(name: impl Into<String>, kind: StepKind) -> Self {
        Self {
            name: name.into(),
            kind,
            wait: None,
            timeout: None,
            primary: None,
            fallback: None,
        }
    }

    /// Declares the wait condition. Every step has exactly one.
    #[must_use]
    pub fn wait(mut self, condition: WaitCondition) -> Self {
        self.wait = Some(condition);
        self
    }

    /// Bounds the wait. Steps without their own bound use the configured
    /// default.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the primary action.
    #[must_use]
    pub fn primary(mut self, action: impl Action + 'static) -> Self {
        self.primary = Some(Box::new(action));
        self
    }

    /// Sets the fallback action. A step has at most one.
    #[must_use]
    pub fn fallback(mut self, action: impl Action + 'static) -> Self {
        self.fallback = Some(Box::new(action));
        self
    }

    /// Finishes the definition.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidStep`] if the step is missing its wait
    /// condition or primary action, or if the name is empty.
    pub fn build(self) -> FlowResult<Step> {
        if self.name.trim().is_empty() {
            return Err(FlowError::invalid_step("<unnamed>", "name must not be empty"));
        }
        let wait = self
            .wait
            .ok_or_else(|| FlowError::invalid_step(&self.name, "missing wait condition"))?;
        let primary = self
            .primary
            .ok_or_else(|| FlowError::invalid_step(&self.name, "missing primary action"))?;

        Ok(Step {
            name: self.name,
            kind: self.kind,
            wait,
            timeout: self.timeout,
            primary,
            fallback: self.fallback,
        })
    }
}
