//! The step sequencer: ordered execution with fallback and manual
//! handoff.
//!
//! A [`Sequencer`] pulls steps in declared order and applies one policy
//! table per step:
//!
//! - wait condition holds → primary action runs → `Success`, advance
//! - wait expires, fallback present → fallback runs once → `Degraded`,
//!   advance (the run never halts merely because one locator was missing)
//! - wait expires, no fallback, manual-handoff step → pause until the
//!   same condition becomes true (the operator acting out-of-band on the
//!   live surface is what makes it true) → `ManualResume`, advance
//! - wait expires, no fallback, automatic step → `Failed`, halt; later
//!   steps never execute
//!
//! There is no retry beyond the single fallback attempt. Execution is
//! single-threaded and cooperative: every wait is a suspension point, and
//! a later step never begins before the prior outcome is logged.
//! Cancellation is abandonment — dropping the run future at any await
//! point — because surface effects cannot be rolled back.

use crate::actuator::Actuator;
use crate::config::FlowConfig;
use crate::core::{OutcomeRecord, RunLog, RunStatus, StepKind, StepOutcome};
use crate::errors::FlowError;
use crate::events::{EventSink, NoOpEventSink};
use crate::step::Step;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use uuid::Uuid;


/// The record of one flow execution.
///
/// Created at run start, mutated only by the sequencer, and final once
/// the status turns terminal. The index only advances forward; once
/// `Failed` or `Completed`, no further steps execute.
#[derive(Debug, Clone, Serialize)]
pub struct FlowRun {
    id: Uuid,
    step_names: Vec<String>,
    current_index: usize,
    status: RunStatus,
    log: RunLog,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl FlowRun {
    fn new(step_names: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            step_names,
            current_index: 0,
            status: RunStatus::Running,
            log: RunLog::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    fn finish(&mut self, status: RunStatus) {
        self.status = status;
        self.finished_at = Some(Utc::now());
    }

    /// The run identity.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The declared step names, in execution order.
    #[must_use]
    pub fn step_names(&self) -> &[String] {
        &self.step_names
    }

    /// The index of the step being (or about to be) executed; equals the
    /// step count once the run completes.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The run status.
    #[must_use]
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// The append-only outcome log.
    #[must_use]
    pub fn log(&self) -> &RunLog {
        &self.log
    }

    /// When the run started (UTC).
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the run reached a terminal status, if it has.
    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}

/// Executes an ordered list of steps against one target surface.
pub struct Sequencer {
    config: FlowConfig,
    sink: Arc<dyn EventSink>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl Sequencer {
    /// Creates a sequencer with the given policy values and no event
    /// sink.
    #[must_use]
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Attaches an event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Runs the steps in order and returns the finished run record.
    ///
    /// The surface is exclusively owned by this run for its duration;
    /// steps execute strictly in declared order.
    pub async fn run(&self, steps: &[Step], actuator: &dyn Actuator) -> FlowRun {
        let mut run = FlowRun::new(steps.iter().map(|s| s.name().to_string()).collect());

        info!(run_id = %run.id, steps = steps.len(), "Flow run started");
        self.sink.try_emit(
            "run.started",
            Some(json!({
                "run_id": run.id.to_string(),
                "steps": run.step_names,
            })),
        );

        for step in steps {
            let outcome = self.execute_step(step, actuator, &mut run).await;
            let advanced = outcome.advanced();
            self.report(&run, step, &outcome);
            run.log.push(OutcomeRecord::new(step.name(), outcome));

            if !advanced {
                run.finish(RunStatus::Failed);
                error!(
                    run_id = %run.id,
                    step = step.name(),
                    "Flow run halted; resume manually from this step"
                );
                self.sink.try_emit(
                    "run.failed",
                    Some(json!({
                        "run_id": run.id.to_string(),
                        "halted_at": step.name(),
                    })),
                );
                return run;
            }

            run.current_index += 1;
            tokio::time::sleep(self.config.pacing()).await;
        }

        run.finish(RunStatus::Completed);
        info!(run_id = %run.id, "Flow run completed");
        self.sink.try_emit(
            "run.completed",
            Some(json!({ "run_id": run.id.to_string() })),
        );
        run
    }

    async fn execute_step(
        &self,
        step: &Step,
        actuator: &dyn Actuator,
        run: &mut FlowRun,
    ) -> StepOutcome {
        let timeout = step.timeout().unwrap_or_else(|| self.config.default_timeout());
        info!(step = step.name(), wait = %step.wait(), "Executing step");

        match actuator.wait_for(step.wait(), timeout).await {
            Ok(true) => match step.primary().run(actuator).await {
                Ok(()) => StepOutcome::Success,
                Err(err) => {
                    self.recover(step, actuator, format!("primary action failed: {err}"))
                        .await
                }
            },
            Ok(false) => {
                let reason = FlowError::condition_timeout(
                    step.wait().to_string(),
                    millis(timeout),
                )
                .to_string();

                if step.fallback().is_some() {
                    self.recover(step, actuator, reason).await
                } else if step.kind() == StepKind::ManualHandoff {
                    self.await_operator(step, actuator, run).await
                } else {
                    StepOutcome::failed(reason)
                }
            }
            // Wait faults (ambiguous locator, surface fault) follow the
            // same recovery table as an expired wait.
            Err(err) => {
                self.recover(step, actuator, format!("wait faulted: {err}"))
                    .await
            }
        }
    }

    /// Runs the fallback if the step has one; otherwise the step is
    /// unrecoverable. At most one fallback attempt — a failing fallback
    /// halts the run.
    async fn recover(&self, step: &Step, actuator: &dyn Actuator, reason: String) -> StepOutcome {
        match step.fallback() {
            Some(fallback) => {
                warn!(step = step.name(), %reason, "Primary path unavailable; running fallback");
                match fallback.run(actuator).await {
                    Ok(()) => StepOutcome::degraded(reason),
                    Err(err) => StepOutcome::failed(format!("{reason}; fallback failed: {err}")),
                }
            }
            None => StepOutcome::failed(reason),
        }
    }

    /// Pauses the run until the step's wait condition becomes true (the
    /// operator acting on the live surface) or the configured window
    /// expires.
    async fn await_operator(
        &self,
        step: &Step,
        actuator: &dyn Actuator,
        run: &mut FlowRun,
    ) -> StepOutcome {
        run.status = RunStatus::PausedForManual;
        warn!(
            step = step.name(),
            wait = %step.wait(),
            "Paused: complete the manual action on the live surface"
        );
        self.sink.try_emit(
            "run.paused_manual",
            Some(json!({
                "run_id": run.id.to_string(),
                "step": step.name(),
            })),
        );

        let window = self.config.manual_wait_max();
        let poll = self.config.poll_interval();
        let paused_at = Instant::now();

        loop {
            if let Some(max) = window {
                if paused_at.elapsed() >= max {
                    run.status = RunStatus::Running;
                    return StepOutcome::failed(format!(
                        "manual handoff window expired after {}ms",
                        millis(max)
                    ));
                }
            }

            match actuator.wait_for(step.wait(), poll).await {
                Ok(true) => break,
                Ok(false) => tokio::time::sleep(poll).await,
                Err(err) => {
                    run.status = RunStatus::Running;
                    return StepOutcome::failed(format!("wait faulted while paused: {err}"));
                }
            }
        }

        run.status = RunStatus::Running;
        info!(step = step.name(), "Operator action detected; resuming");

        match step.primary().run(actuator).await {
            Ok(()) => StepOutcome::ManualResume,
            Err(err) => {
                self.recover(step, actuator, format!("primary action failed after resume: {err}"))
                    .await
            }
        }
    }

    fn report(&self, run: &FlowRun, step: &Step, outcome: &StepOutcome) {
        let payload = json!({
            "run_id": run.id.to_string(),
            "step": step.name(),
            "outcome": outcome,
        });
        match outcome {
            StepOutcome::Success => {
                info!(step = step.name(), "Step succeeded");
                self.sink.try_emit("step.success", Some(payload));
            }
            StepOutcome::Degraded { reason } => {
                warn!(step = step.name(), %reason, "Step degraded");
                self.sink.try_emit("step.degraded", Some(payload));
            }
            StepOutcome::ManualResume => {
                info!(step = step.name(), "Step resumed after manual handoff");
                self.sink.try_emit("step.manual_resume", Some(payload));
            }
            StepOutcome::Failed { reason } => {
                error!(step = step.name(), %reason, "Step failed");
                self.sink.try_emit("step.failed", Some(payload));
            }
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{success_step, CountingAction, ScriptedActuator};

    #[tokio::test]
    async fn test_empty_flow_completes() {
        let sequencer = Sequencer::new(FlowConfig::fast());
        let actuator = ScriptedActuator::new();

        let run = sequencer.run(&[], &actuator).await;

        assert_eq!(run.status(), RunStatus::Completed);
        assert!(run.log().is_empty());
        assert!(run.finished_at().is_some());
    }

    #[tokio::test]
    async fn test_single_step_success() {
        let sequencer = Sequencer::new(FlowConfig::fast());
        let actuator = ScriptedActuator::new();
        let action = CountingAction::new();
        let steps = vec![success_step("only", action.clone())];

        let run = sequencer.run(&steps, &actuator).await;

        assert_eq!(run.status(), RunStatus::Completed);
        assert_eq!(run.current_index(), 1);
        assert_eq!(action.count(), 1);
        assert_eq!(
            run.log().outcome_of("only"),
            Some(&StepOutcome::Success)
        );
    }
}
