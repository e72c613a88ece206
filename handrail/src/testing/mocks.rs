//! Scripted actuator mock for testing flows without a live surface.

use crate::actuator::{Actuator, Target, WaitCondition};
use crate::errors::FlowResult;
use crate::surface::SurfaceRect;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

/// How a scripted wait behaves for one condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitScript {
    /// The condition holds on the first check.
    Immediate,
    /// The condition holds on the nth check (1-based).
    AfterPolls(usize),
    /// The condition never holds.
    Never,
    /// Checking the condition faults: the locator matched this many
    /// elements.
    Ambiguous(usize),
}

/// An [`Actuator`] that records every call and answers waits from a
/// per-condition script instead of touching a real surface.
///
/// Conditions are keyed by their display form; unscripted conditions
/// hold immediately. No scripted operation actually sleeps, so tests
/// stay fast regardless of the timeouts under test.
#[derive(Debug, Default)]
pub struct ScriptedActuator {
    waits: Mutex<HashMap<String, WaitScript>>,
    poll_counts: Mutex<HashMap<String, usize>>,
    typed: Mutex<Vec<(String, String)>>,
    filled: Mutex<Vec<(String, String)>>,
    clicks: Mutex<Vec<String>>,
    raw_clicks: Mutex<Vec<(f64, f64)>>,
    uploads: Mutex<Vec<(String, Vec<PathBuf>)>>,
    scripts_evaluated: Mutex<Vec<String>>,
    wait_calls: Mutex<Vec<String>>,
    screenshot_bytes: Mutex<Vec<u8>>,
    clipboard: Mutex<String>,
    bounds: Mutex<SurfaceRect>,
    evaluate_result: Mutex<String>,
}

impl ScriptedActuator {
    /// Creates a mock with immediate waits and a plausible surface
    /// rectangle.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screenshot_bytes: Mutex::new(b"\x89PNG\r\n\x1a\n".to_vec()),
            bounds: Mutex::new(SurfaceRect::new(10.0, 20.0, 360.0, 640.0)),
            ..Self::default()
        }
    }

    /// Scripts the wait behavior for one condition.
    pub fn script_wait(&self, condition: &WaitCondition, script: WaitScript) {
        self.waits.lock().insert(condition.to_string(), script);
    }

    /// Sets the bytes returned by `screenshot`.
    pub fn set_screenshot_bytes(&self, bytes: Vec<u8>) {
        *self.screenshot_bytes.lock() = bytes;
    }

    /// Sets the text returned by `read_clipboard`.
    pub fn set_clipboard(&self, text: impl Into<String>) {
        *self.clipboard.lock() = text.into();
    }

    /// Sets the rectangle returned by `surface_bounds`.
    pub fn set_bounds(&self, rect: SurfaceRect) {
        *self.bounds.lock() = rect;
    }

    /// Sets the string returned by `evaluate`.
    pub fn set_evaluate_result(&self, result: impl Into<String>) {
        *self.evaluate_result.lock() = result.into();
    }

    /// Targets typed into, with the text, in call order.
    #[must_use]
    pub fn typed(&self) -> Vec<(String, String)> {
        self.typed.lock().clone()
    }

    /// Targets filled, with the text, in call order.
    #[must_use]
    pub fn filled(&self) -> Vec<(String, String)> {
        self.filled.lock().clone()
    }

    /// Targets clicked, in call order.
    #[must_use]
    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().clone()
    }

    /// Raw coordinates clicked, in call order.
    #[must_use]
    pub fn raw_clicks(&self) -> Vec<(f64, f64)> {
        self.raw_clicks.lock().clone()
    }

    /// File uploads performed, in call order.
    #[must_use]
    pub fn uploads(&self) -> Vec<(String, Vec<PathBuf>)> {
        self.uploads.lock().clone()
    }

    /// Conditions waited on, in call order (one entry per check).
    #[must_use]
    pub fn wait_calls(&self) -> Vec<String> {
        self.wait_calls.lock().clone()
    }

    /// How many times one condition has been checked.
    #[must_use]
    pub fn poll_count(&self, condition: &WaitCondition) -> usize {
        self.poll_counts
            .lock()
            .get(&condition.to_string())
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl Actuator for ScriptedActuator {
    async fn type_text(&self, target: &Target, text: &str) -> FlowResult<()> {
        self.typed
            .lock()
            .push((target.to_string(), text.to_string()));
        Ok(())
    }

    async fn fill(&self, target: &Target, text: &str) -> FlowResult<()> {
        self.filled
            .lock()
            .push((target.to_string(), text.to_string()));
        Ok(())
    }

    async fn click(&self, target: &Target) -> FlowResult<()> {
        self.clicks.lock().push(target.to_string());
        Ok(())
    }

    async fn click_at(&self, x: f64, y: f64) -> FlowResult<()> {
        self.raw_clicks.lock().push((x, y));
        Ok(())
    }

    async fn wait_for(&self, condition: &WaitCondition, _timeout: Duration) -> FlowResult<bool> {
        let key = condition.to_string();
        self.wait_calls.lock().push(key.clone());

        let count = {
            let mut counts = self.poll_counts.lock();
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };

        let script = self
            .waits
            .lock()
            .get(&key)
            .copied()
            .unwrap_or(WaitScript::Immediate);

        match script {
            WaitScript::Immediate => Ok(true),
            WaitScript::AfterPolls(n) => Ok(count >= n),
            WaitScript::Never => Ok(false),
            WaitScript::Ambiguous(matches) => {
                Err(crate::errors::FlowError::locator_ambiguous(key, matches))
            }
        }
    }

    async fn screenshot(&self) -> FlowResult<Vec<u8>> {
        Ok(self.screenshot_bytes.lock().clone())
    }

    async fn surface_bounds(&self, _target: &Target) -> FlowResult<SurfaceRect> {
        Ok(*self.bounds.lock())
    }

    async fn read_clipboard(&self) -> FlowResult<String> {
        Ok(self.clipboard.lock().clone())
    }

    async fn set_files(&self, target: &Target, paths: &[PathBuf]) -> FlowResult<()> {
        self.uploads
            .lock()
            .push((target.to_string(), paths.to_vec()));
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> FlowResult<String> {
        self.scripts_evaluated.lock().push(script.to_string());
        Ok(self.evaluate_result.lock().clone())
    }
}
