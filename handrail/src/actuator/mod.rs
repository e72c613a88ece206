//! The target-surface boundary.
//!
//! An [`Actuator`] performs input actions against a remote interactive
//! surface: a browser page, a helper tab, a virtualized device canvas.
//! The engine never talks to a surface directly; everything goes through
//! this trait so the sequencer stays independent of any particular
//! automation backend.
//!
//! Every operation here is a real-world effect with no rollback. Failed
//! waits are expected values (`Ok(false)`), not errors, so callers can
//! branch on them without stopping the flow.

use crate::errors::FlowResult;
use crate::surface::SurfaceRect;
use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A semantic locator for an element on the target surface.
///
/// Ambiguity is resolved by scoping: wrap the query in [`Target::Within`]
/// rather than letting the backend pick an arbitrary match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum Target {
    /// An element identified by its accessible label.
    Label(String),
    /// An element identified by ARIA role and accessible name.
    Role {
        /// The ARIA role (e.g. "button", "option").
        role: String,
        /// The accessible name.
        name: String,
    },
    /// A CSS selector.
    Css(String),
    /// An element identified by its visible text.
    Text(String),
    /// A query scoped to the subtree of another element.
    Within {
        /// The enclosing element.
        scope: Box<Target>,
        /// The query evaluated inside the scope.
        inner: Box<Target>,
    },
}

impl Target {
    /// An element identified by its accessible label.
    #[must_use]
    pub fn label(label: impl Into<String>) -> Self {
        Self::Label(label.into())
    }

    /// An element identified by ARIA role and accessible name.
    #[must_use]
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// A CSS selector.
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// An element identified by its visible text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Scopes this query to the subtree of `scope`.
    #[must_use]
    pub fn within(self, scope: Target) -> Self {
        Self::Within {
            scope: Box::new(scope),
            inner: Box::new(self),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => write!(f, "label={label}"),
            Self::Role { role, name } => write!(f, "role={role}[name={name}]"),
            Self::Css(selector) => write!(f, "css={selector}"),
            Self::Text(text) => write!(f, "text={text}"),
            Self::Within { scope, inner } => write!(f, "{scope} >> {inner}"),
        }
    }
}

/// What must become true before a step's primary action may run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "wait", content = "value", rename_all = "snake_case")]
pub enum WaitCondition {
    /// The element is present and visible.
    Visible(Target),
    /// The element exists in the surface, visible or not.
    Present(Target),
    /// A named settle delay: the condition holds once the duration has
    /// elapsed. Exists so fixed pacing is explicit and tests can shrink
    /// it to zero without touching flow logic.
    Settled(Duration),
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible(target) => write!(f, "visible({target})"),
            Self::Present(target) => write!(f, "present({target})"),
            Self::Settled(duration) => write!(f, "settled({}ms)", duration.as_millis()),
        }
    }
}

/// Per-keystroke delay range for human-like typing.
///
/// Each keystroke waits a delay drawn uniformly from `[min_ms, max_ms)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingProfile {
    /// Minimum per-keystroke delay in milliseconds (inclusive).
    pub min_ms: u64,
    /// Maximum per-keystroke delay in milliseconds (exclusive).
    pub max_ms: u64,
}

impl Default for TypingProfile {
    fn default() -> Self {
        Self {
            min_ms: 50,
            max_ms: 150,
        }
    }
}

impl TypingProfile {
    /// Creates a profile with the given delay range.
    #[must_use]
    pub fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Draws one keystroke delay uniformly from the range.
    #[must_use]
    pub fn jitter(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.min_ms..self.max_ms);
        Duration::from_millis(ms)
    }
}

/// Performs input actions against a target surface.
///
/// Implementations own their typing profile; `type_text` must issue the
/// text with per-keystroke jitter drawn from it, while `fill` sets the
/// value in one shot (for inputs where pacing does not matter).
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Locates `target` and types `text` with human-like pacing.
    async fn type_text(&self, target: &Target, text: &str) -> FlowResult<()>;

    /// Locates `target` and sets its value directly, without jitter.
    async fn fill(&self, target: &Target, text: &str) -> FlowResult<()>;

    /// Locates `target` and clicks it.
    async fn click(&self, target: &Target) -> FlowResult<()>;

    /// Dispatches a pointer click at raw surface coordinates.
    ///
    /// The only interaction mechanism for opaque surfaces with no
    /// addressable elements (e.g. a remote-rendered device canvas).
    async fn click_at(&self, x: f64, y: f64) -> FlowResult<()>;

    /// Blocks cooperatively until `condition` holds or `timeout` elapses.
    ///
    /// Returns `Ok(false)` on expiry rather than an error, so callers can
    /// branch on the outcome without stopping the flow. Errors are
    /// reserved for faults like ambiguous locators.
    async fn wait_for(&self, condition: &WaitCondition, timeout: Duration) -> FlowResult<bool>;

    /// Captures a full-surface PNG.
    async fn screenshot(&self) -> FlowResult<Vec<u8>>;

    /// Reads the bounding rectangle of `target`.
    async fn surface_bounds(&self, target: &Target) -> FlowResult<SurfaceRect>;

    /// Reads the surface clipboard.
    async fn read_clipboard(&self) -> FlowResult<String>;

    /// Attaches local files to a file input on the surface.
    async fn set_files(&self, target: &Target, paths: &[PathBuf]) -> FlowResult<()>;

    /// Evaluates a script in the surface and returns its string result.
    async fn evaluate(&self, script: &str) -> FlowResult<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        assert_eq!(Target::label("First name").to_string(), "label=First name");
        assert_eq!(
            Target::role("button", "Next").to_string(),
            "role=button[name=Next]"
        );
        assert_eq!(Target::css("#month").to_string(), "css=#month");
    }

    #[test]
    fn test_scoped_target_display() {
        let scoped = Target::role("button", "Copy Results").within(Target::css("#scan"));
        assert_eq!(
            scoped.to_string(),
            "css=#scan >> role=button[name=Copy Results]"
        );
    }

    #[test]
    fn test_wait_condition_display() {
        let cond = WaitCondition::Visible(Target::css("input[name=\"Passwd\"]"));
        assert_eq!(cond.to_string(), "visible(css=input[name=\"Passwd\"])");

        let settle = WaitCondition::Settled(Duration::from_millis(3000));
        assert_eq!(settle.to_string(), "settled(3000ms)");
    }

    #[test]
    fn test_typing_jitter_in_range() {
        let profile = TypingProfile::new(50, 150);
        for _ in 0..100 {
            let delay = profile.jitter().as_millis() as u64;
            assert!((50..150).contains(&delay));
        }
    }

    #[test]
    fn test_typing_jitter_degenerate_range() {
        let profile = TypingProfile::new(80, 80);
        assert_eq!(profile.jitter(), Duration::from_millis(80));
    }

    #[test]
    fn test_target_serialize_tagged() {
        let json = serde_json::to_string(&Target::label("Day")).unwrap();
        assert_eq!(json, r#"{"by":"label","value":"Day"}"#);
    }
}
