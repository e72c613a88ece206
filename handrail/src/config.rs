//! Flow engine configuration.
//!
//! Every timing value that shapes a run lives here as configuration, not
//! invariant: step timeouts, the manual-handoff window, settle delays,
//! typing and pacing jitter. Tests substitute millisecond-scale values
//! without touching flow logic.

use crate::actuator::TypingProfile;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Policy values for a flow run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Per-keystroke delay range for human-like typing.
    pub typing: TypingProfile,

    /// Post-render settle delay before reading surface geometry, in
    /// milliseconds.
    pub settle_ms: u64,

    /// Lower bound of the random inter-step pacing delay, in milliseconds.
    pub pacing_min_ms: u64,

    /// Upper bound (exclusive) of the random inter-step pacing delay, in
    /// milliseconds.
    pub pacing_max_ms: u64,

    /// Maximum time a manual-handoff step may stay paused, in
    /// milliseconds. `None` waits indefinitely.
    pub manual_wait_max_ms: Option<u64>,

    /// Wait bound applied to steps that do not declare their own, in
    /// milliseconds.
    pub default_timeout_ms: u64,

    /// How often a paused run re-checks its wait condition, in
    /// milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            typing: TypingProfile::default(),
            settle_ms: 3000,
            pacing_min_ms: 1000,
            pacing_max_ms: 3000,
            manual_wait_max_ms: Some(300_000),
            default_timeout_ms: 8000,
            poll_interval_ms: 150,
        }
    }
}

impl FlowConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with zero settle and pacing delays and a short
    /// manual window, for tests.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            typing: TypingProfile::new(0, 0),
            settle_ms: 0,
            pacing_min_ms: 0,
            pacing_max_ms: 0,
            manual_wait_max_ms: Some(250),
            default_timeout_ms: 20,
            poll_interval_ms: 5,
        }
    }

    /// The settle delay.
    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// The default per-step wait bound.
    #[must_use]
    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }

    /// The condition re-check interval while paused.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// The manual-handoff window, if bounded.
    #[must_use]
    pub fn manual_wait_max(&self) -> Option<Duration> {
        self.manual_wait_max_ms.map(Duration::from_millis)
    }

    /// Draws one random pacing delay from the configured range.
    #[must_use]
    pub fn pacing(&self) -> Duration {
        if self.pacing_max_ms <= self.pacing_min_ms {
            return Duration::from_millis(self.pacing_min_ms);
        }
        let ms = rand::thread_rng().gen_range(self.pacing_min_ms..self.pacing_max_ms);
        Duration::from_millis(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_policy() {
        let config = FlowConfig::default();
        assert_eq!(config.typing, TypingProfile::new(50, 150));
        assert_eq!(config.settle_ms, 3000);
        assert_eq!(config.manual_wait_max_ms, Some(300_000));
        assert_eq!(config.default_timeout_ms, 8000);
    }

    #[test]
    fn test_pacing_in_range() {
        let config = FlowConfig::default();
        for _ in 0..50 {
            let ms = config.pacing().as_millis() as u64;
            assert!((1000..3000).contains(&ms));
        }
    }

    #[test]
    fn test_fast_config_has_no_pacing() {
        let config = FlowConfig::fast();
        assert_eq!(config.pacing(), Duration::ZERO);
        assert_eq!(config.settle(), Duration::ZERO);
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let config = FlowConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: FlowConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_unbounded_manual_wait() {
        let config = FlowConfig {
            manual_wait_max_ms: None,
            ..FlowConfig::default()
        };
        assert_eq!(config.manual_wait_max(), None);
    }
}
