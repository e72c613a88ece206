//! Append-only run log of per-step outcomes.

use super::StepOutcome;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged step outcome.
///
/// Records are created by the sequencer as each step settles and are
/// never mutated afterwards. On a halted run the last record names the
/// step where the operator should resume manually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// The step name (unique within a run).
    pub step: String,
    /// What happened.
    pub outcome: StepOutcome,
    /// When the outcome was logged (UTC).
    pub recorded_at: DateTime<Utc>,
}

impl OutcomeRecord {
    /// Creates a record stamped with the current time.
    #[must_use]
    pub fn new(step: impl Into<String>, outcome: StepOutcome) -> Self {
        Self {
            step: step.into(),
            outcome,
            recorded_at: Utc::now(),
        }
    }
}

/// An append-only ordered sequence of outcome records.
///
/// Entries can be pushed and read, never rewritten or removed; the log is
/// the authoritative account of how far a run progressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunLog {
    records: Vec<OutcomeRecord>,
}

impl RunLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: OutcomeRecord) {
        self.records.push(record);
    }

    /// Returns the number of logged outcomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been logged yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the record at `index`, in append order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&OutcomeRecord> {
        self.records.get(index)
    }

    /// Returns the most recent record.
    #[must_use]
    pub fn last(&self) -> Option<&OutcomeRecord> {
        self.records.last()
    }

    /// Iterates records in append order.
    pub fn iter(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter()
    }

    /// Returns the logged outcome for a step name, if any.
    #[must_use]
    pub fn outcome_of(&self, step: &str) -> Option<&StepOutcome> {
        self.records
            .iter()
            .find(|r| r.step == step)
            .map(|r| &r.outcome)
    }
}

impl<'a> IntoIterator for &'a RunLog {
    type Item = &'a OutcomeRecord;
    type IntoIter = std::slice::Iter<'a, OutcomeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_preserves_order() {
        let mut log = RunLog::new();
        log.push(OutcomeRecord::new("first", StepOutcome::Success));
        log.push(OutcomeRecord::new("second", StepOutcome::degraded("timeout")));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0).unwrap().step, "first");
        assert_eq!(log.get(1).unwrap().step, "second");
        assert_eq!(log.last().unwrap().step, "second");
    }

    #[test]
    fn test_outcome_of() {
        let mut log = RunLog::new();
        log.push(OutcomeRecord::new("fill-form", StepOutcome::Success));

        assert_eq!(log.outcome_of("fill-form"), Some(&StepOutcome::Success));
        assert_eq!(log.outcome_of("missing"), None);
    }

    #[test]
    fn test_log_serialize_roundtrip() {
        let mut log = RunLog::new();
        log.push(OutcomeRecord::new("a", StepOutcome::ManualResume));

        let json = serde_json::to_string(&log).unwrap();
        let back: RunLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }
}
