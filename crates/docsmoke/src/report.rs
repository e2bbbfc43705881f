//! Step reporting.
//!
//! The scenario records every step it completes; on failure the report
//! carries the failing step's expected/actual detail alongside everything
//! that passed before it.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::result::SmokeError;

/// Outcome of one scenario step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Step completed, assertion held
    Passed,
    /// Step aborted the run
    Failed,
    /// Step never ran (a prior step failed)
    Skipped,
}

/// Record of one scenario step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Step label
    pub label: String,
    /// Outcome
    pub status: StepStatus,
    /// Time spent in the step, in milliseconds
    pub duration_ms: u64,
    /// Failure detail, for the failing step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepRecord {
    /// Record a passing step
    #[must_use]
    pub fn passed(label: impl Into<String>, duration: Duration) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Passed,
            duration_ms: duration.as_millis() as u64,
            error: None,
        }
    }

    /// Record the failing step
    #[must_use]
    pub fn failed(label: impl Into<String>, duration: Duration, error: &SmokeError) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Failed,
            duration_ms: duration.as_millis() as u64,
            error: Some(error.to_string()),
        }
    }

    /// Record a step skipped after an earlier failure
    #[must_use]
    pub fn skipped(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: StepStatus::Skipped,
            duration_ms: 0,
            error: None,
        }
    }
}

/// Full run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Base URL the run targeted
    pub base_url: String,
    /// Per-step records, in scenario order
    pub steps: Vec<StepRecord>,
    /// Total run duration in milliseconds
    pub duration_ms: u64,
}

impl RunReport {
    /// Create a report for a run against `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            steps: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Append a step record
    pub fn push(&mut self, record: StepRecord) {
        self.steps.push(record);
    }

    /// Set the total duration
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_ms = duration.as_millis() as u64;
    }

    /// Whether every recorded step passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        !self.steps.is_empty() && self.steps.iter().all(|s| s.status == StepStatus::Passed)
    }

    /// Count of passed steps
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.status == StepStatus::Passed)
            .count()
    }

    /// The failing step, if the run failed
    #[must_use]
    pub fn failure(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.status == StepStatus::Failed)
    }

    /// Human-readable summary, one line per step
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            let marker = match step.status {
                StepStatus::Passed => "ok  ",
                StepStatus::Failed => "FAIL",
                StepStatus::Skipped => "skip",
            };
            out.push_str(&format!("{marker} {}", step.label));
            if let Some(ref error) = step.error {
                out.push_str(&format!("\n     {error}"));
            }
            out.push('\n');
        }
        out.push_str(&format!(
            "{}/{} steps passed in {}ms against {}\n",
            self.passed_count(),
            self.steps.len(),
            self.duration_ms,
            self.base_url
        ));
        out
    }
}
