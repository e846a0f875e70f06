use crate::runner::state::TestOutcome;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Counts and timing derived from the outcome log at render time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_seconds: f64,
}

impl RunSummary {
    pub fn from_outcomes(outcomes: &[TestOutcome], elapsed: Duration) -> Self {
        let total = outcomes.len();
        let passed = outcomes.iter().filter(|o| o.passed).count();
        Self {
            total,
            passed,
            failed: total - passed,
            duration_seconds: elapsed.as_secs_f64(),
        }
    }
}

/// Everything a report artifact is rendered from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub run_id: String,
    pub title: String,
    pub generated_at: String,
    pub summary: RunSummary,
    pub outcomes: Vec<TestOutcome>,
}
