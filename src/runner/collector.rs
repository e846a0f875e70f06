use super::state::{Category, TestOutcome};
use crate::utils::config::ReportConfig;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

/// Append-only log of test outcomes for a single run.
///
/// Created once at the start of a run, shared by reference (or `Arc`) with
/// every suite, and handed to the renderer once at the end. Recording never
/// fails and never panics into the calling test.
#[derive(Debug)]
pub struct ResultCollector {
    outcomes: Mutex<Vec<TestOutcome>>,
    started_at: Instant,
    started_wall: DateTime<Local>,
    reports_dir: PathBuf,
}

impl ResultCollector {
    pub fn new(config: &ReportConfig) -> Self {
        let reports_dir = config.reports_dir.clone();

        if let Err(e) = std::fs::create_dir_all(&reports_dir) {
            log::warn!(
                "Could not create reports directory {}: {}",
                reports_dir.display(),
                e
            );
        }

        Self {
            outcomes: Mutex::new(Vec::new()),
            started_at: Instant::now(),
            started_wall: Local::now(),
            reports_dir,
        }
    }

    /// Collector writing to the default reports directory
    pub fn create() -> Self {
        Self::new(&ReportConfig::default())
    }

    pub fn record(
        &self,
        name: &str,
        category: impl Into<Category>,
        passed: bool,
        description: &str,
        error: Option<&str>,
    ) {
        self.record_outcome(TestOutcome::new(
            name,
            category,
            passed,
            description,
            error.map(str::to_string),
        ));
    }

    pub fn record_outcome(&self, outcome: TestOutcome) {
        log::debug!(
            "Recorded {} [{}] {}",
            outcome.name,
            outcome.category,
            outcome.status_text()
        );
        self.lock().push(outcome);
    }

    /// Snapshot of every outcome in record order
    pub fn outcomes(&self) -> Vec<TestOutcome> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn started_wall(&self) -> DateTime<Local> {
        self.started_wall
    }

    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    // A producer that panicked mid-push cannot leave a half-written entry,
    // so the data behind a poisoned lock is still valid.
    fn lock(&self) -> MutexGuard<'_, Vec<TestOutcome>> {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
