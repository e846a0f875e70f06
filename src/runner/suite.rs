use super::collector::ResultCollector;
use super::events::{EventEmitter, TestEvent};
use super::state::{Category, TestOutcome};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A group of test cases that reports each completed case to a [`Recorder`]
#[async_trait]
pub trait TestSuite: Send + Sync {
    fn name(&self) -> &str;

    fn category(&self) -> Category;

    /// Run every case. Failures are recorded, not returned.
    async fn run(&self, recorder: &Recorder);
}

/// Per-suite handle onto the shared collector
pub struct Recorder {
    suite: String,
    category: Category,
    collector: Arc<ResultCollector>,
    emitter: EventEmitter,
    passed: AtomicUsize,
    failed: AtomicUsize,
}

impl Recorder {
    pub fn new(
        suite: &str,
        category: Category,
        collector: Arc<ResultCollector>,
        emitter: EventEmitter,
    ) -> Self {
        Self {
            suite: suite.to_string(),
            category,
            collector,
            emitter,
            passed: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
        }
    }

    pub fn record(&self, name: &str, passed: bool, description: &str, error: Option<&str>) {
        let outcome = TestOutcome::new(
            name,
            self.category.clone(),
            passed,
            description,
            error.map(str::to_string),
        );

        let counter = if passed { &self.passed } else { &self.failed };
        counter.fetch_add(1, Ordering::Relaxed);

        self.collector.record_outcome(outcome.clone());
        self.emitter.emit(TestEvent::TestFinished {
            suite: self.suite.clone(),
            outcome,
        });
    }

    pub fn pass(&self, name: &str, description: &str) {
        self.record(name, true, description, None);
    }

    pub fn fail(&self, name: &str, description: &str, error: &str) {
        self.record(name, false, description, Some(error));
    }

    /// Record the result of a fallible check
    pub fn check<E: std::fmt::Display>(&self, name: &str, description: &str, result: Result<(), E>) {
        match result {
            Ok(()) => self.pass(name, description),
            Err(e) => self.fail(name, description, &e.to_string()),
        }
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn counts(&self) -> (usize, usize) {
        (
            self.passed.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::ReportConfig;

    #[test]
    fn test_recorder_tags_outcomes_with_suite_category() {
        let tmp = tempfile::tempdir().unwrap();
        let collector = Arc::new(ResultCollector::new(&ReportConfig {
            reports_dir: tmp.path().to_path_buf(),
            ..ReportConfig::default()
        }));
        let recorder = Recorder::new(
            "wikipedia",
            Category::Ui,
            Arc::clone(&collector),
            EventEmitter::default(),
        );

        recorder.pass("search", "Search for a term");
        recorder.check("language", "", Err::<(), _>("URL did not change"));

        let outcomes = collector.outcomes();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.category == Category::Ui));
        assert_eq!(outcomes[1].error.as_deref(), Some("URL did not change"));
        assert_eq!(recorder.counts(), (1, 1));
        assert_eq!(recorder.suite(), "wikipedia");
    }
}
