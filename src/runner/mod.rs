pub mod collector;
pub mod events;
pub mod http;
pub mod state;
pub mod suite;

use std::sync::Arc;

pub use collector::ResultCollector;
pub use events::*;
pub use state::*;
pub use suite::{Recorder, TestSuite};

/// Run suites concurrently, recording into `collector`.
///
/// Returns once every suite task has finished. A suite that panics is logged
/// and recorded as a failed case; outcomes it recorded before panicking stay
/// in the log.
pub async fn run_suites(
    suites: Vec<Arc<dyn TestSuite>>,
    collector: Arc<ResultCollector>,
    emitter: EventEmitter,
) {
    emitter.emit(TestEvent::RunStarted {
        suite_count: suites.len(),
    });

    let mut handles = Vec::new();
    for suite in suites {
        let collector = Arc::clone(&collector);
        let emitter = emitter.clone();
        let name = suite.name().to_string();
        let category = suite.category();

        let handle = tokio::spawn(async move {
            let recorder = Recorder::new(suite.name(), suite.category(), collector, emitter.clone());

            emitter.emit(TestEvent::SuiteStarted {
                suite: suite.name().to_string(),
                category: suite.category(),
            });

            suite.run(&recorder).await;

            let (passed, failed) = recorder.counts();
            emitter.emit(TestEvent::SuiteFinished {
                suite: suite.name().to_string(),
                passed,
                failed,
            });
        });
        handles.push((name, category, handle));
    }

    for (name, category, handle) in handles {
        if let Err(e) = handle.await {
            log::error!("Suite '{}' aborted: {}", name, e);
            collector.record(
                &name,
                category,
                false,
                "Suite aborted before completion",
                Some(&e.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::config::ReportConfig;
    use async_trait::async_trait;

    struct CountingSuite {
        name: String,
        cases: usize,
    }

    #[async_trait]
    impl TestSuite for CountingSuite {
        fn name(&self) -> &str {
            &self.name
        }

        fn category(&self) -> Category {
            Category::Other(self.name.clone())
        }

        async fn run(&self, recorder: &Recorder) {
            for i in 0..self.cases {
                tokio::task::yield_now().await;
                recorder.record(&format!("case-{}", i), i % 2 == 0, "", None);
            }
        }
    }

    struct PanickingSuite;

    #[async_trait]
    impl TestSuite for PanickingSuite {
        fn name(&self) -> &str {
            "broken"
        }

        fn category(&self) -> Category {
            Category::Api
        }

        async fn run(&self, recorder: &Recorder) {
            recorder.pass("first", "");
            panic!("driver crashed");
        }
    }

    fn collector() -> (tempfile::TempDir, Arc<ResultCollector>) {
        let tmp = tempfile::tempdir().unwrap();
        let collector = Arc::new(ResultCollector::new(&ReportConfig {
            reports_dir: tmp.path().join("reports"),
            ..ReportConfig::default()
        }));
        (tmp, collector)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_suites_lose_nothing() {
        let (_tmp, collector) = collector();
        let suites: Vec<Arc<dyn TestSuite>> = (0..6)
            .map(|i| {
                Arc::new(CountingSuite {
                    name: format!("suite{}", i),
                    cases: 40,
                }) as Arc<dyn TestSuite>
            })
            .collect();

        run_suites(suites, Arc::clone(&collector), EventEmitter::default()).await;

        let outcomes = collector.outcomes();
        assert_eq!(outcomes.len(), 6 * 40);
        for i in 0..6 {
            let label = format!("suite{}", i);
            let names: Vec<_> = outcomes
                .iter()
                .filter(|o| o.category.as_str() == label)
                .map(|o| o.name.as_str())
                .collect();
            let expected: Vec<_> = (0..40).map(|c| format!("case-{}", c)).collect();
            assert_eq!(names, expected);
        }
    }

    #[tokio::test]
    async fn test_panicking_suite_is_recorded_as_failure() {
        let (_tmp, collector) = collector();
        let suites: Vec<Arc<dyn TestSuite>> = vec![
            Arc::new(PanickingSuite),
            Arc::new(CountingSuite {
                name: "ok".to_string(),
                cases: 2,
            }),
        ];

        run_suites(suites, Arc::clone(&collector), EventEmitter::default()).await;

        let outcomes = collector.outcomes();
        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().any(|o| o.name == "first" && o.passed));
        let aborted = outcomes
            .iter()
            .find(|o| o.name == "broken" && !o.passed)
            .unwrap();
        assert!(aborted.error.as_deref().unwrap().contains("panicked"));
    }

    #[tokio::test]
    async fn test_events_follow_run_lifecycle() {
        let (_tmp, collector) = collector();
        let (emitter, mut receiver) = EventEmitter::new();
        let suites: Vec<Arc<dyn TestSuite>> = vec![Arc::new(CountingSuite {
            name: "single".to_string(),
            cases: 1,
        })];

        run_suites(suites, collector, emitter).await;

        assert!(matches!(
            receiver.recv().await,
            Ok(TestEvent::RunStarted { suite_count: 1 })
        ));
        assert!(matches!(
            receiver.recv().await,
            Ok(TestEvent::SuiteStarted { .. })
        ));
        assert!(matches!(
            receiver.recv().await,
            Ok(TestEvent::TestFinished { .. })
        ));
        assert!(matches!(
            receiver.recv().await,
            Ok(TestEvent::SuiteFinished {
                passed: 1,
                failed: 0,
                ..
            })
        ));
    }
}
