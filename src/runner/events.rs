use super::state::{Category, TestOutcome};
use crate::report::types::RunSummary;
use tokio::sync::broadcast;

/// Run progress events for real-time updates
#[derive(Debug, Clone)]
pub enum TestEvent {
    // Run events
    RunStarted {
        suite_count: usize,
    },
    RunFinished {
        summary: RunSummary,
    },

    // Suite events
    SuiteStarted {
        suite: String,
        category: Category,
    },
    SuiteFinished {
        suite: String,
        passed: usize,
        failed: usize,
    },

    TestFinished {
        suite: String,
        outcome: TestOutcome,
    },
}

/// Event emitter for broadcasting run events.
///
/// Delivery is best effort; a lagging listener may miss events. The collector,
/// not the event stream, is the record of what happened.
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<TestEvent>,
}

impl EventEmitter {
    pub fn new() -> (Self, broadcast::Receiver<TestEvent>) {
        let (sender, receiver) = broadcast::channel(256);
        (Self { sender }, receiver)
    }

    pub fn emit(&self, event: TestEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TestEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }
}

/// Console event listener for printing real-time updates
pub struct ConsoleEventListener;

impl ConsoleEventListener {
    pub async fn listen(mut receiver: broadcast::Receiver<TestEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    println!("{}", Self::format_event(&event));
                    if matches!(event, TestEvent::RunFinished { .. }) {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::debug!("Console listener skipped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    }

    fn format_event(event: &TestEvent) -> String {
        use colored::Colorize;

        match event {
            TestEvent::RunStarted { suite_count } => format!(
                "\n{} Test run started ({} suites)",
                "▶".green().bold(),
                suite_count
            ),

            TestEvent::SuiteStarted { suite, category } => format!(
                "\n  {} Suite: {} [{}]",
                "→".blue(),
                suite.white().bold(),
                category.to_string().cyan()
            ),

            TestEvent::TestFinished { outcome, .. } => {
                let mark = if outcome.passed {
                    "✓".green()
                } else {
                    "✗".red()
                };
                match &outcome.error {
                    Some(error) if !outcome.passed => format!(
                        "      {} {} {}",
                        mark,
                        outcome.name,
                        format!("({})", error).dimmed()
                    ),
                    _ => format!("      {} {}", mark, outcome.name),
                }
            }

            TestEvent::SuiteFinished {
                suite,
                passed,
                failed,
            } => {
                let status = if *failed == 0 {
                    "PASSED".green().bold()
                } else {
                    "FAILED".red().bold()
                };
                format!(
                    "  {} Suite {} [{}] {} passed, {} failed",
                    "←".blue(),
                    suite,
                    status,
                    passed,
                    failed
                )
            }

            TestEvent::RunFinished { summary } => format!(
                "\n{} Test run finished\n  Total tests: {}\n  {} passed, {} failed\n  Duration: {:.3}s",
                "■".blue().bold(),
                summary.total,
                summary.passed.to_string().green(),
                summary.failed.to_string().red(),
                summary.duration_seconds
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_reaches_subscribers() {
        let (emitter, mut receiver) = EventEmitter::new();
        let mut late = emitter.subscribe();

        emitter.emit(TestEvent::RunStarted { suite_count: 2 });

        assert!(matches!(
            receiver.recv().await,
            Ok(TestEvent::RunStarted { suite_count: 2 })
        ));
        assert!(matches!(
            late.recv().await,
            Ok(TestEvent::RunStarted { suite_count: 2 })
        ));
    }

    #[test]
    fn test_emit_without_listeners_is_silent() {
        let emitter = EventEmitter::default();
        emitter.emit(TestEvent::RunStarted { suite_count: 0 });
    }

    #[test]
    fn test_failed_outcome_line_shows_error() {
        colored::control::set_override(false);
        let line = ConsoleEventListener::format_event(&TestEvent::TestFinished {
            suite: "api".to_string(),
            outcome: TestOutcome::new("t2", "API", false, "", Some("boom".to_string())),
        });
        assert!(line.contains("t2"));
        assert!(line.contains("(boom)"));
    }
}
