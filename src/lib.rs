pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use report::{render, render_or_log, render_report, RenderedReport, ReportError};
pub use runner::{run_suites, Category, ResultCollector, TestOutcome};
pub use utils::config::ReportConfig;
