use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;

use suite_reporter::report::{self, types::RunSummary};
use suite_reporter::runner::{self, http::HttpSuite, ConsoleEventListener, EventEmitter, TestEvent};
use suite_reporter::utils::config::{ReportConfig, ReportFormat};
use suite_reporter::ResultCollector;

#[derive(Parser)]
#[command(name = "suite-reporter")]
#[command(version)]
#[command(about = "Run test suites and aggregate their outcomes into one report", long_about = None)]
struct Cli {
    /// Report configuration file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory for report artifacts
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run HTTP check suite file(s) and render a report
    Run {
        /// Suite files (YAML)
        #[arg(required = true)]
        suites: Vec<PathBuf>,

        /// Additional report formats besides HTML
        #[arg(short, long, value_delimiter = ',')]
        format: Vec<ReportFormat>,
    },

    /// Re-render an HTML report from a JSON report
    Report {
        /// Path to a JSON report
        results: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    }
    .with_env();
    if let Some(dir) = cli.reports_dir {
        config.reports_dir = dir;
    }

    match cli.command {
        Commands::Run { suites, format } => {
            for f in format {
                if !config.formats.contains(&f) {
                    config.formats.push(f);
                }
            }

            let mut loaded: Vec<Arc<dyn runner::TestSuite>> = Vec::new();
            for path in &suites {
                loaded.push(Arc::new(HttpSuite::from_file(path)?));
            }

            println!(
                "{} Running {} suite(s)",
                "▶".green().bold(),
                loaded.len()
            );
            println!(
                "  Reports: {}",
                config.reports_dir.display().to_string().cyan()
            );

            let collector = Arc::new(ResultCollector::new(&config));
            let (emitter, receiver) = EventEmitter::new();
            let listener = tokio::spawn(ConsoleEventListener::listen(receiver));

            runner::run_suites(loaded, Arc::clone(&collector), emitter.clone()).await;

            // The console summary is the one written into the report
            let rendered = report::render_report(&collector, &config);
            let summary = match &rendered {
                Ok(report) => report.summary.clone(),
                Err(_) => RunSummary::from_outcomes(
                    &collector.outcomes(),
                    collector.started_at().elapsed(),
                ),
            };
            emitter.emit(TestEvent::RunFinished {
                summary: summary.clone(),
            });
            drop(emitter);
            let _ = listener.await;

            match rendered {
                Ok(report) => println!(
                    "\n{} Report saved to: {}",
                    "📊".to_string().blue(),
                    report.path.display().to_string().cyan()
                ),
                Err(e) => {
                    log::error!("Error generating report: {}", e);
                    eprintln!("Error generating report: {}", e);
                }
            }

            if summary.failed > 0 {
                std::process::exit(1);
            }
        }

        Commands::Report { results } => {
            println!(
                "{} Rendering report from: {}",
                "📊".to_string().blue(),
                results.display()
            );
            let path = report::render_from_json(&results, &config)?;
            println!("HTML report saved to: {}", path.display());
        }
    }

    Ok(())
}
