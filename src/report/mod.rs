pub mod html;
pub mod json;
pub mod junit;
pub mod types;

use crate::runner::collector::ResultCollector;
use crate::utils::config::{ReportConfig, ReportFormat};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use types::{ReportDocument, RunSummary};

/// Upper bound on `_N` suffixes tried for a single timestamp
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// A written report: the HTML path and the summary it was rendered from
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub path: PathBuf,
    pub summary: RunSummary,
}

/// Render the collector's outcomes into a report and return the HTML path.
///
/// The collector is only read. Sibling JSON/JUnit artifacts requested by the
/// config are written next to the HTML file; their failures are logged and do
/// not fail the render.
pub fn render(collector: &ResultCollector, config: &ReportConfig) -> Result<PathBuf, ReportError> {
    render_report(collector, config).map(|report| report.path)
}

/// Like [`render`], also returning the summary written into the report
pub fn render_report(
    collector: &ResultCollector,
    config: &ReportConfig,
) -> Result<RenderedReport, ReportError> {
    render_at(collector, config, Instant::now(), Local::now())
}

/// Like [`render`], but reports failures on the log and stderr instead of
/// returning them. Recorded outcomes are unaffected either way.
pub fn render_or_log(collector: &ResultCollector, config: &ReportConfig) -> Option<PathBuf> {
    match render(collector, config) {
        Ok(path) => Some(path),
        Err(e) => {
            log::error!("Error generating report: {}", e);
            eprintln!("Error generating report: {}", e);
            None
        }
    }
}

pub(crate) fn render_at(
    collector: &ResultCollector,
    config: &ReportConfig,
    ended_at: Instant,
    now: DateTime<Local>,
) -> Result<RenderedReport, ReportError> {
    // saturating: an end instant before the start yields zero
    let elapsed = ended_at.saturating_duration_since(collector.started_at());
    let outcomes = collector.outcomes();
    let summary = RunSummary::from_outcomes(&outcomes, elapsed);

    let doc = ReportDocument {
        run_id: uuid::Uuid::new_v4().to_string(),
        title: config.title.clone(),
        generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        summary,
        outcomes,
    };

    let path = write_document(&doc, collector.reports_dir(), config, now)?;
    Ok(RenderedReport {
        path,
        summary: doc.summary,
    })
}

/// Re-render a JSON report previously written by the renderer
pub fn render_from_json(results: &Path, config: &ReportConfig) -> Result<PathBuf, ReportError> {
    let doc = json::load(results)?;
    write_document(&doc, &config.reports_dir, config, Local::now())
}

fn write_document(
    doc: &ReportDocument,
    dir: &Path,
    config: &ReportConfig,
    now: DateTime<Local>,
) -> Result<PathBuf, ReportError> {
    std::fs::create_dir_all(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let formats: Vec<ReportFormat> = [ReportFormat::Html, ReportFormat::Json, ReportFormat::Junit]
        .into_iter()
        .filter(|f| config.wants(*f))
        .collect();
    let files = claim_files(dir, &now, &formats)?;

    let mut files = files.into_iter();
    let mut html_path = None;
    while let Some((format, path, file)) = files.next() {
        let content = match format {
            ReportFormat::Html => Ok(html::generate_html(doc)),
            ReportFormat::Json => json::generate_json(doc),
            ReportFormat::Junit => junit::generate_junit_xml(doc),
        };
        let result = content.and_then(|content| write_all(&path, file, content.as_bytes()));

        match (format, result) {
            (ReportFormat::Html, Ok(())) => html_path = Some(path),
            (ReportFormat::Html, Err(e)) => {
                let _ = std::fs::remove_file(&path);
                release(files.collect());
                return Err(e);
            }
            (_, Ok(())) => log::info!("Wrote {}", path.display()),
            (_, Err(e)) => {
                let _ = std::fs::remove_file(&path);
                log::warn!("Skipping {:?} report: {}", format, e);
            }
        }
    }

    // Html is always claimed, and first
    let html_path = html_path.ok_or_else(|| ReportError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(ErrorKind::Other, "no HTML report claimed"),
    })?;

    log::info!(
        "Report written to {} ({} passed, {} failed)",
        html_path.display(),
        doc.summary.passed,
        doc.summary.failed
    );

    Ok(html_path)
}

/// Create every artifact file for the first free stem.
///
/// Stems are `TestReport_<yyyyMMdd_HHmmss>`, then `_1`, `_2`, ... Each file is
/// opened with `create_new`, so concurrent renders never share a stem. A stem
/// with any name already taken is released and the next one tried.
fn claim_files(
    dir: &Path,
    now: &DateTime<Local>,
    formats: &[ReportFormat],
) -> Result<Vec<(ReportFormat, PathBuf, File)>, ReportError> {
    let base = format!("TestReport_{}", now.format("%Y%m%d_%H%M%S"));

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let stem = if attempt == 0 {
            base.clone()
        } else {
            format!("{}_{}", base, attempt)
        };

        let mut claimed = Vec::with_capacity(formats.len());
        let mut taken = false;
        for format in formats {
            let path = dir.join(format!("{}.{}", stem, format.extension()));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => claimed.push((*format, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    taken = true;
                    break;
                }
                Err(source) => {
                    release(claimed);
                    return Err(ReportError::Io { path, source });
                }
            }
        }

        if !taken {
            return Ok(claimed);
        }
        release(claimed);
    }

    Err(ReportError::Io {
        path: dir.join(format!("{}.{}", base, ReportFormat::Html.extension())),
        source: std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free report name after {} attempts", MAX_NAME_ATTEMPTS),
        ),
    })
}

fn release(claimed: Vec<(ReportFormat, PathBuf, File)>) {
    for (_, path, file) in claimed {
        drop(file);
        let _ = std::fs::remove_file(&path);
    }
}

fn write_all(path: &Path, mut file: File, content: &[u8]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };

    file.write_all(content).map_err(io_err)?;
    file.flush().map_err(io_err)
}
