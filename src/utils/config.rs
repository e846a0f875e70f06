use crate::report::ReportError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default directory that reports are written to
pub const DEFAULT_REPORTS_DIR: &str = "test-output/reports";

/// Environment variable overriding the reports directory
pub const REPORTS_DIR_ENV: &str = "SUITE_REPORTS_DIR";

/// Artifact formats the renderer can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Json,
    Junit,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
            ReportFormat::Junit => "xml",
        }
    }
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportConfig {
    /// Directory that receives report artifacts
    pub reports_dir: PathBuf,

    /// Heading of the rendered document
    pub title: String,

    /// Artifacts to write. HTML is always written.
    pub formats: Vec<ReportFormat>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            title: "Test Execution Report".to_string(),
            formats: vec![ReportFormat::Html],
        }
    }
}

impl ReportConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ReportError> {
        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply the environment override for the reports directory
    pub fn with_env(mut self) -> Self {
        if let Some(dir) = std::env::var_os(REPORTS_DIR_ENV) {
            if !dir.is_empty() {
                self.reports_dir = PathBuf::from(dir);
            }
        }
        self
    }

    pub fn wants(&self, format: ReportFormat) -> bool {
        format == ReportFormat::Html || self.formats.contains(&format)
    }
}
