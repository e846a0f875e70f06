use super::state::Category;
use super::suite::{Recorder, TestSuite};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// HTTP API checks loaded from a YAML file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpSuiteFile {
    pub name: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub checks: Vec<HttpCheck>,
}

fn default_category() -> String {
    "API".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

/// One request and the assertions made on its response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpCheck {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_method")]
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
    #[serde(default = "default_status")]
    pub expect_status: u16,
    /// Response body must be a non-empty array or object
    #[serde(default)]
    pub expect_non_empty: bool,
    /// Top-level fields that must be present and non-null
    #[serde(default)]
    pub expect_fields: Vec<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}

impl HttpCheck {
    /// Check a response against this check's expectations
    pub fn evaluate(&self, status: u16, body: &Value) -> Result<(), String> {
        if status != self.expect_status {
            return Err(format!(
                "Expected status {} but got {}",
                self.expect_status, status
            ));
        }

        if self.expect_non_empty {
            let empty = match body {
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                Value::Null => true,
                _ => false,
            };
            if empty {
                return Err("Response body should not be empty".to_string());
            }
        }

        // Arrays are checked through their first element
        let target = match body {
            Value::Array(items) => items.first().unwrap_or(&Value::Null),
            other => other,
        };
        for field in &self.expect_fields {
            if target.get(field).map_or(true, Value::is_null) {
                return Err(format!("Missing field '{}' in response", field));
            }
        }

        Ok(())
    }
}

/// Suite running [`HttpCheck`]s sequentially against one base URL
pub struct HttpSuite {
    spec: HttpSuiteFile,
    client: reqwest::Client,
}

impl HttpSuite {
    pub fn new(spec: HttpSuiteFile) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(spec.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { spec, client })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite file {}", path.display()))?;
        let spec: HttpSuiteFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Invalid suite file {}", path.display()))?;
        Self::new(spec)
    }

    async fn execute(&self, check: &HttpCheck) -> Result<(), String> {
        let url = format!(
            "{}/{}",
            self.spec.base_url.trim_end_matches('/'),
            check.path.trim_start_matches('/')
        );
        let method = reqwest::Method::from_bytes(check.method.to_uppercase().as_bytes())
            .map_err(|_| format!("Unsupported method '{}'", check.method))?;

        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method, &url);
        if let Some(body) = &check.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response body: {}", e))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        check.evaluate(status, &body)
    }
}

#[async_trait]
impl TestSuite for HttpSuite {
    fn name(&self) -> &str {
        &self.spec.name
    }

    fn category(&self) -> Category {
        Category::from(self.spec.category.as_str())
    }

    async fn run(&self, recorder: &Recorder) {
        for check in &self.spec.checks {
            log::debug!("[{}] {}", recorder.suite(), check.name);
            let result = self.execute(check).await;
            recorder.check(&check.name, &check.description, result);
        }
    }
}
