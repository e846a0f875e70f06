use serde::{Deserialize, Serialize};
use std::fmt;

/// Grouping label for the suite that produced an outcome
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Api,
    Ui,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Api => "API",
            Category::Ui => "UI",
            Category::Other(label) => label,
        }
    }
}

impl From<&str> for Category {
    fn from(label: &str) -> Self {
        match label {
            "API" => Category::Api,
            "UI" => Category::Ui,
            other => Category::Other(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(label: String) -> Self {
        match label.as_str() {
            "API" => Category::Api,
            "UI" => Category::Ui,
            _ => Category::Other(label),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestOutcome {
    pub name: String,
    pub category: Category,
    pub passed: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestOutcome {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<Category>,
        passed: bool,
        description: impl Into<String>,
        error: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            passed,
            description: description.into(),
            error,
        }
    }

    pub fn status_text(&self) -> &'static str {
        if self.passed {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// Error cell contents; empty when absent
    pub fn error_text(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from("API"), Category::Api);
        assert_eq!(Category::from("UI"), Category::Ui);
        assert_eq!(Category::from("api"), Category::Other("api".to_string()));
        assert_eq!(Category::from("Perf").to_string(), "Perf");
    }

    #[test]
    fn test_category_serializes_as_plain_label() {
        let outcome = TestOutcome::new("t1", "UI", true, "d1", None);
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains(r#""category":"UI""#));
        assert!(!json.contains("error"));

        let back: TestOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_status_and_error_text() {
        let failed = TestOutcome::new("t2", "API", false, "", None);
        assert_eq!(failed.status_text(), "FAIL");
        assert_eq!(failed.error_text(), "");
    }
}
