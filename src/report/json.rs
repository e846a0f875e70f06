use super::types::ReportDocument;
use super::ReportError;
use std::path::Path;

/// Serialize the report document as pretty JSON
pub fn generate_json(doc: &ReportDocument) -> Result<String, ReportError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Load a report document previously written by [`generate_json`]
pub fn load(path: &Path) -> Result<ReportDocument, ReportError> {
    let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::RunSummary;
    use crate::runner::state::TestOutcome;
    use std::time::Duration;

    #[test]
    fn test_json_shape() {
        let outcomes = vec![
            TestOutcome::new("t1", "API", true, "d1", None),
            TestOutcome::new("t2", "Smoke", false, "d2", Some("boom".to_string())),
        ];
        let doc = ReportDocument {
            run_id: "run-1".to_string(),
            title: "Test Execution Report".to_string(),
            generated_at: "2024-01-01 12:00:00".to_string(),
            summary: RunSummary::from_outcomes(&outcomes, Duration::from_secs(1)),
            outcomes,
        };

        let json = generate_json(&doc).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["runId"], "run-1");
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["durationSeconds"], 1.0);
        assert_eq!(value["outcomes"][1]["category"], "Smoke");
        assert_eq!(value["outcomes"][1]["error"], "boom");
        assert!(value["outcomes"][0].get("error").is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load(&tmp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
