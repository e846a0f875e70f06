use super::types::ReportDocument;

/// Render the report document as a standalone HTML page
pub fn generate_html(doc: &ReportDocument) -> String {
    let summary = &doc.summary;

    let mut rows_html = String::new();
    for outcome in &doc.outcomes {
        let status = outcome.status_text();
        rows_html.push_str(&format!(
            r#"
            <tr>
                <td>{}</td>
                <td>{}</td>
                <td class="{}">{}</td>
                <td>{}</td>
                <td>{}</td>
            </tr>"#,
            html_escape(outcome.category.as_str()),
            html_escape(&outcome.name),
            status.to_lowercase(),
            status,
            html_escape(&outcome.description),
            html_escape(outcome.error_text()),
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        table {{ border-collapse: collapse; width: 100%; }}
        th, td {{ border: 1px solid #ddd; padding: 8px; text-align: left; }}
        th {{ background-color: #f2f2f2; }}
        .pass {{ color: green; }}
        .fail {{ color: red; }}
        .meta {{ color: #888; font-size: 0.85em; margin-top: 2em; }}
    </style>
</head>
<body>
    <h1>{title}</h1>
    <h2>Summary</h2>
    <p>Execution Time: {duration} seconds</p>
    <p>Total Tests: {total}</p>
    <p>Passed: {passed}</p>
    <p>Failed: {failed}</p>

    <h2>Detailed Results</h2>
    <table>
        <tr><th>Category</th><th>Test Name</th><th>Status</th><th>Description</th><th>Error</th></tr>{rows_html}
    </table>

    <p class="meta">Run {run_id} &middot; Generated {generated_at}</p>
</body>
</html>
"#,
        title = html_escape(&doc.title),
        duration = format_seconds(summary.duration_seconds),
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        rows_html = rows_html,
        run_id = html_escape(&doc.run_id),
        generated_at = html_escape(&doc.generated_at),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn format_seconds(seconds: f64) -> String {
    format!("{:.3}", seconds.max(0.0))
}
