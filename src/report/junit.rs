use super::types::ReportDocument;
use super::ReportError;
use crate::runner::state::{Category, TestOutcome};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Generate a JUnit XML document with one `<testsuite>` per category
pub fn generate_junit_xml(doc: &ReportDocument) -> Result<String, ReportError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let summary = &doc.summary;
    let mut suites_start = BytesStart::new("testsuites");
    suites_start.push_attribute(("name", doc.title.as_str()));
    suites_start.push_attribute(("tests", summary.total.to_string().as_str()));
    suites_start.push_attribute(("failures", summary.failed.to_string().as_str()));
    suites_start.push_attribute(("time", format!("{:.3}", summary.duration_seconds).as_str()));
    write(&mut writer, Event::Start(suites_start))?;

    for (category, outcomes) in group_by_category(&doc.outcomes) {
        let failures = outcomes.iter().filter(|o| !o.passed).count();

        let mut suite_start = BytesStart::new("testsuite");
        suite_start.push_attribute(("name", category.as_str()));
        suite_start.push_attribute(("tests", outcomes.len().to_string().as_str()));
        suite_start.push_attribute(("failures", failures.to_string().as_str()));
        suite_start.push_attribute(("id", doc.run_id.as_str()));
        suite_start.push_attribute(("timestamp", doc.generated_at.as_str()));
        write(&mut writer, Event::Start(suite_start))?;

        for outcome in outcomes {
            write_test_case(&mut writer, outcome)?;
        }

        write(&mut writer, Event::End(BytesEnd::new("testsuite")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("testsuites")))?;

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| ReportError::Xml(e.to_string()))
}

fn write_test_case<W: std::io::Write>(
    writer: &mut Writer<W>,
    outcome: &TestOutcome,
) -> Result<(), ReportError> {
    let mut case_start = BytesStart::new("testcase");
    case_start.push_attribute(("name", outcome.name.as_str()));
    case_start.push_attribute(("classname", outcome.category.as_str()));

    if outcome.passed {
        return write(writer, Event::Empty(case_start));
    }

    write(writer, Event::Start(case_start))?;

    let mut fail_start = BytesStart::new("failure");
    fail_start.push_attribute(("message", outcome.error_text()));
    fail_start.push_attribute(("type", "AssertionError"));

    match outcome.error.as_deref() {
        Some(err) if !err.is_empty() => {
            write(writer, Event::Start(fail_start))?;
            write(writer, Event::Text(BytesText::new(err)))?;
            write(writer, Event::End(BytesEnd::new("failure")))?;
        }
        _ => write(writer, Event::Empty(fail_start))?,
    }

    write(writer, Event::End(BytesEnd::new("testcase")))
}

/// Outcomes grouped by category, categories in first-seen order
fn group_by_category(outcomes: &[TestOutcome]) -> Vec<(&Category, Vec<&TestOutcome>)> {
    let mut groups: Vec<(&Category, Vec<&TestOutcome>)> = Vec::new();
    for outcome in outcomes {
        match groups.iter_mut().find(|(c, _)| *c == &outcome.category) {
            Some((_, members)) => members.push(outcome),
            None => groups.push((&outcome.category, vec![outcome])),
        }
    }
    groups
}

fn write<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), ReportError> {
    writer
        .write_event(event)
        .map_err(|e| ReportError::Xml(e.to_string()))
}
