mod common;

use std::io::Cursor;

use common::{csv_source, fixture_source};
use eda_insight::{
    config::InsightConfig,
    explore,
    insight::{InsightOutput, InsightView},
    session::{ClearFlag, Session},
    source::SourceKind,
    visualize::{NullVisualizer, PreviewVisualizer},
};

fn session() -> Session {
    Session::new(InsightConfig::default()).expect("session")
}

#[test]
fn fresh_session_renders_nothing() {
    let mut session = session();
    let frame = session.render(&mut NullVisualizer);
    assert!(!frame.has_upload());
    assert!(frame.insight.is_none());
    assert!(frame.errors.is_empty());
    assert_eq!(frame.to_text(), "No file uploaded\n");
}

#[test]
fn workbook_upload_defaults_to_first_sheet() {
    let mut session = session();
    session.upload(fixture_source("quarters.xlsx", SourceKind::Excel));
    let frame = session.render(&mut NullVisualizer);

    assert_eq!(frame.sheets, vec!["Q2", "Q3"]);
    assert_eq!(frame.sheet.as_deref(), Some("Q2"));
    assert_eq!(frame.header_row, Some(0));
    assert!(frame.errors.is_empty(), "{:?}", frame.errors);

    session.select_header_row(2);
    let frame = session.render(&mut NullVisualizer);
    let table = frame.table.expect("normalized table");
    assert_eq!(table.column_names(), vec!["Region", "Units", "Unit Price"]);
    assert_eq!(table.index(), &[0, 1, 2]);
}

#[test]
fn unknown_sheet_is_reported_and_session_continues() {
    let mut session = session();
    session.upload(fixture_source("quarters.xlsx", SourceKind::Excel));
    session.select_sheet("Q1");
    let frame = session.render(&mut NullVisualizer);
    assert!(frame.insight.is_none());
    assert_eq!(frame.errors.len(), 1);
    assert!(frame.errors[0].starts_with("Error loading file:"));
    assert!(frame.errors[0].contains("Q1"));

    session.select_sheet("Q3");
    let frame = session.render(&mut NullVisualizer);
    assert!(frame.errors.is_empty());
    assert_eq!(frame.shape.map(|s| s.rows), Some(2));
}

#[test]
fn clear_discards_upload_on_next_render() {
    let mut session = session();
    session.upload(csv_source("people.csv", "id,name\n1,Ann\n"));
    assert!(session.render(&mut NullVisualizer).has_upload());

    session.request_clear();
    assert_eq!(session.flag(), ClearFlag::ClearRequested);
    let frame = session.render(&mut NullVisualizer);
    assert!(!frame.has_upload());
    assert!(!session.has_upload());
    assert_eq!(session.flag(), ClearFlag::Idle);
}

#[test]
fn wrong_extension_is_refused() {
    let mut session = session();
    session.upload(csv_source("people.xlsx", "id\n1\n"));
    let frame = session.render(&mut NullVisualizer);
    assert!(!frame.has_upload());
    assert!(frame.errors[0].contains("not an accepted CSV file"));
}

#[test]
fn distribution_field_errors_surface_on_the_frame() {
    let mut session = session();
    session.upload(csv_source("people.csv", "id,name\n1,Ann\n2,Bob\n"));
    session.select_view(InsightView::Distribution);
    session.select_field(Some("Id".to_string()));
    let frame = session.render(&mut NullVisualizer);
    assert!(frame.insight.is_none());
    assert!(frame.errors[0].contains("needs a text column"));

    session.select_field(None);
    let frame = session.render(&mut NullVisualizer);
    match frame.insight {
        Some(InsightOutput::Distribution(distribution)) => {
            assert_eq!(distribution.counts().unwrap().field, "Name");
        }
        other => panic!("unexpected insight {other:?}"),
    }
    assert_eq!(frame.text_fields, vec!["Name"]);
}

#[test]
fn preview_failure_does_not_hide_the_insight() {
    let mut session = session();
    session.upload(csv_source("people.csv", "id\n1\n"));
    let mut preview = PreviewVisualizer::new(Vec::new(), 5);
    let frame = session.render(&mut preview);
    assert!(frame.insight.is_some());
    assert!(frame.errors.is_empty());
    let text = String::from_utf8(preview.into_inner()).unwrap();
    assert!(text.starts_with("Id"));
}

#[test]
fn scripted_exploration_renders_after_each_command() {
    let workbook = common::fixture_path("quarters.xlsx");
    let script = format!(
        "upload {}\nsheet Q3\nview summary\nhelp\nclear\nquit\nview types\n",
        workbook.display()
    );
    let mut session = session();
    let mut output = Vec::new();
    explore::run(
        &mut session,
        Cursor::new(script),
        &mut output,
        &mut NullVisualizer,
    )
    .expect("run script");
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("File: quarters.xlsx (Excel)"));
    assert!(text.contains("Sheet: Q3 (header row 0)"));
    assert!(text.contains("Data Summary"));
    assert!(text.contains("Commands:"));
    assert!(text.ends_with("No file uploaded\n"));
    assert_eq!(session.view(), InsightView::Summary);
}
