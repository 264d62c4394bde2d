use eda_insight::table::{NO_ROWS, render_table, render_titled};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn render_table_right_aligns_numeric_columns() {
    let headers = strings(&["id", "name"]);
    let rows = vec![strings(&["1", "Alice"]), strings(&["2", "Bob"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines, vec!["id   name", "---  -----", "  1  Alice", "  2  Bob"]);
}

#[test]
fn blank_cells_do_not_block_numeric_alignment() {
    let headers = strings(&["salary"]);
    let rows = vec![strings(&["100.5"]), strings(&[""]), strings(&["7"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[2], " 100.5");
    assert_eq!(lines[3], "");
    assert_eq!(lines[4], "     7");
}

#[test]
fn render_table_normalizes_control_characters() {
    let headers = strings(&["note"]);
    let rows = vec![strings(&["line1\nline2\tvalue"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "line1 line2 value");
}

#[test]
fn render_table_handles_unicode_and_ansi_widths() {
    let headers = strings(&["résumé", "status"]);
    let rows = vec![strings(&["café", "\u{1b}[31mERR\u{1b}[0m"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines[0], "résumé  status");
    assert_eq!(lines[2], "café    \u{1b}[31mERR\u{1b}[0m");
}

#[test]
fn short_columns_line_up_with_their_separators() {
    let headers = strings(&["n", "x"]);
    let rows = vec![strings(&["7", "a"]), strings(&["12", "b"])];

    let rendered = render_table(&headers, &rows);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(lines, vec!["n    x", "---  ---", "  7  a", " 12  b"]);
}

#[test]
fn titled_table_marks_empty_reports() {
    let rendered = render_titled("Field Data Types", &strings(&["Field Name"]), &[]);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines, vec!["Field Data Types", "Field Name", "----------", NO_ROWS]);
}
