use std::borrow::Cow;
use std::fmt::Write as _;

/// Placeholder line printed under the separator when a report has no rows.
pub const NO_ROWS: &str = "(no rows)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Renders an aligned text grid. Columns whose non-blank cells are all
/// numbers are right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(display_width(cell));
        }
    }
    // Every column is at least as wide as its "---" separator.
    for width in &mut widths {
        *width = (*width).max(3);
    }
    let aligns = (0..column_count)
        .map(|idx| column_alignment(rows, idx))
        .collect::<Vec<_>>();

    let mut output = String::new();
    let header_aligns = vec![Align::Left; column_count];
    let _ = writeln!(output, "{}", format_row(headers, &widths, &header_aligns));

    let separator_cells = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(
        output,
        "{}",
        format_row(&separator_cells, &widths, &header_aligns)
    );

    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, &aligns));
    }
    output
}

/// Renders a grid under a title line, with a placeholder when empty.
pub fn render_titled(title: &str, headers: &[String], rows: &[Vec<String>]) -> String {
    let mut output = format!("{title}\n");
    output.push_str(&render_table(headers, rows));
    if rows.is_empty() {
        output.push_str(NO_ROWS);
        output.push('\n');
    }
    output
}

fn column_alignment(rows: &[Vec<String>], idx: usize) -> Align {
    let mut cells = rows
        .iter()
        .filter_map(|row| row.get(idx))
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .peekable();
    if cells.peek().is_none() {
        return Align::Left;
    }
    if cells.all(|cell| cell.parse::<f64>().is_ok()) {
        Align::Right
    } else {
        Align::Left
    }
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate().take(widths.len()) {
        let sanitized = sanitize_cell(value);
        let padding = " ".repeat(widths[idx].saturating_sub(display_width(&sanitized)));
        let cell = match aligns.get(idx).copied().unwrap_or(Align::Left) {
            Align::Left => format!("{sanitized}{padding}"),
            Align::Right => format!("{padding}{sanitized}"),
        };
        cells.push(cell);
    }
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    let mut width = 0usize;
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            // ANSI escape sequence, e.g. \x1b[31m
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            width += 1;
        }
    }
    width
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}
