//! Plain ASCII table rendering for the preview and columns commands.

use std::borrow::Cow;
use std::fmt::Write as _;

pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let column_count = headers.len();
    let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();

    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(column_count) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    for width in &mut widths {
        *width = (*width).max(1);
    }

    let mut output = String::new();

    let header_line = format_row(headers, &widths);
    let _ = writeln!(output, "{header_line}");

    let separator_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<usize>>();
    let separator_cells = separator_widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>();
    let separator_line = format_row(&separator_cells, &separator_widths);
    let _ = writeln!(output, "{separator_line}");

    for row in rows {
        let row_line = format_row(row, &widths);
        let _ = writeln!(output, "{row_line}");
    }

    output
}

pub fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let rendered = render_table(headers, rows);
    print!("{rendered}");
}

fn format_row(values: &[String], widths: &[usize]) -> String {
    let mut cells = Vec::with_capacity(values.len());
    for (idx, value) in values.iter().enumerate() {
        if idx >= widths.len() {
            break;
        }
        let sanitized = sanitize_cell(value);
        let display = sanitized.chars().count();
        let mut cell = sanitized.into_owned();
        let padding = widths
            .get(idx)
            .copied()
            .unwrap_or_default()
            .saturating_sub(display);
        if padding > 0 {
            cell.push_str(&" ".repeat(padding));
        }
        cells.push(cell);
    }
    let mut line = cells.join("  ");
    while line.ends_with(' ') {
        line.pop();
    }
    line
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        let mut sanitized = String::with_capacity(value.len());
        for ch in value.chars() {
            match ch {
                '\n' | '\r' | '\t' => sanitized.push(' '),
                other => sanitized.push(other),
            }
        }
        Cow::Owned(sanitized)
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_padded_columns_with_separator() {
        let headers = vec!["Entity".to_string(), "Year".to_string()];
        let rows = vec![vec!["Cape Verde".to_string(), "1985".to_string()]];
        let rendered = render_table(&headers, &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "Entity      Year");
        assert!(lines[1].starts_with("---"));
        assert_eq!(lines[2], "Cape Verde  1985");
    }

    #[test]
    fn control_characters_become_spaces() {
        let headers = vec!["a".to_string()];
        let rows = vec![vec!["x\ty".to_string()]];
        let rendered = render_table(&headers, &rows);
        assert!(rendered.contains("x y"));
    }
}
