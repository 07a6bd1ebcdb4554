//! Common helper functions for output formatting.

use owo_colors::OwoColorize;
use serde_json::Value;

/// Widest a table cell may get before it is truncated.
pub const MAX_CELL_WIDTH: usize = 48;

/// Truncates a string to a maximum number of characters.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Renders a value for a table cell. Nulls show as `NULL` and line breaks are
/// flattened.
pub fn format_cell(value: &Value) -> String {
    let text = match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    text.replace(['\r', '\n'], " ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Pads `s` with spaces to `width` characters.
pub fn pad(s: &str, width: usize, align: Align) -> String {
    let fill = " ".repeat(width.saturating_sub(s.chars().count()));
    match align {
        Align::Left => format!("{s}{fill}"),
        Align::Right => format!("{fill}{s}"),
    }
}

/// Dims a header line when colors are enabled.
pub fn header_line(line: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n", line.dimmed())
    } else {
        format!("{line}\n")
    }
}

/// Lays out rows of cells into padded columns with a header line.
pub fn render_table(headers: &[String], rows: &[Vec<String>], use_colors: bool) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|h| h.chars().count().min(MAX_CELL_WIDTH))
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count().min(MAX_CELL_WIDTH));
        }
    }

    let line = |cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| pad(&truncate_str(cell, width), width, Align::Left))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut output = header_line(&line(headers), use_colors);
    for row in rows {
        output.push_str(&line(row));
        output.push('\n');
    }
    output
}
