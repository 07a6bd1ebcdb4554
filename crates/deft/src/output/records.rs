//! Record output formatting for the show command.

use deft_core::datasource::Record;
use deft_core::recipe::ViewSpec;

use super::helpers::{format_cell, header_line, pad, render_table, Align};

/// Formats records as a JSON array of objects, keeping column order.
pub fn format_records_json(records: &[Record]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Formats records as one table with a column per result column.
///
/// Headers use the view's column titles, falling back to the column name.
pub fn format_records_table(view: &ViewSpec, records: &[Record], use_colors: bool) -> String {
    let Some(first) = records.first() else {
        return "No records found.\n".to_string();
    };

    let columns: Vec<&str> = first.columns().collect();
    let headers: Vec<String> = columns
        .iter()
        .map(|c| view.column_title(c).to_string())
        .collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| record.get(c).map(format_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    render_table(&headers, &rows, use_colors)
}

/// Formats each record as its own key/value table, keys right-aligned.
pub fn format_records_detail(view: &ViewSpec, records: &[Record], use_colors: bool) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let mut output = String::new();
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        let width = record
            .columns()
            .map(|c| view.column_title(c).chars().count())
            .max()
            .unwrap_or(0)
            .max("key".len());

        output.push_str(&header_line(
            &format!("{}  value", pad("key", width, Align::Right)),
            use_colors,
        ));
        for (column, value) in record.iter() {
            let key = pad(view.column_title(column), width, Align::Right);
            output.push_str(format!("{}  {}", key, format_cell(value)).trim_end());
            output.push('\n');
        }
    }
    output
}
