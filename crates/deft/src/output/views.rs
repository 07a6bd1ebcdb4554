//! View listing output formatting.

use deft_core::recipe::ViewSummary;
use serde::Serialize;

use super::helpers::render_table;

/// JSON output structure for a single view.
#[derive(Serialize)]
pub struct ViewOutput<'a> {
    pub label: &'a str,
    pub title: &'a str,
    pub path: String,
    pub description: &'a str,
}

/// Formats views as JSON.
pub fn format_views_json(views: &[ViewSummary]) -> Result<String, serde_json::Error> {
    let output: Vec<ViewOutput> = views
        .iter()
        .map(|v| ViewOutput {
            label: &v.label,
            title: &v.title,
            path: v.path.display().to_string(),
            description: &v.description,
        })
        .collect();
    serde_json::to_string_pretty(&output)
}

/// Formats views as a table.
pub fn format_views_table(views: &[ViewSummary], use_colors: bool) -> String {
    if views.is_empty() {
        return "No views found.\n".to_string();
    }

    let headers = ["Label", "Title", "YAML", "Description"].map(String::from);
    let rows: Vec<Vec<String>> = views
        .iter()
        .map(|v| {
            vec![
                v.label.clone(),
                v.title.clone(),
                v.path.display().to_string(),
                v.description.clone(),
            ]
        })
        .collect();
    render_table(&headers, &rows, use_colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn views() -> Vec<ViewSummary> {
        vec![ViewSummary {
            label: "tickets.open".to_string(),
            title: "Open".to_string(),
            path: PathBuf::from("/r/views/tickets/open.yaml"),
            description: String::new(),
        }]
    }

    #[test]
    fn test_views_table() {
        let table = format_views_table(&views(), false);
        let mut lines = table.lines();
        assert_eq!(
            lines.next(),
            Some("Label         Title  YAML                        Description")
        );
        assert_eq!(
            lines.next(),
            Some("tickets.open  Open   /r/views/tickets/open.yaml")
        );
    }

    #[test]
    fn test_views_empty() {
        assert_eq!(format_views_table(&[], false), "No views found.\n");
    }

    #[test]
    fn test_views_json() {
        let json = format_views_json(&views()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["label"], "tickets.open");
        assert_eq!(parsed[0]["path"], "/r/views/tickets/open.yaml");
    }
}
