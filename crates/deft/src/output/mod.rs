//! Output formatting utilities for the deft CLI.
//!
//! - [`records`] - Record output for `show` (table, detail, JSON)
//! - [`views`] - View listing output
//! - [`helpers`] - Common formatting utilities (truncation, padding, tables)

pub mod helpers;
mod records;
mod views;

pub use records::{format_records_detail, format_records_json, format_records_table};
pub use views::{format_views_json, format_views_table};
