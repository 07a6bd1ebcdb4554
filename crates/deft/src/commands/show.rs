//! Show command implementation.
//!
//! Runs a view's query, optionally narrowed by a filter expression.

use deft_core::datasource::{infer_params, DataSource, Params};
use deft_core::filter::FilterCompiler;
use deft_core::recipe::{RecipeError, ViewSpec};
use tracing::debug;

use super::{CommandContext, Result};
use crate::output;

/// Options for the show command.
#[derive(Debug, Default)]
pub struct ShowOptions {
    /// View label.
    pub label: String,
    /// Use the detail query.
    pub detail: bool,
    /// Filter expression.
    pub filter: Option<String>,
}

/// Builds the statement and parameters for a view.
///
/// The filter is compiled before anything touches the database, so a bad
/// expression fails fast.
pub fn build_query(view: &ViewSpec, opts: &ShowOptions) -> Result<(String, Params)> {
    let base = if opts.detail {
        view.detail.as_deref().ok_or_else(|| RecipeError::MissingQuery {
            label: opts.label.clone(),
            query: "detail",
        })?
    } else {
        view.list.as_str()
    };

    match opts.filter.as_deref() {
        Some(expression) => {
            let compiled = FilterCompiler::compile(expression)?;
            debug!(
                predicate = %compiled.sql,
                bindings = ?compiled.bindings.keys().collect::<Vec<_>>(),
                "compiled filter"
            );
            Ok((compiled.wrap(base), infer_params(&compiled)))
        }
        None => {
            let query = base.trim().trim_end_matches(';').trim_end();
            Ok((query.to_string(), Params::new()))
        }
    }
}

/// Executes the show command.
pub async fn execute(ctx: &CommandContext, opts: &ShowOptions) -> Result<()> {
    let recipes = ctx.recipes()?;
    let view = recipes.view(&opts.label)?;
    let (sql, params) = build_query(&view, opts)?;
    let source = recipes.source(&view.source)?;

    let mut db = DataSource::open(&source).await?;
    let records = db.fetch_all(&sql, &params).await?;
    db.close().await?;
    debug!(rows = records.len(), "fetched records");

    if ctx.json_output {
        println!("{}", output::format_records_json(&records)?);
    } else if opts.detail {
        print!(
            "{}",
            output::format_records_detail(&view, &records, ctx.use_colors)
        );
    } else {
        print!(
            "{}",
            output::format_records_table(&view, &records, ctx.use_colors)
        );
    }

    Ok(())
}
