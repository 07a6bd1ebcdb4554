//! Create command implementation.
//!
//! Inserts a record through a form's `insert` statement with values from the
//! editor or from `--values`.

use chrono::Local;
use deft_core::datasource::{DataSource, Params};
use deft_core::form::{create_draft, default_values, FormError};
use deft_core::values::{merge_nested, params_from_mapping, parse_values};
use tracing::debug;

use super::draft::{report_success, submit_interactively};
use super::{CommandContext, Result};

/// Options for the create command.
#[derive(Debug, Default)]
pub struct CreateOptions {
    /// Form label.
    pub label: String,
    /// `key:value` entries; when present the editor is skipped.
    pub values: Vec<String>,
}

/// Executes the create command.
pub async fn execute(ctx: &CommandContext, opts: &CreateOptions) -> Result<()> {
    let recipes = ctx.recipes()?;
    let form = recipes.form(&opts.label)?;
    let insert = form
        .insert
        .as_deref()
        .ok_or_else(|| FormError::MissingStatement {
            label: opts.label.clone(),
            statement: "insert",
        })?;
    let overrides = if opts.values.is_empty() {
        None
    } else {
        Some(parse_values(&opts.values)?)
    };

    let source = recipes.source(&form.source)?;
    let mut db = DataSource::open(&source).await?;
    let today = Local::now().date_naive();

    let outcome = match overrides {
        Some(values) => {
            let mut reviewed = default_values(&form, today);
            merge_nested(&mut reviewed, values);
            let params = params_from_mapping(&reviewed)?;
            Some(db.execute(insert, &params).await?)
        }
        None => {
            let initial = create_draft(&form, today)?;
            submit_interactively(ctx, &mut db, insert, &initial, &Params::new()).await?
        }
    };
    db.close().await?;

    match outcome {
        Some(rows) => report_success(ctx, "created", rows),
        None => {
            debug!("create aborted");
            Ok(())
        }
    }
}
