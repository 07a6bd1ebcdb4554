//! Edit command implementation.
//!
//! Fetches one record through a form's `detail` query and updates it with
//! values from the editor or from `--values`.

use chrono::Local;
use deft_core::datasource::{DataSource, ParamValue, Params};
use deft_core::form::{edit_draft, editable_values, FormError};
use deft_core::values::{merge_nested, params_from_mapping, parse_values};
use tracing::debug;

use super::draft::{report_success, submit_interactively};
use super::{CommandContext, Result};

/// Options for the edit command.
#[derive(Debug, Default)]
pub struct EditOptions {
    /// Form label.
    pub label: String,
    /// Primary key of the record.
    pub pk: String,
    /// `key:value` entries; when present the editor is skipped.
    pub values: Vec<String>,
}

/// Parameters every update statement receives besides the reviewed values.
fn pk_params(pk: &str) -> Params {
    Params::from([("pk".to_string(), ParamValue::infer(pk))])
}

/// Executes the edit command.
pub async fn execute(ctx: &CommandContext, opts: &EditOptions) -> Result<()> {
    let recipes = ctx.recipes()?;
    let form = recipes.form(&opts.label)?;
    let missing = |statement| FormError::MissingStatement {
        label: opts.label.clone(),
        statement,
    };
    let detail = form.detail.as_deref().ok_or_else(|| missing("detail"))?;
    let update = form.update.as_deref().ok_or_else(|| missing("update"))?;
    let overrides = if opts.values.is_empty() {
        None
    } else {
        Some(parse_values(&opts.values)?)
    };

    let source = recipes.source(&form.source)?;
    let mut db = DataSource::open(&source).await?;
    let fixed = pk_params(&opts.pk);

    let row = db
        .fetch_optional(detail, &fixed)
        .await?
        .ok_or_else(|| FormError::RecordNotFound {
            pk: opts.pk.clone(),
        })?;
    let today = Local::now().date_naive();

    let outcome = match overrides {
        Some(values) => {
            let mut reviewed = editable_values(&form, &row, today);
            merge_nested(&mut reviewed, values);
            let mut params = params_from_mapping(&reviewed)?;
            params.extend(fixed);
            Some(db.execute(update, &params).await?)
        }
        None => {
            let initial = edit_draft(&form, &row, today)?;
            submit_interactively(ctx, &mut db, update, &initial, &fixed).await?
        }
    };
    db.close().await?;

    match outcome {
        Some(rows) => report_success(ctx, "updated", rows),
        None => {
            debug!("edit aborted");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests_support::{context, Fixture};
    use crate::commands::CommandError;
    use serde_json::json;

    #[test]
    fn test_pk_params_typed() {
        assert_eq!(pk_params("42")["pk"], ParamValue::Int(42));
        assert_eq!(pk_params("abc")["pk"], ParamValue::Text("abc".into()));
    }

    #[tokio::test]
    async fn test_edit_with_values() {
        let fixture = Fixture::new().await;
        let ctx = context(&fixture);
        let opts = EditOptions {
            label: "ticket".to_string(),
            pk: "1".to_string(),
            values: vec!["subject: Toner low".to_string()],
        };

        execute(&ctx, &opts).await.unwrap();

        let rows = fixture.rows().await;
        assert_eq!(rows[0].get("subject"), Some(&json!("Toner low")));
        assert_eq!(rows[0].get("status"), Some(&json!("open")));
    }

    #[tokio::test]
    async fn test_edit_missing_record() {
        let fixture = Fixture::new().await;
        let ctx = context(&fixture);
        let opts = EditOptions {
            label: "ticket".to_string(),
            pk: "999".to_string(),
            values: vec!["subject:x".to_string()],
        };

        let err = execute(&ctx, &opts).await.unwrap_err();
        assert!(matches!(
            err,
            CommandError::Form(FormError::RecordNotFound { pk }) if pk == "999"
        ));
    }

    #[tokio::test]
    async fn test_edit_bad_values_fail_before_connecting() {
        let fixture = Fixture::new().await;
        let ctx = context(&fixture);
        let opts = EditOptions {
            label: "ticket".to_string(),
            pk: "1".to_string(),
            values: vec!["no-colon".to_string()],
        };

        let err = execute(&ctx, &opts).await.unwrap_err();
        assert!(matches!(err, CommandError::Form(FormError::InvalidValue(_))));
    }
}
