//! Editor drafts shared by the edit and create commands.

use std::env;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::process::ExitStatus;

use deft_core::datasource::{DataSource, Params};
use deft_core::values::parse_draft;
use dialoguer::Select;
use tempfile::NamedTempFile;
use tokio::process::Command;
use tracing::{debug, warn};

use super::{CommandContext, CommandError, Result};

/// Picks the editor: the config value, then `EDITOR`, then `VISUAL`, then `vi`.
pub fn resolve_editor(configured: Option<&str>) -> String {
    configured
        .map(str::to_string)
        .or_else(|| env::var("EDITOR").ok())
        .or_else(|| env::var("VISUAL").ok())
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

/// Runs `editor` on `path` and waits for it. The editor string may carry
/// arguments, e.g. `code --wait`.
pub async fn run_editor(editor: &str, path: &Path) -> Result<ExitStatus> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| CommandError::Config("editor command is empty".to_string()))?;

    Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .map_err(|e| CommandError::Config(format!("Failed to open editor '{}': {}", editor, e)))
}

/// A temporary YAML file that keeps the user's changes across retries.
pub struct Draft {
    file: NamedTempFile,
}

impl Draft {
    /// Creates the draft with its initial contents.
    pub fn new(initial: &str) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("deft-")
            .suffix(".yaml")
            .tempfile()?;
        file.write_all(initial.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), "created draft");
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Opens the draft in the editor and returns what was saved.
    pub async fn review(&self, editor: &str) -> Result<String> {
        let status = run_editor(editor, self.path()).await?;
        if !status.success() {
            warn!(%status, "editor exited with error");
        }
        Ok(fs::read_to_string(self.path())?)
    }
}

/// Returns true for failures the user can fix by editing the draft again.
pub fn is_retryable(err: &CommandError) -> bool {
    matches!(err, CommandError::Form(_) | CommandError::DataSource(_))
}

/// Asks whether to abort or re-open the editor. Anything but an explicit
/// retry from an interactive terminal aborts.
pub fn ask_retry(ctx: &CommandContext) -> Result<bool> {
    if ctx.json_output || !io::stdin().is_terminal() {
        return Ok(false);
    }

    let choice = Select::new()
        .with_prompt("What now?")
        .items(&["Abort", "Retry"])
        .default(1)
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e.to_string())))?;
    Ok(choice == 1)
}

/// Opens the draft in the editor and executes `statement` with the reviewed
/// values plus `fixed`, which take precedence.
///
/// Failures caused by the draft or the statement are shown and the user may
/// retry; the draft keeps their edits between attempts. Returns `None` when
/// they abort.
pub async fn submit_interactively(
    ctx: &CommandContext,
    db: &mut DataSource,
    statement: &str,
    initial: &str,
    fixed: &Params,
) -> Result<Option<u64>> {
    let draft = Draft::new(initial)?;
    let editor = resolve_editor(ctx.editor.as_deref());

    loop {
        let text = draft.review(&editor).await?;
        let attempt = match parse_draft(&text) {
            Ok(mut params) => {
                params.extend(fixed.clone());
                db.execute(statement, &params)
                    .await
                    .map_err(CommandError::from)
            }
            Err(e) => Err(e.into()),
        };

        match attempt {
            Ok(rows) => return Ok(Some(rows)),
            Err(e) if is_retryable(&e) => {
                eprintln!("ERROR: {e}");
                if !ask_retry(ctx)? {
                    return Ok(None);
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// Prints the outcome of a successful edit or create.
pub fn report_success(ctx: &CommandContext, action: &str, rows_affected: u64) -> Result<()> {
    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "action": action,
            "rows_affected": rows_affected,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        eprintln!("OK: Record {action} successfully!");
    }
    Ok(())
}
