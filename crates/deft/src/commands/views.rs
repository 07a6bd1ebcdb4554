//! List-views command implementation.

use tracing::debug;

use super::{CommandContext, Result};
use crate::output::{format_views_json, format_views_table};

/// Executes the list-views command.
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let recipes = ctx.recipes()?;
    debug!(root = %recipes.root().display(), "listing views");
    let views = recipes.list_views()?;

    if ctx.json_output {
        println!("{}", format_views_json(&views)?);
    } else {
        print!("{}", format_views_table(&views, ctx.use_colors));
    }

    Ok(())
}
