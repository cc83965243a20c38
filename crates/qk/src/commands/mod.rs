//! Command handlers for the `qk` CLI.

pub mod completions;
pub mod price;
pub mod tokens;
pub mod validate;

use anyhow::Result;
use tracing::debug;

use quotekit_formula::parser;
use quotekit_formula::types::Formula;

use crate::context::RuntimeContext;

/// Locate and load a formula by name or path, honoring configured search
/// directories.
pub(crate) fn load_formula(ctx: &RuntimeContext, name: &str) -> Result<Formula> {
    let cwd = std::env::current_dir()?;
    let path = parser::find_formula(name, &cwd, &ctx.config.formula_dirs)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let formula = parser::load_formula(&path).map_err(|e| anyhow::anyhow!("{}", e))?;
    debug!(path = %path.display(), id = %formula.id, "loaded formula");
    Ok(formula)
}
