//! `qk tokens` -- list the insertable formula tokens for a formula.
//!
//! The design tool inserts these into the expression editor: the bare id
//! for every variable except multi-select multiple choice, which exposes
//! one composite token per option.

use anyhow::Result;

use quotekit_formula::engine;

use crate::cli::TokensArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `qk tokens` command.
pub fn run(ctx: &RuntimeContext, args: &TokensArgs) -> Result<()> {
    let formula = super::load_formula(ctx, &args.formula)?;
    let tokens = engine::insertable_tokens(&formula);

    if ctx.json {
        output_json(&serde_json::json!({
            "formula": formula.id,
            "tokens": tokens,
        }));
        return Ok(());
    }

    for token in &tokens {
        println!("{token}");
    }
    Ok(())
}
