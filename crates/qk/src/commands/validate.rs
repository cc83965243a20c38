//! `qk validate` -- design-time formula validation report.
//!
//! Prints every definition error and lint warning for a formula. Exits
//! non-zero when definition errors exist (lint warnings alone pass).

use anyhow::{Result, bail};

use quotekit_formula::engine;

use crate::cli::ValidateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `qk validate` command.
pub fn run(ctx: &RuntimeContext, args: &ValidateArgs) -> Result<()> {
    let formula = super::load_formula(ctx, &args.formula)?;
    let report = engine::check(&formula);

    if ctx.json {
        output_json(&serde_json::json!({
            "formula": formula.id,
            "valid": report.is_clean(),
            "errors": report.errors.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
            "warnings": report.warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        }));
    } else {
        for error in &report.errors {
            println!("error: {error}");
        }
        for warning in &report.warnings {
            println!("warning: {warning}");
        }
        if report.is_clean() && report.warnings.is_empty() {
            println!("Formula '{}' is valid.", formula.id);
        }
    }

    if !report.is_clean() {
        bail!(
            "formula '{}' has {} definition error(s)",
            formula.id,
            report.errors.len()
        );
    }
    Ok(())
}
