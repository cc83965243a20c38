//! `qk price` -- compute a price from a formula and raw inputs.
//!
//! Loads a formula file, assembles the raw-input snapshot from `--inputs`
//! and `--set` flags (later `--set` flags win), computes the price, and
//! prints it in human or JSON form.

use std::collections::HashMap;

use anyhow::{Context, Result, bail};

use quotekit_core::value::RawValue;
use quotekit_formula::engine;

use crate::cli::PriceArgs;
use crate::context::RuntimeContext;
use crate::output::{format_price, output_json};

/// Execute the `qk price` command.
pub fn run(ctx: &RuntimeContext, args: &PriceArgs) -> Result<()> {
    let formula = super::load_formula(ctx, &args.formula)?;

    // 1. Assemble the raw-input snapshot
    let mut inputs: HashMap<String, RawValue> = HashMap::new();
    if let Some(path) = &args.inputs {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read inputs file: {}", path.display()))?;
        let parsed: HashMap<String, RawValue> = serde_json::from_str(&content)
            .with_context(|| format!("invalid inputs file: {}", path.display()))?;
        inputs.extend(parsed);
    }
    for entry in &args.set {
        let (key, value) = parse_set_flag(entry)?;
        inputs.insert(key, value);
    }

    // 2. Compute
    let quote = engine::price(&formula, &inputs).map_err(|e| anyhow::anyhow!("{}", e))?;

    // 3. Output
    if ctx.json {
        output_json(&serde_json::json!({
            "formula": formula.id,
            "total": quote.total,
            "display": format_price(&ctx.config.currency, quote.total),
            "warnings": quote.warnings,
        }));
        return Ok(());
    }

    println!("{}", format_price(&ctx.config.currency, quote.total));
    if !ctx.quiet {
        for warning in &quote.warnings {
            eprintln!("warning: {warning}");
        }
    }
    Ok(())
}

/// Parse a `--set key=value` flag.
pub(crate) fn parse_set_flag(entry: &str) -> Result<(String, RawValue)> {
    let Some((key, raw)) = entry.split_once('=') else {
        bail!("invalid input format '{}': expected key=value", entry);
    };
    if key.is_empty() {
        bail!("invalid input format '{}': empty key", entry);
    }
    Ok((key.to_string(), parse_raw_value(raw)))
}

/// Values parse as JSON when possible (numbers, booleans, arrays) and fall
/// back to plain strings, so `--set sqft=40`, `--set garage=true`, and
/// `--set tier=premium` all do what they look like.
fn parse_raw_value(raw: &str) -> RawValue {
    match serde_json::from_str::<RawValue>(raw) {
        Ok(value) => value,
        Err(_) => RawValue::Text(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_flags_parse_json_shapes() {
        assert_eq!(
            parse_set_flag("sqft=40").unwrap(),
            ("sqft".to_string(), RawValue::Number(40.0))
        );
        assert_eq!(
            parse_set_flag("garage=true").unwrap(),
            ("garage".to_string(), RawValue::Bool(true))
        );
        assert_eq!(
            parse_set_flag("tier=premium").unwrap(),
            ("tier".to_string(), RawValue::Text("premium".to_string()))
        );
        assert_eq!(
            parse_set_flag(r#"addons=["o1","o2"]"#).unwrap(),
            (
                "addons".to_string(),
                RawValue::List(vec!["o1".to_string(), "o2".to_string()])
            )
        );
    }

    #[test]
    fn values_may_contain_equals_signs() {
        assert_eq!(
            parse_set_flag("note=a=b").unwrap(),
            ("note".to_string(), RawValue::Text("a=b".to_string()))
        );
    }

    #[test]
    fn missing_equals_is_an_error() {
        assert!(parse_set_flag("justakey").is_err());
        assert!(parse_set_flag("=value").is_err());
    }
}
