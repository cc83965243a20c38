//! Per-kind coercion of raw input into formula contributions.
//!
//! Coercion is lenient by design: unparseable numerics become 0 and
//! unmatched selections contribute 0. Definition problems are caught at
//! save time; a customer filling a form never sees a coercion failure.

use std::collections::{HashMap, HashSet};

use quotekit_core::enums::VariableKind;
use quotekit_core::value::RawValue;
use quotekit_core::variable::{Variable, VariableOption};

/// One value substituted into the formula for a token.
#[derive(Debug, Clone, PartialEq)]
pub enum Substitution {
    /// A plain numeric contribution.
    Number(f64),
    /// A sub-expression spliced in verbatim (checkbox branch values).
    Expr(String),
}

impl Substitution {
    /// Renders the text spliced into the expression. Negative numbers and
    /// sub-expressions are parenthesised so the surrounding operators keep
    /// their precedence.
    pub fn render(&self) -> String {
        match self {
            Self::Number(n) if *n < 0.0 => format!("({n})"),
            Self::Number(n) => format!("{n}"),
            Self::Expr(e) => format!("({e})"),
        }
    }
}

/// The token -> substitution map consumed by the evaluator.
pub type TokenMap = HashMap<String, Substitution>;

/// Composite token for one option of a multi-select variable.
pub fn composite_token(variable_id: &str, option_id: &str) -> String {
    format!("{variable_id}_{option_id}")
}

/// Computes every token this variable contributes to the formula.
///
/// `raw` is the variable's *effective* value as decided by the resolver;
/// `None` means the form never captured an answer. Multi-select multiple
/// choice emits one composite token per option and never the bare token;
/// every other kind emits exactly the bare token.
pub fn contributions(variable: &Variable, raw: Option<&RawValue>) -> Vec<(String, Substitution)> {
    match variable.kind {
        VariableKind::Number | VariableKind::Stepper | VariableKind::Slider => {
            let n = raw.and_then(RawValue::as_number).unwrap_or(0.0);
            vec![(variable.id.clone(), Substitution::Number(n))]
        }
        VariableKind::Text => {
            // Display / lead-capture only.
            vec![(variable.id.clone(), Substitution::Number(0.0))]
        }
        VariableKind::Checkbox => {
            let checked = raw.is_some_and(RawValue::is_truthy);
            let branch = if checked {
                &variable.checked_value
            } else {
                &variable.unchecked_value
            };
            vec![(variable.id.clone(), Substitution::Expr(branch.clone()))]
        }
        VariableKind::Dropdown => {
            let n = selected_option(variable, raw)
                .map(|opt| opt.numeric_value)
                .unwrap_or(0.0);
            vec![(variable.id.clone(), Substitution::Number(n))]
        }
        VariableKind::SelectLegacy => {
            let n = selected_option(variable, raw)
                .map(VariableOption::legacy_selected_value)
                .unwrap_or(0.0);
            vec![(variable.id.clone(), Substitution::Number(n))]
        }
        VariableKind::MultipleChoice if variable.allow_multiple_selection => {
            let selected = selected_values(raw);
            variable
                .options
                .iter()
                .map(|opt| {
                    let n = if selected.contains(opt.value.as_str()) {
                        opt.numeric_value
                    } else {
                        opt.default_unselected_value
                    };
                    (
                        composite_token(&variable.id, &opt.id),
                        Substitution::Number(n),
                    )
                })
                .collect()
        }
        VariableKind::MultipleChoice => {
            let n = selected_option(variable, raw)
                .map(|opt| opt.numeric_value)
                .unwrap_or(0.0);
            vec![(variable.id.clone(), Substitution::Number(n))]
        }
    }
}

/// Numeric reading of a variable's effective value, used by the resolver's
/// ordered comparisons. `None` means "not numeric", which fails the
/// comparison closed.
pub fn numeric_view(variable: &Variable, raw: Option<&RawValue>) -> Option<f64> {
    match variable.kind {
        VariableKind::Number
        | VariableKind::Stepper
        | VariableKind::Slider
        | VariableKind::Text => raw?.as_number(),
        VariableKind::Checkbox => {
            let checked = raw.is_some_and(RawValue::is_truthy);
            let branch = if checked {
                &variable.checked_value
            } else {
                &variable.unchecked_value
            };
            branch.trim().parse().ok()
        }
        VariableKind::Dropdown => selected_option(variable, raw).map(|opt| opt.numeric_value),
        VariableKind::SelectLegacy => {
            selected_option(variable, raw).map(VariableOption::legacy_selected_value)
        }
        VariableKind::MultipleChoice if variable.allow_multiple_selection => None,
        VariableKind::MultipleChoice => {
            selected_option(variable, raw).map(|opt| opt.numeric_value)
        }
    }
}

/// Finds the option a single-select raw value picks, matching on the
/// option's form `value`.
fn selected_option<'a>(variable: &'a Variable, raw: Option<&RawValue>) -> Option<&'a VariableOption> {
    let raw = raw?;
    variable.options.iter().find(|opt| option_matches(opt, raw))
}

fn option_matches(option: &VariableOption, raw: &RawValue) -> bool {
    match raw {
        RawValue::Text(s) => option.value == *s,
        // Single-element arrays occasionally arrive from multi-capable
        // renderers; accept them for single selects.
        RawValue::List(items) => items.len() == 1 && option.value == items[0],
        RawValue::Number(n) => option.value == n.to_string(),
        RawValue::Bool(_) => false,
    }
}

/// The set of option `value`s a multi-select raw value picks.
fn selected_values(raw: Option<&RawValue>) -> HashSet<&str> {
    match raw {
        Some(RawValue::List(items)) => items.iter().map(String::as_str).collect(),
        Some(RawValue::Text(s)) if !s.is_empty() => HashSet::from([s.as_str()]),
        _ => HashSet::new(),
    }
}
