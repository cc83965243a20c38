//! Price computation and design-time reporting.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use quotekit_core::enums::VariableKind;
use quotekit_core::validation::{self, DefinitionError};
use quotekit_core::value::RawValue;
use quotekit_core::variable::Variable;

use crate::coerce::{self, TokenMap};
use crate::eval;
use crate::resolve;
use crate::types::{EngineWarning, Formula, FormulaError, Quote};

/// Computes the price for one raw-input snapshot.
///
/// Pure and synchronous: resolver -> coercer -> evaluator, touching no
/// state outside the arguments. Safe to call repeatedly and concurrently
/// (live previews re-price on every keystroke).
pub fn price(formula: &Formula, inputs: &HashMap<String, RawValue>) -> Result<Quote, FormulaError> {
    let resolution = resolve::resolve(&formula.variables, inputs);
    let mut warnings = resolution.warnings;

    let mut tokens: TokenMap = TokenMap::new();
    for variable in &formula.variables {
        let effective = resolution.effective.get(&variable.id);
        for (token, substitution) in coerce::contributions(variable, effective) {
            tokens.insert(token, substitution);
        }
    }

    let (substituted, unknown) = eval::substitute(&formula.expression, &tokens);
    for token in unknown {
        debug!(%token, "expression token has no contribution; substituted 0");
        warnings.push(EngineWarning::UnknownToken { token });
    }

    let value = eval::evaluate(&substituted)?;
    let total = eval::round_and_clamp(value, formula.min_price, formula.max_price);

    Ok(Quote { total, warnings })
}

/// The formula tokens a design tool can offer for insertion: the bare id
/// for every variable except multi-select multiple choice, which exposes
/// one composite token per option instead.
pub fn insertable_tokens(formula: &Formula) -> Vec<String> {
    let mut tokens = Vec::new();
    for variable in &formula.variables {
        if is_multi_select(variable) {
            for option in &variable.options {
                tokens.push(coerce::composite_token(&variable.id, &option.id));
            }
        } else {
            tokens.push(variable.id.clone());
        }
    }
    tokens
}

/// Identifier tokens referenced by an expression, in first-occurrence
/// order, numeric literals excluded.
pub fn referenced_tokens(expression: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let bytes = expression.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    while i < len {
        if is_ident(bytes[i]) {
            let start = i;
            while i < len && is_ident(bytes[i]) {
                i += 1;
            }
            let run = &expression[start..i];
            if !run.bytes().all(|b| b.is_ascii_digit()) && !tokens.iter().any(|t| t == run) {
                tokens.push(run.to_string());
            }
        } else {
            i += 1;
        }
    }
    tokens
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_multi_select(variable: &Variable) -> bool {
    variable.kind == VariableKind::MultipleChoice && variable.allow_multiple_selection
}

/// Lint findings that do not reject a save but deserve designer attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintWarning {
    /// The expression references a token no variable provides.
    UnknownToken(String),

    /// A multi-select variable is referenced by its bare id; only its
    /// composite per-option tokens carry values.
    BareMultiSelectToken(String),

    /// A variable contributes no token the expression uses.
    UnreferencedVariable(String),
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken(token) => {
                write!(f, "expression references unknown token '{token}'")
            }
            Self::BareMultiSelectToken(id) => write!(
                f,
                "multi-select variable '{id}' must be referenced through its per-option tokens"
            ),
            Self::UnreferencedVariable(id) => {
                write!(f, "variable '{id}' is never referenced by the expression")
            }
        }
    }
}

/// Design-time report: every definition error plus lint warnings, for the
/// formula editor's save dialog.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<DefinitionError>,
    pub warnings: Vec<LintWarning>,
}

impl ValidationReport {
    /// Returns `true` when the formula may be saved.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Checks a whole formula, collecting every finding instead of stopping at
/// the first (the save dialog shows them all at once).
pub fn check(formula: &Formula) -> ValidationReport {
    let mut report = ValidationReport::default();

    // Per-variable structure.
    for variable in &formula.variables {
        if let Err(err) = validation::validate_variable(variable) {
            report.errors.push(err);
        }
    }

    // Cross-variable id uniqueness and prefix collisions. Empty ids are
    // already reported by the per-variable pass.
    for (i, a) in formula.variables.iter().enumerate() {
        for b in &formula.variables[i + 1..] {
            if a.id.is_empty() || b.id.is_empty() {
                continue;
            }
            if a.id == b.id {
                report
                    .errors
                    .push(DefinitionError::DuplicateVariableId(a.id.clone()));
            } else if b.id.starts_with(&a.id) {
                report.errors.push(DefinitionError::PrefixCollisionId {
                    shorter: a.id.clone(),
                    longer: b.id.clone(),
                });
            } else if a.id.starts_with(&b.id) {
                report.errors.push(DefinitionError::PrefixCollisionId {
                    shorter: b.id.clone(),
                    longer: a.id.clone(),
                });
            }
        }
    }

    // Conditions must reference strictly earlier variables.
    for (position, variable) in formula.variables.iter().enumerate() {
        let Some(logic) = &variable.conditional_logic else {
            continue;
        };
        for condition in &logic.conditions {
            let earlier = &formula.variables[..position];
            if !earlier.iter().any(|v| v.id == condition.depends_on) {
                report
                    .errors
                    .push(DefinitionError::ForwardConditionReference {
                        variable: variable.id.clone(),
                        depends_on: condition.depends_on.clone(),
                    });
            }
        }
    }

    // Expression lints.
    let insertable: HashSet<String> = insertable_tokens(formula).into_iter().collect();
    let referenced = referenced_tokens(&formula.expression);
    let referenced_set: HashSet<&str> = referenced.iter().map(String::as_str).collect();

    for token in &referenced {
        if insertable.contains(token) {
            continue;
        }
        if let Some(variable) = formula.variables.iter().find(|v| v.id == *token) {
            if is_multi_select(variable) {
                report
                    .warnings
                    .push(LintWarning::BareMultiSelectToken(variable.id.clone()));
                continue;
            }
        }
        report.warnings.push(LintWarning::UnknownToken(token.clone()));
    }

    for variable in &formula.variables {
        let used = if is_multi_select(variable) {
            variable.options.iter().any(|opt| {
                referenced_set.contains(coerce::composite_token(&variable.id, &opt.id).as_str())
            })
        } else {
            referenced_set.contains(variable.id.as_str())
        };
        if !used {
            report
                .warnings
                .push(LintWarning::UnreferencedVariable(variable.id.clone()));
        }
    }

    report
}
