//! Formula document model and engine error types.

use std::fmt;

use serde::{Deserialize, Serialize};

use quotekit_core::validation::DefinitionError;
use quotekit_core::variable::Variable;

use crate::eval::EvalError;

/// Root structure for `.quote.json` / `.quote.toml` files.
///
/// Variables are ordered: declaration order is also conditional-dependency
/// eligibility order, so a condition can only read variables that appear
/// earlier in this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Formula {
    /// Unique identifier / name for this formula.
    pub id: String,

    /// Human-readable name.
    #[serde(default)]
    pub name: String,

    /// Arithmetic expression over variable and option tokens.
    pub expression: String,

    #[serde(default)]
    pub variables: Vec<Variable>,

    /// Price floor in minor currency units, applied after rounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,

    /// Price ceiling in minor currency units, applied after rounding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,

    /// Where this formula was loaded from (set by the parser).
    #[serde(skip)]
    pub source: String,
}

/// A computed price plus non-fatal diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    /// Final price in minor currency units, rounded then clamped.
    pub total: i64,

    /// Non-fatal diagnostics worth surfacing in design tooling.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<EngineWarning>,
}

/// Non-fatal diagnostics raised while computing a quote.
///
/// Both cases fail closed or lenient at runtime; they indicate a stale or
/// sloppy definition, not a broken computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EngineWarning {
    /// The expression references a token no variable contributes; it was
    /// substituted as literal 0.
    UnknownToken { token: String },

    /// A condition references a variable id that does not resolve (e.g. a
    /// deleted variable); the condition evaluated to false.
    UnknownDependency {
        variable: String,
        depends_on: String,
    },
}

impl fmt::Display for EngineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownToken { token } => {
                write!(f, "token '{token}' has no contribution; treated as 0")
            }
            Self::UnknownDependency {
                variable,
                depends_on,
            } => write!(
                f,
                "condition on '{variable}' references unknown variable '{depends_on}'"
            ),
        }
    }
}

/// Errors that can occur during formula parsing, validation, and pricing.
#[derive(Debug, thiserror::Error)]
pub enum FormulaError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
