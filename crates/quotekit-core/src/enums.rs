//! Enum types for the quotekit variable model.
//!
//! All three enums are closed: a formula document with an unknown kind is a
//! parse error, and every coercion/comparison site matches exhaustively so a
//! new kind fails to compile until it is handled everywhere.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The input control kind of a variable.
///
/// Each kind coerces raw form input into formula contributions differently;
/// see the formula engine's coercion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    /// Free numeric entry. Unparseable input coerces to 0.
    #[default]
    Number,
    /// Numeric entry with +/- buttons.
    Stepper,
    /// Free text; contributes 0, exists for display/lead capture only.
    Text,
    /// Boolean toggle with configurable checked/unchecked sub-expressions.
    Checkbox,
    /// Bounded numeric range input.
    Slider,
    /// Single selection from an option list.
    Dropdown,
    /// One or many selections from an option list.
    MultipleChoice,
    /// Pre-dropdown select control kept for old formulas; options may carry
    /// a legacy `multiplier` that wins over `numeric_value`.
    SelectLegacy,
}

impl VariableKind {
    /// Returns the string representation (the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Stepper => "stepper",
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Slider => "slider",
            Self::Dropdown => "dropdown",
            Self::MultipleChoice => "multiple_choice",
            Self::SelectLegacy => "select_legacy",
        }
    }

    /// Returns `true` if this kind carries an option list.
    pub fn has_options(&self) -> bool {
        matches!(self, Self::Dropdown | Self::MultipleChoice | Self::SelectLegacy)
    }

    /// Returns `true` if this kind carries numeric bounds (`min`/`max`/`step`).
    pub fn has_range(&self) -> bool {
        matches!(self, Self::Slider | Self::Stepper)
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a single visibility condition compares its dependency's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

impl ConditionKind {
    /// Returns the string representation (the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "not_equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterOrEqual => "greater_or_equal",
            Self::LessOrEqual => "less_or_equal",
            Self::Contains => "contains",
            Self::IsEmpty => "is_empty",
            Self::IsNotEmpty => "is_not_empty",
        }
    }

    /// Returns `true` for the ordered comparisons, which require the
    /// dependency's coerced value to be numeric.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            Self::GreaterThan | Self::LessThan | Self::GreaterOrEqual | Self::LessOrEqual
        )
    }

    /// Returns `true` if the condition only tests presence and ignores its
    /// expected operand.
    pub fn is_presence(&self) -> bool {
        matches!(self, Self::IsEmpty | Self::IsNotEmpty)
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How multiple condition results combine into a visibility decision.
///
/// A single condition behaves the same under either operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicOperator {
    /// All conditions must hold.
    #[default]
    And,
    /// Any condition suffices.
    Or,
}

impl LogicOperator {
    /// Returns the string representation (the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for LogicOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
