//! Variable model -- one designer-defined question on a quote form.

use serde::{Deserialize, Serialize};

use crate::enums::{ConditionKind, LogicOperator, VariableKind};
use crate::value::RawValue;

/// Default checkbox substitution when checked.
fn default_checked() -> String {
    "1".to_string()
}

/// Default checkbox substitution when unchecked.
fn default_unchecked() -> String {
    "0".to_string()
}

/// A designer-defined input contributing to a price formula.
///
/// Variables are immutable value objects for the duration of a price
/// computation; the engine never mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Stable slug, unique within a formula. Doubles as the formula token.
    pub id: String,

    /// Display label. Not used by the engine.
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub kind: VariableKind,

    /// Optional display unit (e.g. `"sqft"`, max 15 chars). Display-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Ordered options for dropdown / multiple-choice / legacy select kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<VariableOption>,

    /// Lower bound for slider/stepper. UI-only; the engine trusts its inputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Upper bound for slider/stepper. UI-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,

    /// Slider increment. UI-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,

    /// Checkbox substitution sub-expression when checked.
    #[serde(default = "default_checked")]
    pub checked_value: String,

    /// Checkbox substitution sub-expression when unchecked.
    #[serde(default = "default_unchecked")]
    pub unchecked_value: String,

    /// Multiple-choice only: whether several options may be selected at once.
    #[serde(default)]
    pub allow_multiple_selection: bool,

    /// Visibility rules making this variable's effective value depend on
    /// earlier variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_logic: Option<ConditionalLogic>,
}

impl Variable {
    /// A bare variable of the given kind; fields beyond `id`/`kind` start at
    /// their serde defaults. Struct-update syntax fills in the rest.
    pub fn new(id: impl Into<String>, kind: VariableKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            unit: None,
            options: Vec::new(),
            min: None,
            max: None,
            step: None,
            checked_value: default_checked(),
            unchecked_value: default_unchecked(),
            allow_multiple_selection: false,
            conditional_logic: None,
        }
    }

    /// Returns `true` once this variable's effective value is governed by
    /// conditional logic with at least one condition.
    pub fn is_conditional(&self) -> bool {
        self.conditional_logic
            .as_ref()
            .is_some_and(|logic| logic.enabled && !logic.conditions.is_empty())
    }
}

/// One selectable option of a dropdown / multiple-choice / legacy select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableOption {
    /// Stable slug, unique within the owning variable.
    pub id: String,

    /// Display label.
    #[serde(default)]
    pub label: String,

    /// Form value this option matches against raw input.
    #[serde(default)]
    pub value: String,

    /// Contribution when this option is selected.
    #[serde(default)]
    pub numeric_value: f64,

    /// Legacy select multiplier; consulted before `numeric_value` for
    /// `select_legacy` variables only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,

    /// Multi-select only: contribution while this option is NOT selected.
    #[serde(default)]
    pub default_unselected_value: f64,

    /// Opaque image reference for the form renderer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl VariableOption {
    /// An option with the fields the engine reads; the rest default.
    pub fn new(id: impl Into<String>, value: impl Into<String>, numeric_value: f64) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            value: value.into(),
            numeric_value,
            multiplier: None,
            default_unselected_value: 0.0,
            image: None,
        }
    }

    /// Contribution for legacy selects, which prefer `multiplier`.
    pub fn legacy_selected_value(&self) -> f64 {
        self.multiplier.unwrap_or(self.numeric_value)
    }
}

/// Conditional visibility rules for a variable.
///
/// While hidden, the variable's effective value is `default_value` and any
/// captured raw input is ignored for computation purposes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConditionalLogic {
    #[serde(default)]
    pub enabled: bool,

    /// How multiple condition results combine.
    #[serde(default)]
    pub operator: LogicOperator,

    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Effective value used while the variable is hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<RawValue>,
}

/// A single visibility condition against an earlier variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Id of the variable this condition reads. Must sit strictly earlier in
    /// the formula's variable list.
    pub depends_on: String,

    pub kind: ConditionKind,

    /// Comparison operand; ignored by presence conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<RawValue>,
}

impl Condition {
    pub fn new(
        depends_on: impl Into<String>,
        kind: ConditionKind,
        expected: Option<RawValue>,
    ) -> Self {
        Self {
            depends_on: depends_on.into(),
            kind,
            expected,
        }
    }
}
