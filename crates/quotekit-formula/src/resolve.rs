//! Conditional-visibility resolution.
//!
//! Variables are processed strictly in declaration order, so a condition can
//! only ever read a dependency that was resolved earlier in the same pass.
//! Dependencies reference earlier indices; cycles are structurally
//! impossible and no runtime cycle detection is needed.

use std::collections::HashMap;

use tracing::warn;

use quotekit_core::enums::{ConditionKind, LogicOperator};
use quotekit_core::value::RawValue;
use quotekit_core::variable::{Condition, ConditionalLogic, Variable};

use crate::coerce;
use crate::types::EngineWarning;

/// The effective raw value of every variable after visibility resolution.
#[derive(Debug, Default)]
pub struct Resolution {
    /// Variable id -> effective raw value. Absent means "no answer".
    pub effective: HashMap<String, RawValue>,

    /// Fail-closed diagnostics (stale condition references).
    pub warnings: Vec<EngineWarning>,
}

/// Decides, for each variable, whether its real input or its configured
/// default applies.
///
/// A visible variable keeps its own raw input; a hidden one takes
/// `conditional_logic.default_value`, and whatever the customer typed is
/// discarded for computation purposes.
pub fn resolve(variables: &[Variable], inputs: &HashMap<String, RawValue>) -> Resolution {
    let mut resolution = Resolution::default();

    for (position, variable) in variables.iter().enumerate() {
        let own = inputs.get(&variable.id);

        let effective = match &variable.conditional_logic {
            Some(logic) if logic.enabled && !logic.conditions.is_empty() => {
                if is_visible(logic, &variable.id, &variables[..position], &mut resolution) {
                    own.cloned()
                } else {
                    logic.default_value.clone()
                }
            }
            _ => own.cloned(),
        };

        if let Some(value) = effective {
            resolution.effective.insert(variable.id.clone(), value);
        }
    }

    resolution
}

/// Combines the logic's condition results under its operator.
///
/// Conditions are all evaluated (no short-circuit) so stale-reference
/// warnings surface deterministically regardless of input values.
fn is_visible(
    logic: &ConditionalLogic,
    variable_id: &str,
    earlier: &[Variable],
    resolution: &mut Resolution,
) -> bool {
    let results: Vec<bool> = logic
        .conditions
        .iter()
        .map(|condition| eval_condition(condition, variable_id, earlier, resolution))
        .collect();

    match logic.operator {
        LogicOperator::And => results.iter().all(|&r| r),
        LogicOperator::Or => results.iter().any(|&r| r),
    }
}

/// Evaluates one condition against the dependency's already-resolved
/// effective value. Unknown references fail closed.
fn eval_condition(
    condition: &Condition,
    variable_id: &str,
    earlier: &[Variable],
    resolution: &mut Resolution,
) -> bool {
    let Some(dependency) = earlier.iter().find(|v| v.id == condition.depends_on) else {
        warn!(
            variable = variable_id,
            depends_on = %condition.depends_on,
            "condition references an unknown variable; failing closed"
        );
        resolution.warnings.push(EngineWarning::UnknownDependency {
            variable: variable_id.to_string(),
            depends_on: condition.depends_on.clone(),
        });
        return false;
    };

    let value = resolution.effective.get(&dependency.id);

    match condition.kind {
        ConditionKind::IsEmpty => value.is_none_or(RawValue::is_empty),
        ConditionKind::IsNotEmpty => !value.is_none_or(RawValue::is_empty),
        ConditionKind::Equals => equals(dependency, value, condition.expected.as_ref()),
        ConditionKind::NotEquals => !equals(dependency, value, condition.expected.as_ref()),
        ConditionKind::Contains => contains(value, condition.expected.as_ref()),
        ConditionKind::GreaterThan
        | ConditionKind::LessThan
        | ConditionKind::GreaterOrEqual
        | ConditionKind::LessOrEqual => {
            let (Some(actual), Some(expected)) = (
                coerce::numeric_view(dependency, value),
                condition.expected.as_ref().and_then(RawValue::as_number),
            ) else {
                return false;
            };
            match condition.kind {
                ConditionKind::GreaterThan => actual > expected,
                ConditionKind::LessThan => actual < expected,
                ConditionKind::GreaterOrEqual => actual >= expected,
                ConditionKind::LessOrEqual => actual <= expected,
                _ => unreachable!("outer match covers only ordered kinds"),
            }
        }
    }
}

/// Kind-aware equality: checkbox dependencies compare truthiness, numeric
/// kinds compare numerically, multi-select lists match only when the
/// expected value is the sole selection, everything else compares canonical
/// text forms.
fn equals(dependency: &Variable, value: Option<&RawValue>, expected: Option<&RawValue>) -> bool {
    let Some(expected) = expected else {
        return false;
    };

    use quotekit_core::enums::VariableKind;
    match dependency.kind {
        VariableKind::Checkbox => value.is_some_and(RawValue::is_truthy) == expected.is_truthy(),
        VariableKind::Number | VariableKind::Slider | VariableKind::Stepper => {
            match (value.and_then(RawValue::as_number), expected.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            }
        }
        _ => {
            let Some(value) = value else {
                return false;
            };
            match value {
                RawValue::List(items) => items.len() == 1 && items[0] == expected.to_text(),
                other => other.to_text() == expected.to_text(),
            }
        }
    }
}

/// Membership for lists, substring for strings; anything else is false.
fn contains(value: Option<&RawValue>, expected: Option<&RawValue>) -> bool {
    let (Some(value), Some(expected)) = (value, expected) else {
        return false;
    };
    let needle = expected.to_text();
    match value {
        RawValue::List(items) => items.iter().any(|item| *item == needle),
        RawValue::Text(s) => s.contains(&needle),
        RawValue::Number(_) | RawValue::Bool(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quotekit_core::enums::VariableKind;

    fn checkbox(id: &str) -> Variable {
        Variable::new(id, VariableKind::Checkbox)
    }

    fn gated(id: &str, logic: ConditionalLogic) -> Variable {
        Variable {
            conditional_logic: Some(logic),
            ..Variable::new(id, VariableKind::Number)
        }
    }

    fn logic_with(conditions: Vec<Condition>, default_value: Option<RawValue>) -> ConditionalLogic {
        ConditionalLogic {
            enabled: true,
            operator: LogicOperator::And,
            conditions,
            default_value,
        }
    }

    fn inputs(pairs: &[(&str, RawValue)]) -> HashMap<String, RawValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn unconditional_variables_keep_their_input() {
        let vars = vec![Variable::new("sqft", VariableKind::Number)];
        let res = resolve(&vars, &inputs(&[("sqft", RawValue::Number(40.0))]));
        assert_eq!(res.effective.get("sqft"), Some(&RawValue::Number(40.0)));
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn hidden_variable_takes_default() {
        // garage_size depends on has_garage == true; unchecked hides it.
        let vars = vec![
            checkbox("has_garage"),
            gated(
                "garage_size",
                logic_with(
                    vec![Condition::new(
                        "has_garage",
                        ConditionKind::Equals,
                        Some(RawValue::Bool(true)),
                    )],
                    Some(RawValue::Number(0.0)),
                ),
            ),
        ];
        let res = resolve(
            &vars,
            &inputs(&[
                ("has_garage", RawValue::Bool(false)),
                ("garage_size", RawValue::Number(3.0)),
            ]),
        );
        assert_eq!(res.effective.get("garage_size"), Some(&RawValue::Number(0.0)));

        // Checked: the real input applies.
        let res = resolve(
            &vars,
            &inputs(&[
                ("has_garage", RawValue::Bool(true)),
                ("garage_size", RawValue::Number(3.0)),
            ]),
        );
        assert_eq!(res.effective.get("garage_size"), Some(&RawValue::Number(3.0)));
    }

    #[test]
    fn condition_reads_resolved_value_not_raw() {
        // Middle variable is hidden and defaults to 10; the last variable's
        // condition must see 10, not the customer's raw 99.
        let vars = vec![
            checkbox("gate"),
            gated(
                "middle",
                logic_with(
                    vec![Condition::new(
                        "gate",
                        ConditionKind::Equals,
                        Some(RawValue::Bool(true)),
                    )],
                    Some(RawValue::Number(10.0)),
                ),
            ),
            gated(
                "last",
                logic_with(
                    vec![Condition::new(
                        "middle",
                        ConditionKind::GreaterThan,
                        Some(RawValue::Number(50.0)),
                    )],
                    Some(RawValue::Number(0.0)),
                ),
            ),
        ];
        let res = resolve(
            &vars,
            &inputs(&[
                ("gate", RawValue::Bool(false)),
                ("middle", RawValue::Number(99.0)),
                ("last", RawValue::Number(7.0)),
            ]),
        );
        // middle hidden -> 10, so last's >50 check fails and last is hidden.
        assert_eq!(res.effective.get("middle"), Some(&RawValue::Number(10.0)));
        assert_eq!(res.effective.get("last"), Some(&RawValue::Number(0.0)));
    }

    #[test]
    fn and_requires_all_or_requires_any() {
        let conditions = vec![
            Condition::new("a", ConditionKind::Equals, Some(RawValue::Bool(true))),
            Condition::new("b", ConditionKind::Equals, Some(RawValue::Bool(true))),
        ];
        let mut and_logic = logic_with(conditions.clone(), Some(RawValue::Number(0.0)));
        and_logic.operator = LogicOperator::And;
        let mut or_logic = logic_with(conditions, Some(RawValue::Number(0.0)));
        or_logic.operator = LogicOperator::Or;

        let vars_and = vec![checkbox("a"), checkbox("b"), gated("x", and_logic)];
        let vars_or = vec![checkbox("a"), checkbox("b"), gated("x", or_logic)];
        let half = inputs(&[
            ("a", RawValue::Bool(true)),
            ("b", RawValue::Bool(false)),
            ("x", RawValue::Number(5.0)),
        ]);

        let res = resolve(&vars_and, &half);
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(0.0)));

        let res = resolve(&vars_or, &half);
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(5.0)));
    }

    #[test]
    fn unknown_dependency_fails_closed_with_warning() {
        let vars = vec![gated(
            "x",
            logic_with(
                vec![Condition::new(
                    "deleted_variable",
                    ConditionKind::Equals,
                    Some(RawValue::Bool(true)),
                )],
                Some(RawValue::Number(0.0)),
            ),
        )];
        let res = resolve(&vars, &inputs(&[("x", RawValue::Number(9.0))]));
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(0.0)));
        assert_eq!(
            res.warnings,
            vec![EngineWarning::UnknownDependency {
                variable: "x".into(),
                depends_on: "deleted_variable".into(),
            }]
        );
    }

    #[test]
    fn presence_conditions() {
        let vars = vec![
            Variable::new("notes", VariableKind::Text),
            gated(
                "x",
                logic_with(
                    vec![Condition::new("notes", ConditionKind::IsNotEmpty, None)],
                    Some(RawValue::Number(0.0)),
                ),
            ),
        ];
        let res = resolve(
            &vars,
            &inputs(&[
                ("notes", RawValue::Text("call me".into())),
                ("x", RawValue::Number(4.0)),
            ]),
        );
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(4.0)));

        // No notes captured at all: IsNotEmpty is false.
        let res = resolve(&vars, &inputs(&[("x", RawValue::Number(4.0))]));
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(0.0)));
    }

    #[test]
    fn contains_on_multi_select() {
        let multi = Variable {
            allow_multiple_selection: true,
            options: vec![
                quotekit_core::variable::VariableOption::new("deck", "deck", 1.0),
                quotekit_core::variable::VariableOption::new("patio", "patio", 1.0),
            ],
            ..Variable::new("addons", VariableKind::MultipleChoice)
        };
        let vars = vec![
            multi,
            gated(
                "x",
                logic_with(
                    vec![Condition::new(
                        "addons",
                        ConditionKind::Contains,
                        Some(RawValue::Text("deck".into())),
                    )],
                    Some(RawValue::Number(0.0)),
                ),
            ),
        ];
        let res = resolve(
            &vars,
            &inputs(&[
                (
                    "addons",
                    RawValue::List(vec!["patio".into(), "deck".into()]),
                ),
                ("x", RawValue::Number(4.0)),
            ]),
        );
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(4.0)));
    }

    #[test]
    fn dropdown_equality_uses_option_value() {
        let dropdown = Variable {
            options: vec![
                quotekit_core::variable::VariableOption::new("a", "basic", 1.0),
                quotekit_core::variable::VariableOption::new("b", "premium", 2.0),
            ],
            ..Variable::new("tier", VariableKind::Dropdown)
        };
        let vars = vec![
            dropdown,
            gated(
                "x",
                logic_with(
                    vec![Condition::new(
                        "tier",
                        ConditionKind::NotEquals,
                        Some(RawValue::Text("basic".into())),
                    )],
                    Some(RawValue::Number(0.0)),
                ),
            ),
        ];
        let res = resolve(
            &vars,
            &inputs(&[
                ("tier", RawValue::Text("premium".into())),
                ("x", RawValue::Number(8.0)),
            ]),
        );
        assert_eq!(res.effective.get("x"), Some(&RawValue::Number(8.0)));
    }
}
