//! Structural validation for variables and their option lists.
//!
//! Runs at formula-save time in the design tool. The runtime engine assumes
//! definitions have already passed here and treats violations as internal,
//! failing closed instead of surfacing user-facing errors.

use crate::enums::VariableKind;
use crate::value::RawValue;
use crate::variable::Variable;

/// Error type for definition validation failures.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("variable name is required")]
    EmptyName,

    #[error("variable id is required")]
    EmptyId,

    #[error("duplicate variable id: {0}")]
    DuplicateVariableId(String),

    #[error("variable id '{shorter}' is a prefix of '{longer}'")]
    PrefixCollisionId { shorter: String, longer: String },

    #[error("invalid range for '{id}': min {min} > max {max}")]
    InvalidRange { id: String, min: f64, max: f64 },

    #[error("invalid step for '{id}': step must be positive")]
    InvalidStep { id: String },

    #[error("variable '{0}' requires at least one option")]
    EmptyOptions(String),

    #[error("duplicate option id '{option}' in variable '{variable}'")]
    DuplicateOptionId { variable: String, option: String },

    #[error("duplicate option value '{value}' in variable '{variable}'")]
    DuplicateOptionValue { variable: String, value: String },

    #[error(
        "condition on '{variable}' references '{depends_on}', which is not an earlier variable"
    )]
    ForwardConditionReference {
        variable: String,
        depends_on: String,
    },

    #[error("conditional default for '{variable}' does not fit a {kind} variable")]
    DefaultValueShape {
        variable: String,
        kind: VariableKind,
    },
}

/// Validates a single variable's structure, ignoring its siblings.
pub fn validate_variable(variable: &Variable) -> Result<(), DefinitionError> {
    // Name required.
    if variable.name.trim().is_empty() {
        return Err(DefinitionError::EmptyName);
    }
    // Id required.
    if variable.id.trim().is_empty() {
        return Err(DefinitionError::EmptyId);
    }
    // Range bounds must be ordered; slider steps must be positive.
    if variable.kind.has_range() {
        if let (Some(min), Some(max)) = (variable.min, variable.max) {
            if min > max {
                return Err(DefinitionError::InvalidRange {
                    id: variable.id.clone(),
                    min,
                    max,
                });
            }
        }
        if variable.kind == VariableKind::Slider {
            if let Some(step) = variable.step {
                if step <= 0.0 {
                    return Err(DefinitionError::InvalidStep {
                        id: variable.id.clone(),
                    });
                }
            }
        }
    }
    // Option kinds need a non-empty, collision-free option list.
    if variable.kind.has_options() {
        if variable.options.is_empty() {
            return Err(DefinitionError::EmptyOptions(variable.id.clone()));
        }
        for (i, a) in variable.options.iter().enumerate() {
            for b in &variable.options[i + 1..] {
                if a.id == b.id {
                    return Err(DefinitionError::DuplicateOptionId {
                        variable: variable.id.clone(),
                        option: a.id.clone(),
                    });
                }
                if a.value == b.value {
                    return Err(DefinitionError::DuplicateOptionValue {
                        variable: variable.id.clone(),
                        value: a.value.clone(),
                    });
                }
            }
        }
    }
    // Conditional default must fit the variable's coercion domain.
    if let Some(logic) = &variable.conditional_logic {
        if let Some(default) = &logic.default_value {
            if !default_value_fits(variable.kind, default) {
                return Err(DefinitionError::DefaultValueShape {
                    variable: variable.id.clone(),
                    kind: variable.kind,
                });
            }
        }
    }
    Ok(())
}

/// Validates an ordered variable list: per-variable structure plus the
/// cross-variable invariants (unique ids, no prefix collisions, conditions
/// referencing strictly earlier variables). Returns the first failure.
pub fn validate_variables(variables: &[Variable]) -> Result<(), DefinitionError> {
    for variable in variables {
        validate_variable(variable)?;
    }

    // Ids must be unique, and no id may be a prefix of another: formula
    // tokens are substituted textually and prefix-ambiguous ids would make
    // naive consumers cross-contaminate.
    for (i, a) in variables.iter().enumerate() {
        for b in &variables[i + 1..] {
            if a.id == b.id {
                return Err(DefinitionError::DuplicateVariableId(a.id.clone()));
            }
            if b.id.starts_with(&a.id) {
                return Err(DefinitionError::PrefixCollisionId {
                    shorter: a.id.clone(),
                    longer: b.id.clone(),
                });
            }
            if a.id.starts_with(&b.id) {
                return Err(DefinitionError::PrefixCollisionId {
                    shorter: b.id.clone(),
                    longer: a.id.clone(),
                });
            }
        }
    }

    // Dependencies must point strictly backwards, which rules out cycles by
    // construction.
    for (position, variable) in variables.iter().enumerate() {
        let Some(logic) = &variable.conditional_logic else {
            continue;
        };
        for condition in &logic.conditions {
            let earlier = &variables[..position];
            if !earlier.iter().any(|v| v.id == condition.depends_on) {
                return Err(DefinitionError::ForwardConditionReference {
                    variable: variable.id.clone(),
                    depends_on: condition.depends_on.clone(),
                });
            }
        }
    }

    Ok(())
}

/// Shape check for a conditional default: numeric kinds take numbers,
/// checkboxes take booleans, everything else takes strings or arrays.
fn default_value_fits(kind: VariableKind, value: &RawValue) -> bool {
    match kind {
        VariableKind::Number | VariableKind::Slider | VariableKind::Stepper => {
            matches!(value, RawValue::Number(_))
        }
        VariableKind::Checkbox => matches!(value, RawValue::Bool(_)),
        VariableKind::Text
        | VariableKind::Dropdown
        | VariableKind::MultipleChoice
        | VariableKind::SelectLegacy => matches!(value, RawValue::Text(_) | RawValue::List(_)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ConditionKind;
    use crate::variable::{Condition, ConditionalLogic, VariableOption};

    fn named(id: &str, kind: VariableKind) -> Variable {
        Variable {
            name: id.to_string(),
            ..Variable::new(id, kind)
        }
    }

    #[test]
    fn valid_variable_passes() {
        let v = Variable {
            options: vec![
                VariableOption::new("a", "a", 1.0),
                VariableOption::new("b", "b", 2.0),
            ],
            ..named("tier", VariableKind::Dropdown)
        };
        assert!(validate_variable(&v).is_ok());
    }

    #[test]
    fn empty_name_fails() {
        let v = Variable::new("sqft", VariableKind::Number);
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::EmptyName)
        ));
    }

    #[test]
    fn empty_id_fails() {
        let v = Variable {
            name: "Width".into(),
            ..Variable::new("  ", VariableKind::Number)
        };
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::EmptyId)
        ));
    }

    #[test]
    fn inverted_range_fails() {
        let v = Variable {
            min: Some(100.0),
            max: Some(10.0),
            ..named("sqft", VariableKind::Slider)
        };
        match validate_variable(&v) {
            Err(DefinitionError::InvalidRange { id, min, max }) => {
                assert_eq!(id, "sqft");
                assert_eq!(min, 100.0);
                assert_eq!(max, 10.0);
            }
            other => panic!("expected InvalidRange, got {:?}", other),
        }
    }

    #[test]
    fn zero_step_fails() {
        let v = Variable {
            min: Some(0.0),
            max: Some(10.0),
            step: Some(0.0),
            ..named("sqft", VariableKind::Slider)
        };
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::InvalidStep { .. })
        ));
    }

    #[test]
    fn stepper_ignores_step_sign() {
        // Steppers carry min/max but no slider step semantics.
        let v = Variable {
            min: Some(0.0),
            max: Some(10.0),
            step: Some(0.0),
            ..named("count", VariableKind::Stepper)
        };
        assert!(validate_variable(&v).is_ok());
    }

    #[test]
    fn option_kind_without_options_fails() {
        let v = named("tier", VariableKind::Dropdown);
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::EmptyOptions(_))
        ));
    }

    #[test]
    fn duplicate_option_id_fails() {
        let v = Variable {
            options: vec![
                VariableOption::new("a", "x", 1.0),
                VariableOption::new("a", "y", 2.0),
            ],
            ..named("tier", VariableKind::Dropdown)
        };
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::DuplicateOptionId { .. })
        ));
    }

    #[test]
    fn duplicate_option_value_fails() {
        let v = Variable {
            options: vec![
                VariableOption::new("a", "same", 1.0),
                VariableOption::new("b", "same", 2.0),
            ],
            ..named("tier", VariableKind::Dropdown)
        };
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::DuplicateOptionValue { .. })
        ));
    }

    #[test]
    fn default_value_shape_mismatch_fails() {
        let v = Variable {
            conditional_logic: Some(ConditionalLogic {
                enabled: true,
                conditions: vec![Condition::new("earlier", ConditionKind::Equals, None)],
                default_value: Some(RawValue::Text("nope".into())),
                ..ConditionalLogic::default()
            }),
            ..named("sqft", VariableKind::Number)
        };
        assert!(matches!(
            validate_variable(&v),
            Err(DefinitionError::DefaultValueShape { .. })
        ));
    }

    #[test]
    fn duplicate_ids_across_variables_fail() {
        let vars = vec![
            named("sqft", VariableKind::Number),
            named("sqft", VariableKind::Number),
        ];
        assert!(matches!(
            validate_variables(&vars),
            Err(DefinitionError::DuplicateVariableId(_))
        ));
    }

    #[test]
    fn prefix_collision_fails_both_directions() {
        let vars = vec![
            named("sqft", VariableKind::Number),
            named("sqft2", VariableKind::Number),
        ];
        match validate_variables(&vars) {
            Err(DefinitionError::PrefixCollisionId { shorter, longer }) => {
                assert_eq!(shorter, "sqft");
                assert_eq!(longer, "sqft2");
            }
            other => panic!("expected PrefixCollisionId, got {:?}", other),
        }

        let vars = vec![
            named("sqft2", VariableKind::Number),
            named("sqft", VariableKind::Number),
        ];
        assert!(matches!(
            validate_variables(&vars),
            Err(DefinitionError::PrefixCollisionId { .. })
        ));
    }

    #[test]
    fn forward_condition_reference_fails() {
        let mut gated = named("garage_size", VariableKind::Number);
        gated.conditional_logic = Some(ConditionalLogic {
            enabled: true,
            conditions: vec![Condition::new(
                "has_garage",
                ConditionKind::Equals,
                Some(RawValue::Bool(true)),
            )],
            default_value: Some(RawValue::Number(0.0)),
            ..ConditionalLogic::default()
        });
        // Dependency declared after the dependent: rejected.
        let vars = vec![gated.clone(), named("has_garage", VariableKind::Checkbox)];
        assert!(matches!(
            validate_variables(&vars),
            Err(DefinitionError::ForwardConditionReference { .. })
        ));

        // Dependency declared before: accepted.
        let vars = vec![named("has_garage", VariableKind::Checkbox), gated];
        assert!(validate_variables(&vars).is_ok());
    }
}
