//! Choice rule construction.
//!
//! A rule object carrying any of `And`, `Or`, `Not` is a boolean expression; anything else
//! is read as a data test. `Next` is only read at rule level, so a nested expression that
//! carries one fails with `UnexpectedField`.

use serde_json::Value;

use super::reader::{Built, ObjectReader, boolean, json_path, object_level, present, string, timestamp};
use crate::error::ValidationError;
use crate::model::{
    BooleanExpression, ChoiceRule, ComparisonOperator, Condition, DataTestExpression, FieldPath,
    OperandKind, Presence,
};
use crate::validate::combinators::require_exactly_one;

const BOOLEAN_KEYS: [&str; 3] = ["And", "Or", "Not"];

/// Fields of a condition after the field-level pass, before its exclusivity rule.
enum ConditionFields {
    DataTest {
        variable: Option<String>,
        operators: Vec<(ComparisonOperator, Presence<Value>)>,
    },
    Boolean {
        and: Presence<Vec<Condition>>,
        or: Presence<Vec<Condition>>,
        not: Presence<Condition>,
    },
}

/// Build a top-level choice rule: a condition plus its `Next` target.
pub fn parse_rule(value: &Value, path: &FieldPath) -> Built<ChoiceRule> {
    let mut r = ObjectReader::new(value, path)?;
    let fields = read_condition(&mut r);
    let next = r.required("Next", string);
    r.finish()?;

    let condition = fields.resolve(path)?;
    Ok(ChoiceRule {
        condition,
        next: present(next, path, "Next")?,
    })
}

/// Build a nested condition (inside `And`, `Or` or `Not`).
pub fn parse_condition(value: &Value, path: &FieldPath) -> Built<Condition> {
    let mut r = ObjectReader::new(value, path)?;
    let fields = read_condition(&mut r);
    r.finish()?;
    fields.resolve(path)
}

fn read_condition(r: &mut ObjectReader<'_>) -> ConditionFields {
    if r.has_any(&BOOLEAN_KEYS) {
        return ConditionFields::Boolean {
            and: r.optional_list("And", parse_condition),
            or: r.optional_list("Or", parse_condition),
            not: r.optional_object("Not", parse_condition),
        };
    }

    let variable = r.required("Variable", json_path);
    let operators = ComparisonOperator::ALL
        .iter()
        .map(|op| (*op, r.optional(op.name(), |v, p| operand(*op, v, p))))
        .collect();
    ConditionFields::DataTest {
        variable,
        operators,
    }
}

impl ConditionFields {
    fn resolve(self, path: &FieldPath) -> Built<Condition> {
        match self {
            ConditionFields::Boolean { and, or, not } => {
                let set = [
                    ("And", and.is_set()),
                    ("Or", or.is_set()),
                    ("Not", not.is_set()),
                ];
                object_level((), [require_exactly_one(&set, path)])?;

                let null_combinators = [
                    ("And", and.is_null()),
                    ("Or", or.is_null()),
                    ("Not", not.is_null()),
                ]
                .into_iter()
                .filter_map(|(key, null)| null.then_some(key))
                .collect();
                let expression = match (and, or, not) {
                    (Presence::Set(items), _, _) => BooleanExpression::And(items),
                    (_, Presence::Set(items), _) => BooleanExpression::Or(items),
                    (_, _, Presence::Set(inner)) => BooleanExpression::Not(Box::new(inner)),
                    _ => return Err(vec![ValidationError::missing_field(path, "And")]),
                };
                Ok(Condition::Boolean {
                    expression,
                    null_combinators,
                })
            }
            ConditionFields::DataTest {
                variable,
                operators,
            } => {
                let set: Vec<(&str, bool)> = operators
                    .iter()
                    .map(|(op, operand)| (op.name(), operand.is_set()))
                    .collect();
                object_level((), [require_exactly_one(&set, path)])?;

                let variable = present(variable, path, "Variable")?;
                let mut chosen = None;
                let mut null_operators = Vec::new();
                for (op, operand) in operators {
                    match operand {
                        Presence::Set(value) => chosen = Some((op, value)),
                        Presence::Null => null_operators.push(op),
                        Presence::Absent => {}
                    }
                }
                let (operator, operand) = chosen
                    .ok_or_else(|| vec![ValidationError::missing_field(path, "StringEquals")])?;
                Ok(Condition::DataTest(DataTestExpression {
                    variable,
                    operator,
                    operand,
                    null_operators,
                }))
            }
        }
    }
}

/// Check an operand against the JSON shape its operator takes.
fn operand(op: ComparisonOperator, value: &Value, path: &FieldPath) -> Result<Value, ValidationError> {
    match op.operand_kind() {
        OperandKind::Text => string(value, path).map(Value::String),
        OperandKind::Boolean => boolean(value, path).map(Value::Bool),
        OperandKind::Timestamp => timestamp(value, path).map(Value::String),
        OperandKind::JsonPath => json_path(value, path).map(Value::String),
        OperandKind::Number if value.is_number() => Ok(value.clone()),
        OperandKind::Number => Err(ValidationError::invalid_type(
            path,
            &format!("a number, found {}", super::reader::json_type(value)),
        )),
    }
}
