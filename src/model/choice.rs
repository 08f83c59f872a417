//! Choice rules: data-test and boolean expressions.
//!
//! Serialization is written by hand because an expression's operator is a dynamic key
//! (`"StringEquals": "x"`) and a rule flattens its expression next to `Next`.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

/// JSON shape an operator's operand must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    Text,
    Number,
    Boolean,
    Timestamp,
    JsonPath,
}

macro_rules! comparison_operators {
    ($($name:ident => $kind:ident,)+) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ComparisonOperator {
            $($name,)+
        }

        impl ComparisonOperator {
            pub const ALL: &'static [ComparisonOperator] = &[$(ComparisonOperator::$name,)+];

            /// Field name as written in a document.
            pub fn name(self) -> &'static str {
                match self {
                    $(ComparisonOperator::$name => stringify!($name),)+
                }
            }

            pub fn operand_kind(self) -> OperandKind {
                match self {
                    $(ComparisonOperator::$name => OperandKind::$kind,)+
                }
            }
        }
    };
}

comparison_operators! {
    StringEquals => Text,
    StringEqualsPath => JsonPath,
    StringLessThan => Text,
    StringLessThanPath => JsonPath,
    StringGreaterThan => Text,
    StringGreaterThanPath => JsonPath,
    StringLessThanEquals => Text,
    StringLessThanEqualsPath => JsonPath,
    StringGreaterThanEquals => Text,
    StringGreaterThanEqualsPath => JsonPath,
    StringMatches => Text,
    NumericEquals => Number,
    NumericEqualsPath => JsonPath,
    NumericLessThan => Number,
    NumericLessThanPath => JsonPath,
    NumericGreaterThan => Number,
    NumericGreaterThanPath => JsonPath,
    NumericLessThanEquals => Number,
    NumericLessThanEqualsPath => JsonPath,
    NumericGreaterThanEquals => Number,
    NumericGreaterThanEqualsPath => JsonPath,
    BooleanEquals => Boolean,
    BooleanEqualsPath => JsonPath,
    TimestampEquals => Timestamp,
    TimestampEqualsPath => JsonPath,
    TimestampLessThan => Timestamp,
    TimestampLessThanPath => JsonPath,
    TimestampGreaterThan => Timestamp,
    TimestampGreaterThanPath => JsonPath,
    TimestampLessThanEquals => Timestamp,
    TimestampLessThanEqualsPath => JsonPath,
    TimestampGreaterThanEquals => Timestamp,
    TimestampGreaterThanEqualsPath => JsonPath,
    IsNull => Boolean,
    IsPresent => Boolean,
    IsNumeric => Boolean,
    IsString => Boolean,
    IsBoolean => Boolean,
    IsTimestamp => Boolean,
}

impl ComparisonOperator {
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.name() == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTestExpression {
    pub variable: String,
    pub operator: ComparisonOperator,
    pub operand: Value,
    /// Other operators written as explicit `null`.
    pub null_operators: Vec<ComparisonOperator>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BooleanExpression {
    And(Vec<Condition>),
    Or(Vec<Condition>),
    Not(Box<Condition>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    DataTest(DataTestExpression),
    Boolean {
        expression: BooleanExpression,
        /// Sibling combinators (`And`, `Or`, `Not`) written as explicit `null`.
        null_combinators: Vec<&'static str>,
    },
}

impl Condition {
    pub fn boolean(expression: BooleanExpression) -> Self {
        Condition::Boolean {
            expression,
            null_combinators: Vec::new(),
        }
    }
}

/// A top-level condition with its transition target.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceRule {
    pub condition: Condition,
    pub next: String,
}

impl DataTestExpression {
    fn write_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        map.serialize_entry("Variable", &self.variable)?;
        map.serialize_entry(self.operator.name(), &self.operand)?;
        for op in &self.null_operators {
            map.serialize_entry(op.name(), &Value::Null)?;
        }
        Ok(())
    }
}

impl BooleanExpression {
    fn write_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            BooleanExpression::And(items) => map.serialize_entry("And", items),
            BooleanExpression::Or(items) => map.serialize_entry("Or", items),
            BooleanExpression::Not(inner) => map.serialize_entry("Not", inner.as_ref()),
        }
    }
}

impl Condition {
    fn write_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            Condition::DataTest(test) => test.write_entries(map),
            Condition::Boolean {
                expression,
                null_combinators,
            } => {
                expression.write_entries(map)?;
                for key in null_combinators {
                    map.serialize_entry(key, &Value::Null)?;
                }
                Ok(())
            }
        }
    }
}

impl Serialize for DataTestExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.null_operators.len()))?;
        self.write_entries(&mut map)?;
        map.end()
    }
}

impl Serialize for BooleanExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        self.write_entries(&mut map)?;
        map.end()
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.write_entries(&mut map)?;
        map.end()
    }
}

impl Serialize for ChoiceRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.condition.write_entries(&mut map)?;
        map.serialize_entry("Next", &self.next)?;
        map.end()
    }
}
