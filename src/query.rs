//! Condition and set-expression compilation.
//!
//! The store is key-addressed, so the only predicate that can be answered
//! without scanning the whole bucket is an equality over the primary key.
//! Everything else is rejected at compile time; the host never gets as far
//! as issuing an unanswerable lookup.

use std::collections::HashMap;

use crate::domain::errors::QueryError;
use crate::domain::models::{AttributeValue, TableSchema};
use crate::projection::ProjectionPlan;

/// Comparison operators a host condition may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        };
        write!(f, "{}", s)
    }
}

/// One side of a comparison or the source of a set expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A reference to a table attribute by name.
    Attribute(String),
    /// A literal value fixed at compile time.
    Constant(AttributeValue),
    /// A host stream variable, bound per operation through the parameter map.
    Parameter(String),
}

/// A single comparison supplied by the host's expression visitor.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionExpr {
    pub left: Operand,
    pub op: CompareOp,
    pub right: Operand,
}

impl ConditionExpr {
    pub fn eq(left: Operand, right: Operand) -> Self {
        Self {
            left,
            op: CompareOp::Eq,
            right,
        }
    }
}

/// Where the object key comes from at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    Constant(String),
    Parameter(String),
}

/// A compiled condition: an equality lookup on the primary key.
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledCondition {
    KeyEquals(KeySource),
}

impl CompiledCondition {
    /// Compile a host condition against the table's primary-key name.
    ///
    /// Accepts `key == constant` and `key == ?parameter` with the key on
    /// either side.
    pub fn compile(expr: &ConditionExpr, primary_key: &str) -> Result<Self, QueryError> {
        if expr.op != CompareOp::Eq {
            return Err(QueryError::UnsupportedOperator { op: expr.op });
        }

        let (attribute, other) = match (&expr.left, &expr.right) {
            (Operand::Attribute(name), other) | (other, Operand::Attribute(name)) => {
                (name, other)
            }
            _ => return Err(QueryError::NotAKeyLookup),
        };

        if !attribute.eq_ignore_ascii_case(primary_key) {
            return Err(QueryError::NonKeyPredicate {
                attribute: attribute.clone(),
            });
        }

        match other {
            Operand::Constant(AttributeValue::String(value)) => {
                Ok(CompiledCondition::KeyEquals(KeySource::Constant(value.clone())))
            }
            Operand::Constant(_) => Err(QueryError::NonStringKey),
            Operand::Parameter(name) => {
                Ok(CompiledCondition::KeyEquals(KeySource::Parameter(name.clone())))
            }
            Operand::Attribute(name) => Err(QueryError::NonKeyPredicate {
                attribute: name.clone(),
            }),
        }
    }

    /// Resolve the object key for one execution of the condition.
    pub fn resolve_key(
        &self,
        params: &HashMap<String, AttributeValue>,
    ) -> Result<String, QueryError> {
        let CompiledCondition::KeyEquals(source) = self;
        match source {
            KeySource::Constant(value) => Ok(value.clone()),
            KeySource::Parameter(name) => match params.get(name) {
                Some(AttributeValue::String(value)) => Ok(value.clone()),
                Some(_) => Err(QueryError::NonStringKey),
                None => Err(QueryError::UnboundParameter {
                    parameter: name.clone(),
                }),
            },
        }
    }
}

/// An assignment supplied by the host for update operations.
#[derive(Debug, Clone, PartialEq)]
pub struct SetExpr {
    pub attribute: String,
    pub value: Operand,
}

/// Where an assigned value comes from at execution time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    Constant(AttributeValue),
    Parameter(String),
}

/// A compiled assignment targeting one payload attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSetAttribute {
    attribute: String,
    source: ValueSource,
}

impl CompiledSetAttribute {
    /// Compile an assignment against the schema and projection plan.
    ///
    /// The target must exist, must not be the primary key, and must be one
    /// of the configured object fields; the stored attribute name uses the
    /// schema's casing so updates line up with written payloads.
    pub fn compile(
        expr: &SetExpr,
        schema: &TableSchema,
        plan: &ProjectionPlan,
    ) -> Result<Self, QueryError> {
        let index = schema
            .index_of(&expr.attribute)
            .ok_or_else(|| QueryError::UnknownAttribute {
                attribute: expr.attribute.clone(),
            })?;

        if index == plan.primary_key_index() {
            return Err(QueryError::CannotSetPrimaryKey {
                attribute: expr.attribute.clone(),
            });
        }

        if !plan.is_payload_index(index) {
            return Err(QueryError::NotAPayloadAttribute {
                attribute: expr.attribute.clone(),
            });
        }

        let source = match &expr.value {
            Operand::Constant(value) => ValueSource::Constant(value.clone()),
            Operand::Parameter(name) => ValueSource::Parameter(name.clone()),
            Operand::Attribute(name) => {
                return Err(QueryError::UnsupportedSetSource {
                    attribute: name.clone(),
                })
            }
        };

        Ok(Self {
            attribute: schema.attributes()[index].name().to_string(),
            source,
        })
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Resolve the assigned value for one execution.
    pub fn resolve(
        &self,
        params: &HashMap<String, AttributeValue>,
    ) -> Result<AttributeValue, QueryError> {
        match &self.source {
            ValueSource::Constant(value) => Ok(value.clone()),
            ValueSource::Parameter(name) => {
                params
                    .get(name)
                    .cloned()
                    .ok_or_else(|| QueryError::UnboundParameter {
                        parameter: name.clone(),
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Attribute, AttributeType};

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            Attribute::new("id", AttributeType::String),
            Attribute::new("a", AttributeType::Int),
            Attribute::new("b", AttributeType::String),
        ])
    }

    fn plan() -> ProjectionPlan {
        let fields = ["a".to_string(), "b".to_string()].into_iter().collect();
        ProjectionPlan::build(&schema(), "id", &fields).unwrap()
    }

    #[test]
    fn compiles_constant_key_equality() {
        let expr = ConditionExpr::eq(
            Operand::Attribute("id".to_string()),
            Operand::Constant(AttributeValue::from("k1")),
        );
        let compiled = CompiledCondition::compile(&expr, "id").unwrap();
        assert_eq!(
            compiled,
            CompiledCondition::KeyEquals(KeySource::Constant("k1".to_string()))
        );
        assert_eq!(compiled.resolve_key(&HashMap::new()).unwrap(), "k1");
    }

    #[test]
    fn compiles_parameter_key_on_either_side() {
        let expr = ConditionExpr::eq(
            Operand::Parameter("pk".to_string()),
            Operand::Attribute("ID".to_string()),
        );
        let compiled = CompiledCondition::compile(&expr, "id").unwrap();

        let mut params = HashMap::new();
        params.insert("pk".to_string(), AttributeValue::from("k9"));
        assert_eq!(compiled.resolve_key(&params).unwrap(), "k9");
    }

    #[test]
    fn rejects_non_equality_operators() {
        let expr = ConditionExpr {
            left: Operand::Attribute("id".to_string()),
            op: CompareOp::Gt,
            right: Operand::Constant(AttributeValue::from("k1")),
        };
        assert_eq!(
            CompiledCondition::compile(&expr, "id").unwrap_err(),
            QueryError::UnsupportedOperator { op: CompareOp::Gt }
        );
    }

    #[test]
    fn rejects_non_key_predicates() {
        let expr = ConditionExpr::eq(
            Operand::Attribute("a".to_string()),
            Operand::Constant(AttributeValue::from(1)),
        );
        assert_eq!(
            CompiledCondition::compile(&expr, "id").unwrap_err(),
            QueryError::NonKeyPredicate {
                attribute: "a".to_string()
            }
        );
    }

    #[test]
    fn rejects_non_string_key_values() {
        let expr = ConditionExpr::eq(
            Operand::Attribute("id".to_string()),
            Operand::Constant(AttributeValue::from(1)),
        );
        assert_eq!(
            CompiledCondition::compile(&expr, "id").unwrap_err(),
            QueryError::NonStringKey
        );
    }

    #[test]
    fn unbound_parameter_fails_at_resolution() {
        let expr = ConditionExpr::eq(
            Operand::Attribute("id".to_string()),
            Operand::Parameter("pk".to_string()),
        );
        let compiled = CompiledCondition::compile(&expr, "id").unwrap();
        assert_eq!(
            compiled.resolve_key(&HashMap::new()).unwrap_err(),
            QueryError::UnboundParameter {
                parameter: "pk".to_string()
            }
        );
    }

    #[test]
    fn set_attribute_must_be_a_payload_field() {
        let set = SetExpr {
            attribute: "id".to_string(),
            value: Operand::Constant(AttributeValue::from("x")),
        };
        assert_eq!(
            CompiledSetAttribute::compile(&set, &schema(), &plan()).unwrap_err(),
            QueryError::CannotSetPrimaryKey {
                attribute: "id".to_string()
            }
        );

        let set = SetExpr {
            attribute: "ghost".to_string(),
            value: Operand::Constant(AttributeValue::from("x")),
        };
        assert_eq!(
            CompiledSetAttribute::compile(&set, &schema(), &plan()).unwrap_err(),
            QueryError::UnknownAttribute {
                attribute: "ghost".to_string()
            }
        );
    }

    #[test]
    fn set_attribute_resolves_values() {
        let set = SetExpr {
            attribute: "A".to_string(),
            value: Operand::Parameter("v".to_string()),
        };
        let compiled = CompiledSetAttribute::compile(&set, &schema(), &plan()).unwrap();
        assert_eq!(compiled.attribute(), "a");

        let mut params = HashMap::new();
        params.insert("v".to_string(), AttributeValue::from(7));
        assert_eq!(compiled.resolve(&params).unwrap(), AttributeValue::Int(7));
    }
}
