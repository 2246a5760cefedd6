//! Record-to-object projection.
//!
//! Computed once at table initialization and read-only afterwards: which
//! attribute index supplies the object key, and which indices make up the
//! serialized payload.

use std::collections::HashSet;

use crate::domain::errors::SchemaError;
use crate::domain::models::{AttributeType, TableSchema};

/// Derived plan mapping a record to `{key, payload subset}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionPlan {
    primary_key_index: usize,
    payload_indices: Vec<usize>,
}

impl ProjectionPlan {
    /// Resolve the primary key and payload attributes against the schema.
    ///
    /// The key attribute is matched case-insensitively and must be STRING.
    /// Payload indices follow schema order regardless of how the fields were
    /// listed in the configuration; configured names that do not exist in
    /// the schema are silently omitted.
    pub fn build(
        schema: &TableSchema,
        primary_key: &str,
        object_fields: &HashSet<String>,
    ) -> Result<Self, SchemaError> {
        let primary_key_index =
            schema
                .index_of(primary_key)
                .ok_or_else(|| SchemaError::PrimaryKeyNotFound {
                    name: primary_key.to_string(),
                })?;

        let key_attribute = &schema.attributes()[primary_key_index];
        if key_attribute.attribute_type() != AttributeType::String {
            return Err(SchemaError::PrimaryKeyNotString {
                name: key_attribute.name().to_string(),
                actual: key_attribute.attribute_type(),
            });
        }

        let payload_indices = schema
            .attributes()
            .iter()
            .enumerate()
            .filter(|(_, attr)| object_fields.contains(&attr.name().to_ascii_lowercase()))
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            primary_key_index,
            payload_indices,
        })
    }

    pub fn primary_key_index(&self) -> usize {
        self.primary_key_index
    }

    pub fn payload_indices(&self) -> &[usize] {
        &self.payload_indices
    }

    pub fn is_payload_index(&self, index: usize) -> bool {
        self.payload_indices.contains(&index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Attribute;

    fn schema() -> TableSchema {
        TableSchema::new(vec![
            Attribute::new("id", AttributeType::String),
            Attribute::new("a", AttributeType::Int),
            Attribute::new("b", AttributeType::String),
            Attribute::new("c", AttributeType::Double),
        ])
    }

    fn fields(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn resolves_key_and_payload() {
        let plan = ProjectionPlan::build(&schema(), "id", &fields(&["a", "b"])).unwrap();
        assert_eq!(plan.primary_key_index(), 0);
        assert_eq!(plan.payload_indices(), &[1, 2]);
    }

    #[test]
    fn key_lookup_ignores_case() {
        let plan = ProjectionPlan::build(&schema(), "ID", &fields(&["a"])).unwrap();
        assert_eq!(plan.primary_key_index(), 0);
    }

    #[test]
    fn payload_preserves_schema_order() {
        // Configuration order must not leak into the plan.
        let plan = ProjectionPlan::build(&schema(), "id", &fields(&["c", "b", "a"])).unwrap();
        assert_eq!(plan.payload_indices(), &[1, 2, 3]);
    }

    #[test]
    fn unknown_fields_are_silently_omitted() {
        let plan = ProjectionPlan::build(&schema(), "id", &fields(&["a", "ghost"])).unwrap();
        assert_eq!(plan.payload_indices(), &[1]);
    }

    #[test]
    fn missing_primary_key_fails() {
        let err = ProjectionPlan::build(&schema(), "nope", &fields(&["a"])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::PrimaryKeyNotFound {
                name: "nope".to_string()
            }
        );
    }

    #[test]
    fn non_string_primary_key_fails() {
        let err = ProjectionPlan::build(&schema(), "a", &fields(&["b"])).unwrap_err();
        assert_eq!(
            err,
            SchemaError::PrimaryKeyNotString {
                name: "a".to_string(),
                actual: AttributeType::Int
            }
        );
    }
}
