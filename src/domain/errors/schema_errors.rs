use crate::domain::models::AttributeType;

/// Errors raised while resolving the primary key and payload attributes
/// against the table schema. Fatal at table-definition time.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The declared primary-key column does not exist in the schema.
    PrimaryKeyNotFound { name: String },

    /// The primary-key column exists but is not of type STRING.
    PrimaryKeyNotString {
        name: String,
        actual: AttributeType,
    },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::PrimaryKeyNotFound { name } => {
                write!(f, "Primary key '{}' not found in table schema", name)
            }
            SchemaError::PrimaryKeyNotString { name, actual } => {
                write!(
                    f,
                    "Primary key '{}' can contain only STRING, found {}",
                    name, actual
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}
