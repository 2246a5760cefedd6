use crate::query::CompareOp;

/// Errors raised while compiling a condition or resolving it at run time.
///
/// Object storage is key-addressed only, so every supported predicate must
/// bottom out in an equality over the primary key.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Only equality comparisons are supported.
    UnsupportedOperator { op: CompareOp },

    /// The predicate references an attribute other than the primary key.
    NonKeyPredicate { attribute: String },

    /// Neither side of the comparison references the primary key.
    NotAKeyLookup,

    /// The value compared against the primary key is not a STRING.
    NonStringKey,

    /// A set expression targets an attribute that is not in the schema.
    UnknownAttribute { attribute: String },

    /// A set expression targets the primary key, which is immutable.
    CannotSetPrimaryKey { attribute: String },

    /// A set expression targets an attribute outside the stored payload.
    NotAPayloadAttribute { attribute: String },

    /// A set expression sources its value from another attribute, which is
    /// not supported.
    UnsupportedSetSource { attribute: String },

    /// A named parameter was not supplied in the condition parameter map.
    UnboundParameter { parameter: String },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::UnsupportedOperator { op } => {
                write!(f, "Operator '{}' is not supported; only equality lookups on the primary key are available", op)
            }
            QueryError::NonKeyPredicate { attribute } => {
                write!(
                    f,
                    "Predicate on '{}' is not supported; only the primary key can be queried",
                    attribute
                )
            }
            QueryError::NotAKeyLookup => {
                write!(f, "Condition does not reference the primary key")
            }
            QueryError::NonStringKey => {
                write!(f, "Primary key comparisons require a STRING value")
            }
            QueryError::UnknownAttribute { attribute } => {
                write!(f, "Attribute '{}' not found in table schema", attribute)
            }
            QueryError::CannotSetPrimaryKey { attribute } => {
                write!(f, "Primary key '{}' cannot be updated", attribute)
            }
            QueryError::NotAPayloadAttribute { attribute } => {
                write!(
                    f,
                    "Attribute '{}' is not part of the stored object fields",
                    attribute
                )
            }
            QueryError::UnsupportedSetSource { attribute } => {
                write!(
                    f,
                    "Cannot assign from attribute '{}'; only constants and parameters are supported",
                    attribute
                )
            }
            QueryError::UnboundParameter { parameter } => {
                write!(f, "No value supplied for parameter '{}'", parameter)
            }
        }
    }
}

impl std::error::Error for QueryError {}
