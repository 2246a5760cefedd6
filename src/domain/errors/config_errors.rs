use super::validation_errors::ValidationError;

/// Errors raised while parsing the declarative table configuration.
///
/// These are fatal: they surface at table-definition time and are never
/// retried.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// `bucket.name` is absent or empty.
    MissingBucketName,

    /// `bucket.name` is present but not a valid bucket name.
    InvalidBucketName(ValidationError),

    /// `object.fields` is absent or empty.
    MissingObjectFields,

    /// No primary key was declared for the table.
    MissingPrimaryKey,

    /// The primary key declaration names more than one column.
    CompositePrimaryKey { count: usize },
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigurationError::MissingBucketName => {
                write!(f, "Bucket name cannot be null or empty")
            }
            ConfigurationError::InvalidBucketName(err) => {
                write!(f, "Invalid bucket name: {}", err)
            }
            ConfigurationError::MissingObjectFields => {
                write!(f, "Object fields cannot be null or empty")
            }
            ConfigurationError::MissingPrimaryKey => {
                write!(f, "Primary key cannot be null")
            }
            ConfigurationError::CompositePrimaryKey { count } => {
                write!(
                    f,
                    "Primary key can contain only one value, got {}",
                    count
                )
            }
        }
    }
}

impl std::error::Error for ConfigurationError {}
