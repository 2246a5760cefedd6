/// Validation errors for domain value objects
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    // ObjectKey validation errors
    EmptyObjectKey,
    ObjectKeyTooLong { actual: usize, max: usize },
    InvalidObjectKeyCharacter(char),
    ObjectKeyStartsWithSlash,

    // BucketName validation errors
    BucketNameLength { actual: usize, min: usize, max: usize },
    BucketNameInvalidCharacter(char),
    BucketNameInvalidEdge,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyObjectKey => write!(f, "Object key cannot be empty"),
            ValidationError::ObjectKeyTooLong { actual, max } => {
                write!(f, "Object key too long: {} bytes (max: {})", actual, max)
            }
            ValidationError::InvalidObjectKeyCharacter(c) => {
                write!(f, "Invalid character in object key: {:?}", c)
            }
            ValidationError::ObjectKeyStartsWithSlash => {
                write!(f, "Object key cannot start with '/'")
            }
            ValidationError::BucketNameLength { actual, min, max } => {
                write!(
                    f,
                    "Bucket name must be between {} and {} characters, got {}",
                    min, max, actual
                )
            }
            ValidationError::BucketNameInvalidCharacter(c) => {
                write!(f, "Invalid character in bucket name: {:?}", c)
            }
            ValidationError::BucketNameInvalidEdge => {
                write!(
                    f,
                    "Bucket name must start and end with a lowercase letter or digit"
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}
