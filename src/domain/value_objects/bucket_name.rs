use crate::domain::errors::ValidationError;

/// A validated bucket name.
///
/// Follows the common S3 naming rules: 3 to 63 characters, lowercase
/// letters, digits, hyphens and dots, starting and ending with a letter or
/// digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();

        if !(3..=63).contains(&value.len()) {
            return Err(ValidationError::BucketNameLength {
                actual: value.len(),
                min: 3,
                max: 63,
            });
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-' && *c != '.')
        {
            return Err(ValidationError::BucketNameInvalidCharacter(c));
        }

        let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if !edge_ok(value.chars().next()) || !edge_ok(value.chars().last()) {
            return Err(ValidationError::BucketNameInvalidEdge);
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BucketName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
