//! Declarative table configuration.
//!
//! The host engine hands the adapter a flat `key -> string` mapping taken
//! from the table definition. Parsing is pure: the same elements always
//! produce the same [`StoreConfig`], and nothing is touched outside the
//! mapping.

use std::collections::{HashMap, HashSet};

use crate::domain::errors::ConfigurationError;
use crate::domain::value_objects::BucketName;

/// Configuration element keys understood by the adapter.
pub mod keys {
    pub const BUCKET_NAME: &str = "bucket.name";
    pub const OBJECT_FIELDS: &str = "object.fields";
    pub const REGION: &str = "region";
    pub const CONTENT_TYPE: &str = "content.type";
    pub const CREDENTIAL_PROVIDER: &str = "credential.provider";
    pub const ENABLE_VERSIONING: &str = "enable.versioning";
}

/// Used when `region` is absent; stands in for the provider default region.
pub const DEFAULT_REGION: &str = "us-east-1";

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Immutable, validated store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    bucket_name: BucketName,
    region: String,
    credential_provider: Option<String>,
    object_fields: HashSet<String>,
    content_type: String,
    enable_versioning: bool,
}

impl StoreConfig {
    /// Parse and validate the raw configuration elements.
    ///
    /// `object.fields` entries are lower-cased and split on `,`; whitespace
    /// around entries is preserved as written, so `"a, b"` yields the field
    /// names `"a"` and `" b"`. A non-boolean `enable.versioning` value
    /// coerces to `false` rather than failing.
    pub fn parse(elements: &HashMap<String, String>) -> Result<Self, ConfigurationError> {
        let bucket_name = element(elements, keys::BUCKET_NAME)
            .ok_or(ConfigurationError::MissingBucketName)?;
        let bucket_name =
            BucketName::new(bucket_name).map_err(ConfigurationError::InvalidBucketName)?;

        let object_fields: HashSet<String> = element(elements, keys::OBJECT_FIELDS)
            .ok_or(ConfigurationError::MissingObjectFields)?
            .to_ascii_lowercase()
            .split(',')
            .map(str::to_string)
            .collect();

        let region = element(elements, keys::REGION)
            .unwrap_or(DEFAULT_REGION)
            .to_string();

        let content_type = element(elements, keys::CONTENT_TYPE)
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();

        let credential_provider =
            element(elements, keys::CREDENTIAL_PROVIDER).map(str::to_string);

        let enable_versioning = element(elements, keys::ENABLE_VERSIONING)
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        Ok(Self {
            bucket_name,
            region,
            credential_provider,
            object_fields,
            content_type,
            enable_versioning,
        })
    }

    pub fn bucket_name(&self) -> &BucketName {
        &self.bucket_name
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// The named credential provider, or `None` for the default chain.
    pub fn credential_provider(&self) -> Option<&str> {
        self.credential_provider.as_deref()
    }

    /// Lower-cased attribute names that make up the stored payload.
    pub fn object_fields(&self) -> &HashSet<String> {
        &self.object_fields
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Parsed but currently carried without behavior attached.
    pub fn enable_versioning(&self) -> bool {
        self.enable_versioning
    }
}

/// A present, non-empty element value.
fn element<'a>(elements: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    elements
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn applies_defaults() {
        let config = StoreConfig::parse(&elements(&[
            (keys::BUCKET_NAME, "ev-bkt"),
            (keys::OBJECT_FIELDS, "a,b"),
        ]))
        .unwrap();

        assert_eq!(config.bucket_name().as_str(), "ev-bkt");
        assert_eq!(config.region(), DEFAULT_REGION);
        assert_eq!(config.content_type(), DEFAULT_CONTENT_TYPE);
        assert_eq!(config.credential_provider(), None);
        assert!(!config.enable_versioning());
    }

    #[test]
    fn missing_bucket_name_is_rejected() {
        let err = StoreConfig::parse(&elements(&[(keys::OBJECT_FIELDS, "a")])).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingBucketName);

        let err = StoreConfig::parse(&elements(&[
            (keys::BUCKET_NAME, ""),
            (keys::OBJECT_FIELDS, "a"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigurationError::MissingBucketName);
    }

    #[test]
    fn missing_object_fields_is_rejected() {
        let err = StoreConfig::parse(&elements(&[(keys::BUCKET_NAME, "ev-bkt")])).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingObjectFields);
    }

    #[test]
    fn invalid_bucket_name_is_rejected() {
        let err = StoreConfig::parse(&elements(&[
            (keys::BUCKET_NAME, "Not A Bucket"),
            (keys::OBJECT_FIELDS, "a"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBucketName(_)));
    }

    #[test]
    fn object_fields_are_lowercased_and_not_trimmed() {
        let config = StoreConfig::parse(&elements(&[
            (keys::BUCKET_NAME, "ev-bkt"),
            (keys::OBJECT_FIELDS, "Alpha, beta"),
        ]))
        .unwrap();

        assert!(config.object_fields().contains("alpha"));
        assert!(config.object_fields().contains(" beta"));
        assert!(!config.object_fields().contains("beta"));
    }

    #[test]
    fn versioning_flag_is_permissive() {
        for (raw, expected) in [("true", true), ("TRUE", true), ("yes", false), ("1", false)] {
            let config = StoreConfig::parse(&elements(&[
                (keys::BUCKET_NAME, "ev-bkt"),
                (keys::OBJECT_FIELDS, "a"),
                (keys::ENABLE_VERSIONING, raw),
            ]))
            .unwrap();
            assert_eq!(config.enable_versioning(), expected, "value {:?}", raw);
        }
    }

    #[test]
    fn parse_is_deterministic() {
        let input = elements(&[
            (keys::BUCKET_NAME, "ev-bkt"),
            (keys::OBJECT_FIELDS, "b,a,c"),
            (keys::REGION, "eu-north-1"),
            (keys::CONTENT_TYPE, "application/json"),
            (keys::CREDENTIAL_PROVIDER, "env"),
        ]);

        let first = StoreConfig::parse(&input).unwrap();
        let second = StoreConfig::parse(&input).unwrap();

        assert_eq!(first.bucket_name(), second.bucket_name());
        assert_eq!(first.region(), second.region());
        assert_eq!(first.content_type(), second.content_type());
        assert_eq!(first.credential_provider(), second.credential_provider());
        assert_eq!(first.object_fields(), second.object_fields());
    }
}
