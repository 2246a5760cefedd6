//! S3-compatible backend.
//!
//! Object reads and writes go through `object_store`'s AWS implementation.
//! Bucket existence and creation are control-plane calls the data-plane
//! crate does not offer, so they are issued directly against the service
//! endpoint with `reqwest`, parsing S3 `<Error>` XML bodies for
//! diagnostics.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::domain::value_objects::ObjectKey;
use crate::ports::backend::{BackendFactory, BucketStatus, ConnectionError, ObjectBackend};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Backend talking to S3 or an S3-compatible service such as MinIO.
#[derive(Debug)]
pub struct S3Backend {
    store: AmazonS3,
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    region: String,
}

#[async_trait]
impl ObjectBackend for S3Backend {
    async fn ensure_bucket(&self) -> Result<BucketStatus, ConnectionError> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), self.bucket);

        let head = self.http.head(&url).send().await?;
        if head.status().is_success() {
            return Ok(BucketStatus::AlreadyExists);
        }
        if head.status().as_u16() != 404 {
            return Err(ConnectionError::Bucket {
                bucket: self.bucket.clone(),
                message: format!("unexpected status {} checking bucket", head.status()),
            });
        }

        // us-east-1 is the one region that must not carry a location
        // constraint in the create request.
        let body = if self.region == "us-east-1" {
            String::new()
        } else {
            format!(
                "<CreateBucketConfiguration><LocationConstraint>{}</LocationConstraint></CreateBucketConfiguration>",
                self.region
            )
        };

        let response = self.http.put(&url).body(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(BucketStatus::Created);
        }

        let error = parse_error_body(&response.text().await.unwrap_or_default());
        // Lost a create race, or re-connected concurrently: the bucket is
        // there, which is all this call guarantees.
        if error
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .is_some_and(|code| code == "BucketAlreadyOwnedByYou" || code == "BucketAlreadyExists")
        {
            return Ok(BucketStatus::AlreadyExists);
        }

        Err(ConnectionError::Bucket {
            bucket: self.bucket.clone(),
            message: error
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("create returned status {}", status)),
        })
    }

    async fn put(
        &self,
        key: &ObjectKey,
        payload: Bytes,
        content_type: &str,
    ) -> Result<(), ConnectionError> {
        super::put_object(&self.store, key, payload, content_type).await
    }

    async fn get(&self, key: &ObjectKey) -> Result<Option<Bytes>, ConnectionError> {
        super::get_object(&self.store, key).await
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, ConnectionError> {
        super::object_exists(&self.store, key).await
    }

    async fn delete(&self, key: &ObjectKey) -> Result<(), ConnectionError> {
        super::delete_object(&self.store, key).await
    }
}

/// Builds [`S3Backend`] instances scoped to the configured region and
/// bucket. Credentials come from the platform environment unless the table
/// names a different provider.
#[derive(Debug, Clone, Default)]
pub struct S3BackendFactory {
    endpoint: Option<String>,
    allow_http: bool,
}

impl S3BackendFactory {
    /// Factory for the real AWS endpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory for an S3-compatible service at a fixed endpoint (MinIO,
    /// localstack). `allow_http` permits plain-HTTP endpoints.
    pub fn with_endpoint(endpoint: impl Into<String>, allow_http: bool) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            allow_http,
        }
    }
}

impl BackendFactory for S3BackendFactory {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn ObjectBackend>, ConnectionError> {
        let bucket = config.bucket_name().as_str().to_string();
        let region = config.region().to_string();

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.as_str())
            .with_bucket_name(bucket.as_str());
        if let Some(endpoint) = &self.endpoint {
            builder = builder
                .with_endpoint(endpoint.as_str())
                .with_allow_http(self.allow_http);
        }

        match config.credential_provider() {
            None => {}
            Some(p) if p.eq_ignore_ascii_case("env") || p.eq_ignore_ascii_case("environment") => {}
            Some(p) if p.eq_ignore_ascii_case("anonymous") => {
                builder = builder.with_skip_signature(true);
            }
            Some(p) => {
                return Err(ConnectionError::UnknownCredentialProvider(p.to_string()));
            }
        }

        let store = builder
            .build()
            .map_err(|e| ConnectionError::ClientConstruction(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ConnectionError::ClientConstruction(e.to_string()))?;

        let endpoint = self
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", region));

        Ok(Arc::new(S3Backend {
            store,
            http,
            endpoint,
            bucket,
            region,
        }))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct S3ErrorBody {
    code: Option<String>,
    message: Option<String>,
}

fn parse_error_body(body: &str) -> Option<S3ErrorBody> {
    if body.is_empty() {
        return None;
    }
    quick_xml::de::from_str(body).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(provider: Option<&str>) -> StoreConfig {
        let mut elements = HashMap::new();
        elements.insert("bucket.name".to_string(), "ev-bkt".to_string());
        elements.insert("object.fields".to_string(), "a,b".to_string());
        if let Some(p) = provider {
            elements.insert("credential.provider".to_string(), p.to_string());
        }
        StoreConfig::parse(&elements).unwrap()
    }

    #[test]
    fn parses_s3_error_xml() {
        let body = "<Error><Code>BucketAlreadyOwnedByYou</Code><Message>Your previous request succeeded</Message></Error>";
        let parsed = parse_error_body(body).unwrap();
        assert_eq!(parsed.code.as_deref(), Some("BucketAlreadyOwnedByYou"));
        assert_eq!(
            parsed.message.as_deref(),
            Some("Your previous request succeeded")
        );
        assert!(parse_error_body("").is_none());
    }

    #[test]
    fn unknown_credential_provider_fails_construction() {
        let factory = S3BackendFactory::with_endpoint("http://localhost:9000", true);
        let err = factory.create(&config(Some("vault"))).unwrap_err();
        assert!(matches!(
            err,
            ConnectionError::UnknownCredentialProvider(ref p) if p == "vault"
        ));
        assert!(!err.is_retry_eligible());
    }

    #[test]
    fn known_credential_providers_are_accepted() {
        let factory = S3BackendFactory::with_endpoint("http://localhost:9000", true);
        assert!(factory.create(&config(None)).is_ok());
        assert!(factory.create(&config(Some("env"))).is_ok());
        assert!(factory.create(&config(Some("anonymous"))).is_ok());
    }
}
