use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::domain::value_objects::ObjectKey;

/// Outcome of an idempotent bucket check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    AlreadyExists,
    Created,
}

/// Errors raised by the storage connector and its backends.
///
/// Network, auth and bucket failures are retry-eligible: the host is
/// expected to re-invoke `connect` and retry the pending operation.
/// Lifecycle misuse (`NotConnected`, `Destroyed`) is a programming error and
/// must not be retried.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to construct storage client: {0}")]
    ClientConstruction(String),

    #[error("Failed to ensure bucket '{bucket}': {message}")]
    Bucket { bucket: String, message: String },

    #[error("Storage request failed: {0}")]
    Storage(#[from] object_store::Error),

    #[error("Storage endpoint unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unknown credential provider '{0}'")]
    UnknownCredentialProvider(String),

    #[error("Connector is not connected")]
    NotConnected,

    #[error("Connector has been destroyed")]
    Destroyed,
}

impl ConnectionError {
    /// Whether the host may re-connect and retry the failed operation.
    pub fn is_retry_eligible(&self) -> bool {
        !matches!(
            self,
            ConnectionError::NotConnected
                | ConnectionError::Destroyed
                | ConnectionError::UnknownCredentialProvider(_)
        )
    }
}

/// Port to a key-addressed object storage service.
///
/// One object per record: the body is the encoded payload, the content type
/// is carried as object metadata. `get` distinguishes a missing object from
/// a failed request by returning `None`.
#[async_trait]
pub trait ObjectBackend: std::fmt::Debug + Send + Sync {
    /// Create the configured bucket if it does not exist yet.
    async fn ensure_bucket(&self) -> Result<BucketStatus, ConnectionError>;

    async fn put(
        &self,
        key: &ObjectKey,
        payload: Bytes,
        content_type: &str,
    ) -> Result<(), ConnectionError>;

    async fn get(&self, key: &ObjectKey) -> Result<Option<Bytes>, ConnectionError>;

    async fn exists(&self, key: &ObjectKey) -> Result<bool, ConnectionError>;

    /// Delete the object; deleting a missing key is a no-op.
    async fn delete(&self, key: &ObjectKey) -> Result<(), ConnectionError>;
}

/// Builds a backend for a validated store configuration.
///
/// Injected into the connector so the storage client is an explicit
/// dependency rather than ambient process state; the connector calls this
/// on every `connect`.
pub trait BackendFactory: Send + Sync {
    fn create(&self, config: &StoreConfig) -> Result<Arc<dyn ObjectBackend>, ConnectionError>;
}
