//! Storage connector lifecycle.
//!
//! Owns the backend client exclusively. State transitions
//! (`Disconnected -> Connected -> Disconnected`, terminal `Destroyed`) are
//! driven by the host's single-threaded lifecycle calls; data-plane calls
//! only borrow the connected backend.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::domain::value_objects::ObjectKey;
use crate::ports::backend::{BackendFactory, BucketStatus, ConnectionError, ObjectBackend};

enum State {
    Disconnected,
    Connected(Arc<dyn ObjectBackend>),
    Destroyed,
}

/// Connection lifecycle around an [`ObjectBackend`].
pub struct StorageConnector {
    config: StoreConfig,
    factory: Arc<dyn BackendFactory>,
    state: State,
}

impl std::fmt::Debug for StorageConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Disconnected => "disconnected",
            State::Connected(_) => "connected",
            State::Destroyed => "destroyed",
        };
        f.debug_struct("StorageConnector")
            .field("bucket", &self.config.bucket_name().as_str())
            .field("state", &state)
            .finish()
    }
}

impl StorageConnector {
    pub fn new(config: StoreConfig, factory: Arc<dyn BackendFactory>) -> Self {
        Self {
            config,
            factory,
            state: State::Disconnected,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, State::Connected(_))
    }

    /// Build a fresh client and make sure the configured bucket exists.
    ///
    /// The client is rebuilt on every call, so reconnecting after a failure
    /// never reuses a broken client. Idempotent with respect to the bucket:
    /// an existing bucket is left untouched.
    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        if matches!(self.state, State::Destroyed) {
            return Err(ConnectionError::Destroyed);
        }

        let backend = self.factory.create(&self.config)?;
        match backend.ensure_bucket().await? {
            BucketStatus::Created => {
                info!(bucket = %self.config.bucket_name(), "bucket created");
            }
            BucketStatus::AlreadyExists => {
                debug!(bucket = %self.config.bucket_name(), "bucket already exists");
            }
        }

        self.state = State::Connected(backend);
        debug!(bucket = %self.config.bucket_name(), "connected");
        Ok(())
    }

    /// Release the client. Safe to call when already disconnected.
    pub fn disconnect(&mut self) {
        if matches!(self.state, State::Connected(_)) {
            self.state = State::Disconnected;
            debug!("disconnected");
        }
    }

    /// Release everything and refuse further use. Idempotent, terminal.
    pub fn destroy(&mut self) {
        self.state = State::Destroyed;
    }

    fn backend(&self) -> Result<&Arc<dyn ObjectBackend>, ConnectionError> {
        match &self.state {
            State::Connected(backend) => Ok(backend),
            State::Disconnected => Err(ConnectionError::NotConnected),
            State::Destroyed => Err(ConnectionError::Destroyed),
        }
    }

    pub async fn put(&self, key: &ObjectKey, payload: Bytes) -> Result<(), ConnectionError> {
        let backend = self.backend()?;
        debug!(key = %key, bytes = payload.len(), "writing object");
        backend.put(key, payload, self.config.content_type()).await
    }

    pub async fn get(&self, key: &ObjectKey) -> Result<Option<Bytes>, ConnectionError> {
        self.backend()?.get(key).await
    }

    pub async fn exists(&self, key: &ObjectKey) -> Result<bool, ConnectionError> {
        self.backend()?.exists(key).await
    }

    pub async fn delete(&self, key: &ObjectKey) -> Result<(), ConnectionError> {
        self.backend()?.delete(key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Backend that only counts bucket calls.
    #[derive(Debug, Default)]
    struct CountingBackend {
        bucket_exists: AtomicBool,
        creates: AtomicUsize,
    }

    #[async_trait]
    impl ObjectBackend for CountingBackend {
        async fn ensure_bucket(&self) -> Result<BucketStatus, ConnectionError> {
            if self.bucket_exists.swap(true, Ordering::SeqCst) {
                Ok(BucketStatus::AlreadyExists)
            } else {
                self.creates.fetch_add(1, Ordering::SeqCst);
                Ok(BucketStatus::Created)
            }
        }

        async fn put(
            &self,
            _key: &ObjectKey,
            _payload: Bytes,
            _content_type: &str,
        ) -> Result<(), ConnectionError> {
            Ok(())
        }

        async fn get(&self, _key: &ObjectKey) -> Result<Option<Bytes>, ConnectionError> {
            Ok(None)
        }

        async fn exists(&self, _key: &ObjectKey) -> Result<bool, ConnectionError> {
            Ok(false)
        }

        async fn delete(&self, _key: &ObjectKey) -> Result<(), ConnectionError> {
            Ok(())
        }
    }

    struct CountingFactory(Arc<CountingBackend>);

    impl BackendFactory for CountingFactory {
        fn create(
            &self,
            _config: &StoreConfig,
        ) -> Result<Arc<dyn ObjectBackend>, ConnectionError> {
            Ok(self.0.clone())
        }
    }

    fn config() -> StoreConfig {
        let mut elements = HashMap::new();
        elements.insert("bucket.name".to_string(), "ev-bkt".to_string());
        elements.insert("object.fields".to_string(), "a,b".to_string());
        StoreConfig::parse(&elements).unwrap()
    }

    fn connector(backend: Arc<CountingBackend>) -> StorageConnector {
        StorageConnector::new(config(), Arc::new(CountingFactory(backend)))
    }

    #[tokio::test]
    async fn existing_bucket_is_never_recreated() {
        let backend = Arc::new(CountingBackend::default());
        backend.bucket_exists.store(true, Ordering::SeqCst);
        let mut connector = connector(backend.clone());

        connector.connect().await.unwrap();
        connector.connect().await.unwrap();

        assert_eq!(backend.creates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_bucket_is_created_once() {
        let backend = Arc::new(CountingBackend::default());
        let mut connector = connector(backend.clone());

        connector.connect().await.unwrap();
        connector.connect().await.unwrap();

        assert_eq!(backend.creates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn put_while_disconnected_is_not_retry_eligible() {
        let connector = connector(Arc::new(CountingBackend::default()));
        let key = ObjectKey::new("k1").unwrap();

        let err = connector.put(&key, Bytes::new()).await.unwrap_err();
        assert!(matches!(err, ConnectionError::NotConnected));
        assert!(!err.is_retry_eligible());
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let mut connector = connector(Arc::new(CountingBackend::default()));
        connector.connect().await.unwrap();
        assert!(connector.is_connected());

        connector.disconnect();
        connector.disconnect();
        assert!(!connector.is_connected());
    }

    #[tokio::test]
    async fn debug_output_tracks_lifecycle_state() {
        let mut connector = connector(Arc::new(CountingBackend::default()));
        assert!(format!("{connector:?}").contains("state: \"disconnected\""));

        connector.connect().await.unwrap();
        assert!(format!("{connector:?}").contains("state: \"connected\""));

        connector.destroy();
        assert!(format!("{connector:?}").contains("state: \"destroyed\""));
    }

    #[tokio::test]
    async fn destroy_is_terminal() {
        let mut connector = connector(Arc::new(CountingBackend::default()));
        connector.destroy();
        connector.destroy();

        let err = connector.connect().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Destroyed));
        assert!(!err.is_retry_eligible());

        let key = ObjectKey::new("k1").unwrap();
        let err = connector.get(&key).await.unwrap_err();
        assert!(matches!(err, ConnectionError::Destroyed));
    }
}
