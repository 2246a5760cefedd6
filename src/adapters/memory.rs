//! In-memory backend for tests and embedded use.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;

use crate::config::StoreConfig;
use crate::domain::value_objects::ObjectKey;
use crate::ports::backend::{BackendFactory, BucketStatus, ConnectionError, ObjectBackend};

/// Backend over [`object_store::memory::InMemory`]. There is no bucket
/// concept; the configured bucket always "exists".
#[derive(Debug)]
pub struct InMemoryBackend {
    store: InMemory,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            store: InMemory::new(),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectBackend for InMemoryBackend {
    async fn ensure_bucket(&self) -> Result<BucketStatus, ConnectionError> {
        Ok(BucketStatus::AlreadyExists)
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

/// Hands out one shared [`InMemoryBackend`] instance, so stored objects
/// survive disconnect/connect cycles and tests can inspect written state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackendFactory {
    backend: Arc<InMemoryBackend>,
}

impl InMemoryBackendFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct handle to the shared backend.
    pub fn backend(&self) -> Arc<InMemoryBackend> {
        self.backend.clone()
    }
}

impl BackendFactory for InMemoryBackendFactory {
    fn create(&self, _config: &StoreConfig) -> Result<Arc<dyn ObjectBackend>, ConnectionError> {
        Ok(self.backend.clone())
    }
}
