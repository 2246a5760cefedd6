//! Storage backends implementing the [`ObjectBackend`] port.

pub mod memory;
pub mod s3;

pub use memory::{InMemoryBackend, InMemoryBackendFactory};
pub use s3::{S3Backend, S3BackendFactory};

use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute as StoreAttribute, Attributes, ObjectStore as ApacheObjectStore, PutOptions,
    PutPayload,
};

use crate::domain::value_objects::ObjectKey;
use crate::ports::backend::ConnectionError;

fn object_path(key: &ObjectKey) -> ObjectPath {
    ObjectPath::from(key.as_str())
}

fn put_options(content_type: &str) -> PutOptions {
    let mut attributes = Attributes::new();
    attributes.insert(StoreAttribute::ContentType, content_type.to_string().into());
    PutOptions {
        attributes,
        ..Default::default()
    }
}

/// Write one object, carrying the content type as object metadata.
pub(crate) async fn put_object(
    store: &dyn ApacheObjectStore,
    key: &ObjectKey,
    payload: Bytes,
    content_type: &str,
) -> Result<(), ConnectionError> {
    store
        .put_opts(
            &object_path(key),
            PutPayload::from(payload),
            put_options(content_type),
        )
        .await?;
    Ok(())
}

/// Read one object; a missing key is `None`, not an error.
pub(crate) async fn get_object(
    store: &dyn ApacheObjectStore,
    key: &ObjectKey,
) -> Result<Option<Bytes>, ConnectionError> {
    match store.get(&object_path(key)).await {
        Ok(result) => Ok(Some(result.bytes().await?)),
        Err(object_store::Error::NotFound { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn object_exists(
    store: &dyn ApacheObjectStore,
    key: &ObjectKey,
) -> Result<bool, ConnectionError> {
    match store.head(&object_path(key)).await {
        Ok(_) => Ok(true),
        Err(object_store::Error::NotFound { .. }) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn delete_object(
    store: &dyn ApacheObjectStore,
    key: &ObjectKey,
) -> Result<(), ConnectionError> {
    match store.delete(&object_path(key)).await {
        Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
        Err(e) => Err(e.into()),
    }
}
