//! Record-table adapter over S3-compatible object storage.
//!
//! A streaming query engine defines a table with a single STRING primary
//! key and a set of object fields; this crate persists each record as one
//! object whose key is the primary-key value and whose body is the encoded
//! payload projection. Lookups, deletes and updates address records through
//! primary-key equality conditions compiled ahead of execution.

pub mod adapters;
pub mod codec;
pub mod config;
pub mod connector;
pub mod domain;
pub mod ports;
pub mod projection;
pub mod query;
pub mod table;

// Re-export key types for convenience

// Domain types - schema, records and value objects
pub use domain::{
    Attribute,
    AttributeType,
    AttributeValue,
    BucketName,
    // Errors
    CodecError,
    ConfigurationError,
    ObjectKey,
    QueryError,
    Record,
    RecordIterator,
    SchemaError,
    TableSchema,
};

// Configuration surface
pub use config::{keys, StoreConfig, DEFAULT_CONTENT_TYPE, DEFAULT_REGION};

// Projection and codec
pub use codec::Payload;
pub use projection::ProjectionPlan;

// Query surface
pub use query::{
    CompareOp, CompiledCondition, CompiledSetAttribute, ConditionExpr, KeySource, Operand,
    SetExpr, ValueSource,
};

// Storage ports and lifecycle
pub use connector::StorageConnector;
pub use ports::{BackendFactory, BucketStatus, ConnectionError, ObjectBackend};

// Backend implementations
pub use adapters::{InMemoryBackend, InMemoryBackendFactory, S3Backend, S3BackendFactory};

// Composition root
pub use table::{RecordTableAdapter, TableError};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        Attribute, AttributeType, AttributeValue, BackendFactory, CompiledCondition,
        ConditionExpr, InMemoryBackendFactory, ObjectBackend, Operand, Record, RecordIterator,
        RecordTableAdapter, S3BackendFactory, SetExpr, StoreConfig, TableError, TableSchema,
    };
}
