pub mod backend;

// Re-export all port traits for convenience
pub use backend::{BackendFactory, BucketStatus, ConnectionError, ObjectBackend};
