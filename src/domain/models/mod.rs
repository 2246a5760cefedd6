pub mod record;
pub mod schema;

pub use record::{AttributeValue, Record, RecordIterator};
pub use schema::{Attribute, AttributeType, TableSchema};
