//! The record-table adapter.
//!
//! Composition root wiring configuration parsing, projection, the payload
//! codec and the storage connector. One object per record: the primary-key
//! value is the object key, the configured payload attributes are the
//! object body.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::warn;

use crate::codec::{self, Payload};
use crate::config::StoreConfig;
use crate::connector::StorageConnector;
use crate::domain::errors::{CodecError, ConfigurationError, QueryError, SchemaError};
use crate::domain::models::{AttributeValue, Record, RecordIterator, TableSchema};
use crate::domain::value_objects::ObjectKey;
use crate::ports::backend::{BackendFactory, ConnectionError};
use crate::projection::ProjectionPlan;
use crate::query::{CompiledCondition, CompiledSetAttribute, ConditionExpr, SetExpr};

/// Any failure the adapter can surface to the host.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A table whose rows live as objects in a bucket.
#[derive(Debug)]
pub struct RecordTableAdapter {
    schema: TableSchema,
    plan: ProjectionPlan,
    connector: StorageConnector,
}

impl RecordTableAdapter {
    /// Validate the configuration and resolve the projection plan.
    ///
    /// Fails fast on configuration or schema problems; no network activity
    /// happens until [`connect`](Self::connect).
    pub fn initialize(
        schema: TableSchema,
        primary_key: &[String],
        elements: &HashMap<String, String>,
        factory: Arc<dyn BackendFactory>,
    ) -> Result<Self, TableError> {
        let config = StoreConfig::parse(elements)?;

        let key_name = match primary_key {
            [] => return Err(ConfigurationError::MissingPrimaryKey.into()),
            [single] => single,
            more => {
                return Err(ConfigurationError::CompositePrimaryKey { count: more.len() }.into())
            }
        };

        let plan = ProjectionPlan::build(&schema, key_name, config.object_fields())?;
        let connector = StorageConnector::new(config, factory);

        Ok(Self {
            schema,
            plan,
            connector,
        })
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn config(&self) -> &StoreConfig {
        self.connector.config()
    }

    pub async fn connect(&mut self) -> Result<(), ConnectionError> {
        self.connector.connect().await
    }

    pub fn disconnect(&mut self) {
        self.connector.disconnect();
    }

    pub fn destroy(&mut self) {
        self.connector.destroy();
    }

    /// Write one object per record.
    ///
    /// A record whose primary-key value is null, not a string, or unusable
    /// as an object key is skipped with a warning; the rest of the batch
    /// proceeds. Repeated keys overwrite silently: last write wins.
    pub async fn add_records(&self, records: &[Record]) -> Result<(), TableError> {
        for record in records {
            let Some(key) = self.object_key_for(record) else {
                continue;
            };
            let payload = self.project_payload(record);
            self.connector.put(&key, codec::encode(&payload)?).await?;
        }
        Ok(())
    }

    /// Compile a host condition into a primary-key lookup.
    pub fn compile_condition(&self, expr: &ConditionExpr) -> Result<CompiledCondition, QueryError> {
        CompiledCondition::compile(expr, self.primary_key_name())
    }

    /// Compile an assignment targeting one payload attribute.
    pub fn compile_set_attribute(&self, expr: &SetExpr) -> Result<CompiledSetAttribute, QueryError> {
        CompiledSetAttribute::compile(expr, &self.schema, &self.plan)
    }

    /// Look up the records matching the condition.
    ///
    /// At most one record can match a key lookup; a missing object yields an
    /// empty iterator. The returned sequence is finite and restartable.
    pub async fn find_records(
        &self,
        params: &HashMap<String, AttributeValue>,
        condition: &CompiledCondition,
    ) -> Result<RecordIterator, TableError> {
        let key_value = condition.resolve_key(params)?;
        let Ok(key) = ObjectKey::new(key_value.clone()) else {
            return Ok(RecordIterator::empty());
        };

        let Some(bytes) = self.connector.get(&key).await? else {
            return Ok(RecordIterator::empty());
        };
        let payload = codec::decode(&bytes)?;

        Ok(RecordIterator::new(vec![
            self.reassemble(key_value, &payload)
        ]))
    }

    /// Whether a record matching the condition exists.
    pub async fn contains_record(
        &self,
        params: &HashMap<String, AttributeValue>,
        condition: &CompiledCondition,
    ) -> Result<bool, TableError> {
        let key_value = condition.resolve_key(params)?;
        let Ok(key) = ObjectKey::new(key_value) else {
            return Ok(false);
        };
        Ok(self.connector.exists(&key).await?)
    }

    /// Delete the object matched by the condition, once per parameter map.
    /// Missing keys are no-ops.
    pub async fn delete_records(
        &self,
        param_maps: &[HashMap<String, AttributeValue>],
        condition: &CompiledCondition,
    ) -> Result<(), TableError> {
        for params in param_maps {
            let key_value = condition.resolve_key(params)?;
            let Ok(key) = ObjectKey::new(key_value) else {
                continue;
            };
            self.connector.delete(&key).await?;
        }
        Ok(())
    }

    /// Read-modify-write the matched objects. A key with no stored object
    /// is skipped with a warning.
    pub async fn update_records(
        &self,
        condition: &CompiledCondition,
        param_maps: &[HashMap<String, AttributeValue>],
        set_attributes: &[CompiledSetAttribute],
    ) -> Result<(), TableError> {
        for params in param_maps {
            let key_value = condition.resolve_key(params)?;
            let Ok(key) = ObjectKey::new(key_value) else {
                continue;
            };

            let Some(bytes) = self.connector.get(&key).await? else {
                warn!(key = %key, "no stored object for key, update skipped");
                continue;
            };
            let mut payload = codec::decode(&bytes)?;
            apply_set_attributes(&mut payload, set_attributes, params)?;
            self.connector.put(&key, codec::encode(&payload)?).await?;
        }
        Ok(())
    }

    /// Like [`update_records`](Self::update_records), but a missing object
    /// is created from the set attributes, with the remaining payload
    /// attributes null.
    pub async fn update_or_add_records(
        &self,
        condition: &CompiledCondition,
        param_maps: &[HashMap<String, AttributeValue>],
        set_attributes: &[CompiledSetAttribute],
    ) -> Result<(), TableError> {
        for params in param_maps {
            let key_value = condition.resolve_key(params)?;
            let Ok(key) = ObjectKey::new(key_value) else {
                continue;
            };

            let mut payload = match self.connector.get(&key).await? {
                Some(bytes) => codec::decode(&bytes)?,
                None => self.empty_payload(),
            };
            apply_set_attributes(&mut payload, set_attributes, params)?;
            self.connector.put(&key, codec::encode(&payload)?).await?;
        }
        Ok(())
    }

    fn primary_key_name(&self) -> &str {
        self.schema.attributes()[self.plan.primary_key_index()].name()
    }

    /// Extract the object key, or decide to skip the record.
    fn object_key_for(&self, record: &Record) -> Option<ObjectKey> {
        let attribute = self.primary_key_name();
        match record.get(self.plan.primary_key_index()) {
            Some(AttributeValue::String(value)) => match ObjectKey::new(value.clone()) {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!(
                        attribute,
                        error = %e,
                        "primary key value unusable as object key, record skipped"
                    );
                    None
                }
            },
            Some(AttributeValue::Null) => {
                warn!(attribute, "null primary key value, record skipped");
                None
            }
            Some(_) => {
                warn!(attribute, "non-string primary key value, record skipped");
                None
            }
            None => {
                warn!(attribute, "record shorter than schema, record skipped");
                None
            }
        }
    }

    /// Payload attributes in plan (schema) order; absent positions are null.
    fn project_payload(&self, record: &Record) -> Payload {
        self.plan
            .payload_indices()
            .iter()
            .map(|&i| {
                let name = self.schema.attributes()[i].name().to_string();
                let value = record.get(i).cloned().unwrap_or(AttributeValue::Null);
                (name, value)
            })
            .collect()
    }

    fn empty_payload(&self) -> Payload {
        self.plan
            .payload_indices()
            .iter()
            .map(|&i| {
                (
                    self.schema.attributes()[i].name().to_string(),
                    AttributeValue::Null,
                )
            })
            .collect()
    }

    /// Rebuild a full positional record from a key and a decoded payload.
    /// Attributes outside the payload come back null.
    fn reassemble(&self, key_value: String, payload: &Payload) -> Record {
        let values = self
            .schema
            .attributes()
            .iter()
            .enumerate()
            .map(|(i, attr)| {
                if i == self.plan.primary_key_index() {
                    AttributeValue::String(key_value.clone())
                } else {
                    payload
                        .iter()
                        .find(|(name, _)| name == attr.name())
                        .map(|(_, value)| value.clone())
                        .unwrap_or(AttributeValue::Null)
                }
            })
            .collect();
        Record::new(values)
    }
}

fn apply_set_attributes(
    payload: &mut Payload,
    set_attributes: &[CompiledSetAttribute],
    params: &HashMap<String, AttributeValue>,
) -> Result<(), QueryError> {
    for set in set_attributes {
        let value = set.resolve(params)?;
        match payload.iter_mut().find(|(name, _)| name == set.attribute()) {
            Some(entry) => entry.1 = value,
            // Objects written before a schema grew a field lack the entry.
            None => payload.push((set.attribute().to_string(), value)),
        }
    }
    Ok(())
}
