use super::schema::AttributeType;

/// A runtime attribute value carried by a record.
///
/// `Object` values are opaque byte payloads; the adapter never interprets
/// them. `Null` stands in for an absent value of any declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Null,
    String(String),
    Int(i32),
    Long(i64),
    Bool(bool),
    Double(f64),
    Float(f32),
    Object(Vec<u8>),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// The declared type this value corresponds to, if it is not `Null`.
    pub fn attribute_type(&self) -> Option<AttributeType> {
        match self {
            AttributeValue::Null => None,
            AttributeValue::String(_) => Some(AttributeType::String),
            AttributeValue::Int(_) => Some(AttributeType::Int),
            AttributeValue::Long(_) => Some(AttributeType::Long),
            AttributeValue::Bool(_) => Some(AttributeType::Bool),
            AttributeValue::Double(_) => Some(AttributeType::Double),
            AttributeValue::Float(_) => Some(AttributeType::Float),
            AttributeValue::Object(_) => Some(AttributeType::Object),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Long(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<f32> for AttributeValue {
    fn from(value: f32) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<Vec<u8>> for AttributeValue {
    fn from(value: Vec<u8>) -> Self {
        AttributeValue::Object(value)
    }
}

/// A fixed-length tuple of attribute values, positionally aligned with the
/// table schema. Records are transient; the adapter never retains them.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    values: Vec<AttributeValue>,
}

impl Record {
    pub fn new(values: Vec<AttributeValue>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<Vec<AttributeValue>> for Record {
    fn from(values: Vec<AttributeValue>) -> Self {
        Self::new(values)
    }
}

/// A finite, restartable sequence of records returned by a lookup.
///
/// Iteration clones records out of the buffered result; `reset` rewinds the
/// cursor so the sequence can be replayed.
#[derive(Debug, Clone, Default)]
pub struct RecordIterator {
    records: Vec<Record>,
    cursor: usize,
}

impl RecordIterator {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records, cursor: 0 }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Rewind to the first record.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Total number of records, independent of the cursor position.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Iterator for RecordIterator {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let record = self.records.get(self.cursor).cloned();
        if record.is_some() {
            self.cursor += 1;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iterator_is_restartable() {
        let record = Record::new(vec![AttributeValue::from("k1"), AttributeValue::from(1)]);
        let mut iter = RecordIterator::new(vec![record.clone()]);

        assert_eq!(iter.next(), Some(record.clone()));
        assert_eq!(iter.next(), None);

        iter.reset();
        assert_eq!(iter.next(), Some(record));
    }

    #[test]
    fn empty_iterator_yields_nothing() {
        let mut iter = RecordIterator::empty();
        assert!(iter.is_empty());
        assert_eq!(iter.next(), None);
    }
}
