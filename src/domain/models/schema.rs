/// The declared type of a table attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    Int,
    Long,
    Bool,
    Double,
    Float,
    Object,
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AttributeType::String => "STRING",
            AttributeType::Int => "INT",
            AttributeType::Long => "LONG",
            AttributeType::Bool => "BOOL",
            AttributeType::Double => "DOUBLE",
            AttributeType::Float => "FLOAT",
            AttributeType::Object => "OBJECT",
        };
        write!(f, "{}", name)
    }
}

/// A single named, typed column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    attribute_type: AttributeType,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }
}

/// An ordered, immutable sequence of attributes defining a table.
///
/// Records are positional: the value at index `i` of a record belongs to the
/// attribute at index `i` of the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    attributes: Vec<Attribute>,
}

impl TableSchema {
    pub fn new(attributes: Vec<Attribute>) -> Self {
        Self { attributes }
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Locate an attribute by name, ignoring ASCII case.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lookup_is_case_insensitive() {
        let schema = TableSchema::new(vec![
            Attribute::new("Id", AttributeType::String),
            Attribute::new("count", AttributeType::Int),
        ]);

        assert_eq!(schema.index_of("id"), Some(0));
        assert_eq!(schema.index_of("ID"), Some(0));
        assert_eq!(schema.index_of("COUNT"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
    }
}
