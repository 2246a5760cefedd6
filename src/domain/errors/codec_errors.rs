/// Errors raised while decoding a stored object payload.
#[derive(Debug, Clone)]
pub enum CodecError {
    /// The payload does not start with the expected magic bytes.
    BadMagic { found: [u8; 2] },

    /// The payload was written with a format version this build cannot read.
    UnsupportedVersion { found: u8 },

    /// A field carries a type tag outside the known range.
    UnknownTag { tag: u8 },

    /// The payload ended before a declared length could be read.
    Truncated { needed: usize, remaining: usize },

    /// A field name or string value is not valid UTF-8.
    InvalidUtf8,

    /// More fields than the u16 count prefix can carry.
    TooManyFields { count: usize, max: usize },

    /// A field name or value longer than its length prefix can carry.
    ValueTooLarge {
        field: String,
        len: usize,
        max: usize,
    },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::BadMagic { found } => {
                write!(f, "Payload magic mismatch: found {:?}", found)
            }
            CodecError::UnsupportedVersion { found } => {
                write!(f, "Unsupported payload format version: {}", found)
            }
            CodecError::UnknownTag { tag } => {
                write!(f, "Unknown attribute type tag: {}", tag)
            }
            CodecError::Truncated { needed, remaining } => {
                write!(
                    f,
                    "Truncated payload: needed {} bytes, {} remaining",
                    needed, remaining
                )
            }
            CodecError::InvalidUtf8 => write!(f, "Payload contains invalid UTF-8"),
            CodecError::TooManyFields { count, max } => {
                write!(f, "Payload has {} fields, at most {} fit", count, max)
            }
            CodecError::ValueTooLarge { field, len, max } => {
                write!(
                    f,
                    "Field '{}' is {} bytes, at most {} fit",
                    field, len, max
                )
            }
        }
    }
}

impl std::error::Error for CodecError {}
