//! Object payload wire format.
//!
//! Payloads are written as a self-describing binary frame so that every
//! supported attribute type, including `Null` and opaque `Object` bytes,
//! round-trips exactly:
//!
//! ```text
//! header: magic "OT" (2 bytes) | version u8 | field count u16 BE
//! field:  name length u16 BE | name UTF-8 bytes | type tag u8 | value
//! value:  String/Object -> length u32 BE + raw bytes
//!         Int -> i32 BE          Long -> i64 BE
//!         Double -> f64 bits BE  Float -> f32 bits BE
//!         Bool -> u8 0|1         Null -> nothing
//! ```
//!
//! Fields are written in the order supplied by the caller (the projection
//! plan's schema order), so a fixed input mapping always produces identical
//! bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::domain::errors::CodecError;
use crate::domain::models::AttributeValue;

pub const MAGIC: [u8; 2] = *b"OT";
pub const VERSION: u8 = 1;

const TAG_NULL: u8 = 0;
const TAG_STRING: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_LONG: u8 = 3;
const TAG_BOOL: u8 = 4;
const TAG_DOUBLE: u8 = 5;
const TAG_FLOAT: u8 = 6;
const TAG_OBJECT: u8 = 7;

/// An ordered attribute-name -> value mapping, as stored in an object body.
pub type Payload = Vec<(String, AttributeValue)>;

/// Serialize a payload into its object-body representation.
///
/// The length prefixes bound what a frame can carry: at most `u16::MAX`
/// fields, field names up to `u16::MAX` bytes, string and object values up
/// to `u32::MAX` bytes. Oversized input is rejected rather than truncated.
pub fn encode(fields: &[(String, AttributeValue)]) -> Result<Bytes, CodecError> {
    if fields.len() > u16::MAX as usize {
        return Err(CodecError::TooManyFields {
            count: fields.len(),
            max: u16::MAX as usize,
        });
    }

    let mut buf = BytesMut::with_capacity(8 + fields.len() * 16);
    buf.put_slice(&MAGIC);
    buf.put_u8(VERSION);
    buf.put_u16(fields.len() as u16);

    for (name, value) in fields {
        check_len(name, name.len(), u16::MAX as usize)?;
        buf.put_u16(name.len() as u16);
        buf.put_slice(name.as_bytes());
        match value {
            AttributeValue::Null => buf.put_u8(TAG_NULL),
            AttributeValue::String(s) => {
                check_len(name, s.len(), u32::MAX as usize)?;
                buf.put_u8(TAG_STRING);
                buf.put_u32(s.len() as u32);
                buf.put_slice(s.as_bytes());
            }
            AttributeValue::Int(v) => {
                buf.put_u8(TAG_INT);
                buf.put_i32(*v);
            }
            AttributeValue::Long(v) => {
                buf.put_u8(TAG_LONG);
                buf.put_i64(*v);
            }
            AttributeValue::Bool(v) => {
                buf.put_u8(TAG_BOOL);
                buf.put_u8(u8::from(*v));
            }
            AttributeValue::Double(v) => {
                buf.put_u8(TAG_DOUBLE);
                buf.put_u64(v.to_bits());
            }
            AttributeValue::Float(v) => {
                buf.put_u8(TAG_FLOAT);
                buf.put_u32(v.to_bits());
            }
            AttributeValue::Object(bytes) => {
                check_len(name, bytes.len(), u32::MAX as usize)?;
                buf.put_u8(TAG_OBJECT);
                buf.put_u32(bytes.len() as u32);
                buf.put_slice(bytes);
            }
        }
    }

    Ok(buf.freeze())
}

fn check_len(field: &str, len: usize, max: usize) -> Result<(), CodecError> {
    if len > max {
        return Err(CodecError::ValueTooLarge {
            field: field.to_string(),
            len,
            max,
        });
    }
    Ok(())
}

/// Deserialize an object body back into its payload, preserving stored
/// field order.
pub fn decode(mut buf: &[u8]) -> Result<Payload, CodecError> {
    // Magic + version + field count.
    ensure(&buf, 5)?;
    let magic = [buf.get_u8(), buf.get_u8()];
    if magic != MAGIC {
        return Err(CodecError::BadMagic { found: magic });
    }
    let version = buf.get_u8();
    if version != VERSION {
        return Err(CodecError::UnsupportedVersion { found: version });
    }

    let count = buf.get_u16() as usize;
    let mut fields = Vec::with_capacity(count);
    for _ in 0..count {
        ensure(&buf, 2)?;
        let name_len = buf.get_u16() as usize;
        let name = take_string(&mut buf, name_len)?;

        ensure(&buf, 1)?;
        let value = match buf.get_u8() {
            TAG_NULL => AttributeValue::Null,
            TAG_STRING => {
                let len = take_u32(&mut buf)? as usize;
                AttributeValue::String(take_string(&mut buf, len)?)
            }
            TAG_INT => {
                ensure(&buf, 4)?;
                AttributeValue::Int(buf.get_i32())
            }
            TAG_LONG => {
                ensure(&buf, 8)?;
                AttributeValue::Long(buf.get_i64())
            }
            TAG_BOOL => {
                ensure(&buf, 1)?;
                AttributeValue::Bool(buf.get_u8() != 0)
            }
            TAG_DOUBLE => {
                ensure(&buf, 8)?;
                AttributeValue::Double(f64::from_bits(buf.get_u64()))
            }
            TAG_FLOAT => {
                ensure(&buf, 4)?;
                AttributeValue::Float(f32::from_bits(buf.get_u32()))
            }
            TAG_OBJECT => {
                let len = take_u32(&mut buf)? as usize;
                ensure(&buf, len)?;
                AttributeValue::Object(buf.copy_to_bytes(len).to_vec())
            }
            tag => return Err(CodecError::UnknownTag { tag }),
        };

        fields.push((name, value));
    }

    Ok(fields)
}

fn ensure(buf: &&[u8], needed: usize) -> Result<(), CodecError> {
    if buf.remaining() < needed {
        return Err(CodecError::Truncated {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

fn take_u32(buf: &mut &[u8]) -> Result<u32, CodecError> {
    ensure(buf, 4)?;
    Ok(buf.get_u32())
}

fn take_string(buf: &mut &[u8], len: usize) -> Result<String, CodecError> {
    ensure(buf, len)?;
    let bytes = buf.copy_to_bytes(len);
    String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
}
