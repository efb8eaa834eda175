//! BSON document encoder.

use bcon_buffers::{ByteSink, Writer};

use super::{
    SUBTYPE_GENERIC, TOKEN_BOOL, TOKEN_DATA, TOKEN_DATETIME, TOKEN_DOUBLE, TOKEN_END, TOKEN_INT32,
    TOKEN_INT64, TOKEN_LIST, TOKEN_MAP, TOKEN_NULL, TOKEN_STRING,
};
use crate::error::EncodeError;
use crate::value::Value;
use crate::MAX_DEPTH;

/// Encodes a [`Value`] tree as a BSON document.
///
/// The root must be a map or an array; BSON has no scalar top-level
/// encoding. Arrays become documents whose keys are the decimal string
/// form of the zero-based index. Each document is assembled in memory
/// because its byte length prefixes it on the wire.
pub struct BsonEncoder<W: ByteSink = Writer> {
    pub writer: W,
}

impl Default for BsonEncoder<Writer> {
    fn default() -> Self {
        Self::new()
    }
}

impl BsonEncoder<Writer> {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes a document to a fresh byte vector.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }
}

impl<W: ByteSink> BsonEncoder<W> {
    /// Wraps an external sink (a channel, a plain `Vec<u8>`).
    pub fn with_sink(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one document to the sink.
    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        let doc = self.encode_document(value, 0)?;
        self.writer.buf(&doc)?;
        Ok(())
    }

    fn encode_document(&self, value: &Value, depth: usize) -> Result<Vec<u8>, EncodeError> {
        if depth > MAX_DEPTH {
            return Err(EncodeError::DepthLimit);
        }
        let mut body: Vec<u8> = Vec::new();
        match value {
            Value::Map(map) => {
                for (key, val) in map {
                    self.write_element(&mut body, key, val, depth)?;
                }
            }
            Value::Array(items) => {
                for (i, val) in items.iter().enumerate() {
                    self.write_element(&mut body, &i.to_string(), val, depth)?;
                }
            }
            _ => return Err(EncodeError::InvalidDocumentRoot),
        }
        body.push(TOKEN_END);
        let size = document_size(body.len())?;
        let mut doc = Vec::with_capacity(4 + body.len());
        doc.extend_from_slice(&size.to_le_bytes());
        doc.extend_from_slice(&body);
        Ok(doc)
    }

    fn write_element(
        &self,
        buf: &mut Vec<u8>,
        key: &str,
        value: &Value,
        depth: usize,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Null => {
                buf.push(TOKEN_NULL);
                write_cstring(buf, key);
            }
            Value::Bool(b) => {
                buf.push(TOKEN_BOOL);
                write_cstring(buf, key);
                buf.push(if *b { 1 } else { 0 });
            }
            Value::Int32(i) => {
                buf.push(TOKEN_INT32);
                write_cstring(buf, key);
                buf.extend_from_slice(&i.to_le_bytes());
            }
            Value::UInt32(u) => {
                // Values past i32::MAX cannot ride the int32 element.
                if let Ok(i) = i32::try_from(*u) {
                    buf.push(TOKEN_INT32);
                    write_cstring(buf, key);
                    buf.extend_from_slice(&i.to_le_bytes());
                } else {
                    buf.push(TOKEN_INT64);
                    write_cstring(buf, key);
                    buf.extend_from_slice(&i64::from(*u).to_le_bytes());
                }
            }
            Value::Int64(i) => {
                buf.push(TOKEN_INT64);
                write_cstring(buf, key);
                buf.extend_from_slice(&i.to_le_bytes());
            }
            Value::UInt64(u) => {
                buf.push(TOKEN_INT64);
                write_cstring(buf, key);
                buf.extend_from_slice(&u.to_le_bytes());
            }
            Value::Double(f) => {
                // Raw IEEE-754 bit pattern, never a numeric conversion.
                buf.push(TOKEN_DOUBLE);
                write_cstring(buf, key);
                buf.extend_from_slice(&f.to_le_bytes());
            }
            Value::DateTime(ms) => {
                buf.push(TOKEN_DATETIME);
                write_cstring(buf, key);
                buf.extend_from_slice(&ms.to_le_bytes());
            }
            Value::Str(s) => {
                buf.push(TOKEN_STRING);
                write_cstring(buf, key);
                write_string(buf, s)?;
            }
            Value::Bytes(b) => {
                buf.push(TOKEN_DATA);
                write_cstring(buf, key);
                let len = i32::try_from(b.len()).map_err(|_| EncodeError::DocumentTooLarge {
                    len: b.len() as u64,
                })?;
                buf.extend_from_slice(&len.to_le_bytes());
                buf.push(SUBTYPE_GENERIC);
                buf.extend_from_slice(b);
            }
            Value::Map(_) => {
                buf.push(TOKEN_MAP);
                write_cstring(buf, key);
                let doc = self.encode_document(value, depth + 1)?;
                buf.extend_from_slice(&doc);
            }
            Value::Array(_) => {
                buf.push(TOKEN_LIST);
                write_cstring(buf, key);
                let doc = self.encode_document(value, depth + 1)?;
                buf.extend_from_slice(&doc);
            }
        }
        Ok(())
    }
}

/// Total document length: the body plus the 4-byte size field itself,
/// which must fit the signed 32-bit wire field.
fn document_size(body_len: usize) -> Result<i32, EncodeError> {
    let size = body_len as u64 + 4;
    i32::try_from(size).map_err(|_| EncodeError::DocumentTooLarge { len: size })
}

/// Writes a null-terminated C-string. Stops at any null byte in the input.
fn write_cstring(buf: &mut Vec<u8>, s: &str) {
    for byte in s.bytes() {
        if byte == 0 {
            break;
        }
        buf.push(byte);
    }
    buf.push(0); // null terminator
}

/// Writes a BSON string: little-endian i32 (byte_count+1) + UTF-8 bytes
/// + null byte.
fn write_string(buf: &mut Vec<u8>, s: &str) -> Result<(), EncodeError> {
    let bytes = s.as_bytes();
    let len = i32::try_from(bytes.len() + 1).map_err(|_| EncodeError::DocumentTooLarge {
        len: bytes.len() as u64 + 1,
    })?;
    buf.extend_from_slice(&len.to_le_bytes());
    buf.extend_from_slice(bytes);
    buf.push(0); // null terminator
    Ok(())
}
