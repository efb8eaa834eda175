//! BCON value encoder.

use bcon_buffers::{ByteSink, Writer};

use super::{
    LENGTH2P12, LENGTH2P20, LENGTH2P36, LENGTH2P6, TOKEN_BYTE, TOKEN_DATA12, TOKEN_DATA20,
    TOKEN_DATA36, TOKEN_DATA6, TOKEN_DATETIME, TOKEN_DOUBLE, TOKEN_END, TOKEN_FALSE, TOKEN_INT16,
    TOKEN_INT32, TOKEN_INT64, TOKEN_LIST, TOKEN_MAP, TOKEN_NULL, TOKEN_STRING12, TOKEN_STRING20,
    TOKEN_STRING36, TOKEN_STRING6, TOKEN_TRUE, TOKEN_UINT16, TOKEN_UINT32, TOKEN_UINT64,
};
use crate::error::EncodeError;
use crate::value::Value;
use crate::MAX_DEPTH;

/// Tag family for one variable-length payload kind, ordered by class
/// width (6/12/20/36 bits).
struct TagFamily {
    class6: u8,
    class12: u8,
    class20: u8,
    class36: u8,
}

const STRING_TAGS: TagFamily = TagFamily {
    class6: TOKEN_STRING6,
    class12: TOKEN_STRING12,
    class20: TOKEN_STRING20,
    class36: TOKEN_STRING36,
};

const DATA_TAGS: TagFamily = TagFamily {
    class6: TOKEN_DATA6,
    class12: TOKEN_DATA12,
    class20: TOKEN_DATA20,
    class36: TOKEN_DATA36,
};

/// Encodes a [`Value`] tree to BCON bytes.
///
/// A single recursive pass over the tree; output is deterministic (map
/// entries go out in ascending key order). Signed and unsigned integers
/// narrow to the smallest fixed width that holds the value exactly.
pub struct BconEncoder<W: ByteSink = Writer> {
    pub writer: W,
}

impl Default for BconEncoder<Writer> {
    fn default() -> Self {
        Self::new()
    }
}

impl BconEncoder<Writer> {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(),
        }
    }

    /// Encodes a value to a fresh byte vector.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }
}

impl<W: ByteSink> BconEncoder<W> {
    /// Wraps an external sink (a channel, a plain `Vec<u8>`).
    pub fn with_sink(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one value to the sink.
    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        self.write_value(value, 0)
    }

    fn write_value(&mut self, value: &Value, depth: usize) -> Result<(), EncodeError> {
        if depth > MAX_DEPTH {
            return Err(EncodeError::DepthLimit);
        }
        match value {
            Value::Null => self.writer.u8(TOKEN_NULL)?,
            Value::Bool(b) => self.writer.u8(if *b { TOKEN_TRUE } else { TOKEN_FALSE })?,
            Value::Int32(num) => {
                // Smallest sign-appropriate width that round-trips.
                if let Ok(byte) = i8::try_from(*num) {
                    self.writer.u8(TOKEN_BYTE)?;
                    self.writer.i8(byte)?;
                } else if let Ok(short) = i16::try_from(*num) {
                    self.writer.u8(TOKEN_INT16)?;
                    self.writer.i16_le(short)?;
                } else {
                    self.writer.u8(TOKEN_INT32)?;
                    self.writer.i32_le(*num)?;
                }
            }
            Value::UInt32(num) => {
                if let Ok(short) = u16::try_from(*num) {
                    self.writer.u8(TOKEN_UINT16)?;
                    self.writer.u16_le(short)?;
                } else {
                    self.writer.u8(TOKEN_UINT32)?;
                    self.writer.u32_le(*num)?;
                }
            }
            Value::Int64(num) => {
                self.writer.u8(TOKEN_INT64)?;
                self.writer.i64_le(*num)?;
            }
            Value::UInt64(num) => {
                self.writer.u8(TOKEN_UINT64)?;
                self.writer.u64_le(*num)?;
            }
            Value::Double(num) => {
                self.writer.u8(TOKEN_DOUBLE)?;
                self.writer.f64_le(*num)?;
            }
            Value::DateTime(ms) => {
                self.writer.u8(TOKEN_DATETIME)?;
                self.writer.i64_le(*ms)?;
            }
            Value::Str(s) => self.write_chunk(&STRING_TAGS, s.as_bytes())?,
            Value::Bytes(b) => self.write_chunk(&DATA_TAGS, b)?,
            Value::Array(items) => {
                self.writer.u8(TOKEN_LIST)?;
                for item in items {
                    self.write_value(item, depth + 1)?;
                }
                self.writer.u8(TOKEN_END)?;
            }
            Value::Map(map) => {
                self.writer.u8(TOKEN_MAP)?;
                // Value first, then the key suffix: one element is fully
                // written before the next is known to exist.
                for (key, val) in map {
                    self.write_value(val, depth + 1)?;
                    self.write_key(key)?;
                }
                self.writer.u8(TOKEN_END)?;
            }
        }
        Ok(())
    }

    /// Key bytes followed by a NUL terminator. Stops at any NUL in the
    /// key itself, as the terminator would otherwise be ambiguous.
    fn write_key(&mut self, key: &str) -> Result<(), EncodeError> {
        let bytes = key.as_bytes();
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.writer.buf(&bytes[..end])?;
        self.writer.u8(0)?;
        Ok(())
    }

    fn write_chunk(&mut self, tags: &TagFamily, data: &[u8]) -> Result<(), EncodeError> {
        self.write_length_header(tags, data.len() as u64)?;
        self.writer.buf(data)?;
        Ok(())
    }

    /// Writes the smallest length-class header that represents `len`
    /// exactly; class boundaries at 2^6, 2^12, 2^20 and 2^36.
    fn write_length_header(&mut self, tags: &TagFamily, len: u64) -> Result<(), EncodeError> {
        if len < LENGTH2P6 {
            self.writer.u8(tags.class6 | (len as u8 & 0x3F))?;
        } else if len < LENGTH2P12 {
            self.writer.u8(tags.class12 | (len as u8 & 0x0F))?;
            self.writer.u8((len >> 4) as u8)?;
        } else if len < LENGTH2P20 {
            self.writer.u8(tags.class20 | (len as u8 & 0x0F))?;
            self.writer.u8((len >> 4) as u8)?;
            self.writer.u8((len >> 12) as u8)?;
        } else if len < LENGTH2P36 {
            self.writer.u8(tags.class36 | (len as u8 & 0x0F))?;
            self.writer.u32_le((len >> 4) as u32)?;
        } else {
            return Err(EncodeError::TooLong { len });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value) -> Vec<u8> {
        BconEncoder::new().encode(value).unwrap()
    }

    #[test]
    fn scalar_tokens() {
        assert_eq!(encode(&Value::Null), [0x01]);
        assert_eq!(encode(&Value::Bool(true)), [0x02]);
        assert_eq!(encode(&Value::Bool(false)), [0x03]);
        assert_eq!(encode(&Value::Double(1.5)), {
            let mut expected = vec![0x0B];
            expected.extend_from_slice(&1.5f64.to_le_bytes());
            expected
        });
    }

    #[test]
    fn signed_narrowing_boundaries() {
        assert_eq!(encode(&Value::Int32(127)), [0x04, 0x7F]);
        assert_eq!(encode(&Value::Int32(-128)), [0x04, 0x80]);
        assert_eq!(encode(&Value::Int32(128)), [0x05, 0x80, 0x00]);
        assert_eq!(encode(&Value::Int32(-129)), [0x05, 0x7F, 0xFF]);
        assert_eq!(encode(&Value::Int32(32767)), [0x05, 0xFF, 0x7F]);
        assert_eq!(encode(&Value::Int32(32768)), [0x07, 0x00, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn unsigned_narrowing_boundaries() {
        assert_eq!(encode(&Value::UInt32(65535)), [0x06, 0xFF, 0xFF]);
        assert_eq!(
            encode(&Value::UInt32(65536)),
            [0x08, 0x00, 0x00, 0x01, 0x00]
        );
    }

    #[test]
    fn sixty_four_bit_kinds_never_narrow() {
        assert_eq!(
            encode(&Value::Int64(1)),
            [0x09, 1, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode(&Value::UInt64(1)),
            [0x0A, 1, 0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(
            encode(&Value::DateTime(-1)),
            [0x0C, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn length_header_class_selection() {
        let mut encoder = BconEncoder::new();
        for (len, header) in [
            (0u64, vec![0xC0u8]),
            (63, vec![0xC0 | 63]),
            (64, vec![0x50, 0x04]),
            (4095, vec![0x5F, 0xFF]),
            (4096, vec![0x60, 0x00, 0x01]),
            (1048575, vec![0x6F, 0xFF, 0xFF]),
            (1048576, vec![0x70, 0x00, 0x00, 0x01, 0x00]),
            ((1 << 36) - 1, vec![0x7F, 0xFF, 0xFF, 0xFF, 0xFF]),
        ] {
            encoder.writer.reset();
            encoder.write_length_header(&STRING_TAGS, len).unwrap();
            assert_eq!(encoder.writer.flush(), header, "len {len}");
        }
    }

    #[test]
    fn length_beyond_36_bits_is_rejected() {
        let mut encoder = BconEncoder::new();
        let err = encoder
            .write_length_header(&DATA_TAGS, 1 << 36)
            .unwrap_err();
        assert!(matches!(err, EncodeError::TooLong { len } if len == 1 << 36));
    }

    #[test]
    fn map_layout_is_value_then_key_sorted() {
        let v = Value::map([("b", Value::Int32(1)), ("a", Value::Int32(2))]);
        assert_eq!(
            encode(&v),
            [
                0x0F, // map
                0x04, 2, b'a', 0x00, // value 2, key "a"
                0x04, 1, b'b', 0x00, // value 1, key "b"
                0x00, // end
            ]
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut v = Value::Array(vec![]);
        for _ in 0..(MAX_DEPTH + 2) {
            v = Value::Array(vec![v]);
        }
        let err = BconEncoder::new().encode(&v).unwrap_err();
        assert!(matches!(err, EncodeError::DepthLimit));
    }
}
