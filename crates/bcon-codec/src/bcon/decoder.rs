//! BCON value decoder.
//!
//! The format is self-describing via tags, so decode is the exact
//! inverse of the encoder, with one inherited ambiguity: the 6-bit
//! string and data tag families overlap in the 0xC0..=0xDF range. A
//! byte payload of length 32..=63 encodes into that range, and the
//! decoder must read the tag as a string of length `tag & 0x3F`
//! (payload length minus 32). The parse then consumes the wrong number
//! of bytes and fails — `TrailingBytes` or `InvalidUtf8` at the top
//! level, a corrupted entry inside a container. Byte payloads round
//! trip only at lengths 0..=31 and 64 up. Wider length classes are
//! unambiguous.

use std::collections::BTreeMap;

use super::error::DecodeError;
use super::{
    TOKEN_BYTE, TOKEN_DATA12, TOKEN_DATA20, TOKEN_DATA36, TOKEN_DATA6, TOKEN_DATETIME,
    TOKEN_DOUBLE, TOKEN_END, TOKEN_FALSE, TOKEN_INT16, TOKEN_INT32, TOKEN_INT64, TOKEN_LIST,
    TOKEN_MAP, TOKEN_NULL, TOKEN_STRING12, TOKEN_STRING20, TOKEN_STRING36, TOKEN_STRING6,
    TOKEN_TRUE, TOKEN_UINT16, TOKEN_UINT32, TOKEN_UINT64,
};
use crate::value::Value;
use crate::MAX_DEPTH;

/// BCON decoder over an in-memory byte slice.
///
/// Decoded integers carry the stored width, not the originally
/// constructed one: byte and 16-bit payloads come back as
/// [`Value::Int32`]/[`Value::UInt32`].
pub struct BconDecoder {
    data: Vec<u8>,
    x: usize,
}

impl Default for BconDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BconDecoder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            x: 0,
        }
    }

    /// Decodes one value; the input must contain exactly one value.
    pub fn decode(&mut self, data: &[u8]) -> Result<Value, DecodeError> {
        self.data = data.to_vec();
        self.x = 0;
        let value = self.read_value(0)?;
        if self.x != self.data.len() {
            return Err(DecodeError::TrailingBytes);
        }
        Ok(value)
    }

    #[inline]
    fn check(&self, n: usize) -> Result<(), DecodeError> {
        if self.x + n > self.data.len() {
            Err(DecodeError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        self.check(1)?;
        let val = self.data[self.x];
        self.x += 1;
        Ok(val)
    }

    fn peek(&self) -> Result<u8, DecodeError> {
        self.check(1)?;
        Ok(self.data[self.x])
    }

    fn u16_le(&mut self) -> Result<u16, DecodeError> {
        self.check(2)?;
        let val = u16::from_le_bytes([self.data[self.x], self.data[self.x + 1]]);
        self.x += 2;
        Ok(val)
    }

    fn u32_le(&mut self) -> Result<u32, DecodeError> {
        self.check(4)?;
        let val = u32::from_le_bytes([
            self.data[self.x],
            self.data[self.x + 1],
            self.data[self.x + 2],
            self.data[self.x + 3],
        ]);
        self.x += 4;
        Ok(val)
    }

    fn u64_le(&mut self) -> Result<u64, DecodeError> {
        let lo = u64::from(self.u32_le()?);
        let hi = u64::from(self.u32_le()?);
        Ok(lo | (hi << 32))
    }

    fn bytes(&mut self, n: usize) -> Result<Vec<u8>, DecodeError> {
        self.check(n)?;
        let out = self.data[self.x..self.x + n].to_vec();
        self.x += n;
        Ok(out)
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::DepthLimit);
        }
        let token = self.u8()?;
        match token {
            TOKEN_NULL => Ok(Value::Null),
            TOKEN_TRUE => Ok(Value::Bool(true)),
            TOKEN_FALSE => Ok(Value::Bool(false)),
            TOKEN_BYTE => Ok(Value::Int32(i32::from(self.u8()? as i8))),
            TOKEN_INT16 => Ok(Value::Int32(i32::from(self.u16_le()? as i16))),
            TOKEN_UINT16 => Ok(Value::UInt32(u32::from(self.u16_le()?))),
            TOKEN_INT32 => Ok(Value::Int32(self.u32_le()? as i32)),
            TOKEN_UINT32 => Ok(Value::UInt32(self.u32_le()?)),
            TOKEN_INT64 => Ok(Value::Int64(self.u64_le()? as i64)),
            TOKEN_UINT64 => Ok(Value::UInt64(self.u64_le()?)),
            TOKEN_DOUBLE => Ok(Value::Double(f64::from_bits(self.u64_le()?))),
            TOKEN_DATETIME => Ok(Value::DateTime(self.u64_le()? as i64)),
            TOKEN_LIST => self.read_list(depth),
            TOKEN_MAP => self.read_map(depth),
            t if t >= TOKEN_STRING6 => self.read_str(u64::from(t & 0x3F)),
            t if t & 0xE0 == TOKEN_DATA6 => self.read_data(u64::from(t & 0x1F)),
            t if t & 0xF0 == TOKEN_STRING12 => {
                let len = self.length12(t)?;
                self.read_str(len)
            }
            t if t & 0xF0 == TOKEN_STRING20 => {
                let len = self.length20(t)?;
                self.read_str(len)
            }
            t if t & 0xF0 == TOKEN_STRING36 => {
                let len = self.length36(t)?;
                self.read_str(len)
            }
            t if t & 0xF0 == TOKEN_DATA12 => {
                let len = self.length12(t)?;
                self.read_data(len)
            }
            t if t & 0xF0 == TOKEN_DATA20 => {
                let len = self.length20(t)?;
                self.read_data(len)
            }
            t if t & 0xF0 == TOKEN_DATA36 => {
                let len = self.length36(t)?;
                self.read_data(len)
            }
            t => Err(DecodeError::UnknownToken(t)),
        }
    }

    fn length12(&mut self, tag: u8) -> Result<u64, DecodeError> {
        Ok(u64::from(tag & 0x0F) | (u64::from(self.u8()?) << 4))
    }

    fn length20(&mut self, tag: u8) -> Result<u64, DecodeError> {
        let len = self.length12(tag)?;
        Ok(len | (u64::from(self.u8()?) << 12))
    }

    fn length36(&mut self, tag: u8) -> Result<u64, DecodeError> {
        Ok(u64::from(tag & 0x0F) | (u64::from(self.u32_le()?) << 4))
    }

    fn read_str(&mut self, len: u64) -> Result<Value, DecodeError> {
        let bytes = self.bytes(len as usize)?;
        let s = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
        Ok(Value::Str(s))
    }

    fn read_data(&mut self, len: u64) -> Result<Value, DecodeError> {
        Ok(Value::Bytes(self.bytes(len as usize)?))
    }

    fn read_list(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let mut items = Vec::new();
        loop {
            if self.peek()? == TOKEN_END {
                self.x += 1;
                return Ok(Value::Array(items));
            }
            items.push(self.read_value(depth + 1)?);
        }
    }

    fn read_map(&mut self, depth: usize) -> Result<Value, DecodeError> {
        let mut map = BTreeMap::new();
        loop {
            if self.peek()? == TOKEN_END {
                self.x += 1;
                return Ok(Value::Map(map));
            }
            let value = self.read_value(depth + 1)?;
            let key = self.read_key()?;
            map.insert(key, value);
        }
    }

    /// NUL-terminated key suffix that follows each map value.
    fn read_key(&mut self) -> Result<String, DecodeError> {
        let start = self.x;
        let end = self.data[start..]
            .iter()
            .position(|&b| b == 0)
            .map(|pos| start + pos)
            .ok_or(DecodeError::UnexpectedEof)?;
        let key = std::str::from_utf8(&self.data[start..end])
            .map_err(|_| DecodeError::InvalidUtf8)?
            .to_owned();
        self.x = end + 1;
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_input_fails() {
        let mut decoder = BconDecoder::new();
        assert_eq!(decoder.decode(&[]), Err(DecodeError::UnexpectedEof));
        assert_eq!(decoder.decode(&[0x05, 0x01]), Err(DecodeError::UnexpectedEof));
        assert_eq!(decoder.decode(&[0x0E, 0x01]), Err(DecodeError::UnexpectedEof));
    }

    #[test]
    fn unknown_token_fails() {
        let mut decoder = BconDecoder::new();
        assert_eq!(decoder.decode(&[0x0D]), Err(DecodeError::UnknownToken(0x0D)));
        assert_eq!(decoder.decode(&[0x40]), Err(DecodeError::UnknownToken(0x40)));
    }

    #[test]
    fn trailing_bytes_fail() {
        let mut decoder = BconDecoder::new();
        assert_eq!(
            decoder.decode(&[0x01, 0x01]),
            Err(DecodeError::TrailingBytes)
        );
    }

    #[test]
    fn narrow_integers_decode_at_stored_width() {
        let mut decoder = BconDecoder::new();
        assert_eq!(decoder.decode(&[0x04, 0xFF]), Ok(Value::Int32(-1)));
        assert_eq!(
            decoder.decode(&[0x06, 0x39, 0x30]),
            Ok(Value::UInt32(12345))
        );
    }

    #[test]
    fn map_reads_value_then_key() {
        let mut decoder = BconDecoder::new();
        let value = decoder
            .decode(&[0x0F, 0x04, 7, b'k', 0x00, 0x00])
            .unwrap();
        assert_eq!(value, Value::map([("k", Value::Int32(7))]));
    }

    #[test]
    fn non_utf8_string_fails() {
        let mut decoder = BconDecoder::new();
        assert_eq!(
            decoder.decode(&[0xC0 | 2, 0xFF, 0xFE]),
            Err(DecodeError::InvalidUtf8)
        );
    }
}
