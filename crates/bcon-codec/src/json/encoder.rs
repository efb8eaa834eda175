//! JSON text encoder with compact/pretty formatting.

use bcon_buffers::{ByteSink, Writer};

use crate::error::EncodeError;
use crate::value::Value;
use crate::MAX_DEPTH;

/// Output formatting options.
///
/// `indent_step == 0` keeps everything on one line; a non-zero step
/// pretty-prints with that many spaces per nesting level. `compact`
/// suppresses the optional space after `:` and after commas in
/// single-line output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonFormat {
    pub compact: bool,
    pub indent_step: u8,
}

impl JsonFormat {
    /// Single-line output with no optional spacing.
    pub fn compact() -> Self {
        Self {
            compact: true,
            indent_step: 0,
        }
    }

    /// Pretty-printed output with `step` spaces per nesting level.
    pub fn pretty(step: u8) -> Self {
        Self {
            compact: false,
            indent_step: step,
        }
    }
}

/// Encodes a [`Value`] tree to JSON text (UTF-8 bytes).
///
/// Not a strict JSON writer: only the seven classic escapes are applied
/// (other control bytes pass through), and non-finite doubles come out
/// as `infinity`/`-infinity`, which standard parsers reject. Both are
/// documented compatibility surfaces of the format family. `DateTime`
/// has no JSON representation and fails.
pub struct JsonEncoder<W: ByteSink = Writer> {
    pub writer: W,
    format: JsonFormat,
}

impl Default for JsonEncoder<Writer> {
    fn default() -> Self {
        Self::new(JsonFormat::default())
    }
}

impl JsonEncoder<Writer> {
    pub fn new(format: JsonFormat) -> Self {
        Self {
            writer: Writer::new(),
            format,
        }
    }

    /// Encodes a value to JSON text bytes.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.writer.reset();
        self.write_any(value)?;
        Ok(self.writer.flush())
    }

    /// Encodes a value to a JSON string.
    pub fn encode_to_string(&mut self, value: &Value) -> Result<String, EncodeError> {
        let bytes = self.encode(value)?;
        // The writer only ever receives UTF-8 fragments.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl<W: ByteSink> JsonEncoder<W> {
    /// Wraps an external sink (a channel, a plain `Vec<u8>`).
    pub fn with_sink(writer: W, format: JsonFormat) -> Self {
        Self { writer, format }
    }

    /// Writes one value to the sink.
    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        self.write_value(value, 0, 0)
    }

    /// `indent` is the running offset of the *parent* level, threaded
    /// down the recursion explicitly.
    fn write_value(&mut self, value: &Value, indent: u32, depth: usize) -> Result<(), EncodeError> {
        if depth > MAX_DEPTH {
            return Err(EncodeError::DepthLimit);
        }
        match value {
            Value::Null => self.writer.buf(b"null")?,
            Value::Bool(true) => self.writer.buf(b"true")?,
            Value::Bool(false) => self.writer.buf(b"false")?,
            Value::Int32(i) => self.write_number_text(i.to_string())?,
            Value::UInt32(u) => self.write_number_text(u.to_string())?,
            Value::Int64(i) => self.write_number_text(i.to_string())?,
            Value::UInt64(u) => self.write_number_text(u.to_string())?,
            Value::Double(f) => self.write_number_text(f.to_string())?,
            Value::DateTime(_) => return Err(EncodeError::UnsupportedKind(value.kind())),
            Value::Str(s) => self.write_str(s)?,
            Value::Bytes(b) => self.write_str(&String::from_utf8_lossy(b))?,
            Value::Array(items) => {
                let inner = indent + u32::from(self.format.indent_step);
                self.writer.u8(b'[')?;
                let mut first = true;
                for item in items {
                    if first {
                        if inner != 0 {
                            self.write_newline_indent(inner)?;
                        }
                    } else {
                        self.writer.u8(b',')?;
                        if inner != 0 {
                            self.write_newline_indent(inner)?;
                        } else if !self.format.compact {
                            self.writer.u8(b' ')?;
                        }
                    }
                    self.write_value(item, inner, depth + 1)?;
                    first = false;
                }
                if !first && inner != 0 {
                    self.write_newline_indent(indent)?;
                }
                self.writer.u8(b']')?;
            }
            Value::Map(map) => {
                let inner = indent + u32::from(self.format.indent_step);
                self.writer.u8(b'{')?;
                let mut first = true;
                for (key, val) in map {
                    if first {
                        if inner != 0 {
                            self.write_newline_indent(inner)?;
                        }
                    } else {
                        self.writer.u8(b',')?;
                        if inner != 0 {
                            self.write_newline_indent(inner)?;
                        } else if !self.format.compact {
                            self.writer.u8(b' ')?;
                        }
                    }
                    self.write_str(key)?;
                    self.writer.u8(b':')?;
                    if !self.format.compact {
                        self.writer.u8(b' ')?;
                    }
                    self.write_value(val, inner, depth + 1)?;
                    first = false;
                }
                if !first && inner != 0 {
                    self.write_newline_indent(indent)?;
                }
                self.writer.u8(b'}')?;
            }
        }
        Ok(())
    }

    /// Quoted string with the classic escape set; all other bytes pass
    /// through unescaped.
    fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.writer.u8(b'"')?;
        for &byte in s.as_bytes() {
            match byte {
                b'\\' => self.writer.buf(b"\\\\")?,
                b'"' => self.writer.buf(b"\\\"")?,
                0x08 => self.writer.buf(b"\\b")?,
                0x0C => self.writer.buf(b"\\f")?,
                b'\n' => self.writer.buf(b"\\n")?,
                b'\r' => self.writer.buf(b"\\r")?,
                b'\t' => self.writer.buf(b"\\t")?,
                _ => self.writer.u8(byte)?,
            }
        }
        self.writer.u8(b'"')?;
        Ok(())
    }

    /// Numeric text, with the format family's `inf` -> `infinity` spelling.
    fn write_number_text(&mut self, text: String) -> Result<(), EncodeError> {
        let text = if text.contains("inf") {
            text.replace("inf", "infinity")
        } else {
            text
        };
        self.writer.buf(text.as_bytes())?;
        Ok(())
    }

    fn write_newline_indent(&mut self, n: u32) -> Result<(), EncodeError> {
        self.writer.u8(b'\n')?;
        for _ in 0..n {
            self.writer.u8(b' ')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: &Value, format: JsonFormat) -> String {
        JsonEncoder::new(format).encode_to_string(value).unwrap()
    }

    #[test]
    fn scalars() {
        let f = JsonFormat::default();
        assert_eq!(encode(&Value::Null, f), "null");
        assert_eq!(encode(&Value::Bool(true), f), "true");
        assert_eq!(encode(&Value::Bool(false), f), "false");
        assert_eq!(encode(&Value::Int32(-5), f), "-5");
        assert_eq!(encode(&Value::UInt64(u64::MAX), f), u64::MAX.to_string());
        assert_eq!(encode(&Value::Double(2.5), f), "2.5");
    }

    #[test]
    fn infinity_spelling() {
        let f = JsonFormat::default();
        assert_eq!(encode(&Value::Double(f64::INFINITY), f), "infinity");
        assert_eq!(encode(&Value::Double(f64::NEG_INFINITY), f), "-infinity");
    }

    #[test]
    fn escape_set() {
        let f = JsonFormat::default();
        assert_eq!(
            encode(&Value::Str("a\"b\\c\n\t\r\u{8}\u{c}".into()), f),
            r#""a\"b\\c\n\t\r\b\f""#
        );
        // Other control bytes pass through unescaped.
        assert_eq!(encode(&Value::Str("\u{1}".into()), f), "\"\u{1}\"");
    }

    #[test]
    fn datetime_is_rejected() {
        let err = JsonEncoder::new(JsonFormat::default())
            .encode(&Value::DateTime(0))
            .unwrap_err();
        assert!(matches!(err, EncodeError::UnsupportedKind("datetime")));
    }

    #[test]
    fn default_spacing() {
        let v = Value::map([("a", Value::array([Value::Int32(1), Value::Int32(2)]))]);
        assert_eq!(encode(&v, JsonFormat::default()), r#"{"a": [1, 2]}"#);
    }

    #[test]
    fn compact_spacing() {
        let v = Value::map([("a", Value::array([Value::Int32(1), Value::Int32(2)]))]);
        assert_eq!(encode(&v, JsonFormat::compact()), r#"{"a":[1,2]}"#);
    }

    #[test]
    fn empty_containers_stay_inline_when_pretty() {
        let f = JsonFormat::pretty(2);
        assert_eq!(encode(&Value::map::<&str, _>([]), f), "{}");
        assert_eq!(encode(&Value::array([]), f), "[]");
    }
}
