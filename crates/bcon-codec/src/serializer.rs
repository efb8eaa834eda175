//! Format selection and file entry points.

use std::fs::File;
use std::io;
use std::path::Path;

use bcon_buffers::{ByteSink, ReadSource};

use crate::bcon::BconEncoder;
use crate::bson::BsonEncoder;
use crate::error::SerializeError;
use crate::json::{Driver, JsonEncoder, JsonFormat, ParseError};
use crate::value::Value;

/// The wire formats a value can be written as.
///
/// `Idl` is declared for callers that enumerate formats, but writing it
/// always fails: this codec never implements it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Bcon,
    Bson,
    Json,
    Idl,
}

/// Serializes a value into the given sink.
pub fn serialize_to_sink<W: ByteSink>(
    sink: W,
    value: &Value,
    format: FileFormat,
    json: JsonFormat,
) -> Result<(), SerializeError> {
    match format {
        FileFormat::Bcon => BconEncoder::with_sink(sink).write_any(value)?,
        FileFormat::Bson => BsonEncoder::with_sink(sink).write_any(value)?,
        FileFormat::Json => JsonEncoder::with_sink(sink, json).write_any(value)?,
        FileFormat::Idl => return Err(SerializeError::UnsupportedFormat),
    }
    Ok(())
}

/// Serializes a value to a fresh byte vector.
pub fn serialize_to_vec(
    value: &Value,
    format: FileFormat,
    json: JsonFormat,
) -> Result<Vec<u8>, SerializeError> {
    let mut out: Vec<u8> = Vec::new();
    serialize_to_sink(&mut out, value, format, json)?;
    Ok(out)
}

/// Writes a value to a file in the given format, truncating any
/// previous content.
pub fn to_file<P: AsRef<Path>>(
    path: P,
    value: &Value,
    format: FileFormat,
    json: JsonFormat,
) -> Result<(), SerializeError> {
    let bytes = serialize_to_vec(value, format, json)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Serializes a value to a JSON string.
pub fn to_json_string(value: &Value, json: JsonFormat) -> Result<String, SerializeError> {
    let bytes = serialize_to_vec(value, FileFormat::Json, json)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Decodes one JSON value straight off a reader (file, socket), one
/// byte at a time.
pub fn from_json_reader<R: io::Read>(reader: R) -> Result<Value, ParseError> {
    Driver::new(ReadSource::new(reader)).parse()
}

/// Decodes one JSON value from a file.
pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Value, SerializeError> {
    let file = File::open(path)?;
    Ok(from_json_reader(file)?)
}
