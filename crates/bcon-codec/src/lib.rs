//! Tagged value tree with three wire formats: BCON (compact tagged
//! binary), a BSON subset, and JSON text, plus a streaming JSON decoder
//! that runs over a pull-one-byte source.
//!
//! Encoding is a single recursive pass over a fully materialized
//! [`Value`]; decoding (JSON) assembles the tree from a
//! [`ByteSource`](bcon_buffers::ByteSource) without buffering the whole
//! input. BCON and BSON output is byte-exact and deterministic: map
//! entries always encode in ascending key order.

pub mod bcon;
pub mod bson;
pub mod json;

mod error;
mod serializer;
mod value;

pub use bcon::{BconDecoder, BconEncoder, DecodeError};
pub use bson::BsonEncoder;
pub use error::{EncodeError, SerializeError};
pub use json::{parse_json, parse_json_str, Driver, JsonEncoder, JsonFormat, ParseError};
pub use serializer::{
    from_json_file, from_json_reader, serialize_to_sink, serialize_to_vec, to_file,
    to_json_string, FileFormat,
};
pub use value::Value;

/// Maximum value nesting the encoders accept; the JSON parser is
/// heap-bounded and needs no limit.
pub const MAX_DEPTH: usize = 1024;
