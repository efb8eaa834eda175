//! JSON text encoding and streaming decoding.
//!
//! The encoder is a single recursive pass with configurable
//! compact/pretty formatting. Decoding is a scanner/parser pair pulling
//! one byte at a time from a [`ByteSource`](bcon_buffers::ByteSource),
//! so it can run directly over a live channel.

pub mod encoder;
pub mod error;
pub mod parser;
pub mod scanner;

pub use encoder::{JsonEncoder, JsonFormat};
pub use error::ParseError;
pub use parser::{parse_json, parse_json_str, Driver};
pub use scanner::{Scanner, Token};
