//! BCON — compact tagged binary encoding with variable-length size
//! classes.
//!
//! Every value starts with a single tag byte. Strings and byte payloads
//! fold the low bits of their length into the tag and carry the rest in
//! little-endian continuation bytes (6/12/20/36-bit classes). Containers
//! are terminated by `END`; map entries are laid out value-first with
//! the key (NUL-terminated) as a suffix, so the encoder never needs
//! lookahead.

pub mod decoder;
pub mod encoder;
pub mod error;

pub use decoder::BconDecoder;
pub use encoder::BconEncoder;
pub use error::DecodeError;

pub(crate) const TOKEN_END: u8 = 0x00;
pub(crate) const TOKEN_NULL: u8 = 0x01;
pub(crate) const TOKEN_TRUE: u8 = 0x02;
pub(crate) const TOKEN_FALSE: u8 = 0x03;
pub(crate) const TOKEN_BYTE: u8 = 0x04;
pub(crate) const TOKEN_INT16: u8 = 0x05;
pub(crate) const TOKEN_UINT16: u8 = 0x06;
pub(crate) const TOKEN_INT32: u8 = 0x07;
pub(crate) const TOKEN_UINT32: u8 = 0x08;
pub(crate) const TOKEN_INT64: u8 = 0x09;
pub(crate) const TOKEN_UINT64: u8 = 0x0A;
pub(crate) const TOKEN_DOUBLE: u8 = 0x0B;
pub(crate) const TOKEN_DATETIME: u8 = 0x0C;
pub(crate) const TOKEN_LIST: u8 = 0x0E;
pub(crate) const TOKEN_MAP: u8 = 0x0F;

// Length-class tag families. The 6-bit classes keep the whole length in
// the tag; the wider classes keep the low nibble there.
pub(crate) const TOKEN_DATA6: u8 = 0xA0;
pub(crate) const TOKEN_DATA12: u8 = 0x10;
pub(crate) const TOKEN_DATA20: u8 = 0x20;
pub(crate) const TOKEN_DATA36: u8 = 0x30;
pub(crate) const TOKEN_STRING6: u8 = 0xC0;
pub(crate) const TOKEN_STRING12: u8 = 0x50;
pub(crate) const TOKEN_STRING20: u8 = 0x60;
pub(crate) const TOKEN_STRING36: u8 = 0x70;

pub(crate) const LENGTH2P6: u64 = 1 << 6;
pub(crate) const LENGTH2P12: u64 = 1 << 12;
pub(crate) const LENGTH2P20: u64 = 1 << 20;
pub(crate) const LENGTH2P36: u64 = 1 << 36;
