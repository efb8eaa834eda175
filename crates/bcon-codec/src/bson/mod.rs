//! BSON (Binary JSON) encoding, subset.
//!
//! Only the element types the value model needs: null, bool, int32,
//! int64, double, UTC datetime, string, generic binary, and embedded
//! documents/arrays. All multi-byte integers are little-endian.

pub mod encoder;

pub use encoder::BsonEncoder;

pub(crate) const TOKEN_END: u8 = 0x00;
pub(crate) const TOKEN_DOUBLE: u8 = 0x01;
pub(crate) const TOKEN_STRING: u8 = 0x02;
pub(crate) const TOKEN_MAP: u8 = 0x03;
pub(crate) const TOKEN_LIST: u8 = 0x04;
pub(crate) const TOKEN_DATA: u8 = 0x05;
pub(crate) const TOKEN_BOOL: u8 = 0x08;
pub(crate) const TOKEN_DATETIME: u8 = 0x09;
pub(crate) const TOKEN_NULL: u8 = 0x0A;
pub(crate) const TOKEN_INT32: u8 = 0x10;
pub(crate) const TOKEN_INT64: u8 = 0x12;
/// Binary subtype: generic.
pub(crate) const SUBTYPE_GENERIC: u8 = 0x00;
