//! BCON decoder error type.

use thiserror::Error;

/// Error type for BCON decoding operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unknown BCON token: 0x{0:02x}")]
    UnknownToken(u8),
    #[error("invalid UTF-8")]
    InvalidUtf8,
    #[error("trailing bytes after the root value")]
    TrailingBytes,
    #[error("value nesting exceeds the supported depth")]
    DepthLimit,
}
