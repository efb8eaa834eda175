//! Encoder-side and top-level error types.

use thiserror::Error;

use crate::json::ParseError;

/// Error type shared by the three encoders.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The target format has no representation for this value kind.
    #[error("value kind not supported by this format: {0}")]
    UnsupportedKind(&'static str),
    /// A string or byte payload exceeds the largest BCON length class.
    #[error("payload too long for BCON length classes: {len} bytes")]
    TooLong { len: u64 },
    /// A BSON document or payload length overflows its 32-bit size field.
    #[error("length overflows the BSON 32-bit size field: {len} bytes")]
    DocumentTooLarge { len: u64 },
    /// BSON can only encode a map or an array at the root.
    #[error("BSON document root must be a map or an array")]
    InvalidDocumentRoot,
    /// Value nesting exceeds [`MAX_DEPTH`](crate::MAX_DEPTH).
    #[error("value nesting exceeds the supported depth")]
    DepthLimit,
    /// Byte sink failure, propagated as-is.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Error type of the file/format entry points.
#[derive(Debug, Error)]
pub enum SerializeError {
    /// The IDL format is declared but not implemented.
    #[error("unsupported IDL format")]
    UnsupportedFormat,
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
