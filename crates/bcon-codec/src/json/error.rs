//! JSON parse error type.

use thiserror::Error;

/// Lexical or grammatical failure while decoding JSON text.
///
/// The whole parse fails on the first inconsistent byte or token; there
/// is no recovery. The diagnostic is captured at the point of failure
/// with the byte offset already consumed from the source.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{message} at byte {offset}")]
    Syntax { message: String, offset: usize },
    /// Byte source failure, propagated as-is.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, offset: usize) -> Self {
        ParseError::Syntax {
            message: message.into(),
            offset,
        }
    }

    /// True for lexical/grammatical failures (as opposed to IO).
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }
}
