use thiserror::Error;

/// Errors produced while decoding or encoding bencode data.
///
/// Every decode variant records the byte offset at which the problem was
/// detected. A decode error is always fatal to the surrounding parse; the
/// decoder never recovers, retries, or substitutes defaults.
#[derive(Debug, Error)]
pub enum BencodeError {
    /// Input ran out while more bytes were required.
    #[error("unexpected end of input at byte {offset}")]
    UnexpectedEnd { offset: usize },

    /// An integer literal was not a valid signed decimal.
    #[error("malformed integer at byte {offset}")]
    MalformedInteger { offset: usize },

    /// A string length prefix was not a valid non-negative decimal.
    #[error("malformed string length at byte {offset}")]
    MalformedLength { offset: usize },

    /// A dictionary key was not a byte string holding valid UTF-8.
    #[error("dict key at byte {offset} does not decode as UTF-8 text")]
    InvalidKeyEncoding { offset: usize },

    /// A dictionary key was read but the body terminated before its value.
    #[error("dict key has no value at byte {offset}")]
    DictValueMissing { offset: usize },

    /// Nesting exceeded the configured depth limit.
    #[error("nesting deeper than {limit} levels at byte {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    /// A terminator appeared where a top-level value was expected.
    #[error("unexpected terminator at byte {offset}")]
    UnexpectedTerminator { offset: usize },

    /// Bytes remained after the top-level value.
    #[error("trailing data after value at byte {offset}")]
    TrailingData { offset: usize },

    /// Writing encoded output failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl BencodeError {
    /// Returns the byte offset the error was reported at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            BencodeError::UnexpectedEnd { offset }
            | BencodeError::MalformedInteger { offset }
            | BencodeError::MalformedLength { offset }
            | BencodeError::InvalidKeyEncoding { offset }
            | BencodeError::DictValueMissing { offset }
            | BencodeError::NestingTooDeep { offset, .. }
            | BencodeError::UnexpectedTerminator { offset }
            | BencodeError::TrailingData { offset } => Some(*offset),
            BencodeError::Io(_) => None,
        }
    }
}
