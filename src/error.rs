//! Error types for the structpack codec.

use thiserror::Error;

/// Result type alias for structpack operations.
pub type Result<T> = std::result::Result<T, PackError>;

/// Errors that can occur when parsing a format string or transcoding values.
///
/// Every failure is deterministic given identical inputs, so variants carry
/// enough context to be asserted on directly in tests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The format string is invalid (unknown type code, dangling repeat
    /// count, or empty past the byte-order marker).
    #[error("malformed format string at byte {position}: {reason}")]
    MalformedFormat { position: usize, reason: String },

    /// The source or destination buffer is shorter than the layout requires.
    #[error("buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    /// The number of supplied values does not match the number of
    /// non-padding fields in the format.
    #[error("value count mismatch: format expects {expected} value(s), got {supplied}")]
    ValueCountMismatch { expected: usize, supplied: usize },

    /// A supplied value's runtime kind cannot be coerced to the field's kind
    /// (e.g. a byte string for an integer field, or a float with a
    /// fractional component for an integer field).
    #[error("value kind mismatch at field {field}: expected {expected}, got {supplied}")]
    ValueKindMismatch {
        field: usize,
        expected: &'static str,
        supplied: &'static str,
    },

    /// An integer value falls outside the representable range of the target
    /// field width and signedness.
    #[error("integer overflow at field {field}: {value} does not fit in {target}")]
    IntegerOverflow {
        field: usize,
        value: String,
        target: &'static str,
    },

    /// A byte string is longer than the field's declared byte length.
    #[error("byte string too long at field {field}: {length} bytes exceeds declared length {declared}")]
    StringTooLong {
        field: usize,
        length: usize,
        declared: usize,
    },
}
