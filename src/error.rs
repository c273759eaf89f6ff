//! Error types for the bbq-probe-core crate.

use thiserror::Error;

/// Errors produced at the decoder boundary.
///
/// A decode failure is never fatal to the device: the payload produces no
/// state update and the next notification is processed normally.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload does not match the fixed length of the brand's wire format.
    #[error("wrong payload length: expected {expected} bytes, got {actual}")]
    WrongLength {
        /// The length required by the wire format.
        expected: usize,
        /// The length actually received.
        actual: usize,
    },

    /// The payload matches no known or fallback format shape.
    #[error("unrecognized payload format: {length} bytes")]
    UnrecognizedFormat {
        /// The length of the unrecognized payload.
        length: usize,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, DecodeError>;
