//! Error types for frameseal core.

use thiserror::Error;

/// Errors producing or parsing the frame wire layout.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("header name of {len} bytes exceeds maximum of {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("header value of {len} bytes exceeds maximum of {max}")]
    ValueTooLong { len: usize, max: usize },

    #[error("signature of {len} bytes exceeds maximum of {max}")]
    SignatureTooLong { len: usize, max: usize },

    #[error("frame of {0} bytes exceeds the u32 length field")]
    FrameTooLong(usize),

    #[error("truncated frame: expected {expected} bytes, got {got}")]
    Truncated { expected: usize, got: usize },

    #[error("prelude CRC mismatch")]
    PreludeCrcMismatch,

    #[error("frame CRC mismatch")]
    FrameCrcMismatch,

    #[error("unknown header value tag: {0}")]
    UnknownTag(u8),

    #[error("string header is not valid UTF-8")]
    InvalidUtf8,

    #[error("malformed header block: {0}")]
    MalformedHeaders(String),
}

/// Error from a [`crate::FrameSigner`] capability.
///
/// A rejected frame is discarded by the caller; the signature chain is
/// never advanced past a failure.
#[derive(Debug, Error)]
pub enum SignError {
    #[error("signer rejected the frame: {0}")]
    Rejected(String),

    #[error("signing key unavailable")]
    KeyUnavailable,
}
