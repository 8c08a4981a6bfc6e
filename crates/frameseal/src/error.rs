//! Error types for the frameseal encoder.

use frameseal_core::{SignError, WireError};
use thiserror::Error;

/// Errors surfaced by the encoder's writer half.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Required configuration is missing before the first write.
    #[error("stream is not configured: missing {0}")]
    Configuration(&'static str),

    /// The signer rejected the frame. The frame is discarded and the
    /// signature chain is left unchanged; no retry is attempted here.
    #[error("frame signing failed: {0}")]
    Signing(#[from] SignError),

    /// Write attempted after `close`.
    #[error("stream is closed")]
    Closed,

    /// The stream is strictly forward-append/forward-read.
    #[error("seek is not supported on a frame stream")]
    SeekUnsupported,

    /// The frame exceeds the transfer channel's total capacity and could
    /// never be enqueued.
    #[error("frame of {len} bytes exceeds channel capacity of {capacity}")]
    FrameTooLarge { len: usize, capacity: usize },

    /// Wire serialization failed.
    #[error("wire encoding failed: {0}")]
    Wire(#[from] WireError),
}
