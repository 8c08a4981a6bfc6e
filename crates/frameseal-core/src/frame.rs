//! Frame: one signed unit of the wire protocol.
//!
//! A frame is immutable once built. Frames are signed and emitted in the
//! exact order they are finalized; each signature chains from the one
//! before it.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::header::HeaderSet;
use crate::signer::Signature;

/// A complete frame: headers + payload + chained signature.
///
/// The signature is computed over the serialized header block and payload
/// combined with the previous frame's signature (see [`crate::signer`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// The frame headers, in insertion order.
    pub headers: HeaderSet,

    /// The payload bytes.
    pub payload: Bytes,

    /// Chained authentication tag for this frame.
    pub signature: Signature,
}

impl Frame {
    /// Create a frame from its parts.
    pub fn new(headers: HeaderSet, payload: impl Into<Bytes>, signature: Signature) -> Self {
        Self {
            headers,
            payload: payload.into(),
            signature,
        }
    }

    /// Payload length in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}
