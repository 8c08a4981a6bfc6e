//! # Frameseal
//!
//! Converts an append-only byte stream into signed, length-delimited
//! frames suitable for a persistent bidirectional channel (streaming
//! audio or events to a remote service).
//!
//! The encoder is split into a writer half and a reader half connected
//! by a bounded in-memory channel:
//!
//! ```text
//! append -> WriteAccumulator -> FrameBuilder/sign -> TransferChannel -> FrameReader
//! ```
//!
//! The writer accumulates payload bytes up to a fixed capacity, wraps
//! them in a signed frame on finalize (explicit or implicit), and hands
//! the wire bytes to the channel. Each frame's signature chains from the
//! previous one, starting at a configured seed. The reader drains the
//! channel and serves plain `read` calls. A full channel blocks the
//! writer until the reader drains it: backpressure, never growth or
//! drops.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use frameseal::{pair, EncoderConfig};
//! use frameseal_core::{Blake3ChainSigner, Header, HeaderSet, Signature};
//!
//! let (mut writer, mut reader) = pair(EncoderConfig::default());
//! writer.set_signature_seed(Signature::empty());
//! writer.set_headers(HeaderSet::new().with(Header::string("content-type", "audio/wav")));
//! writer.set_signer(Arc::new(Blake3ChainSigner::new([7u8; 32])));
//!
//! writer.append(b"HELLO").unwrap();
//! writer.finalize(&HeaderSet::new().with(Header::string("k", "v"))).unwrap();
//! writer.close().unwrap();
//!
//! let mut wire = Vec::new();
//! std::io::Read::read_to_end(&mut reader, &mut wire).unwrap();
//! assert!(!wire.is_empty());
//! ```

pub mod accumulator;
pub mod builder;
pub mod channel;
pub mod error;
pub mod reader;
pub mod state;
pub mod writer;

use std::sync::Arc;

use crate::channel::TransferChannel;
use crate::state::SharedState;

pub use error::EncodeError;
pub use reader::FrameReader;
pub use state::{Readiness, StreamStatus};
pub use writer::FrameWriter;

/// Default accumulator capacity in bytes.
pub const DEFAULT_ACCUMULATOR_CAPACITY: usize = 4 * 1024;

/// Configuration for an encoder pair.
#[derive(Debug, Clone)]
pub struct EncoderConfig {
    /// Payload staging capacity; an implicit frame is cut when it fills.
    pub accumulator_capacity: usize,

    /// Transfer channel capacity. Defaults to 1.5x the accumulator
    /// capacity, leaving room for one framed message plus header and
    /// signature overhead.
    pub channel_capacity: Option<usize>,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            accumulator_capacity: DEFAULT_ACCUMULATOR_CAPACITY,
            channel_capacity: None,
        }
    }
}

impl EncoderConfig {
    fn effective_channel_capacity(&self) -> usize {
        self.channel_capacity
            .unwrap_or(self.accumulator_capacity + self.accumulator_capacity / 2)
    }
}

/// Create a connected writer/reader pair.
///
/// The pair embodies the single-producer/single-consumer contract: move
/// each half to its own thread. The channel between them is the only
/// shared, locked resource.
pub fn pair(config: EncoderConfig) -> (FrameWriter, FrameReader) {
    let channel = Arc::new(TransferChannel::new(config.effective_channel_capacity()));
    let shared = Arc::new(SharedState::new());

    let writer = FrameWriter::new(
        config.accumulator_capacity,
        Arc::clone(&channel),
        Arc::clone(&shared),
    );
    let reader = FrameReader::new(channel, shared);
    (writer, reader)
}
