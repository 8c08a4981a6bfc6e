//! Frame assembly and chained signing.

use std::sync::Arc;

use bytes::Bytes;
use frameseal_core::{encode_frame, sign_input, ChainState, Frame, FrameSigner, HeaderSet, Signature};

use crate::channel::TransferChannel;
use crate::error::EncodeError;

/// Assembles signed frames and advances the signature chain.
///
/// The chain advances only after the frame has been signed, encoded, and
/// handed to the channel; any failure along the way leaves the chain
/// pointing at the last emitted frame.
pub struct FrameBuilder {
    signer: Arc<dyn FrameSigner>,
    chain: ChainState,
    channel: Arc<TransferChannel>,
}

impl FrameBuilder {
    /// Create a builder chaining from the given seed signature.
    pub fn new(
        signer: Arc<dyn FrameSigner>,
        seed: Signature,
        channel: Arc<TransferChannel>,
    ) -> Self {
        Self {
            signer,
            chain: ChainState::new(seed),
            channel,
        }
    }

    /// The signature the next frame will chain from.
    pub fn prior(&self) -> &Signature {
        self.chain.prior()
    }

    /// Build, sign, and enqueue one frame.
    ///
    /// Blocks inside the channel put while capacity is insufficient.
    pub fn build(&mut self, headers: HeaderSet, payload: &[u8]) -> Result<(), EncodeError> {
        let input = sign_input(&headers, payload)?;
        let signature = match self.signer.sign(&input, self.chain.prior()) {
            Ok(signature) => signature,
            Err(err) => {
                tracing::error!(error = %err, payload_len = payload.len(), "failed to sign frame");
                return Err(err.into());
            }
        };

        let frame = Frame::new(headers, Bytes::copy_from_slice(payload), signature.clone());
        let wire = encode_frame(&frame)?;
        self.channel.put(&wire)?;
        self.chain.advance(signature);

        tracing::trace!(
            wire_len = wire.len(),
            payload_len = payload.len(),
            "frame emitted"
        );
        Ok(())
    }
}
