//! Writer half of an encoder pair.

use std::io;
use std::sync::Arc;

use frameseal_core::{FrameSigner, HeaderSet, Signature};

use crate::accumulator::WriteAccumulator;
use crate::builder::FrameBuilder;
use crate::channel::TransferChannel;
use crate::error::EncodeError;
use crate::state::{Readiness, SharedState, StreamStatus};

/// Producer end of an encoder stream.
///
/// Accumulates payload bytes and cuts signed frames at the accumulator
/// boundary or on explicit [`finalize`](FrameWriter::finalize). The seed
/// signature, header template, and signer must all be configured before
/// the first write; the stream activates once the last of them is set.
///
/// Single-writer by construction: the accumulator, chain state, and
/// configuration are owned here and never locked.
pub struct FrameWriter {
    accumulator: WriteAccumulator,
    builder: Option<FrameBuilder>,
    seed: Option<Signature>,
    signer: Option<Arc<dyn FrameSigner>>,
    template: Option<HeaderSet>,
    channel: Arc<TransferChannel>,
    shared: Arc<SharedState>,
}

impl FrameWriter {
    pub(crate) fn new(
        accumulator_capacity: usize,
        channel: Arc<TransferChannel>,
        shared: Arc<SharedState>,
    ) -> Self {
        Self {
            accumulator: WriteAccumulator::new(accumulator_capacity),
            builder: None,
            seed: None,
            signer: None,
            template: None,
            channel,
            shared,
        }
    }

    /// Set the tag the first frame chains from.
    ///
    /// Latched once the stream activates; later calls have no effect.
    pub fn set_signature_seed(&mut self, seed: Signature) {
        if self.builder.is_none() {
            self.seed = Some(seed);
            self.try_activate();
        }
    }

    /// Set the header template used by implicit finalizes.
    ///
    /// May be replaced while the stream is active; the new template
    /// applies to subsequent implicit frames only.
    pub fn set_headers(&mut self, template: HeaderSet) {
        self.template = Some(template);
        self.try_activate();
    }

    /// Set the signer capability.
    ///
    /// Latched once the stream activates; later calls have no effect.
    pub fn set_signer(&mut self, signer: Arc<dyn FrameSigner>) {
        if self.builder.is_none() {
            self.signer = Some(signer);
            self.try_activate();
        }
    }

    fn try_activate(&mut self) {
        if self.builder.is_some() || self.template.is_none() {
            return;
        }
        let (Some(seed), Some(signer)) = (self.seed.clone(), self.signer.clone()) else {
            return;
        };
        self.builder = Some(FrameBuilder::new(signer, seed, Arc::clone(&self.channel)));
        self.shared
            .transition(StreamStatus::Unconfigured, StreamStatus::Active);
    }

    /// Append payload bytes, cutting implicit frames at the accumulator
    /// boundary.
    ///
    /// If the pending bytes plus the incoming bytes would exceed the
    /// accumulator capacity, the pending bytes are finalized first with
    /// the header template; incoming bytes then cut a frame at each full
    /// accumulator while more remain. A write that exactly fills the
    /// accumulator stays pending until the next operation.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), EncodeError> {
        self.ensure_writable()?;

        if !self.accumulator.is_empty()
            && self.accumulator.len() + bytes.len() > self.accumulator.capacity()
        {
            self.finalize_pending()?;
        }

        let mut rest = bytes;
        while !rest.is_empty() {
            let copied = self.accumulator.fill(rest);
            rest = &rest[copied..];
            if !rest.is_empty() {
                self.finalize_pending()?;
            }
        }
        Ok(())
    }

    /// Wrap the pending bytes in a signed frame with the given headers.
    ///
    /// The header set is copied; the caller keeps ownership of its
    /// template and may reuse or mutate it freely. Nothing pending emits
    /// nothing. On a signing failure the pending bytes stay in the
    /// accumulator and the chain is unchanged, so the caller may retry.
    pub fn finalize(&mut self, headers: &HeaderSet) -> Result<(), EncodeError> {
        self.ensure_writable()?;
        self.finalize_with(headers.clone())
    }

    fn finalize_pending(&mut self) -> Result<(), EncodeError> {
        let template = self
            .template
            .clone()
            .ok_or(EncodeError::Configuration("header template"))?;
        self.finalize_with(template)
    }

    fn finalize_with(&mut self, headers: HeaderSet) -> Result<(), EncodeError> {
        if self.accumulator.is_empty() {
            return Ok(());
        }
        let builder = self
            .builder
            .as_mut()
            .ok_or(EncodeError::Configuration("signer"))?;
        builder.build(headers, self.accumulator.bytes())?;
        self.accumulator.clear();
        Ok(())
    }

    /// Flag the logical end of the stream.
    ///
    /// Pending bytes are finalized with the header template first, so a
    /// close never silently discards a successfully signable tail. EOF is
    /// marked even if that final sign fails (the failed bytes are
    /// dropped and the error returned); already-buffered frames remain
    /// readable until drained. Idempotent.
    pub fn close(&mut self) -> Result<(), EncodeError> {
        if self.shared.status().is_shut() {
            return Ok(());
        }

        let result = if self.accumulator.is_empty() {
            Ok(())
        } else {
            self.finalize_pending()
        };
        if result.is_err() {
            tracing::debug!(
                pending = self.accumulator.len(),
                "discarding unsignable bytes at close"
            );
            self.accumulator.clear();
        }

        self.mark_closing();
        result
    }

    /// Current stream status.
    pub fn status(&self) -> StreamStatus {
        self.shared.status()
    }

    /// Handle to the advisory readiness flag.
    pub fn readiness(&self) -> Readiness {
        Readiness::new(Arc::clone(&self.shared))
    }

    /// Bytes accumulated but not yet framed.
    pub fn pending(&self) -> usize {
        self.accumulator.len()
    }

    fn ensure_writable(&self) -> Result<(), EncodeError> {
        match self.shared.status() {
            StreamStatus::Active => Ok(()),
            StreamStatus::Unconfigured => Err(EncodeError::Configuration(self.missing_config())),
            StreamStatus::Closing | StreamStatus::Closed => Err(EncodeError::Closed),
        }
    }

    fn missing_config(&self) -> &'static str {
        if self.seed.is_none() {
            "signature seed"
        } else if self.template.is_none() {
            "header template"
        } else {
            "signer"
        }
    }

    fn mark_closing(&self) {
        let moved = self
            .shared
            .transition(StreamStatus::Active, StreamStatus::Closing)
            || self
                .shared
                .transition(StreamStatus::Unconfigured, StreamStatus::Closing);
        if moved {
            self.channel.set_eof();
        }
    }
}

impl io::Write for FrameWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    /// Flush maps to an implicit finalize with the header template.
    fn flush(&mut self) -> io::Result<()> {
        self.ensure_writable().map_err(io::Error::other)?;
        self.finalize_pending().map_err(io::Error::other)
    }
}

impl io::Seek for FrameWriter {
    fn seek(&mut self, _pos: io::SeekFrom) -> io::Result<u64> {
        Err(io::Error::other(EncodeError::SeekUnsupported))
    }
}

impl Drop for FrameWriter {
    fn drop(&mut self) {
        if self.shared.status().is_shut() {
            return;
        }
        if !self.accumulator.is_empty() {
            tracing::debug!(
                pending = self.accumulator.len(),
                "writer dropped with unflushed bytes"
            );
        }
        self.mark_closing();
    }
}
