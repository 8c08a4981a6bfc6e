//! Stream lifecycle and readiness tracking.
//!
//! The lifecycle enum is shared between the writer and reader halves and
//! transitions through compare-and-swap so `Closed` stays terminal. The
//! readiness flag is advisory: it is set by the transport collaborator
//! after its connection handshake and cleared on transport failure. The
//! encoder never blocks writes on it.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle of an encoder stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum StreamStatus {
    /// Created but still missing the seed, header template, or signer.
    Unconfigured = 0,

    /// Fully configured; accepting writes.
    Active = 1,

    /// Close requested; buffered frames may still drain to the reader.
    Closing = 2,

    /// EOF observed with empty buffers. Terminal.
    Closed = 3,
}

impl StreamStatus {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => StreamStatus::Unconfigured,
            1 => StreamStatus::Active,
            2 => StreamStatus::Closing,
            _ => StreamStatus::Closed,
        }
    }

    /// Check whether writes are refused in this state.
    pub fn is_shut(self) -> bool {
        matches!(self, StreamStatus::Closing | StreamStatus::Closed)
    }
}

/// State shared between the writer and reader halves.
#[derive(Debug)]
pub(crate) struct SharedState {
    status: AtomicU8,
    ready: AtomicBool,
}

impl SharedState {
    pub(crate) fn new() -> Self {
        Self {
            status: AtomicU8::new(StreamStatus::Unconfigured as u8),
            ready: AtomicBool::new(false),
        }
    }

    pub(crate) fn status(&self) -> StreamStatus {
        StreamStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// Transition `from -> to`; returns whether the transition happened.
    pub(crate) fn transition(&self, from: StreamStatus, to: StreamStatus) -> bool {
        self.status
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub(crate) fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }
}

/// Cloneable handle to the advisory readiness flag.
///
/// The transport collaborator sets it once its connection handshake
/// succeeds and clears it on failure; callers poll it before writing.
/// This is a cooperative contract, not an enforced invariant.
#[derive(Debug, Clone)]
pub struct Readiness {
    shared: Arc<SharedState>,
}

impl Readiness {
    pub(crate) fn new(shared: Arc<SharedState>) -> Self {
        Self { shared }
    }

    /// Mark the stream ready or not ready for writes.
    pub fn set(&self, ready: bool) {
        self.shared.set_ready(ready);
    }

    /// Check the current advisory readiness.
    pub fn is_ready(&self) -> bool {
        self.shared.is_ready()
    }
}
