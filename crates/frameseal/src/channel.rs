//! Bounded byte handoff between the writer and reader halves.
//!
//! Single producer, single consumer. The producer appends whole frames
//! with [`TransferChannel::put`]; the consumer takes everything at once
//! with [`TransferChannel::drain`]. A full channel blocks the producer
//! instead of growing or dropping. The EOF flag lives here so the
//! empty-and-EOF check happens under the same lock as the buffer.

use std::sync::{Condvar, Mutex};

use crate::error::EncodeError;

/// Bounded byte buffer guarded by one mutex and one condition variable.
#[derive(Debug)]
pub struct TransferChannel {
    inner: Mutex<Inner>,
    signal: Condvar,
    capacity: usize,
}

#[derive(Debug)]
struct Inner {
    buf: Vec<u8>,
    eof: bool,
}

impl TransferChannel {
    /// Create a channel holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                buf: Vec::with_capacity(capacity),
                eof: false,
            }),
            signal: Condvar::new(),
            capacity,
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.lock().buf.len()
    }

    /// Check whether the channel is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().buf.is_empty()
    }

    /// Check whether EOF has been flagged.
    pub fn is_eof(&self) -> bool {
        self.lock().eof
    }

    /// Append `bytes` after the current content, blocking while the
    /// remaining capacity is insufficient.
    ///
    /// Bytes larger than the total capacity can never fit and fail fast
    /// instead of deadlocking the producer.
    pub fn put(&self, bytes: &[u8]) -> Result<(), EncodeError> {
        if bytes.len() > self.capacity {
            return Err(EncodeError::FrameTooLarge {
                len: bytes.len(),
                capacity: self.capacity,
            });
        }

        let mut inner = self.lock();
        while self.capacity - inner.buf.len() < bytes.len() {
            inner = self
                .signal
                .wait(inner)
                .expect("transfer channel lock poisoned");
        }
        inner.buf.extend_from_slice(bytes);
        drop(inner);

        self.signal.notify_one();
        Ok(())
    }

    /// Take the entire content as a snapshot, blocking while the channel
    /// is empty and EOF is unset.
    ///
    /// Returns `None` once EOF is set and every byte has been drained;
    /// from then on every call returns `None`.
    pub fn drain(&self) -> Option<Vec<u8>> {
        let mut inner = self.lock();
        while inner.buf.is_empty() && !inner.eof {
            inner = self
                .signal
                .wait(inner)
                .expect("transfer channel lock poisoned");
        }
        if inner.buf.is_empty() {
            return None;
        }

        let taken = std::mem::replace(&mut inner.buf, Vec::with_capacity(self.capacity));
        drop(inner);

        self.signal.notify_one();
        Some(taken)
    }

    /// Flag the end of the stream and wake the consumer.
    pub fn set_eof(&self) {
        self.lock().eof = true;
        self.signal.notify_all();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("transfer channel lock poisoned")
    }
}
