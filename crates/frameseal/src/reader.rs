//! Reader half of an encoder pair.

use std::io;
use std::sync::Arc;

use crate::channel::TransferChannel;
use crate::error::EncodeError;
use crate::state::{Readiness, SharedState, StreamStatus};

/// Consumer end of an encoder stream.
///
/// Serves wire-ready frame bytes in the exact order they were finalized.
/// The cursor is a staging area refilled by draining the transfer
/// channel; draining is what frees the producer to make progress.
pub struct FrameReader {
    cursor: Vec<u8>,
    pos: usize,
    channel: Arc<TransferChannel>,
    shared: Arc<SharedState>,
}

impl FrameReader {
    pub(crate) fn new(channel: Arc<TransferChannel>, shared: Arc<SharedState>) -> Self {
        Self {
            cursor: Vec::new(),
            pos: 0,
            channel,
            shared,
        }
    }

    /// Read up to `buf.len()` bytes, blocking while the stream is open
    /// and no bytes are available.
    ///
    /// Returns 0 once the stream is closed and fully drained; every
    /// subsequent call keeps returning 0.
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        if buf.is_empty() {
            return 0;
        }

        if self.pos >= self.cursor.len() {
            match self.channel.drain() {
                Some(bytes) => {
                    self.cursor = bytes;
                    self.pos = 0;
                }
                None => {
                    // EOF observed with empty channel and empty cursor.
                    self.shared
                        .transition(StreamStatus::Closing, StreamStatus::Closed);
                    return 0;
                }
            }
        }

        let n = buf.len().min(self.cursor.len() - self.pos);
        buf[..n].copy_from_slice(&self.cursor[self.pos..self.pos + n]);
        self.pos += n;
        n
    }

    /// Bytes buffered in the cursor, not yet handed to the caller.
    pub fn buffered(&self) -> usize {
        self.cursor.len() - self.pos
    }

    /// Current stream status.
    pub fn status(&self) -> StreamStatus {
        self.shared.status()
    }

    /// Handle to the advisory readiness flag.
    pub fn readiness(&self) -> Readiness {
        Readiness::new(Arc::clone(&self.shared))
    }
}

impl io::Read for FrameReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(FrameReader::read(self, buf))
    }
}

impl io::Seek for FrameReader {
    fn seek(&mut self, _pos: io::SeekFrom) -> io::Result<u64> {
        Err(io::Error::other(EncodeError::SeekUnsupported))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_over(channel: TransferChannel) -> FrameReader {
        FrameReader::new(Arc::new(channel), Arc::new(SharedState::new()))
    }

    #[test]
    fn test_read_serves_cursor_across_calls() {
        let channel = TransferChannel::new(64);
        channel.put(b"abcdef").unwrap();
        let mut reader = reader_over(channel);

        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf), 4);
        assert_eq!(&buf, b"abcd");
        assert_eq!(reader.buffered(), 2);

        assert_eq!(reader.read(&mut buf), 2);
        assert_eq!(&buf[..2], b"ef");
    }

    #[test]
    fn test_read_zero_at_eof_is_sticky() {
        let channel = TransferChannel::new(64);
        channel.put(b"xy").unwrap();
        channel.set_eof();
        let mut reader = reader_over(channel);

        let mut buf = [0u8; 8];
        assert_eq!(reader.read(&mut buf), 2);
        assert_eq!(reader.read(&mut buf), 0);
        assert_eq!(reader.read(&mut buf), 0);
    }

    #[test]
    fn test_empty_buf_reads_nothing() {
        let channel = TransferChannel::new(64);
        channel.put(b"data").unwrap();
        let mut reader = reader_over(channel);

        assert_eq!(reader.read(&mut []), 0);
        assert_eq!(reader.buffered(), 0);

        let mut buf = [0u8; 4];
        assert_eq!(reader.read(&mut buf), 4);
    }
}
