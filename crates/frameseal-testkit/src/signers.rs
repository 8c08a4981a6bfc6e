//! Deterministic signers for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use frameseal_core::{FrameSigner, SignError, Signature};

/// Deterministic stub signer: `blake3(frame_bytes || prior)`.
///
/// Produces a reproducible 32-byte chain for any fixed seed and write
/// sequence, with no key material.
pub struct StubSigner;

impl FrameSigner for StubSigner {
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(frame_bytes);
        hasher.update(prior.as_bytes());
        Ok(Signature::from(*hasher.finalize().as_bytes()))
    }
}

/// Signer that rejects exactly one sign call, delegating to [`StubSigner`]
/// otherwise.
///
/// Call numbering starts at 1; `fail_on(2)` succeeds, fails, then
/// succeeds again.
pub struct FailingSigner {
    fail_on: usize,
    calls: AtomicUsize,
}

impl FailingSigner {
    /// Fail the `n`-th sign call (1-indexed).
    pub fn fail_on(n: usize) -> Self {
        Self {
            fail_on: n,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every sign call.
    pub fn always() -> Self {
        Self::fail_on(0)
    }

    /// Number of sign calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FrameSigner for FailingSigner {
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on == 0 || call == self.fail_on {
            return Err(SignError::Rejected(format!("injected failure on call {call}")));
        }
        StubSigner.sign(frame_bytes, prior)
    }
}

/// Records every sign input while delegating to [`StubSigner`].
pub struct RecordingSigner {
    calls: Mutex<Vec<(Vec<u8>, Signature)>>,
}

impl RecordingSigner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }

    /// The `(frame_bytes, prior)` pairs seen so far, in call order.
    pub fn calls(&self) -> Vec<(Vec<u8>, Signature)> {
        self.calls.lock().expect("recording signer lock poisoned").clone()
    }
}

impl Default for RecordingSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSigner for RecordingSigner {
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError> {
        self.calls
            .lock()
            .expect("recording signer lock poisoned")
            .push((frame_bytes.to_vec(), prior.clone()));
        StubSigner.sign(frame_bytes, prior)
    }
}
