//! Chained frame signing.
//!
//! Every frame is signed over its serialized header block and payload
//! together with the previous frame's signature, forming an unbroken
//! chain from the seed tag onward. The signer itself is a capability:
//! the engine treats it as opaque and never retries a rejected frame.

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;

use bytes::Bytes;

use crate::error::SignError;

/// Domain-separation prefix mixed into every chained sign input.
pub const CHAIN_SIGN_DOMAIN: &[u8] = b"frameseal/chain-sig/v1";

/// A variable-length authentication tag.
///
/// 32 bytes for the keyed MAC signers, 64 bytes for Ed25519. The seed
/// signature configured before the first frame may be any length,
/// including empty.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Bytes);

impl Signature {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// The empty signature (used as a neutral seed).
    pub fn empty() -> Self {
        Self(Bytes::new())
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the signature is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse from hex string.
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        Ok(Self(hex::decode(s)?.into()))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        let head = &hex[..hex.len().min(16)];
        write!(f, "Signature({head})")
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Signature {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes.into())
    }
}

impl From<[u8; 32]> for Signature {
    fn from(bytes: [u8; 32]) -> Self {
        Self(Bytes::copy_from_slice(&bytes))
    }
}

impl From<[u8; 64]> for Signature {
    fn from(bytes: [u8; 64]) -> Self {
        Self(Bytes::copy_from_slice(&bytes))
    }
}

/// Mutable chain state: the prior frame's signature.
///
/// Advanced only after a successful sign; never on failure. Exactly one
/// writer (the producer) mutates it.
#[derive(Debug, Clone)]
pub struct ChainState {
    prior: Signature,
}

impl ChainState {
    /// Start a chain from a seed signature.
    pub fn new(seed: Signature) -> Self {
        Self { prior: seed }
    }

    /// The signature the next frame chains from.
    pub fn prior(&self) -> &Signature {
        &self.prior
    }

    /// Advance the chain past a successfully signed frame.
    pub fn advance(&mut self, next: Signature) {
        self.prior = next;
    }
}

/// Capability that computes a chained authentication tag for one frame.
///
/// `frame_bytes` is the serialized header block plus payload; `prior` is
/// the previous frame's tag (or the configured seed for the first frame).
pub trait FrameSigner: Send + Sync {
    /// Sign the serialized frame bytes, chaining from the prior signature.
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError>;
}

/// Keyed Blake3 MAC signer.
///
/// Computes `keyed_hash(key, domain || prior || frame_bytes)`, yielding a
/// 32-byte tag. Deterministic: the same key, seed, and write sequence
/// reproduce the same chain bit-for-bit.
pub struct Blake3ChainSigner {
    key: [u8; 32],
}

impl Blake3ChainSigner {
    /// Create a signer from a 32-byte MAC key.
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }
}

impl FrameSigner for Blake3ChainSigner {
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError> {
        let mut hasher = blake3::Hasher::new_keyed(&self.key);
        hasher.update(CHAIN_SIGN_DOMAIN);
        hasher.update(prior.as_bytes());
        hasher.update(frame_bytes);
        Ok(Signature::from(*hasher.finalize().as_bytes()))
    }
}

/// Ed25519 signer over `domain || prior || frame_bytes`.
///
/// Ed25519 signatures are deterministic, so this signer also produces
/// reproducible chains.
pub struct Ed25519FrameSigner {
    keypair: Keypair,
}

impl Ed25519FrameSigner {
    /// Create a signer from a keypair.
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The public key frames signed by this signer verify against.
    pub fn public_key(&self) -> Ed25519PublicKey {
        self.keypair.public_key()
    }
}

impl FrameSigner for Ed25519FrameSigner {
    fn sign(&self, frame_bytes: &[u8], prior: &Signature) -> Result<Signature, SignError> {
        Ok(self.keypair.sign(&chain_message(frame_bytes, prior)))
    }
}

/// Build the message an Ed25519 chain signature covers.
pub fn chain_message(frame_bytes: &[u8], prior: &Signature) -> Vec<u8> {
    let mut message =
        Vec::with_capacity(CHAIN_SIGN_DOMAIN.len() + prior.len() + frame_bytes.len());
    message.extend_from_slice(CHAIN_SIGN_DOMAIN);
    message.extend_from_slice(prior.as_bytes());
    message.extend_from_slice(frame_bytes);
    message
}

/// A 32-byte Ed25519 public key.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ed25519PublicKey(pub [u8; 32]);

impl Ed25519PublicKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Verify a chained frame signature.
    pub fn verify_chain(
        &self,
        frame_bytes: &[u8],
        prior: &Signature,
        signature: &Signature,
    ) -> Result<(), SignError> {
        let key = VerifyingKey::from_bytes(&self.0)
            .map_err(|_| SignError::Rejected("invalid public key".into()))?;
        let sig_bytes: [u8; 64] = signature
            .as_bytes()
            .try_into()
            .map_err(|_| SignError::Rejected("signature is not 64 bytes".into()))?;
        let sig = ed25519_dalek::Signature::from_bytes(&sig_bytes);

        key.verify(&chain_message(frame_bytes, prior), &sig)
            .map_err(|_| SignError::Rejected("signature verification failed".into()))
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Pub({})", &self.to_hex()[..16])
    }
}

/// A keypair for chained frame signing.
///
/// Wraps ed25519-dalek's `SigningKey`.
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keypair({:?})", self.public_key())
    }
}
