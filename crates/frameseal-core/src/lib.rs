//! # Frameseal Core
//!
//! Pure primitives for frameseal: typed frame headers, the wire layout,
//! and the chained signing contract.
//!
//! This crate contains no I/O and no synchronization. It is pure
//! computation over protocol data structures.
//!
//! ## Key Types
//!
//! - [`Frame`] - One signed, header-plus-payload unit of the wire protocol
//! - [`HeaderSet`] - Ordered collection of typed frame headers
//! - [`FrameSigner`] - Capability computing a chained authentication tag
//! - [`ChainState`] - The prior signature carried between frames
//!
//! ## Wire Layout
//!
//! Frames serialize to a fixed prelude, a header block, the payload, a
//! signature trailer, and a trailing CRC. See [`wire`].

pub mod error;
pub mod frame;
pub mod header;
pub mod signer;
pub mod wire;

pub use error::{SignError, WireError};
pub use frame::Frame;
pub use header::{Header, HeaderSet, HeaderValue};
pub use signer::{
    Blake3ChainSigner, ChainState, Ed25519FrameSigner, Ed25519PublicKey, FrameSigner, Keypair,
    Signature,
};
pub use wire::{encode_frame, sign_input};
