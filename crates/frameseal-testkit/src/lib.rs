//! # Frameseal Testkit
//!
//! Testing utilities for the frameseal encoder: deterministic and
//! failure-injecting signers, a minimal decode-side frame parser, shared
//! fixtures, and proptest generators.
//!
//! The production decoder belongs to the transport collaborator; the
//! parser here exists so tests can reassemble and verify what the
//! encoder emits.

pub mod decode;
pub mod fixtures;
pub mod generators;
pub mod signers;
pub mod vectors;

pub use decode::{decode_frame, decode_frames, verify_stub_chain, DecodedFrame};
pub use signers::{FailingSigner, RecordingSigner, StubSigner};
pub use vectors::{generate_all_vectors, GoldenVector};
