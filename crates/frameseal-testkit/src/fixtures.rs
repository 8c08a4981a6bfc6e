//! Shared fixtures for encoder tests.

use frameseal_core::{Header, HeaderSet, Signature};

/// Seed signature used across deterministic tests.
pub const SEED_HEX: &str = "f0e1d2c3b4a5968778695a4b3c2d1e0f";

/// The seed signature as bytes.
pub fn seed_signature() -> Signature {
    Signature::from_hex(SEED_HEX).expect("fixture seed is valid hex")
}

/// A realistic streaming header template.
pub fn audio_headers() -> HeaderSet {
    HeaderSet::new()
        .with(Header::string("content-type", "audio/wav"))
        .with(Header::string("event-type", "AudioEvent"))
}

/// A deterministic payload pattern of the given length.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
