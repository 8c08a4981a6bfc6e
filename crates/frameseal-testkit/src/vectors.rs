//! Golden vectors for cross-implementation verification.
//!
//! Every implementation of the frame protocol must produce identical:
//! - sign input bytes
//! - stub chain signature
//! - wire bytes

use serde::Serialize;

use frameseal_core::{encode_frame, sign_input, Frame, FrameSigner, Header, HeaderSet, Signature};

use crate::signers::StubSigner;

/// A single golden vector.
#[derive(Debug, Clone, Serialize)]
pub struct GoldenVector {
    pub name: String,
    pub description: String,

    // Inputs
    pub seed: String,           // hex
    pub headers: Vec<String>,   // "name=value" renderings
    pub payload: String,        // hex

    // Derived outputs (all hex)
    pub sign_input: String,
    pub signature: String,
    pub wire: String,
}

/// Generate a golden vector from inputs under the stub signer.
fn generate_vector(
    name: &str,
    description: &str,
    seed: &Signature,
    headers: HeaderSet,
    payload: &[u8],
) -> GoldenVector {
    let input = sign_input(&headers, payload).expect("vector inputs are within wire limits");
    let signature = StubSigner
        .sign(&input, seed)
        .expect("stub signer never fails");
    let frame = Frame::new(headers.clone(), payload.to_vec(), signature.clone());
    let wire = encode_frame(&frame).expect("vector frames encode");

    GoldenVector {
        name: name.to_string(),
        description: description.to_string(),
        seed: seed.to_hex(),
        headers: headers
            .iter()
            .map(|h| format!("{}={:?}", h.name(), h.value()))
            .collect(),
        payload: hex::encode(payload),
        sign_input: hex::encode(&input),
        signature: signature.to_hex(),
        wire: hex::encode(&wire),
    }
}

/// Generate the full vector set.
pub fn generate_all_vectors() -> Vec<GoldenVector> {
    let seed = Signature::from_bytes(b"golden-seed".to_vec());

    let mut vectors = vec![
        generate_vector(
            "no_headers",
            "Payload only, no headers",
            &seed,
            HeaderSet::new(),
            b"hello world",
        ),
        generate_vector(
            "single_string_header",
            "A single k=v header wrapping HELLO",
            &seed,
            HeaderSet::new().with(Header::string("k", "v")),
            b"HELLO",
        ),
        generate_vector(
            "every_value_kind",
            "One header of each wire value tag",
            &seed,
            HeaderSet::new()
                .with(Header::bool("flag", true))
                .with(Header::bool("off", false))
                .with(Header::int64("count", -42))
                .with(Header::bytes("blob", vec![0xde, 0xad, 0xbe, 0xef]))
                .with(Header::string("name", "frameseal"))
                .with(Header::timestamp("at", 1736870400000)),
            b"typed",
        ),
        generate_vector(
            "empty_seed",
            "Chain anchored at the empty signature",
            &Signature::empty(),
            HeaderSet::new().with(Header::string("event-type", "AudioEvent")),
            b"\x00\x01\x02\x03",
        ),
        generate_vector(
            "binary_payload",
            "Payload containing all 256 byte values",
            &seed,
            HeaderSet::new(),
            &(0u8..=255).collect::<Vec<u8>>(),
        ),
    ];

    // A chained pair: the second frame signs against the first's tag.
    let first = generate_vector(
        "chain_first",
        "First frame of a two-frame chain",
        &seed,
        HeaderSet::new(),
        b"first",
    );
    let prior = Signature::from_hex(&first.signature).expect("vector signature is valid hex");
    let second = generate_vector(
        "chain_second",
        "Second frame, chained from chain_first",
        &prior,
        HeaderSet::new(),
        b"second",
    );
    vectors.push(first);
    vectors.push(second);

    vectors
}
