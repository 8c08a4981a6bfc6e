//! Producer/consumer demo: stream synthetic audio chunks through the
//! encoder and decode the signed frames on the other side.
//!
//! Run with `cargo run --example stream_pipeline`.

use std::io::Read as _;
use std::sync::Arc;
use std::thread;

use frameseal::{pair, EncoderConfig};
use frameseal_core::{Blake3ChainSigner, Signature};
use frameseal_testkit::{decode_frames, fixtures};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    let (mut writer, mut reader) = pair(EncoderConfig {
        accumulator_capacity: 1024,
        channel_capacity: None,
    });
    writer.set_signature_seed(Signature::empty());
    writer.set_headers(fixtures::audio_headers());
    writer.set_signer(Arc::new(Blake3ChainSigner::new([0x42; 32])));

    // A transport would flip this after its connection handshake.
    let readiness = reader.readiness();
    readiness.set(true);

    let producer = thread::spawn(move || {
        let chunk = vec![0x55u8; 480];
        for _ in 0..20 {
            writer.append(&chunk).expect("append");
        }
        writer.close().expect("close");
    });

    let mut wire = Vec::new();
    reader.read_to_end(&mut wire).expect("read");
    producer.join().expect("producer thread");

    let frames = decode_frames(&wire).expect("decode");
    println!(
        "streamed {} wire bytes as {} signed frames",
        wire.len(),
        frames.len()
    );
    for (i, frame) in frames.iter().enumerate() {
        println!(
            "  frame {i}: {} payload bytes, signature {}",
            frame.payload.len(),
            &frame.signature.to_hex()[..16]
        );
    }
}
