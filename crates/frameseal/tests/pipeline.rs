//! End-to-end encoder tests driving the writer and reader halves from
//! separate threads, the way a transport integration does.

use std::io::Read as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use frameseal::{pair, EncoderConfig, FrameReader, FrameWriter, StreamStatus};
use frameseal_core::{FrameSigner, Header, HeaderSet};
use frameseal_testkit::{
    decode_frames, fixtures, verify_stub_chain, RecordingSigner, StubSigner,
};

fn configured_pair(
    accumulator_capacity: usize,
    channel_capacity: usize,
) -> (FrameWriter, FrameReader) {
    let (mut writer, reader) = pair(EncoderConfig {
        accumulator_capacity,
        channel_capacity: Some(channel_capacity),
    });
    writer.set_signature_seed(fixtures::seed_signature());
    writer.set_headers(HeaderSet::new());
    writer.set_signer(Arc::new(StubSigner));
    (writer, reader)
}

fn read_all(reader: &mut FrameReader) -> Vec<u8> {
    let mut wire = Vec::new();
    reader.read_to_end(&mut wire).expect("frame reads are infallible");
    wire
}

#[test]
fn reassembly_reproduces_written_bytes() {
    let (mut writer, mut reader) = configured_pair(256, 512);
    let original = fixtures::pattern_bytes(10_000);

    let consumer = thread::spawn(move || read_all(&mut reader));

    // Odd-sized chunks so frame cuts never line up with write boundaries.
    for chunk in original.chunks(700) {
        writer.append(chunk).unwrap();
    }
    writer.close().unwrap();

    let wire = consumer.join().unwrap();
    let frames = decode_frames(&wire).unwrap();
    assert!(frames.len() > original.len() / 256);

    let reassembled: Vec<u8> = frames
        .iter()
        .flat_map(|f| f.payload.iter().copied())
        .collect();
    assert_eq!(reassembled, original);
    assert!(verify_stub_chain(&frames, &fixtures::seed_signature()));
}

#[test]
fn chain_is_reproducible_bit_for_bit() {
    let run = || {
        let (mut writer, mut reader) = configured_pair(32, 4096);
        writer.append(&fixtures::pattern_bytes(100)).unwrap();
        writer
            .finalize(&HeaderSet::new().with(Header::int64("mark", 1)))
            .unwrap();
        writer.append(b"coda").unwrap();
        writer.close().unwrap();

        decode_frames(&read_all(&mut reader))
            .unwrap()
            .into_iter()
            .map(|f| f.signature.to_hex())
            .collect::<Vec<_>>()
    };

    let first = run();
    let second = run();
    assert!(!first.is_empty());
    assert_eq!(first, second);
}

#[test]
fn eof_is_idempotent_after_full_drain() {
    let (mut writer, mut reader) = configured_pair(16, 4096);
    writer.append(b"last words").unwrap();
    writer.close().unwrap();

    let wire = read_all(&mut reader);
    assert!(!wire.is_empty());
    assert_eq!(reader.status(), StreamStatus::Closed);

    let mut buf = [0u8; 64];
    for _ in 0..100 {
        assert_eq!(reader.read(&mut buf), 0);
    }
    assert_eq!(reader.status(), StreamStatus::Closed);
}

#[test]
fn full_channel_blocks_writer_until_reader_drains() {
    // Channel sized to hold one empty-header frame (64 + 50 overhead)
    // but not two.
    let (mut writer, mut reader) = configured_pair(64, 150);

    let second_done = Arc::new(AtomicBool::new(false));
    let producer = {
        let second_done = Arc::clone(&second_done);
        thread::spawn(move || {
            writer.append(&[1u8; 64]).unwrap();
            writer.finalize(&HeaderSet::new()).unwrap();

            writer.append(&[2u8; 64]).unwrap();
            writer.finalize(&HeaderSet::new()).unwrap();
            second_done.store(true, Ordering::SeqCst);

            writer.close().unwrap();
        })
    };

    // The second finalize must stay blocked while nothing drains.
    thread::sleep(Duration::from_millis(100));
    assert!(!second_done.load(Ordering::SeqCst));

    // Draining frees capacity; the writer finishes within a bounded wait.
    let wire = read_all(&mut reader);
    let deadline = Instant::now() + Duration::from_secs(2);
    while !second_done.load(Ordering::SeqCst) {
        assert!(Instant::now() < deadline, "writer never unblocked");
        thread::sleep(Duration::from_millis(5));
    }
    producer.join().unwrap();

    let frames = decode_frames(&wire).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(&frames[0].payload[..], &[1u8; 64][..]);
    assert_eq!(&frames[1].payload[..], &[2u8; 64][..]);
}

#[test]
fn seek_fails_in_every_state() {
    use std::io::{Seek, SeekFrom};

    let (mut writer, mut reader) = pair(EncoderConfig::default());
    assert!(writer.seek(SeekFrom::Start(0)).is_err());
    assert!(reader.seek(SeekFrom::End(0)).is_err());

    let (mut writer2, mut reader2) = configured_pair(16, 4096);
    writer2.append(b"data").unwrap();
    assert!(writer2.seek(SeekFrom::Current(1)).is_err());
    writer2.close().unwrap();
    assert!(writer2.seek(SeekFrom::Start(0)).is_err());
    assert!(reader2.seek(SeekFrom::Start(0)).is_err());
}

#[test]
fn concrete_scenario_hello_then_twenty_bytes() {
    let seed = fixtures::seed_signature();
    let (mut writer, mut reader) = pair(EncoderConfig {
        accumulator_capacity: 16,
        channel_capacity: Some(4096),
    });
    let recorder = Arc::new(RecordingSigner::new());
    writer.set_signature_seed(seed.clone());
    writer.set_headers(HeaderSet::new());
    writer.set_signer(Arc::clone(&recorder) as Arc<dyn FrameSigner>);

    writer.append(b"HELLO").unwrap();
    writer
        .finalize(&HeaderSet::new().with(Header::string("k", "v")))
        .unwrap();

    writer.append(b"ABCDEFGHIJKLMNOPQRST").unwrap();
    assert_eq!(writer.pending(), 4);
    writer.close().unwrap();

    let frames = decode_frames(&read_all(&mut reader)).unwrap();
    assert_eq!(frames.len(), 3);

    assert_eq!(
        frames[0].headers.get("k").and_then(|v| v.as_str()),
        Some("v")
    );
    assert_eq!(&frames[0].payload[..], b"HELLO");
    assert_eq!(&frames[1].payload[..], b"ABCDEFGHIJKLMNOP");
    assert_eq!(&frames[2].payload[..], b"QRST");

    // First frame signed against the seed, each following frame against
    // its predecessor's signature.
    let calls = recorder.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[0].1, seed);
    assert_eq!(calls[1].1, frames[0].signature);
    assert_eq!(calls[2].1, frames[1].signature);
    assert!(verify_stub_chain(&frames, &seed));
}

#[test]
fn close_lets_buffered_frames_drain() {
    let (mut writer, mut reader) = configured_pair(16, 4096);
    writer.append(b"buffered").unwrap();
    writer.close().unwrap();
    assert_eq!(writer.status(), StreamStatus::Closing);

    // The reader still sees the frame that was in flight at close.
    let frames = decode_frames(&read_all(&mut reader)).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(&frames[0].payload[..], b"buffered");
    assert_eq!(reader.status(), StreamStatus::Closed);
}

#[test]
fn readiness_is_shared_between_halves() {
    let (writer, reader) = pair(EncoderConfig::default());
    let transport_view = reader.readiness();
    let caller_view = writer.readiness();

    assert!(!caller_view.is_ready());
    transport_view.set(true);
    assert!(caller_view.is_ready());
    transport_view.set(false);
    assert!(!caller_view.is_ready());
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Any chunking of a byte sequence reassembles exactly.
        #[test]
        fn prop_chunked_writes_reassemble(
            len in 0usize..2000,
            chunk in 1usize..97,
        ) {
            let original = fixtures::pattern_bytes(len);
            let (mut writer, mut reader) = configured_pair(48, 8192);

            for piece in original.chunks(chunk) {
                writer.append(piece).unwrap();
            }
            writer.close().unwrap();

            let frames = decode_frames(&read_all(&mut reader)).unwrap();
            let reassembled: Vec<u8> = frames
                .iter()
                .flat_map(|f| f.payload.iter().copied())
                .collect();
            prop_assert_eq!(reassembled, original);
            prop_assert!(verify_stub_chain(&frames, &fixtures::seed_signature()));
        }
    }
}
