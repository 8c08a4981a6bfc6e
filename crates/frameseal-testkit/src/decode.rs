//! Minimal decode-side frame parser.
//!
//! The production decoder belongs to the transport collaborator; this
//! parser exists so tests can reassemble frames the encoder emitted and
//! verify payloads, headers, and the signature chain.

use bytes::Bytes;

use frameseal_core::header::{Header, HeaderSet, HeaderValue};
use frameseal_core::wire::{tag, CRC_LEN, PRELUDE_LEN};
use frameseal_core::{sign_input, FrameSigner, Signature, WireError};

use crate::signers::StubSigner;

/// A frame reconstructed from wire bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub headers: HeaderSet,
    pub payload: Bytes,
    pub signature: Signature,
}

/// Decode one frame from the front of `bytes`.
///
/// Returns the frame and the number of bytes consumed.
pub fn decode_frame(bytes: &[u8]) -> Result<(DecodedFrame, usize), WireError> {
    if bytes.len() < PRELUDE_LEN {
        return Err(WireError::Truncated {
            expected: PRELUDE_LEN,
            got: bytes.len(),
        });
    }

    let total = read_u32(bytes, 0) as usize;
    let headers_len = read_u32(bytes, 4) as usize;
    if read_u32(bytes, 8) != crc32fast::hash(&bytes[..8]) {
        return Err(WireError::PreludeCrcMismatch);
    }
    if bytes.len() < total {
        return Err(WireError::Truncated {
            expected: total,
            got: bytes.len(),
        });
    }

    let frame = &bytes[..total];
    let min = PRELUDE_LEN + headers_len + 2 + CRC_LEN;
    if total < min {
        return Err(WireError::Truncated {
            expected: min,
            got: total,
        });
    }
    if read_u32(frame, total - CRC_LEN) != crc32fast::hash(&frame[..total - CRC_LEN]) {
        return Err(WireError::FrameCrcMismatch);
    }

    let sig_len = u16::from_be_bytes([frame[total - CRC_LEN - 2], frame[total - CRC_LEN - 1]]) as usize;
    let trailer_len = sig_len + 2 + CRC_LEN;
    if PRELUDE_LEN + headers_len + trailer_len > total {
        return Err(WireError::Truncated {
            expected: PRELUDE_LEN + headers_len + trailer_len,
            got: total,
        });
    }

    let sig_start = total - trailer_len;
    let payload = &frame[PRELUDE_LEN + headers_len..sig_start];
    let headers = parse_headers(&frame[PRELUDE_LEN..PRELUDE_LEN + headers_len])?;

    Ok((
        DecodedFrame {
            headers,
            payload: Bytes::copy_from_slice(payload),
            signature: Signature::from_bytes(frame[sig_start..sig_start + sig_len].to_vec()),
        },
        total,
    ))
}

/// Decode a contiguous sequence of frames.
pub fn decode_frames(mut bytes: &[u8]) -> Result<Vec<DecodedFrame>, WireError> {
    let mut frames = Vec::new();
    while !bytes.is_empty() {
        let (frame, consumed) = decode_frame(bytes)?;
        frames.push(frame);
        bytes = &bytes[consumed..];
    }
    Ok(frames)
}

/// Verify that a decoded frame sequence carries an unbroken
/// [`StubSigner`] chain starting from `seed`.
pub fn verify_stub_chain(frames: &[DecodedFrame], seed: &Signature) -> bool {
    let mut prior = seed.clone();
    for frame in frames {
        let input = match sign_input(&frame.headers, &frame.payload) {
            Ok(input) => input,
            Err(_) => return false,
        };
        let expected = match StubSigner.sign(&input, &prior) {
            Ok(expected) => expected,
            Err(_) => return false,
        };
        if frame.signature != expected {
            return false;
        }
        prior = expected;
    }
    true
}

fn parse_headers(mut block: &[u8]) -> Result<HeaderSet, WireError> {
    let mut headers = HeaderSet::new();
    while !block.is_empty() {
        let name_len = block[0] as usize;
        block = &block[1..];
        if block.len() < name_len + 1 {
            return Err(WireError::MalformedHeaders("truncated header name".into()));
        }
        let name = std::str::from_utf8(&block[..name_len])
            .map_err(|_| WireError::InvalidUtf8)?
            .to_string();
        let value_tag = block[name_len];
        block = &block[name_len + 1..];

        let value = match value_tag {
            tag::BOOL_TRUE => HeaderValue::Bool(true),
            tag::BOOL_FALSE => HeaderValue::Bool(false),
            tag::INT64 => HeaderValue::Int64(read_i64(&mut block)?),
            tag::TIMESTAMP => HeaderValue::Timestamp(read_i64(&mut block)?),
            tag::BYTES => {
                let body = read_sized(&mut block)?;
                HeaderValue::Bytes(Bytes::copy_from_slice(body))
            }
            tag::STRING => {
                let body = read_sized(&mut block)?;
                HeaderValue::String(
                    std::str::from_utf8(body)
                        .map_err(|_| WireError::InvalidUtf8)?
                        .to_string(),
                )
            }
            other => return Err(WireError::UnknownTag(other)),
        };
        headers.push(Header::new(name, value));
    }
    Ok(headers)
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

fn read_i64(block: &mut &[u8]) -> Result<i64, WireError> {
    if block.len() < 8 {
        return Err(WireError::MalformedHeaders("truncated integer value".into()));
    }
    let (head, rest) = block.split_at(8);
    *block = rest;
    let mut arr = [0u8; 8];
    arr.copy_from_slice(head);
    Ok(i64::from_be_bytes(arr))
}

fn read_sized<'a>(block: &mut &'a [u8]) -> Result<&'a [u8], WireError> {
    if block.len() < 2 {
        return Err(WireError::MalformedHeaders("truncated value length".into()));
    }
    let len = u16::from_be_bytes([block[0], block[1]]) as usize;
    if block.len() < 2 + len {
        return Err(WireError::MalformedHeaders("truncated value body".into()));
    }
    let body = &block[2..2 + len];
    *block = &block[2 + len..];
    Ok(body)
}
