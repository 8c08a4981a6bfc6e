//! Wire layout for serialized frames.
//!
//! Layout per frame (all integers big-endian):
//!
//! ```text
//! offset 0   total_len    u32   length of the entire frame
//! offset 4   headers_len  u32   length of the header block
//! offset 8   prelude_crc  u32   CRC-32 of bytes 0..8
//! offset 12  header block       headers_len bytes
//!            payload
//!            signature          sig_len bytes
//!            sig_len      u16
//!            frame_crc    u32   CRC-32 of every preceding frame byte
//! ```
//!
//! `sig_len` trails the signature so a decoder can locate the trailer
//! from the frame end; the payload length is whatever remains between
//! the header block and the trailer.
//!
//! Header entry: `name_len u8 | name | value_tag u8 | value`.
//!
//! The signature is computed over the header block and payload only; the
//! prelude and trailer are excluded so both can be assembled after
//! signing. The exact offsets here are the shared protocol definition
//! the paired decoder relies on.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::WireError;
use crate::frame::Frame;
use crate::header::{HeaderSet, HeaderValue, MAX_NAME_LEN, MAX_VALUE_LEN};

/// Length of the fixed frame prelude.
pub const PRELUDE_LEN: usize = 12;

/// Length of the trailing frame CRC.
pub const CRC_LEN: usize = 4;

/// Header value tags on the wire.
pub mod tag {
    pub const BOOL_TRUE: u8 = 0;
    pub const BOOL_FALSE: u8 = 1;
    pub const INT64: u8 = 2;
    pub const BYTES: u8 = 3;
    pub const STRING: u8 = 4;
    pub const TIMESTAMP: u8 = 5;
}

/// Encode the header block for a header set.
pub fn encode_headers(headers: &HeaderSet) -> Result<Vec<u8>, WireError> {
    let mut buf = Vec::new();
    for header in headers {
        let name = header.name().as_bytes();
        if name.len() > MAX_NAME_LEN {
            return Err(WireError::NameTooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        buf.put_u8(name.len() as u8);
        buf.put_slice(name);

        match header.value() {
            HeaderValue::Bool(true) => buf.put_u8(tag::BOOL_TRUE),
            HeaderValue::Bool(false) => buf.put_u8(tag::BOOL_FALSE),
            HeaderValue::Int64(n) => {
                buf.put_u8(tag::INT64);
                buf.put_i64(*n);
            }
            HeaderValue::Bytes(b) => {
                if b.len() > MAX_VALUE_LEN {
                    return Err(WireError::ValueTooLong {
                        len: b.len(),
                        max: MAX_VALUE_LEN,
                    });
                }
                buf.put_u8(tag::BYTES);
                buf.put_u16(b.len() as u16);
                buf.put_slice(b);
            }
            HeaderValue::String(s) => {
                if s.len() > MAX_VALUE_LEN {
                    return Err(WireError::ValueTooLong {
                        len: s.len(),
                        max: MAX_VALUE_LEN,
                    });
                }
                buf.put_u8(tag::STRING);
                buf.put_u16(s.len() as u16);
                buf.put_slice(s.as_bytes());
            }
            HeaderValue::Timestamp(millis) => {
                buf.put_u8(tag::TIMESTAMP);
                buf.put_i64(*millis);
            }
        }
    }
    Ok(buf)
}

/// Bytes the frame signature is computed over: header block || payload.
pub fn sign_input(headers: &HeaderSet, payload: &[u8]) -> Result<Vec<u8>, WireError> {
    let mut buf = encode_headers(headers)?;
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Serialize a complete signed frame to wire bytes.
pub fn encode_frame(frame: &Frame) -> Result<Bytes, WireError> {
    let header_block = encode_headers(&frame.headers)?;
    let sig_len = frame.signature.len();
    if sig_len > u16::MAX as usize {
        return Err(WireError::SignatureTooLong {
            len: sig_len,
            max: u16::MAX as usize,
        });
    }

    let total_len = PRELUDE_LEN + header_block.len() + frame.payload.len() + 2 + sig_len + CRC_LEN;
    if u32::try_from(total_len).is_err() {
        return Err(WireError::FrameTooLong(total_len));
    }

    let mut buf = BytesMut::with_capacity(total_len);
    buf.put_u32(total_len as u32);
    buf.put_u32(header_block.len() as u32);
    buf.put_u32(crc32fast::hash(&buf[..8]));
    buf.put_slice(&header_block);
    buf.put_slice(&frame.payload);
    buf.put_slice(frame.signature.as_bytes());
    buf.put_u16(sig_len as u16);
    buf.put_u32(crc32fast::hash(&buf[..]));

    Ok(buf.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::Header;
    use crate::signer::Signature;
    use proptest::prelude::*;

    fn sample_frame() -> Frame {
        let headers = HeaderSet::new().with(Header::string("k", "v"));
        Frame::new(headers, b"HELLO".to_vec(), Signature::from_bytes(vec![0xaa; 32]))
    }

    #[test]
    fn test_prelude_layout() {
        let frame = sample_frame();
        let bytes = encode_frame(&frame).unwrap();

        let total = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
        let headers_len = u32::from_be_bytes(bytes[4..8].try_into().unwrap()) as usize;
        let prelude_crc = u32::from_be_bytes(bytes[8..12].try_into().unwrap());

        assert_eq!(total, bytes.len());
        // "k" = name_len(1) + name(1) + tag(1) + value_len(2) + value(1)
        assert_eq!(headers_len, 6);
        assert_eq!(prelude_crc, crc32fast::hash(&bytes[..8]));
    }

    #[test]
    fn test_header_entry_layout() {
        let frame = sample_frame();
        let bytes = encode_frame(&frame).unwrap();

        let block = &bytes[PRELUDE_LEN..PRELUDE_LEN + 6];
        assert_eq!(block, &[1, b'k', tag::STRING, 0, 1, b'v']);
    }

    #[test]
    fn test_signature_trailer_and_crc() {
        let frame = sample_frame();
        let bytes = encode_frame(&frame).unwrap();

        let payload_at = PRELUDE_LEN + 6;
        assert_eq!(&bytes[payload_at..payload_at + 5], b"HELLO");

        let sig_len_at = bytes.len() - CRC_LEN - 2;
        let sig_len =
            u16::from_be_bytes(bytes[sig_len_at..sig_len_at + 2].try_into().unwrap()) as usize;
        assert_eq!(sig_len, 32);
        assert_eq!(&bytes[sig_len_at - 32..sig_len_at], &[0xaa; 32][..]);

        let crc_at = bytes.len() - CRC_LEN;
        let frame_crc = u32::from_be_bytes(bytes[crc_at..].try_into().unwrap());
        assert_eq!(frame_crc, crc32fast::hash(&bytes[..crc_at]));
    }

    #[test]
    fn test_sign_input_is_headers_plus_payload() {
        let frame = sample_frame();
        let input = sign_input(&frame.headers, &frame.payload).unwrap();
        let bytes = encode_frame(&frame).unwrap();

        // The signed region sits between the prelude and the trailer.
        assert_eq!(&bytes[PRELUDE_LEN..PRELUDE_LEN + input.len()], &input[..]);
        assert_eq!(input.len(), 6 + 5);
    }

    #[test]
    fn test_all_value_kinds_encode() {
        let headers = HeaderSet::new()
            .with(Header::bool("yes", true))
            .with(Header::bool("no", false))
            .with(Header::int64("count", -42))
            .with(Header::bytes("blob", vec![1, 2, 3]))
            .with(Header::timestamp("at", 1736870400000));
        let block = encode_headers(&headers).unwrap();

        // yes: 1+3+1, no: 1+2+1, count: 1+5+1+8, blob: 1+4+1+2+3, at: 1+2+1+8
        assert_eq!(block.len(), 5 + 4 + 15 + 11 + 12);
        assert_eq!(block[4], tag::BOOL_TRUE);
    }

    #[test]
    fn test_name_too_long_rejected() {
        let headers = HeaderSet::new().with(Header::bool("x".repeat(256), true));
        assert!(matches!(
            encode_headers(&headers),
            Err(WireError::NameTooLong { len: 256, .. })
        ));
    }

    #[test]
    fn test_value_too_long_rejected() {
        let headers = HeaderSet::new().with(Header::bytes("big", vec![0u8; 65536]));
        assert!(matches!(
            encode_headers(&headers),
            Err(WireError::ValueTooLong { len: 65536, .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_total_length_field_matches(payload in proptest::collection::vec(any::<u8>(), 0..512)) {
            let headers = HeaderSet::new().with(Header::int64("seq", 1));
            let frame = Frame::new(headers, payload, Signature::from_bytes(vec![0x55; 32]));
            let bytes = encode_frame(&frame).unwrap();
            let total = u32::from_be_bytes(bytes[0..4].try_into().unwrap()) as usize;
            prop_assert_eq!(total, bytes.len());
        }
    }
}
