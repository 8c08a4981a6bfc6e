//! Proptest strategies for protocol data types.

use bytes::Bytes;
use proptest::prelude::*;

use frameseal_core::{Header, HeaderSet, HeaderValue};

/// Strategy for header names within the wire limit.
pub fn arb_header_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,31}"
}

/// Strategy for any typed header value.
pub fn arb_header_value() -> impl Strategy<Value = HeaderValue> {
    prop_oneof![
        any::<bool>().prop_map(HeaderValue::Bool),
        any::<i64>().prop_map(HeaderValue::Int64),
        proptest::collection::vec(any::<u8>(), 0..64)
            .prop_map(|v| HeaderValue::Bytes(Bytes::from(v))),
        "[ -~]{0,48}".prop_map(HeaderValue::String),
        any::<i64>().prop_map(HeaderValue::Timestamp),
    ]
}

/// Strategy for a single header.
pub fn arb_header() -> impl Strategy<Value = Header> {
    (arb_header_name(), arb_header_value()).prop_map(|(name, value)| Header::new(name, value))
}

/// Strategy for a header set of up to eight entries.
pub fn arb_header_set() -> impl Strategy<Value = HeaderSet> {
    proptest::collection::vec(arb_header(), 0..8).prop_map(|headers| headers.into_iter().collect())
}

/// Strategy for payload bytes of up to `max` bytes.
pub fn arb_payload(max: usize) -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..max)
}
