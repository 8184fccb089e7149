//! Recursive-length-prefix encoding of canonical transaction fields.
//!
//! Only the encoding direction is implemented. The output is byte-compatible
//! with the RLP used by Ethereum-family nodes, so a digest over it can be
//! compared against the hashes those nodes report.

use alloy::primitives::{
    Address,
    U256,
};

/// Offset of the short byte-string prefix (`0x80 + len`).
const STRING_OFFSET: u8 = 0x80;
/// Offset of the short list prefix (`0xc0 + len`).
const LIST_OFFSET: u8 = 0xc0;
/// Longest payload that still fits a single-byte prefix.
const SHORT_PAYLOAD_MAX: usize = 55;

/// A single element of the encoding tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<'a> {
    /// Unsigned integer, encoded as a minimal big-endian string.
    Uint(u64),
    /// Arbitrary-precision unsigned integer, encoded as a minimal big-endian string.
    BigUint(U256),
    /// Raw byte string.
    Bytes(&'a [u8]),
    /// Explicitly absent value. Encodes as the empty string.
    Null,
    /// Nested sequence of nodes.
    List(Vec<Node<'a>>),
}

impl<'a> Node<'a> {
    /// Present addresses become a 20-byte string, absent ones become [`Node::Null`].
    pub fn address(address: Option<&'a Address>) -> Self {
        match address {
            Some(address) => Node::Bytes(address.as_slice()),
            None => Node::Null,
        }
    }

    /// Append the encoding of this node to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Node::Uint(value) => {
                let bytes = value.to_be_bytes();
                encode_string(trim_leading_zeros(&bytes), out);
            }
            Node::BigUint(value) => {
                let bytes = value.to_be_bytes::<32>();
                encode_string(trim_leading_zeros(&bytes), out);
            }
            Node::Bytes(bytes) => encode_string(bytes, out),
            Node::Null => encode_string(&[], out),
            Node::List(children) => {
                let mut payload = Vec::new();
                for child in children {
                    child.encode(&mut payload);
                }
                encode_header(LIST_OFFSET, payload.len(), out);
                out.extend_from_slice(&payload);
            }
        }
    }

    /// Encode this node into a fresh buffer.
    pub fn encoded(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

/// Encode `nodes` as a single top-level list.
pub fn encode_list(nodes: &[Node<'_>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for node in nodes {
        node.encode(&mut payload);
    }

    let mut out = Vec::with_capacity(payload.len() + 9);
    encode_header(LIST_OFFSET, payload.len(), &mut out);
    out.extend_from_slice(&payload);
    out
}

fn encode_string(bytes: &[u8], out: &mut Vec<u8>) {
    if bytes.len() == 1 && bytes[0] < STRING_OFFSET {
        out.push(bytes[0]);
        return;
    }
    encode_header(STRING_OFFSET, bytes.len(), out);
    out.extend_from_slice(bytes);
}

/// Short payloads get `offset + len`; long ones get `offset + 55 + len(len)`
/// followed by the big-endian length.
#[allow(clippy::cast_possible_truncation)]
fn encode_header(offset: u8, payload_len: usize, out: &mut Vec<u8>) {
    if payload_len <= SHORT_PAYLOAD_MAX {
        out.push(offset + payload_len as u8);
        return;
    }
    let len_bytes = (payload_len as u64).to_be_bytes();
    let len_bytes = trim_leading_zeros(&len_bytes);
    out.push(offset + SHORT_PAYLOAD_MAX as u8 + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
}

fn trim_leading_zeros(bytes: &[u8]) -> &[u8] {
    let first = bytes
        .iter()
        .position(|byte| *byte != 0)
        .unwrap_or(bytes.len());
    &bytes[first..]
}
