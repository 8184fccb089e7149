//! Hex helpers for JSON-RPC quantities and data.

use alloy::primitives::{
    Address,
    B256,
    Bytes,
    U256,
};

use crate::error::AdapterError;

const ADDRESS_LEN: usize = 20;
const HASH_LEN: usize = 32;

pub fn encode_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes.as_ref()))
}

/// Strip a single leading `0x` or `0X`.
fn strip_0x(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Decode a hex string, ignoring one leading "0x" prefix if present.
///
/// # Errors
///
/// Returns an error if the input (after removing the prefix) is not valid hex.
pub fn decode_hex_trimmed_0x(value: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(strip_0x(value))
}

fn quantity_digits<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AdapterError> {
    let digits = strip_0x(value);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(AdapterError::InvalidQuantity {
            field,
            value: value.to_string(),
        });
    }
    Ok(digits)
}

/// Parse a hex quantity (`"0x5208"`) into a `u64`.
pub fn parse_u64(field: &'static str, value: &str) -> Result<u64, AdapterError> {
    let digits = quantity_digits(field, value)?;
    u64::from_str_radix(digits, 16).map_err(|_| {
        AdapterError::InvalidQuantity {
            field,
            value: value.to_string(),
        }
    })
}

/// Parse a hex quantity into a 256-bit integer.
pub fn parse_u256(field: &'static str, value: &str) -> Result<U256, AdapterError> {
    let digits = quantity_digits(field, value)?;
    U256::from_str_radix(digits, 16).map_err(|_| {
        AdapterError::InvalidQuantity {
            field,
            value: value.to_string(),
        }
    })
}

/// Parse arbitrary-length hex data. `"0x"` is the empty string.
pub fn parse_bytes(field: &'static str, value: &str) -> Result<Bytes, AdapterError> {
    decode_hex_trimmed_0x(value)
        .map(Bytes::from)
        .map_err(|source| AdapterError::InvalidHex { field, source })
}

pub fn parse_address(field: &'static str, value: &str) -> Result<Address, AdapterError> {
    let bytes = decode_hex_trimmed_0x(value)
        .map_err(|source| AdapterError::InvalidHex { field, source })?;
    if bytes.len() != ADDRESS_LEN {
        return Err(AdapterError::InvalidLength {
            field,
            expected: ADDRESS_LEN,
            actual: bytes.len(),
        });
    }
    Ok(Address::from_slice(&bytes))
}

pub fn parse_b256(field: &'static str, value: &str) -> Result<B256, AdapterError> {
    let bytes = decode_hex_trimmed_0x(value)
        .map_err(|source| AdapterError::InvalidHex { field, source })?;
    if bytes.len() != HASH_LEN {
        return Err(AdapterError::InvalidLength {
            field,
            expected: HASH_LEN,
            actual: bytes.len(),
        });
    }
    Ok(B256::from_slice(&bytes))
}
