use thiserror::Error;

/// Failure to normalize a source transaction into a
/// [`TransactionRecord`](crate::TransactionRecord).
///
/// Encoding and hashing a record cannot fail, so this is the only error the
/// crate produces.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("missing signature component `{0}`")]
    MissingSignature(&'static str),
    #[error("invalid hex in field `{field}`: {source}")]
    InvalidHex {
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },
    #[error("invalid quantity `{value}` in field `{field}`")]
    InvalidQuantity { field: &'static str, value: String },
    #[error("field `{field}` must be {expected} bytes, got {actual}")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("unsupported transaction type {0:#04x}")]
    UnsupportedType(u8),
}
