//! Canonical hashing of Polygon Edge style transactions.
//!
//! A [`TransactionRecord`] is laid out as an ordered list of [`rlp::Node`]s,
//! RLP-encoded, and hashed with legacy Keccak-256. The result matches the
//! hash the node reports, which lets a caller cross-check transactions read
//! through different client paths.
//!
//! ```
//! use edge_tx_hash::{TransactionRecord, TxType};
//! use alloy::primitives::{Address, U256};
//!
//! let record = TransactionRecord {
//!     gas_limit: 21_000,
//!     to: Some(Address::repeat_byte(0x01)),
//!     value: U256::from(1u64),
//!     tx_type: TxType::Legacy,
//!     ..Default::default()
//! };
//! println!("{}", record.hash());
//! ```

pub mod adapters;
mod error;
mod hasher;
pub mod hex;
mod record;
pub mod rlp;

pub use adapters::RpcTransaction;
pub use error::AdapterError;
pub use hasher::{
    DigestHasher,
    Keccak256,
};
pub use record::{
    TransactionRecord,
    TxType,
};
