//! Conversions from upstream transaction representations into a
//! [`TransactionRecord`](crate::TransactionRecord).
//!
//! Each source has its own module. The record and the encoder never know
//! where a record came from.

pub mod client;
pub mod rpc;

pub use client::{
    SignatureParts,
    from_envelope,
    from_legacy_parts,
    from_rpc_transaction,
    from_signed_legacy,
};
pub use rpc::RpcTransaction;
