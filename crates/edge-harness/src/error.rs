use std::time::Duration;

use alloy::primitives::B256;
use edge_tx_hash::AdapterError;
use thiserror::Error;

use crate::rpc::NodeClientError;

pub type Result<T, E = HarnessError> = std::result::Result<T, E>;

/// Top level error type for the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("node RPC error: {0}")]
    Node(#[from] NodeClientError),
    #[error("provider error: {0}")]
    Provider(#[from] alloy::transports::TransportError),
    #[error("transaction normalization failed: {0}")]
    Adapter(#[from] AdapterError),
    #[error("signer error: {0}")]
    Signer(#[from] alloy::signers::Error),
    #[error("{origin} returned an unusable value: {message}")]
    InvalidNodeValue {
        origin: &'static str,
        message: String,
    },
    #[error("{origin} has no block {number}")]
    BlockNotFound { origin: &'static str, number: u64 },
    #[error("{origin} returned block {number} without transaction bodies")]
    MissingTransactionBodies { origin: &'static str, number: u64 },
    #[error("{origin} block {number}: parent hash {actual} does not match previous block {expected}")]
    ParentHashMismatch {
        origin: &'static str,
        number: u64,
        expected: B256,
        actual: B256,
    },
    #[error("block {number}: rpc hash {rpc} != client hash {typed}")]
    BlockHashMismatch { number: u64, rpc: B256, typed: B256 },
    #[error("block {number}: rpc has {rpc} transactions, client has {typed}")]
    TransactionCountMismatch {
        number: u64,
        rpc: usize,
        typed: usize,
    },
    #[error("block {number} tx #{index}: rpc reports {rpc}, client reports {typed}")]
    ReportedHashMismatch {
        number: u64,
        index: usize,
        rpc: B256,
        typed: B256,
    },
    #[error("{origin} block {number} tx #{index}: reported {reported}, computed {computed}")]
    ComputedHashMismatch {
        origin: &'static str,
        number: u64,
        index: usize,
        reported: B256,
        computed: B256,
    },
    #[error("block {number} tx #{index}: sources disagree on the transaction record")]
    RecordMismatch { number: u64, index: usize },
    #[error("node accepted transaction as {returned}, computed {computed}")]
    SubmittedHashMismatch { returned: B256, computed: B256 },
    #[error("transaction {hash} is not in block {number}")]
    TransactionNotIncluded { hash: B256, number: u64 },
    #[error("transaction {hash} not confirmed after {waited:?}")]
    ConfirmationTimeout { hash: B256, waited: Duration },
}
