//! Live checks of canonical transaction hashing against a Polygon Edge node.
//!
//! Blocks are read twice, once over raw JSON-RPC ([`rpc::NodeClient`]) and
//! once through the `alloy` provider ([`typed::TypedClient`]). Both views are
//! normalized into [`source::ChainBlock`]s and compared by [`checks`], which
//! recomputes every transaction hash with [`edge_tx_hash`].
#![allow(clippy::missing_errors_doc)]
#![deny(clippy::panic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::unreachable)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![warn(clippy::indexing_slicing)]
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::indexing_slicing))]

pub mod checks;
pub mod config;
pub mod confirm;
pub mod error;
pub mod rpc;
pub mod source;
pub mod transfer;
pub mod typed;

pub use checks::{
    BlockReport,
    check_all_blocks,
    check_block,
    check_block_linkage,
    check_block_range,
    check_block_transactions,
};
pub use config::HarnessConfig;
pub use confirm::{
    ConfirmationPolicy,
    wait_for_confirmation,
};
pub use error::{
    HarnessError,
    Result,
};
pub use rpc::{
    NodeClient,
    NodeClientError,
};
pub use source::{
    BlockSource,
    ChainBlock,
    ChainTransaction,
};
pub use transfer::{
    TransferReport,
    build_transfer,
    run_transfer,
    submit_transfer,
};
pub use typed::TypedClient;
