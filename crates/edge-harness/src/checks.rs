//! Consistency checks between the JSON-RPC view and the client-library view
//! of the chain.
//!
//! Every check recomputes transaction hashes from the canonical encoding and
//! fails on the first divergence.

use alloy::primitives::B256;
use edge_tx_hash::TxType;
use tracing::{
    debug,
    info,
    warn,
};

use crate::{
    error::{
        HarnessError,
        Result,
    },
    source::{
        BlockSource,
        ChainBlock,
        ChainTransaction,
    },
};

/// Outcome of checking one block from both sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockReport {
    pub number: u64,
    pub hash: B256,
    /// Transactions whose recomputed hash matched on both sides.
    pub verified: usize,
    /// Transactions neither source could express as a canonical record.
    pub skipped: usize,
    pub transaction_hashes: Vec<B256>,
}

async fn fetch_block(source: &dyn BlockSource, number: u64) -> Result<ChainBlock> {
    source
        .block(number)
        .await?
        .ok_or(HarnessError::BlockNotFound {
            origin: source.name(),
            number,
        })
}

/// Walk blocks `0..count` from both sources and verify that each block's
/// parent hash is the previous block's hash and that both sources agree on
/// every block hash. Returns the walked block hashes.
pub async fn check_block_linkage(
    rpc: &dyn BlockSource,
    typed: &dyn BlockSource,
    count: u64,
) -> Result<Vec<B256>> {
    let mut expected_parent = B256::ZERO;
    let mut hashes = Vec::new();

    for number in 0..count {
        let rpc_block = fetch_block(rpc, number).await?;
        let typed_block = fetch_block(typed, number).await?;

        for block in [&rpc_block, &typed_block] {
            if block.parent_hash != expected_parent {
                return Err(HarnessError::ParentHashMismatch {
                    origin: block.origin,
                    number,
                    expected: expected_parent,
                    actual: block.parent_hash,
                });
            }
        }
        if rpc_block.hash != typed_block.hash {
            return Err(HarnessError::BlockHashMismatch {
                number,
                rpc: rpc_block.hash,
                typed: typed_block.hash,
            });
        }

        debug!(number, hash = %rpc_block.hash, "block linked");
        expected_parent = rpc_block.hash;
        hashes.push(rpc_block.hash);
    }

    info!(count, "block linkage verified");
    Ok(hashes)
}

fn verify_computed(block: &ChainBlock, index: usize, tx: &ChainTransaction) -> Result<()> {
    if let Some(record) = &tx.record {
        let computed = record.hash();
        if computed != tx.hash {
            return Err(HarnessError::ComputedHashMismatch {
                origin: block.origin,
                number: block.number,
                index,
                reported: tx.hash,
                computed,
            });
        }
    }
    Ok(())
}

/// Compare the same block as seen by both sources, recomputing every
/// transaction hash that has a canonical record.
pub fn check_block_transactions(rpc: &ChainBlock, typed: &ChainBlock) -> Result<BlockReport> {
    let number = rpc.number;
    if rpc.hash != typed.hash {
        return Err(HarnessError::BlockHashMismatch {
            number,
            rpc: rpc.hash,
            typed: typed.hash,
        });
    }
    if rpc.transactions.len() != typed.transactions.len() {
        return Err(HarnessError::TransactionCountMismatch {
            number,
            rpc: rpc.transactions.len(),
            typed: typed.transactions.len(),
        });
    }

    let mut report = BlockReport {
        number,
        hash: rpc.hash,
        verified: 0,
        skipped: 0,
        transaction_hashes: Vec::with_capacity(rpc.transactions.len()),
    };

    for (index, (rpc_tx, typed_tx)) in rpc.transactions.iter().zip(&typed.transactions).enumerate() {
        if rpc_tx.hash != typed_tx.hash {
            return Err(HarnessError::ReportedHashMismatch {
                number,
                index,
                rpc: rpc_tx.hash,
                typed: typed_tx.hash,
            });
        }
        report.transaction_hashes.push(rpc_tx.hash);

        match (&rpc_tx.record, &typed_tx.record) {
            (Some(rpc_record), Some(typed_record)) => {
                verify_computed(rpc, index, rpc_tx)?;
                verify_computed(typed, index, typed_tx)?;
                if rpc_record != typed_record {
                    return Err(HarnessError::RecordMismatch { number, index });
                }
                report.verified += 1;
            }
            (None, None) => {
                warn!(
                    number,
                    index,
                    tx_type = rpc_tx.tx_type,
                    hash = %rpc_tx.hash,
                    "transaction type has no canonical encoding, skipping"
                );
                report.skipped += 1;
            }
            // State transactions are only expressible over raw JSON-RPC.
            (Some(_), None) if rpc_tx.tx_type == TxType::State.as_byte() => {
                verify_computed(rpc, index, rpc_tx)?;
                report.verified += 1;
            }
            _ => return Err(HarnessError::RecordMismatch { number, index }),
        }
    }

    debug!(
        number,
        verified = report.verified,
        skipped = report.skipped,
        "block transactions verified"
    );
    Ok(report)
}

/// Fetch block `number` from both sources and check its transactions.
pub async fn check_block(
    rpc: &dyn BlockSource,
    typed: &dyn BlockSource,
    number: u64,
) -> Result<BlockReport> {
    let rpc_block = fetch_block(rpc, number).await?;
    let typed_block = fetch_block(typed, number).await?;
    check_block_transactions(&rpc_block, &typed_block)
}

/// Check every block in `first..=last`.
pub async fn check_block_range(
    rpc: &dyn BlockSource,
    typed: &dyn BlockSource,
    first: u64,
    last: u64,
) -> Result<Vec<BlockReport>> {
    let mut reports = Vec::new();
    for number in first..=last {
        reports.push(check_block(rpc, typed, number).await?);
    }
    Ok(reports)
}

/// Check every block from genesis up to and including the node's latest block.
pub async fn check_all_blocks(
    rpc: &dyn BlockSource,
    typed: &dyn BlockSource,
) -> Result<Vec<BlockReport>> {
    let latest = rpc.latest_block_number().await?;
    info!(latest, "checking all blocks");
    let reports = check_block_range(rpc, typed, 0, latest).await?;

    let verified: usize = reports.iter().map(|report| report.verified).sum();
    let skipped: usize = reports.iter().map(|report| report.skipped).sum();
    info!(blocks = reports.len(), verified, skipped, "all blocks verified");
    Ok(reports)
}
