//! A block view shared by the JSON-RPC path and the client-library path.
//!
//! Each source normalizes its own transaction objects into
//! [`TransactionRecord`]s. The checks only ever see [`ChainBlock`]s.

use alloy::primitives::B256;
use async_trait::async_trait;
use edge_tx_hash::{
    AdapterError,
    TransactionRecord,
};

use crate::{
    error::Result,
    rpc::{
        NodeClient,
        RpcBlock,
    },
};

/// A transaction as reported by one source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainTransaction {
    /// Hash reported by the node.
    pub hash: B256,
    pub tx_type: u8,
    /// `None` when the transaction kind has no canonical record.
    pub record: Option<TransactionRecord>,
}

impl ChainTransaction {
    /// Keep unsupported kinds as `record: None`, fail on anything else.
    pub fn new(
        hash: B256,
        tx_type: u8,
        record: std::result::Result<TransactionRecord, AdapterError>,
    ) -> std::result::Result<Self, AdapterError> {
        let record = match record {
            Ok(record) => Some(record),
            Err(AdapterError::UnsupportedType(_)) => None,
            Err(err) => return Err(err),
        };
        Ok(Self {
            hash,
            tx_type,
            record,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainBlock {
    /// Name of the source that produced this block.
    pub origin: &'static str,
    pub number: u64,
    pub hash: B256,
    pub parent_hash: B256,
    pub transactions: Vec<ChainTransaction>,
}

impl ChainBlock {
    pub fn contains(&self, hash: B256) -> bool {
        self.transactions.iter().any(|tx| tx.hash == hash)
    }
}

/// Anything that can serve blocks for the checks.
#[async_trait]
pub trait BlockSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn latest_block_number(&self) -> Result<u64>;
    async fn block(&self, number: u64) -> Result<Option<ChainBlock>>;
}

impl RpcBlock {
    pub fn to_chain_block(&self, origin: &'static str) -> std::result::Result<ChainBlock, AdapterError> {
        let transactions = self
            .transactions
            .iter()
            .map(|tx| {
                ChainTransaction::new(
                    tx.reported_hash()?,
                    tx.type_tag()?,
                    TransactionRecord::try_from(tx),
                )
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ChainBlock {
            origin,
            number: self.number()?,
            hash: self.hash()?,
            parent_hash: self.parent_hash()?,
            transactions,
        })
    }
}

#[async_trait]
impl BlockSource for NodeClient {
    fn name(&self) -> &'static str {
        "rpc"
    }

    async fn latest_block_number(&self) -> Result<u64> {
        Ok(self.block_number().await?)
    }

    async fn block(&self, number: u64) -> Result<Option<ChainBlock>> {
        let Some(block) = self.block_by_number(number).await? else {
            return Ok(None);
        };
        Ok(Some(block.to_chain_block(self.name())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn block_with(tx_type: &str) -> RpcBlock {
        serde_json::from_value(json!({
            "number": "0x3",
            "hash": format!("0x{}", "33".repeat(32)),
            "parentHash": format!("0x{}", "22".repeat(32)),
            "transactions": [{
                "hash": format!("0x{}", "aa".repeat(32)),
                "type": tx_type,
                "nonce": "0x1",
                "gasPrice": "0x1",
                "gas": "0x5208",
                "to": null,
                "value": "0x0",
                "input": "0x",
                "v": "0x1b",
                "r": "0x1",
                "s": "0x1"
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_legacy_transaction_gets_record() {
        let block = block_with("0x0").to_chain_block("rpc").unwrap();
        assert_eq!(block.number, 3);
        assert_eq!(block.parent_hash, B256::repeat_byte(0x22));
        assert_eq!(block.transactions.len(), 1);
        assert!(block.transactions[0].record.is_some());
        assert!(block.contains(B256::repeat_byte(0xaa)));
        assert!(!block.contains(B256::ZERO));
    }

    #[test]
    fn test_unsupported_kind_is_kept_without_record() {
        let block = block_with("0x2").to_chain_block("rpc").unwrap();
        assert_eq!(block.transactions[0].tx_type, 0x02);
        assert_eq!(block.transactions[0].record, None);
    }

    #[test]
    fn test_malformed_transaction_fails() {
        let mut block = block_with("0x0");
        block.transactions[0].gas = Some("0xgg".to_string());
        assert!(matches!(
            block.to_chain_block("rpc"),
            Err(AdapterError::InvalidQuantity { field: "gas", .. })
        ));
    }
}
