//! Block access through the `alloy` provider, the typed client-library path.

use alloy::{
    eips::{
        BlockNumberOrTag,
        eip2718::Typed2718,
    },
    providers::{
        Provider,
        ProviderBuilder,
        RootProvider,
    },
    rpc::types::Block,
};
use async_trait::async_trait;
use edge_tx_hash::adapters::from_rpc_transaction;

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

pub struct TypedClient {
    provider: RootProvider,
}

impl TypedClient {
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new().connect(rpc_url).await?;

        Ok(Self {
            provider: provider.root().clone(),
        })
    }

    pub fn provider(&self) -> &RootProvider {
        &self.provider
    }

    pub async fn block_number(&self) -> Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Block `number` with full transaction objects.
    pub async fn block_by_number(&self, number: u64) -> Result<Option<Block>> {
        Ok(self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .full()
            .await?)
    }
}

/// Normalize a provider block. Transaction bodies are required unless the
/// block is empty.
pub fn chain_block_from_typed(origin: &'static str, block: &Block) -> Result<ChainBlock> {
    let number = block.header.number;
    let transactions = if block.transactions.is_empty() {
        Vec::new()
    } else {
        let bodies = block
            .transactions
            .as_transactions()
            .ok_or(HarnessError::MissingTransactionBodies { origin, number })?;
        bodies
            .iter()
            .map(|tx| {
                let envelope = tx.inner.inner();
                ChainTransaction::new(*envelope.tx_hash(), envelope.ty(), from_rpc_transaction(tx))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    Ok(ChainBlock {
        origin,
        number,
        hash: block.header.hash,
        parent_hash: block.header.parent_hash,
        transactions,
    })
}

#[async_trait]
impl BlockSource for TypedClient {
    fn name(&self) -> &'static str {
        "client"
    }

    async fn latest_block_number(&self) -> Result<u64> {
        self.block_number().await
    }

    async fn block(&self, number: u64) -> Result<Option<ChainBlock>> {
        self.block_by_number(number)
            .await?
            .map(|block| chain_block_from_typed(self.name(), &block))
            .transpose()
    }
}
