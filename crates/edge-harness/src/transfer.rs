//! Sign and submit a 1 wei legacy transfer, then verify the node hashes it
//! the same way we do.

use alloy::{
    consensus::{
        SignableTransaction,
        Signed,
        TxEnvelope,
        TxLegacy,
    },
    eips::eip2718::Encodable2718,
    primitives::{
        Address,
        B256,
        Bytes,
        TxKind,
        U256,
    },
    signers::{
        SignerSync,
        local::PrivateKeySigner,
    },
};
use edge_tx_hash::adapters::from_signed_legacy;
use tracing::{
    debug,
    info,
};

use crate::{
    checks::{
        BlockReport,
        check_block,
    },
    confirm::{
        ConfirmationPolicy,
        wait_for_confirmation,
    },
    error::{
        HarnessError,
        Result,
    },
    rpc::NodeClient,
    source::BlockSource,
};

pub const TRANSFER_GAS_LIMIT: u64 = 21_000;
pub const TRANSFER_VALUE_WEI: u64 = 1;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferReport {
    pub hash: B256,
    pub block_number: u64,
    pub block: BlockReport,
}

/// Build and sign an EIP-155 legacy transfer of 1 wei from `signer` to `to`,
/// using the node's chain id, gas price and pending nonce.
pub async fn build_transfer(
    client: &NodeClient,
    signer: &PrivateKeySigner,
    to: Address,
) -> Result<Signed<TxLegacy>> {
    let from = signer.address();
    let chain_id = client.chain_id().await?;
    let nonce = client.pending_nonce(from).await?;
    let gas_price = client.gas_price().await?;
    let gas_price = u128::try_from(gas_price).map_err(|_| HarnessError::InvalidNodeValue {
        origin: "rpc",
        message: format!("gas price {gas_price} does not fit in 128 bits"),
    })?;

    let tx = TxLegacy {
        chain_id: Some(chain_id),
        nonce,
        gas_price,
        gas_limit: TRANSFER_GAS_LIMIT,
        to: TxKind::Call(to),
        value: U256::from(TRANSFER_VALUE_WEI),
        input: Bytes::new(),
    };
    debug!(%from, %to, chain_id, nonce, %gas_price, "signing transfer");

    let signature = signer.sign_hash_sync(&tx.signature_hash())?;
    Ok(tx.into_signed(signature))
}

/// Submit `signed` and check the node returns the hash computed from the
/// canonical encoding.
pub async fn submit_transfer(client: &NodeClient, signed: Signed<TxLegacy>) -> Result<B256> {
    let computed = from_signed_legacy(&signed).hash();
    let raw = TxEnvelope::Legacy(signed).encoded_2718();

    let returned = client.send_raw_transaction(&raw).await?;
    if returned != computed {
        return Err(HarnessError::SubmittedHashMismatch { returned, computed });
    }
    info!(hash = %returned, "transfer submitted");
    Ok(returned)
}

/// Send a transfer, wait for it to be mined, check the containing block from
/// both sources and confirm the transfer is part of it.
pub async fn run_transfer(
    client: &NodeClient,
    typed: &dyn BlockSource,
    signer: &PrivateKeySigner,
    to: Address,
    policy: ConfirmationPolicy,
) -> Result<TransferReport> {
    policy.validate()?;
    let signed = build_transfer(client, signer, to).await?;
    let hash = submit_transfer(client, signed).await?;
    let block_number = wait_for_confirmation(client, hash, policy).await?;

    let block = check_block(client, typed, block_number).await?;
    if !block.transaction_hashes.contains(&hash) {
        return Err(HarnessError::TransactionNotIncluded {
            hash,
            number: block_number,
        });
    }
    info!(%hash, block = block_number, verified = block.verified, "transfer verified");

    Ok(TransferReport {
        hash,
        block_number,
        block,
    })
}
