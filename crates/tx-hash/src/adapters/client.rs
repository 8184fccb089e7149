//! Normalization of `alloy` transaction objects.

use alloy::{
    consensus::{
        Signed,
        TxEnvelope,
        TxLegacy,
    },
    eips::eip2718::Typed2718,
    primitives::{
        Address,
        U256,
    },
    rpc::types::Transaction,
};

use crate::{
    error::AdapterError,
    record::{
        TransactionRecord,
        TxType,
    },
};

/// Raw signature values as carried in the canonical encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignatureParts {
    pub v: U256,
    pub r: U256,
    pub s: U256,
}

/// `v` of a legacy signature: `27 + parity` before EIP-155,
/// `35 + 2 * chain_id + parity` after.
pub fn legacy_v(y_parity: bool, chain_id: Option<u64>) -> U256 {
    let parity = U256::from(u64::from(y_parity));
    match chain_id {
        Some(chain_id) => U256::from(chain_id) * U256::from(2u64) + U256::from(35u64) + parity,
        None => U256::from(27u64) + parity,
    }
}

/// Build a record from a legacy transaction and explicitly supplied signature values.
pub fn from_legacy_parts(tx: &TxLegacy, signature: SignatureParts) -> TransactionRecord {
    TransactionRecord {
        nonce: tx.nonce,
        gas_price: U256::from(tx.gas_price),
        gas_limit: tx.gas_limit,
        to: tx.to.to().copied(),
        value: tx.value,
        input: tx.input.clone(),
        v: signature.v,
        r: signature.r,
        s: signature.s,
        tx_type: TxType::Legacy,
        from: None,
    }
}

pub fn from_signed_legacy(signed: &Signed<TxLegacy>) -> TransactionRecord {
    let tx = signed.tx();
    let signature = signed.signature();
    from_legacy_parts(
        tx,
        SignatureParts {
            v: legacy_v(signature.v(), tx.chain_id),
            r: signature.r(),
            s: signature.s(),
        },
    )
}

/// Only legacy envelopes have a canonical record. Typed envelopes are
/// reported as [`AdapterError::UnsupportedType`].
pub fn from_envelope(envelope: &TxEnvelope, from: Address) -> Result<TransactionRecord, AdapterError> {
    match envelope {
        TxEnvelope::Legacy(signed) => {
            Ok(TransactionRecord {
                from: Some(from),
                ..from_signed_legacy(signed)
            })
        }
        other => Err(AdapterError::UnsupportedType(other.ty())),
    }
}

/// Build a record from a transaction returned by an `alloy` provider, using
/// the recovered signer as the sender.
pub fn from_rpc_transaction(tx: &Transaction) -> Result<TransactionRecord, AdapterError> {
    from_envelope(tx.inner.inner(), tx.inner.signer())
}
