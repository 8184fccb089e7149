//! Normalization of JSON-RPC transaction objects (`eth_getBlockByNumber`,
//! `eth_getTransactionByHash`).

use alloy::primitives::B256;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use crate::{
    error::AdapterError,
    hex::{
        parse_address,
        parse_b256,
        parse_bytes,
        parse_u64,
        parse_u256,
    },
    record::{
        TransactionRecord,
        TxType,
    },
};

/// Transaction object as returned by the node, every value still hex encoded.
///
/// Nothing is validated at deserialization time so that a malformed field is
/// reported by name when the record is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<String>,
    /// Outer `None`: the key is missing. `Some(None)`: explicit `null`, a
    /// contract creation.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub to: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, alias = "data", skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_index: Option<String>,
}

fn nullable<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn required<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, AdapterError> {
    value.as_deref().ok_or(AdapterError::MissingField(field))
}

fn signature<'a>(field: &'static str, value: &'a Option<String>) -> Result<&'a str, AdapterError> {
    value
        .as_deref()
        .ok_or(AdapterError::MissingSignature(field))
}

impl RpcTransaction {
    /// Hash the node reported for this transaction.
    pub fn reported_hash(&self) -> Result<B256, AdapterError> {
        parse_b256("hash", required("hash", &self.hash)?)
    }

    /// Raw type tag. A missing `type` field is a legacy transaction.
    pub fn type_tag(&self) -> Result<u8, AdapterError> {
        let Some(tag) = self.tx_type.as_deref() else {
            return Ok(TxType::Legacy.as_byte());
        };
        let value = parse_u64("type", tag)?;
        u8::try_from(value).map_err(|_| {
            AdapterError::InvalidQuantity {
                field: "type",
                value: tag.to_string(),
            }
        })
    }
}

impl TryFrom<&RpcTransaction> for TransactionRecord {
    type Error = AdapterError;

    fn try_from(tx: &RpcTransaction) -> Result<Self, Self::Error> {
        let tag = tx.type_tag()?;
        let tx_type = TxType::from_byte(tag).ok_or(AdapterError::UnsupportedType(tag))?;

        let to = match &tx.to {
            None => return Err(AdapterError::MissingField("to")),
            Some(None) => None,
            Some(Some(to)) => Some(parse_address("to", to)?),
        };

        let from = tx
            .from
            .as_deref()
            .map(|from| parse_address("from", from))
            .transpose()?;
        if tx_type.hashes_sender() && from.is_none() {
            return Err(AdapterError::MissingField("from"));
        }

        Ok(TransactionRecord {
            nonce: parse_u64("nonce", required("nonce", &tx.nonce)?)?,
            gas_price: parse_u256("gasPrice", required("gasPrice", &tx.gas_price)?)?,
            gas_limit: parse_u64("gas", required("gas", &tx.gas)?)?,
            to,
            value: parse_u256("value", required("value", &tx.value)?)?,
            input: parse_bytes("input", required("input", &tx.input)?)?,
            v: parse_u256("v", signature("v", &tx.v)?)?,
            r: parse_u256("r", signature("r", &tx.r)?)?,
            s: parse_u256("s", signature("s", &tx.s)?)?,
            tx_type,
            from,
        })
    }
}

impl TryFrom<RpcTransaction> for TransactionRecord {
    type Error = AdapterError;

    fn try_from(tx: RpcTransaction) -> Result<Self, Self::Error> {
        TransactionRecord::try_from(&tx)
    }
}
