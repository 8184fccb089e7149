//! Normalized transaction record and its canonical field layout.

use alloy::primitives::{
    Address,
    B256,
    Bytes,
    U256,
};

use crate::{
    hasher::{
        DigestHasher,
        Keccak256,
    },
    rlp::{
        Node,
        encode_list,
    },
};

/// Transaction kinds the canonical hash understands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TxType {
    /// Plain signed transaction.
    #[default]
    Legacy,
    /// Node-injected state transaction. Its hash also covers the sender.
    State,
}

impl TxType {
    /// Wire tag reported by the node in the `type` field.
    pub const fn as_byte(self) -> u8 {
        match self {
            TxType::Legacy => 0x00,
            TxType::State => 0x7f,
        }
    }

    pub const fn from_byte(tag: u8) -> Option<Self> {
        match tag {
            0x00 => Some(TxType::Legacy),
            0x7f => Some(TxType::State),
            _ => None,
        }
    }

    /// Whether the sender address is part of the canonical encoding.
    pub const fn hashes_sender(self) -> bool {
        match self {
            TxType::Legacy => false,
            TxType::State => true,
        }
    }
}

/// Transaction fields in the shape the canonical hash is computed over.
///
/// Built from either a JSON-RPC transaction object or a client-library
/// transaction (see [`crate::adapters`]), hashed, and dropped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionRecord {
    pub nonce: u64,
    pub gas_price: U256,
    pub gas_limit: u64,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub v: U256,
    pub r: U256,
    pub s: U256,
    pub tx_type: TxType,
    /// Only read for [`TxType::State`].
    pub from: Option<Address>,
}

impl TransactionRecord {
    /// Fields in hashing order: nonce, gas price, gas limit, to, value, input,
    /// v, r, s, then the sender for state transactions.
    ///
    /// A state record without a sender encodes the sender slot as the empty
    /// string. The adapters refuse to build such a record.
    pub fn canonical_nodes(&self) -> Vec<Node<'_>> {
        let mut nodes = Vec::with_capacity(10);
        nodes.extend([
            Node::Uint(self.nonce),
            Node::BigUint(self.gas_price),
            Node::Uint(self.gas_limit),
            Node::address(self.to.as_ref()),
            Node::BigUint(self.value),
            Node::Bytes(&self.input),
            Node::BigUint(self.v),
            Node::BigUint(self.r),
            Node::BigUint(self.s),
        ]);

        match self.tx_type {
            TxType::Legacy => {}
            TxType::State => nodes.push(Node::address(self.from.as_ref())),
        }

        nodes
    }

    /// Canonical RLP encoding of the record.
    pub fn encode(&self) -> Vec<u8> {
        encode_list(&self.canonical_nodes())
    }

    /// Canonical transaction hash, as reported by the node.
    pub fn hash(&self) -> B256 {
        self.hash_with(&Keccak256)
    }

    pub fn hash_with<H: DigestHasher + ?Sized>(&self, hasher: &H) -> B256 {
        hasher.digest(&self.encode())
    }
}
