use alloy::primitives::{
    B256,
    keccak256,
};

/// Digest function applied to the canonical encoding of a record.
pub trait DigestHasher {
    fn digest(&self, data: &[u8]) -> B256;
}

/// Legacy Keccak-256, the pre-standard variant used by Ethereum-family chains.
///
/// This is the only digest whose output matches node-reported transaction
/// hashes. Other implementations of [`DigestHasher`] exist for tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Keccak256;

impl DigestHasher for Keccak256 {
    fn digest(&self, data: &[u8]) -> B256 {
        keccak256(data)
    }
}
