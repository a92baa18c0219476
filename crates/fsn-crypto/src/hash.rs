//! Keccak-256

use fsn_primitives::H256;
use sha3::{Digest, Keccak256};

/// Keccak-256 of `data`, as used for transaction hashes and addresses
pub fn keccak256(data: &[u8]) -> H256 {
    H256::from_bytes(Keccak256::digest(data).into())
}
