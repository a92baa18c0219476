//! # fsn-primitives
//!
//! Primitive types shared by the Fusion client crates.
//!
//! Addresses are 20 bytes, asset/swap/ticket ids and transaction hashes are
//! 32 bytes. Strict parsers (`from_prefixed_hex`) enforce the `0x`-prefixed,
//! fixed-length form the Fusion RPC surface expects.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{HashError, H256};

// Re-export primitive-types for U256
pub use primitive_types::U256;

/// Block height type
pub type BlockHeight = u64;

/// Transaction nonce type
pub type Nonce = u64;

/// Gas type
pub type Gas = u64;
