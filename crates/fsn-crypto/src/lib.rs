//! # fsn-crypto
//!
//! Cryptographic helpers for the Fusion client SDK.
//!
//! - Keccak-256 hashing
//! - secp256k1 recoverable signing (low-s normalised)
//! - Public key recovery and address derivation
//! - EIP-55 mixed-case address checksums

#![warn(missing_docs)]
#![warn(clippy::all)]

mod checksum;
mod error;
mod hash;
mod signature;

pub use checksum::{is_valid_checksum, to_checksum_address};
pub use error::CryptoError;
pub use hash::keccak256;
pub use signature::{
    public_key_to_address, recover_public_key, sign, PrivateKey, PublicKey, Signature,
};
