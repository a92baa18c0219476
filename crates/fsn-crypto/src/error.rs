//! Errors raised while signing or recovering

use thiserror::Error;

/// secp256k1 failure
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The key could not produce a signature for the hash
    #[error("cannot sign transaction hash: {0}")]
    Signing(String),

    /// `r`/`s` do not form a valid secp256k1 signature
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// Recovery id outside 0..=3
    #[error("recovery id {0} out of range")]
    RecoveryId(u8),

    /// No public key recovers from the signature
    #[error("cannot recover signer: {0}")]
    Recovery(String),
}
