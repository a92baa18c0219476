//! Recoverable ECDSA signatures over secp256k1

use std::cmp::Ordering;

use fsn_primitives::{Address, H256};
use k256::ecdsa::{RecoveryId, Signature as K256Signature, SigningKey, VerifyingKey};

use crate::{keccak256, CryptoError};

/// Half of the secp256k1 curve order (n/2)
const SECP256K1_N_DIV_2: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D,
    0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Full secp256k1 curve order (n)
const SECP256K1_N: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B,
    0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Public key
pub type PublicKey = VerifyingKey;

/// Private key (32 bytes)
pub type PrivateKey = SigningKey;

/// ECDSA signature with recovery id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    /// r component
    pub r: [u8; 32],
    /// s component (always in the lower half of the curve order)
    pub s: [u8; 32],
    /// Recovery id, 0 or 1
    pub recovery_id: u8,
}

impl Signature {
    /// Whether `s` is in the lower half of the curve order
    pub fn is_low_s(&self) -> bool {
        self.s.as_slice().cmp(SECP256K1_N_DIV_2.as_slice()) != Ordering::Greater
    }

    /// EIP-155 `v` for the given chain id
    pub fn eip155_v(&self, chain_id: u64) -> u64 {
        self.recovery_id as u64 + chain_id * 2 + 35
    }
}

/// n - s, used to move a high s into the lower half
fn negate_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: u16 = 0;
    for i in (0..32).rev() {
        let diff = (SECP256K1_N[i] as u16)
            .wrapping_sub(s[i] as u16)
            .wrapping_sub(borrow);
        result[i] = diff as u8;
        borrow = if diff > 255 { 1 } else { 0 };
    }
    result
}

/// Sign a 32-byte prehash, normalising to low-s
pub fn sign(message_hash: &H256, private_key: &PrivateKey) -> Result<Signature, CryptoError> {
    let (signature, recovery_id) = private_key
        .sign_prehash_recoverable(message_hash.as_bytes())
        .map_err(|e| CryptoError::Signing(e.to_string()))?;

    let r: [u8; 32] = signature.r().to_bytes().into();
    let mut s: [u8; 32] = signature.s().to_bytes().into();
    let mut recovery_id = recovery_id.to_byte();

    if s.as_slice().cmp(SECP256K1_N_DIV_2.as_slice()) == Ordering::Greater {
        s = negate_s(&s);
        recovery_id ^= 1;
    }

    Ok(Signature { r, s, recovery_id })
}

/// Recover the signer's public key from a prehash and signature
pub fn recover_public_key(
    message_hash: &H256,
    signature: &Signature,
) -> Result<PublicKey, CryptoError> {
    let r: k256::FieldBytes = signature.r.into();
    let s: k256::FieldBytes = signature.s.into();
    let sig = K256Signature::from_scalars(r, s)
        .map_err(|e| CryptoError::MalformedSignature(e.to_string()))?;
    let recovery_id = RecoveryId::try_from(signature.recovery_id)
        .map_err(|_| CryptoError::RecoveryId(signature.recovery_id))?;

    VerifyingKey::recover_from_prehash(message_hash.as_bytes(), &sig, recovery_id)
        .map_err(|e| CryptoError::Recovery(e.to_string()))
}

/// Derive the 20-byte account address of a public key
pub fn public_key_to_address(public_key: &PublicKey) -> Address {
    // Uncompressed point: 0x04 || x || y
    let encoded = public_key.to_encoded_point(false);
    let hash = keccak256(&encoded.as_bytes()[1..]);

    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash.as_bytes()[12..]);
    Address::from_bytes(bytes)
}
