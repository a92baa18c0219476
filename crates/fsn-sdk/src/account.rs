//! Signing account and the signer capability

use fsn_crypto::{public_key_to_address, sign, to_checksum_address, PrivateKey, PublicKey, Signature};
use fsn_primitives::{Address, H256, U256};
use k256::ecdsa::SigningKey;
use zeroize::Zeroize;

use crate::transaction::{PreparedTransaction, SignedPayload};
use crate::SdkError;

/// Something that can sign prepared transactions
///
/// The pipeline hands the signer the transaction exactly as it will be
/// encoded, together with the chain id to bind the signature to.
pub trait Signer: Send + Sync {
    /// Address the signatures recover to
    fn address(&self) -> Address;

    /// Sign `tx` for `chain_id` and return the broadcastable payload
    fn sign_transaction(
        &self,
        tx: &PreparedTransaction,
        chain_id: u64,
    ) -> Result<SignedPayload, SdkError>;
}

/// Locally held secp256k1 key
///
/// Not `Clone`, so the key is never silently duplicated.
pub struct Account {
    private_key: PrivateKey,
    address: Address,
}

impl Account {
    /// Create an account from a 32-byte private key
    pub fn from_private_key(key: &[u8; 32]) -> Result<Self, SdkError> {
        let private_key = SigningKey::from_slice(key)
            .map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        let address = public_key_to_address(private_key.verifying_key());

        Ok(Self {
            private_key,
            address,
        })
    }

    /// Create an account from a hex-encoded private key
    ///
    /// Accepts both with and without "0x" prefix.
    pub fn from_private_key_hex(hex: &str) -> Result<Self, SdkError> {
        let hex = hex.strip_prefix("0x").unwrap_or(hex);
        let mut bytes =
            hex::decode(hex).map_err(|e| SdkError::InvalidPrivateKey(e.to_string()))?;
        if bytes.len() != 32 {
            let len = bytes.len();
            bytes.zeroize();
            return Err(SdkError::InvalidPrivateKey(format!(
                "expected 32 bytes, got {}",
                len
            )));
        }

        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_private_key(&key);
        key.zeroize();
        result
    }

    /// Account address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// EIP-55 form of the address
    pub fn checksum_address(&self) -> String {
        to_checksum_address(&self.address)
    }

    /// Public key
    pub fn public_key(&self) -> &PublicKey {
        self.private_key.verifying_key()
    }

    /// Sign a 32-byte hash
    pub fn sign_hash(&self, hash: &H256) -> Result<Signature, SdkError> {
        Ok(sign(hash, &self.private_key)?)
    }
}

impl Signer for Account {
    fn address(&self) -> Address {
        self.address
    }

    fn sign_transaction(
        &self,
        tx: &PreparedTransaction,
        chain_id: u64,
    ) -> Result<SignedPayload, SdkError> {
        let signature = self.sign_hash(&tx.signing_hash(chain_id))?;
        let raw = tx.encode_signed(
            U256::from(signature.eip155_v(chain_id)),
            U256::from_big_endian(&signature.r),
            U256::from_big_endian(&signature.s),
        );
        Ok(SignedPayload::new(raw))
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
