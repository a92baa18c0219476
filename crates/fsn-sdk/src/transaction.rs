//! Remote-built transactions, signature state and raw encoding

use bytes::Bytes;
use fsn_crypto::keccak256;
use fsn_primitives::{Address, H256, U256};
use rlp::RlpStream;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{quantity, to_quantity};
use crate::SdkError;

/// Raw-send method for FSN-native transactions built by the node
pub const FSN_SEND_RAW_METHOD: &str = "fsntx_sendRawTransaction";

/// Raw-send method for generic transactions
pub const ETH_SEND_RAW_METHOD: &str = "eth_sendRawTransaction";

/// Fully specified transaction, ready to sign or broadcast
///
/// Produced by the node's `fsntx_build*Tx` methods for FSN operations, or
/// filled locally for a generic send. `chain_id` is always the client's
/// own, stamped after the remote build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparedTransaction {
    /// Sender
    #[serde(default)]
    pub from: Option<Address>,
    /// Account nonce
    #[serde(deserialize_with = "quantity::u64")]
    pub nonce: u64,
    /// Gas price in the minor unit
    #[serde(deserialize_with = "quantity::u256")]
    pub gas_price: U256,
    /// Gas limit
    #[serde(deserialize_with = "quantity::u64")]
    pub gas: u64,
    /// Recipient, `None` for contract creation
    #[serde(default)]
    pub to: Option<Address>,
    /// Amount of FSN transferred
    #[serde(default, deserialize_with = "quantity::u256")]
    pub value: U256,
    /// Call data; the node encodes the FSN operation here
    #[serde(default, alias = "data", deserialize_with = "hex_bytes")]
    pub input: Bytes,
    /// Chain id
    #[serde(default, deserialize_with = "quantity::option_u64")]
    pub chain_id: Option<u64>,
    /// Signature `v`
    #[serde(default, deserialize_with = "quantity::option_u256")]
    pub v: Option<U256>,
    /// Signature `r`
    #[serde(default, deserialize_with = "quantity::option_u256")]
    pub r: Option<U256>,
    /// Signature `s`
    #[serde(default, deserialize_with = "quantity::option_u256")]
    pub s: Option<U256>,
    /// Hash reported by the node
    #[serde(default)]
    pub hash: Option<H256>,
}

fn hex_bytes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    match value {
        None => Ok(Bytes::new()),
        Some(s) => {
            let digits = s.strip_prefix("0x").unwrap_or(&s);
            hex::decode(digits).map(Bytes::from).map_err(de::Error::custom)
        }
    }
}

impl PreparedTransaction {
    /// Decode the result of a build call
    pub fn from_value(value: Value) -> Result<Self, SdkError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Replace whatever chain id the node reported
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    /// Record the sender unless the node already reported one
    pub fn with_sender(mut self, from: Address) -> Self {
        self.from.get_or_insert(from);
        self
    }

    /// JSON form, with Fusion's field names and quantities
    pub fn to_json(&self) -> Result<Value, SdkError> {
        Ok(serde_json::to_value(self)?)
    }

    fn append_body(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas);
        match &self.to {
            Some(to) => stream.append(to),
            None => stream.append_empty_data(),
        };
        stream.append(&self.value);
        stream.append(&self.input.to_vec());
    }

    /// EIP-155 signing preimage
    pub fn signing_rlp(&self, chain_id: u64) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        stream.out().to_vec()
    }

    /// Hash that is signed
    pub fn signing_hash(&self, chain_id: u64) -> H256 {
        keccak256(&self.signing_rlp(chain_id))
    }

    /// Raw transaction carrying the given signature
    pub fn encode_signed(&self, v: U256, r: U256, s: U256) -> Vec<u8> {
        let mut stream = RlpStream::new_list(9);
        self.append_body(&mut stream);
        stream.append(&v);
        stream.append(&r);
        stream.append(&s);
        stream.out().to_vec()
    }

    /// Raw payload of a transaction that already carries its signature
    pub fn presigned_payload(&self) -> Result<SignedPayload, SdkError> {
        let v = self.v.ok_or_else(|| ValidationError::missing("v"))?;
        let r = self.r.ok_or_else(|| ValidationError::missing("r"))?;
        let s = self.s.ok_or_else(|| ValidationError::missing("s"))?;
        Ok(SignedPayload::new(self.encode_signed(v, r, s)))
    }
}

impl Serialize for PreparedTransaction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;
        if let Some(from) = &self.from {
            map.serialize_entry("from", from)?;
        }
        map.serialize_entry("nonce", &to_quantity(self.nonce))?;
        map.serialize_entry("gasPrice", &to_quantity(self.gas_price))?;
        map.serialize_entry("gas", &to_quantity(self.gas))?;
        map.serialize_entry("to", &self.to)?;
        map.serialize_entry("value", &to_quantity(self.value))?;
        map.serialize_entry("input", &format!("0x{}", hex::encode(&self.input)))?;
        if let Some(chain_id) = self.chain_id {
            map.serialize_entry("chainId", &chain_id)?;
        }
        for (key, component) in [("v", self.v), ("r", self.r), ("s", self.s)] {
            if let Some(component) = component {
                map.serialize_entry(key, &to_quantity(component))?;
            }
        }
        if let Some(hash) = &self.hash {
            map.serialize_entry("hash", hash)?;
        }
        map.end()
    }
}

/// Which signing and broadcast path a prepared transaction takes
///
/// The node leaves zeroed `r`/`s` slots on the transactions it builds. A
/// transaction whose slots are already filled was signed elsewhere, and one
/// without slots is a plain transfer. This is inferred from field values
/// because the wire format has no scheme tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureState {
    /// Node-built, `r` and `s` both zero: sign here, send FSN-native
    Unsigned,
    /// `r` and `s` both non-zero: send FSN-native as is
    PreSigned,
    /// No signature slots: sign here, send generic
    NoSignatureSlots,
}

impl SignatureState {
    /// Classify a prepared transaction
    pub fn of(tx: &PreparedTransaction) -> Result<Self, ValidationError> {
        match (tx.r, tx.s) {
            (None, None) => Ok(SignatureState::NoSignatureSlots),
            (Some(r), Some(s)) if r.is_zero() && s.is_zero() => Ok(SignatureState::Unsigned),
            (Some(r), Some(s)) if !r.is_zero() && !s.is_zero() => Ok(SignatureState::PreSigned),
            (None, Some(_)) => Err(ValidationError::missing("r")),
            (Some(_), None) => Err(ValidationError::missing("s")),
            _ => Err(ValidationError::wrong_type(
                "r",
                "r and s both zero or both non-zero",
            )),
        }
    }

    /// RPC used to broadcast the raw payload
    pub fn raw_send_method(self) -> &'static str {
        match self {
            SignatureState::Unsigned | SignatureState::PreSigned => FSN_SEND_RAW_METHOD,
            SignatureState::NoSignatureSlots => ETH_SEND_RAW_METHOD,
        }
    }

    /// Whether the client must produce a signature
    pub fn needs_local_signature(self) -> bool {
        !matches!(self, SignatureState::PreSigned)
    }
}

/// Signed, RLP-encoded transaction
#[derive(Clone, PartialEq, Eq)]
pub struct SignedPayload {
    /// Raw bytes as broadcast
    pub raw: Bytes,
    /// Transaction hash (keccak of `raw`)
    pub hash: H256,
}

impl SignedPayload {
    /// Wrap raw bytes and compute their hash
    pub fn new(raw: impl Into<Bytes>) -> Self {
        let raw = raw.into();
        let hash = keccak256(&raw);
        Self { raw, hash }
    }

    /// `0x`-prefixed hex as sent over RPC
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

impl std::fmt::Debug for SignedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedPayload")
            .field("hash", &self.hash)
            .field("len", &self.raw.len())
            .finish()
    }
}
