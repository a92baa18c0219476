//! SDK types

use std::collections::BTreeMap;

use fsn_crypto::is_valid_checksum;
use fsn_primitives::{Address, H256, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Block identifier for RPC queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockId {
    /// Block number
    Number(u64),
    /// Latest block
    #[default]
    Latest,
    /// Pending block (includes pending transactions)
    Pending,
    /// Earliest block (genesis)
    Earliest,
}

impl BlockId {
    /// Parse a tag (`latest`, `pending`, `earliest`) or a block number in
    /// decimal or `0x` hex
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "latest" => Ok(BlockId::Latest),
            "pending" => Ok(BlockId::Pending),
            "earliest" => Ok(BlockId::Earliest),
            other => parse_u64_str(other).map(BlockId::Number).ok_or_else(|| {
                ValidationError::wrong_type(
                    "block_identifier",
                    "block tag or non-negative block number",
                )
            }),
        }
    }
}

impl From<u64> for BlockId {
    fn from(n: u64) -> Self {
        BlockId::Number(n)
    }
}

impl Serialize for BlockId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            BlockId::Number(n) => serializer.serialize_str(&format!("0x{:x}", n)),
            BlockId::Latest => serializer.serialize_str("latest"),
            BlockId::Pending => serializer.serialize_str("pending"),
            BlockId::Earliest => serializer.serialize_str("earliest"),
        }
    }
}

/// Encode an integer as a `0x` JSON-RPC quantity
pub fn to_quantity(value: impl Into<U256>) -> String {
    format!("0x{:x}", value.into())
}

/// Parse `0x` hex or plain decimal into a `U256`
pub(crate) fn parse_u256_str(s: &str) -> Option<U256> {
    match s.strip_prefix("0x") {
        Some("") => None,
        Some(digits) => U256::from_str_radix(digits, 16).ok(),
        None if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            U256::from_dec_str(s).ok()
        }
        None => None,
    }
}

pub(crate) fn parse_u64_str(s: &str) -> Option<u64> {
    let value = parse_u256_str(s)?;
    (value.bits() <= 64).then(|| value.low_u64())
}

/// Read a non-negative integer given as a JSON number, decimal string or
/// `0x` quantity
pub(crate) fn u256_from_value(field: &str, value: &Value) -> Result<U256, ValidationError> {
    const EXPECTED: &str = "non-negative integer";
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(U256::from)
            .ok_or_else(|| ValidationError::wrong_type(field, EXPECTED)),
        Value::String(s) => {
            parse_u256_str(s).ok_or_else(|| ValidationError::wrong_type(field, EXPECTED))
        }
        _ => Err(ValidationError::wrong_type(field, EXPECTED)),
    }
}

/// As [`u256_from_value`], bounded to 64 bits
pub(crate) fn u64_from_value(field: &str, value: &Value) -> Result<u64, ValidationError> {
    let value = u256_from_value(field, value)?;
    if value.bits() > 64 {
        return Err(ValidationError::wrong_type(field, "integer below 2^64"));
    }
    Ok(value.low_u64())
}

/// Serde adapters for quantities the node may send as numbers or strings
pub(crate) mod quantity {
    use super::*;
    use serde::{de, Deserializer};

    fn decode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let value = Value::deserialize(deserializer)?;
        u256_from_value("quantity", &value).map_err(de::Error::custom)
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = decode(deserializer)?;
        if value.bits() > 64 {
            return Err(de::Error::custom("quantity exceeds 64 bits"));
        }
        Ok(value.low_u64())
    }

    pub fn u256<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        decode(deserializer)
    }

    pub fn option_u64<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        u64_from_value("quantity", &value)
            .map(Some)
            .map_err(de::Error::custom)
    }

    pub fn option_u256<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<U256>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(None);
        }
        u256_from_value("quantity", &value)
            .map(Some)
            .map_err(de::Error::custom)
    }
}

/// Ticket as reported by the node
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ticket {
    /// Owning account; omitted by the per-address listing
    #[serde(default)]
    pub owner: Option<Address>,
    /// Block height the ticket was bought at
    #[serde(deserialize_with = "quantity::u64")]
    pub height: u64,
    /// Unix time the ticket becomes eligible
    #[serde(deserialize_with = "quantity::u64")]
    pub start_time: u64,
    /// Unix time the ticket expires
    #[serde(deserialize_with = "quantity::u64")]
    pub expire_time: u64,
}

/// Tickets keyed by ticket id
pub type TicketMap = BTreeMap<H256, Ticket>;

/// Asset metadata returned by `fsn_getAsset`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetInfo {
    /// Asset id
    #[serde(rename = "ID")]
    pub id: H256,
    /// Issuer
    #[serde(rename = "Owner")]
    pub owner: Address,
    /// Display name
    #[serde(rename = "Name")]
    pub name: String,
    /// Ticker symbol
    #[serde(rename = "Symbol")]
    pub symbol: String,
    /// Decimal places
    #[serde(rename = "Decimals")]
    pub decimals: u8,
    /// Total supply in the minor unit
    #[serde(rename = "Total", deserialize_with = "quantity::u256")]
    pub total: U256,
    /// Whether the issuer may change the supply
    #[serde(rename = "CanChange")]
    pub can_change: bool,
    /// Free-form description
    #[serde(rename = "Description", default)]
    pub description: String,
}

/// One time window of a time-lock balance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TimeLockItem {
    /// Window start (unix seconds)
    #[serde(deserialize_with = "quantity::u64")]
    pub start_time: u64,
    /// Window end (unix seconds, [`crate::constants::TIME_FOREVER`] for open-ended)
    #[serde(deserialize_with = "quantity::u64")]
    pub end_time: u64,
    /// Amount usable within the window
    #[serde(deserialize_with = "quantity::u256")]
    pub value: U256,
}

/// Time-lock balance of one asset
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TimeLock {
    /// Locked windows
    #[serde(rename = "Items", default, deserialize_with = "null_as_empty")]
    pub items: Vec<TimeLockItem>,
}

impl TimeLock {
    /// True when nothing is locked
    pub fn is_empty(&self) -> bool {
        self.items.iter().all(|item| item.value.is_zero())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<TimeLockItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<TimeLockItem>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Arguments accepted where an account address is expected
///
/// Strings must be `0x`-prefixed, 40 hex digits, and either single-case or
/// EIP-55 checksummed. Integers are read as big-endian addresses.
pub trait IntoAddress {
    /// Validate and convert, naming `field` on failure
    fn into_address(self, field: &str) -> Result<Address, ValidationError>;
}

impl IntoAddress for Address {
    fn into_address(self, _field: &str) -> Result<Address, ValidationError> {
        Ok(self)
    }
}

impl IntoAddress for &Address {
    fn into_address(self, _field: &str) -> Result<Address, ValidationError> {
        Ok(*self)
    }
}

impl IntoAddress for &str {
    fn into_address(self, field: &str) -> Result<Address, ValidationError> {
        if !is_valid_checksum(self) {
            return Err(ValidationError::malformed_address(field));
        }
        Address::from_prefixed_hex(self).map_err(|_| ValidationError::malformed_address(field))
    }
}

impl IntoAddress for &String {
    fn into_address(self, field: &str) -> Result<Address, ValidationError> {
        self.as_str().into_address(field)
    }
}

impl IntoAddress for String {
    fn into_address(self, field: &str) -> Result<Address, ValidationError> {
        self.as_str().into_address(field)
    }
}

impl IntoAddress for u64 {
    fn into_address(self, _field: &str) -> Result<Address, ValidationError> {
        Ok(Address::from_low_u64(self))
    }
}

impl IntoAddress for U256 {
    fn into_address(self, field: &str) -> Result<Address, ValidationError> {
        Address::from_u256(self).map_err(|_| ValidationError::malformed_address(field))
    }
}

/// Arguments accepted where a 32-byte asset, swap or ticket id is expected
///
/// Strings must be exactly `0x` plus 64 hex digits.
pub trait IntoAssetId {
    /// Validate and convert, naming `field` on failure
    fn into_asset_id(self, field: &str) -> Result<H256, ValidationError>;
}

impl IntoAssetId for H256 {
    fn into_asset_id(self, _field: &str) -> Result<H256, ValidationError> {
        Ok(self)
    }
}

impl IntoAssetId for &H256 {
    fn into_asset_id(self, _field: &str) -> Result<H256, ValidationError> {
        Ok(*self)
    }
}

impl IntoAssetId for &str {
    fn into_asset_id(self, field: &str) -> Result<H256, ValidationError> {
        H256::from_prefixed_hex(self).map_err(|_| ValidationError::malformed_hex(field))
    }
}

impl IntoAssetId for &String {
    fn into_asset_id(self, field: &str) -> Result<H256, ValidationError> {
        self.as_str().into_asset_id(field)
    }
}

/// Read an address out of a loosely typed JSON value
pub(crate) fn address_from_value(field: &str, value: &Value) -> Result<Address, ValidationError> {
    match value {
        Value::String(s) => s.as_str().into_address(field),
        Value::Number(n) => n
            .as_u64()
            .map(Address::from_low_u64)
            .ok_or_else(|| ValidationError::malformed_address(field)),
        _ => Err(ValidationError::wrong_type(field, "address string or integer")),
    }
}

/// Read a 32-byte id out of a loosely typed JSON value
pub(crate) fn asset_id_from_value(field: &str, value: &Value) -> Result<H256, ValidationError> {
    match value {
        Value::String(s) => s.as_str().into_asset_id(field),
        _ => Err(ValidationError::wrong_type(field, "0x-prefixed 32-byte hex string")),
    }
}
