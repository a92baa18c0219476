//! Transaction builders
//!
//! One pure function per operation kind turns a loosely typed JSON request
//! into a [`TransactionIntent`]. Builders only validate and normalise; they
//! never touch the network.

use std::fmt;

use bytes::Bytes;
use fsn_primitives::{Address, H256, U256};
use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::types::{address_from_value, asset_id_from_value, to_quantity, u256_from_value, u64_from_value};
use crate::units::parse_fsn;
use crate::SdkError;

/// Operation kinds understood by the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Issue a new asset
    CreateAsset,
    /// Mint more of an asset
    IncrementAsset,
    /// Burn some of an asset
    DecrementAsset,
    /// Transfer an asset
    SendAsset,
    /// Move a plain balance into a time-lock
    AssetToTimeLock,
    /// Move a time-lock back into a plain balance
    TimeLockToAsset,
    /// Move a time-lock to another time-lock
    TimeLockToTimeLock,
    /// Offer a swap
    MakeSwap,
    /// Withdraw a swap offer
    RecallSwap,
    /// Accept a swap offer
    TakeSwap,
    /// Buy a mining ticket
    BuyTicket,
    /// Register a notation for the sender
    GenNotation,
    /// Plain FSN transfer or contract call
    Send,
}

impl OperationKind {
    /// Every kind
    pub const ALL: [OperationKind; 13] = [
        OperationKind::CreateAsset,
        OperationKind::IncrementAsset,
        OperationKind::DecrementAsset,
        OperationKind::SendAsset,
        OperationKind::AssetToTimeLock,
        OperationKind::TimeLockToAsset,
        OperationKind::TimeLockToTimeLock,
        OperationKind::MakeSwap,
        OperationKind::RecallSwap,
        OperationKind::TakeSwap,
        OperationKind::BuyTicket,
        OperationKind::GenNotation,
        OperationKind::Send,
    ];

    /// Short name, as used in the node's method names
    pub fn name(self) -> &'static str {
        match self {
            OperationKind::CreateAsset => "genAsset",
            OperationKind::IncrementAsset => "incAsset",
            OperationKind::DecrementAsset => "decAsset",
            OperationKind::SendAsset => "sendAsset",
            OperationKind::AssetToTimeLock => "assetToTimeLock",
            OperationKind::TimeLockToAsset => "timeLockToAsset",
            OperationKind::TimeLockToTimeLock => "timeLockToTimeLock",
            OperationKind::MakeSwap => "makeSwap",
            OperationKind::RecallSwap => "recallSwap",
            OperationKind::TakeSwap => "takeSwap",
            OperationKind::BuyTicket => "buyTicket",
            OperationKind::GenNotation => "genNotation",
            OperationKind::Send => "sendTransaction",
        }
    }

    /// Node method returning the unsigned transaction; generic sends are
    /// filled locally instead
    pub fn build_method(self) -> Option<&'static str> {
        Some(match self {
            OperationKind::CreateAsset => "fsntx_buildGenAssetTx",
            OperationKind::IncrementAsset => "fsntx_buildIncAssetTx",
            OperationKind::DecrementAsset => "fsntx_buildDecAssetTx",
            OperationKind::SendAsset => "fsntx_buildSendAssetTx",
            OperationKind::AssetToTimeLock => "fsntx_buildAssetToTimeLockTx",
            OperationKind::TimeLockToAsset => "fsntx_buildTimeLockToAssetTx",
            OperationKind::TimeLockToTimeLock => "fsntx_buildTimeLockToTimeLockTx",
            OperationKind::MakeSwap => "fsntx_buildMakeSwapTx",
            OperationKind::RecallSwap => "fsntx_buildRecallSwapTx",
            OperationKind::TakeSwap => "fsntx_buildTakeSwapTx",
            OperationKind::BuyTicket => "fsntx_buildBuyTicketTx",
            OperationKind::GenNotation => "fsntx_buildGenNotationTx",
            OperationKind::Send => return None,
        })
    }

    /// Node method that signs with an unlocked node account and broadcasts
    pub fn send_method(self) -> &'static str {
        match self {
            OperationKind::CreateAsset => "fsntx_genAsset",
            OperationKind::IncrementAsset => "fsntx_incAsset",
            OperationKind::DecrementAsset => "fsntx_decAsset",
            OperationKind::SendAsset => "fsntx_sendAsset",
            OperationKind::AssetToTimeLock => "fsntx_assetToTimeLock",
            OperationKind::TimeLockToAsset => "fsntx_timeLockToAsset",
            OperationKind::TimeLockToTimeLock => "fsntx_timeLockToTimeLock",
            OperationKind::MakeSwap => "fsntx_makeSwap",
            OperationKind::RecallSwap => "fsntx_recallSwap",
            OperationKind::TakeSwap => "fsntx_takeSwap",
            OperationKind::BuyTicket => "fsntx_buyTicket",
            OperationKind::GenNotation => "fsntx_genNotation",
            OperationKind::Send => "eth_sendTransaction",
        }
    }

    /// Default gas price in FSN; fixed by the network
    pub fn default_gas_price(self) -> &'static str {
        match self {
            OperationKind::Send => "0.000000021",
            OperationKind::CreateAsset => "0.00009",
            OperationKind::SendAsset => "0.00005",
            OperationKind::IncrementAsset | OperationKind::DecrementAsset => "0.00003",
            OperationKind::GenNotation => "0.00005",
            OperationKind::AssetToTimeLock => "0.00003",
            OperationKind::TimeLockToAsset => "0.00003",
            OperationKind::TimeLockToTimeLock => "0.00005",
            OperationKind::MakeSwap => "0.00006",
            OperationKind::RecallSwap => "0.00005",
            OperationKind::TakeSwap => "0.00003",
            OperationKind::BuyTicket => "0.00003",
        }
    }

    /// Default gas price in the minor unit
    pub fn default_gas_price_wei(self) -> Result<U256, SdkError> {
        parse_fsn(self.default_gas_price()).map_err(|e| {
            SdkError::Config(format!("default gas price of {}: {}", self.name(), e))
        })
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Gas price as given by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPrice {
    /// Use the kind's default
    Default,
    /// Explicit price in the minor unit
    Wei(U256),
}

/// Kind-specific part of an intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentPayload {
    /// [`OperationKind::CreateAsset`]
    CreateAsset {
        /// Display name
        name: String,
        /// Ticker symbol
        symbol: String,
        /// Decimal places
        decimals: u8,
        /// Initial supply in the minor unit
        total: U256,
        /// Whether supply may change later
        can_change: bool,
        /// Free-form description
        description: String,
    },
    /// [`OperationKind::IncrementAsset`] and [`OperationKind::DecrementAsset`]
    AssetSupply {
        /// Account credited or debited
        to: Address,
        /// Asset id
        asset: H256,
        /// Amount
        value: U256,
        /// Free-form note stored with the change
        transac_data: Option<String>,
    },
    /// [`OperationKind::SendAsset`]
    Transfer {
        /// Recipient
        to: Address,
        /// Asset id
        asset: H256,
        /// Amount
        value: U256,
    },
    /// The three time-lock conversions
    TimeLock {
        /// Recipient
        to: Address,
        /// Asset id
        asset: H256,
        /// Amount
        value: U256,
        /// Window start (unix seconds), node default when absent
        start: Option<u64>,
        /// Window end (unix seconds), node default when absent
        end: Option<u64>,
    },
    /// [`OperationKind::MakeSwap`]
    MakeSwap(SwapTerms),
    /// [`OperationKind::RecallSwap`]
    RecallSwap {
        /// Swap id
        swap_id: H256,
    },
    /// [`OperationKind::TakeSwap`]
    TakeSwap {
        /// Swap id
        swap_id: H256,
        /// Number of swap units taken
        size: U256,
    },
    /// [`OperationKind::BuyTicket`]
    BuyTicket {
        /// Ticket start time
        start: Option<u64>,
        /// Ticket expiry time
        end: Option<u64>,
    },
    /// [`OperationKind::GenNotation`]
    GenNotation,
    /// [`OperationKind::Send`]
    Send {
        /// Recipient, absent for contract creation
        to: Option<Address>,
        /// FSN amount in the minor unit
        value: U256,
        /// Call data
        data: Bytes,
    },
}

/// Terms of a swap offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapTerms {
    /// Asset offered
    pub from_asset_id: H256,
    /// Time-lock start of the offered asset
    pub from_start_time: Option<u64>,
    /// Time-lock end of the offered asset
    pub from_end_time: Option<u64>,
    /// Offered amount per swap unit
    pub min_from_amount: U256,
    /// Asset requested
    pub to_asset_id: H256,
    /// Time-lock start of the requested asset
    pub to_start_time: Option<u64>,
    /// Time-lock end of the requested asset
    pub to_end_time: Option<u64>,
    /// Requested amount per swap unit
    pub min_to_amount: U256,
    /// Number of swap units
    pub swap_size: U256,
    /// Accounts allowed to take the swap; empty for anyone
    pub targets: Vec<Address>,
    /// Offer time
    pub time: Option<u64>,
    /// Free-form description
    pub description: String,
}

/// Canonical, validated description of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    /// Operation kind
    pub kind: OperationKind,
    /// Sender
    pub from: Address,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<GasPrice>,
    /// Nonce
    pub nonce: Option<u64>,
    /// Chain id the intent was built for
    pub chain_id: u64,
    /// Kind-specific fields
    pub payload: IntentPayload,
}

impl TransactionIntent {
    /// Replace a `default` gas price with the kind's fixed default
    pub fn resolve_gas_price(&mut self) -> Result<(), SdkError> {
        if self.gas_price == Some(GasPrice::Default) {
            self.gas_price = Some(GasPrice::Wei(self.kind.default_gas_price_wei()?));
        }
        Ok(())
    }

    /// Wire form passed to the build and send methods
    ///
    /// A still-unresolved `default` gas price is left out.
    pub fn to_params(&self) -> Value {
        let mut map = Map::new();
        map.insert("from".into(), Value::String(self.from.to_hex()));
        if let Some(gas) = self.gas {
            map.insert("gas".into(), Value::String(to_quantity(gas)));
        }
        if let Some(GasPrice::Wei(price)) = self.gas_price {
            map.insert("gasPrice".into(), Value::String(to_quantity(price)));
        }
        if let Some(nonce) = self.nonce {
            map.insert("nonce".into(), Value::String(to_quantity(nonce)));
        }

        let mut put = |key: &str, value: Value| {
            map.insert(key.to_string(), value);
        };
        let quantity = |v: U256| Value::String(to_quantity(v));
        let opt_time = |v: Option<u64>| v.map(|t| Value::String(to_quantity(t)));

        match &self.payload {
            IntentPayload::CreateAsset {
                name,
                symbol,
                decimals,
                total,
                can_change,
                description,
            } => {
                put("name", Value::String(name.clone()));
                put("symbol", Value::String(symbol.clone()));
                put("decimals", Value::from(*decimals));
                put("total", quantity(*total));
                put("canChange", Value::Bool(*can_change));
                put("description", Value::String(description.clone()));
            }
            IntentPayload::AssetSupply {
                to,
                asset,
                value,
                transac_data,
            } => {
                put("to", Value::String(to.to_hex()));
                put("asset", Value::String(asset.to_hex()));
                put("value", quantity(*value));
                if let Some(data) = transac_data {
                    put("transacData", Value::String(data.clone()));
                }
            }
            IntentPayload::Transfer { to, asset, value } => {
                put("to", Value::String(to.to_hex()));
                put("asset", Value::String(asset.to_hex()));
                put("value", quantity(*value));
            }
            IntentPayload::TimeLock {
                to,
                asset,
                value,
                start,
                end,
            } => {
                put("to", Value::String(to.to_hex()));
                put("asset", Value::String(asset.to_hex()));
                put("value", quantity(*value));
                if let Some(start) = opt_time(*start) {
                    put("start", start);
                }
                if let Some(end) = opt_time(*end) {
                    put("end", end);
                }
            }
            IntentPayload::MakeSwap(terms) => {
                put("FromAssetID", Value::String(terms.from_asset_id.to_hex()));
                put("MinFromAmount", quantity(terms.min_from_amount));
                put("ToAssetID", Value::String(terms.to_asset_id.to_hex()));
                put("MinToAmount", quantity(terms.min_to_amount));
                put("SwapSize", quantity(terms.swap_size));
                for (key, time) in [
                    ("FromStartTime", terms.from_start_time),
                    ("FromEndTime", terms.from_end_time),
                    ("ToStartTime", terms.to_start_time),
                    ("ToEndTime", terms.to_end_time),
                    ("Time", terms.time),
                ] {
                    if let Some(time) = opt_time(time) {
                        put(key, time);
                    }
                }
                put(
                    "Targes",
                    Value::Array(
                        terms
                            .targets
                            .iter()
                            .map(|a| Value::String(a.to_hex()))
                            .collect(),
                    ),
                );
                put("Description", Value::String(terms.description.clone()));
            }
            IntentPayload::RecallSwap { swap_id } => {
                put("SwapID", Value::String(swap_id.to_hex()));
            }
            IntentPayload::TakeSwap { swap_id, size } => {
                put("SwapID", Value::String(swap_id.to_hex()));
                put("Size", quantity(*size));
            }
            IntentPayload::BuyTicket { start, end } => {
                if let Some(start) = opt_time(*start) {
                    put("start", start);
                }
                if let Some(end) = opt_time(*end) {
                    put("end", end);
                }
            }
            IntentPayload::GenNotation => {}
            IntentPayload::Send { to, value, data } => {
                if let Some(to) = to {
                    put("to", Value::String(to.to_hex()));
                }
                put("value", quantity(*value));
                put("data", Value::String(format!("0x{}", hex::encode(data))));
            }
        }
        Value::Object(map)
    }
}

/// Typed access to the fields of a request object
struct RequestFields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> RequestFields<'a> {
    fn new(request: &'a Value) -> Result<Self, ValidationError> {
        request
            .as_object()
            .map(|map| Self { map })
            .ok_or_else(|| ValidationError::wrong_type("request", "JSON object"))
    }

    /// Present and not null
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn require(&self, key: &str) -> Result<&'a Value, ValidationError> {
        self.get(key).ok_or_else(|| ValidationError::missing(key))
    }

    fn address(&self, key: &str) -> Result<Address, ValidationError> {
        address_from_value(key, self.require(key)?)
    }

    fn opt_address(&self, key: &str) -> Result<Option<Address>, ValidationError> {
        self.get(key).map(|v| address_from_value(key, v)).transpose()
    }

    fn asset_id(&self, key: &str) -> Result<H256, ValidationError> {
        asset_id_from_value(key, self.require(key)?)
    }

    fn u256(&self, key: &str) -> Result<U256, ValidationError> {
        u256_from_value(key, self.require(key)?)
    }

    fn opt_u256(&self, key: &str) -> Result<Option<U256>, ValidationError> {
        self.get(key).map(|v| u256_from_value(key, v)).transpose()
    }

    fn opt_u64(&self, key: &str) -> Result<Option<u64>, ValidationError> {
        self.get(key).map(|v| u64_from_value(key, v)).transpose()
    }

    fn string(&self, key: &str) -> Result<String, ValidationError> {
        self.opt_string(key)?.ok_or_else(|| ValidationError::missing(key))
    }

    fn opt_string(&self, key: &str) -> Result<Option<String>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ValidationError::wrong_type(key, "string")),
        }
    }

    fn opt_bool(&self, key: &str) -> Result<Option<bool>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ValidationError::wrong_type(key, "boolean")),
        }
    }

    fn opt_hex_data(&self, key: &str) -> Result<Option<Bytes>, ValidationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => {
                let digits = s
                    .strip_prefix("0x")
                    .ok_or_else(|| ValidationError::malformed_hex(key))?;
                hex::decode(digits)
                    .map(|b| Some(Bytes::from(b)))
                    .map_err(|_| ValidationError::malformed_hex(key))
            }
            Some(_) => Err(ValidationError::wrong_type(key, "0x-prefixed hex string")),
        }
    }

    fn address_list(&self, key: &str) -> Result<Vec<Address>, ValidationError> {
        match self.get(key) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| address_from_value(key, item))
                .collect(),
            Some(_) => Err(ValidationError::wrong_type(key, "array of addresses")),
        }
    }

    /// `"default"`, a `0x` quantity in the minor unit, or an FSN amount
    fn gas_price(&self) -> Result<Option<GasPrice>, ValidationError> {
        const KEY: &str = "gasPrice";
        const EXPECTED: &str = "\"default\", 0x wei quantity or FSN amount";
        let fsn = |amount: &str| {
            parse_fsn(amount)
                .map(GasPrice::Wei)
                .map_err(|_| ValidationError::wrong_type(KEY, EXPECTED))
        };
        match self.get(KEY) {
            None => Ok(None),
            Some(Value::String(s)) if s == "default" => Ok(Some(GasPrice::Default)),
            Some(Value::String(s)) if s.starts_with("0x") => u256_from_value(KEY, &Value::String(s.clone()))
                .map(|v| Some(GasPrice::Wei(v))),
            Some(Value::String(s)) => fsn(s).map(Some),
            Some(Value::Number(n)) => {
                let amount = match (n.as_u64(), n.as_f64()) {
                    (Some(whole), _) => whole.to_string(),
                    (None, Some(f)) if f.is_finite() && f >= 0.0 => format!("{}", f),
                    _ => return Err(ValidationError::wrong_type(KEY, EXPECTED)),
                };
                fsn(&amount).map(Some)
            }
            Some(_) => Err(ValidationError::wrong_type(KEY, EXPECTED)),
        }
    }

    fn intent(
        &self,
        kind: OperationKind,
        chain_id: u64,
        payload: IntentPayload,
    ) -> Result<TransactionIntent, ValidationError> {
        Ok(TransactionIntent {
            kind,
            from: self.address("from")?,
            gas: self.opt_u64("gas")?,
            gas_price: self.gas_price()?,
            nonce: self.opt_u64("nonce")?,
            chain_id,
            payload,
        })
    }
}

/// Validate `request` as an operation of `kind`
pub fn build(
    kind: OperationKind,
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    match kind {
        OperationKind::CreateAsset => build_create_asset(request, chain_id),
        OperationKind::IncrementAsset | OperationKind::DecrementAsset => {
            build_asset_supply(kind, request, chain_id)
        }
        OperationKind::SendAsset => build_send_asset(request, chain_id),
        OperationKind::AssetToTimeLock
        | OperationKind::TimeLockToAsset
        | OperationKind::TimeLockToTimeLock => build_time_lock(kind, request, chain_id),
        OperationKind::MakeSwap => build_make_swap(request, chain_id),
        OperationKind::RecallSwap => build_recall_swap(request, chain_id),
        OperationKind::TakeSwap => build_take_swap(request, chain_id),
        OperationKind::BuyTicket => build_buy_ticket(request, chain_id),
        OperationKind::GenNotation => build_gen_notation(request, chain_id),
        OperationKind::Send => build_send(request, chain_id),
    }
}

/// Issue a new asset
pub fn build_create_asset(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let decimals = u64_from_value("decimals", fields.require("decimals")?)?;
    let decimals = u8::try_from(decimals)
        .map_err(|_| ValidationError::wrong_type("decimals", "integer between 0 and 255"))?;
    let payload = IntentPayload::CreateAsset {
        name: fields.string("name")?,
        symbol: fields.string("symbol")?,
        decimals,
        total: fields.u256("total")?,
        can_change: fields.opt_bool("canChange")?.unwrap_or(false),
        description: fields.opt_string("description")?.unwrap_or_default(),
    };
    fields.intent(OperationKind::CreateAsset, chain_id, payload)
}

/// Mint or burn an asset
pub fn build_asset_supply(
    kind: OperationKind,
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    debug_assert!(matches!(
        kind,
        OperationKind::IncrementAsset | OperationKind::DecrementAsset
    ));
    let fields = RequestFields::new(request)?;
    let payload = IntentPayload::AssetSupply {
        to: fields.address("to")?,
        asset: fields.asset_id("asset")?,
        value: fields.u256("value")?,
        transac_data: fields.opt_string("transacData")?,
    };
    fields.intent(kind, chain_id, payload)
}

/// Transfer an asset
pub fn build_send_asset(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let payload = IntentPayload::Transfer {
        to: fields.address("to")?,
        asset: fields.asset_id("asset")?,
        value: fields.u256("value")?,
    };
    fields.intent(OperationKind::SendAsset, chain_id, payload)
}

/// Convert between plain and time-locked balances
pub fn build_time_lock(
    kind: OperationKind,
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    debug_assert!(matches!(
        kind,
        OperationKind::AssetToTimeLock
            | OperationKind::TimeLockToAsset
            | OperationKind::TimeLockToTimeLock
    ));
    let fields = RequestFields::new(request)?;
    let start = fields.opt_u64("start")?;
    let end = fields.opt_u64("end")?;
    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(ValidationError::wrong_type("end", "time not before start"));
        }
    }
    let payload = IntentPayload::TimeLock {
        to: fields.address("to")?,
        asset: fields.asset_id("asset")?,
        value: fields.u256("value")?,
        start,
        end,
    };
    fields.intent(kind, chain_id, payload)
}

/// Offer a swap
pub fn build_make_swap(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let terms = SwapTerms {
        from_asset_id: fields.asset_id("FromAssetID")?,
        from_start_time: fields.opt_u64("FromStartTime")?,
        from_end_time: fields.opt_u64("FromEndTime")?,
        min_from_amount: fields.u256("MinFromAmount")?,
        to_asset_id: fields.asset_id("ToAssetID")?,
        to_start_time: fields.opt_u64("ToStartTime")?,
        to_end_time: fields.opt_u64("ToEndTime")?,
        min_to_amount: fields.u256("MinToAmount")?,
        swap_size: fields.u256("SwapSize")?,
        targets: fields.address_list("Targes")?,
        time: fields.opt_u64("Time")?,
        description: fields.opt_string("Description")?.unwrap_or_default(),
    };
    if terms.swap_size.is_zero() {
        return Err(ValidationError::wrong_type("SwapSize", "positive integer"));
    }
    fields.intent(OperationKind::MakeSwap, chain_id, IntentPayload::MakeSwap(terms))
}

/// Withdraw a swap offer
pub fn build_recall_swap(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let payload = IntentPayload::RecallSwap {
        swap_id: fields.asset_id("SwapID")?,
    };
    fields.intent(OperationKind::RecallSwap, chain_id, payload)
}

/// Accept a swap offer
pub fn build_take_swap(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let payload = IntentPayload::TakeSwap {
        swap_id: fields.asset_id("SwapID")?,
        size: fields.u256("Size")?,
    };
    fields.intent(OperationKind::TakeSwap, chain_id, payload)
}

/// Buy a ticket
pub fn build_buy_ticket(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let payload = IntentPayload::BuyTicket {
        start: fields.opt_u64("start")?,
        end: fields.opt_u64("end")?,
    };
    fields.intent(OperationKind::BuyTicket, chain_id, payload)
}

/// Register a notation
pub fn build_gen_notation(
    request: &Value,
    chain_id: u64,
) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    fields.intent(OperationKind::GenNotation, chain_id, IntentPayload::GenNotation)
}

/// Plain transfer or contract call
pub fn build_send(request: &Value, chain_id: u64) -> Result<TransactionIntent, ValidationError> {
    let fields = RequestFields::new(request)?;
    let data = match fields.opt_hex_data("data")? {
        Some(data) => data,
        None => fields.opt_hex_data("input")?.unwrap_or_default(),
    };
    let payload = IntentPayload::Send {
        to: fields.opt_address("to")?,
        value: fields.opt_u256("value")?.unwrap_or_default(),
        data,
    };
    fields.intent(OperationKind::Send, chain_id, payload)
}
