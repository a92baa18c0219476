//! Default filling, signing and submission
//!
//! Every operation kind goes through the same stages:
//!
//! 1. authorise the sender against the signer (skipped when preparing only)
//! 2. resolve a `default` gas price to the kind's fixed price
//! 3. have the node build the transaction, or fill a generic send locally
//! 4. stamp the client's chain id
//! 5. stop here when preparing only
//! 6. sign unless the transaction already carries a signature
//! 7. broadcast and return the hash
//!
//! Nothing is retried. A failure after stage 3 leaves the node informed of
//! the intent but nothing broadcast.

use fsn_primitives::{H256, U256};
use serde_json::{json, Value};

use crate::account::Signer;
use crate::error::ValidationError;
use crate::transaction::{PreparedTransaction, SignatureState, SignedPayload};
use crate::transport::Transport;
use crate::tx_builder::{GasPrice, IntentPayload, OperationKind, TransactionIntent};
use crate::types::u256_from_value;
use crate::SdkError;

/// Whether to stop before signing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitMode {
    /// Sign (if needed) and broadcast
    #[default]
    Submit,
    /// Return the defaults-filled transaction without signing or sending
    PrepareOnly,
}

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Prepare-only result
    Prepared(PreparedTransaction),
    /// Hash of the broadcast transaction
    Sent(H256),
}

impl Submission {
    /// Hash, if the transaction was broadcast
    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            Submission::Sent(hash) => Some(*hash),
            Submission::Prepared(_) => None,
        }
    }

    /// Prepared transaction, if the run stopped before signing
    pub fn into_prepared(self) -> Option<PreparedTransaction> {
        match self {
            Submission::Prepared(tx) => Some(tx),
            Submission::Sent(_) => None,
        }
    }
}

/// Submission pipeline over a transport
pub struct Pipeline<'a> {
    transport: &'a dyn Transport,
    chain_id: u64,
}

impl<'a> Pipeline<'a> {
    /// Pipeline stamping `chain_id` on everything it prepares
    pub fn new(transport: &'a dyn Transport, chain_id: u64) -> Self {
        Self {
            transport,
            chain_id,
        }
    }

    /// Chain id stamped on prepared transactions
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Check the sender may submit through `signer`
    pub fn authorize(
        intent: &TransactionIntent,
        signer: Option<&dyn Signer>,
        mode: SubmitMode,
    ) -> Result<(), SdkError> {
        if mode == SubmitMode::PrepareOnly {
            return Ok(());
        }
        let signer = signer.ok_or(SdkError::NoSigningKey)?;
        if signer.address() != intent.from {
            return Err(SdkError::SenderMismatch {
                expected: signer.address(),
                found: intent.from,
            });
        }
        Ok(())
    }

    /// Run an intent through every stage
    pub async fn run(
        &self,
        mut intent: TransactionIntent,
        signer: Option<&dyn Signer>,
        mode: SubmitMode,
    ) -> Result<Submission, SdkError> {
        Self::authorize(&intent, signer, mode)?;
        intent.resolve_gas_price()?;
        tracing::debug!(kind = %intent.kind, from = %intent.from, ?mode, "pipeline start");

        let prepared = self
            .prepare(&intent)
            .await?
            .with_chain_id(self.chain_id)
            .with_sender(intent.from);
        if mode == SubmitMode::PrepareOnly {
            tracing::debug!(kind = %intent.kind, "prepared only, not signing");
            return Ok(Submission::Prepared(prepared));
        }

        let hash = self.sign_and_send(&prepared, signer).await?;
        tracing::info!(kind = %intent.kind, tx_hash = %hash, "transaction submitted");
        Ok(Submission::Sent(hash))
    }

    /// Remote build for FSN kinds, local default filling for generic sends
    async fn prepare(&self, intent: &TransactionIntent) -> Result<PreparedTransaction, SdkError> {
        match intent.kind.build_method() {
            Some(method) => {
                tracing::debug!(kind = %intent.kind, method, "remote build");
                let built = self
                    .transport
                    .request_json(method, vec![intent.to_params()])
                    .await?;
                if built.is_null() {
                    return Err(SdkError::NotFound(format!("{} returned no transaction", method)));
                }
                PreparedTransaction::from_value(built)
            }
            None => self.fill_defaults(intent).await,
        }
    }

    async fn fill_defaults(
        &self,
        intent: &TransactionIntent,
    ) -> Result<PreparedTransaction, SdkError> {
        let IntentPayload::Send { to, value, data } = &intent.payload else {
            return Err(SdkError::Config(format!(
                "{} has no build method and cannot be filled locally",
                intent.kind
            )));
        };
        debug_assert_eq!(intent.kind, OperationKind::Send);

        let nonce = match intent.nonce {
            Some(nonce) => nonce,
            None => {
                let count = self
                    .quantity(
                        "eth_getTransactionCount",
                        vec![json!(intent.from), json!("pending")],
                    )
                    .await?;
                low_u64(count, "eth_getTransactionCount")?
            }
        };
        let gas_price = match intent.gas_price {
            Some(GasPrice::Wei(price)) => price,
            // resolve_gas_price has already run, but fall back to the node anyway
            Some(GasPrice::Default) | None => self.quantity("eth_gasPrice", vec![]).await?,
        };
        let gas = match intent.gas {
            Some(gas) => gas,
            None => {
                let estimate = self
                    .quantity("eth_estimateGas", vec![intent.to_params()])
                    .await?;
                low_u64(estimate, "eth_estimateGas")?
            }
        };
        tracing::debug!(nonce, gas, %gas_price, "filled generic send defaults");

        Ok(PreparedTransaction {
            from: Some(intent.from),
            nonce,
            gas_price,
            gas,
            to: *to,
            value: *value,
            input: data.clone(),
            chain_id: Some(self.chain_id),
            v: None,
            r: None,
            s: None,
            hash: None,
        })
    }

    async fn quantity(&self, method: &str, params: Vec<Value>) -> Result<U256, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        u256_from_value(method, &value)
            .map_err(|e| SdkError::rpc_transport(method, format!("bad quantity: {}", e)))
    }

    /// Sign if needed and broadcast on the path the signature state selects
    pub async fn sign_and_send(
        &self,
        prepared: &PreparedTransaction,
        signer: Option<&dyn Signer>,
    ) -> Result<H256, SdkError> {
        let state = SignatureState::of(prepared)?;
        tracing::debug!(?state, "signature state");

        let payload = if state.needs_local_signature() {
            let signer = signer.ok_or(SdkError::NoSigningKey)?;
            let from = prepared.from.ok_or_else(|| ValidationError::missing("from"))?;
            if from != signer.address() {
                return Err(SdkError::SenderMismatch {
                    expected: signer.address(),
                    found: from,
                });
            }
            signer.sign_transaction(prepared, self.chain_id)?
        } else {
            prepared.presigned_payload()?
        };

        self.send_raw(state.raw_send_method(), &payload).await
    }

    /// Broadcast a signed payload
    pub async fn send_raw(&self, method: &str, payload: &SignedPayload) -> Result<H256, SdkError> {
        tracing::debug!(method, local_hash = %payload.hash, "broadcasting");
        let result = self
            .transport
            .request_json(method, vec![Value::String(payload.to_hex())])
            .await?;
        parse_tx_hash(method, result)
    }
}

fn low_u64(value: U256, method: &str) -> Result<u64, SdkError> {
    if value.bits() > 64 {
        return Err(SdkError::rpc_transport(method, "quantity exceeds 64 bits"));
    }
    Ok(value.low_u64())
}

/// Read a transaction hash from a send result
///
/// Nodes answer with a hex string; some transports hand back the raw bytes
/// as an array, which are hex-encoded first.
pub fn parse_tx_hash(method: &str, result: Value) -> Result<H256, SdkError> {
    let hex = match result {
        Value::String(s) => s,
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| SdkError::rpc_transport(method, "hash is not a byte array"))?;
            format!("0x{}", hex::encode(bytes))
        }
        Value::Null => {
            return Err(SdkError::NotFound(format!("{} returned no hash", method)));
        }
        other => {
            return Err(SdkError::rpc_transport(
                method,
                format!("unexpected hash value {}", other),
            ));
        }
    };
    H256::from_hex(&hex).map_err(|e| SdkError::rpc_transport(method, e))
}
