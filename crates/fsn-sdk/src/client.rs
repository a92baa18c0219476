//! FsnClient - main RPC client

use std::sync::OnceLock;

use fsn_primitives::H256;
use serde_json::Value;

use crate::account::{Account, Signer};
use crate::config::{ChainLink, Network};
use crate::constants::{self, TIME_FOREVER};
use crate::pipeline::{parse_tx_hash, Pipeline, SubmitMode, Submission};
use crate::transaction::PreparedTransaction;
use crate::transport::{self, deserialize_response, MockTransport, Transport};
use crate::tx_builder::{self, OperationKind, TransactionIntent};
use crate::types::{u64_from_value, BlockId};
use crate::SdkError;

/// Fusion client
///
/// Holds one transport, the network's fixed chain id and at most one
/// signing account. Submissions made through one client are serialised so
/// they cannot race each other on nonce assignment; submissions from other
/// clients for the same account still can.
pub struct FsnClient {
    transport: Box<dyn Transport>,
    network: Network,
    chain_id: u64,
    gateway: Option<String>,
    account: OnceLock<Account>,
    default_block: BlockId,
    submission_lock: tokio::sync::Mutex<()>,
}

impl FsnClient {
    /// Connect as described by `link`
    ///
    /// The descriptor and key are checked before any connection is opened.
    pub async fn connect(link: ChainLink) -> Result<Self, SdkError> {
        link.validate()?;
        let account = link
            .private_key
            .as_deref()
            .map(Account::from_private_key_hex)
            .transpose()?;
        let gateway = link.resolve_gateway()?;
        let transport = transport::connect(&link).await?;

        tracing::info!(
            network = %link.network,
            provider = %link.provider,
            %gateway,
            account = ?account.as_ref().map(|a| a.checksum_address()),
            "connected to fusion gateway"
        );

        let client = Self {
            transport,
            network: link.network,
            chain_id: link.chain_id(),
            gateway: Some(gateway),
            account: OnceLock::new(),
            default_block: BlockId::Latest,
            submission_lock: tokio::sync::Mutex::new(()),
        };
        if let Some(account) = account {
            client.install_account(account)?;
        }
        Ok(client)
    }

    /// Create a client over a custom transport
    pub fn with_transport(network: Network, transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            network,
            chain_id: network.chain_id(),
            gateway: None,
            account: OnceLock::new(),
            default_block: BlockId::Latest,
            submission_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock(network: Network) -> Self {
        Self::with_transport(network, MockTransport::new())
    }

    /// Selected network
    pub fn network(&self) -> Network {
        self.network
    }

    /// Chain id baked into every transaction this client prepares
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Resolved gateway, when connected through [`FsnClient::connect`]
    pub fn gateway(&self) -> Option<&str> {
        self.gateway.as_deref()
    }

    // ==================== Account ====================

    /// Install the signing key; only one key per client
    pub fn set_key(&self, private_key: &str) -> Result<&Account, SdkError> {
        if self.account.get().is_some() {
            return Err(SdkError::KeyAlreadySet);
        }
        let account = Account::from_private_key_hex(private_key)?;
        self.install_account(account)
    }

    fn install_account(&self, account: Account) -> Result<&Account, SdkError> {
        self.account
            .set(account)
            .map_err(|_| SdkError::KeyAlreadySet)?;
        let account = self.account.get().ok_or(SdkError::NoSigningKey)?;
        tracing::info!(address = %account.checksum_address(), "signing account installed");
        Ok(account)
    }

    /// Signing account, if one is installed
    pub fn account(&self) -> Option<&Account> {
        self.account.get()
    }

    fn signer(&self) -> Option<&dyn Signer> {
        self.account.get().map(|a| a as &dyn Signer)
    }

    // ==================== Defaults ====================

    /// Block used when a query does not name one
    pub fn default_block(&self) -> BlockId {
        self.default_block
    }

    /// Change the block used when a query does not name one
    pub fn set_default_block(&mut self, block: BlockId) {
        self.default_block = block;
    }

    pub(crate) fn block_or_default(&self, block: Option<BlockId>) -> BlockId {
        block.unwrap_or(self.default_block)
    }

    // ==================== Raw RPC ====================

    /// Call `method` and decode its result
    pub async fn request<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, SdkError> {
        let value = self.transport.request_json(method, params).await?;
        deserialize_response(value)
    }

    /// Call `method` and return its raw JSON result
    pub async fn request_value(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        self.transport.request_json(method, params).await
    }

    // ==================== Transactions ====================

    /// Validate a request as an operation of `kind`
    pub fn build(&self, kind: OperationKind, request: &Value) -> Result<TransactionIntent, SdkError> {
        Ok(tx_builder::build(kind, request, self.chain_id)?)
    }

    /// Build, sign with the client's account and submit
    pub async fn submit(
        &self,
        kind: OperationKind,
        request: &Value,
        mode: SubmitMode,
    ) -> Result<Submission, SdkError> {
        self.submit_with_signer(kind, request, self.signer(), mode).await
    }

    /// As [`FsnClient::submit`], signing with `signer` instead of the account
    pub async fn submit_with_signer(
        &self,
        kind: OperationKind,
        request: &Value,
        signer: Option<&dyn Signer>,
        mode: SubmitMode,
    ) -> Result<Submission, SdkError> {
        let intent = self.build(kind, request)?;
        let pipeline = Pipeline::new(self.transport.as_ref(), self.chain_id);
        match mode {
            SubmitMode::PrepareOnly => pipeline.run(intent, signer, mode).await,
            SubmitMode::Submit => {
                Pipeline::authorize(&intent, signer, mode)?;
                let _guard = self.submission_lock.lock().await;
                pipeline.run(intent, signer, mode).await
            }
        }
    }

    /// Build and fill a transaction without signing or sending it
    pub async fn prepare(
        &self,
        kind: OperationKind,
        request: &Value,
    ) -> Result<PreparedTransaction, SdkError> {
        self.submit(kind, request, SubmitMode::PrepareOnly)
            .await?
            .into_prepared()
            .ok_or_else(|| SdkError::Serialization("prepare returned a hash".to_string()))
    }

    /// Sign-and-send a transaction from [`FsnClient::prepare`]
    ///
    /// An unsigned transaction must name a `from` equal to this client's
    /// account. A transaction whose `r`/`s` were filled out of band is
    /// broadcast as is and needs no account.
    pub async fn send_prepared(&self, tx: &PreparedTransaction) -> Result<H256, SdkError> {
        let _guard = self.submission_lock.lock().await;
        Pipeline::new(self.transport.as_ref(), self.chain_id)
            .sign_and_send(tx, self.signer())
            .await
    }

    /// Let the node sign with one of its unlocked accounts and broadcast
    pub async fn send_unlocked(
        &self,
        kind: OperationKind,
        request: &Value,
    ) -> Result<H256, SdkError> {
        let mut intent = self.build(kind, request)?;
        Pipeline::authorize(&intent, self.signer(), SubmitMode::Submit)?;
        intent.resolve_gas_price()?;

        let method = kind.send_method();
        let _guard = self.submission_lock.lock().await;
        tracing::debug!(%kind, method, "node-signed send");
        let result = self
            .transport
            .request_json(method, vec![intent.to_params()])
            .await?;
        parse_tx_hash(method, result)
    }

    /// Generic send through the pipeline, optionally stopping before signing
    pub async fn send_raw_transaction(
        &self,
        request: &Value,
        mode: SubmitMode,
    ) -> Result<Submission, SdkError> {
        self.submit(OperationKind::Send, request, mode).await
    }

    /// Generic send
    ///
    /// With an account installed the transaction is signed here and sent
    /// raw; otherwise it goes to the node's `eth_sendTransaction`.
    pub async fn send_transaction(&self, request: &Value) -> Result<H256, SdkError> {
        if self.account().is_some() {
            let submission = self
                .submit(OperationKind::Send, request, SubmitMode::Submit)
                .await?;
            return submission
                .tx_hash()
                .ok_or_else(|| SdkError::Serialization("send returned no hash".to_string()));
        }

        let mut intent = self.build(OperationKind::Send, request)?;
        intent.resolve_gas_price()?;
        let method = OperationKind::Send.send_method();
        let _guard = self.submission_lock.lock().await;
        let result = self
            .transport
            .request_json(method, vec![intent.to_params()])
            .await?;
        parse_tx_hash(method, result)
    }

    // ==================== Chain ====================

    /// Whether the gateway answers
    pub async fn is_connected(&self) -> bool {
        self.block_number().await.is_ok()
    }

    /// Latest block number
    pub async fn block_number(&self) -> Result<u64, SdkError> {
        let value = self.request_value("eth_blockNumber", vec![]).await?;
        u64_from_value("eth_blockNumber", &value).map_err(|e| {
            SdkError::rpc_transport("eth_blockNumber", format!("bad block number: {}", e))
        })
    }

    // ==================== Auto-buy tickets ====================

    /// Whether the node buys tickets automatically
    pub async fn is_auto_buy_ticket(&self) -> Result<bool, SdkError> {
        self.request("fsntx_isAutoBuyTicket", vec![Value::String("latest".into())])
            .await
    }

    /// Ask the node to buy tickets automatically
    pub async fn start_auto_buy_ticket(&self) -> Result<(), SdkError> {
        self.request_value("fsntx_startAutoBuyTicket", vec![Value::Null])
            .await
            .map(drop)
    }

    /// Stop automatic ticket buying
    pub async fn stop_auto_buy_ticket(&self) -> Result<(), SdkError> {
        self.request_value("fsntx_stopAutoBuyTicket", vec![Value::Null])
            .await
            .map(drop)
    }

    // ==================== Constants ====================

    /// Time-lock end meaning "forever"
    pub fn time_forever(&self) -> u64 {
        TIME_FOREVER
    }

    /// Id of a well-known asset (`FSN`, `FSNToken`)
    pub fn asset_id_by_name(&self, name: &str) -> Option<H256> {
        constants::asset_id_by_name(name)
    }
}

impl std::fmt::Debug for FsnClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsnClient")
            .field("network", &self.network)
            .field("chain_id", &self.chain_id)
            .field("gateway", &self.gateway)
            .field("account", &self.account.get())
            .finish_non_exhaustive()
    }
}
