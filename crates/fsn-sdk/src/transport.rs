//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::{ChainLink, ProviderKind};
use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    ///
    /// A `null` result is returned as [`Value::Null`], not as an error.
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// Open the transport described by `link`
pub async fn connect(link: &ChainLink) -> Result<Box<dyn Transport>, SdkError> {
    link.validate()?;
    let gateway = link.resolve_gateway()?;
    tracing::debug!(provider = %link.provider, %gateway, "opening transport");

    match link.provider {
        #[cfg(feature = "http")]
        ProviderKind::Http => Ok(Box::new(HttpTransport::new(&gateway))),
        #[cfg(feature = "ws")]
        ProviderKind::WebSocket => Ok(Box::new(WsTransport::connect(&gateway).await?)),
        #[cfg(unix)]
        ProviderKind::Ipc => Ok(Box::new(IpcTransport::connect(&gateway).await?)),
        #[allow(unreachable_patterns)]
        other => Err(SdkError::Config(format!(
            "the {} provider is not available in this build",
            other
        ))),
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Value(Value),
    Error { code: i64, message: String },
}

impl Reply {
    fn into_result(self, method: &str) -> Result<Value, SdkError> {
        match self {
            Reply::Value(value) => Ok(value),
            Reply::Error { code, message } => Err(SdkError::rpc_remote(method, code, message)),
        }
    }
}

/// One recorded call
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// RPC method
    pub method: String,
    /// Positional parameters
    pub params: Vec<Value>,
}

/// Mock transport for testing
///
/// Clones share state, so a test can keep a handle after moving one clone
/// into a client.
#[derive(Clone)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Reply>>>,
    default_responses: Arc<Mutex<HashMap<String, Reply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

/// Hash returned by the mock for every send
pub const MOCK_TX_HASH: &str =
    "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

/// Unsigned transaction returned by the mock's build methods
///
/// Reports chain id 1, which the client must replace with its own.
pub fn mock_built_transaction() -> Value {
    json!({
        "nonce": "0x7",
        "gasPrice": "0x1b48eb57e000",
        "gas": "0x15f90",
        "to": "0xffffffffffffffffffffffffffffffffffffffff",
        "value": "0x0",
        "input": "0xc4820001",
        "chainId": "0x1",
        "v": "0x0",
        "r": "0x0",
        "s": "0x0",
        "hash": "0x1111111111111111111111111111111111111111111111111111111111111111"
    })
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        let mut set = |method: &str, value: Value| {
            defaults.insert(method.to_string(), Reply::Value(value));
        };

        set("eth_blockNumber", json!("0x100"));
        set("eth_gasPrice", json!("0x4e3b29200"));
        set("eth_getTransactionCount", json!("0x0"));
        set("eth_estimateGas", json!("0x5208"));
        set("eth_sendTransaction", json!(MOCK_TX_HASH));
        set("eth_sendRawTransaction", json!(MOCK_TX_HASH));
        set("fsntx_sendRawTransaction", json!(MOCK_TX_HASH));

        for kind in crate::tx_builder::OperationKind::ALL {
            if let Some(build) = kind.build_method() {
                set(build, mock_built_transaction());
            }
            set(kind.send_method(), json!(MOCK_TX_HASH));
        }

        set("fsn_getBalance", json!("1000000000000000000"));
        set("fsn_allTickets", json!({}));
        set("fsn_allTicketsByAddress", json!({}));
        set("fsn_totalNumberOfTickets", json!(0));
        set("fsn_totalNumberOfTicketsByAddress", json!(0));
        set(
            "fsn_getAsset",
            json!({
                "ID": "0xffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
                "Owner": "0x0000000000000000000000000000000000000000",
                "Name": "FUSION",
                "Symbol": "FSN",
                "Decimals": 18,
                "Total": "81920000000000000000000000",
                "CanChange": false,
                "Description": ""
            }),
        );
        set("fsn_getNotation", json!(0));
        set(
            "fsn_getAddressByNotation",
            json!("0x0000000000000000000000000000000000000000"),
        );
        set("fsn_getTimeLockBalance", json!({"Items": []}));
        set("fsn_getAllTimeLockBalances", json!({}));
        set("fsntx_isAutoBuyTicket", json!(false));
        set("fsntx_startAutoBuyTicket", Value::Null);
        set("fsntx_stopAutoBuyTicket", Value::Null);

        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            default_responses: Arc::new(Mutex::new(defaults)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set a mock response for a specific method
    pub fn set_response(&self, method: &str, response: Value) {
        lock(&self.responses).insert(method.to_string(), Reply::Value(response));
    }

    /// Make a method fail with a JSON-RPC error object
    pub fn set_error(&self, method: &str, code: i64, message: &str) {
        lock(&self.responses).insert(
            method.to_string(),
            Reply::Error {
                code,
                message: message.to_string(),
            },
        );
    }

    /// Clear custom responses
    pub fn clear_responses(&self) {
        lock(&self.responses).clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Methods called so far, in order
    pub fn methods(&self) -> Vec<String> {
        lock(&self.calls).iter().map(|c| c.method.clone()).collect()
    }

    /// Number of calls to `method`
    pub fn call_count(&self, method: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.method == method).count()
    }

    /// Parameters of the most recent call to `method`
    pub fn last_params(&self, method: &str) -> Option<Vec<Value>> {
        lock(&self.calls)
            .iter()
            .rev()
            .find(|c| c.method == method)
            .map(|c| c.params.clone())
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        lock(&self.calls).push(RecordedCall {
            method: method.to_string(),
            params,
        });

        // Check custom responses first
        let custom_response = lock(&self.responses).get(method).cloned();
        if let Some(reply) = custom_response {
            return reply.into_result(method);
        }

        let default_response = lock(&self.default_responses).get(method).cloned();
        match default_response {
            Some(reply) => reply.into_result(method),
            None => Err(SdkError::rpc_remote(
                method,
                -32601,
                format!("the method {} does not exist/is not available", method),
            )),
        }
    }
}

#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

impl JsonRpcResponse {
    fn into_result(self, method: &str) -> Result<Value, SdkError> {
        if let Some(error) = self.error {
            return Err(SdkError::rpc_remote(method, error.code, error.message));
        }
        Ok(self.result.unwrap_or(Value::Null))
    }
}

fn request_body(id: u64, method: &str, params: Vec<Value>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        tracing::trace!(method, url = %self.url, "http request");
        let request = request_body(self.next_id(), method, params);

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::rpc_transport(method, e))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::rpc_transport(method, e))?;

        response.into_result(method)
    }
}

/// WebSocket transport
#[cfg(feature = "ws")]
pub struct WsTransport {
    client: jsonrpsee::ws_client::WsClient,
}

#[cfg(feature = "ws")]
impl WsTransport {
    /// Connect to a `ws://` or `wss://` gateway
    pub async fn connect(url: &str) -> Result<Self, SdkError> {
        let client = jsonrpsee::ws_client::WsClientBuilder::default()
            .build(url)
            .await
            .map_err(|e| SdkError::rpc_transport("connect", e))?;
        Ok(Self { client })
    }
}

#[cfg(feature = "ws")]
#[async_trait]
impl Transport for WsTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        use jsonrpsee::core::client::{ClientT, Error as ClientError};
        use jsonrpsee::core::params::ArrayParams;

        tracing::trace!(method, "ws request");
        let mut array = ArrayParams::new();
        for param in params {
            array.insert(param)?;
        }

        self.client
            .request::<Value, _>(method, array)
            .await
            .map_err(|e| match e {
                ClientError::Call(object) => {
                    SdkError::rpc_remote(method, i64::from(object.code()), object.message())
                }
                other => SdkError::rpc_transport(method, other),
            })
    }
}

/// Unix-socket IPC transport
///
/// One request is in flight at a time. Bytes read past the end of a response
/// stay buffered for the next request, and responses whose id does not match
/// the request are skipped.
#[cfg(unix)]
pub struct IpcTransport {
    connection: tokio::sync::Mutex<IpcConnection>,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(unix)]
struct IpcConnection {
    stream: tokio::net::UnixStream,
    buffer: Vec<u8>,
}

#[cfg(unix)]
impl IpcTransport {
    /// Connect to the node's IPC socket
    pub async fn connect(path: &str) -> Result<Self, SdkError> {
        let stream = tokio::net::UnixStream::connect(path)
            .await
            .map_err(|e| SdkError::rpc_transport("connect", e))?;
        Ok(Self {
            connection: tokio::sync::Mutex::new(IpcConnection {
                stream,
                buffer: Vec::new(),
            }),
            request_id: std::sync::atomic::AtomicU64::new(1),
        })
    }
}

/// Pop complete responses off `buffer` until the one answering `id`
///
/// Returns `None` while that response is still incomplete.
#[cfg(unix)]
fn take_response(
    buffer: &mut Vec<u8>,
    id: u64,
) -> Result<Option<JsonRpcResponse>, serde_json::Error> {
    loop {
        let mut values =
            serde_json::Deserializer::from_slice(buffer).into_iter::<JsonRpcResponse>();
        let response = match values.next() {
            Some(Ok(response)) => response,
            Some(Err(e)) if e.is_eof() => return Ok(None),
            Some(Err(e)) => {
                buffer.clear();
                return Err(e);
            }
            None => return Ok(None),
        };
        let consumed = values.byte_offset();
        buffer.drain(..consumed);

        if response.id.as_ref().and_then(Value::as_u64) == Some(id) {
            return Ok(Some(response));
        }
        tracing::debug!(expected = id, found = ?response.id, "skipping stale ipc response");
    }
}

#[cfg(unix)]
#[async_trait]
impl Transport for IpcTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        tracing::trace!(method, "ipc request");
        let id = self
            .request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let request = serde_json::to_vec(&request_body(id, method, params))?;

        let mut connection = self.connection.lock().await;
        let IpcConnection { stream, buffer } = &mut *connection;
        stream
            .write_all(&request)
            .await
            .map_err(|e| SdkError::rpc_transport(method, e))?;

        let mut chunk = [0u8; 4096];
        loop {
            if let Some(response) =
                take_response(buffer, id).map_err(|e| SdkError::rpc_transport(method, e))?
            {
                return response.into_result(method);
            }
            let read = stream
                .read(&mut chunk)
                .await
                .map_err(|e| SdkError::rpc_transport(method, e))?;
            if read == 0 {
                return Err(SdkError::rpc_transport(method, "connection closed"));
            }
            buffer.extend_from_slice(&chunk[..read]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_ipc_skips_stale_responses_and_keeps_tail() {
        let mut buffer = br#"{"jsonrpc":"2.0","id":1,"result":"0x1"}
{"jsonrpc":"2.0","id":2,"result":"0x2"}{"jsonrpc":"2.0","id":3,"res"#
            .to_vec();

        let response = take_response(&mut buffer, 2).unwrap().unwrap();
        assert_eq!(response.into_result("m").unwrap(), json!("0x2"));

        assert!(take_response(&mut buffer, 3).unwrap().is_none());
        buffer.extend_from_slice(br#"ult":"0x3"}"#);
        let response = take_response(&mut buffer, 3).unwrap().unwrap();
        assert_eq!(response.into_result("m").unwrap(), json!("0x3"));
        assert!(buffer.is_empty());
    }

    #[tokio::test]
    async fn test_mock_transport_default_responses() {
        let transport = MockTransport::new();

        let result = transport
            .request_json("eth_blockNumber", vec![])
            .await
            .unwrap();
        assert_eq!(result, json!("0x100"));

        let result = transport
            .request_json("fsntx_buildGenAssetTx", vec![json!({})])
            .await
            .unwrap();
        assert_eq!(result["r"], json!("0x0"));
    }

    #[tokio::test]
    async fn test_mock_transport_custom_response() {
        let transport = MockTransport::new();
        transport.set_response("fsn_totalNumberOfTickets", json!(12));

        let result = transport
            .request_json("fsn_totalNumberOfTickets", vec![json!("latest")])
            .await
            .unwrap();
        assert_eq!(result, json!(12));
    }

    #[tokio::test]
    async fn test_mock_transport_records_calls() {
        let transport = MockTransport::new();
        let handle = transport.clone();
        transport
            .request_json("fsn_getNotation", vec![json!("0x00"), json!("latest")])
            .await
            .unwrap();

        assert_eq!(handle.call_count("fsn_getNotation"), 1);
        assert_eq!(
            handle.last_params("fsn_getNotation").unwrap(),
            vec![json!("0x00"), json!("latest")]
        );
        handle.clear_calls();
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_mock_transport_errors() {
        let transport = MockTransport::new();
        transport.set_error("fsn_getAsset", -32000, "asset not found");

        let err = transport
            .request_json("fsn_getAsset", vec![])
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "RPC error in fsn_getAsset: -32000 - asset not found");

        let err = transport.request_json("unknown_method", vec![]).await;
        assert!(matches!(err, Err(SdkError::Rpc { .. })));
    }

    #[test]
    fn test_response_null_result() {
        let response: JsonRpcResponse =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        assert_eq!(response.into_result("fsn_allTickets").unwrap(), Value::Null);
    }
}
