//! Connection configuration

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::constants::{MAINNET_CHAIN_ID, TESTNET_CHAIN_ID};
use crate::SdkError;

/// Public test network WebSocket gateway
pub const TESTNET_WS_GATEWAY: &str = "wss://testnetpublicgateway1.fusionnetwork.io:10001";
/// Public test network HTTP gateway
pub const TESTNET_HTTP_GATEWAY: &str = "https://testnetpublicgateway1.fusionnetwork.io:10000/";
/// Public main network WebSocket gateway
pub const MAINNET_WS_GATEWAY: &str = "wss://mainnetpublicgateway1.fusionnetwork.io:10001";
/// Public main network HTTP gateway
pub const MAINNET_HTTP_GATEWAY: &str = "https://mainnetpublicgateway1.fusionnetwork.io:10000/";

/// Fusion network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Network {
    /// Test network
    #[serde(rename = "test", alias = "testnet")]
    Test,
    /// Main network
    #[serde(rename = "main", alias = "mainnet")]
    Main,
}

impl Network {
    /// Chain id baked into every transaction signed for this network
    pub const fn chain_id(self) -> u64 {
        match self {
            Network::Test => TESTNET_CHAIN_ID,
            Network::Main => MAINNET_CHAIN_ID,
        }
    }

    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            Network::Test => "test",
            Network::Main => "main",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "test" | "testnet" => Ok(Network::Test),
            "main" | "mainnet" => Ok(Network::Main),
            other => Err(SdkError::Config(format!(
                "network must be one of test or main, found {}",
                other
            ))),
        }
    }
}

/// Transport used to reach the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderKind {
    /// JSON-RPC over WebSocket
    #[serde(rename = "websocket", alias = "WebSocket")]
    WebSocket,
    /// JSON-RPC over HTTP(S)
    #[serde(rename = "http", alias = "HTTP")]
    Http,
    /// JSON-RPC over a local unix socket
    #[serde(rename = "ipc", alias = "IPC")]
    Ipc,
}

impl ProviderKind {
    /// Configuration name
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::WebSocket => "websocket",
            ProviderKind::Http => "http",
            ProviderKind::Ipc => "ipc",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "websocket" | "WebSocket" => Ok(ProviderKind::WebSocket),
            "http" | "HTTP" => Ok(ProviderKind::Http),
            "ipc" | "IPC" => Ok(ProviderKind::Ipc),
            other => Err(SdkError::Config(format!(
                "provider must be one of websocket, http or ipc, found {}",
                other
            ))),
        }
    }
}

/// Gateway endpoint, either explicit or looked up from the public table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Gateway {
    /// Public gateway for the (network, provider) pair
    #[default]
    Default,
    /// Explicit URI, or socket path for IPC
    Uri(String),
}

impl Serialize for Gateway {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Gateway::Default => serializer.serialize_str("default"),
            Gateway::Uri(uri) => serializer.serialize_str(uri),
        }
    }
}

impl<'de> Deserialize<'de> for Gateway {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Err(de::Error::custom("gateway must not be empty"));
        }
        Ok(if s == "default" {
            Gateway::Default
        } else {
            Gateway::Uri(s)
        })
    }
}

/// Connection descriptor
///
/// Recognised keys are `network`, `provider`, `gateway` and `privateKey`;
/// anything else is rejected when parsing.
#[derive(Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainLink {
    /// Network to talk to
    pub network: Network,
    /// Transport kind
    pub provider: ProviderKind,
    /// Gateway endpoint
    #[serde(default)]
    pub gateway: Gateway,
    /// Hex-encoded signing key (optional `0x` prefix)
    #[serde(
        rename = "privateKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub private_key: Option<String>,
}

impl ChainLink {
    /// Descriptor using the default public gateway and no key
    pub fn new(network: Network, provider: ProviderKind) -> Self {
        Self {
            network,
            provider,
            gateway: Gateway::Default,
            private_key: None,
        }
    }

    /// Use an explicit gateway (`"default"` selects the public table)
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        let gateway = gateway.into();
        self.gateway = if gateway == "default" {
            Gateway::Default
        } else {
            Gateway::Uri(gateway)
        };
        self
    }

    /// Install a signing key at connection time
    pub fn with_private_key(mut self, key: impl Into<String>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, SdkError> {
        let link: ChainLink = toml::from_str(s).map_err(|e| SdkError::Config(e.to_string()))?;
        link.validate()?;
        Ok(link)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SdkError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SdkError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Chain id for the selected network
    pub fn chain_id(&self) -> u64 {
        self.network.chain_id()
    }

    /// Check the descriptor in a single pass
    pub fn validate(&self) -> Result<(), SdkError> {
        match (&self.provider, &self.gateway) {
            (ProviderKind::Ipc, Gateway::Default) => {
                return Err(SdkError::Config(
                    "cannot use a default gateway with the ipc provider".to_string(),
                ));
            }
            (ProviderKind::WebSocket, Gateway::Uri(uri))
                if !(uri.starts_with("ws://") || uri.starts_with("wss://")) =>
            {
                return Err(SdkError::Config(format!(
                    "websocket gateway must use ws:// or wss://, found {}",
                    uri
                )));
            }
            (ProviderKind::Http, Gateway::Uri(uri))
                if !(uri.starts_with("http://") || uri.starts_with("https://")) =>
            {
                return Err(SdkError::Config(format!(
                    "http gateway must use http:// or https://, found {}",
                    uri
                )));
            }
            _ => {}
        }

        if let Some(key) = &self.private_key {
            let digits = key.strip_prefix("0x").unwrap_or(key);
            if digits.len() != 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(SdkError::Config(
                    "privateKey must be 32 bytes of hex".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Gateway to connect to, with `default` looked up from the public table
    pub fn resolve_gateway(&self) -> Result<String, SdkError> {
        match &self.gateway {
            Gateway::Uri(uri) => Ok(uri.clone()),
            Gateway::Default => default_gateway(self.network, self.provider)
                .map(str::to_string)
                .ok_or_else(|| {
                    SdkError::Config(format!(
                        "no default {} gateway exists for the {} network",
                        self.provider, self.network
                    ))
                }),
        }
    }
}

/// Public gateway table; there is no default IPC endpoint
pub fn default_gateway(network: Network, provider: ProviderKind) -> Option<&'static str> {
    match (network, provider) {
        (Network::Test, ProviderKind::WebSocket) => Some(TESTNET_WS_GATEWAY),
        (Network::Test, ProviderKind::Http) => Some(TESTNET_HTTP_GATEWAY),
        (Network::Main, ProviderKind::WebSocket) => Some(MAINNET_WS_GATEWAY),
        (Network::Main, ProviderKind::Http) => Some(MAINNET_HTTP_GATEWAY),
        (_, ProviderKind::Ipc) => None,
    }
}

impl fmt::Debug for ChainLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainLink")
            .field("network", &self.network)
            .field("provider", &self.provider)
            .field("gateway", &self.gateway)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl Drop for ChainLink {
    fn drop(&mut self) {
        if let Some(key) = self.private_key.as_mut() {
            key.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_ids() {
        assert_eq!(Network::Test.chain_id(), 46688);
        assert_eq!(Network::Main.chain_id(), 32659);
    }

    #[test]
    fn test_resolve_default_mainnet_websocket() {
        let link = ChainLink::new(Network::Main, ProviderKind::WebSocket);
        assert_eq!(link.resolve_gateway().unwrap(), MAINNET_WS_GATEWAY);
    }

    #[test]
    fn test_default_ipc_is_config_error() {
        let link = ChainLink::new(Network::Test, ProviderKind::Ipc);
        assert!(matches!(link.validate(), Err(SdkError::Config(_))));
        assert!(matches!(link.resolve_gateway(), Err(SdkError::Config(_))));
    }

    #[test]
    fn test_explicit_ipc_path() {
        let link =
            ChainLink::new(Network::Test, ProviderKind::Ipc).with_gateway("/tmp/efsn.ipc");
        link.validate().unwrap();
        assert_eq!(link.resolve_gateway().unwrap(), "/tmp/efsn.ipc");
    }

    #[test]
    fn test_scheme_must_match_provider() {
        let link = ChainLink::new(Network::Main, ProviderKind::WebSocket)
            .with_gateway("https://mainnetpublicgateway1.fusionnetwork.io:10000/");
        assert!(matches!(link.validate(), Err(SdkError::Config(_))));
    }

    #[test]
    fn test_from_toml() {
        let link = ChainLink::from_toml_str(
            r#"
                network = "testnet"
                provider = "HTTP"
                gateway = "default"
            "#,
        )
        .unwrap();
        assert_eq!(link.network, Network::Test);
        assert_eq!(link.provider, ProviderKind::Http);
        assert_eq!(link.resolve_gateway().unwrap(), TESTNET_HTTP_GATEWAY);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ChainLink::from_toml_str(
            r#"
                network = "main"
                provider = "websocket"
                gateway = "default"
                timeout = 30
            "#,
        );
        assert!(matches!(result, Err(SdkError::Config(_))));
    }

    #[test]
    fn test_bad_network_rejected() {
        let result = ChainLink::from_toml_str(
            r#"
                network = "devnet"
                provider = "websocket"
            "#,
        );
        assert!(matches!(result, Err(SdkError::Config(_))));
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_bad_private_key_rejected() {
        let link = ChainLink::new(Network::Test, ProviderKind::Http).with_private_key("0x1234");
        assert!(matches!(link.validate(), Err(SdkError::Config(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let link = ChainLink::new(Network::Test, ProviderKind::Http).with_private_key(
            "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
        );
        let debug = format!("{:?}", link);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("ac0974"));
    }
}
