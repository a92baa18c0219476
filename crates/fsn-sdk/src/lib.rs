//! # fsn-sdk
//!
//! Rust SDK for the Fusion (FSN) blockchain.
//!
//! ## Features
//!
//! - **FsnClient**: typed queries over the `fsn_*` RPC namespace
//! - **Transaction pipeline**: validate, build remotely, sign and submit
//!   the FSN operation kinds (assets, time-locks, swaps, tickets, notations)
//! - **ChainLink**: network/provider/gateway configuration, loadable from TOML
//! - **Transports**: HTTP, WebSocket and IPC, plus a mock for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fsn_sdk::{FsnClient, Network, OperationKind, SubmitMode};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a mock client for testing
//!     let client = FsnClient::new_mock(Network::Test);
//!
//!     // FSN balance of an account
//!     let fsn = client.asset_id_by_name("FSN").unwrap_or_default();
//!     let balance = client
//!         .get_balance(fsn, "0x432baf0ab7261819fcf587de7e6d68f902e43195", None)
//!         .await?;
//!     println!("Balance: {}", fsn_sdk::units::format_fsn(balance));
//!
//!     // Have the node build a notation request without signing it
//!     let prepared = client
//!         .submit(
//!             OperationKind::GenNotation,
//!             &json!({
//!                 "from": "0x432baf0ab7261819fcf587de7e6d68f902e43195",
//!                 "gasPrice": "default",
//!             }),
//!             SubmitMode::PrepareOnly,
//!         )
//!         .await?;
//!     println!("Prepared: {:?}", prepared);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Connecting
//!
//! ```rust,no_run
//! use fsn_sdk::{ChainLink, FsnClient, Network, ProviderKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let link = ChainLink::new(Network::Main, ProviderKind::WebSocket)
//!         .with_private_key(std::env::var("FSN_PRIVATE_KEY")?);
//!     let client = FsnClient::connect(link).await?;
//!
//!     println!("Block: {}", client.block_number().await?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod account;
mod client;
pub mod config;
pub mod constants;
mod error;
pub mod pipeline;
mod query;
pub mod transaction;
pub mod transport;
pub mod tx_builder;
pub mod types;
pub mod units;

// Re-export main types
pub use account::{Account, Signer};
pub use client::FsnClient;
pub use config::{ChainLink, Gateway, Network, ProviderKind};
pub use error::{RpcCause, SdkError, ValidationError, ValidationErrorKind};
pub use pipeline::{Pipeline, SubmitMode, Submission};
pub use transaction::{PreparedTransaction, SignatureState, SignedPayload};
pub use transport::MockTransport;

/// Re-export Transport trait for custom implementations
pub use transport::Transport;
pub use tx_builder::{GasPrice, IntentPayload, OperationKind, SwapTerms, TransactionIntent};
pub use types::{
    AssetInfo, BlockId, IntoAddress, IntoAssetId, Ticket, TicketMap, TimeLock, TimeLockItem,
};
pub use constants::TicketLogTopic;

#[cfg(feature = "http")]
pub use transport::HttpTransport;

#[cfg(feature = "ws")]
pub use transport::WsTransport;

#[cfg(unix)]
pub use transport::IpcTransport;

// Re-export primitives for convenience
pub use fsn_primitives::{Address, BlockHeight, Gas, Nonce, H256, U256};
