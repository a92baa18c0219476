//! Read-only queries
//!
//! Arguments are validated before anything is sent. An omitted block
//! identifier falls back to the client's default block.

use std::collections::BTreeMap;

use fsn_primitives::{Address, H256, U256};
use serde_json::{json, Value};

use crate::client::FsnClient;
use crate::types::{
    u256_from_value, u64_from_value, AssetInfo, BlockId, IntoAddress, IntoAssetId, TicketMap,
    TimeLock,
};
use crate::transport::deserialize_response;
use crate::SdkError;

fn bad_result(method: &str, e: impl std::fmt::Display) -> SdkError {
    SdkError::rpc_transport(method, format!("unexpected result: {}", e))
}

impl FsnClient {
    /// Balance of `asset_id` held by `account`, in the asset's minor unit
    pub async fn get_balance(
        &self,
        asset_id: impl IntoAssetId,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<U256, SdkError> {
        const METHOD: &str = "fsn_getBalance";
        let asset_id = asset_id.into_asset_id("asset_id")?;
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(asset_id), json!(account), json!(block)])
            .await?;
        u256_from_value(METHOD, &value).map_err(|e| bad_result(METHOD, e))
    }

    /// Every ticket at `block`
    ///
    /// Fails with [`SdkError::NotFound`] when the node has nothing for the
    /// block.
    pub async fn all_tickets(&self, block: Option<BlockId>) -> Result<TicketMap, SdkError> {
        const METHOD: &str = "fsn_allTickets";
        let block = self.block_or_default(block);

        let value = self.request_value(METHOD, vec![json!(block)]).await?;
        if value.is_null() {
            return Err(SdkError::NotFound(format!(
                "no tickets for block {}",
                json!(block)
            )));
        }
        deserialize_response(value)
    }

    /// Tickets owned by `account`; empty when it has none
    pub async fn tickets_by_address(
        &self,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<TicketMap, SdkError> {
        const METHOD: &str = "fsn_allTicketsByAddress";
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(account), json!(block)])
            .await?;
        if value.is_null() {
            return Ok(TicketMap::new());
        }
        deserialize_response(value)
    }

    /// Number of tickets at `block`
    pub async fn total_number_of_tickets(&self, block: Option<BlockId>) -> Result<u64, SdkError> {
        const METHOD: &str = "fsn_totalNumberOfTickets";
        let block = self.block_or_default(block);

        let value = self.request_value(METHOD, vec![json!(block)]).await?;
        count(METHOD, &value)
    }

    /// Number of tickets owned by `account`
    pub async fn total_number_of_tickets_by_address(
        &self,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<u64, SdkError> {
        const METHOD: &str = "fsn_totalNumberOfTicketsByAddress";
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(account), json!(block)])
            .await?;
        count(METHOD, &value)
    }

    /// Asset metadata
    pub async fn get_asset(
        &self,
        asset_id: impl IntoAssetId,
        block: Option<BlockId>,
    ) -> Result<AssetInfo, SdkError> {
        const METHOD: &str = "fsn_getAsset";
        let asset_id = asset_id.into_asset_id("asset_id")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(asset_id), json!(block)])
            .await?;
        if value.is_null() {
            return Err(SdkError::NotFound(format!("asset {}", asset_id)));
        }
        deserialize_response(value)
    }

    /// Notation registered for `account`, 0 when there is none
    pub async fn get_notation(
        &self,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<u64, SdkError> {
        const METHOD: &str = "fsn_getNotation";
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(account), json!(block)])
            .await?;
        count(METHOD, &value)
    }

    /// Account a notation resolves to
    pub async fn get_address_by_notation(
        &self,
        notation: u64,
        block: Option<BlockId>,
    ) -> Result<Address, SdkError> {
        const METHOD: &str = "fsn_getAddressByNotation";
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(notation), json!(block)])
            .await?;
        if value.is_null() {
            return Err(SdkError::NotFound(format!("notation {}", notation)));
        }
        deserialize_response(value)
    }

    /// Time-locked balance of one asset
    pub async fn get_time_lock_balance(
        &self,
        asset_id: impl IntoAssetId,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<TimeLock, SdkError> {
        const METHOD: &str = "fsn_getTimeLockBalance";
        let asset_id = asset_id.into_asset_id("asset_id")?;
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(asset_id), json!(account), json!(block)])
            .await?;
        if value.is_null() {
            return Ok(TimeLock::default());
        }
        deserialize_response(value)
    }

    /// Time-locked balances of every asset `account` holds
    pub async fn get_all_time_lock_balances(
        &self,
        account: impl IntoAddress,
        block: Option<BlockId>,
    ) -> Result<BTreeMap<H256, TimeLock>, SdkError> {
        const METHOD: &str = "fsn_getAllTimeLockBalances";
        let account = account.into_address("account")?;
        let block = self.block_or_default(block);

        let value = self
            .request_value(METHOD, vec![json!(account), json!(block)])
            .await?;
        if value.is_null() {
            return Ok(BTreeMap::new());
        }
        deserialize_response(value)
    }
}

fn count(method: &str, value: &Value) -> Result<u64, SdkError> {
    u64_from_value(method, value).map_err(|e| bad_result(method, e))
}
