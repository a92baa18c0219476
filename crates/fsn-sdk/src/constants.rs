//! Protocol-level constants of the Fusion network
//!
//! These values are part of the wire contract: they are fixed by the live
//! network and are never tuned per deployment.

use fsn_primitives::{Address, H256};

/// Chain id of the Fusion test network
pub const TESTNET_CHAIN_ID: u64 = 46688;

/// Chain id of the Fusion main network
pub const MAINNET_CHAIN_ID: u64 = 32659;

/// Time-lock end time meaning "never expires"
pub const TIME_FOREVER: u64 = u64::MAX;

/// [`TIME_FOREVER`] as a quantity string
pub const TIME_FOREVER_STR: &str = "0xffffffffffffffff";

/// Asset id of the native FSN coin
pub const FSN_ASSET_ID: H256 = H256::MAX;

/// Reserved asset id used for USAN ownership
pub const OWNER_USAN_ASSET_ID: H256 = {
    let mut bytes = [0xff; 32];
    bytes[31] = 0xfe;
    H256::from_bytes(bytes)
};

/// Address every FSN-native call is sent to
pub const FSN_CALL_ADDRESS: Address = Address::FSN_CALL;

/// Address emitting ticket lifecycle logs
pub const TICKET_LOG_ADDRESS: Address = Address::TICKET_LOG;

/// All-zero hash
pub const EMPTY_HASH: H256 = H256::ZERO;

/// Named assets resolvable with [`asset_id_by_name`]
const NAMED_ASSETS: [(&str, H256); 2] = [("FSNToken", FSN_ASSET_ID), ("FSN", FSN_ASSET_ID)];

/// Look up a well-known asset id by name
pub fn asset_id_by_name(name: &str) -> Option<H256> {
    NAMED_ASSETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, id)| *id)
}

/// Topics emitted by [`TICKET_LOG_ADDRESS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketLogTopic {
    /// A ticket was selected to mine a block
    Selected,
    /// A ticket was returned to its owner
    Return,
    /// A ticket expired
    Expired,
}

impl TicketLogTopic {
    /// Every topic, in index order
    pub const ALL: [TicketLogTopic; 3] = [
        TicketLogTopic::Selected,
        TicketLogTopic::Return,
        TicketLogTopic::Expired,
    ];

    /// Decode from the numeric topic index
    pub fn from_index(index: u64) -> Option<Self> {
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    /// Decode from a 32-byte log topic
    pub fn from_topic(topic: &H256) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.topic() == *topic)
    }

    /// Numeric topic index
    pub fn index(self) -> u64 {
        match self {
            TicketLogTopic::Selected => 0,
            TicketLogTopic::Return => 1,
            TicketLogTopic::Expired => 2,
        }
    }

    /// 32-byte log topic
    pub fn topic(self) -> H256 {
        H256::from_low_u64(self.index())
    }

    /// Semantic event name
    pub fn name(self) -> &'static str {
        match self {
            TicketLogTopic::Selected => "ticketSelected",
            TicketLogTopic::Return => "ticketReturn",
            TicketLogTopic::Expired => "ticketExpired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids() {
        assert_eq!(
            OWNER_USAN_ASSET_ID.to_hex(),
            "0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
        );
        assert_eq!(TIME_FOREVER, 0xffff_ffff_ffff_ffff);
        assert_eq!(format!("{:#x}", TIME_FOREVER), TIME_FOREVER_STR);
    }

    #[test]
    fn test_asset_id_by_name() {
        assert_eq!(asset_id_by_name("FSN"), Some(FSN_ASSET_ID));
        assert_eq!(asset_id_by_name("FSNToken"), Some(FSN_ASSET_ID));
        assert_eq!(asset_id_by_name("USAN"), None);
    }

    #[test]
    fn test_ticket_topics() {
        let topic = H256::from_hex(
            "0x0000000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(
            TicketLogTopic::from_topic(&topic),
            Some(TicketLogTopic::Expired)
        );
        assert_eq!(TicketLogTopic::from_index(1).map(|t| t.name()), Some("ticketReturn"));
        assert_eq!(TicketLogTopic::from_index(3), None);
        assert_eq!(TicketLogTopic::Selected.topic(), EMPTY_HASH);
    }
}
