use serde::{Deserialize, Serialize};

use crate::world::SlotData;

/// One item as the session delivers it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkItem {
    pub item: i64,
    #[serde(default)]
    pub location: i64,
    #[serde(default)]
    pub player: i32,
    #[serde(default)]
    pub flags: u32,
}

impl NetworkItem {
    pub fn new(item: i64) -> Self {
        Self {
            item,
            location: 0,
            player: 0,
            flags: 0,
        }
    }
}

/// A batch of received items.
///
/// `index` is the position of the first item in the session's received list.
/// Index 0 carries the whole list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceivedItems {
    pub index: usize,
    pub items: Vec<NetworkItem>,
}

/// Something the session told us
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Slot handshake finished
    SlotConnected {
        player_name: String,
        slot_data: SlotData,
    },
    ReceivedItems(ReceivedItems),
    /// Another player died with death link on
    Death { source: String },
}
