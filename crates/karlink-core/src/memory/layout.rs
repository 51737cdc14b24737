//! Memory layout constants for Kirby Air Ride (NTSC-U, `GKYE01`)
//!
//! This module centralizes all console addresses used for reading and writing
//! game state. Every value is tied to this one build of the game; any other
//! build invalidates the whole table.

/// GameCube main RAM (MEM1) layout as exposed by Dolphin
pub mod ram {
    /// First console address of MEM1
    pub const MEM1_START: u32 = 0x8000_0000;
    /// Size of MEM1 (24 MiB)
    pub const MEM1_SIZE: u32 = 0x0180_0000;
    /// Size of the host mapping Dolphin creates for emulated RAM (32 MiB)
    pub const HOST_MAPPING_SIZE: usize = 0x0200_0000;

    /// Check that `len` bytes starting at `address` fall inside MEM1
    pub fn contains(address: u32, len: usize) -> bool {
        let Some(offset) = address.checked_sub(MEM1_START) else {
            return false;
        };
        (offset as u64) + (len as u64) <= MEM1_SIZE as u64
    }
}

/// Disc header fields
pub mod header {
    /// Game identifier is the first six bytes of MEM1
    pub const GAME_ID: u32 = 0x8000_0000;
    pub const GAME_ID_LEN: usize = 6;
    pub const EXPECTED_GAME_ID: &[u8; 6] = b"GKYE01";
}

/// Player 1 patch counters (big-endian floats)
///
/// Values start at -2.0 except for HP, which starts at 0.0.
pub mod patch {
    pub const WEIGHT: u32 = 0x8157_862C;
    pub const BOOST: u32 = 0x8157_8630;
    pub const TOP_SPEED: u32 = 0x8157_8634;
    pub const TURN: u32 = 0x8157_8638;
    pub const CHARGE: u32 = 0x8157_863C;
    pub const GLIDE: u32 = 0x8157_8640;
    pub const OFFENSE: u32 = 0x8157_8644;
    pub const DEFENSE: u32 = 0x8157_8648;
    pub const HP: u32 = 0x8157_864C;
}

/// Player 1 health
pub mod health {
    use crate::memory::PointerAddress;

    /// Current machine health, one pointer hop away.
    ///
    /// Only resolves to the real value for some machines.
    pub const MACHINE_HP: PointerAddress = PointerAddress::new(0x8055_AA30, 0xA78);

    /// Current player health, mirrored from the machine every frame.
    /// Reads 0.0 for the whole time the player is off a machine.
    pub const CURRENT_HP: u32 = 0x8055_AA24;

    /// Maximum health, rewritten every frame
    pub const MAX_HP: u32 = 0x8055_AA28;
}

/// Mode and stage selectors (big-endian shorts)
pub mod mode {
    /// Selected top menu: 00 Air Ride, 01 Top Ride, 02 City Trial, 03 Options, 04 LAN
    pub const MENU_SELECTION: u32 = 0x8053_5A0C;
    /// Current stage id; the short two bytes in is 9 only while in City Trial
    pub const CURRENT_STAGE: u32 = 0x8133_3A64;
    pub const CURRENT_STAGE_SUB_OFFSET: u32 = 2;

    pub const CITY_TRIAL_MENU_SELECTION: u16 = 0x0200;
    pub const CITY_TRIAL_STAGE_ID: u16 = 0x0009;
}

/// Checklist box encodings
pub mod checklist {
    /// Locked and hidden
    pub const LOCKED: u8 = 0x00;
    /// Flagged for unlocking
    pub const FLAGGED: u8 = 0x01;
    /// Locked and visible
    pub const VISIBLE_LOCKED: u8 = 0x10;
}

/// Timing constants for the client loop
pub mod timing {
    use std::time::Duration;

    /// Upper bound on a single wait between ticks
    pub const POLL_TIMEOUT: Duration = Duration::from_secs(1);

    /// Delay between connection attempts while disconnected
    pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

    /// Grace period after entering City Trial before items and deaths are handled
    pub const TRANSITION_DEBOUNCE: Duration = Duration::from_secs(6);

    /// Minimum spacing between outgoing death notices
    pub const DEATH_COOLDOWN: Duration = Duration::from_secs(120);
}
