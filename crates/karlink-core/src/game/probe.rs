use std::time::{Duration, Instant};

use tracing::debug;

use super::Clock;
use crate::memory::layout::{header, health, mode, timing};
use crate::memory::{GameMemory, MemoryBackend};

/// Derives game-level facts from raw memory and tracks City Trial entry.
pub struct GameProbe<C> {
    clock: C,
    debounce: Duration,
    in_mode: bool,
    entered_at: Instant,
}

impl<C: Clock> GameProbe<C> {
    pub fn new(clock: C) -> Self {
        Self::with_debounce(clock, timing::TRANSITION_DEBOUNCE)
    }

    pub fn with_debounce(clock: C, debounce: Duration) -> Self {
        let entered_at = clock.now();
        Self {
            clock,
            debounce,
            in_mode: false,
            entered_at,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether the loaded disc is Kirby Air Ride (NTSC-U)
    pub fn is_game_process_present<B: MemoryBackend>(&self, memory: &mut GameMemory<B>) -> bool {
        memory.read_bytes(header::GAME_ID, header::GAME_ID_LEN) == header::EXPECTED_GAME_ID
    }

    /// Whether the player is in a City Trial match.
    ///
    /// The menu selection stays at City Trial during scene loads, so the
    /// stage id has to agree as well.
    pub fn is_in_target_mode<B: MemoryBackend>(&self, memory: &mut GameMemory<B>) -> bool {
        let menu_selected =
            memory.read_short(mode::MENU_SELECTION) == mode::CITY_TRIAL_MENU_SELECTION;
        let stage_loaded = memory
            .read_short(mode::CURRENT_STAGE + mode::CURRENT_STAGE_SUB_OFFSET)
            == mode::CITY_TRIAL_STAGE_ID;
        menu_selected && stage_loaded
    }

    /// Health above zero.
    ///
    /// Health reads 0.0 for as long as the player is off a machine, so this
    /// also reports "dead" while walking.
    pub fn is_player_alive<B: MemoryBackend>(&self, memory: &mut GameMemory<B>) -> bool {
        memory.read_float(health::CURRENT_HP) > 0.0
    }

    /// Single-step edge detector. Returns true only on the tick the player enters City Trial.
    pub fn detect_transition<B: MemoryBackend>(&mut self, memory: &mut GameMemory<B>) -> bool {
        let in_mode = self.is_in_target_mode(memory);

        if in_mode && !self.in_mode {
            debug!("transition into city trial detected");
            self.in_mode = true;
            self.entered_at = self.clock.now();
            return true;
        }

        if !in_mode && self.in_mode {
            debug!("transition out of city trial detected");
            self.in_mode = false;
        }

        false
    }

    /// Whether the grace period after the last entry has passed
    pub fn has_debounce_elapsed(&self) -> bool {
        self.clock.now() >= self.entered_at + self.debounce
    }

    pub fn in_mode(&self) -> bool {
        self.in_mode
    }

    /// Forget the transition state (e.g., after losing the emulator)
    pub fn reset(&mut self) {
        self.in_mode = false;
    }
}
