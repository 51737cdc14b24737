//! The reconciliation loop.
//!
//! [`Link`] owns the emulator memory, the game probe and the session's
//! outbound half. Every tick it either tries to (re)connect to Dolphin or,
//! once connected and handed a slot, brings the game and the session into
//! agreement:
//!
//! 1. detect City Trial entry and re-queue permanent items
//! 2. apply pending items once the entry grace period has passed
//! 3. send a rate-limited death notice when the machine is destroyed
//! 4. report newly filled checklist boxes and the goal
//!
//! Inbound session facts and console commands arrive as [`Command`]s on a
//! channel and are drained at the top of each tick, so all state has a
//! single writer.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use super::{ChecklistTracker, ConnectionStatus, WakeSignal};
use crate::error::{Error, Result};
use crate::game::{Clock, GameProbe};
use crate::item::{ItemCatalog, apply_item, kill_player};
use crate::memory::layout::timing;
use crate::memory::{GameMemory, MemoryBackend};
use crate::session::{ReceivedItems, SessionEvent, SessionLink};
use crate::world::{Goal, LocationTable, SlotData, is_box_filled};

/// Timing and overrides for a [`Link`]
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Longest idle wait between ticks
    pub poll_timeout: Duration,
    /// Wait after a failed or refused connection attempt
    pub reconnect_delay: Duration,
    /// Grace period after entering City Trial before items and deaths are handled
    pub debounce: Duration,
    /// Minimum time between two outgoing death notices
    pub death_cooldown: Duration,
    /// Console/config override for the slot's death link setting
    pub death_link: Option<bool>,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            poll_timeout: timing::POLL_TIMEOUT,
            reconnect_delay: timing::RECONNECT_DELAY,
            debounce: timing::TRANSITION_DEBOUNCE,
            death_cooldown: timing::DEATH_COOLDOWN,
            death_link: None,
        }
    }
}

impl LinkConfig {
    pub fn builder() -> LinkConfigBuilder {
        LinkConfigBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkConfigBuilder {
    poll_timeout: Option<Duration>,
    reconnect_delay: Option<Duration>,
    debounce: Option<Duration>,
    death_cooldown: Option<Duration>,
    death_link: Option<bool>,
}

impl LinkConfigBuilder {
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = Some(timeout);
        self
    }

    pub fn reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = Some(delay);
        self
    }

    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = Some(debounce);
        self
    }

    pub fn death_cooldown(mut self, cooldown: Duration) -> Self {
        self.death_cooldown = Some(cooldown);
        self
    }

    pub fn death_link(mut self, enabled: bool) -> Self {
        self.death_link = Some(enabled);
        self
    }

    pub fn build(self) -> LinkConfig {
        let default = LinkConfig::default();
        LinkConfig {
            poll_timeout: self.poll_timeout.unwrap_or(default.poll_timeout),
            reconnect_delay: self.reconnect_delay.unwrap_or(default.reconnect_delay),
            debounce: self.debounce.unwrap_or(default.debounce),
            death_cooldown: self.death_cooldown.unwrap_or(default.death_cooldown),
            death_link: self.death_link,
        }
    }
}

/// Messages into the loop
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Session(SessionEvent),
    /// Flip the death link setting
    ToggleDeathLink,
    /// Log the current connection status
    ShowStatus,
    /// Queue an item by code without a session batch
    Grant(i64),
}

/// Cloneable sender side of a [`Link`]
#[derive(Clone)]
pub struct LinkHandle {
    sender: Sender<Command>,
    wake: Arc<WakeSignal>,
}

impl LinkHandle {
    /// Queue a command and wake the loop. Returns false once the loop is gone.
    pub fn send(&self, command: Command) -> bool {
        let sent = self.sender.send(command).is_ok();
        self.wake.notify();
        sent
    }

    pub fn session_event(&self, event: SessionEvent) -> bool {
        self.send(Command::Session(event))
    }

    pub fn wake(&self) -> &Arc<WakeSignal> {
        &self.wake
    }

    pub fn shutdown(&self) {
        self.wake.trigger_shutdown();
    }
}

/// A received item waiting to be written into the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingItem {
    /// Position in the session's received list
    pub index: usize,
    pub item: i64,
}

/// Slot facts from the handshake
#[derive(Debug, Clone)]
struct Slot {
    player_name: String,
    goal: Goal,
    checklist_amount: usize,
}

pub struct Link<B, S, C> {
    memory: GameMemory<B>,
    probe: GameProbe<C>,
    session: S,
    catalog: ItemCatalog,
    locations: LocationTable,
    config: LinkConfig,
    commands: Receiver<Command>,
    wake: Arc<WakeSignal>,
    status: ConnectionStatus,
    slot: Option<Slot>,
    death_link: bool,
    /// Received item codes by list position
    received: BTreeMap<usize, i64>,
    pending: Vec<PendingItem>,
    checklist: ChecklistTracker,
    finished: bool,
    last_death: Option<Instant>,
}

impl<B: MemoryBackend, S: SessionLink, C: Clock> Link<B, S, C> {
    pub fn new(
        backend: B,
        session: S,
        clock: C,
        catalog: ItemCatalog,
        locations: LocationTable,
        config: LinkConfig,
    ) -> (Self, LinkHandle) {
        let (sender, commands) = mpsc::channel();
        let wake = Arc::new(WakeSignal::new());
        let handle = LinkHandle {
            sender,
            wake: Arc::clone(&wake),
        };

        let link = Self {
            memory: GameMemory::new(backend),
            probe: GameProbe::with_debounce(clock, config.debounce),
            session,
            catalog,
            locations,
            death_link: config.death_link.unwrap_or(false),
            config,
            commands,
            wake,
            status: ConnectionStatus::NotStarted,
            slot: None,
            received: BTreeMap::new(),
            pending: Vec::new(),
            checklist: ChecklistTracker::new(),
            finished: false,
            last_death: None,
        };
        (link, handle)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn memory(&self) -> &GameMemory<B> {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut GameMemory<B> {
        &mut self.memory
    }

    pub fn pending(&self) -> &[PendingItem] {
        &self.pending
    }

    /// Received item codes in list order
    pub fn received(&self) -> Vec<i64> {
        self.received.values().copied().collect()
    }

    pub fn death_link(&self) -> bool {
        self.death_link
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of checklist boxes seen filled since the slot connected
    pub fn checklist_count(&self) -> usize {
        self.checklist.count()
    }

    /// Run until shutdown, then release the emulator
    pub fn run(&mut self) {
        info!("Link started");
        while !self.wake.wait(self.config.poll_timeout) {
            self.tick();
        }
        self.memory.detach();
        info!("Link stopped");
    }

    /// One pass of the loop
    pub fn tick(&mut self) {
        self.drain_commands();

        if !self.status.is_connected() {
            self.connect();
            return;
        }

        if !self.memory.is_attached() {
            warn!("Lost the emulator");
            self.disconnect(ConnectionStatus::Lost);
            return;
        }

        if self.slot.is_none() {
            return;
        }

        if let Err(e) = self.sync() {
            error!("Error while syncing with Dolphin: {}", e);
            self.disconnect(ConnectionStatus::Lost);
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::Session(SessionEvent::SlotConnected {
                    player_name,
                    slot_data,
                }) => self.on_slot_connected(player_name, slot_data),
                Command::Session(SessionEvent::ReceivedItems(items)) => {
                    self.on_received_items(items)
                }
                Command::Session(SessionEvent::Death { source }) => {
                    info!("Death received from {}", source);
                    self.on_death();
                }
                Command::ToggleDeathLink => {
                    self.toggle_death_link();
                }
                Command::ShowStatus => info!("Dolphin Status: {}", self.status),
                Command::Grant(code) => self.grant(code),
            }
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            match status {
                ConnectionStatus::Connected => info!("{}", status),
                _ => warn!("{}", status),
            }
            self.status = status;
        }
    }

    fn connect(&mut self) {
        if let Err(e) = self.memory.attach() {
            debug!("Attach failed: {}", e);
            self.set_status(ConnectionStatus::Lost);
            self.wake.wait(self.config.reconnect_delay);
            return;
        }

        if !self.probe.is_game_process_present(&mut self.memory) {
            self.memory.detach();
            self.set_status(ConnectionStatus::RefusedWrongGame);
            self.wake.wait(self.config.reconnect_delay);
            return;
        }

        self.set_status(ConnectionStatus::Connected);
    }

    fn disconnect(&mut self, status: ConnectionStatus) {
        self.memory.detach();
        self.probe.reset();
        self.set_status(status);
    }

    fn ensure_attached(&self) -> Result<()> {
        if self.memory.is_attached() {
            Ok(())
        } else {
            Err(Error::NotAttached)
        }
    }

    fn sync(&mut self) -> Result<()> {
        if self.probe.detect_transition(&mut self.memory) {
            self.queue_permanent_items();
        }
        self.ensure_attached()?;

        let ready = self.probe.in_mode() && self.probe.has_debounce_elapsed();

        if ready && !self.pending.is_empty() {
            self.flush_pending();
        }

        if ready && self.death_link {
            self.check_death()?;
        }

        self.check_locations()
    }

    fn queue_permanent_items(&mut self) {
        debug!("Queueing permanent items");
        for (&index, &code) in &self.received {
            let permanent = self.catalog.get(code).is_some_and(|item| item.permanent);
            if permanent && !self.pending.iter().any(|p| p.index == index) {
                self.pending.push(PendingItem { index, item: code });
            }
        }
    }

    /// Apply every pending item once. Failed writes are not retried.
    fn flush_pending(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            match self.catalog.get(pending.item) {
                Some(item) => {
                    if !apply_item(&mut self.memory, item) {
                        warn!("{} was not fully applied", item.name);
                    }
                }
                None => warn!("Unknown item code {}, ignoring", pending.item),
            }
        }
    }

    fn check_death(&mut self) -> Result<()> {
        let alive = self.probe.is_player_alive(&mut self.memory);
        self.ensure_attached()?;
        if alive {
            return Ok(());
        }

        let now = self.probe.clock().now();
        let cooled_down = self
            .last_death
            .is_none_or(|last| now >= last + self.config.death_cooldown);
        if !cooled_down {
            debug!("Did not send death (cooldown)");
            return Ok(());
        }

        let player = self
            .slot
            .as_ref()
            .map(|s| s.player_name.as_str())
            .unwrap_or("Player");
        self.session.send_death(&format!("{} exploded.", player))?;
        self.last_death = Some(now);
        Ok(())
    }

    fn check_locations(&mut self) -> Result<()> {
        for location in self.locations.iter() {
            let Some(address) = location.address else {
                continue;
            };
            if is_box_filled(self.memory.read_byte(address)) {
                self.checklist.observe(location.code);
            }
        }
        self.ensure_attached()?;

        if !self.finished && self.goal_met() {
            info!("Goal complete");
            self.finished = true;
            self.session.send_goal()?;
        }

        let new = self.checklist.unreported();
        if !new.is_empty() {
            debug!("New locations checked: {:?}", new);
            self.session.report_locations(&new)?;
            self.checklist.mark_reported(&new);
        }
        Ok(())
    }

    fn goal_met(&self) -> bool {
        let Some(slot) = &self.slot else {
            return false;
        };
        match slot.goal.location() {
            Some(name) => self
                .locations
                .get(name)
                .is_some_and(|l| self.checklist.contains(l.code)),
            None => self.checklist.count() >= slot.checklist_amount,
        }
    }

    /// Slot handshake. Forgets everything seen for a previous slot so a
    /// stale client can't win a fresh one.
    pub fn on_slot_connected(&mut self, player_name: String, slot_data: SlotData) {
        info!("Slot connected: {} (goal: {})", player_name, slot_data.goal);
        self.death_link = self.config.death_link.unwrap_or(slot_data.death_link);
        self.slot = Some(Slot {
            player_name,
            goal: slot_data.goal,
            checklist_amount: slot_data.checklist_amount as usize,
        });
        self.checklist.clear();
        self.finished = false;
    }

    /// Take in a batch of items. A full list (index 0) is recorded but not
    /// applied; permanents from it come back on the next City Trial entry.
    pub fn on_received_items(&mut self, batch: ReceivedItems) {
        debug!("Received items at index {}: {:?}", batch.index, batch.items);

        if batch.index == 0 {
            self.received = batch.items.iter().map(|i| i.item).enumerate().collect();
            return;
        }

        if batch.index > self.received.len() {
            warn!(
                "Received items at index {} but only {} known",
                batch.index,
                self.received.len()
            );
        }

        for (offset, network_item) in batch.items.iter().enumerate() {
            let index = batch.index + offset;
            if self.received.contains_key(&index) {
                continue;
            }
            self.received.insert(index, network_item.item);
            self.pending.push(PendingItem {
                index,
                item: network_item.item,
            });
        }
    }

    /// Append an item after the last received position and queue it
    pub fn grant(&mut self, code: i64) {
        let index = self
            .received
            .keys()
            .next_back()
            .map_or(0, |last| last + 1);
        info!("Granting item {} at index {}", code, index);
        self.received.insert(index, code);
        self.pending.push(PendingItem { index, item: code });
    }

    /// Incoming death: destroy the machine if the player is in a match.
    /// Starts the outgoing cooldown so the death isn't echoed back.
    pub fn on_death(&mut self) {
        self.last_death = Some(self.probe.clock().now());
        if self.slot.is_some()
            && self.status.is_connected()
            && self.probe.is_in_target_mode(&mut self.memory)
        {
            kill_player(&mut self.memory);
        }
    }

    pub fn toggle_death_link(&mut self) -> bool {
        self.death_link = !self.death_link;
        if self.death_link {
            info!("Deathlink enabled.");
        } else {
            info!("Deathlink disabled.");
        }
        self.death_link
    }
}
