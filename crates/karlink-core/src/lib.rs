//! # karlink-core
//!
//! Core library for the Kirby Air Ride multiworld link.
//!
//! This crate provides:
//! - Dolphin emulated RAM access (Linux `/proc`, Windows Win32)
//! - City Trial mode, health and checklist probing
//! - Item definitions and their effect on machine patches
//! - The reconciliation loop between the game and a multiworld session
//! - World generation: options, locations, regions and the item pool

pub mod config;
pub mod error;
pub mod game;
pub mod item;
pub mod link;
pub mod memory;
pub mod session;
pub mod world;

pub use config::Config;
pub use error::{Error, Result};
pub use game::{Clock, GameProbe, SystemClock};
pub use item::{
    Classification, ItemCatalog, ItemDef, ItemEffect, ItemKind, PatchStat, apply_item,
    kill_player,
};
pub use link::{Command, ConnectionStatus, Link, LinkConfig, LinkHandle, WakeSignal};
pub use memory::{DolphinBackend, GameMemory, MemoryBackend, PointerAddress};
pub use session::{
    LocalSession, NetworkItem, ReceivedItems, SessionEvent, SessionLink, SessionLog,
};
pub use world::{
    ChecklistLocation, Goal, KarOptions, KarWorld, LocationTable, PoolItem, RegionGraph,
    SlotData,
};
