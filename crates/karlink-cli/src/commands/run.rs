//! Client loop command.

use std::path::Path;

use anyhow::{Context, Result};
use karlink_core::{
    Config, DolphinBackend, ItemCatalog, Link, LocalSession, LocationTable, SessionEvent,
    SessionLog, SlotData, SystemClock,
};
use owo_colors::OwoColorize;
use tracing::{info, warn};

use crate::{console, input};

/// Run the link until Ctrl+C, Esc/q or `/quit`
pub fn run(
    config: &Config,
    locations_path: Option<&Path>,
    slot_path: Option<&Path>,
    console_mode: bool,
) -> Result<()> {
    let locations_path = locations_path.unwrap_or(&config.client.locations);
    let locations = LocationTable::load(locations_path)
        .with_context(|| format!("Failed to load locations from {}", locations_path.display()))?;
    info!("Loaded {} checklist locations", locations.len());

    let slot_data = match slot_path {
        Some(path) => load_slot_data(path)?,
        None => SlotData::default(),
    };

    let mut log = SessionLog::new(&config.client.session_dir);
    match log.start_session() {
        Ok(path) => info!("Session transcript: {}", path.display()),
        Err(e) => warn!("Failed to start session transcript: {}", e),
    }
    let session = LocalSession::new(locations.clone()).with_log(log);
    let catalog = ItemCatalog::with_rewards(&locations);

    let (mut link, handle) = Link::new(
        DolphinBackend::new(),
        session,
        SystemClock,
        catalog.clone(),
        locations,
        config.link_config(),
    );

    let ctrlc_handle = handle.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        ctrlc_handle.shutdown();
    })?;

    handle.session_event(SessionEvent::SlotConnected {
        player_name: config.client.player_name.clone(),
        slot_data,
    });

    info!("karlink {}", env!("CARGO_PKG_VERSION"));
    if console_mode {
        let _console_handle = console::spawn_console_reader(handle.clone(), catalog);
        println!("Waiting for Dolphin... (type /help for commands)");
    } else {
        let _keyboard_handle = input::spawn_keyboard_monitor(handle.clone());
        println!("Waiting for Dolphin... (d: death link, s: status, Esc or q: quit)");
    }

    link.run();

    let session = link.session();
    println!();
    println!(
        "{} {} location(s) checked, {} death(s) sent",
        "Session:".bold(),
        session.reported().len(),
        session.deaths()
    );
    if session.goal_sent() {
        println!("{}", "Goal complete!".green());
    }
    Ok(())
}

fn load_slot_data(path: &Path) -> Result<SlotData> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read slot data from {}", path.display()))?;
    let slot_data = serde_json::from_str(&content)
        .with_context(|| format!("Invalid slot data in {}", path.display()))?;
    Ok(slot_data)
}
