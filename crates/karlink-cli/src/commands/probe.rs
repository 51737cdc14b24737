//! One-shot game status command.

use std::path::Path;

use anyhow::{Context, Result, bail};
use karlink_core::memory::layout::{health, header};
use karlink_core::world::is_box_filled;
use karlink_core::{
    DolphinBackend, GameMemory, GameProbe, LocationTable, PatchStat, SystemClock,
};
use owo_colors::OwoColorize;
use strum::IntoEnumIterator;

/// Attach to Dolphin and print game id, mode, health, patches and checklist
pub fn run(locations: Option<&Path>) -> Result<()> {
    let table = locations
        .map(|path| {
            LocationTable::load(path)
                .with_context(|| format!("Failed to load locations from {}", path.display()))
        })
        .transpose()?;

    let mut memory = GameMemory::new(DolphinBackend::new());
    memory.attach().context("Failed to attach to Dolphin")?;
    if let Some(pid) = memory.backend().pid() {
        println!("{} {}", "Dolphin PID:".bold(), pid);
    }

    let probe = GameProbe::new(SystemClock);
    let game_id = memory.read_bytes(header::GAME_ID, header::GAME_ID_LEN);
    let game_id = String::from_utf8_lossy(&game_id).into_owned();
    if !probe.is_game_process_present(&mut memory) {
        memory.detach();
        bail!("Loaded game is {:?}, not Kirby Air Ride", game_id);
    }
    println!("{} {}", "Game:".bold(), game_id.green());

    println!(
        "{} {}",
        "City Trial:".bold(),
        yes_no(probe.is_in_target_mode(&mut memory))
    );
    println!(
        "{} {}",
        "Alive:".bold(),
        yes_no(probe.is_player_alive(&mut memory))
    );
    println!(
        "{} {:.1} / {:.1} (machine {:.1})",
        "HP:".bold(),
        memory.read_float(health::CURRENT_HP),
        memory.read_float(health::MAX_HP),
        memory.read_pointer_float(health::MACHINE_HP)
    );

    println!("{}", "Patches:".bold());
    for stat in PatchStat::iter() {
        println!("  {:<10} {:>6.1}", stat.name(), memory.read_float(stat.address()));
    }

    if let Some(table) = table {
        let filled = table
            .iter()
            .filter_map(|location| location.address)
            .filter(|&address| is_box_filled(memory.read_byte(address)))
            .count();
        println!("{} {} / {}", "Checklist:".bold(), filled, table.len());
    }

    memory.detach();
    Ok(())
}

fn yes_no(value: bool) -> String {
    if value {
        "yes".green().to_string()
    } else {
        "no".red().to_string()
    }
}
