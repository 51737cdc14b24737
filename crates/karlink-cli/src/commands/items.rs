//! Item table listing.

use std::path::Path;

use anyhow::{Context, Result};
use karlink_core::item::{PatchDelta, PatchTarget, SpecialEffect};
use karlink_core::{Classification, ItemCatalog, ItemDef, ItemEffect, LocationTable};
use owo_colors::OwoColorize;

/// Print every item, grouped by kind
pub fn run(locations: Option<&Path>) -> Result<()> {
    let catalog = match locations {
        Some(path) => {
            let table = LocationTable::load(path)
                .with_context(|| format!("Failed to load locations from {}", path.display()))?;
            ItemCatalog::with_rewards(&table)
        }
        None => ItemCatalog::builtin(),
    };

    for (group, names) in catalog.name_groups() {
        println!("{} ({})", group.bold(), names.len());
        for name in names {
            if let Some(item) = catalog.by_name(name) {
                println!("  {}", item_line(item));
            }
        }
        println!();
    }
    println!("{} items", catalog.len());
    Ok(())
}

fn item_line(item: &ItemDef) -> String {
    let game_id = item
        .game_id
        .map(|id| format!("{:#04x}", id))
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{:>4}  {:<28} {}  x{:<3} {:<5} {}",
        item.code,
        item.name,
        classification_label(item.classification),
        item.quantity,
        game_id,
        describe_effect(&item.effect).dimmed()
    )
}

fn classification_label(classification: Classification) -> String {
    let label = format!("{:<11}", classification.to_string());
    match classification {
        Classification::Progression => label.magenta().to_string(),
        Classification::Useful => label.green().to_string(),
        Classification::Filler => label.white().to_string(),
        Classification::Trap => label.red().to_string(),
    }
}

/// Short human description of what an item does to the game
fn describe_effect(effect: &ItemEffect) -> String {
    match effect {
        ItemEffect::Patch { target, delta } => {
            let sign = match delta {
                PatchDelta::Increase => "+",
                PatchDelta::Decrease => "-",
            };
            let amount = delta.amount().abs();
            match target {
                PatchTarget::Single(stat) => format!("{}{} {}", sign, amount, stat),
                PatchTarget::All => format!("{}{} all stats", sign, amount),
            }
        }
        ItemEffect::Special(SpecialEffect::OneHp) => "machine HP set to 1".to_string(),
        ItemEffect::Special(SpecialEffect::FullHeal) => "machine HP restored".to_string(),
        ItemEffect::Reward => "checklist unlock".to_string(),
    }
}
