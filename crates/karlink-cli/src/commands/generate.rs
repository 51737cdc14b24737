//! Item pool generation command.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use karlink_core::{Classification, KarOptions, KarWorld, LocationTable, PoolItem};
use owo_colors::OwoColorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tracing::info;

/// Build a world from options and a location table and print its pool
pub fn run(
    options_path: Option<&Path>,
    locations_path: &Path,
    seed: Option<u64>,
    output: Option<&Path>,
) -> Result<()> {
    let options = match options_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options from {}", path.display()))?;
            KarOptions::from_json(&content)
                .with_context(|| format!("Invalid options in {}", path.display()))?
        }
        None => KarOptions::default(),
    };
    let locations = LocationTable::load(locations_path)
        .with_context(|| format!("Failed to load locations from {}", locations_path.display()))?;

    let seed = seed.unwrap_or_else(rand::random);
    info!("Generating with seed {}", seed);

    let world = KarWorld::new(options, locations)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let pool = world.create_items(&mut rng)?;
    let locked = world.locked_items();
    let slot_data = world.fill_slot_data()?;

    println!("{} {}", "Seed:".bold(), seed);
    println!(
        "{} {} ({} progress, {} non-progress)",
        "Locations:".bold(),
        world.locations().len(),
        world.progress_locations().len(),
        world.nonprogress_locations().len()
    );
    println!("{} {}", "Pool:".bold(), pool.len());
    for (classification, count) in classification_counts(&pool) {
        println!("  {:<12} {}", classification, count);
    }
    if !locked.is_empty() {
        println!("{} {}", "Locked:".bold(), locked.len());
        for (location, item) in &locked {
            println!("  {} -> {}", location, item.name);
        }
    }
    let goal = world.graph().completion(world.options());
    if world.graph().is_beatable(world.options()) {
        println!("{} {:?} {}", "Goal:".bold(), goal, "reachable".green());
    } else {
        println!("{} {:?} {}", "Goal:".bold(), goal, "unreachable".red());
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&slot_data)?);

    if let Some(path) = output {
        let spoiler = spoiler_json(seed, &pool, &locked, slot_data);
        std::fs::write(path, serde_json::to_string_pretty(&spoiler)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}

fn classification_counts(pool: &[PoolItem]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in pool {
        *counts.entry(item.classification.to_string()).or_default() += 1;
    }
    counts
}

fn spoiler_json(seed: u64, pool: &[PoolItem], locked: &[(String, PoolItem)], slot_data: Value) -> Value {
    let items: Vec<Value> = pool
        .iter()
        .map(|item| {
            json!({
                "name": item.name,
                "code": item.code,
                "progression": item.classification == Classification::Progression,
            })
        })
        .collect();
    let locked: BTreeMap<&str, &str> = locked
        .iter()
        .map(|(location, item)| (location.as_str(), item.name.as_str()))
        .collect();

    json!({
        "seed": seed,
        "slot_data": slot_data,
        "items": items,
        "locked": locked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn pool_item(name: &str, code: i64, classification: Classification) -> PoolItem {
        PoolItem {
            name: name.to_string(),
            code,
            classification,
        }
    }

    #[test]
    fn test_classification_counts() {
        let pool = vec![
            pool_item("Boost Up", 30, Classification::Useful),
            pool_item("Boost Down", 31, Classification::Trap),
            pool_item("Turn Up", 38, Classification::Useful),
        ];
        let counts = classification_counts(&pool);
        assert_eq!(counts["useful"], 2);
        assert_eq!(counts["trap"], 1);
        assert!(!counts.contains_key("progression"));
    }

    #[test]
    fn test_spoiler_json() {
        let pool = vec![pool_item("Boost Up: Permanent +1", 48, Classification::Progression)];
        let locked = vec![(
            "City Trial: break more than 500 boxes!".to_string(),
            pool_item("Red Paint", 502, Classification::Progression),
        )];
        let spoiler = spoiler_json(7, &pool, &locked, json!({"checklist_amount": 100}));

        assert_eq!(spoiler["seed"], 7);
        assert_eq!(spoiler["items"][0]["code"], 48);
        assert_eq!(spoiler["items"][0]["progression"], true);
        assert_eq!(spoiler["locked"]["City Trial: break more than 500 boxes!"], "Red Paint");
        assert_eq!(spoiler["slot_data"]["checklist_amount"], 100);
    }

    #[test]
    fn test_generate_writes_output() {
        let dir = tempdir().unwrap();
        let locations = dir.path().join("locations.json");
        std::fs::write(
            &locations,
            r#"[
                {"name": "City Trial: Win a match!", "code": 1, "region": "City Trial"},
                {"name": "Fill in over 100 Checklist blocks!", "code": 2, "region": "City Trial"}
            ]"#,
        )
        .unwrap();
        let options = dir.path().join("options.json");
        std::fs::write(&options, r#"{"permanent_patches": 0}"#).unwrap();
        let output = dir.path().join("out.json");

        run(Some(&options), &locations, Some(3), Some(&output)).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["seed"], 3);
        assert_eq!(written["items"].as_array().unwrap().len(), 2);
    }
}
