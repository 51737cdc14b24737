//! Item pool assembly and slot data.

use std::collections::{BTreeSet, HashMap};

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde_json::Value;
use tracing::{debug, info};

use super::{KarOptions, LocationTable, RegionGraph};
use crate::error::{Error, Result};
use crate::item::{Classification, ItemCatalog, ItemDef, ItemKind};

/// An item placed in the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolItem {
    pub name: String,
    pub code: i64,
    pub classification: Classification,
}

/// A per-player world: options, locations and the data the fill algorithm consumes
#[derive(Debug, Clone)]
pub struct KarWorld {
    options: KarOptions,
    locations: LocationTable,
    catalog: ItemCatalog,
    graph: RegionGraph,
    progress: BTreeSet<String>,
    nonprogress: BTreeSet<String>,
    overrides: HashMap<String, Classification>,
    useful_pool: BTreeSet<String>,
    filler_pool: BTreeSet<String>,
    trap_pool: BTreeSet<String>,
    progression_pool: Vec<String>,
}

impl KarWorld {
    pub fn new(options: KarOptions, locations: LocationTable) -> Result<Self> {
        options.validate()?;

        let catalog = ItemCatalog::with_rewards(&locations);
        let (progress, nonprogress) = locations.split_progress(&options);
        let graph = RegionGraph::kirby_air_ride(&locations, &progress)?;

        let mut overrides = HashMap::new();
        if options.permanent_patches && !options.permanent_patch_progression {
            for item in catalog.iter().filter(|i| i.permanent) {
                overrides.insert(item.name.clone(), Classification::Useful);
            }
        }

        let mut world = Self {
            options,
            locations,
            catalog,
            graph,
            progress,
            nonprogress,
            overrides,
            useful_pool: BTreeSet::new(),
            filler_pool: BTreeSet::new(),
            trap_pool: BTreeSet::new(),
            progression_pool: Vec::new(),
        };
        world.sort_items();
        Ok(world)
    }

    fn sort_items(&mut self) {
        for item in self.catalog.iter() {
            // Rewards are placed locked, never pooled
            if item.kind == ItemKind::CheckboxReward {
                continue;
            }
            if item.permanent && !self.options.permanent_patches {
                continue;
            }
            if item.kind == ItemKind::Effect && !self.options.effect_items_enabled {
                continue;
            }

            let name = item.name.clone();
            match self.classification(item) {
                Classification::Progression => self
                    .progression_pool
                    .extend(std::iter::repeat_n(name, item.quantity as usize)),
                Classification::Useful => {
                    self.useful_pool.insert(name);
                }
                Classification::Trap => {
                    self.trap_pool.insert(name);
                }
                Classification::Filler => {
                    self.filler_pool.insert(name);
                }
            }
        }
    }

    pub fn options(&self) -> &KarOptions {
        &self.options
    }

    pub fn locations(&self) -> &LocationTable {
        &self.locations
    }

    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    pub fn graph(&self) -> &RegionGraph {
        &self.graph
    }

    pub fn progress_locations(&self) -> &BTreeSet<String> {
        &self.progress
    }

    pub fn nonprogress_locations(&self) -> &BTreeSet<String> {
        &self.nonprogress
    }

    /// Classification after option overrides
    pub fn classification(&self, item: &ItemDef) -> Classification {
        self.overrides
            .get(&item.name)
            .copied()
            .unwrap_or(item.classification)
    }

    /// Reward items pinned to their own location, as (location, item) pairs
    pub fn locked_items(&self) -> Vec<(String, PoolItem)> {
        if !self.options.checkbox_reward_items {
            return Vec::new();
        }
        self.locations
            .iter()
            .filter_map(|location| {
                let reward = location.reward_name()?;
                let item = self.create_item(reward)?;
                Some((location.name.clone(), item))
            })
            .collect()
    }

    pub fn create_item(&self, name: &str) -> Option<PoolItem> {
        let item = self.catalog.by_name(name)?;
        Some(PoolItem {
            name: item.name.clone(),
            code: item.code,
            classification: self.classification(item),
        })
    }

    /// Name of a filler item. With traps on, `trap_chance` percent of calls pick a trap.
    pub fn filler_item_name<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        if self.options.traps_enabled && self.options.trap_chance > 0 {
            let roll = rng.random::<f64>() * 100.0;
            if roll < f64::from(self.options.trap_chance) {
                let traps: Vec<&String> = self.trap_pool.iter().collect();
                if let Some(trap) = traps.choose(rng) {
                    return Some(trap.as_str());
                }
            }
        }

        let fillers: Vec<&String> = self.filler_pool.union(&self.useful_pool).collect();
        fillers.choose(rng).map(|name| name.as_str())
    }

    /// Build the shuffled pool. One item per location that isn't locked.
    pub fn create_items<R: Rng>(&self, rng: &mut R) -> Result<Vec<PoolItem>> {
        let mut names: Vec<String> = Vec::new();

        for _ in &self.options.exclude_locations {
            names.push(self.require_filler(rng)?);
        }

        let locked: BTreeSet<String> = self
            .locked_items()
            .into_iter()
            .map(|(location, _)| location)
            .collect();
        let mut remaining = self
            .locations
            .iter()
            .filter(|l| !self.options.exclude_locations.contains(&l.name))
            .filter(|l| !locked.contains(&l.name))
            .count();

        if self.progression_pool.len() > remaining {
            return Err(Error::InsufficientLocations {
                items: self.progression_pool.len(),
                locations: remaining,
            });
        }
        names.extend(self.progression_pool.iter().cloned());
        remaining -= self.progression_pool.len();

        for _ in 0..remaining {
            names.push(self.require_filler(rng)?);
        }

        let mut items: Vec<PoolItem> = names
            .iter()
            .filter_map(|name| self.create_item(name))
            .collect();
        items.shuffle(rng);

        info!(
            "Created item pool: {} items ({} progression)",
            items.len(),
            self.progression_pool.len()
        );
        Ok(items)
    }

    fn require_filler<R: Rng>(&self, rng: &mut R) -> Result<String> {
        self.filler_item_name(rng)
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidOption("no filler items available".to_string()))
    }

    /// Options handed to the client in the connection handshake
    pub fn fill_slot_data(&self) -> Result<Value> {
        let value = serde_json::to_value(&self.options)?;
        debug!("Slot data: {}", value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::location::fixtures::sample_table;
    use crate::world::{Goal, SlotData};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world(options: KarOptions) -> KarWorld {
        KarWorld::new(options, sample_table()).unwrap()
    }

    /// Defaults put 45 permanent patches in the pool, more than the sample holds
    fn small_options() -> KarOptions {
        KarOptions {
            permanent_patches: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_pool_size_matches_locations() {
        let world = world(small_options());
        let mut rng = StdRng::seed_from_u64(7);
        let pool = world.create_items(&mut rng).unwrap();
        assert_eq!(pool.len(), world.locations().len());
    }

    #[test]
    fn test_pool_is_deterministic_for_seed() {
        let world = world(small_options());
        let a = world.create_items(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = world.create_items(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_progression_overflow_errors() {
        let world = world(KarOptions::default());
        let err = world
            .create_items(&mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientLocations {
                items: 45,
                locations: 15
            }
        ));
    }

    #[test]
    fn test_permanent_patches_as_useful() {
        let world = world(KarOptions {
            permanent_patch_progression: false,
            ..Default::default()
        });
        let item = world.catalog().by_name("Boost Up: Permanent +1").unwrap();
        assert_eq!(world.classification(item), Classification::Useful);

        let pool = world.create_items(&mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(pool.len(), 15);
        assert!(
            pool.iter()
                .all(|i| i.classification != Classification::Progression)
        );
    }

    #[test]
    fn test_no_traps_when_disabled() {
        let world = world(small_options());
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let name = world.filler_item_name(&mut rng).unwrap();
            assert!(!name.contains("Down"), "got trap {}", name);
        }
    }

    #[test]
    fn test_always_trap_at_full_chance() {
        let world = world(KarOptions {
            traps_enabled: true,
            trap_chance: 100,
            ..small_options()
        });
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let name = world.filler_item_name(&mut rng).unwrap();
            let item = world.catalog().by_name(name).unwrap();
            assert_eq!(item.classification, Classification::Trap);
        }
    }

    #[test]
    fn test_effect_items_gated() {
        let off = world(small_options());
        assert!(!off.useful_pool.contains("Full Heal"));
        assert!(!off.trap_pool.contains("1 HP"));

        let on = world(KarOptions {
            effect_items_enabled: true,
            ..small_options()
        });
        assert!(on.useful_pool.contains("Full Heal"));
        assert!(on.trap_pool.contains("1 HP"));
    }

    #[test]
    fn test_excluded_locations_get_filler() {
        let world = world(KarOptions {
            exclude_locations: ["Fill in over 100 Checklist blocks!".to_string()].into(),
            ..small_options()
        });
        let pool = world.create_items(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(pool.len(), 15);
    }

    #[test]
    fn test_locked_rewards() {
        let disabled = world(small_options());
        assert!(disabled.locked_items().is_empty());

        let world = world(KarOptions {
            checkbox_reward_items: true,
            ..small_options()
        });
        let locked = world.locked_items();
        assert_eq!(locked.len(), 3);
        let (location, item) = &locked[0];
        assert_eq!(location, "City Trial: break more than 500 boxes!");
        assert_eq!(item.name, "Red Paint");
        assert_eq!(item.code, 502);

        // Locked locations are not filled from the pool
        let pool = world.create_items(&mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(pool.len(), 12);
        assert!(pool.iter().all(|i| i.code < 500));
    }

    #[test]
    fn test_slot_data_round_trip() {
        let world = world(KarOptions {
            goal: Goal::ChecklistCount,
            checklist_amount: 42,
            death_link: true,
            ..small_options()
        });
        let value = world.fill_slot_data().unwrap();
        assert_eq!(value["checklist_amount"], 42);

        let slot: SlotData = serde_json::from_value(value).unwrap();
        assert_eq!(slot.goal, Goal::ChecklistCount);
        assert_eq!(slot.checklist_amount, 42);
        assert!(slot.death_link);
    }
}
