//! Checklist location table.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::KarOptions;
use crate::error::Result;
use crate::memory::layout::checklist;

/// Long grinds. Non-progress unless `progression_high_effort` is on.
pub const HIGH_EFFORT_LOCATIONS: &[&str] = &[
    "City Trial: break more than 500 boxes!",
    "City Trial: break more than 1000 boxes!",
    "City Trial: pick up a total of over 1000 items!",
    "City Trial: Pick up a total of over 3000 items!",
    "Free Run: Drive for a total of 2 hours or more!",
    "Free Run: Drive for a total of 30 minutes or more!",
    "Free Run: Drive for a total of 10 minutes or more!",
    "In one match, complete both Dragoon and Hydra!",
];

/// Boxes that need more than one player. Non-progress unless `progression_multiplayer` is on.
pub const MULTIPLAYER_LOCATIONS: &[&str] = &[
    "City Trial: Let time run out while all players are on the rails!",
    "City Trial: Have all players simultaneously get off of their machines!",
    "City Trial: Let time run out while all players are off of their machines!",
];

/// Non-progress unless `free_run_progression` is on.
pub const FREE_RUN_LOCATIONS: &[&str] = &[
    "Free Run: Drive for a total of 2 hours or more!",
    "Free Run: Drive for a total of 30 minutes or more!",
    "Free Run: Drive for a total of 10 minutes or more!",
    "Free Run: Change Air Ride Machines 10 times or more!",
];

/// Decode a checklist byte. Locked, flagged and visible-but-locked all read as unchecked.
pub fn is_box_filled(value: u8) -> bool {
    !matches!(
        value,
        checklist::LOCKED | checklist::FLAGGED | checklist::VISIBLE_LOCKED
    )
}

fn no_reward() -> String {
    "None".to_string()
}

/// One checklist box
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistLocation {
    pub name: String,
    pub code: i64,
    pub region: String,
    /// Address of the box's state byte. Boxes without one are never reported.
    #[serde(default)]
    pub address: Option<u32>,
    /// Unlock the game gives for the box, `"None"` if there is none
    #[serde(default = "no_reward")]
    pub reward: String,
}

impl ChecklistLocation {
    pub fn reward_name(&self) -> Option<&str> {
        match self.reward.as_str() {
            "" | "None" => None,
            name => Some(name),
        }
    }
}

/// All checklist boxes, in table order
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    locations: Vec<ChecklistLocation>,
    by_name: HashMap<String, usize>,
    by_code: HashMap<i64, usize>,
}

impl LocationTable {
    pub fn new(locations: Vec<ChecklistLocation>) -> Self {
        let by_name = locations
            .iter()
            .enumerate()
            .map(|(i, l)| (l.name.clone(), i))
            .collect();
        let by_code = locations
            .iter()
            .enumerate()
            .map(|(i, l)| (l.code, i))
            .collect();
        Self {
            locations,
            by_name,
            by_code,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let locations: Vec<ChecklistLocation> = serde_json::from_str(json)?;
        Ok(Self::new(locations))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn get(&self, name: &str) -> Option<&ChecklistLocation> {
        self.by_name.get(name).map(|&i| &self.locations[i])
    }

    pub fn by_code(&self, code: i64) -> Option<&ChecklistLocation> {
        self.by_code.get(&code).map(|&i| &self.locations[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChecklistLocation> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Location names grouped by region
    pub fn name_groups(&self) -> BTreeMap<&str, Vec<&str>> {
        let mut groups: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for location in &self.locations {
            groups
                .entry(location.region.as_str())
                .or_default()
                .push(location.name.as_str());
        }
        groups
    }

    /// Split locations into (progress, non-progress) according to the options
    pub fn split_progress(&self, options: &KarOptions) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut progress = BTreeSet::new();
        let mut nonprogress = BTreeSet::new();

        for location in &self.locations {
            let name = location.name.as_str();
            let excluded = (!options.progression_high_effort && HIGH_EFFORT_LOCATIONS.contains(&name))
                || (!options.progression_multiplayer && MULTIPLAYER_LOCATIONS.contains(&name))
                || (!options.free_run_progression && FREE_RUN_LOCATIONS.contains(&name));

            if excluded {
                nonprogress.insert(location.name.clone());
            } else {
                progress.insert(location.name.clone());
            }
        }

        (progress, nonprogress)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::sample_table;
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_box_decoding() {
        assert!(!is_box_filled(0x00));
        assert!(!is_box_filled(0x01));
        assert!(!is_box_filled(0x10));
        assert!(is_box_filled(0x11));
        assert!(is_box_filled(0x02));
        assert!(is_box_filled(0xFF));
    }

    #[test]
    fn test_from_json_defaults() {
        let table = LocationTable::from_json(
            r#"[{"name": "City Trial: Win a match!", "code": 1, "region": "City Trial"}]"#,
        )
        .unwrap();
        let location = table.get("City Trial: Win a match!").unwrap();
        assert_eq!(location.address, None);
        assert_eq!(location.reward_name(), None);
        assert_eq!(table.by_code(1).unwrap().name, "City Trial: Win a match!");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locations.json");
        std::fs::write(
            &path,
            r#"[{"name": "A", "code": 7, "region": "City Trial", "address": 2151000000, "reward": "Paint"}]"#,
        )
        .unwrap();

        let table = LocationTable::load(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("A").unwrap().reward_name(), Some("Paint"));
    }

    #[test]
    fn test_sample_table_parses() {
        let table =
            LocationTable::from_json(include_str!("../../../../demos/locations.sample.json")).unwrap();
        assert_eq!(table.len(), 3);
        assert!(table.iter().all(|l| l.address.is_none()));
        assert_eq!(table.by_code(3).unwrap().region, "Stadium: VS. KING DEDEDE");
    }

    #[test]
    fn test_load_missing_file() {
        let err = LocationTable::load("/nonexistent/locations.json").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_split_progress_defaults() {
        let table = sample_table();
        let (progress, nonprogress) = table.split_progress(&KarOptions::default());

        assert!(nonprogress.contains("City Trial: break more than 500 boxes!"));
        assert!(nonprogress.contains("In one match, complete both Dragoon and Hydra!"));
        assert!(nonprogress.contains("City Trial: Let time run out while all players are on the rails!"));
        assert!(nonprogress.contains("Free Run: Change Air Ride Machines 10 times or more!"));
        assert!(progress.contains("City Trial: Destroy all of the dilapidated houses!"));
        assert!(progress.is_disjoint(&nonprogress));
        assert_eq!(progress.len() + nonprogress.len(), table.len());
    }

    #[test]
    fn test_split_progress_all_enabled() {
        let table = sample_table();
        let options = KarOptions {
            progression_high_effort: true,
            progression_multiplayer: true,
            free_run_progression: true,
            ..Default::default()
        };
        let (progress, nonprogress) = table.split_progress(&options);
        assert!(nonprogress.is_empty());
        assert_eq!(progress.len(), table.len());
    }

    #[test]
    fn test_name_groups() {
        let table = sample_table();
        let groups = table.name_groups();
        assert_eq!(groups["Stadium: HIGH JUMP"].len(), 1);
        assert!(groups["City Trial"].contains(&"Fill in over 100 Checklist blocks!"));
    }
}
