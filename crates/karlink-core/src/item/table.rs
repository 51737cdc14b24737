//! Static item table.
//!
//! Every item's behavior is decided here, once, as an [`ItemEffect`]. Item
//! names are derived from their effect, never parsed back into one.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoEnumIterator, IntoStaticStr};

use super::PatchStat;
use crate::world::LocationTable;

/// Offset between a location code and the code of its checkbox reward item
pub const REWARD_CODE_OFFSET: i64 = 500;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
pub enum ItemKind {
    Patch,
    Effect,
    #[strum(serialize = "Checkbox Reward")]
    CheckboxReward,
}

/// How the fill algorithm treats an item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Classification {
    Progression,
    Useful,
    Filler,
    Trap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchTarget {
    Single(PatchStat),
    All,
}

impl PatchTarget {
    pub fn stats(&self) -> Vec<PatchStat> {
        match self {
            Self::Single(stat) => vec![*stat],
            Self::All => PatchStat::iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchDelta {
    Increase,
    Decrease,
}

impl PatchDelta {
    pub fn amount(&self) -> f32 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialEffect {
    /// Drop the current machine to 1 HP
    OneHp,
    /// Restore the current machine to its maximum HP
    FullHeal,
}

/// What receiving an item does to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemEffect {
    Patch {
        target: PatchTarget,
        delta: PatchDelta,
    },
    Special(SpecialEffect),
    /// Counted by the session only
    Reward,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDef {
    pub name: String,
    pub code: i64,
    pub kind: ItemKind,
    pub classification: Classification,
    /// Copies placed in the pool when the item is progression
    pub quantity: u32,
    /// Id the game uses for the item, if it has one
    pub game_id: Option<u8>,
    pub effect: ItemEffect,
    /// Re-applied every time City Trial is entered
    pub permanent: bool,
}

impl ItemDef {
    fn patch(
        name: String,
        code: i64,
        classification: Classification,
        quantity: u32,
        game_id: Option<u8>,
        target: PatchTarget,
        delta: PatchDelta,
    ) -> Self {
        Self {
            name,
            code,
            kind: ItemKind::Patch,
            classification,
            quantity,
            game_id,
            effect: ItemEffect::Patch { target, delta },
            permanent: false,
        }
    }
}

/// Lookup of every item by code and by name
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: Vec<ItemDef>,
    by_code: HashMap<i64, usize>,
    by_name: HashMap<String, usize>,
}

impl ItemCatalog {
    /// Catalog without checkbox reward items
    pub fn builtin() -> Self {
        Self::from_items(builtin_items())
    }

    /// Catalog including one reward item per rewarding location
    pub fn with_rewards(locations: &LocationTable) -> Self {
        let mut items = builtin_items();
        for location in locations.iter() {
            let Some(reward) = location.reward_name() else {
                continue;
            };
            items.push(ItemDef {
                name: reward.to_string(),
                code: location.code + REWARD_CODE_OFFSET,
                kind: ItemKind::CheckboxReward,
                classification: Classification::Progression,
                quantity: 1,
                game_id: None,
                effect: ItemEffect::Reward,
                permanent: false,
            });
        }
        Self::from_items(items)
    }

    fn from_items(items: Vec<ItemDef>) -> Self {
        let by_code = items.iter().enumerate().map(|(i, d)| (d.code, i)).collect();
        let by_name = items
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();
        Self {
            items,
            by_code,
            by_name,
        }
    }

    pub fn get(&self, code: i64) -> Option<&ItemDef> {
        self.by_code.get(&code).map(|&i| &self.items[i])
    }

    pub fn by_name(&self, name: &str) -> Option<&ItemDef> {
        self.by_name.get(name).map(|&i| &self.items[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemDef> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item names grouped for the host's item name groups
    pub fn name_groups(&self) -> BTreeMap<&'static str, Vec<&str>> {
        let mut groups: BTreeMap<&'static str, Vec<&str>> = BTreeMap::new();
        for item in &self.items {
            let group = match item.kind {
                ItemKind::Patch => "Patches",
                ItemKind::Effect => "Effects",
                ItemKind::CheckboxReward => "Checkbox Rewards",
            };
            groups.entry(group).or_default().push(&item.name);
        }
        groups
    }
}

fn builtin_items() -> Vec<ItemDef> {
    let mut items = Vec::new();

    // Up/Down pairs: codes 30..=47, game ids 0x03..=0x13
    for (i, stat) in PatchStat::iter().enumerate() {
        let code = 30 + 2 * i as i64;
        let game_id = 0x03 + 2 * i as u8;
        items.push(ItemDef::patch(
            format!("{} Up", stat),
            code,
            Classification::Useful,
            10,
            Some(game_id),
            PatchTarget::Single(stat),
            PatchDelta::Increase,
        ));
        // HP Down has no in-game counterpart
        let down_id = (stat != PatchStat::Hp).then_some(game_id + 1);
        items.push(ItemDef::patch(
            format!("{} Down", stat),
            code + 1,
            Classification::Trap,
            10,
            down_id,
            PatchTarget::Single(stat),
            PatchDelta::Decrease,
        ));
    }

    for (i, stat) in PatchStat::iter().enumerate() {
        let mut item = ItemDef::patch(
            format!("{} Up: Permanent +1", stat),
            48 + i as i64,
            Classification::Progression,
            5,
            None,
            PatchTarget::Single(stat),
            PatchDelta::Increase,
        );
        item.permanent = true;
        items.push(item);
    }

    items.push(ItemDef::patch(
        "All Up".to_string(),
        57,
        Classification::Useful,
        5,
        Some(0x14),
        PatchTarget::All,
        PatchDelta::Increase,
    ));

    items.push(ItemDef {
        name: "1 HP".to_string(),
        code: 58,
        kind: ItemKind::Effect,
        classification: Classification::Trap,
        quantity: 10,
        game_id: None,
        effect: ItemEffect::Special(SpecialEffect::OneHp),
        permanent: false,
    });
    items.push(ItemDef {
        name: "Full Heal".to_string(),
        code: 59,
        kind: ItemKind::Effect,
        classification: Classification::Useful,
        quantity: 10,
        game_id: None,
        effect: ItemEffect::Special(SpecialEffect::FullHeal),
        permanent: false,
    });

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LocationTable;

    #[test]
    fn test_builtin_codes() {
        let catalog = ItemCatalog::builtin();
        assert_eq!(catalog.len(), 30);

        let boost_up = catalog.get(30).unwrap();
        assert_eq!(boost_up.name, "Boost Up");
        assert_eq!(boost_up.game_id, Some(0x03));
        assert_eq!(
            boost_up.effect,
            ItemEffect::Patch {
                target: PatchTarget::Single(PatchStat::Boost),
                delta: PatchDelta::Increase
            }
        );

        let hp_down = catalog.by_name("HP Down").unwrap();
        assert_eq!(hp_down.code, 47);
        assert_eq!(hp_down.game_id, None);
        assert_eq!(hp_down.classification, Classification::Trap);

        assert_eq!(catalog.by_name("Top Speed Down").unwrap().code, 33);
        assert_eq!(catalog.by_name("Weight Up").unwrap().game_id, Some(0x11));

        let all_up = catalog.get(57).unwrap();
        assert_eq!(all_up.name, "All Up");
        assert_eq!(all_up.game_id, Some(0x14));
    }

    #[test]
    fn test_permanent_items() {
        let catalog = ItemCatalog::builtin();
        let permanent: Vec<_> = catalog.iter().filter(|i| i.permanent).collect();
        assert_eq!(permanent.len(), 9);
        assert!(permanent.iter().all(|i| (48..=56).contains(&i.code)));
        assert!(
            permanent
                .iter()
                .all(|i| i.classification == Classification::Progression)
        );
        assert_eq!(
            catalog.get(56).unwrap().name,
            "HP Up: Permanent +1".to_string()
        );
    }

    #[test]
    fn test_codes_unique() {
        let catalog = ItemCatalog::builtin();
        let mut codes: Vec<_> = catalog.iter().map(|i| i.code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), catalog.len());
    }

    #[test]
    fn test_reward_items() {
        let table = LocationTable::from_json(
            r#"[
                {"name": "City Trial: Win a match!", "code": 1, "region": "City Trial", "address": 2153000000, "reward": "Red Warpstar Paint"},
                {"name": "City Trial: Lose a match!", "code": 2, "region": "City Trial", "address": 2153000001, "reward": "None"}
            ]"#,
        )
        .unwrap();

        let catalog = ItemCatalog::with_rewards(&table);
        assert_eq!(catalog.len(), 31);
        let reward = catalog.get(501).unwrap();
        assert_eq!(reward.name, "Red Warpstar Paint");
        assert_eq!(reward.kind, ItemKind::CheckboxReward);
        assert_eq!(reward.effect, ItemEffect::Reward);
        assert!(catalog.get(502).is_none());
    }

    #[test]
    fn test_unknown_code() {
        assert!(ItemCatalog::builtin().get(9999).is_none());
    }

    #[test]
    fn test_name_groups() {
        let catalog = ItemCatalog::builtin();
        let groups = catalog.name_groups();
        assert_eq!(groups["Patches"].len(), 28);
        assert_eq!(groups["Effects"], vec!["1 HP", "Full Heal"]);
    }
}
