use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Goal of a run. Anything that isn't one of the named choices is taken as a
/// location name that must be checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Goal {
    #[default]
    HundredChecklistBoxes,
    HydraAndDragoon,
    BeatKingDedede,
    ChecklistCount,
    Location(String),
}

impl Goal {
    pub const HUNDRED_CHECKLIST_BOXES: &'static str = "Fill in over 100 Checklist blocks!";
    pub const HYDRA_AND_DRAGOON: &'static str = "In one match, complete both Dragoon and Hydra!";
    pub const BEAT_KING_DEDEDE: &'static str =
        "Stadium: VS. KING DEDEDE KO King Dedede in less than a minute!";
    pub const CHECKLIST_COUNT: &'static str = "Fill in N Checklist Boxes!";

    pub fn as_str(&self) -> &str {
        match self {
            Self::HundredChecklistBoxes => Self::HUNDRED_CHECKLIST_BOXES,
            Self::HydraAndDragoon => Self::HYDRA_AND_DRAGOON,
            Self::BeatKingDedede => Self::BEAT_KING_DEDEDE,
            Self::ChecklistCount => Self::CHECKLIST_COUNT,
            Self::Location(name) => name,
        }
    }

    /// Location whose check completes the goal, `None` for the count goal
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::ChecklistCount => None,
            other => Some(other.as_str()),
        }
    }
}

impl FromStr for Goal {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            Self::HUNDRED_CHECKLIST_BOXES => Self::HundredChecklistBoxes,
            Self::HYDRA_AND_DRAGOON => Self::HydraAndDragoon,
            Self::BEAT_KING_DEDEDE => Self::BeatKingDedede,
            Self::CHECKLIST_COUNT => Self::ChecklistCount,
            other => Self::Location(other.to_string()),
        })
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Goal {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Goal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let Ok(goal) = text.parse::<Goal>();
        Ok(goal)
    }
}

/// Per-player generation options. Field names match the slot data keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KarOptions {
    pub goal: Goal,
    #[serde(with = "toggle")]
    pub traps_enabled: bool,
    /// Percent chance a filler slot becomes a trap
    pub trap_chance: u32,
    #[serde(with = "toggle")]
    pub effect_items_enabled: bool,
    /// Box count for the "Fill in N Checklist Boxes!" goal
    pub checklist_amount: u32,
    #[serde(with = "toggle")]
    pub checkbox_reward_items: bool,
    #[serde(with = "toggle")]
    pub progression_high_effort: bool,
    #[serde(with = "toggle")]
    pub progression_multiplayer: bool,
    #[serde(with = "toggle")]
    pub permanent_patches: bool,
    #[serde(with = "toggle")]
    pub permanent_patch_progression: bool,
    #[serde(with = "toggle")]
    pub free_run_progression: bool,
    #[serde(with = "toggle")]
    pub death_link: bool,
    #[serde(with = "toggle")]
    pub energy_link: bool,
    /// Locations that must only hold filler. Not part of slot data.
    #[serde(skip_serializing)]
    pub exclude_locations: BTreeSet<String>,
}

impl Default for KarOptions {
    fn default() -> Self {
        Self {
            goal: Goal::default(),
            traps_enabled: false,
            trap_chance: 10,
            effect_items_enabled: false,
            checklist_amount: 100,
            checkbox_reward_items: false,
            progression_high_effort: false,
            progression_multiplayer: false,
            permanent_patches: true,
            permanent_patch_progression: true,
            free_run_progression: false,
            death_link: false,
            energy_link: false,
            exclude_locations: BTreeSet::new(),
        }
    }
}

impl KarOptions {
    pub const TRAP_CHANCE_MAX: u32 = 100;
    pub const CHECKLIST_AMOUNT_MIN: u32 = 1;
    pub const CHECKLIST_AMOUNT_MAX: u32 = 120;

    /// Parse options from JSON and check every range
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trap_chance > Self::TRAP_CHANCE_MAX {
            return Err(Error::InvalidOption(format!(
                "trap_chance must be between 0 and {}, got {}",
                Self::TRAP_CHANCE_MAX,
                self.trap_chance
            )));
        }
        if !(Self::CHECKLIST_AMOUNT_MIN..=Self::CHECKLIST_AMOUNT_MAX).contains(&self.checklist_amount)
        {
            return Err(Error::InvalidOption(format!(
                "checklist_amount must be between {} and {}, got {}",
                Self::CHECKLIST_AMOUNT_MIN,
                Self::CHECKLIST_AMOUNT_MAX,
                self.checklist_amount
            )));
        }
        Ok(())
    }
}

/// On/off options travel as 0/1; `true`/`false` is accepted as well.
pub(super) mod toggle {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(u64),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bool(b) => b,
            Raw::Int(n) => n != 0,
        })
    }
}
