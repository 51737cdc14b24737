use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::memory::layout::patch;

/// The nine patch counters a City Trial machine carries
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
pub enum PatchStat {
    Boost,
    #[strum(serialize = "Top Speed")]
    TopSpeed,
    Offense,
    Defense,
    Turn,
    Glide,
    Charge,
    Weight,
    #[strum(serialize = "HP")]
    Hp,
}

impl PatchStat {
    /// Address of player 1's counter for this stat
    pub fn address(&self) -> u32 {
        match self {
            Self::Boost => patch::BOOST,
            Self::TopSpeed => patch::TOP_SPEED,
            Self::Offense => patch::OFFENSE,
            Self::Defense => patch::DEFENSE,
            Self::Turn => patch::TURN,
            Self::Glide => patch::GLIDE,
            Self::Charge => patch::CHARGE,
            Self::Weight => patch::WEIGHT,
            Self::Hp => patch::HP,
        }
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_nine_distinct_addresses() {
        let addresses: HashSet<u32> = PatchStat::iter().map(|s| s.address()).collect();
        assert_eq!(addresses.len(), 9);
    }

    #[test]
    fn test_names() {
        assert_eq!(PatchStat::TopSpeed.name(), "Top Speed");
        assert_eq!(PatchStat::Hp.to_string(), "HP");
        assert_eq!(PatchStat::from_str("Glide").unwrap(), PatchStat::Glide);
    }
}
