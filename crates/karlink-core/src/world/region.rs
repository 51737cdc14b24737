//! Region graph, access rules and reachability.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::{KarOptions, LocationTable};
use crate::error::{Error, Result};

pub const CITY_TRIAL: &str = "City Trial";

const STADIUM_REGIONS: &[&str] = &[
    "Stadium: DESTRUCTION DERBY ALL",
    "Stadium: DESTRUCTION DERBY 1",
    "Stadium: DESTRUCTION DERBY 2",
    "Stadium: DESTRUCTION DERBY 3",
    "Stadium: DESTRUCTION DERBY 4",
    "Stadium: DESTRUCTION DERBY 5",
    "Stadium: DRAG RACE 1",
    "Stadium: DRAG RACE 2",
    "Stadium: DRAG RACE 3",
    "Stadium: DRAG RACE 4",
    "Stadium: HIGH JUMP",
    "Stadium: TARGET FLIGHT",
    "Stadium: AIR GLIDER",
    "Stadium: KIRBY MELEE ALL",
    "Stadium: KIRBY MELEE 1",
    "Stadium: KIRBY MELEE 2",
    "Stadium: VS. KING DEDEDE",
];

/// Access rule on an entrance or a location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Always,
    CanReachLocation(String),
    All(Vec<Rule>),
}

impl Rule {
    pub fn location(name: &str) -> Self {
        Self::CanReachLocation(name.to_string())
    }

    fn is_satisfied(&self, reached: &BTreeSet<String>) -> bool {
        match self {
            Self::Always => true,
            Self::CanReachLocation(name) => reached.contains(name),
            Self::All(rules) => rules.iter().all(|r| r.is_satisfied(reached)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Entrance {
    pub from: String,
    pub to: String,
    pub rule: Rule,
}

/// What generation has to be able to reach for the seed to be beatable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Region(String),
    Location(String),
    /// No condition set; the host engine's default applies
    Unset,
}

/// Regions and locations reachable from the origin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reachability {
    pub regions: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

impl Reachability {
    pub fn satisfies(&self, completion: &Completion) -> bool {
        match completion {
            Completion::Region(name) => self.regions.contains(name),
            Completion::Location(name) => self.locations.contains(name),
            Completion::Unset => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegionGraph {
    origin: String,
    regions: BTreeMap<String, Vec<String>>,
    entrances: Vec<Entrance>,
    location_rules: BTreeMap<String, Rule>,
}

impl RegionGraph {
    /// City Trial plus every stadium, wired the way the stadium unlocks chain
    pub fn kirby_air_ride(table: &LocationTable, progress: &BTreeSet<String>) -> Result<Self> {
        let mut graph = Self {
            origin: CITY_TRIAL.to_string(),
            regions: BTreeMap::new(),
            entrances: Vec::new(),
            location_rules: BTreeMap::new(),
        };
        graph.regions.insert(CITY_TRIAL.to_string(), Vec::new());
        for region in STADIUM_REGIONS {
            graph.regions.insert(region.to_string(), Vec::new());
        }

        graph.connect(CITY_TRIAL, "Stadium: DESTRUCTION DERBY ALL", Rule::Always);
        graph.connect(
            "Stadium: DESTRUCTION DERBY ALL",
            "Stadium: DESTRUCTION DERBY 1",
            Rule::Always,
        );
        graph.connect(
            "Stadium: DESTRUCTION DERBY ALL",
            "Stadium: DESTRUCTION DERBY 2",
            Rule::Always,
        );
        graph.connect(
            "Stadium: DESTRUCTION DERBY 2",
            "Stadium: DESTRUCTION DERBY 3",
            Rule::location("Stadium: DESTRUCTION DERBY 2 In one game, KO a rival 10 times or more!"),
        );
        graph.connect(
            "Stadium: DESTRUCTION DERBY 3",
            "Stadium: DESTRUCTION DERBY 4",
            Rule::location("Stadium: DESTRUCTION DERBY 3 In one game, KO your rivals 5 or more times!"),
        );
        graph.connect(
            "Stadium: DESTRUCTION DERBY 4",
            "Stadium: DESTRUCTION DERBY 5",
            Rule::location("Stadium: DESTRUCTION DERBY 4 In one game, KO a rival 10 times or more!"),
        );

        graph.connect(CITY_TRIAL, "Stadium: DRAG RACE 1", Rule::Always);
        graph.connect(CITY_TRIAL, "Stadium: DRAG RACE 2", Rule::Always);
        graph.connect(CITY_TRIAL, "Stadium: DRAG RACE 3", Rule::Always);
        graph.connect(
            "Stadium: DRAG RACE 3",
            "Stadium: DRAG RACE 4",
            Rule::location("Stadium: DRAG RACE 3 Finish in less than 00:27:00!"),
        );

        graph.connect(CITY_TRIAL, "Stadium: HIGH JUMP", Rule::Always);
        graph.connect(CITY_TRIAL, "Stadium: TARGET FLIGHT", Rule::Always);
        graph.connect(CITY_TRIAL, "Stadium: AIR GLIDER", Rule::Always);

        graph.connect(CITY_TRIAL, "Stadium: KIRBY MELEE ALL", Rule::Always);
        graph.connect(
            "Stadium: KIRBY MELEE ALL",
            "Stadium: KIRBY MELEE 1",
            Rule::Always,
        );
        graph.connect(
            "Stadium: KIRBY MELEE 1",
            "Stadium: KIRBY MELEE 2",
            Rule::location("Stadium: KIRBY MELEE 1 In one game, KO over 75 enemies by yourself!"),
        );

        graph.connect(CITY_TRIAL, "Stadium: VS. KING DEDEDE", Rule::Always);

        for location in table.iter() {
            let Some(region) = graph.regions.get_mut(&location.region) else {
                return Err(Error::UnknownRegion(location.region.clone()));
            };
            region.push(location.name.clone());
        }

        graph.set_rule_if_progress(
            progress,
            "Unlock Hydra Parts X, Y, and Z on the Checklist!",
            Rule::All(vec![
                Rule::location("City Trial: Destroy all of the dilapidated houses!"),
                Rule::location("Stadium: DESTRUCTION DERBY (All) KO enemies over 150 times!"),
                Rule::location("Stadium: KIRBY MELEE (All) KO over 1,500 enemies!"),
            ]),
        );
        graph.set_rule_if_progress(
            progress,
            "Unlock Dragoon Parts A, B, and C on the Checklist!",
            Rule::All(vec![
                Rule::location("Stadium: HIGH JUMP Jump higher than 1,000 feet!"),
                Rule::location("Stadium: DESTRUCTION DERBY (All) KO enemies over 150 times!"),
                Rule::location("Stadium: KIRBY MELEE (All) KO over 1,500 enemies!"),
            ]),
        );
        graph.set_rule_if_progress(
            progress,
            "In one match, complete both Dragoon and Hydra!",
            Rule::All(vec![
                Rule::location("Unlock Hydra Parts X, Y, and Z on the Checklist!"),
                Rule::location("Unlock Dragoon Parts A, B, and C on the Checklist!"),
            ]),
        );

        Ok(graph)
    }

    fn connect(&mut self, from: &str, to: &str, rule: Rule) {
        self.entrances.push(Entrance {
            from: from.to_string(),
            to: to.to_string(),
            rule,
        });
    }

    fn set_rule_if_progress(&mut self, progress: &BTreeSet<String>, location: &str, rule: Rule) {
        if progress.contains(location) {
            self.location_rules.insert(location.to_string(), rule);
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn locations_in(&self, region: &str) -> &[String] {
        self.regions.get(region).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn entrances(&self) -> &[Entrance] {
        &self.entrances
    }

    pub fn location_rule(&self, location: &str) -> Option<&Rule> {
        self.location_rules.get(location)
    }

    /// Grow the reachable set until no entrance or location rule opens anything new
    pub fn reachability(&self) -> Reachability {
        let mut reach = Reachability::default();
        reach.regions.insert(self.origin.clone());

        loop {
            let mut changed = false;

            for entrance in &self.entrances {
                if reach.regions.contains(&entrance.from)
                    && !reach.regions.contains(&entrance.to)
                    && entrance.rule.is_satisfied(&reach.locations)
                {
                    reach.regions.insert(entrance.to.clone());
                    changed = true;
                }
            }

            for region in &reach.regions.clone() {
                for location in self.locations_in(region) {
                    if reach.locations.contains(location) {
                        continue;
                    }
                    let open = self
                        .location_rules
                        .get(location)
                        .is_none_or(|rule| rule.is_satisfied(&reach.locations));
                    if open {
                        reach.locations.insert(location.clone());
                        changed = true;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        debug!(
            "Reachable: {} regions, {} locations",
            reach.regions.len(),
            reach.locations.len()
        );
        reach
    }

    /// Generation-time completion condition for the chosen goal
    pub fn completion(&self, options: &KarOptions) -> Completion {
        match options.goal.location() {
            Some(location) => Completion::Location(location.to_string()),
            None if self.locations_in(CITY_TRIAL).len() >= options.checklist_amount as usize => {
                Completion::Region(CITY_TRIAL.to_string())
            }
            None => Completion::Unset,
        }
    }

    pub fn is_beatable(&self, options: &KarOptions) -> bool {
        self.reachability().satisfies(&self.completion(options))
    }
}
