use serde::{Deserialize, Serialize};

use super::{Goal, KarOptions};

/// The slice of slot data the client acts on. Unknown keys are ignored and
/// missing keys fall back to the option defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotData {
    #[serde(default)]
    pub goal: Goal,
    #[serde(default = "default_checklist_amount")]
    pub checklist_amount: u32,
    #[serde(default, with = "super::options::toggle")]
    pub death_link: bool,
}

fn default_checklist_amount() -> u32 {
    KarOptions::default().checklist_amount
}

impl Default for SlotData {
    fn default() -> Self {
        Self::from(&KarOptions::default())
    }
}

impl From<&KarOptions> for SlotData {
    fn from(options: &KarOptions) -> Self {
        Self {
            goal: options.goal.clone(),
            checklist_amount: options.checklist_amount,
            death_link: options.death_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_slot_data() {
        let slot: SlotData = serde_json::from_str(r#"{"death_link": 1, "energy_link": 0}"#).unwrap();
        assert!(slot.death_link);
        assert_eq!(slot.goal, Goal::HundredChecklistBoxes);
        assert_eq!(slot.checklist_amount, 100);
    }

    #[test]
    fn test_custom_goal() {
        let slot: SlotData =
            serde_json::from_str(r#"{"goal": "City Trial: Win a match!", "death_link": false}"#).unwrap();
        assert_eq!(slot.goal.location(), Some("City Trial: Win a match!"));
        assert!(!slot.death_link);
    }
}
