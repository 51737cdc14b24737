use std::collections::BTreeSet;

/// Location ids seen satisfied at least once, and which of them the session has heard about.
///
/// Only grows until cleared: a box that reads locked again later (e.g. after
/// loading another save) stays counted.
#[derive(Debug, Default)]
pub struct ChecklistTracker {
    satisfied: BTreeSet<i64>,
    reported: BTreeSet<i64>,
}

impl ChecklistTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, code: i64) {
        self.satisfied.insert(code);
    }

    pub fn contains(&self, code: i64) -> bool {
        self.satisfied.contains(&code)
    }

    pub fn count(&self) -> usize {
        self.satisfied.len()
    }

    /// Satisfied ids not yet reported, in ascending order
    pub fn unreported(&self) -> Vec<i64> {
        self.satisfied
            .difference(&self.reported)
            .copied()
            .collect()
    }

    pub fn mark_reported(&mut self, codes: &[i64]) {
        self.reported.extend(codes.iter().copied());
    }

    pub fn clear(&mut self) {
        self.satisfied.clear();
        self.reported.clear();
    }
}
