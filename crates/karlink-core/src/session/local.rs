use std::collections::BTreeSet;

use tracing::{info, warn};

use super::{SessionLink, SessionLog};
use crate::error::Result;
use crate::world::LocationTable;

/// Offline session: every notice is logged and written to the transcript
pub struct LocalSession {
    log: Option<SessionLog>,
    locations: LocationTable,
    reported: BTreeSet<i64>,
    goal_sent: bool,
    deaths: usize,
}

impl LocalSession {
    pub fn new(locations: LocationTable) -> Self {
        Self {
            log: None,
            locations,
            reported: BTreeSet::new(),
            goal_sent: false,
            deaths: 0,
        }
    }

    pub fn with_log(mut self, log: SessionLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn reported(&self) -> &BTreeSet<i64> {
        &self.reported
    }

    pub fn goal_sent(&self) -> bool {
        self.goal_sent
    }

    pub fn deaths(&self) -> usize {
        self.deaths
    }

    fn record(&self, kind: &str, detail: &str) {
        if let Some(log) = &self.log
            && let Err(e) = log.record(kind, detail)
        {
            warn!("Failed to write session transcript: {}", e);
        }
    }

    fn location_name(&self, code: i64) -> &str {
        self.locations
            .by_code(code)
            .map(|l| l.name.as_str())
            .unwrap_or("Unknown location")
    }
}

impl SessionLink for LocalSession {
    fn report_locations(&mut self, locations: &[i64]) -> Result<()> {
        for &code in locations {
            if !self.reported.insert(code) {
                continue;
            }
            let name = self.location_name(code);
            info!("Checked location: {} ({})", name, code);
            self.record("location", &format!("{} ({})", name, code));
        }
        Ok(())
    }

    fn send_goal(&mut self) -> Result<()> {
        if !self.goal_sent {
            self.goal_sent = true;
            info!("Goal complete!");
            self.record("goal", "complete");
        }
        Ok(())
    }

    fn send_death(&mut self, message: &str) -> Result<()> {
        self.deaths += 1;
        info!("Death sent: {}", message);
        self.record("death", message);
        Ok(())
    }
}
