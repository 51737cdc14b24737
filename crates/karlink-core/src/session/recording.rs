//! Session double for tests.

use super::SessionLink;
use crate::error::{Error, Result};

/// Keeps every outbound notice in order
#[derive(Debug, Default)]
pub struct RecordingSession {
    pub reports: Vec<Vec<i64>>,
    pub goals: usize,
    pub deaths: Vec<String>,
    pub fail: bool,
}

impl RecordingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reported(&self) -> Vec<i64> {
        self.reports.iter().flatten().copied().collect()
    }

    fn check(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Io(std::io::Error::other("session unavailable")));
        }
        Ok(())
    }
}

impl SessionLink for RecordingSession {
    fn report_locations(&mut self, locations: &[i64]) -> Result<()> {
        self.check()?;
        self.reports.push(locations.to_vec());
        Ok(())
    }

    fn send_goal(&mut self) -> Result<()> {
        self.check()?;
        self.goals += 1;
        Ok(())
    }

    fn send_death(&mut self, message: &str) -> Result<()> {
        self.check()?;
        self.deaths.push(message.to_string());
        Ok(())
    }
}
