//! Client configuration file (`karlink.toml`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::link::LinkConfig;
use crate::memory::layout::timing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Checklist location table (JSON)
    pub locations: PathBuf,
    /// Where session transcripts are written
    pub session_dir: PathBuf,
    /// Name used in outgoing death notices when playing offline
    pub player_name: String,
    /// Overrides the slot's death link setting when present
    pub death_link: Option<bool>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            locations: PathBuf::from("locations.json"),
            session_dir: PathBuf::from("sessions"),
            player_name: "Player".to_string(),
            death_link: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub poll_ms: u64,
    pub reconnect_secs: u64,
    pub debounce_secs: u64,
    pub death_cooldown_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_ms: timing::POLL_TIMEOUT.as_millis() as u64,
            reconnect_secs: timing::RECONNECT_DELAY.as_secs(),
            debounce_secs: timing::TRANSITION_DEBOUNCE.as_secs(),
            death_cooldown_secs: timing::DEATH_COOLDOWN.as_secs(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn link_config(&self) -> LinkConfig {
        let mut builder = LinkConfig::builder()
            .poll_timeout(Duration::from_millis(self.timing.poll_ms))
            .reconnect_delay(Duration::from_secs(self.timing.reconnect_secs))
            .debounce(Duration::from_secs(self.timing.debounce_secs))
            .death_cooldown(Duration::from_secs(self.timing.death_cooldown_secs));
        if let Some(enabled) = self.client.death_link {
            builder = builder.death_link(enabled);
        }
        builder.build()
    }
}
