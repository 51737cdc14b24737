use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Emulated RAM not found in process {0}")]
    EmulatedRamNotFound(u32),

    #[error("Not attached to the emulator")]
    NotAttached,

    #[error("Address {address:#x} (+{len} bytes) is outside emulated RAM")]
    InvalidAddress { address: u32, len: usize },

    #[error("Failed to read emulator memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u32, message: String },

    #[error("Failed to write emulator memory at address {address:#x}: {message}")]
    MemoryWriteFailed { address: u32, message: String },

    #[error("Invalid option: {0}")]
    InvalidOption(String),

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error(
        "There are insufficient locations to place progression items! \
         Trying to place {items} items in only {locations} locations."
    )]
    InsufficientLocations { items: usize, locations: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
