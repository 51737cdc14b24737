//! Dolphin emulator backend.
//!
//! Finds a running Dolphin process and the host mapping of its emulated RAM,
//! then translates console addresses (`0x8000_0000`-based) into reads and
//! writes against that mapping.

#[cfg(target_os = "linux")]
mod proc_linux;
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
mod unsupported;
#[cfg(target_os = "windows")]
mod win32;

#[cfg(target_os = "linux")]
use proc_linux as platform;
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
use unsupported as platform;
#[cfg(target_os = "windows")]
use win32 as platform;

use tracing::{debug, info};

use super::MemoryBackend;
use super::layout::ram;
use crate::error::{Error, Result};

/// Backend attached to Dolphin's emulated MEM1
#[derive(Default)]
pub struct DolphinBackend {
    process: Option<platform::EmulatorProcess>,
}

impl DolphinBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// PID of the attached Dolphin process
    pub fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(|p| p.pid())
    }

    fn host_address(process: &platform::EmulatorProcess, address: u32, len: usize) -> Result<u64> {
        if !ram::contains(address, len) {
            return Err(Error::InvalidAddress { address, len });
        }
        Ok(process.ram_base() + u64::from(address - ram::MEM1_START))
    }
}

impl MemoryBackend for DolphinBackend {
    fn attach(&mut self) -> Result<()> {
        if self.process.is_some() {
            return Ok(());
        }

        let process = platform::EmulatorProcess::open()?;
        info!(
            "Attached to Dolphin (pid: {}, emulated RAM: {:#x})",
            process.pid(),
            process.ram_base()
        );
        self.process = Some(process);
        Ok(())
    }

    fn detach(&mut self) {
        if let Some(process) = self.process.take() {
            debug!("Detached from Dolphin (pid: {})", process.pid());
        }
    }

    fn is_attached(&self) -> bool {
        self.process.is_some()
    }

    fn read_bytes(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        let process = self.process.as_ref().ok_or(Error::NotAttached)?;
        let host = Self::host_address(process, address, len)?;

        let mut buffer = vec![0u8; len];
        if let Err(e) = process.read(host, &mut buffer) {
            // The emulator has most likely exited
            self.process = None;
            return Err(Error::MemoryReadFailed {
                address,
                message: e.to_string(),
            });
        }
        Ok(buffer)
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        let process = self.process.as_ref().ok_or(Error::NotAttached)?;
        let host = Self::host_address(process, address, data.len())?;

        process
            .write(host, data)
            .map_err(|e| Error::MemoryWriteFailed {
                address,
                message: e.to_string(),
            })
    }
}
