//! In-memory backend for tests.

use std::collections::HashMap;

use super::MemoryBackend;
use super::layout::ram;
use crate::error::{Error, Result};

/// Sparse emulated RAM. Unset bytes read as zero.
#[derive(Debug, Default)]
pub struct MockBackend {
    bytes: HashMap<u32, u8>,
    attached: bool,
    pub refuse_attach: bool,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// Fail only writes that start at this address
    pub fail_write_at: Option<u32>,
    pub attach_calls: usize,
    pub detach_calls: usize,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose RAM already carries the Kirby Air Ride game id
    pub fn with_game_loaded() -> Self {
        let mut backend = Self::new();
        backend.set_bytes(0x8000_0000, b"GKYE01");
        backend
    }

    pub fn set_bytes(&mut self, address: u32, data: &[u8]) {
        for (i, byte) in data.iter().enumerate() {
            self.bytes.insert(address + i as u32, *byte);
        }
    }

    pub fn get_bytes(&self, address: u32, len: usize) -> Vec<u8> {
        (0..len as u32)
            .map(|i| self.bytes.get(&(address + i)).copied().unwrap_or(0))
            .collect()
    }

    pub fn set_u8(&mut self, address: u32, value: u8) {
        self.set_bytes(address, &[value]);
    }

    pub fn set_u16(&mut self, address: u32, value: u16) {
        self.set_bytes(address, &value.to_be_bytes());
    }

    pub fn set_u32(&mut self, address: u32, value: u32) {
        self.set_bytes(address, &value.to_be_bytes());
    }

    pub fn set_f32(&mut self, address: u32, value: f32) {
        self.set_bytes(address, &value.to_be_bytes());
    }

    pub fn get_f32(&self, address: u32) -> f32 {
        let bytes = self.get_bytes(address, 4);
        f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Simulate the emulator going away without the client noticing yet
    pub fn drop_connection(&mut self) {
        self.attached = false;
    }
}

impl MemoryBackend for MockBackend {
    fn attach(&mut self) -> Result<()> {
        self.attach_calls += 1;
        if self.refuse_attach {
            return Err(Error::ProcessNotFound("dolphin".to_string()));
        }
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) {
        self.detach_calls += 1;
        self.attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn read_bytes(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        if !self.attached {
            return Err(Error::NotAttached);
        }
        if !ram::contains(address, len) {
            return Err(Error::InvalidAddress { address, len });
        }
        if self.fail_reads {
            return Err(Error::MemoryReadFailed {
                address,
                message: "injected failure".to_string(),
            });
        }
        Ok(self.get_bytes(address, len))
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        if !self.attached {
            return Err(Error::NotAttached);
        }
        if !ram::contains(address, data.len()) {
            return Err(Error::InvalidAddress {
                address,
                len: data.len(),
            });
        }
        if self.fail_writes || self.fail_write_at == Some(address) {
            return Err(Error::MemoryWriteFailed {
                address,
                message: "injected failure".to_string(),
            });
        }
        self.set_bytes(address, data);
        Ok(())
    }
}
