use std::io;

use crate::error::{Error, Result};

pub struct EmulatorProcess {
    pid: u32,
    ram_base: u64,
}

impl EmulatorProcess {
    pub fn open() -> Result<Self> {
        Err(Error::ProcessNotFound(format!(
            "Dolphin attach is not supported on {}",
            std::env::consts::OS
        )))
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn ram_base(&self) -> u64 {
        self.ram_base
    }

    pub fn read(&self, _host_address: u64, _buffer: &mut [u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }

    pub fn write(&self, _host_address: u64, _data: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
