//! Linux: Dolphin backs emulated RAM with a `/dev/shm/dolphin-emu*` file.
//! The mapping is located through `/proc/<pid>/maps` and accessed through
//! `/proc/<pid>/mem`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::os::unix::fs::FileExt;

use tracing::debug;

use crate::error::{Error, Result};
use crate::memory::layout::ram;

const PROCESS_NAME_PREFIX: &str = "dolphin-emu";
const SHM_PREFIX: &str = "/dev/shm/dolphin-emu";

pub struct EmulatorProcess {
    pid: u32,
    ram_base: u64,
    mem: File,
}

impl EmulatorProcess {
    pub fn open() -> Result<Self> {
        let pid = find_dolphin_pid()?;
        let maps = fs::read_to_string(format!("/proc/{}/maps", pid))?;
        let ram_base = find_ram_mapping(&maps).ok_or(Error::EmulatedRamNotFound(pid))?;
        let mem = OpenOptions::new()
            .read(true)
            .write(true)
            .open(format!("/proc/{}/mem", pid))?;

        Ok(Self { pid, ram_base, mem })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn ram_base(&self) -> u64 {
        self.ram_base
    }

    pub fn read(&self, host_address: u64, buffer: &mut [u8]) -> io::Result<()> {
        self.mem.read_exact_at(buffer, host_address)
    }

    pub fn write(&self, host_address: u64, data: &[u8]) -> io::Result<()> {
        self.mem.write_all_at(data, host_address)
    }
}

fn find_dolphin_pid() -> Result<u32> {
    for entry in fs::read_dir("/proc")? {
        let Ok(entry) = entry else { continue };
        let Some(pid) = entry.file_name().to_str().and_then(|s| s.parse::<u32>().ok()) else {
            continue;
        };
        let Ok(comm) = fs::read_to_string(entry.path().join("comm")) else {
            continue;
        };
        if comm.trim().starts_with(PROCESS_NAME_PREFIX) {
            debug!("Found Dolphin process: {} ({})", comm.trim(), pid);
            return Ok(pid);
        }
    }
    Err(Error::ProcessNotFound(PROCESS_NAME_PREFIX.to_string()))
}

/// Find the start of the emulated RAM view in a `/proc/<pid>/maps` listing.
///
/// Prefers a mapping of the shared-memory file at offset zero with the exact
/// emulated RAM size, falling back to any offset-zero mapping of that file.
fn find_ram_mapping(maps: &str) -> Option<u64> {
    let mut fallback = None;

    for line in maps.lines() {
        let mut fields = line.split_whitespace();
        let (Some(range), Some(_perms), Some(offset), Some(_dev), Some(_inode), Some(path)) = (
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
            fields.next(),
        ) else {
            continue;
        };

        if !path.starts_with(SHM_PREFIX) || u64::from_str_radix(offset, 16) != Ok(0) {
            continue;
        }

        let Some((start, end)) = range.split_once('-') else {
            continue;
        };
        let (Ok(start), Ok(end)) = (u64::from_str_radix(start, 16), u64::from_str_radix(end, 16))
        else {
            continue;
        };

        if end - start == ram::HOST_MAPPING_SIZE as u64 {
            return Some(start);
        }
        fallback.get_or_insert(start);
    }

    fallback
}
