//! Windows: Dolphin maps emulated RAM as a 32 MiB `MEM_MAPPED` region.

use std::ffi::c_void;
use std::io;
use std::mem::size_of;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW,
    TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Memory::{MEM_MAPPED, MEMORY_BASIC_INFORMATION, VirtualQueryEx};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_QUERY_INFORMATION, PROCESS_VM_OPERATION, PROCESS_VM_READ,
    PROCESS_VM_WRITE,
};

use crate::error::{Error, Result};
use crate::memory::layout::ram;

const PROCESS_NAMES: [&str; 3] = ["Dolphin.exe", "DolphinQt2.exe", "DolphinWx.exe"];

pub struct EmulatorProcess {
    pid: u32,
    ram_base: u64,
    handle: HANDLE,
}

impl EmulatorProcess {
    pub fn open() -> Result<Self> {
        let pid = find_dolphin_pid()?;

        // SAFETY: OpenProcess has no memory-safety preconditions; the handle is closed on drop.
        let handle = unsafe {
            OpenProcess(
                PROCESS_VM_READ | PROCESS_VM_WRITE | PROCESS_VM_OPERATION | PROCESS_QUERY_INFORMATION,
                false,
                pid,
            )
        }
        .map_err(|e| Error::ProcessNotFound(format!("failed to open pid {}: {}", pid, e)))?;

        let mut process = Self {
            pid,
            ram_base: 0,
            handle,
        };
        process.ram_base = process
            .find_ram_region()
            .ok_or(Error::EmulatedRamNotFound(pid))?;

        Ok(process)
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn ram_base(&self) -> u64 {
        self.ram_base
    }

    pub fn read(&self, host_address: u64, buffer: &mut [u8]) -> io::Result<()> {
        let mut read = 0usize;
        // SAFETY: the buffer is valid for `buffer.len()` bytes of writes.
        unsafe {
            ReadProcessMemory(
                self.handle,
                host_address as *const c_void,
                buffer.as_mut_ptr().cast(),
                buffer.len(),
                Some(&mut read),
            )
        }
        .map_err(io::Error::other)?;

        if read != buffer.len() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read {} of {} bytes", read, buffer.len()),
            ));
        }
        Ok(())
    }

    pub fn write(&self, host_address: u64, data: &[u8]) -> io::Result<()> {
        let mut written = 0usize;
        // SAFETY: the source buffer is valid for `data.len()` bytes of reads.
        unsafe {
            WriteProcessMemory(
                self.handle,
                host_address as *const c_void,
                data.as_ptr().cast(),
                data.len(),
                Some(&mut written),
            )
        }
        .map_err(io::Error::other)?;

        if written != data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {} of {} bytes", written, data.len()),
            ));
        }
        Ok(())
    }

    /// Walk the address space for the emulated RAM mapping
    fn find_ram_region(&self) -> Option<u64> {
        let mut address = 0usize;
        loop {
            let mut info = MEMORY_BASIC_INFORMATION::default();
            // SAFETY: `info` is a valid out-pointer of the size passed.
            let size = unsafe {
                VirtualQueryEx(
                    self.handle,
                    Some(address as *const c_void),
                    &mut info,
                    size_of::<MEMORY_BASIC_INFORMATION>(),
                )
            };
            if size == 0 {
                return None;
            }

            if info.Type == MEM_MAPPED && info.RegionSize == ram::HOST_MAPPING_SIZE {
                debug!("Emulated RAM region at {:p}", info.BaseAddress);
                return Some(info.BaseAddress as u64);
            }

            address = (info.BaseAddress as usize).checked_add(info.RegionSize)?;
        }
    }
}

impl Drop for EmulatorProcess {
    fn drop(&mut self) {
        // SAFETY: the handle was returned by OpenProcess and is closed exactly once.
        let _ = unsafe { CloseHandle(self.handle) };
    }
}

fn find_dolphin_pid() -> Result<u32> {
    // SAFETY: snapshot handle is closed before returning.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
        .map_err(|e| Error::ProcessNotFound(format!("process snapshot failed: {}", e)))?;

    let mut entry = PROCESSENTRY32W {
        dwSize: size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    let mut found = None;
    // SAFETY: `entry` is initialised with its size as the API requires.
    let mut ok = unsafe { Process32FirstW(snapshot, &mut entry) }.is_ok();
    while ok {
        let len = entry
            .szExeFile
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(entry.szExeFile.len());
        let name = String::from_utf16_lossy(&entry.szExeFile[..len]);
        if PROCESS_NAMES.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
            debug!("Found Dolphin process: {} ({})", name, entry.th32ProcessID);
            found = Some(entry.th32ProcessID);
            break;
        }
        // SAFETY: same entry, same snapshot.
        ok = unsafe { Process32NextW(snapshot, &mut entry) }.is_ok();
    }

    // SAFETY: snapshot was returned by CreateToolhelp32Snapshot.
    let _ = unsafe { CloseHandle(snapshot) };

    found.ok_or_else(|| Error::ProcessNotFound(PROCESS_NAMES.join(", ")))
}
