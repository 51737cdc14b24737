//! Typed, non-failing access to emulator memory.
//!
//! Every read returns a zero value and every write returns `false` when the
//! underlying backend fails, so game logic never has to handle I/O errors.
//! Failures are logged with the operation kind, address and cause.

use tracing::warn;

use super::layout::ram;
use super::{MemoryBackend, PointerAddress};
use crate::error::{Error, Result};

pub struct GameMemory<B> {
    backend: B,
}

impl<B: MemoryBackend> GameMemory<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn attach(&mut self) -> Result<()> {
        self.backend.attach()
    }

    pub fn detach(&mut self) {
        self.backend.detach()
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_attached()
    }

    pub fn read_byte(&mut self, address: u32) -> u8 {
        match self.read_array::<1>(address) {
            Ok(bytes) => bytes[0],
            Err(e) => {
                log_read_failure("byte", address, &e);
                0
            }
        }
    }

    /// Read a big-endian 2-byte value
    pub fn read_short(&mut self, address: u32) -> u16 {
        match self.read_array::<2>(address) {
            Ok(bytes) => u16::from_be_bytes(bytes),
            Err(e) => {
                log_read_failure("short", address, &e);
                0
            }
        }
    }

    /// Read a big-endian IEEE-754 single
    pub fn read_float(&mut self, address: u32) -> f32 {
        match self.read_array::<4>(address) {
            Ok(bytes) => f32::from_be_bytes(bytes),
            Err(e) => {
                log_read_failure("float", address, &e);
                0.0
            }
        }
    }

    pub fn read_bytes(&mut self, address: u32, len: usize) -> Vec<u8> {
        match self.backend.read_bytes(address, len) {
            Ok(bytes) if bytes.len() == len => bytes,
            Ok(bytes) => {
                warn!(
                    "Failed to read {} bytes at {:#x}: short read of {} bytes",
                    len,
                    address,
                    bytes.len()
                );
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read {} bytes at {:#x}: {}", len, address, e);
                Vec::new()
            }
        }
    }

    pub fn write_byte(&mut self, address: u32, value: u8) -> bool {
        self.write_logged("byte", address, &[value])
    }

    pub fn write_short(&mut self, address: u32, value: u16) -> bool {
        self.write_logged("short", address, &value.to_be_bytes())
    }

    pub fn write_float(&mut self, address: u32, value: f32) -> bool {
        self.write_logged("float", address, &value.to_be_bytes())
    }

    pub fn write_bytes(&mut self, address: u32, data: &[u8]) -> bool {
        self.write_logged("bytes", address, data)
    }

    /// Follow the pointer at `pointer.base`, then read `len` bytes at the target plus offset.
    pub fn read_pointer_bytes(&mut self, pointer: PointerAddress, len: usize) -> Vec<u8> {
        let result = self
            .resolve_pointer(pointer)
            .and_then(|address| self.backend.read_bytes(address, len));
        match result {
            Ok(bytes) if bytes.len() == len => bytes,
            Ok(_) => {
                warn!("Failed to read pointer at {}: short read", pointer);
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read pointer at {}: {}", pointer, e);
                Vec::new()
            }
        }
    }

    pub fn read_pointer_float(&mut self, pointer: PointerAddress) -> f32 {
        let result = self
            .resolve_pointer(pointer)
            .and_then(|address| self.read_array::<4>(address));
        match result {
            Ok(bytes) => f32::from_be_bytes(bytes),
            Err(e) => {
                warn!("Failed to read pointer float at {}: {}", pointer, e);
                0.0
            }
        }
    }

    pub fn write_pointer_byte(&mut self, pointer: PointerAddress, value: u8) -> bool {
        self.write_pointer("pointer byte", pointer, &[value])
    }

    pub fn write_pointer_float(&mut self, pointer: PointerAddress, value: f32) -> bool {
        self.write_pointer("pointer float", pointer, &value.to_be_bytes())
    }

    /// Resolve one level of indirection and apply the offset
    fn resolve_pointer(&mut self, pointer: PointerAddress) -> Result<u32> {
        let raw = u32::from_be_bytes(self.read_array::<4>(pointer.base)?);
        let target = raw.wrapping_add(pointer.offset);
        if raw == 0 || !ram::contains(target, 1) {
            return Err(Error::InvalidAddress {
                address: target,
                len: 1,
            });
        }
        Ok(target)
    }

    fn read_array<const N: usize>(&mut self, address: u32) -> Result<[u8; N]> {
        let bytes = self.backend.read_bytes(address, N)?;
        <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| Error::MemoryReadFailed {
            address,
            message: format!("expected {} bytes, got {}", N, bytes.len()),
        })
    }

    fn write_logged(&mut self, kind: &str, address: u32, data: &[u8]) -> bool {
        match self.backend.write_bytes(address, data) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write {} at {:#x}: {}", kind, address, e);
                false
            }
        }
    }

    fn write_pointer(&mut self, kind: &str, pointer: PointerAddress, data: &[u8]) -> bool {
        let result = self
            .resolve_pointer(pointer)
            .and_then(|address| self.backend.write_bytes(address, data));
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to write {} at {}: {}", kind, pointer, e);
                false
            }
        }
    }
}

fn log_read_failure(kind: &str, address: u32, error: &Error) {
    warn!("Failed to read {} at {:#x}: {}", kind, address, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockBackend;

    fn attached() -> GameMemory<MockBackend> {
        let mut memory = GameMemory::new(MockBackend::new());
        memory.attach().unwrap();
        memory
    }

    #[test]
    fn test_detached_reads_return_defaults() {
        let mut memory = GameMemory::new(MockBackend::new());
        assert!(!memory.is_attached());

        for _ in 0..3 {
            assert_eq!(memory.read_byte(0x8000_0000), 0);
            assert_eq!(memory.read_short(0x8053_5A0C), 0);
            assert_eq!(memory.read_float(0x8055_AA24), 0.0);
            assert!(memory.read_bytes(0x8000_0000, 6).is_empty());
            assert!(
                memory
                    .read_pointer_bytes(PointerAddress::new(0x8055_AA30, 0xA78), 4)
                    .is_empty()
            );
            assert_eq!(
                memory.read_pointer_float(PointerAddress::new(0x8055_AA30, 0xA78)),
                0.0
            );
        }
    }

    #[test]
    fn test_detached_writes_return_false() {
        let mut memory = GameMemory::new(MockBackend::new());
        assert!(!memory.write_byte(0x8000_0000, 1));
        assert!(!memory.write_short(0x8000_0000, 1));
        assert!(!memory.write_float(0x8000_0000, 1.0));
        assert!(!memory.write_pointer_float(PointerAddress::new(0x8055_AA30, 0xA78), 1.0));
    }

    #[test]
    fn test_big_endian_round_trip() {
        let mut memory = attached();

        assert!(memory.write_short(0x8053_5A0C, 0x0200));
        assert_eq!(memory.read_bytes(0x8053_5A0C, 2), vec![0x02, 0x00]);
        assert_eq!(memory.read_short(0x8053_5A0C), 0x0200);

        assert!(memory.write_float(0x8157_8630, -2.0));
        assert_eq!(memory.read_bytes(0x8157_8630, 4), (-2.0f32).to_be_bytes());
        assert_eq!(memory.read_float(0x8157_8630), -2.0);
    }

    #[test]
    fn test_out_of_range_address_defaults() {
        let mut memory = attached();
        assert_eq!(memory.read_float(0x9000_0000), 0.0);
        assert!(!memory.write_float(0x9000_0000, 1.0));
    }

    #[test]
    fn test_pointer_write_follows_indirection() {
        let mut memory = attached();
        let pointer = PointerAddress::new(0x8055_AA30, 0xA78);
        memory.backend_mut().set_u32(0x8055_AA30, 0x8120_0000);

        assert!(memory.write_pointer_float(pointer, 1.0));
        assert_eq!(memory.read_float(0x8120_0A78), 1.0);
        assert_eq!(memory.read_pointer_float(pointer), 1.0);
        assert_eq!(memory.read_pointer_bytes(pointer, 4), 1.0f32.to_be_bytes());

        assert!(memory.write_pointer_byte(pointer, 0x7F));
        assert_eq!(memory.read_byte(0x8120_0A78), 0x7F);
    }

    #[test]
    fn test_null_pointer_is_a_failure() {
        let mut memory = attached();
        let pointer = PointerAddress::new(0x8055_AA30, 0xA78);

        assert!(!memory.write_pointer_float(pointer, 1.0));
        assert_eq!(memory.read_pointer_float(pointer), 0.0);
        // Nothing was written at the offset from address zero
        assert_eq!(memory.read_float(0x8000_0A78), 0.0);
    }
}
