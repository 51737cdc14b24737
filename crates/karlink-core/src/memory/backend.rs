use crate::error::Result;

/// Raw access to the emulated console's address space.
///
/// Addresses are console addresses (`0x8000_0000`-based). Implementations
/// report every failure as an error; turning failures into defaults is the
/// job of [`GameMemory`](super::GameMemory).
pub trait MemoryBackend {
    /// Attach to the emulator. Succeeds without doing anything when already attached.
    fn attach(&mut self) -> Result<()>;

    /// Release the emulator. Safe to call when not attached.
    fn detach(&mut self);

    fn is_attached(&self) -> bool;

    fn read_bytes(&mut self, address: u32, len: usize) -> Result<Vec<u8>>;

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()>;
}

impl<B: MemoryBackend + ?Sized> MemoryBackend for Box<B> {
    fn attach(&mut self) -> Result<()> {
        (**self).attach()
    }

    fn detach(&mut self) {
        (**self).detach()
    }

    fn is_attached(&self) -> bool {
        (**self).is_attached()
    }

    fn read_bytes(&mut self, address: u32, len: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, len)
    }

    fn write_bytes(&mut self, address: u32, data: &[u8]) -> Result<()> {
        (**self).write_bytes(address, data)
    }
}

/// An address reached through one pointer hop plus a fixed offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerAddress {
    /// Address holding a big-endian console pointer
    pub base: u32,
    /// Byte offset applied to the pointer's target
    pub offset: u32,
}

impl PointerAddress {
    pub const fn new(base: u32, offset: u32) -> Self {
        Self { base, offset }
    }
}

impl std::fmt::Display for PointerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}+{:#x}", self.base, self.offset)
    }
}
