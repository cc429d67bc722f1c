use crate::error::Result;
use crate::process::bridge;

/// Trait for reading memory out of a remote process or buffer.
///
/// This is the mocking seam: everything downstream of process discovery
/// (scanner, pointer walker) works against it, so tests can run on
/// in-memory snapshots instead of a live process.
pub trait ReadMemory {
    /// Fill `buf` from the remote address space starting at `address`.
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<()>;

    /// Read an unsigned 32-bit little-endian integer.
    fn read_u32(&self, address: u64) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_into(address, &mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a signed 32-bit little-endian integer.
    fn read_i32(&self, address: u64) -> Result<i32> {
        let mut bytes = [0u8; 4];
        self.read_into(address, &mut bytes)?;
        Ok(i32::from_le_bytes(bytes))
    }
}

/// Memory of a live process, addressed by PID.
pub struct ProcessMemory {
    pid: i32,
}

impl ProcessMemory {
    pub fn new(pid: i32) -> Self {
        Self { pid }
    }
}

impl ReadMemory for ProcessMemory {
    fn read_into(&self, address: u64, buf: &mut [u8]) -> Result<()> {
        bridge::read_process_memory(self.pid, address, buf)
    }
}
