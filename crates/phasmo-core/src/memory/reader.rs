use crate::error::{Error, Result};

/// Read-only view of a foreign address space.
///
/// Every read is independently fallible: pages may be unmapped or protected,
/// and the target may exit between two reads.
pub trait ReadMemory {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Read a little-endian 64-bit pointer value
    fn read_u64(&self, address: u64) -> Result<u64> {
        let bytes = self.read_bytes(address, 8)?;
        let bytes: [u8; 8] = bytes.as_slice().try_into().map_err(|_| {
            Error::read_failed(address, format!("short read: {} of 8 bytes", bytes.len()))
        })?;
        Ok(u64::from_le_bytes(bytes))
    }

    /// Read a little-endian signed 32-bit value
    fn read_i32(&self, address: u64) -> Result<i32> {
        let bytes = self.read_bytes(address, 4)?;
        let bytes: [u8; 4] = bytes.as_slice().try_into().map_err(|_| {
            Error::read_failed(address, format!("short read: {} of 4 bytes", bytes.len()))
        })?;
        Ok(i32::from_le_bytes(bytes))
    }
}

/// A [`ReadMemory`] that can also locate loaded modules.
pub trait ProcessMemory: ReadMemory {
    /// Load address of the named module, compared case-insensitively.
    fn module_base_address(&self, name: &str) -> Result<u64>;
}
