//! In-memory address space for tests.

use std::cell::RefCell;
use std::collections::HashMap;

use super::{ProcessMemory, ReadMemory};
use crate::error::{Error, Result};

/// Sparse memory image: only bytes written through the builder are readable.
#[derive(Debug, Default)]
pub struct MockMemoryReader {
    bytes: HashMap<u64, u8>,
    modules: HashMap<String, u64>,
    /// Remaining successful reads per start address
    read_budget: RefCell<HashMap<u64, usize>>,
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        if let Some(remaining) = self.read_budget.borrow_mut().get_mut(&address) {
            if *remaining == 0 {
                return Err(Error::read_failed(address, "read budget exhausted"));
            }
            *remaining -= 1;
        }

        (0..size as u64)
            .map(|i| {
                address
                    .checked_add(i)
                    .and_then(|a| self.bytes.get(&a).copied())
                    .ok_or_else(|| Error::read_failed(address, "unmapped"))
            })
            .collect()
    }
}

impl ProcessMemory for MockMemoryReader {
    fn module_base_address(&self, name: &str) -> Result<u64> {
        self.modules
            .get(&name.to_lowercase())
            .copied()
            .ok_or_else(|| Error::ModuleNotFound(name.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct MockMemoryBuilder {
    reader: MockMemoryReader,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(mut self, name: &str, base: u64) -> Self {
        self.reader.modules.insert(name.to_lowercase(), base);
        self
    }

    pub fn write_bytes(mut self, address: u64, data: &[u8]) -> Self {
        for (i, byte) in data.iter().enumerate() {
            self.reader.bytes.insert(address + i as u64, *byte);
        }
        self
    }

    pub fn write_u64(self, address: u64, value: u64) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_i32(self, address: u64, value: i32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    /// Allow only `count` successful reads starting at `address`.
    pub fn read_limit(self, address: u64, count: usize) -> Self {
        self.reader.read_budget.borrow_mut().insert(address, count);
        self
    }

    pub fn build(self) -> MockMemoryReader {
        self.reader
    }
}
