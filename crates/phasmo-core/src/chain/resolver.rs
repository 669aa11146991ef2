//! Multi-level pointer resolution.

use tracing::debug;

use super::definition::PointerChainDefinition;
use crate::error::{Error, Result};
use crate::memory::ProcessMemory;

/// Outcome of resolving one definition during a poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub definition_index: usize,
    /// `None` when any step of the chain failed
    pub address: Option<u64>,
}

/// Walk a pointer chain and return the final address.
///
/// The pointer stored at `module + base_offset` is read first, then every
/// offset but the last is added and dereferenced. The last offset is only
/// added: the result points at the value, not at another pointer.
pub fn resolve<M: ProcessMemory + ?Sized>(
    definition: &PointerChainDefinition,
    memory: &M,
) -> Result<u64> {
    let module_base = memory.module_base_address(&definition.module_name)?;
    let base_addr = offset_address(module_base, definition.base_offset)?;
    let mut addr = memory.read_u64(base_addr)?;

    let (last, intermediate) = match definition.offsets.split_last() {
        Some((last, rest)) => (*last, rest),
        None => (0, &[][..]),
    };

    for &offset in intermediate {
        addr = memory.read_u64(offset_address(addr, offset)?)?;
    }

    offset_address(addr, last)
}

/// Resolve every definition, turning failures into `address: None`.
///
/// A chain ending at address zero counts as failed.
pub fn resolve_all<M: ProcessMemory + ?Sized>(
    definitions: &[PointerChainDefinition],
    memory: &M,
) -> Vec<ResolvedAddress> {
    definitions
        .iter()
        .enumerate()
        .map(|(definition_index, definition)| {
            let address = match resolve(definition, memory) {
                Ok(0) => {
                    debug!("Chain #{} ({}) resolved to null", definition_index, definition);
                    None
                }
                Ok(address) => {
                    debug!(
                        "Chain #{} ({}) resolved to {:#x}",
                        definition_index, definition, address
                    );
                    Some(address)
                }
                Err(e) => {
                    debug!("Chain #{} ({}) failed: {}", definition_index, definition, e);
                    None
                }
            };
            ResolvedAddress {
                definition_index,
                address,
            }
        })
        .collect()
}

fn offset_address(address: u64, offset: u64) -> Result<u64> {
    address
        .checked_add(offset)
        .ok_or(Error::AddressOverflow { address, offset })
}
