//! Majority vote over independently resolved pointer chains.
//!
//! Redundant chains that land on the same address are the evidence that the
//! address is correct. The vote runs over addresses; the value is re-read
//! at the winner so the reported value is fresh.

use tracing::debug;

use crate::chain::ResolvedAddress;
use crate::error::{Error, Result};
use crate::memory::ReadMemory;

/// The address and value most chains agreed on in one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StabilizedResult {
    pub winning_address: u64,
    pub value: i32,
    /// Number of chains that resolved to `winning_address`
    pub agreement_count: usize,
    /// Number of chains that resolved to a readable address
    pub total_resolved: usize,
}

impl StabilizedResult {
    /// Agreement ratio as shown to the user, e.g. `2/3`
    pub fn ratio(&self) -> String {
        format!("{}/{}", self.agreement_count, self.total_resolved)
    }
}

/// Pick the address most chains agree on and confirm its value.
///
/// Only addresses whose value can be read take part in the vote. Ties go to
/// the address that appeared first in definition order.
pub fn aggregate<R: ReadMemory + ?Sized>(
    resolved: &[ResolvedAddress],
    memory: &R,
) -> Result<StabilizedResult> {
    // (address, count) in order of first appearance
    let mut tally: Vec<(u64, usize)> = Vec::new();
    let mut total_resolved = 0;

    for entry in resolved {
        let Some(address) = entry.address else {
            continue;
        };

        if let Err(e) = memory.read_i32(address) {
            debug!(
                "Chain #{} value unreadable at {:#x}: {}",
                entry.definition_index, address, e
            );
            continue;
        }

        total_resolved += 1;
        match tally.iter_mut().find(|(a, _)| *a == address) {
            Some((_, count)) => *count += 1,
            None => tally.push((address, 1)),
        }
    }

    let mut winner: Option<(u64, usize)> = None;
    for &(address, count) in &tally {
        if winner.is_none_or(|(_, best)| count > best) {
            winner = Some((address, count));
        }
    }
    let (winning_address, agreement_count) = winner.ok_or(Error::NoConsensus)?;

    let value = memory
        .read_i32(winning_address)
        .map_err(|_| Error::StabilizationRead {
            address: winning_address,
        })?;

    debug!(
        "Stabilized on {:#x} = {} ({}/{})",
        winning_address, value, agreement_count, total_resolved
    );

    Ok(StabilizedResult {
        winning_address,
        value,
        agreement_count,
        total_resolved,
    })
}
