//! Poll loop controller.
//!
//! Each cycle finds the target process, attaches, resolves every pointer
//! chain, votes on the result and detaches again. The process handle never
//! outlives a cycle.
//!
//! ```text
//! WaitingForTarget --found+attached--> Attached --cycle done--> WaitingForTarget
//!        \__________________ shutdown __________________/--> Stopped
//! ```

mod poll_loop;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::chain::{PointerChainDefinition, resolve_all};
use crate::config::MonitorConfig;
use crate::error::Error;
use crate::memory::{ProcessMemory, ProcessProvider};
use crate::stabilize::{StabilizedResult, aggregate};

/// Granularity of the wait between cycles
pub const WAIT_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    WaitingForTarget,
    Attached,
    Stopped,
}

/// Why a cycle produced no result. Every kind is retried on the next cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleFailure {
    #[error("target process is not running")]
    NoTarget,

    #[error("could not attach to process: {0}")]
    AttachFailed(String),

    #[error("no pointer chain resolved")]
    NoConsensus,

    #[error("value at {address:#x} became unreadable")]
    StabilizationReadFailed { address: u64 },
}

pub type CycleOutcome = std::result::Result<StabilizedResult, CycleFailure>;

/// Receives what the monitor observes; implemented by the display layer.
pub trait CycleReporter {
    fn report(&mut self, outcome: &CycleOutcome);

    /// Called once per wait tick with the time left until the next cycle.
    fn countdown(&mut self, _remaining: Duration) {}
}

pub struct Monitor<P: ProcessProvider> {
    definitions: Vec<PointerChainDefinition>,
    config: MonitorConfig,
    provider: P,
    state: MonitorState,
    tick: Duration,
}

impl<P: ProcessProvider> Monitor<P> {
    pub fn new(definitions: Vec<PointerChainDefinition>, config: MonitorConfig, provider: P) -> Self {
        Self {
            definitions,
            config,
            provider,
            state: MonitorState::WaitingForTarget,
            tick: WAIT_TICK,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one find → attach → resolve → vote → detach cycle.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        self.state = MonitorState::WaitingForTarget;
        let name = &self.config.process_name;

        let pid = match self.provider.find_process(name) {
            Ok(Some(pid)) => pid,
            Ok(None) => {
                debug!("{} is not running", name);
                return Err(CycleFailure::NoTarget);
            }
            Err(e) => {
                warn!("Process lookup failed: {}", e);
                return Err(CycleFailure::NoTarget);
            }
        };

        let handle = match self.provider.attach(pid) {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Could not attach to {} (pid {}): {}", name, pid, e);
                return Err(CycleFailure::AttachFailed(e.to_string()));
            }
        };
        self.state = MonitorState::Attached;
        debug!("Attached to {} (pid {})", name, pid);

        let outcome = stabilize(&self.definitions, &handle);

        drop(handle);
        self.state = MonitorState::WaitingForTarget;

        match &outcome {
            Ok(result) => info!(
                "Value {} at {:#x} ({} hits)",
                result.value,
                result.winning_address,
                result.ratio()
            ),
            Err(failure) => warn!("Cycle failed: {}", failure),
        }
        outcome
    }
}

fn stabilize<M: ProcessMemory + ?Sized>(
    definitions: &[PointerChainDefinition],
    memory: &M,
) -> CycleOutcome {
    let resolved = resolve_all(definitions, memory);
    aggregate(&resolved, memory).map_err(|e| match e {
        Error::StabilizationRead { address } => CycleFailure::StabilizationReadFailed { address },
        _ => CycleFailure::NoConsensus,
    })
}

#[cfg(test)]
mod tests;
