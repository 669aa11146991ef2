//! # phasmo-core
//!
//! Core library for the PhasmoWatch memory monitor.
//!
//! This crate provides:
//! - Cheat table loading into pointer chain definitions
//! - Multi-level pointer resolution over a foreign address space
//! - Majority-vote stabilization across redundant chains
//! - The poll loop that attaches to the game once per cycle
//! - Ghost and evidence reference tables for display

pub mod chain;
pub mod config;
pub mod error;
pub mod ghost;
pub mod memory;
pub mod monitor;
pub mod shutdown;
pub mod stabilize;

pub use chain::{
    PointerChainDefinition, ResolvedAddress, load_definitions, parse_address_spec,
    parse_definitions, parse_offset, resolve, resolve_all,
};
pub use config::{MonitorConfig, MonitorConfigBuilder};
pub use error::{Error, Result};
pub use ghost::{Evidence, GhostType};
pub use memory::{ProcessHandle, ProcessMemory, ProcessProvider, ReadMemory, SystemProcessProvider};
pub use monitor::{CycleFailure, CycleOutcome, CycleReporter, Monitor, MonitorState};
pub use shutdown::ShutdownSignal;
pub use stabilize::{StabilizedResult, aggregate};
