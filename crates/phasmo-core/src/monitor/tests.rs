use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::error::Result;
use crate::memory::{MockMemoryBuilder, MockMemoryReader, ReadMemory};
use crate::shutdown::ShutdownSignal;

struct MockHandle {
    memory: Rc<MockMemoryReader>,
    released: Rc<Cell<usize>>,
}

impl ReadMemory for MockHandle {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.memory.read_bytes(address, size)
    }
}

impl ProcessMemory for MockHandle {
    fn module_base_address(&self, name: &str) -> Result<u64> {
        self.memory.module_base_address(name)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

struct MockProvider {
    pid: Option<u32>,
    attach_error: Option<String>,
    memory: Rc<MockMemoryReader>,
    attached: Cell<usize>,
    released: Rc<Cell<usize>>,
}

impl MockProvider {
    fn running(memory: MockMemoryReader) -> Self {
        Self {
            pid: Some(4242),
            attach_error: None,
            memory: Rc::new(memory),
            attached: Cell::new(0),
            released: Rc::new(Cell::new(0)),
        }
    }

    fn not_running() -> Self {
        Self {
            pid: None,
            ..Self::running(MockMemoryBuilder::new().build())
        }
    }
}

impl ProcessProvider for MockProvider {
    type Handle = MockHandle;

    fn find_process(&self, name: &str) -> Result<Option<u32>> {
        assert!(name.eq_ignore_ascii_case("phasmophobia.exe"));
        Ok(self.pid)
    }

    fn attach(&self, pid: u32) -> Result<MockHandle> {
        assert_eq!(Some(pid), self.pid);
        if let Some(message) = &self.attach_error {
            return Err(Error::ProcessOpenFailed(message.clone()));
        }
        self.attached.set(self.attached.get() + 1);
        Ok(MockHandle {
            memory: Rc::clone(&self.memory),
            released: Rc::clone(&self.released),
        })
    }
}

/// Two chains through different modules that meet at 0x3008, one broken chain
fn definitions() -> Vec<PointerChainDefinition> {
    vec![
        PointerChainDefinition {
            module_name: "Core".to_string(),
            base_offset: 0x10,
            offsets: vec![0x4, 0x8],
        },
        PointerChainDefinition {
            module_name: "Mono.dll".to_string(),
            base_offset: 0x20,
            offsets: vec![0x8],
        },
        PointerChainDefinition {
            module_name: "Missing.dll".to_string(),
            base_offset: 0,
            offsets: vec![],
        },
    ]
}

fn game_memory(value: i32) -> MockMemoryReader {
    MockMemoryBuilder::new()
        .module("Core", 0x1000)
        .module("Mono.dll", 0x8000)
        .write_u64(0x1010, 0x2000)
        .write_u64(0x2004, 0x3000)
        .write_u64(0x8020, 0x3000)
        .write_i32(0x3008, value)
        .build()
}

fn monitor(provider: MockProvider) -> Monitor<MockProvider> {
    Monitor::new(definitions(), MonitorConfig::default(), provider)
        .with_tick(Duration::from_millis(1))
}

#[derive(Default)]
struct Recorder {
    outcomes: Vec<CycleOutcome>,
    countdowns: Vec<Duration>,
    stop_after: usize,
    shutdown: Option<Rc<ShutdownSignal>>,
}

impl CycleReporter for Recorder {
    fn report(&mut self, outcome: &CycleOutcome) {
        self.outcomes.push(outcome.clone());
        if self.outcomes.len() >= self.stop_after
            && let Some(shutdown) = &self.shutdown
        {
            shutdown.trigger();
        }
    }

    fn countdown(&mut self, remaining: Duration) {
        self.countdowns.push(remaining);
    }
}

#[test]
fn test_cycle_success() {
    let mut monitor = monitor(MockProvider::running(game_memory(7)));

    let result = monitor.run_cycle().unwrap();
    assert_eq!(result.winning_address, 0x3008);
    assert_eq!(result.value, 7);
    assert_eq!(result.agreement_count, 2);
    assert_eq!(result.total_resolved, 2);
}

#[test]
fn test_cycle_releases_handle() {
    let mut monitor = monitor(MockProvider::running(game_memory(7)));

    monitor.run_cycle().unwrap();
    monitor.run_cycle().unwrap();

    let provider = &monitor.provider;
    assert_eq!(provider.attached.get(), 2);
    assert_eq!(provider.released.get(), 2);
    assert_eq!(monitor.state(), MonitorState::WaitingForTarget);
}

#[test]
fn test_cycle_releases_handle_on_failure() {
    let mut monitor = monitor(MockProvider::running(MockMemoryBuilder::new().build()));

    assert_eq!(monitor.run_cycle(), Err(CycleFailure::NoConsensus));
    assert_eq!(monitor.provider.released.get(), 1);
}

#[test]
fn test_cycle_no_target() {
    let mut monitor = monitor(MockProvider::not_running());
    assert_eq!(monitor.run_cycle(), Err(CycleFailure::NoTarget));
    assert_eq!(monitor.provider.attached.get(), 0);
}

#[test]
fn test_config_accessor() {
    let monitor = monitor(MockProvider::not_running());
    assert_eq!(monitor.config().process_name, "Phasmophobia.exe");
}

#[test]
fn test_cycle_attach_failed() {
    let provider = MockProvider {
        attach_error: Some("access denied".to_string()),
        ..MockProvider::running(game_memory(7))
    };
    let mut monitor = monitor(provider);

    match monitor.run_cycle() {
        Err(CycleFailure::AttachFailed(message)) => assert!(message.contains("access denied")),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(monitor.state(), MonitorState::WaitingForTarget);
}

#[test]
fn test_cycle_stabilization_read_failed() {
    // Two vote reads succeed, the confirming read fails
    let memory = MockMemoryBuilder::new()
        .module("Core", 0x1000)
        .module("Mono.dll", 0x8000)
        .write_u64(0x1010, 0x2000)
        .write_u64(0x2004, 0x3000)
        .write_u64(0x8020, 0x3000)
        .write_i32(0x3008, 7)
        .read_limit(0x3008, 2)
        .build();
    let mut monitor = monitor(MockProvider::running(memory));

    assert_eq!(
        monitor.run_cycle(),
        Err(CycleFailure::StabilizationReadFailed { address: 0x3008 })
    );
}

#[test]
fn test_cycle_idempotent() {
    let mut monitor = monitor(MockProvider::running(game_memory(12)));
    assert_eq!(monitor.run_cycle(), monitor.run_cycle());
}

#[test]
fn test_run_until_shutdown() {
    let shutdown = Rc::new(ShutdownSignal::new());
    let mut recorder = Recorder {
        stop_after: 3,
        shutdown: Some(Rc::clone(&shutdown)),
        ..Default::default()
    };
    let mut monitor = monitor(MockProvider::running(game_memory(7)));

    let state = monitor.run(&shutdown, &mut recorder);

    assert_eq!(state, MonitorState::Stopped);
    assert_eq!(recorder.outcomes.len(), 3);
    assert!(recorder.outcomes.iter().all(|o| o.is_ok()));
    assert_eq!(monitor.provider.released.get(), 3);
}

#[test]
fn test_run_counts_down_each_tick() {
    let shutdown = Rc::new(ShutdownSignal::new());
    let mut recorder = Recorder {
        stop_after: 2,
        shutdown: Some(Rc::clone(&shutdown)),
        ..Default::default()
    };
    let config = MonitorConfig::builder().refresh_interval_secs(3).build();
    let mut monitor = Monitor::new(definitions(), config, MockProvider::not_running())
        .with_tick(Duration::from_millis(1));

    monitor.run(&shutdown, &mut recorder);

    assert_eq!(recorder.outcomes, vec![Err(CycleFailure::NoTarget); 2]);
    // Full countdown after the first cycle, cancelled on the first tick after the second
    assert_eq!(
        recorder.countdowns,
        vec![
            Duration::from_secs(3),
            Duration::from_secs(2),
            Duration::from_secs(1),
            Duration::from_secs(3),
        ]
    );
}

#[test]
fn test_run_already_cancelled() {
    let shutdown = ShutdownSignal::new();
    shutdown.trigger();
    let mut recorder = Recorder::default();
    let mut monitor = monitor(MockProvider::running(game_memory(7)));

    assert_eq!(monitor.run(&shutdown, &mut recorder), MonitorState::Stopped);
    assert!(recorder.outcomes.is_empty());
}
