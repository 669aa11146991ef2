use std::time::Duration;

use tracing::info;

use super::{CycleReporter, Monitor, MonitorState};
use crate::memory::ProcessProvider;
use crate::shutdown::ShutdownSignal;

impl<P: ProcessProvider> Monitor<P> {
    /// Poll until `shutdown` is triggered.
    ///
    /// Every outcome, success or failure, is followed by one refresh interval
    /// of waiting. A cycle already in progress always runs to completion.
    pub fn run<R: CycleReporter + ?Sized>(
        &mut self,
        shutdown: &ShutdownSignal,
        reporter: &mut R,
    ) -> MonitorState {
        info!(
            "Monitoring {} with {} pointer chains every {}s",
            self.config.process_name,
            self.definitions.len(),
            self.config.refresh_interval().as_secs()
        );

        while !shutdown.is_shutdown() {
            let outcome = self.run_cycle();
            reporter.report(&outcome);

            if self.wait_interval(shutdown, reporter) {
                break;
            }
        }

        info!("Monitor stopped");
        self.state = MonitorState::Stopped;
        self.state
    }

    /// Wait one refresh interval in ticks. Returns `true` on shutdown.
    fn wait_interval<R: CycleReporter + ?Sized>(
        &self,
        shutdown: &ShutdownSignal,
        reporter: &mut R,
    ) -> bool {
        let ticks = self.config.refresh_interval_secs.max(1);
        for elapsed in 0..ticks {
            reporter.countdown(Duration::from_secs(ticks - elapsed));
            if shutdown.wait(self.tick) {
                return true;
            }
        }
        false
    }
}
