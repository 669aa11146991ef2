//! Terminal dashboard.
//!
//! Redraws the whole screen after every cycle and keeps a countdown on the
//! last line until the next one.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use owo_colors::OwoColorize;
use phasmo_core::{
    CycleFailure, CycleOutcome, CycleReporter, Evidence, GhostType, ShutdownSignal,
    StabilizedResult,
};
use strum::IntoEnumIterator;

use crate::input;

pub const TITLE: &str = "PHASMOWATCH  v1.1";

const WIDTH: usize = 40;
const GHOST_COLUMN: usize = 12;
const EVIDENCE_COLUMN: usize = 23;

pub struct Dashboard {
    process_name: String,
    clear_screen: bool,
    show_countdown: bool,
    /// Triggered when a quit key is seen during a countdown tick
    shutdown: Arc<ShutdownSignal>,
}

impl Dashboard {
    pub fn new(
        process_name: impl Into<String>,
        clear_screen: bool,
        shutdown: Arc<ShutdownSignal>,
    ) -> Self {
        Self {
            process_name: process_name.into(),
            clear_screen,
            show_countdown: false,
            shutdown,
        }
    }

    fn clear(&self) {
        if self.clear_screen {
            // Best effort: a failed clear only leaves old output above
            let _ = execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0));
        }
    }
}

impl CycleReporter for Dashboard {
    fn report(&mut self, outcome: &CycleOutcome) {
        self.clear();
        print!("{}", render_header(TITLE));

        match outcome {
            Ok(result) => {
                let ghost = GhostType::from_value(result.value);
                print!("{}", render_value_line(result));
                print!("{}", render_ghost_chart(ghost));
                print!("{}", render_evidence_chart(ghost));
                self.show_countdown = true;
            }
            Err(failure) => {
                println!("{}", render_failure(failure, &self.process_name).bright_red());
                self.show_countdown = false;
            }
        }
        let _ = io::stdout().flush();
    }

    fn countdown(&mut self, remaining: Duration) {
        if input::quit_requested() {
            self.shutdown.trigger();
            return;
        }
        if !self.show_countdown {
            return;
        }
        print!(
            "\r{}",
            format!(
                "Refreshing in {}s... (press q or Ctrl+C to quit) ",
                remaining.as_secs()
            )
            .bright_cyan()
        );
        let _ = io::stdout().flush();
    }
}

fn separator(c: char) -> String {
    c.to_string().repeat(WIDTH)
}

pub fn render_header(title: &str) -> String {
    let bar = separator('=').bright_magenta().to_string();
    format!(
        "{bar}\n{}\n{bar}\n\n",
        format!("{:^width$}", title, width = WIDTH).bold().bright_cyan()
    )
}

pub fn render_value_line(result: &StabilizedResult) -> String {
    format!(
        "{} {} at {:#x} {} hits\n\n",
        "Value:".bold().bright_cyan(),
        result.value,
        result.winning_address,
        result.ratio()
    )
}

pub fn render_failure(failure: &CycleFailure, process_name: &str) -> String {
    match failure {
        CycleFailure::NoTarget => format!("Game not running... waiting for {}", process_name),
        CycleFailure::AttachFailed(e) => format!("Could not attach to process: {}", e),
        CycleFailure::NoConsensus => "No valid pointers found.".to_string(),
        CycleFailure::StabilizationReadFailed { .. } => "Memory read failed.".to_string(),
    }
}

/// Ghost selection chart with the current ghost highlighted.
pub fn render_ghost_chart(current: Option<GhostType>) -> String {
    let mut out = String::new();
    for row in GhostType::CHART {
        let cells: Vec<String> = row
            .iter()
            .map(|ghost| {
                let cell = format!("{:<width$}", ghost.name(), width = GHOST_COLUMN);
                if Some(*ghost) == current {
                    cell.bold().bright_green().to_string()
                } else {
                    cell
                }
            })
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out.push_str(&format!("{}\n\n", separator('-').bright_magenta()));
    out
}

/// All evidence in two columns, highlighting what the current ghost leaves.
pub fn render_evidence_chart(current: Option<GhostType>) -> String {
    let evidence: Vec<Evidence> = Evidence::iter().collect();
    let mut out = String::new();
    for row in evidence.chunks(2) {
        let cells: Vec<String> = row
            .iter()
            .map(|ev| {
                let cell = format!("{:<width$}", ev.name(), width = EVIDENCE_COLUMN);
                if current.is_some_and(|ghost| ghost.has_evidence(*ev)) {
                    cell.bold().bright_green().to_string()
                } else {
                    cell
                }
            })
            .collect();
        out.push_str(&cells.join("  "));
        out.push('\n');
    }
    out.push_str(&format!("{}\n", separator('-').bright_magenta()));
    out
}
