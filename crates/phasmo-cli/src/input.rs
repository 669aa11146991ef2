//! Quit keys.
//!
//! The dashboard drains pending terminal events once per wait tick, so a
//! quit key is seen within one tick without a separate input thread.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::debug;

/// Consume all pending terminal events; `true` if one of them is a quit key.
///
/// Never blocks. Event errors (e.g. no terminal attached) count as no input.
pub fn quit_requested() -> bool {
    while event::poll(Duration::ZERO).unwrap_or(false) {
        match event::read() {
            Ok(Event::Key(key)) if is_quit_key(&key) => {
                debug!("Quit key pressed: {:?}", key.code);
                return true;
            }
            Ok(_) => {}
            Err(_) => return false,
        }
    }
    false
}

/// Esc, q/Q or Ctrl+C, on key press only.
fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return false;
    }
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
