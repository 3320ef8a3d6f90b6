//! Interactive key channel for long-running watches.
//!
//! A dedicated thread polls the terminal in raw mode and translates a small
//! set of key chords into actions: Ctrl+D (and Ctrl+C as a raw key, since
//! raw mode suppresses the signal) set the shutdown signal, Ctrl+L clears
//! the screen. Everything else is ignored. The thread exits as soon as the
//! signal fires, whatever its origin.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::enable_raw_mode;
use tracing::debug;

use crate::shutdown::ShutdownSignal;
use crate::utils::{clear_screen, cleanup_terminal};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawn the key-listening thread.
///
/// Raw mode stays enabled for the listener's lifetime and is dropped in
/// [`cleanup_terminal`] when it exits. Fails if the terminal refuses raw
/// mode (e.g. stdin is not a tty); callers treat that as "no key channel"
/// rather than a fatal error.
pub fn spawn_listener(signal: ShutdownSignal) -> Result<JoinHandle<()>> {
    enable_raw_mode().context("failed to enable raw terminal mode")?;

    let handle = thread::spawn(move || {
        listen(&signal);
        cleanup_terminal();
    });
    Ok(handle)
}

fn listen(signal: &ShutdownSignal) {
    while !signal.is_triggered() {
        let ready = match event::poll(POLL_INTERVAL) {
            Ok(ready) => ready,
            Err(e) => {
                debug!(error = %e, "key listener poll failed, stopping");
                signal.trigger();
                return;
            }
        };
        if !ready {
            continue;
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "key listener read failed, stopping");
                signal.trigger();
                return;
            }
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('d') | KeyCode::Char('c') => {
                    debug!("shutdown requested from keyboard");
                    signal.trigger();
                    return;
                }
                KeyCode::Char('l') => clear_screen(),
                _ => {}
            }
        }
    }
}
