use std::io::{self, Write};
use std::sync::Once;

/// ANSI escape codes for terminal control
const CURSOR_SHOW: &str = "\x1B[?25h";
const ATTR_RESET: &str = "\x1B[0m";
const CLEAR_LINE: &str = "\r\x1B[K";
const CLEAR_SCREEN: &str = "\x1B[H\x1B[J";

static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Write one console line, terminated with `\r\n`.
///
/// While the key listener holds the terminal in raw mode, a bare `\n` no
/// longer implies a carriage return; `\r\n` renders correctly in both raw
/// and cooked mode, so every user-facing line goes through here.
pub fn emit(line: impl std::fmt::Display) {
    let mut stdout = io::stdout();
    let _ = write!(stdout, "{line}\r\n");
    let _ = stdout.flush();
}

/// Clear the screen and move the cursor home.
pub fn clear_screen() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(CLEAR_SCREEN.as_bytes());
    let _ = stdout.flush();
}

/// Restore terminal to a clean state.
///
/// Leaves raw mode if the key listener enabled it, shows the cursor,
/// resets text attributes, clears the current line and flushes stdout.
/// Call this before exiting to prevent leaving the terminal in a weird
/// state; errors are ignored, cleanup is best effort.
pub fn cleanup_terminal() {
    let _ = crossterm::terminal::disable_raw_mode();

    let mut stdout = io::stdout();
    let cleanup = format!("{CLEAR_LINE}{CURSOR_SHOW}{ATTR_RESET}\n");
    let _ = stdout.write_all(cleanup.as_bytes());
    let _ = stdout.flush();
}

/// Install a panic hook that restores terminal state before panicking.
///
/// Safe to call multiple times - only installs once.
pub fn install_terminal_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let default_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            cleanup_terminal();
            default_hook(panic_info);
        }));
    });
}
