//! Raw-mode terminal lifecycle (RAII enter/leave), the per-frame
//! [`Framebuffer`], and terminal size discovery.
//!
//! The guard shape mirrors a crossterm-backed `TerminalBackend`: entering
//! raw mode and the alternate screen is idempotent, and leaving happens
//! automatically on drop so an early return or panic can't leave the
//! terminal stuck in raw mode.

pub mod framebuffer;

pub use framebuffer::Framebuffer;

use std::io::{self, Read, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to enter raw mode: {0}")]
    Enter(#[source] io::Error),
    #[error("failed to determine terminal size: {0}")]
    Size(#[source] io::Error),
}

/// Owns whether the process currently holds raw mode and the alternate
/// screen. Construct one per process; acquire a [`TerminalGuard`] to
/// enter, and let the guard's drop restore the terminal.
pub struct Terminal {
    entered: bool,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Terminal { entered: false }
    }

    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>, TerminalError> {
        self.enter()?;
        Ok(TerminalGuard {
            terminal: self,
            active: true,
        })
    }

    fn enter(&mut self) -> Result<(), TerminalError> {
        if !self.entered {
            enable_raw_mode().map_err(TerminalError::Enter)?;
            execute!(io::stdout(), EnterAlternateScreen, Hide).map_err(TerminalError::Enter)?;
            self.entered = true;
            tracing::debug!("entered raw mode + alternate screen");
        }
        Ok(())
    }

    fn leave(&mut self) {
        if self.entered {
            let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
            let _ = disable_raw_mode();
            self.entered = false;
            tracing::debug!("left raw mode + alternate screen");
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        self.leave();
    }
}

/// RAII guard returned by [`Terminal::enter_guard`]; restores the terminal
/// on drop.
pub struct TerminalGuard<'a> {
    terminal: &'a mut Terminal,
    active: bool,
}

impl<'a> Drop for TerminalGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            self.terminal.leave();
        }
    }
}

/// Column/row terminal size. Tries `ioctl(TIOCGWINSZ)` via crossterm
/// first; falls back to a CSI 6n cursor-probe dance (move to an
/// out-of-range cell, read back where the terminal clamped the cursor,
/// then restore it) when that fails.
pub fn terminal_size() -> Result<(i32, i32), TerminalError> {
    match crossterm::terminal::size() {
        Ok((cols, rows)) => Ok((cols as i32, rows as i32)),
        Err(_) => probe_size_via_cursor(),
    }
}

fn probe_size_via_cursor() -> Result<(i32, i32), TerminalError> {
    let (orig_x, orig_y) = read_cursor_position().map_err(TerminalError::Size)?;
    set_cursor_raw(500, 500).map_err(TerminalError::Size)?;
    let (width, height) = read_cursor_position().map_err(TerminalError::Size)?;
    set_cursor_raw(orig_x - 1, orig_y - 1).map_err(TerminalError::Size)?;
    Ok((width, height))
}

fn set_cursor_raw(x: i32, y: i32) -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b[{};{}H", y + 1, x + 1)?;
    stdout.flush()
}

/// Reads the terminal's CSI 6n cursor position report: `ESC[row;colR`.
/// Requires raw mode to already be active so the response isn't echoed or
/// line-buffered away.
fn read_cursor_position() -> io::Result<(i32, i32)> {
    let mut stdout = io::stdout();
    stdout.write_all(b"\x1b[6n")?;
    stdout.flush()?;

    let mut stdin = io::stdin();
    let mut byte = [0u8; 1];
    let mut data = Vec::new();
    loop {
        stdin.read_exact(&mut byte)?;
        if byte[0] == b'R' {
            break;
        }
        data.push(byte[0]);
        if data.len() > 31 {
            break;
        }
    }

    let text = String::from_utf8_lossy(&data);
    let body = text.trim_start_matches("\x1b[");
    let mut parts = body.split(';');
    let row: i32 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed cursor report"))?;
    let col: i32 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "malformed cursor report"))?;
    Ok((col, row))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_starts_not_entered() {
        let terminal = Terminal::new();
        assert!(!terminal.entered);
    }
}
