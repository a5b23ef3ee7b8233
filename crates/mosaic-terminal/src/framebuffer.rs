//! A byte buffer that accumulates VT/xterm escape sequences for one frame,
//! flushed to the terminal in a single write. Foreground/background color
//! are cached so repeated same-color runs don't re-emit the SGR sequence,
//! mirroring the original renderer's `current_foreground_type`/
//! `current_background_type` dedup.

use std::io::{self, Write};

#[derive(Debug, Default)]
pub struct Framebuffer {
    bytes: Vec<u8>,
    current_foreground: Option<u32>,
    current_background: Option<u32>,
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer::default()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Writes the accumulated bytes to `out` in one call and clears the
    /// buffer. Does not reset the color cache — that persists across
    /// frames the same way the original's globals do.
    pub fn flush_to(&mut self, out: &mut impl Write) -> io::Result<()> {
        out.write_all(&self.bytes)?;
        self.bytes.clear();
        Ok(())
    }

    fn write_fmt_args(&mut self, args: std::fmt::Arguments) {
        use std::fmt::Write as _;
        let mut s = String::new();
        let _ = s.write_fmt(args);
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Moves the cursor to zero-based `(x, y)`; the terminal's own CUP
    /// sequence is one-based.
    pub fn set_cursor(&mut self, x: i32, y: i32) {
        self.write_fmt_args(format_args!("\x1b[{};{}H", y + 1, x + 1));
    }

    pub fn hide_cursor(&mut self) {
        self.bytes.extend_from_slice(b"\x1b[?25l");
    }

    pub fn show_cursor(&mut self) {
        self.bytes.extend_from_slice(b"\x1b[?25h");
    }

    /// Appends literal text (already the right width/encoding for the
    /// current cursor position) with no further escaping.
    pub fn print(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    pub fn clear_line(&mut self, y: i32) {
        self.set_cursor(0, y);
        self.bytes.extend_from_slice(b"\x1b[2K");
    }

    pub fn clear_screen(&mut self) {
        self.bytes.extend_from_slice(b"\x1b[2J");
    }

    pub fn invert(&mut self) {
        self.bytes.extend_from_slice(b"\x1b[7m");
    }

    pub fn bold(&mut self) {
        self.bytes.extend_from_slice(b"\x1b[1m");
    }

    /// Resets SGR state and the foreground/background cache together, so
    /// the next `set_foreground`/`set_background` call is guaranteed to
    /// emit its escape even if the color value happens to repeat.
    pub fn clear_formatting(&mut self) {
        self.current_foreground = None;
        self.current_background = None;
        self.bytes.extend_from_slice(b"\x1b[0m");
    }

    pub fn set_foreground(&mut self, rgb: u32) {
        if self.current_foreground == Some(rgb) {
            return;
        }
        self.current_foreground = Some(rgb);
        let (r, g, b) = split_rgb(rgb);
        self.write_fmt_args(format_args!("\x1b[38;2;{};{};{}m", r, g, b));
    }

    pub fn set_background(&mut self, rgb: u32) {
        if self.current_background == Some(rgb) {
            return;
        }
        self.current_background = Some(rgb);
        let (r, g, b) = split_rgb(rgb);
        self.write_fmt_args(format_args!("\x1b[48;2;{};{};{}m", r, g, b));
    }

    pub fn set_cursor_color(&mut self, rgb: u32) {
        let (r, g, b) = split_rgb(rgb);
        self.write_fmt_args(format_args!("\x1b]12;rgb:{:02x}/{:02x}/{:02x}\x07", r, g, b));
    }

    pub fn reset_cursor_color(&mut self) {
        self.bytes.extend_from_slice(b"\x1b]104;258\x07");
    }

    pub fn reset_terminal_colors(&mut self) {
        self.bytes.extend_from_slice(b"\x1b]104;256\x07");
        self.bytes.extend_from_slice(b"\x1b]104;257\x07");
        self.bytes.extend_from_slice(b"\x1b]104;258\x07");
    }

    pub fn set_terminal_background(&mut self, rgb: u32) {
        let (r, g, b) = split_rgb(rgb);
        self.write_fmt_args(format_args!("\x1b]11;rgb:{:02x}/{:02x}/{:02x}\x07", r, g, b));
    }
}

fn split_rgb(rgb: u32) -> (u8, u8, u8) {
    (
        ((rgb >> 16) & 0xFF) as u8,
        ((rgb >> 8) & 0xFF) as u8,
        (rgb & 0xFF) as u8,
    )
}
