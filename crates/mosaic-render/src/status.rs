//! Status/minibar row composition (§4.9).
//!
//! A pane's final screen row is always in one of three exclusive states —
//! error, minibar prompt, or idle — so composition is a single match
//! rather than string concatenation sprinkled with conditionals. Follows
//! the teacher's two-stage `compose_status`/`format_status` split: an
//! intermediate segment list first, then a flattening pass, so a future
//! caller can inspect or reorder segments without re-deriving them from
//! `Window`/`File` state.

use mosaic_text::File;
use mosaic_view::{MinibarMode, Window};

/// What's needed to compose one pane's status row.
pub struct StatusContext<'a> {
    pub window: &'a Window,
    pub file: Option<&'a File>,
    /// Usable row width, for scrolling the minibar's own input.
    pub width: i32,
}

/// Ordered, order-sensitive pieces of an idle-state status row; other
/// states (`Error`, `MinibarPrompt`) stand alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusSegment {
    Error(String),
    MinibarPrompt { prompt: &'static str, input: String },
    FindCount { index: i32, total: usize },
    MarkIndicator,
    Path(String),
    Dirty,
    Percent(i32),
}

/// Produces the ordered segments for `ctx`'s current state.
pub fn compose_status(ctx: &StatusContext<'_>) -> Vec<StatusSegment> {
    let window = ctx.window;

    if window.error_present {
        return vec![StatusSegment::Error(window.error_message.clone())];
    }

    if window.minibar_active {
        let mut out = Vec::with_capacity(2);
        if window.minibar_mode == MinibarMode::Find && !window.matches.is_empty() {
            out.push(StatusSegment::FindCount {
                index: window.match_index,
                total: window.matches.len(),
            });
        }
        let prompt = window.minibar_mode.prompt();
        let input_width = (ctx.width - prompt.len() as i32).max(0);
        let input = visible_minibar_input(window, input_width);
        out.push(StatusSegment::MinibarPrompt { prompt, input });
        return out;
    }

    let mut out = Vec::with_capacity(4);
    if window.mark_valid {
        out.push(StatusSegment::MarkIndicator);
    }
    if let Some(file) = ctx.file {
        out.push(StatusSegment::Path(file.path.display().to_string()));
        if !file.saved {
            out.push(StatusSegment::Dirty);
        }
        let line_count = file.lines.len() as i32;
        let percent = if line_count > 0 { 100 * window.cursor_y / line_count } else { 0 };
        out.push(StatusSegment::Percent(percent));
    }
    out
}

/// Horizontally scrolled view of the minibar's own buffer around its own
/// cursor, margins 5/5 (§4.6).
fn visible_minibar_input(window: &Window, width: i32) -> String {
    const MARGIN: i32 = 5;
    let offset = Window::updated_offset(window.minibar_cursor, window.minibar_offset, width, MARGIN, MARGIN);
    let start = offset.max(0) as usize;
    let end = (offset + width).max(0) as usize;
    let end = end.min(window.minibar_data.len());
    let start = start.min(end);
    String::from_utf8_lossy(&window.minibar_data[start..end]).into_owned()
}

/// Flattens `segments` into the final row text.
pub fn format_status(segments: &[StatusSegment], width: i32) -> String {
    if let Some(StatusSegment::Error(message)) = segments.first() {
        return format!(" error: {message}");
    }
    if let Some(pos) = segments.iter().position(|s| matches!(s, StatusSegment::MinibarPrompt { .. })) {
        let mut prefix = String::new();
        for segment in &segments[..pos] {
            if let StatusSegment::FindCount { index, total } = segment {
                prefix.push_str(&format!("{index}/{total} "));
            }
        }
        let StatusSegment::MinibarPrompt { prompt, input } = &segments[pos] else {
            unreachable!()
        };
        return format!("{prefix}{prompt}{input}");
    }

    let mut suffix = String::new();
    for segment in segments {
        match segment {
            StatusSegment::FindCount { index, total } => {
                suffix.push_str(&format!("{index}/{total} "));
            }
            StatusSegment::MarkIndicator => suffix.push_str("[] "),
            StatusSegment::Path(path) => suffix.push_str(path),
            StatusSegment::Dirty => suffix.push('*'),
            StatusSegment::Percent(percent) => suffix.push_str(&format!(" {percent}%")),
            StatusSegment::Error(_) | StatusSegment::MinibarPrompt { .. } => {}
        }
    }

    let pad = (width - suffix.chars().count() as i32).max(0) as usize;
    format!("{}{}", " ".repeat(pad), suffix)
}

/// Convenience wrapper over `compose_status` + `format_status`.
pub fn build_status(ctx: &StatusContext<'_>) -> String {
    format_status(&compose_status(ctx), ctx.width)
}
