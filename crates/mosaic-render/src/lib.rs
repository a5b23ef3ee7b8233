//! Frame assembly: the dirty-row bitmap, per-pane drawing with match-span
//! color priority, status rows, and hardware cursor placement (§4.8/§4.9).
//!
//! Every pane/file/line already carries its own `redraw` flag, set by the
//! view and text layers on every mutation (mirrors the teacher's
//! `DirtyLinesTracker`, except there is no separate tracker object here —
//! the flags already living on `Window`/`File`/`Line` are the tracker).
//! This crate's only job is to fold those flags into one per-screen-row
//! bitmap once per frame, draw the rows it marks, and clear the flags it
//! consumed so the next frame starts clean.

pub mod status;

use mosaic_actions::App;
use mosaic_layout::RegionId;
use mosaic_layout::WindowId;
use mosaic_state::Theme;
use mosaic_terminal::Framebuffer;
use mosaic_text::color::ColorType;
use mosaic_text::Line;
use mosaic_view::Match;

/// Renders one frame into `fb`. Reconciles every pane's scroll offset
/// first (§4.3), then draws only the screen rows the bitmap marks dirty,
/// and finally positions the hardware cursor on the focused pane.
pub fn render(fb: &mut Framebuffer, app: &mut App) {
    let (_, _, _master_width, master_height) = app.layout.geometry(app.layout.root());

    reconcile_all_offsets(app);
    let redraw_line = build_redraw_lines(app, master_height);

    let background = app.state.theme().color(ColorType::EditorBackground);
    fb.clear_formatting();
    for (row, &dirty) in redraw_line.iter().enumerate() {
        if dirty {
            fb.set_background(background);
            fb.clear_line(row as i32);
        }
    }

    fb.hide_cursor();
    for (region, window_id) in app.panes() {
        draw_pane(fb, app, region, window_id, &redraw_line);
    }
    for (region, window_id) in app.panes() {
        draw_status_row(fb, app, region, window_id);
    }

    position_hardware_cursor(fb, app);
    fb.show_cursor();
}

/// Step 1: reconciles every pane's scroll offset against its current
/// cursor position and region geometry, which may itself set `redraw`.
fn reconcile_all_offsets(app: &mut App) {
    for (region, window_id) in app.panes() {
        let (region_x, _region_y, region_width, region_height) = app.layout.geometry(region);
        let Some(file_id) = app.window(window_id).file else {
            continue;
        };
        let (window, file) = app.window_and_file_mut(window_id, file_id);
        window.update_offsets(file, region_width, region_height, region_x);
    }
}

/// Step 2: folds every pane/file/line `redraw` flag into one per-row
/// bitmap sized to the whole screen, then clears the flags it read.
fn build_redraw_lines(app: &mut App, master_height: i32) -> Vec<bool> {
    let mut redraw_line = vec![false; master_height.max(0) as usize];
    let panes = app.panes();

    for &(region, window_id) in &panes {
        let (_region_x, region_y, _region_width, region_height) = app.layout.geometry(region);
        let file_id = app.window(window_id).file;
        let pane_dirty = app.window(window_id).redraw || file_id.map(|f| app.file(f).redraw).unwrap_or(false);
        let text_height = region_height - mosaic_view::MINIBAR_ROWS;

        if pane_dirty {
            for row in region_y..region_y + region_height {
                mark(&mut redraw_line, row);
            }
        } else if let Some(file_id) = file_id {
            let offset_y = app.window(window_id).offset_y;
            for (i, line) in app.file(file_id).lines.iter().enumerate() {
                if !line.redraw {
                    continue;
                }
                let local_row = i as i32 - offset_y;
                if local_row >= 0 && local_row < text_height {
                    mark(&mut redraw_line, region_y + local_row);
                }
            }
        }

        let status_row_start = region_y + region_height - mosaic_view::MINIBAR_ROWS;
        for row in status_row_start..region_y + region_height {
            mark(&mut redraw_line, row);
        }
    }

    for &(_region, window_id) in &panes {
        let file_id = app.window(window_id).file;
        app.window_mut(window_id).redraw = false;
        if let Some(file_id) = file_id {
            let file = app.file_mut(file_id);
            file.redraw = false;
            for line in file.lines.iter_mut() {
                line.redraw = false;
            }
        }
    }

    redraw_line
}

fn mark(redraw_line: &mut [bool], row: i32) {
    if row >= 0 {
        if let Some(slot) = redraw_line.get_mut(row as usize) {
            *slot = true;
        }
    }
}

/// Step 4: draws every dirty row of one pane's text area (not its status
/// row, handled separately by [`draw_status_row`]).
fn draw_pane(fb: &mut Framebuffer, app: &App, region: RegionId, window_id: WindowId, redraw_line: &[bool]) {
    let theme = app.state.theme();
    let (region_x, region_y, region_width, region_height) = app.layout.geometry(region);
    let window = app.window(window_id);
    let text_height = region_height - mosaic_view::MINIBAR_ROWS;

    let Some(file_id) = window.file else {
        for local_row in 0..text_height {
            let row = region_y + local_row;
            if !is_dirty(redraw_line, row) {
                continue;
            }
            fb.set_cursor(region_x, row);
            if region_x > 0 {
                draw_separator(fb, theme);
            }
        }
        return;
    };

    let file = app.file(file_id);
    let left_padding = window.left_padding(file, region_x);
    let separator_width = if region_x > 0 { 2 } else { 0 };
    let digits = (left_padding - separator_width - mosaic_view::LINE_NUMBER_MARGIN).max(1);
    let content_width = region_width - left_padding;
    let match_len = window.minibar_data.len() as i32;
    let cursor = (window.cursor_x, window.cursor_y);

    for local_row in 0..text_height {
        let row = region_y + local_row;
        if !is_dirty(redraw_line, row) {
            continue;
        }
        fb.set_cursor(region_x, row);
        if region_x > 0 {
            draw_separator(fb, theme);
        }

        let line_index = local_row + window.offset_y;
        match file.lines.get(line_index as usize) {
            Some(line) => {
                draw_line_number(fb, theme, line_index, digits);
                draw_line_content(fb, theme, line, &window.matches, match_len, line_index, cursor, window.offset_x, content_width);
            }
            None => draw_blank_gutter(fb, theme, digits),
        }
    }
}

fn is_dirty(redraw_line: &[bool], row: i32) -> bool {
    row >= 0 && redraw_line.get(row as usize).copied().unwrap_or(false)
}

fn draw_separator(fb: &mut Framebuffer, theme: &Theme) {
    fb.set_background(theme.color(ColorType::MinibarBackground));
    fb.print(" ");
    fb.set_background(theme.color(ColorType::EditorBackground));
    fb.print(" ");
}

fn draw_line_number(fb: &mut Framebuffer, theme: &Theme, line_index: i32, digits: i32) {
    fb.set_background(theme.color(ColorType::EditorBackground));
    fb.set_foreground(theme.color(ColorType::EditorForeground));
    fb.print(&format!("{:>width$}", line_index + 1, width = digits as usize));
    fb.print(&" ".repeat(mosaic_view::LINE_NUMBER_MARGIN as usize));
}

fn draw_blank_gutter(fb: &mut Framebuffer, theme: &Theme, digits: i32) {
    fb.set_background(theme.color(ColorType::EditorBackground));
    fb.print(&" ".repeat((digits + mosaic_view::LINE_NUMBER_MARGIN) as usize));
}

/// Step 4c: colors every visible byte of one line, giving a match span
/// priority over the highlighter's color class, and upgrading to the
/// selected-match colors when the cursor sits inside that same span.
fn draw_line_content(
    fb: &mut Framebuffer,
    theme: &Theme,
    line: &Line,
    matches: &[Match],
    match_len: i32,
    line_y: i32,
    cursor: (i32, i32),
    offset_x: i32,
    width: i32,
) {
    if width <= 0 {
        return;
    }
    let start = offset_x.max(0) as usize;
    if start >= line.chars.len() {
        return;
    }
    let end = ((offset_x + width).max(0) as usize).min(line.chars.len());

    for idx in start..end {
        let x = idx as i32;
        let matched = matches.iter().find(|m| m.y == line_y && x >= m.x && x < m.x + match_len);

        let (fg, bg) = match matched {
            Some(m) => {
                let selected = cursor.1 == line_y && cursor.0 >= m.x && cursor.0 < m.x + match_len;
                if selected {
                    (theme.color(ColorType::SelectedMatchForeground), theme.color(ColorType::SelectedMatchBackground))
                } else {
                    (theme.color(ColorType::MatchForeground), theme.color(ColorType::MatchBackground))
                }
            }
            None => {
                let class = line.colors.get(idx).copied().unwrap_or(ColorType::EditorForeground);
                (theme.color(class), theme.color(ColorType::EditorBackground))
            }
        };

        fb.set_foreground(fg);
        fb.set_background(bg);
        fb.print(&(line.chars[idx] as char).to_string());
    }
}

/// Step 5: paints one pane's final row in its current state (§4.9).
fn draw_status_row(fb: &mut Framebuffer, app: &App, region: RegionId, window_id: WindowId) {
    let theme = app.state.theme();
    let (region_x, region_y, region_width, region_height) = app.layout.geometry(region);
    let row = region_y + region_height - mosaic_view::MINIBAR_ROWS;
    let window = app.window(window_id);
    let file = window.file.map(|id| app.file(id));
    let focused = app.focused_window_id() == window_id;

    fb.set_cursor(region_x, row);
    fb.set_background(theme.color(ColorType::MinibarBackground));
    fb.set_foreground(if window.error_present {
        theme.color(ColorType::MinibarError)
    } else {
        theme.color(ColorType::MinibarForeground)
    });
    if focused {
        fb.bold();
    }

    let ctx = status::StatusContext { window, file, width: region_width };
    let text = status::build_status(&ctx);
    fb.print(truncate(&text, region_width));

    if focused {
        fb.clear_formatting();
    }
}

fn truncate(s: &str, width: i32) -> &str {
    let width = width.max(0) as usize;
    match s.char_indices().nth(width) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}

/// Step 6: positions the hardware cursor and sets its OSC 12 color —
/// the minibar's input cursor when the minibar is active, else the
/// buffer cursor.
fn position_hardware_cursor(fb: &mut Framebuffer, app: &App) {
    let theme = app.state.theme();
    let region = app.focused_region();
    let (region_x, region_y, _region_width, region_height) = app.layout.geometry(region);
    let window = app.focused_window();

    if window.minibar_active {
        let row = region_y + region_height - mosaic_view::MINIBAR_ROWS;
        let prompt_len = window.minibar_mode.prompt().len() as i32;
        let col = region_x + prompt_len + (window.minibar_cursor - window.minibar_offset);
        fb.set_cursor(col, row);
        fb.set_cursor_color(theme.color(ColorType::MinibarCursor));
        return;
    }

    let Some(file_id) = window.file else {
        return;
    };
    let file = app.file(file_id);
    let left_padding = window.left_padding(file, region_x);
    let col = region_x + left_padding + (window.cursor_x - window.offset_x);
    let row = region_y + (window.cursor_y - window.offset_y);
    fb.set_cursor(col, row);
    fb.set_cursor_color(theme.color(ColorType::EditorCursor));
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_layout::LayoutTree;
    use mosaic_state::{built_in_themes, EditorState};
    use mosaic_text::highlight::built_in_rules;
    use mosaic_view::Window;

    fn new_app() -> App {
        let rules = built_in_rules();
        let mut state = EditorState::new(built_in_themes());
        let file = state.create_file("main.c", &rules);
        let window_id = state.alloc_window(file);
        let layout = LayoutTree::new(80, 24, window_id);
        let mut app = App::new(state, layout, rules, window_id);
        app.insert_window(window_id, Window::new(Some(file)));
        app
    }

    #[test]
    fn fresh_frame_marks_every_row_dirty() {
        let mut app = new_app();
        let redraw_line = build_redraw_lines(&mut app, 24);
        assert!(redraw_line.iter().all(|&d| d));
    }

    #[test]
    fn second_frame_with_no_edits_has_nothing_dirty_but_the_status_row() {
        let mut app = new_app();
        build_redraw_lines(&mut app, 24);
        let redraw_line = build_redraw_lines(&mut app, 24);
        assert!(redraw_line[..23].iter().all(|&d| !d));
        assert!(redraw_line[23]);
    }

    #[test]
    fn editing_a_line_marks_only_its_row_dirty_next_frame() {
        let mut app = new_app();
        build_redraw_lines(&mut app, 24);
        let window_id = app.focused_window_id();
        let file_id = app.window(window_id).file.unwrap();
        app.file_mut(file_id).lines.get_mut(0).unwrap().chars = b"x".to_vec();
        app.file_mut(file_id).reclassify_line(0);
        let redraw_line = build_redraw_lines(&mut app, 24);
        assert!(redraw_line[0]);
        assert!(redraw_line[1..23].iter().all(|&d| !d));
    }

    #[test]
    fn render_produces_nonempty_output_and_clears_dirty_flags() {
        let mut app = new_app();
        let mut fb = Framebuffer::new();
        render(&mut fb, &mut app);
        assert!(!fb.as_bytes().is_empty());
        let redraw_line = build_redraw_lines(&mut app, 24);
        assert!(redraw_line[..23].iter().all(|&d| !d));
    }

    #[test]
    fn truncate_clips_to_width() {
        assert_eq!(truncate("hello world", 5), "hello");
        assert_eq!(truncate("hi", 5), "hi");
    }
}
