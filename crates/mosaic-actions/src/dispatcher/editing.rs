//! Cursor motion, character/word editing, and block cut/copy/paste —
//! everything `editor_handle_keypress` does once the keystroke isn't a
//! layout or minibar command.

use mosaic_keymap::Action;

use super::{region_geom, report_error};
use crate::App;

/// Arrow/Home/End/PageUp/PageDown/shift-Home/shift-End motions.
pub(super) fn motion(app: &mut App, action: Action) {
    app.set_brace_pending(false);
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let (window, file) = app.window_and_file_mut(window_id, file_id);

    let last_line = file.lines.len() as i32 - 1;
    let line_len = |y: i32| file.lines.get(y as usize).map(|l| l.len() as i32).unwrap_or(0);

    match action {
        Action::MoveUp => window.update_cursor_y(window.cursor_y - 1),
        Action::MoveDown => window.update_cursor_y(window.cursor_y + 1),
        Action::MoveLeft => {
            if window.cursor_x > 0 {
                let x = window.cursor_x - 1;
                window.update_cursor_x(x);
            } else if window.cursor_y > 0 {
                window.cursor_y -= 1;
                let len = line_len(window.cursor_y);
                window.update_cursor_x(len);
            }
        }
        Action::MoveRight => {
            let len = line_len(window.cursor_y);
            if window.cursor_x < len {
                let x = window.cursor_x + 1;
                window.update_cursor_x(x);
            } else if window.cursor_y < last_line {
                window.cursor_y += 1;
                window.update_cursor_x(0);
            }
        }
        Action::PageUp => {
            let (_, height) = window.active_size(file, region_width, region_height, region_x);
            window.update_cursor_y(window.cursor_y - height);
        }
        Action::PageDown => {
            let (_, height) = window.active_size(file, region_width, region_height, region_x);
            window.update_cursor_y(window.cursor_y + height);
        }
        Action::Home => window.smart_home(file),
        Action::End => {
            let len = line_len(window.cursor_y);
            window.update_cursor_x(len);
        }
        Action::JumpToStart => {
            window.cursor_y = 0;
            window.update_cursor_x(0);
        }
        Action::JumpToEnd => {
            window.cursor_y = last_line;
            let len = line_len(last_line);
            window.update_cursor_x(len);
        }
        _ => {}
    }

    window.limit_cursor(file, region_width, region_height, region_x);
}

pub(super) fn insert_char(app: &mut App, b: u8) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    window.insert_char(file, b);
    window.limit_cursor(file, region_width, region_height, region_x);
    app.set_brace_pending(b == b'{');
}

pub(super) fn tab(app: &mut App) {
    for _ in 0..mosaic_view::SPACES_PER_TAB {
        insert_char(app, b' ');
    }
}

pub(super) fn newline(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let brace_pending = app.brace_pending();
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    window.insert_newline(file, brace_pending);
    window.limit_cursor(file, region_width, region_height, region_x);
    app.set_brace_pending(false);
}

pub(super) fn delete(app: &mut App, whole_word: bool) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    window.delete_char_or_word(file, whole_word);
    window.limit_cursor(file, region_width, region_height, region_x);
    app.set_brace_pending(false);
}

pub(super) fn save(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let file = app.file_mut(file_id);
    if let Err(err) = file.save() {
        report_error(app, window_id, err.to_string());
    }
}

pub(super) fn toggle_mark(app: &mut App) {
    let window = app.focused_window_mut();
    if window.mark_valid {
        window.mark_valid = false;
    } else {
        window.mark_x = window.cursor_x;
        window.mark_y = window.cursor_y;
        window.mark_valid = true;
    }
}

pub(super) fn copy(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    if !app.window(window_id).mark_valid {
        report_error(app, window_id, "no mark set".to_string());
        return;
    }
    let data = app.window(window_id).copy(app.file(file_id));
    app.state.clipboard = data;
    app.window_mut(window_id).mark_valid = false;
}

pub(super) fn cut(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    if !app.window(window_id).mark_valid {
        report_error(app, window_id, "no mark set".to_string());
        return;
    }
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    let data = window.cut(file);
    window.mark_valid = false;
    window.limit_cursor(file, region_width, region_height, region_x);
    app.state.clipboard = data;
}

pub(super) fn paste(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    if app.state.clipboard.is_empty() {
        return;
    }
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let data = app.state.clipboard.clone();
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    window.paste(file, &data);
    window.limit_cursor(file, region_width, region_height, region_x);
}

pub(super) fn dismiss_error(app: &mut App) {
    app.focused_window_mut().error_present = false;
}
