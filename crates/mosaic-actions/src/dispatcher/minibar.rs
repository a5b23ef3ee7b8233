//! The minibar prompt: text editing of its own one-line buffer, and what
//! happens on commit for each of the four modes it can be in.

use mosaic_view::{MinibarMode, Window};

use super::command::{ParsedCommand, SplitAxis, ThemeTarget};
use super::{command, find, layout, reconcile_editor_offsets, region_geom, report_error};
use crate::App;

/// Horizontal scroll margins for the minibar's own cursor, half the main
/// buffer's (§4.6: "margins 5/5").
const MINIBAR_MARGIN: i32 = 5;

pub(super) fn enter(app: &mut App, mode: MinibarMode) {
    app.focused_window_mut().enter_minibar_mode(mode);
}

fn reconcile_minibar_offset(app: &mut App) {
    let window_id = app.focused_window_id();
    let (_, _, region_width, _) = region_geom(app);
    let window = app.window_mut(window_id);
    let width = region_width - window.minibar_mode.prompt().len() as i32;
    window.minibar_offset = Window::updated_offset(
        window.minibar_cursor,
        window.minibar_offset,
        width,
        MINIBAR_MARGIN,
        MINIBAR_MARGIN,
    );
}

/// Re-scans for matches after a pattern edit, but only while the find
/// prompt is the one open.
fn rescan_if_find(app: &mut App) {
    if app.focused_window().minibar_mode == MinibarMode::Find {
        find::rescan(app);
    }
}

pub(super) fn insert_char(app: &mut App, b: u8) {
    let window = app.focused_window_mut();
    let at = window.minibar_cursor as usize;
    window.minibar_data.insert(at, b);
    window.minibar_cursor += 1;
    reconcile_minibar_offset(app);
    rescan_if_find(app);
}

pub(super) fn left(app: &mut App) {
    let window = app.focused_window_mut();
    window.minibar_cursor = (window.minibar_cursor - 1).max(0);
    reconcile_minibar_offset(app);
}

pub(super) fn right(app: &mut App) {
    let window = app.focused_window_mut();
    let len = window.minibar_data.len() as i32;
    window.minibar_cursor = (window.minibar_cursor + 1).min(len);
    reconcile_minibar_offset(app);
}

pub(super) fn home(app: &mut App) {
    app.focused_window_mut().minibar_cursor = 0;
    reconcile_minibar_offset(app);
}

pub(super) fn end(app: &mut App) {
    let window = app.focused_window_mut();
    window.minibar_cursor = window.minibar_data.len() as i32;
    reconcile_minibar_offset(app);
}

pub(super) fn delete(app: &mut App, whole_word: bool) {
    let window = app.focused_window_mut();
    if window.minibar_cursor == 0 {
        return;
    }
    let count = Window::delete_count(&window.minibar_data, window.minibar_cursor, whole_word) as usize;
    let end = window.minibar_cursor as usize;
    let start = end.saturating_sub(count);
    window.minibar_data.drain(start..end);
    window.minibar_cursor = start as i32;
    reconcile_minibar_offset(app);
    rescan_if_find(app);
}

pub(super) fn commit(app: &mut App) {
    match app.focused_window().minibar_mode {
        MinibarMode::Open => commit_open(app),
        MinibarMode::New => commit_new(app),
        MinibarMode::Command => commit_command(app),
        MinibarMode::Find => commit_find(app),
    }
}

fn minibar_text(app: &App) -> String {
    String::from_utf8_lossy(&app.focused_window().minibar_data).into_owned()
}

fn commit_open(app: &mut App) {
    let window_id = app.focused_window_id();
    let path = minibar_text(app);
    match app.state.open_or_get_file(path, &app.rules) {
        Ok(file_id) => {
            app.window_mut(window_id).change_file(file_id);
            app.window_mut(window_id).exit_minibar_mode();
            reconcile_editor_offsets(app);
        }
        Err(err) => {
            app.window_mut(window_id).exit_minibar_mode();
            report_error(app, window_id, err.to_string());
        }
    }
}

fn commit_new(app: &mut App) {
    let window_id = app.focused_window_id();
    let path = minibar_text(app);
    let file_id = app.state.create_file(path, &app.rules);
    app.window_mut(window_id).change_file(file_id);
    app.window_mut(window_id).exit_minibar_mode();
    reconcile_editor_offsets(app);
}

fn commit_command(app: &mut App) {
    let window_id = app.focused_window_id();
    let raw = minibar_text(app);
    app.window_mut(window_id).exit_minibar_mode();

    match command::parse(&raw) {
        ParsedCommand::Split(axis) => layout::split(app, axis == SplitAxis::Vertical),
        ParsedCommand::Theme(ThemeTarget::Index(index)) => app.state.set_theme_index(index),
        ParsedCommand::Theme(ThemeTarget::Name(name)) => {
            app.state.set_theme_by_name(&name);
        }
        ParsedCommand::Close => layout::close(app),
        ParsedCommand::Unknown(text) => {
            report_error(app, window_id, format!("unknown command: {text}"));
        }
    }
}

fn commit_find(app: &mut App) {
    app.focused_window_mut().exit_minibar_mode();
}

pub(super) fn cancel(app: &mut App) {
    let window_id = app.focused_window_id();
    {
        let window = app.window_mut(window_id);
        if window.minibar_mode == MinibarMode::Find {
            window.cursor_x = window.saved_cursor_x;
            window.cursor_y = window.saved_cursor_y;
        }
        window.exit_minibar_mode();
    }
    reconcile_editor_offsets(app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::tests::new_app;

    #[test]
    fn insert_char_grows_minibar_buffer() {
        let mut app = new_app();
        enter(&mut app, MinibarMode::Command);
        insert_char(&mut app, b'x');
        assert_eq!(app.focused_window().minibar_data, b"x");
        assert_eq!(app.focused_window().minibar_cursor, 1);
    }

    #[test]
    fn commit_unknown_command_reports_error() {
        let mut app = new_app();
        enter(&mut app, MinibarMode::Command);
        for b in b"bogus" {
            insert_char(&mut app, *b);
        }
        commit(&mut app);
        assert!(!app.focused_window().minibar_active);
        assert!(app.focused_window().error_present);
    }

    #[test]
    fn commit_split_command_creates_pane() {
        let mut app = new_app();
        enter(&mut app, MinibarMode::Command);
        for b in b"split |" {
            insert_char(&mut app, *b);
        }
        commit(&mut app);
        assert_eq!(app.panes().len(), 2);
    }

    #[test]
    fn cancel_in_find_mode_restores_saved_cursor() {
        let mut app = new_app();
        app.focused_window_mut().cursor_x = 3;
        enter(&mut app, MinibarMode::Find);
        app.focused_window_mut().cursor_x = 9;
        cancel(&mut app);
        assert_eq!(app.focused_window().cursor_x, 3);
        assert!(!app.focused_window().minibar_active);
    }

    #[test]
    fn commit_new_switches_to_fresh_file() {
        let mut app = new_app();
        let original_file = app.focused_window().file;
        enter(&mut app, MinibarMode::New);
        for b in b"scratch.c" {
            insert_char(&mut app, *b);
        }
        commit(&mut app);
        assert_ne!(app.focused_window().file, original_file);
        assert!(!app.focused_window().minibar_active);
    }
}
