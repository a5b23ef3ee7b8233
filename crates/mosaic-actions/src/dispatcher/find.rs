//! Incremental find: rebuilds the focused pane's match list against its
//! minibar pattern on every edit while the find prompt is open, and moves
//! the cursor among matches on navigation.

use super::reconcile_editor_offsets;
use crate::App;

/// Divisor for the ctrl-down "skip ahead" step (§4.7: "jumps by
/// `1 + matches/50`").
const JUMP_DIVISOR: i32 = 50;

/// Re-scans the focused file for the pane's current minibar pattern. A
/// scan aborted by pending input (`mosaic_find::scan_file` returning
/// `None`) leaves the previous match list untouched, so a fast typist
/// never sees a half-finished scan flash onto the screen.
pub(super) fn rescan(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let pattern = app.window(window_id).minibar_data.clone();
    let lines: Vec<Vec<u8>> = app.file(file_id).lines.iter().map(|l| l.chars.clone()).collect();

    let result = mosaic_find::scan_file(
        &pattern,
        lines.iter().map(|l| l.as_slice()),
        mosaic_input::input_is_pending,
    );

    if let Some(matches) = result {
        let window = app.window_mut(window_id);
        window.matches = matches
            .into_iter()
            .map(|m| mosaic_view::Match { x: m.x, y: m.y })
            .collect();
        window.match_index = 0;
    }

    goto_current_match(app);
}

pub(super) fn navigate(app: &mut App, delta: i32) {
    let window = app.focused_window_mut();
    let len = window.matches.len() as i32;
    if len == 0 {
        return;
    }
    window.match_index = (window.match_index + delta).rem_euclid(len);
    goto_current_match(app);
}

pub(super) fn jump(app: &mut App) {
    let window = app.focused_window_mut();
    let len = window.matches.len() as i32;
    if len == 0 {
        return;
    }
    let step = 1 + len / JUMP_DIVISOR;
    window.match_index = (window.match_index + step).rem_euclid(len);
    goto_current_match(app);
}

/// Moves the cursor to the currently selected match, if there is one, and
/// reconciles offsets against the new position.
fn goto_current_match(app: &mut App) {
    let window = app.focused_window_mut();
    let Some(&m) = window.matches.get(window.match_index as usize) else {
        return;
    };
    window.cursor_x = m.x;
    window.cursor_y = m.y;
    reconcile_editor_offsets(app);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::tests::new_app;
    use mosaic_view::MinibarMode;

    fn type_pattern(app: &mut App, pattern: &[u8]) {
        super::super::minibar::enter(app, MinibarMode::Find);
        for &b in pattern {
            super::super::minibar::insert_char(app, b);
        }
    }

    #[test]
    fn rescan_finds_all_occurrences_on_one_line() {
        let mut app = new_app();
        for b in b"hello hello hello" {
            super::super::editing::insert_char(&mut app, *b);
        }
        app.focused_window_mut().cursor_x = 0;
        type_pattern(&mut app, b"hello");
        assert_eq!(app.focused_window().matches.len(), 3);
        assert_eq!(app.focused_window().match_index, 0);
    }

    #[test]
    fn navigate_wraps_around_match_list() {
        let mut app = new_app();
        for b in b"hello hello hello" {
            super::super::editing::insert_char(&mut app, *b);
        }
        type_pattern(&mut app, b"hello");
        navigate(&mut app, -1);
        assert_eq!(app.focused_window().match_index, 2);
        assert_eq!(app.focused_window().cursor_x, 12);
    }

    #[test]
    fn navigate_with_no_matches_is_a_noop() {
        let mut app = new_app();
        type_pattern(&mut app, b"xyz");
        let cursor_before = (app.focused_window().cursor_x, app.focused_window().cursor_y);
        navigate(&mut app, 1);
        assert_eq!((app.focused_window().cursor_x, app.focused_window().cursor_y), cursor_before);
    }
}
