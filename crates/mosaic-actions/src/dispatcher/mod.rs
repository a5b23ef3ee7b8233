//! Turns one [`mosaic_keymap::Action`] into a mutation of [`crate::App`].
//!
//! Split into the same handful of concerns the original's two keypress
//! handlers (`editor_handle_keypress`/`minibar_handle_keypress`) cover:
//! cursor motion and block editing (`editing`), the region tree
//! (`layout`), the minibar prompt and its command grammar
//! (`minibar`/`command`), and incremental find (`find`).

pub mod command;
mod editing;
mod find;
mod layout;
mod minibar;

use mosaic_keymap::{Action, Mode};
use mosaic_layout::WindowId;

use crate::App;

/// Which keymap table the next keystroke should be looked up in, derived
/// from whether the focused pane's minibar is active.
pub fn mode(app: &App) -> Mode {
    if app.focused_window().minibar_active {
        Mode::Minibar
    } else {
        Mode::Editor
    }
}

/// Applies `action` to `app`. A `Noop` (unbound keystroke) does nothing.
///
/// Every action except inserting an open brace clears `brace_pending`, so
/// `Newline`'s smart-indent only auto-closes a brace typed on the
/// immediately preceding keystroke (§4.3).
pub fn dispatch(app: &mut App, action: Action) {
    if !matches!(action, Action::InsertChar(b'{') | Action::Newline) {
        app.set_brace_pending(false);
    }

    match action {
        Action::MoveUp
        | Action::MoveDown
        | Action::MoveLeft
        | Action::MoveRight
        | Action::PageUp
        | Action::PageDown
        | Action::Home
        | Action::End
        | Action::JumpToStart
        | Action::JumpToEnd => editing::motion(app, action),

        Action::FocusNext => layout::focus_next(app),
        Action::FocusPrevious => layout::focus_previous(app),
        Action::ResizeGrow => layout::resize(app, layout::RESIZE_STEP),
        Action::ResizeShrink => layout::resize(app, -layout::RESIZE_STEP),
        Action::ClosePane => layout::close(app),
        Action::SwapPane => layout::swap(app),

        Action::InsertChar(b) => editing::insert_char(app, b),
        Action::Tab => editing::tab(app),
        Action::Newline => editing::newline(app),
        Action::DeleteChar => editing::delete(app, false),
        Action::DeleteWord => editing::delete(app, true),

        Action::EnterOpen => minibar::enter(app, mosaic_view::MinibarMode::Open),
        Action::EnterNew => minibar::enter(app, mosaic_view::MinibarMode::New),
        Action::EnterCommand => minibar::enter(app, mosaic_view::MinibarMode::Command),
        Action::EnterFind => minibar::enter(app, mosaic_view::MinibarMode::Find),
        Action::Save => editing::save(app),
        Action::ToggleMark => editing::toggle_mark(app),
        Action::Cut => editing::cut(app),
        Action::Copy => editing::copy(app),
        Action::Paste => editing::paste(app),
        Action::DismissError => editing::dismiss_error(app),

        Action::MinibarInsertChar(b) => minibar::insert_char(app, b),
        Action::MinibarLeft => minibar::left(app),
        Action::MinibarRight => minibar::right(app),
        Action::MinibarHome => minibar::home(app),
        Action::MinibarEnd => minibar::end(app),
        Action::MinibarDeleteChar => minibar::delete(app, false),
        Action::MinibarDeleteWord => minibar::delete(app, true),
        Action::MinibarCommit => minibar::commit(app),
        Action::MinibarCancel => minibar::cancel(app),
        Action::FindPrev => find::navigate(app, -1),
        Action::FindNext => find::navigate(app, 1),
        Action::FindJump => find::jump(app),

        Action::Noop => {}
    }
}

/// `(x, y, width, height)` of the region the focused pane occupies, the
/// shape every view-controller call in `mosaic-view` wants its geometry
/// arguments in.
pub(crate) fn region_geom(app: &App) -> (i32, i32, i32, i32) {
    let region = app.focused_region();
    app.layout.geometry(region)
}

/// Re-clamps the focused pane's cursor into its file and reconciles scroll
/// offsets against the current region geometry. Called after every action
/// that can move the cursor or mutate the buffer.
pub(crate) fn reconcile_editor_offsets(app: &mut App) {
    let window_id = app.focused_window_id();
    let Some(file_id) = app.window(window_id).file else {
        return;
    };
    let (region_x, _region_y, region_width, region_height) = region_geom(app);
    let (window, file) = app.window_and_file_mut(window_id, file_id);
    window.limit_cursor(file, region_width, region_height, region_x);
}

/// Surfaces a user-input error on `window_id`'s status row, per §7: input
/// errors never propagate past the pane they occur in.
pub(crate) fn report_error(app: &mut App, window_id: WindowId, message: String) {
    let window = app.window_mut(window_id);
    window.error_present = true;
    window.error_message = message;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_layout::LayoutTree;
    use mosaic_state::{built_in_themes, EditorState};
    use mosaic_text::highlight::built_in_rules;
    use mosaic_view::Window;

    pub(crate) fn new_app() -> App {
        let rules = built_in_rules();
        let mut state = EditorState::new(built_in_themes());
        let file = state.create_file("untitled.c", &rules);
        let window_id = state.alloc_window(file);
        let layout = LayoutTree::new(100, 40, window_id);
        let mut app = App::new(state, layout, rules, window_id);
        app.insert_window(window_id, Window::new(Some(file)));
        app
    }

    #[test]
    fn mode_follows_minibar_active() {
        let mut app = new_app();
        assert_eq!(mode(&app), Mode::Editor);
        app.focused_window_mut().minibar_active = true;
        assert_eq!(mode(&app), Mode::Minibar);
    }

    #[test]
    fn insert_char_action_mutates_the_focused_file() {
        let mut app = new_app();
        dispatch(&mut app, Action::InsertChar(b'x'));
        let file_id = app.focused_window().file.unwrap();
        assert_eq!(app.file(file_id).lines.get(0).unwrap().chars, b"x");
    }

    #[test]
    fn noop_action_changes_nothing_observable() {
        let mut app = new_app();
        let cursor_before = (app.focused_window().cursor_x, app.focused_window().cursor_y);
        dispatch(&mut app, Action::Noop);
        let cursor_after = (app.focused_window().cursor_x, app.focused_window().cursor_y);
        assert_eq!(cursor_before, cursor_after);
    }
}
