//! Maps a decoded [`mosaic_input::KeyCode`] to an [`Action`] the dispatcher
//! can apply to a pane. The mapping is a pure lookup — no state, no I/O —
//! split into an editor-mode table and a minibar-mode table, the same split
//! the original terminal front end makes between `editor_handle_keypress`
//! and `minibar_handle_keypress`.
//!
//! `ctrl-Q` (process exit) is deliberately absent from both tables: the
//! original checks for it once, ahead of either handler, so the main loop
//! is expected to do the same by matching `KeyCode::CtrlQ` before calling
//! [`dispatch`].

use mosaic_input::KeyCode;

/// Which keymap table a keystroke should be looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editor,
    Minibar,
}

/// One logical thing a keystroke can ask the dispatcher to do.
///
/// Every variant here is produced by a lookup table, never constructed by
/// inspecting arbitrary state — whether an action actually applies (a file
/// is loaded, a mark is set, a find is active) is the dispatcher's problem,
/// not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    PageUp,
    PageDown,
    Home,
    End,
    JumpToStart,
    JumpToEnd,

    FocusNext,
    FocusPrevious,

    ResizeGrow,
    ResizeShrink,
    ClosePane,
    SwapPane,

    InsertChar(u8),
    Tab,
    Newline,
    DeleteChar,
    DeleteWord,

    EnterOpen,
    EnterNew,
    EnterCommand,
    EnterFind,
    Save,
    ToggleMark,
    Cut,
    Copy,
    Paste,
    DismissError,

    MinibarInsertChar(u8),
    MinibarLeft,
    MinibarRight,
    MinibarHome,
    MinibarEnd,
    MinibarDeleteChar,
    MinibarDeleteWord,
    MinibarCommit,
    MinibarCancel,
    FindPrev,
    FindNext,
    FindJump,

    /// No binding for this keystroke in this mode.
    Noop,
}

/// Looks up the action for `code` in whichever table `mode` selects.
pub fn dispatch(mode: Mode, code: KeyCode) -> Action {
    let action = match mode {
        Mode::Editor => editor_action(code),
        Mode::Minibar => minibar_action(code),
    };
    if matches!(action, Action::Noop) {
        tracing::trace!(?mode, ?code, "unhandled keystroke");
    }
    action
}

fn editor_action(code: KeyCode) -> Action {
    match code {
        KeyCode::Up => Action::MoveUp,
        KeyCode::Down => Action::MoveDown,
        KeyCode::Left => Action::MoveLeft,
        KeyCode::Right => Action::MoveRight,
        KeyCode::ShiftUp => Action::PageUp,
        KeyCode::ShiftDown => Action::PageDown,
        KeyCode::ShiftHome => Action::JumpToStart,
        KeyCode::ShiftEnd => Action::JumpToEnd,
        KeyCode::Home => Action::Home,
        KeyCode::End => Action::End,

        KeyCode::ShiftRight => Action::FocusNext,
        KeyCode::ShiftLeft => Action::FocusPrevious,

        KeyCode::CtrlUp => Action::ResizeGrow,
        KeyCode::CtrlDown => Action::ResizeShrink,
        KeyCode::CtrlLeft => Action::ClosePane,
        KeyCode::CtrlRight => Action::SwapPane,

        KeyCode::CtrlDelete => Action::DeleteWord,
        KeyCode::Delete => Action::DeleteChar,
        KeyCode::Tab => Action::Tab,
        KeyCode::Enter => Action::Newline,
        KeyCode::Printable(b) => Action::InsertChar(b),

        KeyCode::CtrlG => Action::EnterOpen,
        KeyCode::CtrlN => Action::EnterNew,
        KeyCode::CtrlR => Action::EnterCommand,
        KeyCode::CtrlF => Action::EnterFind,
        KeyCode::CtrlS => Action::Save,
        KeyCode::CtrlB => Action::ToggleMark,
        KeyCode::CtrlX => Action::Cut,
        KeyCode::CtrlC => Action::Copy,
        KeyCode::CtrlV => Action::Paste,

        KeyCode::Escape => Action::DismissError,

        _ => Action::Noop,
    }
}

fn minibar_action(code: KeyCode) -> Action {
    match code {
        KeyCode::Printable(b) => Action::MinibarInsertChar(b),
        KeyCode::Left => Action::MinibarLeft,
        KeyCode::Right => Action::MinibarRight,
        KeyCode::Home => Action::MinibarHome,
        KeyCode::End => Action::MinibarEnd,
        KeyCode::CtrlDelete => Action::MinibarDeleteWord,
        KeyCode::Delete => Action::MinibarDeleteChar,
        KeyCode::Enter => Action::MinibarCommit,
        KeyCode::Escape => Action::MinibarCancel,

        // Only meaningful while a find is active; the dispatcher ignores
        // these outside find mode, the same way the original's switch
        // guards every one of these cases on `minibar_mode == MinibarModeFind`.
        KeyCode::Up => Action::FindPrev,
        KeyCode::Down => Action::FindNext,
        KeyCode::CtrlDown => Action::FindJump,

        _ => Action::Noop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn printable_inserts_in_either_mode() {
        assert_eq!(dispatch(Mode::Editor, KeyCode::Printable(b'x')), Action::InsertChar(b'x'));
        assert_eq!(dispatch(Mode::Minibar, KeyCode::Printable(b'x')), Action::MinibarInsertChar(b'x'));
    }

    #[test]
    fn ctrl_q_is_not_bound_in_either_table() {
        assert_eq!(dispatch(Mode::Editor, KeyCode::CtrlQ), Action::Noop);
        assert_eq!(dispatch(Mode::Minibar, KeyCode::CtrlQ), Action::Noop);
    }

    #[test]
    fn resize_keys_map_to_grow_and_shrink() {
        assert_eq!(dispatch(Mode::Editor, KeyCode::CtrlUp), Action::ResizeGrow);
        assert_eq!(dispatch(Mode::Editor, KeyCode::CtrlDown), Action::ResizeShrink);
    }

    #[test]
    fn minibar_up_down_are_find_navigation() {
        assert_eq!(dispatch(Mode::Minibar, KeyCode::Up), Action::FindPrev);
        assert_eq!(dispatch(Mode::Minibar, KeyCode::Down), Action::FindNext);
        assert_eq!(dispatch(Mode::Minibar, KeyCode::CtrlDown), Action::FindJump);
    }

    #[test]
    fn escape_means_different_things_per_mode() {
        assert_eq!(dispatch(Mode::Editor, KeyCode::Escape), Action::DismissError);
        assert_eq!(dispatch(Mode::Minibar, KeyCode::Escape), Action::MinibarCancel);
    }

    #[test]
    fn unbound_key_is_noop() {
        assert_eq!(dispatch(Mode::Editor, KeyCode::Unknown), Action::Noop);
    }
}
