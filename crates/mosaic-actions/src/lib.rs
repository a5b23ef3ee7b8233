//! The dispatcher: the only place an [`mosaic_keymap::Action`] turns into a
//! mutation of the file arena, a pane's view state, or the region tree.
//!
//! [`App`] is the aggregate runtime state one level above what any single
//! crate below it owns — it pairs `mosaic_state::EditorState` (files,
//! clipboard, themes) and `mosaic_layout::LayoutTree` (region geometry)
//! with the one thing neither of those crates can hold without creating a
//! dependency cycle: the `mosaic_view::Window` belonging to each pane.

pub mod dispatcher;

use mosaic_layout::{LayoutTree, RegionId, WindowId};
use mosaic_state::{EditorState, FileId};
use mosaic_text::highlight::HighlightRule;
use mosaic_view::Window;

pub use dispatcher::dispatch;

/// Editor-wide runtime state: the file/clipboard/theme arena, the pane
/// geometry tree, and the view state of every pane currently laid out.
pub struct App {
    pub state: EditorState,
    pub layout: LayoutTree,
    pub rules: Vec<HighlightRule>,
    windows: Vec<Option<Window>>,
    focused: WindowId,
    /// Whether the previous keystroke inserted an open brace, consulted by
    /// `Newline` to decide whether to auto-close it. Reset after every
    /// keystroke that isn't itself a brace insertion.
    brace_pending: bool,
}

impl App {
    /// Builds the runtime around an already-laid-out tree whose root window
    /// has already been registered with `state` and inserted via
    /// [`App::insert_window`].
    pub fn new(state: EditorState, layout: LayoutTree, rules: Vec<HighlightRule>, root_window: WindowId) -> Self {
        App {
            state,
            layout,
            rules,
            windows: Vec::new(),
            focused: root_window,
            brace_pending: false,
        }
    }

    /// Registers (or replaces) the view state for a window slot allocated
    /// through `state.alloc_window`.
    pub fn insert_window(&mut self, id: WindowId, window: Window) {
        if self.windows.len() <= id.0 {
            self.windows.resize_with(id.0 + 1, || None);
        }
        self.windows[id.0] = Some(window);
    }

    /// Frees a pane's view-state slot after the region tree has dropped its
    /// region. The `WindowId` itself is released back to `state` by the
    /// caller so it can be recycled by a future split.
    pub fn remove_window(&mut self, id: WindowId) {
        if let Some(slot) = self.windows.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn window(&self, id: WindowId) -> &Window {
        self.windows[id.0].as_ref().expect("window slot populated")
    }

    pub fn window_mut(&mut self, id: WindowId) -> &mut Window {
        self.windows[id.0].as_mut().expect("window slot populated")
    }

    pub fn focused_window_id(&self) -> WindowId {
        self.focused
    }

    pub fn set_focused_window_id(&mut self, id: WindowId) {
        self.focused = id;
    }

    pub fn focused_window(&self) -> &Window {
        self.window(self.focused)
    }

    pub fn focused_window_mut(&mut self) -> &mut Window {
        self.window_mut(self.focused)
    }

    pub fn brace_pending(&self) -> bool {
        self.brace_pending
    }

    pub fn set_brace_pending(&mut self, pending: bool) {
        self.brace_pending = pending;
    }

    /// The region currently holding the focused window. Recomputed from the
    /// layout tree on demand rather than cached, so a region id invalidated
    /// by a split/close/swap never goes stale.
    pub fn focused_region(&self) -> RegionId {
        self.layout
            .leaf_for_window(self.focused)
            .expect("focused window is always laid out somewhere")
    }

    /// Every currently laid-out `(region, window)` pair, for the renderer to
    /// walk.
    pub fn panes(&self) -> Vec<(RegionId, WindowId)> {
        self.layout
            .leaves()
            .into_iter()
            .map(|r| (r, self.layout.window_of(r).expect("leaf has a window")))
            .collect()
    }

    pub fn file(&self, id: FileId) -> &mosaic_text::File {
        self.state.file(id)
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut mosaic_text::File {
        self.state.file_mut(id)
    }

    /// Borrows a window and a file simultaneously, mutably. Both live in
    /// disjoint arenas (`windows` vs `state`'s file list), so this is safe
    /// even though both borrows are `&mut` — it just has to go through one
    /// function to prove that to the borrow checker.
    pub fn window_and_file_mut(&mut self, window_id: WindowId, file_id: FileId) -> (&mut Window, &mut mosaic_text::File) {
        let window = self.windows[window_id.0].as_mut().expect("window slot populated");
        let file = self.state.file_mut(file_id);
        (window, file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_state::built_in_themes;

    fn new_app() -> (App, WindowId) {
        let mut state = EditorState::new(built_in_themes());
        let file = state.create_file("untitled", &[]);
        let window_id = state.alloc_window(file);
        let layout = LayoutTree::new(100, 40, window_id);
        let mut app = App::new(state, layout, Vec::new(), window_id);
        app.insert_window(window_id, Window::new(Some(file)));
        (app, window_id)
    }

    #[test]
    fn focused_region_tracks_the_root_window() {
        let (app, window_id) = new_app();
        assert_eq!(app.layout.window_of(app.focused_region()), Some(window_id));
    }

    #[test]
    fn panes_lists_the_single_root_pane() {
        let (app, window_id) = new_app();
        assert_eq!(app.panes(), vec![(app.layout.root(), window_id)]);
    }
}
