//! Editor-wide state that outlives any single pane: the file arena, the
//! mapping from window to the file it shows, the clipboard, the color
//! theme table, and the run flag checked by the main loop each tick.
//!
//! Per-pane interaction state (cursor, scroll offset, mark, minibar) is
//! not kept here — see `mosaic-view` — because it is addressed by
//! [`mosaic_layout::WindowId`], which this crate treats the same way
//! `mosaic-layout` treats it: an opaque handle, not something to
//! dereference.

pub mod undo;

use mosaic_layout::WindowId;
use mosaic_text::highlight::HighlightRule;
use mosaic_text::{File, OpenError};

/// Opaque handle into the file arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(pub usize);

/// One named set of colors for every [`mosaic_text::color::ColorType`] slot.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub colors: [u32; mosaic_text::color::ColorType::COUNT],
}

impl Theme {
    pub fn color(&self, color: mosaic_text::color::ColorType) -> u32 {
        self.colors[color as usize]
    }
}

/// The two themes the original ships, by name and RGB value.
pub fn built_in_themes() -> Vec<Theme> {
    use mosaic_text::color::ColorType::*;

    // Index matches ColorType's declaration order in both themes below.
    let slot = |cursor, fg, bg, mcursor, mfg, mbg, merr, sfg, sbg, mtfg, mtbg, comment, mlcomment,
                keyword, string, ch, number| {
        let mut colors = [0u32; mosaic_text::color::ColorType::COUNT];
        colors[EditorCursor as usize] = cursor;
        colors[EditorForeground as usize] = fg;
        colors[EditorBackground as usize] = bg;
        colors[MinibarCursor as usize] = mcursor;
        colors[MinibarForeground as usize] = mfg;
        colors[MinibarBackground as usize] = mbg;
        colors[MinibarError as usize] = merr;
        colors[SelectedMatchForeground as usize] = sfg;
        colors[SelectedMatchBackground as usize] = sbg;
        colors[MatchForeground as usize] = mtfg;
        colors[MatchBackground as usize] = mtbg;
        colors[Comment as usize] = comment;
        colors[MultilineComment as usize] = mlcomment;
        colors[Keyword as usize] = keyword;
        colors[String as usize] = string;
        colors[Char as usize] = ch;
        colors[Number as usize] = number;
        colors
    };

    vec![
        Theme {
            name: "default".to_string(),
            colors: slot(
                0x000000, 0x000000, 0xffffff, 0x082626, 0x082626, 0xd6b58d, 0xff0000, 0x082626,
                0xd1b897, 0x082626, 0x0a3f4a, 0x44b340, 0x00ff00, 0x8cde94, 0xc1d1e3, 0xff0000,
                0xc1d1e3,
            ),
        },
        Theme {
            name: "blow".to_string(),
            colors: slot(
                0xd1b897, 0xd1b897, 0x082626, 0x082626, 0x082626, 0xd6b58d, 0xff0000, 0x082626,
                0xd1b897, 0x082626, 0x0a3f4a, 0x44b340, 0x00ff00, 0x8cde94, 0xc1d1e3, 0xff0000,
                0xc1d1e3,
            ),
        },
    ]
}

/// Editor-wide state shared by every window: open files, the clipboard,
/// the color theme table, and the run flag the main loop polls each tick.
pub struct EditorState {
    files: Vec<File>,
    window_files: Vec<Option<FileId>>,
    free_window_slots: Vec<usize>,
    pub clipboard: Vec<u8>,
    themes: Vec<Theme>,
    current_theme: usize,
    pub running: bool,
    pub undo: undo::UndoEngine,
}

impl EditorState {
    pub fn new(themes: Vec<Theme>) -> Self {
        let current_theme = themes.len().saturating_sub(1);
        EditorState {
            files: Vec::new(),
            window_files: Vec::new(),
            free_window_slots: Vec::new(),
            clipboard: Vec::new(),
            themes,
            current_theme,
            running: true,
            undo: undo::UndoEngine::new(),
        }
    }

    /// Returns the `FileId` of an already-open file matching `path`, or
    /// opens it fresh from disk and adds it to the arena.
    pub fn open_or_get_file(
        &mut self,
        path: impl Into<std::path::PathBuf>,
        rules: &[HighlightRule],
    ) -> Result<FileId, OpenError> {
        let path = path.into();
        if let Some(id) = self.find_file_by_path(&path) {
            return Ok(id);
        }
        let file = File::open(path, rules)?;
        Ok(self.push_file(file))
    }

    /// Always allocates a brand-new, empty file, even if `path` is already
    /// open elsewhere (mirrors the original's `create_file`, used for the
    /// minibar `new:` prompt).
    pub fn create_file(
        &mut self,
        path: impl Into<std::path::PathBuf>,
        rules: &[HighlightRule],
    ) -> FileId {
        self.push_file(File::create(path, rules))
    }

    fn find_file_by_path(&self, path: &std::path::Path) -> Option<FileId> {
        self.files
            .iter()
            .position(|f| f.path == path)
            .map(FileId)
    }

    fn push_file(&mut self, file: File) -> FileId {
        let id = FileId(self.files.len());
        tracing::debug!(file = ?id, path = ?file.path, "file added to arena");
        self.files.push(file);
        id
    }

    pub fn file(&self, id: FileId) -> &File {
        &self.files[id.0]
    }

    pub fn file_mut(&mut self, id: FileId) -> &mut File {
        &mut self.files[id.0]
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Reserves a window slot bound to `file` and returns its handle.
    pub fn alloc_window(&mut self, file: FileId) -> WindowId {
        if let Some(slot) = self.free_window_slots.pop() {
            self.window_files[slot] = Some(file);
            WindowId(slot)
        } else {
            let slot = self.window_files.len();
            self.window_files.push(Some(file));
            WindowId(slot)
        }
    }

    /// Reserves a window slot with no file bound to it yet, for a pane
    /// freshly created by a split (§4.4: "the new pane initially has no
    /// file").
    pub fn alloc_empty_window(&mut self) -> WindowId {
        if let Some(slot) = self.free_window_slots.pop() {
            self.window_files[slot] = None;
            WindowId(slot)
        } else {
            let slot = self.window_files.len();
            self.window_files.push(None);
            WindowId(slot)
        }
    }

    /// Releases a window slot so a future `alloc_window` call can reuse it.
    pub fn free_window(&mut self, id: WindowId) {
        if let Some(slot) = self.window_files.get_mut(id.0) {
            *slot = None;
            self.free_window_slots.push(id.0);
        }
    }

    pub fn window_file(&self, id: WindowId) -> Option<FileId> {
        self.window_files.get(id.0).copied().flatten()
    }

    pub fn set_window_file(&mut self, id: WindowId, file: FileId) {
        if let Some(slot) = self.window_files.get_mut(id.0) {
            *slot = Some(file);
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.themes[self.current_theme]
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Sets the active theme by index, clamping to the last valid entry
    /// rather than erroring on an out-of-range value.
    pub fn set_theme_index(&mut self, index: usize) {
        self.current_theme = index.min(self.themes.len().saturating_sub(1));
    }

    /// Sets the active theme by name. A no-op (returns `false`) if no
    /// theme with that name exists, matching the original command
    /// handler's silent-ignore behavior for unresolvable names.
    pub fn set_theme_by_name(&mut self, name: &str) -> bool {
        if let Some(index) = self.themes.iter().position(|t| t.name == name) {
            self.current_theme = index;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_or_get_dedups_by_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.c");
        std::fs::write(&path, "int x;\n").unwrap();
        let mut state = EditorState::new(built_in_themes());
        let a = state.open_or_get_file(&path, &[]).unwrap();
        let b = state.open_or_get_file(&path, &[]).unwrap();
        assert_eq!(a, b);
        assert_eq!(state.file_count(), 1);
    }

    #[test]
    fn create_file_always_allocates() {
        let mut state = EditorState::new(built_in_themes());
        let a = state.create_file("untitled", &[]);
        let b = state.create_file("untitled", &[]);
        assert_ne!(a, b);
        assert_eq!(state.file_count(), 2);
    }

    #[test]
    fn alloc_empty_window_has_no_file() {
        let mut state = EditorState::new(built_in_themes());
        let w = state.alloc_empty_window();
        assert_eq!(state.window_file(w), None);
    }

    #[test]
    fn window_slots_are_recycled() {
        let mut state = EditorState::new(built_in_themes());
        let file = state.create_file("a", &[]);
        let w1 = state.alloc_window(file);
        state.free_window(w1);
        let w2 = state.alloc_window(file);
        assert_eq!(w1, w2);
    }

    #[test]
    fn theme_index_clamps_out_of_range() {
        let mut state = EditorState::new(built_in_themes());
        state.set_theme_index(999);
        assert_eq!(state.theme().name, "blow");
    }

    #[test]
    fn theme_by_unknown_name_is_noop() {
        let mut state = EditorState::new(built_in_themes());
        let before = state.theme().name.clone();
        assert!(!state.set_theme_by_name("nonexistent"));
        assert_eq!(state.theme().name, before);
    }

    #[test]
    fn theme_by_name_switches() {
        let mut state = EditorState::new(built_in_themes());
        assert!(state.set_theme_by_name("default"));
        assert_eq!(state.theme().name, "default");
    }
}
