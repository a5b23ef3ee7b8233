//! Per-pane view state and the pure editing operations that act on it:
//! cursor and scroll-offset tracking, cursor-margin scrolling, smart-indent
//! newline insertion, character/word deletion, and block mark/copy/cut/
//! paste. A `Window` never owns the file it shows — it addresses one
//! through a [`mosaic_state::FileId`] and mutates it through a borrowed
//! [`mosaic_text::File`] passed into each operation.

use mosaic_state::FileId;
use mosaic_text::File;

pub const CURSOR_MARGIN_TOP: i32 = 6;
pub const CURSOR_MARGIN_BOTTOM: i32 = 6;
pub const CURSOR_MARGIN_LEFT: i32 = 6;
pub const CURSOR_MARGIN_RIGHT: i32 = 6;
pub const SPACES_PER_TAB: i32 = 2;
pub const LINE_NUMBER_MARGIN: i32 = 2;
pub const MINIBAR_ROWS: i32 = 1;

/// A single match from the last find scan, line-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinibarMode {
    Open,
    New,
    Command,
    Find,
}

impl MinibarMode {
    pub fn prompt(&self) -> &'static str {
        match self {
            MinibarMode::Open => "open: ",
            MinibarMode::New => "new: ",
            MinibarMode::Command => "command: ",
            MinibarMode::Find => "find: ",
        }
    }
}

/// Cursor/offset/mark state cached per file a window has previously shown,
/// restored by [`Window::change_file`] so switching files doesn't lose your
/// place in each one.
#[derive(Debug, Clone, Copy)]
struct FileViewState {
    file: FileId,
    cursor_x: i32,
    cursor_y: i32,
    cursor_x_ideal: i32,
    offset_x: i32,
    offset_y: i32,
    mark_x: i32,
    mark_y: i32,
    mark_valid: bool,
}

/// One pane: the file it shows plus everything about how it's being
/// viewed and edited.
pub struct Window {
    pub file: Option<FileId>,

    pub cursor_x: i32,
    pub cursor_y: i32,
    pub cursor_x_ideal: i32,

    pub offset_x: i32,
    pub offset_y: i32,

    pub mark_x: i32,
    pub mark_y: i32,
    pub mark_valid: bool,

    pub minibar_active: bool,
    pub minibar_mode: MinibarMode,
    pub minibar_cursor: i32,
    pub minibar_offset: i32,
    pub minibar_data: Vec<u8>,

    pub error_present: bool,
    pub error_message: String,

    pub matches: Vec<Match>,
    pub match_index: i32,

    pub saved_cursor_x: i32,
    pub saved_cursor_y: i32,

    pub redraw: bool,

    file_states: Vec<FileViewState>,
}

impl Window {
    pub fn new(file: Option<FileId>) -> Self {
        Window {
            file,
            cursor_x: 0,
            cursor_y: 0,
            cursor_x_ideal: 0,
            offset_x: 0,
            offset_y: 0,
            mark_x: 0,
            mark_y: 0,
            mark_valid: false,
            minibar_active: false,
            minibar_mode: MinibarMode::Command,
            minibar_cursor: 0,
            minibar_offset: 0,
            minibar_data: Vec::new(),
            error_present: false,
            error_message: String::new(),
            matches: Vec::new(),
            match_index: 0,
            saved_cursor_x: 0,
            saved_cursor_y: 0,
            redraw: true,
            file_states: Vec::new(),
        }
    }

    /// Left margin in columns: a one-column separator if this pane isn't
    /// screen-leftmost, plus a right-aligned line-number gutter, plus a
    /// fixed gap.
    pub fn left_padding(&self, file: &File, region_x: i32) -> i32 {
        let separator = if region_x > 0 { 2 } else { 0 };
        let digits = count_digits(file.lines.len().saturating_sub(1) as i32);
        separator + digits + LINE_NUMBER_MARGIN
    }

    /// The pane's usable text area, after the gutter and the minibar row
    /// are subtracted from the raw region geometry.
    pub fn active_size(&self, file: &File, region_width: i32, region_height: i32, region_x: i32) -> (i32, i32) {
        let width = region_width - self.left_padding(file, region_x);
        let height = region_height - MINIBAR_ROWS;
        (width, height)
    }

    /// Slides `offset` just enough to keep `cursor` within `[left_margin,
    /// width - right_margin)`, never scrolling further than needed.
    pub fn updated_offset(cursor: i32, offset: i32, width: i32, left_margin: i32, right_margin: i32) -> i32 {
        let mut offset = offset;
        let adjust = offset + left_margin - cursor;
        if adjust > 0 {
            offset = (offset - adjust).max(0);
        }

        let adjust = cursor - (offset + width - right_margin);
        if adjust > 0 {
            offset += adjust;
        }

        offset
    }

    pub fn update_offsets(&mut self, file: &File, region_width: i32, region_height: i32, region_x: i32) {
        let prev_x = self.offset_x;
        let prev_y = self.offset_y;
        let (width, height) = self.active_size(file, region_width, region_height, region_x);

        self.offset_x = Self::updated_offset(self.cursor_x, self.offset_x, width, CURSOR_MARGIN_LEFT, CURSOR_MARGIN_RIGHT);
        self.offset_y = Self::updated_offset(self.cursor_y, self.offset_y, height, CURSOR_MARGIN_TOP, CURSOR_MARGIN_BOTTOM);

        if self.offset_x != prev_x || self.offset_y != prev_y {
            self.redraw = true;
        }
    }

    /// Clamps the cursor to a valid position in `file` and reconciles the
    /// scroll offset against it. Called after every cursor-moving action.
    pub fn limit_cursor(&mut self, file: &File, region_width: i32, region_height: i32, region_x: i32) {
        self.cursor_y = self.cursor_y.max(0).min(file.lines.len() as i32 - 1);
        let line_len = file
            .lines
            .get(self.cursor_y as usize)
            .map(|l| l.len() as i32)
            .unwrap_or(0);
        self.cursor_x = self.cursor_x.max(0).min(line_len);
        self.update_offsets(file, region_width, region_height, region_x);
    }

    pub fn update_cursor_x(&mut self, x: i32) {
        self.cursor_x = x;
        self.cursor_x_ideal = x;
    }

    pub fn update_cursor_y(&mut self, y: i32) {
        self.cursor_y = y;
        self.cursor_x = self.cursor_x_ideal;
    }

    pub fn update_offset_y(&mut self, file: &File, offset: i32) {
        self.offset_y = offset.max(0).min(file.lines.len() as i32);
        self.redraw = true;
    }

    /// Home key: jump to the first non-space column, or to column 0 if
    /// already there or past it.
    pub fn smart_home(&mut self, file: &File) {
        let line = &file.lines.as_slice()[self.cursor_y as usize];
        let spaces = leading_spaces(&line.chars) as i32;
        if self.cursor_x > spaces {
            self.update_cursor_x(spaces);
        } else {
            self.update_cursor_x(0);
        }
    }

    pub fn insert_char(&mut self, file: &mut File, c: u8) {
        let y = self.cursor_y as usize;
        let x = self.cursor_x as usize;
        let line = file.lines.get_mut(y).expect("cursor_y in range");
        line.chars.insert(x, c);
        file.reclassify_line(y);
        self.cursor_x += 1;
        self.cursor_x_ideal = self.cursor_x;
        file.saved = false;
    }

    /// Splits the current line at the cursor, carrying over the leading
    /// indentation and adding one more tab of indent (plus an auto-closed
    /// `}` on its own line) whenever the split point follows an opened
    /// `{` typed on the previous keystroke.
    pub fn insert_newline(&mut self, file: &mut File, previous_char_was_open_brace: bool) {
        let y = self.cursor_y as usize;
        let x = self.cursor_x as usize;

        let tail: Vec<u8> = {
            let line = file.lines.get_mut(y).expect("cursor_y in range");
            let tail = line.chars.split_off(x);
            tail
        };
        file.reclassify_line(y);

        let mut indent = leading_spaces(&file.lines.get(y).unwrap().chars);
        let last_char = file.lines.get(y).unwrap().chars.last().copied();

        if last_char == Some(b'{') {
            if previous_char_was_open_brace {
                file.insert_line(y + 1);
                let closing = file.lines.get_mut(y + 1).unwrap();
                closing.chars.extend(std::iter::repeat(b' ').take(indent));
                closing.chars.push(b'}');
                file.reclassify_line(y + 1);
            }
            indent += SPACES_PER_TAB as usize;
        }

        // The cursor line always lands at y+1: when an auto-closed `}` was
        // just inserted there, this push shifts it down to y+2 so the
        // indented cursor line sits above the closing brace.
        let insert_at = y + 1;
        file.insert_line(insert_at);
        let new_line = file.lines.get_mut(insert_at).unwrap();
        new_line.chars.extend(std::iter::repeat(b' ').take(indent));
        new_line.chars.extend(tail);
        file.reclassify_line(insert_at);

        self.cursor_x = indent as i32;
        self.cursor_x_ideal = self.cursor_x;
        self.cursor_y = insert_at as i32;
        file.saved = false;
    }

    /// Backspace: deletes one character, joining with the previous line at
    /// column 0.
    pub fn delete_char(&mut self, file: &mut File) {
        let y = self.cursor_y as usize;
        if self.cursor_x > 0 {
            let x = (self.cursor_x - 1) as usize;
            file.lines.get_mut(y).unwrap().chars.remove(x);
            file.reclassify_line(y);
            self.update_cursor_x(self.cursor_x - 1);
        } else if self.cursor_y > 0 {
            let prev_len = file.lines.get(y - 1).unwrap().chars.len();
            let current = file.lines.get(y).unwrap().chars.clone();
            file.lines.get_mut(y - 1).unwrap().chars.extend(current);
            file.reclassify_line(y - 1);
            file.delete_line(y);
            self.update_cursor_x(prev_len as i32);
            self.update_cursor_y(self.cursor_y - 1);
        }
        file.saved = false;
    }

    /// Ctrl+Backspace word-deletion rule: counts how many characters back
    /// from `cursor` form one semantic unit (a run of spaces aligned to a
    /// tab stop deletes a tab's worth; otherwise a run of identifier
    /// characters, a run of "other" characters, or a single character).
    pub fn delete_count(line: &[u8], cursor: i32, whole_word: bool) -> i32 {
        if cursor == 0 {
            return 1;
        }

        let mut space_count = 0i32;
        let mut other_count = 0i32;
        let mut char_count = 0i32;

        for &b in &line[..cursor as usize] {
            if b == b' ' {
                if space_count == 2 {
                    char_count = 0;
                    other_count = 0;
                }
                space_count += 1;
            } else if is_identifier_literal(b) {
                if space_count > 0 {
                    char_count = 0;
                }
                space_count = 0;
                other_count = 0;
                char_count += 1;
            } else {
                if space_count > 0 {
                    other_count = 0;
                }
                char_count = 0;
                space_count = 0;
                other_count += 1;
            }
        }

        let aligned_to_tab = space_count > 0 && space_count % SPACES_PER_TAB == 0;

        if whole_word {
            space_count + char_count + other_count
        } else if aligned_to_tab {
            SPACES_PER_TAB
        } else {
            1
        }
    }

    pub fn delete_char_or_word(&mut self, file: &mut File, whole_word: bool) {
        let y = self.cursor_y as usize;
        let line_chars = file.lines.get(y).unwrap().chars.clone();
        let mut count = Self::delete_count(&line_chars, self.cursor_x, whole_word);
        while count > 0 {
            self.delete_char(file);
            count -= 1;
        }
    }

    /// The mark/cursor span in document order, regardless of which one the
    /// user set first.
    pub fn block_marks(&self) -> (i32, i32, i32, i32) {
        if self.mark_y > self.cursor_y || (self.mark_y == self.cursor_y && self.mark_x > self.cursor_x) {
            (self.cursor_x, self.cursor_y, self.mark_x, self.mark_y)
        } else {
            (self.mark_x, self.mark_y, self.cursor_x, self.cursor_y)
        }
    }

    pub fn copy_block(&self, file: &File) -> Vec<u8> {
        let (start_x, start_y, end_x, end_y) = self.block_marks();
        let mut out = Vec::new();
        let mut y = start_y;
        let mut x = start_x;
        while y != end_y {
            let line = &file.lines.as_slice()[y as usize];
            out.extend_from_slice(&line.chars[x as usize..]);
            out.push(b'\n');
            y += 1;
            x = 0;
        }
        let line = &file.lines.as_slice()[end_y as usize];
        out.extend_from_slice(&line.chars[x as usize..end_x as usize]);
        out
    }

    pub fn delete_block(&mut self, file: &mut File) {
        let (start_x, start_y, end_x, end_y) = self.block_marks();

        let prefix = file.lines.get(start_y as usize).unwrap().chars[..start_x as usize].to_vec();

        for _ in 0..(end_y - start_y) {
            file.delete_line(start_y as usize);
        }

        let line = file.lines.get_mut(start_y as usize).unwrap();
        line.chars.drain(0..end_x as usize);
        let suffix = std::mem::replace(&mut line.chars, prefix.clone());
        line.chars.extend(suffix);
        file.reclassify_line(start_y as usize);

        self.update_cursor_x(prefix.len() as i32);
        self.update_cursor_y(start_y);
        file.saved = false;
    }

    pub fn cut(&mut self, file: &mut File) -> Vec<u8> {
        let data = self.copy_block(file);
        self.delete_block(file);
        data
    }

    pub fn copy(&self, file: &File) -> Vec<u8> {
        self.copy_block(file)
    }

    pub fn paste(&mut self, file: &mut File, data: &[u8]) {
        let y = self.cursor_y as usize;
        let x = self.cursor_x as usize;

        let tail: Vec<u8> = {
            let line = file.lines.get_mut(y).unwrap();
            line.chars.split_off(x)
        };

        let line_count = data.iter().filter(|&&b| b == b'\n').count();
        for i in 0..line_count {
            file.insert_line(y + 1 + i);
        }

        let mut cursor_y = y;
        let mut start = 0usize;
        let mut index = 0usize;
        loop {
            while index < data.len() && data[index] != b'\n' {
                index += 1;
            }
            file.lines
                .get_mut(cursor_y)
                .unwrap()
                .chars
                .extend_from_slice(&data[start..index]);
            file.reclassify_line(cursor_y);

            if index >= data.len() {
                break;
            }
            cursor_y += 1;
            index += 1;
            start = index;
        }

        let final_len = file.lines.get(cursor_y).unwrap().chars.len();
        self.update_cursor_x(final_len as i32);
        self.update_cursor_y(cursor_y as i32);

        if !tail.is_empty() {
            let line = file.lines.get_mut(cursor_y).unwrap();
            line.chars.extend(tail);
            file.reclassify_line(cursor_y);
        }
        file.saved = false;
    }

    pub fn enter_minibar_mode(&mut self, mode: MinibarMode) {
        self.minibar_active = true;
        self.minibar_mode = mode;
        self.error_present = false;
        if mode == MinibarMode::Find {
            self.saved_cursor_x = self.cursor_x;
            self.saved_cursor_y = self.cursor_y;
        }
    }

    pub fn exit_minibar_mode(&mut self) {
        self.minibar_data.clear();
        self.matches.clear();
        self.minibar_active = false;
        self.minibar_cursor = 0;
        self.minibar_offset = 0;
    }

    /// Switches the pane to a different file, stashing the outgoing file's
    /// cursor/offset/mark in the per-file cache and restoring the
    /// incoming file's cached state (or resetting to the origin if it has
    /// never been shown in this pane before).
    pub fn change_file(&mut self, new_file: FileId) {
        if let Some(old_file) = self.file {
            if old_file == new_file {
                return;
            }
            self.stash_current_state(old_file);
        }

        self.file = Some(new_file);

        if let Some(state) = self.file_states.iter().find(|s| s.file == new_file).copied() {
            self.cursor_x = state.cursor_x;
            self.cursor_y = state.cursor_y;
            self.cursor_x_ideal = state.cursor_x_ideal;
            self.offset_x = state.offset_x;
            self.offset_y = state.offset_y;
            self.mark_x = state.mark_x;
            self.mark_y = state.mark_y;
            self.mark_valid = state.mark_valid;
        } else {
            self.cursor_x = 0;
            self.cursor_y = 0;
            self.cursor_x_ideal = 0;
            self.offset_x = 0;
            self.offset_y = 0;
            self.mark_x = 0;
            self.mark_y = 0;
            self.mark_valid = false;
        }
        self.redraw = true;
    }

    fn stash_current_state(&mut self, file: FileId) {
        let state = FileViewState {
            file,
            cursor_x: self.cursor_x,
            cursor_y: self.cursor_y,
            cursor_x_ideal: self.cursor_x_ideal,
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            mark_x: self.mark_x,
            mark_y: self.mark_y,
            mark_valid: self.mark_valid,
        };
        if let Some(existing) = self.file_states.iter_mut().find(|s| s.file == file) {
            *existing = state;
        } else {
            self.file_states.push(state);
        }
    }
}

fn count_digits(mut number: i32) -> i32 {
    if number == 0 {
        return 1;
    }
    let mut digits = 0;
    while number != 0 {
        number /= 10;
        digits += 1;
    }
    digits
}

fn leading_spaces(chars: &[u8]) -> usize {
    chars.iter().take_while(|&&b| b == b' ').count()
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

fn is_number(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_identifier_literal(c: u8) -> bool {
    is_letter(c) || is_number(c) || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_text::highlight::built_in_rules;

    fn file_with_lines(lines: &[&str]) -> File {
        let mut file = File::create("t.c", &[]);
        file.lines.clear();
        for (i, text) in lines.iter().enumerate() {
            file.insert_line(i);
            file.lines.get_mut(i).unwrap().chars = text.as_bytes().to_vec();
        }
        file
    }

    #[test]
    fn updated_offset_scrolls_down_when_cursor_passes_right_margin() {
        let offset = Window::updated_offset(50, 0, 40, 6, 6);
        assert_eq!(offset, 16);
    }

    #[test]
    fn updated_offset_scrolls_up_when_cursor_passes_left_margin() {
        let offset = Window::updated_offset(2, 20, 40, 6, 6);
        assert_eq!(offset, 2 - 6);
    }

    #[test]
    fn updated_offset_holds_steady_within_margins() {
        let offset = Window::updated_offset(20, 10, 40, 6, 6);
        assert_eq!(offset, 10);
    }

    #[test]
    fn insert_char_advances_cursor_and_marks_unsaved() {
        let mut file = file_with_lines(&["ab"]);
        file.saved = true;
        let mut window = Window::new(None);
        window.cursor_x = 1;
        window.insert_char(&mut file, b'X');
        assert_eq!(file.lines.get(0).unwrap().chars, b"aXb");
        assert_eq!(window.cursor_x, 2);
        assert!(!file.saved);
    }

    #[test]
    fn insert_newline_splits_line_and_carries_indent() {
        let mut file = file_with_lines(&["  hello world"]);
        let mut window = Window::new(None);
        window.cursor_x = 7;
        window.insert_newline(&mut file, false);
        assert_eq!(file.lines.get(0).unwrap().chars, b"  hello");
        assert_eq!(file.lines.get(1).unwrap().chars, b"  world");
        assert_eq!(window.cursor_y, 1);
        assert_eq!(window.cursor_x, 2);
    }

    #[test]
    fn insert_newline_after_open_brace_adds_tab_and_closing_brace() {
        let mut file = file_with_lines(&["if (x) {"]);
        let mut window = Window::new(None);
        window.cursor_x = 8;
        window.insert_newline(&mut file, true);
        assert_eq!(file.lines.len(), 3);
        assert_eq!(file.lines.get(1).unwrap().chars, b"  ");
        assert_eq!(file.lines.get(2).unwrap().chars, b"}");
        assert_eq!(window.cursor_y, 1);
        assert_eq!(window.cursor_x, 2);
    }

    #[test]
    fn delete_char_joins_previous_line_at_column_zero() {
        let mut file = file_with_lines(&["foo", "bar"]);
        let mut window = Window::new(None);
        window.cursor_y = 1;
        window.cursor_x = 0;
        window.delete_char(&mut file);
        assert_eq!(file.lines.len(), 1);
        assert_eq!(file.lines.get(0).unwrap().chars, b"foobar");
        assert_eq!(window.cursor_y, 0);
        assert_eq!(window.cursor_x, 3);
    }

    #[test]
    fn delete_count_whole_word_consumes_identifier_run() {
        let count = Window::delete_count(b"foo_bar", 7, true);
        assert_eq!(count, 7);
    }

    #[test]
    fn delete_count_tab_aligned_spaces_takes_a_tab() {
        let count = Window::delete_count(b"    ", 4, false);
        assert_eq!(count, SPACES_PER_TAB);
    }

    #[test]
    fn delete_count_single_char_otherwise() {
        let count = Window::delete_count(b"x", 1, false);
        assert_eq!(count, 1);
    }

    #[test]
    fn block_marks_orders_by_document_position() {
        let mut window = Window::new(None);
        window.cursor_x = 2;
        window.cursor_y = 0;
        window.mark_x = 0;
        window.mark_y = 1;
        assert_eq!(window.block_marks(), (2, 0, 0, 1));
    }

    #[test]
    fn copy_block_spans_multiple_lines() {
        let file = file_with_lines(&["hello", "world"]);
        let mut window = Window::new(None);
        window.cursor_x = 5;
        window.cursor_y = 0;
        window.mark_x = 2;
        window.mark_y = 1;
        let data = window.copy_block(&file);
        assert_eq!(data, b"llo\nwo");
    }

    #[test]
    fn change_file_resets_for_never_seen_file() {
        let mut window = Window::new(Some(FileId(0)));
        window.cursor_x = 5;
        window.change_file(FileId(1));
        assert_eq!(window.file, Some(FileId(1)));
        assert_eq!(window.cursor_x, 0);
    }

    #[test]
    fn change_file_restores_cached_state() {
        let mut window = Window::new(Some(FileId(0)));
        window.cursor_x = 5;
        window.cursor_y = 2;
        window.change_file(FileId(1));
        window.cursor_x = 9;
        window.change_file(FileId(0));
        assert_eq!(window.cursor_x, 5);
        assert_eq!(window.cursor_y, 2);
    }

    #[test]
    fn smart_home_goes_to_first_non_space_then_to_zero() {
        let file = file_with_lines(&["   code"]);
        let mut window = Window::new(None);
        window.cursor_x = 7;
        window.smart_home(&file);
        assert_eq!(window.cursor_x, 3);
        window.smart_home(&file);
        assert_eq!(window.cursor_x, 0);
    }

    #[test]
    fn active_size_accounts_for_gutter_and_minibar() {
        let rules = built_in_rules();
        let file = File::create("x.c", &rules);
        let window = Window::new(None);
        let (width, height) = window.active_size(&file, 100, 50, 0);
        assert_eq!(height, 49);
        assert!(width < 100);
    }
}
