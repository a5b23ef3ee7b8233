//! Text buffer model: files as ordered sequences of byte-oriented lines,
//! shared across panes by reference, plus the stateless syntax classifier
//! that colors each line.
//!
//! Buffers are plain bytes, not graphemes — the screen this crate feeds is
//! a grid of single-column cells, so there is no grapheme segmentation or
//! width computation here.

pub mod color;
pub mod highlight;

use std::path::{Path, PathBuf};

use mosaic_array::GrowArray;

use color::ColorType;
use highlight::HighlightRule;

/// A single line of text plus its per-byte color classification.
///
/// `redraw` is set by any mutation to this line and consumed (cleared) by
/// the renderer once the corresponding screen row has been repainted.
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub chars: Vec<u8>,
    pub colors: Vec<ColorType>,
    pub redraw: bool,
}

impl Line {
    pub fn new() -> Self {
        Line {
            chars: Vec::new(),
            colors: Vec::new(),
            redraw: true,
        }
    }

    pub fn from_bytes(chars: Vec<u8>) -> Self {
        Line {
            chars,
            colors: Vec::new(),
            redraw: true,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.chars)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OpenError {
    #[error("file not found: {0}")]
    NotFound(PathBuf),
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}: carriage return not immediately followed by newline")]
    CrBeforeLf(PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("io error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An open file: its path, its lines, and the highlight rule matched
/// against its extension (if any).
pub struct File {
    pub path: PathBuf,
    pub lines: GrowArray<Line>,
    pub saved: bool,
    pub redraw: bool,
    pub highlight: Option<HighlightRule>,
}

impl File {
    /// Creates a brand-new, unsaved file with a single empty line.
    pub fn create(path: impl Into<PathBuf>, rules: &[HighlightRule]) -> Self {
        let path = path.into();
        let highlight = pick_highlight(&path, rules);
        let mut lines = GrowArray::new();
        lines.append(Line::new());
        File {
            path,
            lines,
            saved: true,
            redraw: true,
            highlight,
        }
    }

    /// Opens and parses an existing file from disk.
    ///
    /// A line is delimited by `\n`; an optional `\r` immediately preceding
    /// it is stripped. A `\r` that does not immediately precede a `\n` is
    /// rejected, matching the original reader's strict validation.
    pub fn open(path: impl Into<PathBuf>, rules: &[HighlightRule]) -> Result<Self, OpenError> {
        let path = path.into();
        let data = std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                OpenError::NotFound(path.clone())
            } else {
                OpenError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        let mut cr_pending = false;
        for &b in &data {
            match b {
                b'\n' => cr_pending = false,
                b'\r' => cr_pending = true,
                _ if cr_pending => return Err(OpenError::CrBeforeLf(path)),
                _ => {}
            }
        }

        let highlight = pick_highlight(&path, rules);
        let mut lines = GrowArray::new();
        let mut start = 0usize;
        let mut cr = false;
        for (i, &b) in data.iter().enumerate() {
            if b == b'\n' {
                let end = if cr { i - 1 } else { i };
                let mut line = Line::from_bytes(data[start..end].to_vec());
                line.colors = highlight::classify_line(&line.chars, highlight.as_ref());
                lines.append(line);
                start = i + 1;
                cr = false;
            } else if b == b'\r' {
                cr = true;
            }
        }
        if start < data.len() || data.is_empty() {
            let end = if cr { data.len() - 1 } else { data.len() };
            let mut line = Line::from_bytes(data[start..end].to_vec());
            line.colors = highlight::classify_line(&line.chars, highlight.as_ref());
            lines.append(line);
        }

        tracing::debug!(path = %lines_path_display(&path), lines = lines.len(), "opened file");

        Ok(File {
            path,
            lines,
            saved: true,
            redraw: true,
            highlight,
        })
    }

    /// Writes every line back to disk, separated by `\r\n`, mirroring the
    /// on-disk format the original reader expects to round-trip.
    pub fn save(&mut self) -> Result<(), SaveError> {
        use std::io::Write as _;

        let mut out = Vec::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.extend_from_slice(b"\r\n");
            }
            out.extend_from_slice(&line.chars);
        }

        let mut f = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|source| SaveError::Io {
                path: self.path.clone(),
                source,
            })?;
        f.write_all(&out).map_err(|source| SaveError::Io {
            path: self.path.clone(),
            source,
        })?;

        self.saved = true;
        tracing::debug!(path = %lines_path_display(&self.path), "saved file");
        Ok(())
    }

    pub fn insert_line(&mut self, index: usize) {
        self.lines.insert(Line::new(), index);
        self.redraw = true;
    }

    pub fn delete_line(&mut self, index: usize) {
        self.lines.remove(index);
        self.redraw = true;
    }

    /// Re-runs the syntax classifier over a single line after an edit and
    /// marks it for redraw.
    pub fn reclassify_line(&mut self, index: usize) {
        if let Some(line) = self.lines.get_mut(index) {
            line.colors = highlight::classify_line(&line.chars, self.highlight.as_ref());
            line.redraw = true;
        }
    }
}

fn lines_path_display(path: &Path) -> std::borrow::Cow<'_, str> {
    path.to_string_lossy()
}

fn pick_highlight(path: &Path, rules: &[HighlightRule]) -> Option<HighlightRule> {
    let path_str = path.to_string_lossy();
    rules.iter().find(|r| r.matches_extension(&path_str)).cloned()
}

impl Clone for HighlightRule {
    fn clone(&self) -> Self {
        HighlightRule {
            name: self.name,
            extensions: self.extensions,
            keywords: self.keywords,
            single_line_comment_start: self.single_line_comment_start,
            multiline_comment_start: self.multiline_comment_start,
            multiline_comment_end: self.multiline_comment_end,
            comments: self.comments,
            multiline_comments: self.multiline_comments,
            strings: self.strings,
            chars: self.chars,
            numbers: self.numbers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_has_one_empty_line() {
        let f = File::create("untitled.c", &[]);
        assert_eq!(f.lines.len(), 1);
        assert!(f.saved);
    }

    #[test]
    fn pick_highlight_matches_c_extension() {
        let rules = highlight::built_in_rules();
        let f = File::create("main.c", &rules);
        assert!(f.highlight.is_some());
    }

    #[test]
    fn pick_highlight_none_for_unknown_extension() {
        let rules = highlight::built_in_rules();
        let f = File::create("main.rs", &rules);
        assert!(f.highlight.is_none());
    }

    #[test]
    fn insert_and_delete_line_mark_redraw() {
        let mut f = File::create("x.c", &[]);
        f.redraw = false;
        f.insert_line(1);
        assert!(f.redraw);
        assert_eq!(f.lines.len(), 2);
        f.redraw = false;
        f.delete_line(0);
        assert!(f.redraw);
        assert_eq!(f.lines.len(), 1);
    }
}
