//! `mosaic.toml` discovery and parsing (§10.3): editor settings and the
//! theme table. A missing or unparsable file is never fatal — the editor
//! always has the two built-in themes to fall back on, matching the
//! original's "config is optional" stance.

use std::fs;
use std::path::PathBuf;

use mosaic_state::Theme;
use mosaic_text::color::ColorType;
use serde::Deserialize;
use tracing::{debug, warn};

/// `[editor]` settings.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_spaces_per_tab")]
    pub spaces_per_tab: u32,
    #[serde(default)]
    pub cursor_margin: CursorMarginConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            spaces_per_tab: Self::default_spaces_per_tab(),
            cursor_margin: CursorMarginConfig::default(),
        }
    }
}

impl EditorConfig {
    const fn default_spaces_per_tab() -> u32 {
        4
    }
}

/// Cursor-margin settings for all four sides, defaulting to the
/// distilled spec's constant 6 (`mosaic_view::CURSOR_MARGIN_*`).
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CursorMarginConfig {
    #[serde(default = "CursorMarginConfig::default_side")]
    pub top: i32,
    #[serde(default = "CursorMarginConfig::default_side")]
    pub bottom: i32,
    #[serde(default = "CursorMarginConfig::default_side")]
    pub left: i32,
    #[serde(default = "CursorMarginConfig::default_side")]
    pub right: i32,
}

impl Default for CursorMarginConfig {
    fn default() -> Self {
        let side = Self::default_side();
        CursorMarginConfig { top: side, bottom: side, left: side, right: side }
    }
}

impl CursorMarginConfig {
    const fn default_side() -> i32 {
        6
    }
}

/// One `[[theme]]` table entry: a name plus all 17 color slots, in
/// `ColorType::ALL` order. `toml` has no native hex-color type, so every
/// slot is a plain `u32` written as `0xRRGGBB` in the file.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    pub name: String,
    pub editor_cursor: u32,
    pub editor_foreground: u32,
    pub editor_background: u32,
    pub minibar_cursor: u32,
    pub minibar_foreground: u32,
    pub minibar_background: u32,
    pub minibar_error: u32,
    pub selected_match_foreground: u32,
    pub selected_match_background: u32,
    pub match_foreground: u32,
    pub match_background: u32,
    pub comment: u32,
    pub multiline_comment: u32,
    pub keyword: u32,
    pub string: u32,
    pub char: u32,
    pub number: u32,
}

impl ThemeConfig {
    fn into_theme(self) -> Theme {
        let mut colors = [0u32; ColorType::COUNT];
        colors[ColorType::EditorCursor as usize] = self.editor_cursor;
        colors[ColorType::EditorForeground as usize] = self.editor_foreground;
        colors[ColorType::EditorBackground as usize] = self.editor_background;
        colors[ColorType::MinibarCursor as usize] = self.minibar_cursor;
        colors[ColorType::MinibarForeground as usize] = self.minibar_foreground;
        colors[ColorType::MinibarBackground as usize] = self.minibar_background;
        colors[ColorType::MinibarError as usize] = self.minibar_error;
        colors[ColorType::SelectedMatchForeground as usize] = self.selected_match_foreground;
        colors[ColorType::SelectedMatchBackground as usize] = self.selected_match_background;
        colors[ColorType::MatchForeground as usize] = self.match_foreground;
        colors[ColorType::MatchBackground as usize] = self.match_background;
        colors[ColorType::Comment as usize] = self.comment;
        colors[ColorType::MultilineComment as usize] = self.multiline_comment;
        colors[ColorType::Keyword as usize] = self.keyword;
        colors[ColorType::String as usize] = self.string;
        colors[ColorType::Char as usize] = self.char;
        colors[ColorType::Number as usize] = self.number;
        Theme { name: self.name, colors }
    }
}

/// The raw, as-parsed shape of `mosaic.toml`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub theme: Vec<ThemeConfig>,
}

/// The loaded configuration, with themes already resolved to built-ins
/// when the file supplied none.
#[derive(Debug, Clone)]
pub struct Config {
    pub editor: EditorConfig,
    pub themes: Vec<Theme>,
}

impl Default for Config {
    fn default() -> Self {
        Config { editor: EditorConfig::default(), themes: mosaic_state::built_in_themes() }
    }
}

/// Working directory first, then the platform config dir, matching the
/// teacher's `core-config::discover`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from("mosaic.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("mosaic").join("mosaic.toml");
    }
    PathBuf::from("mosaic.toml")
}

/// Loads `path` (or the result of [`discover`] when `None`), falling back
/// to [`Config::default`] on any missing file, I/O error, or parse
/// failure — a config problem is never fatal.
pub fn load_from(path: Option<PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            debug!(path = ?path, error = %e, "no config file, using defaults");
            return Config::default();
        }
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let themes = if file.theme.is_empty() {
                mosaic_state::built_in_themes()
            } else {
                file.theme.into_iter().map(ThemeConfig::into_theme).collect()
            };
            Config { editor: file.editor, themes }
        }
        Err(e) => {
            warn!(path = ?path, error = %e, "config file failed to parse, using defaults");
            Config::default()
        }
    }
}
