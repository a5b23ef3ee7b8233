//! The fixed palette slots every theme must supply a color for.
//!
//! Kept as a plain enum indexed into a theme's color table rather than a
//! struct of named fields, matching the original's flat `ColorType` array —
//! it lets the renderer and highlighter address a color by a small integer
//! without threading a `Theme` reference everywhere.

/// One slot in a theme's color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum ColorType {
    EditorCursor,
    EditorForeground,
    EditorBackground,
    MinibarCursor,
    MinibarForeground,
    MinibarBackground,
    MinibarError,
    SelectedMatchForeground,
    SelectedMatchBackground,
    MatchForeground,
    MatchBackground,
    Comment,
    MultilineComment,
    Keyword,
    String,
    Char,
    Number,
}

impl ColorType {
    pub const COUNT: usize = 17;

    pub const ALL: [ColorType; Self::COUNT] = [
        ColorType::EditorCursor,
        ColorType::EditorForeground,
        ColorType::EditorBackground,
        ColorType::MinibarCursor,
        ColorType::MinibarForeground,
        ColorType::MinibarBackground,
        ColorType::MinibarError,
        ColorType::SelectedMatchForeground,
        ColorType::SelectedMatchBackground,
        ColorType::MatchForeground,
        ColorType::MatchBackground,
        ColorType::Comment,
        ColorType::MultilineComment,
        ColorType::Keyword,
        ColorType::String,
        ColorType::Char,
        ColorType::Number,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_count() {
        assert_eq!(ColorType::ALL.len(), ColorType::COUNT);
    }
}
