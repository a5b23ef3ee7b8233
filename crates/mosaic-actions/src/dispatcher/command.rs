//! The minibar command-line grammar: `split (- | |)`, `theme (NUMBER |
//! NAME)`, `close`. Parsing is a hand-rolled prefix match mirroring
//! `editor.c::handle_command`'s `skip_identifier`/`skip_char`/`read_number`
//! helpers rather than a parser-combinator crate, since the grammar is three
//! fixed-shape lines wide.

/// What side a `split` command divides the pane on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// `split -`: stacked top/bottom.
    Vertical,
    /// `split |`: side by side.
    Horizontal,
}

/// What a `theme` command selects by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeTarget {
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    Split(SplitAxis),
    Theme(ThemeTarget),
    Close,
    Unknown(String),
}

/// Parses one minibar command-line buffer. Whitespace between the verb and
/// its argument is insignificant; an unrecognized verb (or a verb whose
/// argument doesn't parse) becomes [`ParsedCommand::Unknown`] carrying the
/// original text for the error line.
pub fn parse(raw: &str) -> ParsedCommand {
    let trimmed = raw.trim();

    if let Some(rest) = trimmed.strip_prefix("split") {
        let rest = rest.trim_start();
        return match rest.chars().next() {
            Some('-') => ParsedCommand::Split(SplitAxis::Vertical),
            Some('|') => ParsedCommand::Split(SplitAxis::Horizontal),
            _ => ParsedCommand::Unknown(raw.to_string()),
        };
    }

    if let Some(rest) = trimmed.strip_prefix("theme") {
        let rest = rest.trim_start();
        if rest.is_empty() {
            return ParsedCommand::Unknown(raw.to_string());
        }
        return match rest.parse::<usize>() {
            Ok(index) => ParsedCommand::Theme(ThemeTarget::Index(index)),
            Err(_) => ParsedCommand::Theme(ThemeTarget::Name(rest.to_string())),
        };
    }

    if trimmed == "close" || trimmed.starts_with("close") {
        return ParsedCommand::Close;
    }

    ParsedCommand::Unknown(raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_dash_is_vertical() {
        assert_eq!(parse("split -"), ParsedCommand::Split(SplitAxis::Vertical));
    }

    #[test]
    fn split_pipe_is_horizontal() {
        assert_eq!(parse("split|"), ParsedCommand::Split(SplitAxis::Horizontal));
    }

    #[test]
    fn split_without_axis_is_unknown() {
        assert_eq!(parse("split"), ParsedCommand::Unknown("split".to_string()));
    }

    #[test]
    fn theme_numeric_argument() {
        assert_eq!(parse("theme 1"), ParsedCommand::Theme(ThemeTarget::Index(1)));
    }

    #[test]
    fn theme_name_argument() {
        assert_eq!(parse("theme blow"), ParsedCommand::Theme(ThemeTarget::Name("blow".to_string())));
    }

    #[test]
    fn close_command() {
        assert_eq!(parse("close"), ParsedCommand::Close);
    }

    #[test]
    fn unrecognized_verb_is_unknown() {
        assert_eq!(parse("frobnicate"), ParsedCommand::Unknown("frobnicate".to_string()));
    }
}
