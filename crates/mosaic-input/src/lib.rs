//! Decodes raw input bytes into logical key codes: single control bytes,
//! printable ASCII, and the handful of ESC-prefixed CSI sequences the
//! original terminal front end recognized for arrows, Home/End, and their
//! shifted/ctrl'd variants.
//!
//! This never touches a terminal itself — it is a pure function from a
//! byte slice to zero or more [`KeyCode`]s, so the decode table is testable
//! without a pty.

/// A decoded keystroke, either a literal byte or one of the multi-byte
/// sequences the decoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Tab,
    Enter,
    Escape,
    Delete,
    CtrlDelete,

    CtrlC,
    CtrlG,
    CtrlN,
    CtrlQ,
    CtrlS,
    CtrlX,
    CtrlV,
    CtrlR,
    CtrlD,
    CtrlB,
    CtrlO,
    CtrlE,
    CtrlU,
    CtrlF,

    Printable(u8),

    Up,
    Down,
    Left,
    Right,
    End,
    Home,

    ShiftUp,
    ShiftDown,
    ShiftLeft,
    ShiftRight,
    ShiftEnd,
    ShiftHome,

    CtrlUp,
    CtrlDown,
    CtrlLeft,
    CtrlRight,

    /// A byte or sequence that doesn't map to anything recognized.
    Unknown,
    /// No bytes were available to read.
    None,
}

/// Decodes one input read's worth of bytes into a single logical key code,
/// the same way the original's blocking single-read-per-tick loop did.
///
/// `bytes` is the raw chunk returned by one `read()`/`poll`+`read` pair; a
/// lone `ESC` byte with nothing else pending decodes to [`KeyCode::Escape`]
/// itself, matching terminals that send ESC alone when the user presses
/// just the Escape key (as opposed to ESC beginning a CSI sequence that
/// arrives in the same read).
pub fn decode(bytes: &[u8]) -> KeyCode {
    if bytes.is_empty() {
        return KeyCode::None;
    }

    let code = bytes[0];

    if code == 0x1b && bytes.len() > 2 && bytes[1] == b'[' {
        return decode_csi(bytes);
    }
    if code == 0x1b && bytes.len() == 1 {
        return KeyCode::Escape;
    }
    if code == 0x1b {
        return KeyCode::Unknown;
    }

    decode_single_byte(code)
}

fn decode_single_byte(code: u8) -> KeyCode {
    match code {
        9 => KeyCode::Tab,
        10 => KeyCode::Enter,
        127 => KeyCode::Delete,
        8 => KeyCode::CtrlDelete,
        3 => KeyCode::CtrlC,
        7 => KeyCode::CtrlG,
        14 => KeyCode::CtrlN,
        17 => KeyCode::CtrlQ,
        19 => KeyCode::CtrlS,
        24 => KeyCode::CtrlX,
        22 => KeyCode::CtrlV,
        18 => KeyCode::CtrlR,
        4 => KeyCode::CtrlD,
        2 => KeyCode::CtrlB,
        15 => KeyCode::CtrlO,
        5 => KeyCode::CtrlE,
        21 => KeyCode::CtrlU,
        6 => KeyCode::CtrlF,
        32..=126 => KeyCode::Printable(code),
        _ => KeyCode::Unknown,
    }
}

fn decode_csi(bytes: &[u8]) -> KeyCode {
    match bytes.len() {
        3 => match bytes[2] {
            b'A' => KeyCode::Up,
            b'B' => KeyCode::Down,
            b'D' => KeyCode::Left,
            b'C' => KeyCode::Right,
            b'H' => KeyCode::Home,
            // Non-standard: some terminals send CSI K for shift+End.
            b'K' => KeyCode::ShiftEnd,
            _ => KeyCode::Unknown,
        },
        4 => {
            if bytes[2] == b'4' && bytes[3] == b'~' {
                KeyCode::End
            } else if bytes[2] == b'2' && bytes[3] == b'J' {
                KeyCode::ShiftHome
            } else {
                KeyCode::Unknown
            }
        }
        6 if bytes[2] == b'1' && bytes[3] == b';' => {
            if bytes[4] == b'2' {
                match bytes[5] {
                    b'A' => KeyCode::ShiftUp,
                    b'B' => KeyCode::ShiftDown,
                    b'D' => KeyCode::ShiftLeft,
                    b'C' => KeyCode::ShiftRight,
                    _ => KeyCode::Unknown,
                }
            } else if bytes[4] == b'5' {
                match bytes[5] {
                    b'A' => KeyCode::CtrlUp,
                    b'B' => KeyCode::CtrlDown,
                    b'D' => KeyCode::CtrlLeft,
                    b'C' => KeyCode::CtrlRight,
                    _ => KeyCode::Unknown,
                }
            } else {
                KeyCode::Unknown
            }
        }
        _ => KeyCode::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_none() {
        assert_eq!(decode(&[]), KeyCode::None);
    }

    #[test]
    fn lone_escape_is_escape_key() {
        assert_eq!(decode(&[0x1b]), KeyCode::Escape);
    }

    #[test]
    fn printable_ascii_passes_through() {
        assert_eq!(decode(b"a"), KeyCode::Printable(b'a'));
    }

    #[test]
    fn ctrl_q_is_quit() {
        assert_eq!(decode(&[17]), KeyCode::CtrlQ);
    }

    #[test]
    fn arrow_keys_decode_from_csi() {
        assert_eq!(decode(b"\x1b[A"), KeyCode::Up);
        assert_eq!(decode(b"\x1b[B"), KeyCode::Down);
        assert_eq!(decode(b"\x1b[C"), KeyCode::Right);
        assert_eq!(decode(b"\x1b[D"), KeyCode::Left);
    }

    #[test]
    fn end_key_decodes_from_four_byte_csi() {
        assert_eq!(decode(b"\x1b[4~"), KeyCode::End);
    }

    #[test]
    fn shift_home_decodes_from_csi_2j() {
        assert_eq!(decode(b"\x1b[2J"), KeyCode::ShiftHome);
    }

    #[test]
    fn shift_arrows_decode_from_six_byte_csi() {
        assert_eq!(decode(b"\x1b[1;2A"), KeyCode::ShiftUp);
        assert_eq!(decode(b"\x1b[1;2D"), KeyCode::ShiftLeft);
    }

    #[test]
    fn ctrl_arrows_decode_from_six_byte_csi() {
        assert_eq!(decode(b"\x1b[1;5C"), KeyCode::CtrlRight);
        assert_eq!(decode(b"\x1b[1;5B"), KeyCode::CtrlDown);
    }

    #[test]
    fn unrecognized_csi_is_unknown() {
        assert_eq!(decode(b"\x1b[Z"), KeyCode::Unknown);
    }

    #[test]
    fn bare_escape_prefix_with_non_bracket_is_unknown() {
        assert_eq!(decode(b"\x1bq"), KeyCode::Unknown);
    }
}

/// Zero-timeout poll: true if a byte is already waiting to be read. Used
/// to abort a long find scan mid-file rather than block the next
/// keystroke.
pub fn input_is_pending() -> bool {
    matches!(
        crossterm::event::poll(std::time::Duration::from_secs(0)),
        Ok(true)
    )
}
