//! Key mapping for terminal input
//!
//! Converts key events into the byte encoding a serial terminal would send,
//! so a desktop terminal can drive the line editor.

use bitflags::bitflags;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

bitflags! {
    /// Modifier keys
    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
    }
}

impl From<KeyModifiers> for Modifiers {
    fn from(mods: KeyModifiers) -> Self {
        let mut result = Modifiers::empty();
        if mods.contains(KeyModifiers::SHIFT) {
            result |= Modifiers::SHIFT;
        }
        if mods.contains(KeyModifiers::CONTROL) {
            result |= Modifiers::CTRL;
        }
        if mods.contains(KeyModifiers::ALT) {
            result |= Modifiers::ALT;
        }
        result
    }
}

/// End of input, sent by Ctrl+D
pub const EOT: u8 = 0x04;

/// Key mapper for converting key events to bytes
pub struct KeyMapper;

impl KeyMapper {
    /// Map a crossterm KeyEvent to wire bytes.
    ///
    /// Returns `None` for keys the editor has no use for (function keys,
    /// vertical arrows, Alt combinations, non-ASCII text).
    pub fn map(event: &KeyEvent) -> Option<Vec<u8>> {
        let mods = Modifiers::from(event.modifiers);

        match event.code {
            KeyCode::Char(ch) => Self::map_char(ch, mods).map(|b| vec![b]),
            KeyCode::Enter => Some(vec![b'\r']),
            KeyCode::Backspace => Some(vec![0x7F]),
            KeyCode::Tab => Some(vec![b'\t']),
            KeyCode::Esc => Some(vec![0x1B]),

            // Modifiers are dropped, the editor only knows plain sequences
            KeyCode::Left => Some(b"\x1b[D".to_vec()),
            KeyCode::Right => Some(b"\x1b[C".to_vec()),
            KeyCode::Home => Some(Self::tilde_key(1)),
            KeyCode::End => Some(Self::tilde_key(4)),
            KeyCode::Delete => Some(Self::tilde_key(3)),

            _ => None,
        }
    }

    /// Map a character with modifiers
    fn map_char(ch: char, mods: Modifiers) -> Option<u8> {
        if !ch.is_ascii() || mods.contains(Modifiers::ALT) {
            return None;
        }

        // Ctrl + letter = control character
        if mods.contains(Modifiers::CTRL) {
            return match ch {
                'a'..='z' => Some(ch as u8 - b'a' + 1),
                'A'..='Z' => Some(ch as u8 - b'A' + 1),
                '@' | '`' | ' ' => Some(0x00),
                '[' => Some(0x1B),
                '\\' => Some(0x1C),
                ']' => Some(0x1D),
                '^' | '~' => Some(0x1E),
                '_' | '?' => Some(0x1F),
                _ => None,
            };
        }

        Some(ch as u8)
    }

    /// Tilde key sequence (Home, End, Delete)
    fn tilde_key(code: u8) -> Vec<u8> {
        vec![0x1B, b'[', b'0' + code, b'~']
    }
}
