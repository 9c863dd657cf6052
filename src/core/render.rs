//! Terminal output sequences
//!
//! Builds the ANSI sequences the editor emits and keeps the visible line in
//! step with the buffer after edits that are not a plain append.

use super::line::LineBuffer;
use super::Console;

pub const NEWLINE: &[u8] = b"\r\n";
/// Resets attributes before the prompt on a fresh line
pub const PROMPT_PREFIX: &[u8] = b"\x1b[0m\r\n";
pub const UNKNOWN: &[u8] = b"\r\n?\r\n";
pub const CURSOR_LEFT: &[u8] = b"\x1b[D";
pub const CURSOR_RIGHT: &[u8] = b"\x1b[C";
pub const ERASE_TO_END: &[u8] = b"\x1b[K";

/// Highest column a single-byte column number can address
const MAX_COLUMN: usize = 255;

/// `ESC [ <n> G`, cursor to absolute column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnCommand {
    bytes: [u8; 8],
    len: usize,
}

impl ColumnCommand {
    /// Command placing the terminal cursor over buffer index `index`,
    /// given a prompt `prompt_width` columns wide.
    pub fn for_index(index: usize, prompt_width: usize) -> Self {
        // columns are 1-based and start after the prompt
        let column = index
            .saturating_add(1 + prompt_width)
            .min(MAX_COLUMN);

        let mut bytes = [0; 8];
        bytes[0] = 0x1B;
        bytes[1] = b'[';
        let mut len = 2;
        let mut started = false;
        for divisor in [100, 10, 1] {
            let digit = (column / divisor) % 10;
            if digit != 0 || started || divisor == 1 {
                bytes[len] = b'0' + digit as u8;
                len += 1;
                started = true;
            }
        }
        bytes[len] = b'G';
        len += 1;

        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Renders editor state to a [`Console`]
#[derive(Debug, Clone)]
pub struct Renderer {
    prompt: Box<[u8]>,
}

impl Renderer {
    pub fn new(prompt: &[u8]) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    pub fn prompt_width(&self) -> usize {
        self.prompt.len()
    }

    pub fn prompt<C: Console>(&self, console: &mut C) {
        console.write_str(PROMPT_PREFIX);
        console.write_str(&self.prompt);
    }

    /// Overflow / unknown input indicator, followed by a fresh prompt
    pub fn unknown<C: Console>(&self, console: &mut C) {
        console.write_str(UNKNOWN);
        console.write_str(&self.prompt);
    }

    /// Put the terminal cursor over the buffer cursor.
    pub fn move_to<C: Console>(&self, console: &mut C, index: usize) {
        let command = ColumnCommand::for_index(index, self.prompt_width());
        console.write_str(command.as_bytes());
    }

    /// Erase from the cursor, retype the tail, and move back.
    pub fn sync_tail<C: Console>(&self, console: &mut C, line: &LineBuffer) {
        console.write_str(ERASE_TO_END);
        console.write_str(line.tail());
        self.move_to(console, line.cursor());
    }

    /// Retype the whole line after the prompt and reposition.
    pub fn redraw<C: Console>(&self, console: &mut C, line: &LineBuffer) {
        console.write_str(line.as_bytes());
        self.move_to(console, line.cursor());
    }
}
