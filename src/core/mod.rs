//! Core line-editing engine.
//!
//! This module contains the byte-driven editing logic:
//!
//! - **line**: Fixed-capacity line buffer with cursor and shifting edits
//! - **escape**: CSI escape sequence recognizer for arrow/Home/End/Delete keys
//! - **tokenize**: In-place whitespace tokenizer and argument views
//! - **render**: Terminal output sequences and line resynchronization
//! - **session**: Per-byte ingest dispatcher tying everything together
//!
//! # Architecture
//!
//! ```text
//! Session<C: Console>
//! ├── LineBuffer (text under edit + cursor)
//! ├── EscapeState (partial CSI sequence)
//! ├── submitted line snapshot + token spans
//! └── C (print char / print string / execute)
//! ```

pub mod escape;
pub mod line;
pub mod render;
pub mod session;
pub mod tokenize;

pub use escape::{EscapeAction, EscapeState};
pub use line::LineBuffer;
pub use session::Session;
pub use tokenize::{Args, Span};

/// Output and execution interface the engine is wired to.
///
/// All calls happen synchronously on the thread that calls
/// [`Session::ingest`]. Slices handed to these methods are only valid for
/// the duration of the call; copy anything that must be kept.
pub trait Console {
    /// Emit one raw byte to the terminal.
    fn write_char(&mut self, byte: u8);

    /// Emit a sequence of raw bytes to the terminal.
    fn write_str(&mut self, bytes: &[u8]);

    /// Run a submitted command line. Only called with at least one argument.
    fn execute(&mut self, args: &Args<'_>);
}

impl<T: Console + ?Sized> Console for &mut T {
    fn write_char(&mut self, byte: u8) {
        (**self).write_char(byte);
    }

    fn write_str(&mut self, bytes: &[u8]) {
        (**self).write_str(bytes);
    }

    fn execute(&mut self, args: &Args<'_>) {
        (**self).execute(args);
    }
}
