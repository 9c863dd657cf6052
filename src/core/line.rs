//! Fixed-capacity line buffer
//!
//! Holds the text of the line being edited and the cursor. Storage is
//! allocated once; one slot is always kept for the terminator so the live
//! text is at most `capacity - 2` bytes long.

/// Line text under edit plus cursor
#[derive(Debug, Clone)]
pub struct LineBuffer {
    buf: Box<[u8]>,
    len: usize,
    cursor: usize,
}

impl LineBuffer {
    /// Smallest capacity that still leaves room for one character.
    pub const MIN_CAPACITY: usize = 3;

    /// Create an empty buffer. Capacities below [`Self::MIN_CAPACITY`] are raised.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(Self::MIN_CAPACITY);
        Self {
            buf: vec![0; capacity].into_boxed_slice(),
            len: 0,
            cursor: 0,
        }
    }

    /// Total storage, terminator slot included
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Longest line the buffer accepts
    pub fn max_len(&self) -> usize {
        self.buf.len() - 2
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn at_end(&self) -> bool {
        self.cursor == self.len
    }

    /// Live text
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Text from the cursor to the end of the line
    pub fn tail(&self) -> &[u8] {
        &self.buf[self.cursor..self.len]
    }

    /// Drop all text and move the cursor home.
    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
        self.buf[0] = 0;
    }

    /// Move the cursor, clamped to the live text. Returns the new position.
    pub fn set_cursor(&mut self, position: usize) -> usize {
        self.cursor = position.min(self.len);
        self.cursor
    }

    /// Step the cursor one left. Returns false when already at column zero.
    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step the cursor one right. Returns false when already at the end.
    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Write `byte` at the cursor and advance it.
    ///
    /// When the cursor sits inside the text the tail is shifted right first.
    /// Returns false (and changes nothing) when the line is already full.
    pub fn insert(&mut self, byte: u8) -> bool {
        if self.len >= self.max_len() {
            return false;
        }
        let at = self.cursor;
        // shift includes the terminator
        self.buf.copy_within(at..=self.len, at + 1);
        self.buf[at] = byte;
        self.len += 1;
        self.cursor += 1;
        debug_assert_eq!(self.buf[self.len], 0);
        true
    }

    /// Remove the byte at `position`, shifting the rest left.
    ///
    /// The cursor is not moved. Out-of-range positions are ignored.
    pub fn remove(&mut self, position: usize) -> bool {
        if position >= self.len {
            return false;
        }
        self.buf.copy_within(position + 1..=self.len, position);
        self.len -= 1;
        self.buf[self.len] = 0;
        if self.cursor > self.len {
            self.cursor = self.len;
        }
        true
    }

    /// Remove everything before the cursor and move it home.
    pub fn kill_to_start(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let removed = self.cursor;
        self.buf.copy_within(removed..=self.len, 0);
        self.len -= removed;
        self.cursor = 0;
        true
    }

    /// Truncate the line at the cursor.
    pub fn kill_to_end(&mut self) -> bool {
        if self.cursor >= self.len {
            return false;
        }
        self.len = self.cursor;
        self.buf[self.len] = 0;
        true
    }

    /// Copy the live text plus terminator into `dst`.
    ///
    /// `dst` must be at least [`Self::capacity`] long. Returns the text length.
    pub(crate) fn snapshot_into(&self, dst: &mut [u8]) -> usize {
        dst[..self.len].copy_from_slice(&self.buf[..self.len]);
        dst[self.len] = 0;
        self.len
    }
}
