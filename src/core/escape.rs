//! CSI sequence recognizer
//!
//! Tracks a partially received `ESC [ ...` key sequence across calls and
//! reports which editing action, if any, a completed sequence stands for.
//!
//! An `ESC` not followed by `[` ends the sequence and the byte after it is
//! dropped, so Alt+key combinations never insert text.

/// Escape introducer
pub const ESC: u8 = 0x1B;
/// Separator that turns `ESC` into a CSI sequence
pub const CSI_SEPARATOR: u8 = b'[';
/// Longest sequence kept, separator slot included
pub const MAX_SEQUENCE_LEN: usize = 4;

/// Editing action decoded from a complete sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    /// `ESC [ D`
    Left,
    /// `ESC [ C`
    Right,
    /// `ESC [ 1 ~`
    Home,
    /// `ESC [ 4 ~`
    End,
    /// `ESC [ 3 ~`
    Delete,
}

/// Result of feeding one byte to the recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feed {
    /// More bytes are needed
    Pending,
    /// A known sequence completed
    Action(EscapeAction),
    /// A sequence completed but means nothing to the editor
    Ignored,
    /// The sequence ran past [`MAX_SEQUENCE_LEN`] without a final byte
    Overflow,
}

/// Recognizer state
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum EscapeState {
    #[default]
    Idle,
    /// `ESC` seen, waiting for the separator
    SawEscape,
    /// Inside a CSI sequence. `bytes[0]` holds the separator, `len` counts it.
    Collecting {
        bytes: [u8; MAX_SEQUENCE_LEN],
        len: usize,
    },
}

impl EscapeState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EscapeState::Idle)
    }

    /// Start a new sequence, dropping any partial one.
    pub fn begin(&mut self) {
        *self = EscapeState::SawEscape;
    }

    pub fn reset(&mut self) {
        *self = EscapeState::Idle;
    }

    /// Feed a byte received while not idle.
    pub fn feed(&mut self, byte: u8) -> Feed {
        match *self {
            EscapeState::Idle => Feed::Ignored,
            EscapeState::SawEscape => self.saw_escape(byte),
            EscapeState::Collecting { bytes, len } => self.collect(bytes, len, byte),
        }
    }

    fn saw_escape(&mut self, byte: u8) -> Feed {
        if byte == CSI_SEPARATOR {
            self.restart();
            return Feed::Pending;
        }
        // ESC followed by anything else is not a key we handle
        tracing::debug!("Discarding ESC followed by {:#04x}", byte);
        self.reset();
        Feed::Ignored
    }

    fn restart(&mut self) {
        let mut bytes = [0; MAX_SEQUENCE_LEN];
        bytes[0] = CSI_SEPARATOR;
        *self = EscapeState::Collecting { bytes, len: 1 };
    }

    fn collect(&mut self, mut bytes: [u8; MAX_SEQUENCE_LEN], len: usize, byte: u8) -> Feed {
        if byte == CSI_SEPARATOR {
            self.restart();
            return Feed::Pending;
        }
        if len >= MAX_SEQUENCE_LEN {
            tracing::debug!("CSI sequence too long: {:?}", &bytes[1..len]);
            self.reset();
            return Feed::Overflow;
        }

        bytes[len] = byte;
        let len = len + 1;

        if !(0x40..=0x7E).contains(&byte) {
            *self = EscapeState::Collecting { bytes, len };
            return Feed::Pending;
        }

        // Final byte
        self.reset();
        match Self::decode(&bytes[..len]) {
            Some(action) => Feed::Action(action),
            None => {
                tracing::debug!("Unknown CSI: {:?}", &bytes[1..len]);
                Feed::Ignored
            }
        }
    }

    fn decode(sequence: &[u8]) -> Option<EscapeAction> {
        match sequence {
            [_, b'D'] => Some(EscapeAction::Left),
            [_, b'C'] => Some(EscapeAction::Right),
            [_, b'1', b'~'] => Some(EscapeAction::Home),
            [_, b'4', b'~'] => Some(EscapeAction::End),
            [_, b'3', b'~'] => Some(EscapeAction::Delete),
            _ => None,
        }
    }
}
