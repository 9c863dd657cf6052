//! Editing session
//!
//! Owns the line under edit and routes every incoming byte to the matching
//! edit, cursor motion, escape handling or submission.

use super::escape::{EscapeAction, EscapeState, Feed, ESC};
use super::line::LineBuffer;
use super::render::{Renderer, CURSOR_LEFT, CURSOR_RIGHT, NEWLINE};
use super::tokenize::{tokenize, Args, Span};
use super::Console;
use crate::config::EditorConfig;

/// Key codes
mod key {
    pub const ENTER_LF: u8 = b'\n';
    pub const ENTER_CR: u8 = b'\r';
    pub const BACKSPACE: u8 = 0x08;
    pub const DELETE: u8 = 0x7F;
    pub const CTRL_A: u8 = 0x01;
    pub const CTRL_B: u8 = 0x02;
    pub const CTRL_E: u8 = 0x05;
    pub const CTRL_F: u8 = 0x06;
    pub const CTRL_K: u8 = 0x0B;
    pub const CTRL_U: u8 = 0x15;
}

/// One line-editing interaction bound to a console
#[derive(Debug)]
pub struct Session<C: Console> {
    line: LineBuffer,
    escape: EscapeState,
    /// Copy of the line handed to the tokenizer on submit
    submitted: Box<[u8]>,
    spans: Box<[Span]>,
    renderer: Renderer,
    console: C,
}

impl<C: Console> Session<C> {
    /// Create a session with zeroed state. Nothing is printed; call
    /// [`Session::show_prompt`] for the initial prompt.
    pub fn new(console: C, config: &EditorConfig) -> Self {
        let line = LineBuffer::new(config.capacity);
        let capacity = line.capacity();
        Self {
            line,
            escape: EscapeState::Idle,
            submitted: vec![0; capacity].into_boxed_slice(),
            spans: vec![Span::default(); config.max_args.max(1)].into_boxed_slice(),
            renderer: Renderer::new(config.prompt.as_bytes()),
            console,
        }
    }

    /// Session with the default limits and `>` prompt
    pub fn with_defaults(console: C) -> Self {
        Self::new(console, &EditorConfig::default())
    }

    pub fn show_prompt(&mut self) {
        self.renderer.prompt(&mut self.console);
    }

    /// Discard the current line and any partial escape sequence.
    pub fn reset(&mut self) {
        self.line.clear();
        self.escape.reset();
    }

    pub fn line(&self) -> &[u8] {
        self.line.as_bytes()
    }

    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.line.capacity()
    }

    pub fn max_args(&self) -> usize {
        self.spans.len()
    }

    pub fn escape_state(&self) -> &EscapeState {
        &self.escape
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Feed every byte of `bytes` in order.
    pub fn ingest_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.ingest(byte);
        }
    }

    /// Process one input byte.
    pub fn ingest(&mut self, byte: u8) {
        if byte == ESC {
            self.escape.begin();
            return;
        }
        if !self.escape.is_idle() {
            self.feed_escape(byte);
            return;
        }

        match byte {
            key::ENTER_LF | key::ENTER_CR => self.submit(),
            key::BACKSPACE | key::DELETE => self.backspace(byte),
            key::CTRL_A => self.home(),
            key::CTRL_E => self.end(),
            key::CTRL_B => self.left(),
            key::CTRL_F => self.right(),
            key::CTRL_U => self.kill_to_start(),
            key::CTRL_K => self.kill_to_end(),
            _ if self.line.cursor() >= self.line.max_len() => self.overflow(),
            0x20..=0x7E => self.insert(byte),
            _ => {}
        }
    }

    fn feed_escape(&mut self, byte: u8) {
        match self.escape.feed(byte) {
            Feed::Pending | Feed::Ignored => {}
            Feed::Action(EscapeAction::Left) => self.left(),
            Feed::Action(EscapeAction::Right) => self.right(),
            Feed::Action(EscapeAction::Home) => self.home(),
            Feed::Action(EscapeAction::End) => self.end(),
            Feed::Action(EscapeAction::Delete) => self.delete(),
            Feed::Overflow => {
                // the indicator ends on a fresh prompt, so retype the kept line
                self.renderer.unknown(&mut self.console);
                self.renderer.redraw(&mut self.console, &self.line);
            }
        }
    }

    fn submit(&mut self) {
        if self.line.is_empty() {
            self.show_prompt();
            return;
        }

        let len = self.line.snapshot_into(&mut self.submitted);
        let argc = tokenize(&mut self.submitted[..=len], &mut self.spans);
        tracing::trace!("Submitted line of {} bytes, {} args", len, argc);

        if argc > 0 {
            self.console.write_str(NEWLINE);
            let args = Args::new(&self.submitted, &self.spans[..argc]);
            self.console.execute(&args);
        }

        self.line.clear();
        self.show_prompt();
    }

    fn backspace(&mut self, byte: u8) {
        let cursor = self.line.cursor();
        if cursor == 0 {
            return;
        }
        self.line.remove(cursor - 1);
        self.line.set_cursor(cursor - 1);
        self.console.write_char(byte);
        if !self.line.at_end() {
            self.renderer.sync_tail(&mut self.console, &self.line);
        }
    }

    fn delete(&mut self) {
        if self.line.remove(self.line.cursor()) {
            self.renderer.sync_tail(&mut self.console, &self.line);
        }
    }

    fn home(&mut self) {
        self.line.set_cursor(0);
        self.renderer.move_to(&mut self.console, 0);
    }

    fn end(&mut self) {
        let cursor = self.line.set_cursor(self.line.len());
        self.renderer.move_to(&mut self.console, cursor);
    }

    fn left(&mut self) {
        if self.line.move_left() {
            self.console.write_str(CURSOR_LEFT);
        } else {
            self.renderer.move_to(&mut self.console, 0);
        }
    }

    fn right(&mut self) {
        if self.line.move_right() {
            self.console.write_str(CURSOR_RIGHT);
        }
    }

    fn kill_to_start(&mut self) {
        if self.line.kill_to_start() {
            self.renderer.move_to(&mut self.console, 0);
            self.renderer.sync_tail(&mut self.console, &self.line);
        }
    }

    fn kill_to_end(&mut self) {
        if self.line.kill_to_end() {
            self.renderer.sync_tail(&mut self.console, &self.line);
        }
    }

    fn overflow(&mut self) {
        tracing::warn!("Input line exceeds {} bytes, discarding", self.line.max_len());
        self.renderer.unknown(&mut self.console);
        self.line.clear();
    }

    fn insert(&mut self, byte: u8) {
        let append = self.line.at_end();
        if !self.line.insert(byte) {
            // no room to open a slot
            return;
        }
        self.console.write_char(byte);
        if !append {
            self.renderer.sync_tail(&mut self.console, &self.line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: &[u8] = b"\x1b[D";
    const RIGHT: &[u8] = b"\x1b[C";
    const HOME: &[u8] = b"\x1b[1~";
    const END: &[u8] = b"\x1b[4~";
    const DELETE: &[u8] = b"\x1b[3~";

    /// Records everything the engine emits
    #[derive(Default)]
    struct Recorder {
        output: Vec<u8>,
        executed: Vec<Vec<String>>,
    }

    impl Console for Recorder {
        fn write_char(&mut self, byte: u8) {
            self.output.push(byte);
        }

        fn write_str(&mut self, bytes: &[u8]) {
            self.output.extend_from_slice(bytes);
        }

        fn execute(&mut self, args: &Args<'_>) {
            self.executed.push(args.to_vec());
        }
    }

    fn session() -> Session<Recorder> {
        Session::with_defaults(Recorder::default())
    }

    fn run(keys: &[&[u8]]) -> Session<Recorder> {
        let mut s = session();
        for k in keys {
            s.ingest_all(k);
        }
        s
    }

    /// Submit the line and return the parsed arguments, empty if none ran
    fn submit(keys: &[&[u8]]) -> Vec<String> {
        let mut s = run(keys);
        s.ingest(b'\n');
        assert!(s.is_empty());
        assert_eq!(s.cursor(), 0);
        s.console().executed.last().cloned().unwrap_or_default()
    }

    #[test]
    fn test_echo_single_char() {
        for c in [b'A', b'}', b' ', b'~'] {
            let s = run(&[&[c]]);
            assert_eq!(s.console().output, vec![c]);
            assert_eq!(s.line(), &[c]);
        }
    }

    #[test]
    fn test_control_char_not_echoed() {
        let s = run(&[&[0x15], &[0x03], &[0x80]]);
        assert!(s.console().output.is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_echo_sequence() {
        let s = run(&[b"ad[c]def"]);
        assert_eq!(s.console().output, b"ad[c]def");
        let s = run(&[b"ab c"]);
        assert_eq!(s.console().output, b"ab c");
    }

    #[test]
    fn test_tokenize_on_submit() {
        assert_eq!(submit(&[b"comm"]), vec!["comm"]);
        assert_eq!(submit(&[b"comm arg"]), vec!["comm", "arg"]);
        assert_eq!(submit(&[b"comm      arg"]), vec!["comm", "arg"]);
        assert_eq!(submit(&[b"   comm      arg "]), vec!["comm", "arg"]);
        assert_eq!(
            submit(&[b"comm arg0 arg1 arg2 arg3 arg4 arg5"]),
            vec!["comm", "arg0", "arg1", "arg2"]
        );
    }

    #[test]
    fn test_submit_keys() {
        for enter in [b'\n', b'\r'] {
            let mut s = run(&[b"comm"]);
            s.ingest(enter);
            assert_eq!(s.console().executed, vec![vec!["comm".to_string()]]);
        }
    }

    #[test]
    fn test_submit_output() {
        let mut s = run(&[b"ls"]);
        s.ingest(b'\r');
        assert_eq!(s.console().output, b"ls\r\n\x1b[0m\r\n>");
    }

    #[test]
    fn test_blank_line_submit() {
        let mut s = session();
        s.ingest(b'\n');
        assert!(s.console().executed.is_empty());
        assert_eq!(s.console().output, b"\x1b[0m\r\n>");

        let mut s = run(&[b"  "]);
        s.ingest(b'\n');
        assert!(s.console().executed.is_empty());
        assert!(s.is_empty());
    }

    #[test]
    fn test_backspace() {
        assert!(submit(&[&[0x08]]).is_empty());
        assert_eq!(submit(&[b"abcd", &[0x08]]), vec!["abc"]);
        assert_eq!(submit(&[b"abcde", &[0x08], &[0x7F]]), vec!["abc"]);
        assert_eq!(submit(&[b"abc", LEFT, LEFT, LEFT, &[0x08]]), vec!["abc"]);
        assert_eq!(submit(&[b"abc", LEFT, &[0x08]]), vec!["ac"]);
    }

    #[test]
    fn test_backspace_redraws_tail() {
        let mut s = run(&[b"abc", LEFT]);
        s.console_mut().output.clear();
        s.ingest(0x7F);
        assert_eq!(s.console().output, b"\x7f\x1b[Kc\x1b[3G");
    }

    #[test]
    fn test_delete_key() {
        assert_eq!(submit(&[b"abc", DELETE]), vec!["abc"]);
        assert_eq!(submit(&[b"abcd", LEFT, LEFT, DELETE]), vec!["abd"]);
        assert_eq!(submit(&[b"abc", LEFT, LEFT, LEFT, DELETE]), vec!["bc"]);

        let s = run(&[b"abcd", LEFT, LEFT, DELETE]);
        assert_eq!(s.line(), b"abd");
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn test_insert() {
        assert_eq!(submit(&[b"abd", LEFT, b"c"]), vec!["abcd"]);
        assert_eq!(submit(&[b"abf", LEFT, LEFT, b"d"]), vec!["adbf"]);
        assert_eq!(submit(&[b"be", LEFT, LEFT, b"a"]), vec!["abe"]);
        assert_eq!(submit(&[b"be", LEFT, LEFT, LEFT, b"a"]), vec!["abe"]);
        assert_eq!(submit(&[b"abd", LEFT, b"ce"]), vec!["abced"]);
        assert_eq!(submit(&[b"bef", LEFT, LEFT, b"a", RIGHT, b"c"]), vec!["baecf"]);
    }

    #[test]
    fn test_insert_middle_redraws() {
        let mut s = run(&[b"abf", LEFT, LEFT]);
        s.console_mut().output.clear();
        s.ingest(b'd');
        assert_eq!(s.line(), b"adbf");
        assert_eq!(s.console().output, b"d\x1b[Kbf\x1b[4G");
    }

    #[test]
    fn test_home_end() {
        assert_eq!(submit(&[b"bcd", HOME, b"a"]), vec!["abcd"]);
        assert_eq!(submit(&[b"bcd", &[0x01], b"a"]), vec!["abcd"]);
        assert_eq!(submit(&[b"bcd", HOME, b"a", END, b"e"]), vec!["abcde"]);
        assert_eq!(submit(&[b"bcd", HOME, b"a", &[0x05], b"e"]), vec!["abcde"]);
    }

    #[test]
    fn test_ctrl_arrows() {
        assert_eq!(submit(&[b"ac", &[0x02], b"b"]), vec!["abc"]);
        assert_eq!(submit(&[b"ac", &[0x02, 0x02, 0x06], b"b"]), vec!["abc"]);
    }

    #[test]
    fn test_left_at_home_repositions() {
        let mut s = session();
        s.ingest(0x02);
        assert_eq!(s.console().output, b"\x1b[2G");
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_right_at_end_is_silent() {
        let mut s = run(&[b"ab"]);
        s.console_mut().output.clear();
        s.ingest_all(RIGHT);
        assert!(s.console().output.is_empty());
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn test_ctrl_u() {
        assert!(submit(&[b"abc", &[0x15]]).is_empty());
        assert_eq!(submit(&[b"abc", HOME, &[0x15]]), vec!["abc"]);
        assert_eq!(submit(&[b"abcd", LEFT, LEFT, &[0x15]]), vec!["cd"]);

        let s = run(&[b"abcd", LEFT, LEFT, &[0x15]]);
        assert_eq!(s.line(), b"cd");
        assert_eq!(s.cursor(), 0);
    }

    #[test]
    fn test_ctrl_k() {
        assert_eq!(submit(&[b"abc", &[0x0B]]), vec!["abc"]);
        assert!(submit(&[b"abc", HOME, &[0x0B]]).is_empty());
        assert_eq!(submit(&[b"abcd", LEFT, LEFT, &[0x0B]]), vec!["ab"]);
    }

    #[test]
    fn test_alt_key_inserts_nothing() {
        let mut s = run(&[b"ab"]);
        s.console_mut().output.clear();
        s.ingest_all(b"\x1bx");
        assert!(s.console().output.is_empty());
        assert_eq!(s.line(), b"ab");
        s.ingest(b'c');
        assert_eq!(s.line(), b"abc");
    }

    #[test]
    fn test_ctrl_u_output() {
        let mut s = run(&[b"abcd", LEFT, LEFT]);
        s.console_mut().output.clear();
        s.ingest(0x15);
        assert_eq!(s.console().output, b"\x1b[2G\x1b[Kcd\x1b[2G");
    }

    #[test]
    fn test_ctrl_k_output() {
        let mut s = run(&[b"abcd", LEFT, LEFT]);
        s.console_mut().output.clear();
        s.ingest(0x0B);
        assert_eq!(s.console().output, b"\x1b[K\x1b[4G");
        assert_eq!(s.line(), b"ab");
    }

    #[test]
    fn test_delete_key_output() {
        let mut s = run(&[b"abcd", LEFT, LEFT]);
        s.console_mut().output.clear();
        s.ingest_all(DELETE);
        assert_eq!(s.console().output, b"\x1b[Kd\x1b[4G");
        assert_eq!(s.line(), b"abd");
        assert_eq!(s.cursor(), 2);
    }

    #[test]
    fn test_escape_overflow_keeps_line() {
        let mut s = run(&[b"abc", LEFT]);
        s.console_mut().output.clear();
        s.ingest_all(b"\x1b[1234");
        assert!(s.escape_state().is_idle());
        assert_eq!(s.line(), b"abc");
        assert_eq!(s.cursor(), 2);
        assert_eq!(s.console().output, b"\r\n?\r\n>abc\x1b[4G");
        assert_eq!(submit(&[b"ab", b"\x1b[1234", b"c"]), vec!["abc"]);
    }

    #[test]
    fn test_unknown_sequence_is_silent() {
        let mut s = run(&[b"ab"]);
        s.console_mut().output.clear();
        s.ingest_all(b"\x1b[A\x1b[2~");
        assert!(s.console().output.is_empty());
        assert_eq!(s.line(), b"ab");
    }

    #[test]
    fn test_truncated_sequence_restarts() {
        assert_eq!(submit(&[b"abc", b"\x1b[", LEFT, b"x"]), vec!["abxc"]);
        assert_eq!(submit(&[b"abc", b"\x1b[1", b"[D", b"x"]), vec!["abxc"]);
    }

    #[test]
    fn test_buffer_full_resets_line() {
        let mut s = session();
        let max = s.capacity() - 2;
        for _ in 0..max {
            s.ingest(b'x');
        }
        assert_eq!(s.len(), max);
        s.console_mut().output.clear();
        s.ingest(b'y');
        assert!(s.is_empty());
        assert_eq!(s.console().output, b"\r\n?\r\n>");
    }

    #[test]
    fn test_full_line_drops_middle_insert() {
        let mut s = session();
        let max = s.capacity() - 2;
        for _ in 0..max {
            s.ingest(b'x');
        }
        s.ingest_all(LEFT);
        s.console_mut().output.clear();
        s.ingest(b'y');
        assert_eq!(s.len(), max);
        assert!(!s.line().contains(&b'y'));
        assert!(s.console().output.is_empty());
    }

    #[test]
    fn test_invariants_hold_for_mixed_input() {
        let mut s = Session::new(
            Recorder::default(),
            &EditorConfig {
                capacity: 12,
                ..EditorConfig::default()
            },
        );
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..5000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let byte = match (seed >> 16) % 8 {
                0 => 0x1B,
                1 => b'[',
                2 => [0x01, 0x02, 0x05, 0x06, 0x0B, 0x15, 0x08, 0x7F][(seed >> 8) as usize % 8],
                3 => [b'C', b'D', b'1', b'3', b'4', b'~'][(seed >> 8) as usize % 6],
                4 if seed % 7 == 0 => b'\r',
                _ => b'a' + ((seed >> 4) % 26) as u8,
            };
            s.ingest(byte);
            assert!(s.cursor() <= s.len());
            assert!(s.len() <= s.capacity() - 2);
        }
    }

    #[test]
    fn test_borrowed_console() {
        let mut recorder = Recorder::default();
        {
            let mut s = Session::with_defaults(&mut recorder);
            s.ingest_all(b"hi there\r");
        }
        assert_eq!(recorder.executed, vec![vec!["hi".to_string(), "there".to_string()]]);
    }

    #[test]
    fn test_reset_clears_partial_sequence() {
        let mut s = run(&[b"abc", b"\x1b[1"]);
        s.reset();
        assert!(s.escape_state().is_idle());
        assert!(s.is_empty());
        s.ingest(b'D');
        assert_eq!(s.line(), b"D");
    }

    #[test]
    fn test_custom_prompt_offsets_columns() {
        let mut s = Session::new(
            Recorder::default(),
            &EditorConfig {
                prompt: "dev> ".to_string(),
                ..EditorConfig::default()
            },
        );
        s.show_prompt();
        s.ingest_all(b"ab");
        s.ingest(0x01);
        assert!(s.console().output.ends_with(b"\x1b[6G"));
    }
}
