//! Whitespace tokenizer
//!
//! Splits a submitted line into argument spans in place. Whitespace that
//! ends a token is overwritten with a NUL, so the text is not preserved.

use std::str;

/// Location of one token inside a submitted line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

/// Tokenize `text` into `spans`, returning the number of tokens found.
///
/// Scanning stops at the first NUL or at the end of `text`, and silently
/// once `spans` is full. Spans past the returned count are left untouched.
pub fn tokenize(text: &mut [u8], spans: &mut [Span]) -> usize {
    let mut count = 0;
    let mut current: Option<usize> = None;

    for i in 0..text.len() {
        let byte = text[i];
        if byte == 0 {
            break;
        }
        if is_space(byte) {
            if let Some(start) = current.take() {
                text[i] = 0;
                spans[count - 1] = Span { start, len: i - start };
            }
        } else if current.is_none() {
            if count == spans.len() {
                break;
            }
            current = Some(i);
            spans[count] = Span { start: i, len: 0 };
            count += 1;
        }
    }

    // Token running to the end of the text
    if let Some(start) = current {
        let end = text[start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(text.len(), |p| start + p);
        spans[count - 1] = Span { start, len: end - start };
    }

    count
}

/// Tokens of one submitted line.
///
/// Borrows the engine's snapshot of the line, so it is only usable while
/// the `execute` call that received it is running.
#[derive(Debug, Clone, Copy)]
pub struct Args<'a> {
    line: &'a [u8],
    spans: &'a [Span],
}

impl<'a> Args<'a> {
    pub fn new(line: &'a [u8], spans: &'a [Span]) -> Self {
        Self { line, spans }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Raw bytes of argument `index`
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.spans.get(index).map(|s| &self.line[s.start..s.end()])
    }

    /// Argument `index` as text. Tokens are printable ASCII, so this only
    /// fails for an out-of-range index.
    pub fn get_str(&self, index: usize) -> Option<&'a str> {
        self.get(index).and_then(|b| str::from_utf8(b).ok())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let (line, spans) = (self.line, self.spans);
        spans.iter().map(move |s| &line[s.start..s.end()])
    }

    /// Owned copies of every argument
    pub fn to_vec(&self) -> Vec<String> {
        self.iter()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .collect()
    }
}
