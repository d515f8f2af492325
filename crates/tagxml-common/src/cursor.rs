//! Position-tracking scanner over a text buffer.
//!
//! This module provides [`TextCursor`], a cursor-like type that walks a `&str`
//! by character while exposing plain byte offsets, so callers can store and
//! restore positions without re-scanning.

/// A scanner that reads characters from a string slice without copying.
///
/// Positions are byte offsets and always lie on character boundaries.
///
/// # Example
///
/// ```
/// use tagxml_common::TextCursor;
///
/// let mut cursor = TextCursor::new("  KEY=value>");
/// cursor.skip_while(|c| c == ' ');
/// assert_eq!(cursor.take_until(|c| c == '='), "KEY");
/// assert_eq!(cursor.position(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> TextCursor<'a> {
    /// Create a new cursor at the start of `text`.
    #[inline]
    pub const fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    /// Create a new cursor starting at a specific byte offset.
    ///
    /// Offsets past the end are clamped to the end; an offset inside a
    /// multi-byte character moves back to that character's start.
    #[inline]
    pub fn new_at(text: &'a str, position: usize) -> Self {
        Self {
            text,
            position: floor_boundary(text, position),
        }
    }

    /// Get the current byte offset.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the total length of the underlying text in bytes.
    #[inline]
    pub const fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the cursor has reached the end of the text.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Seek to an absolute byte offset, clamped like [`new_at`](Self::new_at).
    #[inline]
    pub fn seek(&mut self, position: usize) {
        self.position = floor_boundary(self.text, position);
    }

    /// Get the unread text.
    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.text[self.position..]
    }

    /// Peek at the next character without advancing.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Read the next character and advance past it.
    #[inline]
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Advance past the next character if it equals `expected`.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.position += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Advance while `pred` holds for the next character.
    pub fn skip_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.position += c.len_utf8();
        }
    }

    /// Read characters up to (not including) the first one matching `stop`.
    pub fn take_until(&mut self, mut stop: impl FnMut(char) -> bool) -> &'a str {
        let start = self.position;
        self.skip_while(|c| !stop(c));
        &self.text[start..self.position]
    }

    /// Advance to the next occurrence of `c`, or to the end of the text.
    ///
    /// Returns the skipped text. ASCII characters are located with `memchr`.
    pub fn skip_to(&mut self, c: char) -> &'a str {
        let start = self.position;
        self.position = find_char(self.text, start, c).unwrap_or(self.text.len());
        &self.text[start..self.position]
    }

    /// Check whether the unread text starts with `prefix`.
    #[inline]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.remaining().starts_with(prefix)
    }
}

/// Clamp `position` to `text` and back it up to a character boundary.
fn floor_boundary(text: &str, position: usize) -> usize {
    let mut position = position.min(text.len());
    while !text.is_char_boundary(position) {
        position -= 1;
    }
    position
}

/// Find the byte offset of `c` in `text`, searching from `from`.
#[inline]
pub fn find_char(text: &str, from: usize, c: char) -> Option<usize> {
    let haystack = text.get(from..)?;
    if c.is_ascii() {
        memchr::memchr(c as u8, haystack.as_bytes()).map(|i| from + i)
    } else {
        haystack.find(c).map(|i| from + i)
    }
}
