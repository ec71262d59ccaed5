//! Text accumulator that tracks its codepoint count alongside its bytes.
//!
//! The scanner asks "how many characters are pending?" after every input
//! character, so the count is cached here instead of re-scanning the UTF-8
//! bytes each time.

use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountedBuf {
    text: String,
    chars: usize,
}

impl CountedBuf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of codepoints held by the buffer.
    #[must_use]
    pub fn count(&self) -> usize {
        self.chars
    }

    /// Encoded length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Append a single codepoint, returning the number of bytes written.
    pub fn push(&mut self, ch: char) -> usize {
        self.text.push(ch);
        self.chars += 1;
        ch.len_utf8()
    }

    /// Append a fragment, returning the number of bytes written.
    ///
    /// The count grows by the fragment's codepoints, not its byte length.
    pub fn push_str(&mut self, fragment: &str) -> usize {
        self.text.push_str(fragment);
        self.chars += fragment.chars().count();
        fragment.len()
    }

    /// Append `n` ASCII spaces.
    pub fn push_spaces(&mut self, n: usize) {
        self.text.extend(std::iter::repeat_n(' ', n));
        self.chars += n;
    }

    /// Move the whole buffer onto the end of `other`, leaving `self` empty.
    ///
    /// Returns the number of bytes moved.
    pub fn transfer_to(&mut self, other: &mut CountedBuf) -> usize {
        let moved = self.text.len();
        other.text.push_str(&self.text);
        other.chars += self.chars;
        self.clear();
        moved
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.chars = 0;
    }

    /// Return the accumulated text and reset the buffer.
    pub fn take(&mut self) -> String {
        self.chars = 0;
        std::mem::take(&mut self.text)
    }
}

impl fmt::Write for CountedBuf {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s);
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.push(c);
        Ok(())
    }
}

impl fmt::Display for CountedBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
