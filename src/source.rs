//! Character sources with one codepoint of lookahead.
//!
//! The scanner needs to peek at the character following a forced break
//! without consuming it. [`IterSource`] gets this from [`Peekable`];
//! [`ReaderSource`] decodes UTF-8 from a [`BufRead`] and keeps a one-slot
//! read-ahead cache.

use std::{
    io::{self, BufRead},
    iter::Peekable,
    str::Chars,
};

use crate::error::WrapError;

/// Pull source of codepoints.
///
/// `Ok(None)` signals end of input, which is distinct from a hard failure.
pub trait CharSource {
    /// Consume the next codepoint.
    ///
    /// # Errors
    /// Returns an error if the underlying input cannot be read or decoded.
    fn next_char(&mut self) -> Result<Option<char>, WrapError>;

    /// Return the next codepoint without consuming it.
    ///
    /// # Errors
    /// Returns an error if the underlying input cannot be read or decoded.
    fn peek_char(&mut self) -> Result<Option<char>, WrapError>;
}

impl<S: CharSource + ?Sized> CharSource for &mut S {
    fn next_char(&mut self) -> Result<Option<char>, WrapError> {
        (**self).next_char()
    }

    fn peek_char(&mut self) -> Result<Option<char>, WrapError> {
        (**self).peek_char()
    }
}

/// Infallible source over any `char` iterator.
#[derive(Debug, Clone)]
pub struct IterSource<I: Iterator<Item = char>> {
    inner: Peekable<I>,
}

/// Source over a borrowed string.
pub type StrSource<'a> = IterSource<Chars<'a>>;

impl<I: Iterator<Item = char>> IterSource<I> {
    pub fn new(iter: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: iter.into_iter().peekable(),
        }
    }
}

impl<'a> From<&'a str> for StrSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.chars())
    }
}

impl<I: Iterator<Item = char>> CharSource for IterSource<I> {
    fn next_char(&mut self) -> Result<Option<char>, WrapError> {
        Ok(self.inner.next())
    }

    fn peek_char(&mut self) -> Result<Option<char>, WrapError> {
        Ok(self.inner.peek().copied())
    }
}

/// Incremental UTF-8 decoder over a buffered reader.
///
/// Invalid sequences are reported as [`WrapError::InvalidUtf8`] with the byte
/// offset of the offending lead byte. Interrupted reads are retried.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
    peeked: Option<char>,
    offset: usize,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            peeked: None,
            offset: 0,
        }
    }

    /// Bytes consumed from the reader so far, including a peeked character.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Decode one codepoint from a window of at most four buffered bytes.
    ///
    /// A window that ends inside a valid sequence is held back and topped up
    /// from the next fill, so sequences may straddle buffer boundaries.
    fn decode(&mut self) -> Result<Option<char>, WrapError> {
        let start = self.offset;
        let invalid = || WrapError::InvalidUtf8 { offset: start };
        let mut window = [0u8; 4];
        let mut held = 0;
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(WrapError::read(err)),
            };
            if buf.is_empty() {
                return if held == 0 { Ok(None) } else { Err(invalid()) };
            }
            let take = buf.len().min(window.len() - held);
            window[held..held + take].copy_from_slice(&buf[..take]);
            let filled = held + take;
            match bstr::decode_utf8(&window[..filled]) {
                (Some(ch), size) => {
                    let used = size - held;
                    self.reader.consume(used);
                    self.offset += used;
                    return Ok(Some(ch));
                }
                // Truncated but so far valid.
                (None, size) if size == filled && filled < window.len() => {
                    self.reader.consume(take);
                    self.offset += take;
                    held = filled;
                }
                (None, _) => return Err(invalid()),
            }
        }
    }
}

impl<R: BufRead> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> Result<Option<char>, WrapError> {
        match self.peeked.take() {
            Some(ch) => Ok(Some(ch)),
            None => self.decode(),
        }
    }

    fn peek_char(&mut self) -> Result<Option<char>, WrapError> {
        if self.peeked.is_none() {
            self.peeked = self.decode()?;
        }
        Ok(self.peeked)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufReader, Cursor, Read};

    use rstest::rstest;

    use super::*;

    fn drain(source: &mut impl CharSource) -> Result<String, WrapError> {
        let mut out = String::new();
        while let Some(ch) = source.next_char()? {
            out.push(ch);
        }
        Ok(out)
    }

    #[test]
    fn str_source_peek_does_not_consume() {
        let mut src = StrSource::from("ab");
        assert_eq!(src.peek_char().unwrap(), Some('a'));
        assert_eq!(src.peek_char().unwrap(), Some('a'));
        assert_eq!(src.next_char().unwrap(), Some('a'));
        assert_eq!(src.next_char().unwrap(), Some('b'));
        assert_eq!(src.peek_char().unwrap(), None);
        assert_eq!(src.next_char().unwrap(), None);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(64)]
    fn reader_source_decodes_across_buffer_boundaries(#[case] capacity: usize) {
        let text = "Käse 😀 日本";
        let reader = BufReader::with_capacity(capacity, Cursor::new(text.as_bytes()));
        let mut src = ReaderSource::new(reader);
        assert_eq!(drain(&mut src).unwrap(), text);
        assert_eq!(src.offset(), text.len());
    }

    #[test]
    fn reader_source_peek_then_next() {
        let mut src = ReaderSource::new(Cursor::new("ñx".as_bytes()));
        assert_eq!(src.peek_char().unwrap(), Some('ñ'));
        assert_eq!(src.offset(), 2);
        assert_eq!(src.next_char().unwrap(), Some('ñ'));
        assert_eq!(src.next_char().unwrap(), Some('x'));
        assert_eq!(src.peek_char().unwrap(), None);
        assert_eq!(src.next_char().unwrap(), None);
    }

    #[rstest]
    #[case(&[b'a', 0xFF], 1)]
    #[case(&[0xC3], 0)]
    #[case(&[b'o', b'k', 0xE2, 0x28, 0xA1], 2)]
    #[case(&[0xED, 0xA0, 0x80], 0)]
    fn reader_source_rejects_invalid_utf8(#[case] bytes: &[u8], #[case] offset: usize) {
        let mut src = ReaderSource::new(Cursor::new(bytes));
        let err = drain(&mut src).unwrap_err();
        assert!(
            matches!(err, WrapError::InvalidUtf8 { offset: o } if o == offset),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    #[case(1, &[0xE6, 0x97, b'x'], 0)]
    #[case(2, &[b'a', 0xF0, 0x9F, 0x98], 1)]
    #[case(1, &[b'a', b'b', 0xC3], 2)]
    fn reader_source_rejects_truncated_sequences_across_fills(
        #[case] capacity: usize,
        #[case] bytes: &[u8],
        #[case] offset: usize,
    ) {
        let mut src = ReaderSource::new(BufReader::with_capacity(capacity, Cursor::new(bytes)));
        let err = drain(&mut src).unwrap_err();
        assert!(
            matches!(err, WrapError::InvalidUtf8 { offset: o } if o == offset),
            "unexpected error: {err:?}"
        );
    }

    struct Flaky {
        interrupted: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::ErrorKind::Interrupted.into());
            }
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
        }
    }

    #[test]
    fn reader_source_retries_interrupts_and_reports_failures() {
        let mut src = ReaderSource::new(BufReader::new(Flaky { interrupted: false }));
        let err = src.next_char().unwrap_err();
        let WrapError::Read(inner) = err else {
            panic!("expected read error, got {err:?}");
        };
        assert_eq!(inner.kind(), io::ErrorKind::ConnectionReset);
    }
}
