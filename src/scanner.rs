//! Streaming line-wrap scanner.
//!
//! The scanner consumes one codepoint at a time and keeps three
//! accumulators: the committed line, the pending whitespace run and the
//! pending word. Whitespace is only ever committed together with the word
//! that follows it, which is what trims trailing whitespace from every line.
//!
//! When the three together reach the width limit a wrap decision is forced.
//! The scanner peeks one codepoint ahead to tell a natural word boundary from
//! a word that keeps growing, and splits a word only once it alone fills the
//! limit.

use std::{
    io::{self, BufRead},
    num::NonZeroUsize,
};

use tracing::{debug, trace};

use crate::{
    counted::CountedBuf,
    error::{DrainError, WrapError},
    options::{DEFAULT_TAB_WIDTH, WrapOptions},
    source::{CharSource, ReaderSource, StrSource},
};

#[derive(Debug)]
enum Terminal {
    End,
    Failed(WrapError),
}

/// Wraps text from a [`CharSource`] into lines no wider than a fixed limit.
///
/// Newlines in the input are preserved, including blank and trailing lines.
/// Trailing whitespace is stripped from every produced line and tabs are
/// expanded to spaces.
///
/// A scanner is a sequential cursor over one source; it is not meant to be
/// shared between callers.
#[derive(Debug)]
pub struct Scanner<S> {
    source: S,
    width: usize,
    prefix: String,
    tab_width: usize,

    terminal: Option<Terminal>,
    line: CountedBuf,
    word: CountedBuf,
    space: CountedBuf,
    /// Codepoints of `prefix` sitting at the start of `line`.
    prefix_chars: usize,
    /// The last forced break cut a line; the next non-whitespace character
    /// ends the current read.
    need_newline: bool,
    /// Discard non-newline whitespace until content resumes.
    skip_next_ws: bool,
}

impl<S: CharSource> Scanner<S> {
    /// Create a scanner with no prefix and the default tab width.
    ///
    /// The scanner owns `source`; nothing else should read from it.
    pub fn new(source: S, width: NonZeroUsize) -> Self {
        Self {
            source,
            width: width.get(),
            prefix: String::new(),
            tab_width: DEFAULT_TAB_WIDTH,
            terminal: None,
            line: CountedBuf::new(),
            word: CountedBuf::new(),
            space: CountedBuf::new(),
            prefix_chars: 0,
            need_newline: false,
            skip_next_ws: false,
        }
    }

    /// Create a scanner configured from `options`.
    pub fn with_options(source: S, options: &WrapOptions) -> Self {
        let mut scanner = Self::new(source, options.width);
        scanner.set_prefix(options.prefix.clone());
        scanner.set_tab_width(options.tab_width);
        scanner
    }

    /// Set a string to put in front of every future non-empty line.
    ///
    /// The prefix does not count towards the width limit. Safe to call
    /// between reads.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Set the number of columns per tab stop. Zero drops tabs entirely.
    pub fn set_tab_width(&mut self, tab_width: usize) {
        self.tab_width = tab_width;
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Read the next wrapped line, without its line terminator.
    ///
    /// Returns `Ok(None)` once the input is exhausted and on every call after
    /// that. At least one line is produced, even for empty input.
    ///
    /// # Errors
    /// Returns the source's error if reading fails. The scanner then stays
    /// failed and returns the same error on every later call.
    pub fn read_line(&mut self) -> Result<Option<String>, WrapError> {
        match &self.terminal {
            Some(Terminal::End) => return Ok(None),
            Some(Terminal::Failed(err)) => return Err(err.clone()),
            None => {}
        }
        match self.scan_line() {
            Ok(line) => Ok(Some(line)),
            Err(err) => {
                debug!(error = %err, "input failed; scanner is now terminal");
                self.terminal = Some(Terminal::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Write every remaining line to `out`, separated by `\n`.
    ///
    /// No newline follows the last line. Returns the number of bytes written.
    ///
    /// # Errors
    /// Returns a [`DrainError`] carrying the bytes written so far if reading
    /// the input or writing to `out` fails.
    pub fn write_to<W: io::Write + ?Sized>(&mut self, out: &mut W) -> Result<u64, DrainError> {
        let mut written = 0u64;
        let mut first = true;
        while let Some(line) = self
            .read_line()
            .map_err(|err| DrainError::read(written, err))?
        {
            if !first {
                out.write_all(b"\n")
                    .map_err(|err| DrainError::write(written, err))?;
                written += 1;
            }
            out.write_all(line.as_bytes())
                .map_err(|err| DrainError::write(written, err))?;
            written += line.len() as u64;
            first = false;
        }
        Ok(written)
    }

    fn scan_line(&mut self) -> Result<String, WrapError> {
        // A word carried over by the previous read has not been measured yet.
        if self.pending() >= self.width {
            self.force_break()?;
        }
        while let Some(ch) = self.source.next_char()? {
            if ch.is_whitespace() {
                self.flush_word();
                if ch == '\n' {
                    self.skip_next_ws = false;
                    self.space.clear();
                    return Ok(self.take_line());
                }
                if self.skip_next_ws {
                    continue;
                }
                if ch == '\t' {
                    self.expand_tab();
                } else {
                    self.space.push(ch);
                }
            } else {
                self.word.push(ch);
                self.skip_next_ws = false;
                if self.need_newline {
                    // `ch` stays in the pending word for the next read.
                    self.need_newline = false;
                    return Ok(self.take_line());
                }
            }

            if self.pending() >= self.width {
                self.force_break()?;
            }
        }

        self.flush_word();
        self.terminal = Some(Terminal::End);
        debug!("end of input");
        Ok(self.take_line())
    }

    fn force_break(&mut self) -> Result<(), WrapError> {
        let next = self.source.peek_char()?;
        let word_full = self.word.count() >= self.width;
        if word_full || next.is_none_or(char::is_whitespace) {
            self.flush_word();
        }
        if next.is_some_and(|c| c != '\n') && self.space.count() < self.width {
            self.need_newline = true;
        }
        trace!(
            committed = self.committed(),
            pending_word = self.word.count(),
            word_full,
            need_newline = self.need_newline,
            "forced break"
        );
        self.skip_next_ws = true;
        self.space.clear();
        Ok(())
    }

    /// Commit the prefix (on an empty line), pending space and pending word.
    fn flush_word(&mut self) {
        if self.word.is_empty() {
            return;
        }
        if self.line.is_empty() {
            self.line.push_str(&self.prefix);
            self.prefix_chars = self.line.count();
        }
        self.space.transfer_to(&mut self.line);
        self.word.transfer_to(&mut self.line);
    }

    /// Pad the pending space run up to the next tab stop of the committed line.
    fn expand_tab(&mut self) {
        if self.tab_width == 0 {
            return;
        }
        let count = self.tab_width - self.committed() % self.tab_width;
        self.space.push_spaces(count);
    }

    /// Codepoints on the committed line, excluding the prefix.
    fn committed(&self) -> usize {
        self.line.count() - self.prefix_chars
    }

    fn pending(&self) -> usize {
        self.committed() + self.word.count() + self.space.count()
    }

    fn take_line(&mut self) -> String {
        self.prefix_chars = 0;
        self.line.take()
    }
}

impl<'a> Scanner<StrSource<'a>> {
    /// Scanner over an in-memory string.
    pub fn for_str(text: &'a str, options: &WrapOptions) -> Self {
        Self::with_options(StrSource::from(text), options)
    }
}

impl<R: BufRead> Scanner<ReaderSource<R>> {
    /// Scanner decoding UTF-8 from a buffered reader.
    pub fn from_reader(reader: R, options: &WrapOptions) -> Self {
        Self::with_options(ReaderSource::new(reader), options)
    }
}

/// Yields each line, stopping at end of input. A read failure is yielded
/// once, after which the iterator is exhausted.
impl<S: CharSource> Iterator for Scanner<S> {
    type Item = Result<String, WrapError>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.terminal, Some(Terminal::Failed(_))) {
            return None;
        }
        self.read_line().transpose()
    }
}
