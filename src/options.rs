//! Wrapping configuration and whole-string helpers.

use std::num::NonZeroUsize;

use crate::{error::WrapError, scanner::Scanner};

/// Column limit used when none is given.
pub const DEFAULT_WIDTH: NonZeroUsize = NonZeroUsize::new(80).expect("80 is non-zero");

/// Spaces per tab stop used when none is given.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Settings applied to a [`Scanner`].
///
/// `width` counts codepoints and excludes `prefix`. A `tab_width` of zero
/// makes tabs vanish from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapOptions {
    pub width: NonZeroUsize,
    pub prefix: String,
    pub tab_width: usize,
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            prefix: String::new(),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl WrapOptions {
    /// Options with the given column limit and defaults elsewhere.
    ///
    /// # Errors
    /// Returns [`WrapError::ZeroWidth`] if `width` is zero.
    pub fn new(width: usize) -> Result<Self, WrapError> {
        let width = NonZeroUsize::new(width).ok_or(WrapError::ZeroWidth)?;
        Ok(Self {
            width,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

/// Wrap `text` into lines without trailing newline characters.
///
/// Always returns at least one line; empty input yields `[""]`.
///
/// # Examples
///
/// ```
/// use wordwrap::{WrapOptions, wrap_str};
///
/// let opts = WrapOptions::new(4).unwrap();
/// assert_eq!(wrap_str("stupendous", &opts), ["stup", "endo", "us"]);
/// ```
#[must_use]
pub fn wrap_str(text: &str, options: &WrapOptions) -> Vec<String> {
    // In-memory sources never fail, so every item is `Ok`.
    Scanner::for_str(text, options).flatten().collect()
}

/// Wrap `text` and join the lines with `\n`.
#[must_use]
pub fn wrap_to_string(text: &str, options: &WrapOptions) -> String {
    wrap_str(text, options).join("\n")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn zero_width_is_rejected() {
        assert!(matches!(WrapOptions::new(0), Err(WrapError::ZeroWidth)));
    }

    #[test]
    fn builder_sets_fields() {
        let opts = WrapOptions::new(12)
            .unwrap()
            .with_prefix("> ")
            .with_tab_width(8);
        assert_eq!(opts.width.get(), 12);
        assert_eq!(opts.prefix, "> ");
        assert_eq!(opts.tab_width, 8);
    }

    #[test]
    fn defaults() {
        let opts = WrapOptions::default();
        assert_eq!(opts.width.get(), 80);
        assert!(opts.prefix.is_empty());
        assert_eq!(opts.tab_width, 4);
    }

    #[rstest]
    #[case("", 4, "")]
    #[case("foo bar baz", 4, "foo\nbar\nbaz")]
    #[case("foo\n\n\nbar\n", 8, "foo\n\n\nbar\n")]
    fn wrap_to_string_joins_lines(#[case] input: &str, #[case] width: usize, #[case] expected: &str) {
        let opts = WrapOptions::new(width).unwrap();
        assert_eq!(wrap_to_string(input, &opts), expected);
    }
}
