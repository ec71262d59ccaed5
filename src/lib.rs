//! Streaming word wrap.
//!
//! A [`Scanner`] re-flows text pulled from a [`CharSource`] into lines that
//! never exceed a fixed number of codepoints. It breaks on whitespace where it
//! can, splits overlong words only when they alone fill a line, preserves
//! explicit newlines (blank and trailing ones included) and trims trailing
//! whitespace from every line.
//!
//! ```
//! use wordwrap::{WrapOptions, wrap_str};
//!
//! let opts = WrapOptions::new(9).unwrap();
//! assert_eq!(wrap_str("foo  bar  baz", &opts), ["foo  bar", "baz"]);
//! ```

pub mod counted;
pub mod error;
pub mod io;
pub mod options;
pub mod scanner;
pub mod source;

pub use counted::CountedBuf;
pub use error::{DrainError, DrainErrorKind, WrapError};
pub use io::{rewrite, wrap_file};
pub use options::{DEFAULT_TAB_WIDTH, DEFAULT_WIDTH, WrapOptions, wrap_str, wrap_to_string};
pub use scanner::Scanner;
pub use source::{CharSource, IterSource, ReaderSource, StrSource};
