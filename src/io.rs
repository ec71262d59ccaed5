//! File helpers for wrapping documents on disk.

use std::{
    fs::{self, File},
    io::BufReader,
    path::Path,
};

use crate::{options::WrapOptions, scanner::Scanner};

/// Wrap the contents of a file, returning the lines joined with `\n`.
///
/// The file is streamed through the scanner rather than read up front.
///
/// # Errors
/// Returns an error if the file cannot be opened or read, or if it is not
/// valid UTF-8.
pub fn wrap_file(path: &Path, options: &WrapOptions) -> std::io::Result<String> {
    let reader = BufReader::new(File::open(path)?);
    let mut out = Vec::new();
    Scanner::from_reader(reader, options).write_to(&mut out)?;
    String::from_utf8(out).map_err(std::io::Error::other)
}

/// Rewrite a file in place with wrapped text.
///
/// A trailing newline survives wrapping, so rewriting is idempotent for a
/// fixed set of options.
///
/// # Errors
/// Returns an error if reading or writing the file fails.
pub fn rewrite(path: &Path, options: &WrapOptions) -> std::io::Result<()> {
    let wrapped = wrap_file(path, options)?;
    fs::write(path, wrapped)
}
