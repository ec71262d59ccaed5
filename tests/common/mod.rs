//! Utility helpers shared across integration tests.
#![allow(dead_code)]

use assert_cmd::{Command, assert::Assert};

/// Build a `Vec<String>` from a list of string slices.
macro_rules! lines_vec {
    ($($line:expr),* $(,)?) => {
        vec![$($line.to_string()),*]
    };
}

/// Run the `wordwrap` binary with `args`, feeding `input` on stdin.
pub fn run_cli_with_stdin(args: &[&str], input: &str) -> Assert {
    Command::cargo_bin("wordwrap")
        .expect("Failed to create cargo command for wordwrap")
        .args(args)
        .write_stdin(input)
        .assert()
}

/// Assert that every line fits in `width` codepoints once `prefix` is removed,
/// that no line ends in whitespace and that empty lines carry no prefix.
pub fn assert_wrapped(lines: &[String], width: usize, prefix: &str) {
    for line in lines {
        if line.is_empty() {
            continue;
        }
        let body = line
            .strip_prefix(prefix)
            .unwrap_or_else(|| panic!("line {line:?} lacks prefix {prefix:?}"));
        assert!(
            body.chars().count() <= width,
            "line {line:?} is wider than {width}"
        );
        assert!(
            !line.ends_with(char::is_whitespace),
            "line {line:?} has trailing whitespace"
        );
    }
}
