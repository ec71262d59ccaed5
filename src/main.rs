use std::{
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;
use wordwrap::{DEFAULT_TAB_WIDTH, DEFAULT_WIDTH, Scanner, WrapOptions, rewrite, wrap_file};

#[derive(Parser)]
#[command(version, about = "Wrap text to a fixed column width")]
struct Cli {
    /// Rewrite files in place
    #[arg(long = "in-place", requires = "files")]
    in_place: bool,
    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
    #[command(flatten)]
    opts: FormatOpts,
    /// Text files to wrap; standard input is used when none are given
    files: Vec<PathBuf>,
}

#[derive(clap::Args, Clone)]
struct FormatOpts {
    /// Maximum line width in characters, excluding the prefix
    #[arg(short, long, default_value_t = DEFAULT_WIDTH)]
    width: NonZeroUsize,
    /// String placed before every non-empty line
    #[arg(short, long, default_value = "")]
    prefix: String,
    /// Columns per tab stop; 0 removes tabs
    #[arg(short, long = "tab-width", default_value_t = DEFAULT_TAB_WIDTH)]
    tab_width: usize,
}

impl From<FormatOpts> for WrapOptions {
    fn from(opts: FormatOpts) -> Self {
        Self {
            width: opts.width,
            prefix: opts.prefix,
            tab_width: opts.tab_width,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn wrap_stdin(options: &WrapOptions) -> anyhow::Result<()> {
    let stdin = io::stdin().lock();
    let mut out = BufWriter::new(io::stdout().lock());
    let written = Scanner::from_reader(stdin, options)
        .write_to(&mut out)
        .context("failed to wrap standard input")?;
    out.flush()?;
    debug!(bytes = written, "wrapped standard input");
    Ok(())
}

fn process_path(
    path: &Path,
    options: &WrapOptions,
    in_place: bool,
) -> anyhow::Result<Option<String>> {
    if in_place {
        rewrite(path, options).with_context(|| format!("failed to rewrite {}", path.display()))?;
        debug!(path = %path.display(), "rewrote file");
        return Ok(None);
    }
    let wrapped =
        wrap_file(path, options).with_context(|| format!("failed to wrap {}", path.display()))?;
    Ok(Some(wrapped))
}

/// Entry point for the `wordwrap` command-line tool.
///
/// Reads standard input when no files are given and writes the wrapped text
/// to standard output. Output ends in a newline exactly when the input does.
/// Files are wrapped in parallel, one scanner each, and printed in argument
/// order, each ending in a newline; with `--in-place` they are rewritten
/// instead.
/// A file that fails is reported on stderr without stopping the others, and
/// the exit status is non-zero.
///
/// # Examples
///
/// ```sh
/// # Wrap a file to 72 columns and print it
/// wordwrap --width 72 notes.txt
///
/// # Quote a message, wrapping it first
/// cat message.txt | wordwrap -w 70 -p '> '
///
/// # Rewrite files in place
/// wordwrap --in-place -w 80 a.txt b.txt
/// ```
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let options = WrapOptions::from(cli.opts);

    if cli.files.is_empty() {
        return wrap_stdin(&options);
    }

    let results: Vec<anyhow::Result<Option<String>>> = cli
        .files
        .par_iter()
        .map(|path| process_path(path, &options, cli.in_place))
        .collect();

    let mut out = BufWriter::new(io::stdout().lock());
    let mut failures = 0usize;
    for result in results {
        match result {
            Ok(Some(text)) => {
                out.write_all(text.as_bytes())?;
                if !text.is_empty() && !text.ends_with('\n') {
                    out.write_all(b"\n")?;
                }
            }
            Ok(None) => {}
            Err(err) => {
                eprintln!("{err:#}");
                error!("{err:#}");
                failures += 1;
            }
        }
    }
    out.flush()?;

    if failures > 0 {
        anyhow::bail!("{failures} of {} files could not be wrapped", cli.files.len());
    }
    Ok(())
}
