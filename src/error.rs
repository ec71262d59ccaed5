//! Error types for wrapping and draining.

use std::{io, sync::Arc};

/// Failure reported by a [`Scanner`](crate::Scanner) or a [`CharSource`](crate::CharSource).
///
/// The error is `Clone` so a scanner can hand the same failure back on every
/// call after it turns terminal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum WrapError {
    /// A line width of zero was requested.
    #[error("line width must be at least 1")]
    ZeroWidth,

    /// The underlying reader failed.
    #[error("failed to read input")]
    Read(#[source] Arc<io::Error>),

    /// The input contained a byte sequence that is not UTF-8.
    #[error("input is not valid UTF-8 at byte {offset}")]
    InvalidUtf8 { offset: usize },
}

impl WrapError {
    pub(crate) fn read(err: io::Error) -> Self {
        Self::Read(Arc::new(err))
    }
}

impl From<WrapError> for io::Error {
    fn from(err: WrapError) -> Self {
        let kind = match &err {
            WrapError::ZeroWidth => io::ErrorKind::InvalidInput,
            WrapError::Read(inner) => inner.kind(),
            WrapError::InvalidUtf8 { .. } => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

/// Failure while draining a scanner into a writer.
///
/// `written` holds the bytes delivered to the sink before the failure.
#[derive(Debug, thiserror::Error)]
#[error("wrapping stopped after {written} bytes")]
pub struct DrainError {
    pub written: u64,
    #[source]
    pub cause: DrainErrorKind,
}

#[derive(Debug, thiserror::Error)]
pub enum DrainErrorKind {
    #[error(transparent)]
    Read(#[from] WrapError),

    #[error("failed to write output")]
    Write(#[source] io::Error),
}

impl DrainError {
    pub(crate) fn read(written: u64, err: WrapError) -> Self {
        Self {
            written,
            cause: DrainErrorKind::Read(err),
        }
    }

    pub(crate) fn write(written: u64, err: io::Error) -> Self {
        Self {
            written,
            cause: DrainErrorKind::Write(err),
        }
    }
}

impl From<DrainError> for io::Error {
    fn from(err: DrainError) -> Self {
        match err.cause {
            DrainErrorKind::Read(inner) => inner.into(),
            DrainErrorKind::Write(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_conversion_keeps_kind() {
        let err = WrapError::read(io::Error::new(io::ErrorKind::BrokenPipe, "gone"));
        assert_eq!(io::Error::from(err).kind(), io::ErrorKind::BrokenPipe);

        let err = WrapError::InvalidUtf8 { offset: 3 };
        let io_err = io::Error::from(err);
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
        assert!(io_err.to_string().contains("byte 3"));
    }

    #[test]
    fn drain_error_reports_written_bytes() {
        let err = DrainError::write(12, io::Error::other("full"));
        assert_eq!(err.to_string(), "wrapping stopped after 12 bytes");
        assert!(matches!(err.cause, DrainErrorKind::Write(_)));
    }
}
