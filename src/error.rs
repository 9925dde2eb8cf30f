use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read input {path:?}: {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid format configuration: {0}")]
    InvalidConfiguration(String),
    #[error("cannot write output {path:?}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sample data of {0} bytes does not fit a 32-bit data chunk")]
    PayloadTooLarge(usize),
}

/// Coarse classification used for exit reporting and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputUnreadable,
    InvalidConfiguration,
    OutputUnwritable,
    PayloadTooLarge,
}

impl ConvertError {
    pub fn input(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::InputUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::OutputUnwritable {
            path: path.into(),
            source,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputUnreadable { .. } => ErrorKind::InputUnreadable,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::OutputUnwritable { .. } => ErrorKind::OutputUnwritable,
            Self::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InputUnreadable => "InputUnreadable",
            ErrorKind::InvalidConfiguration => "InvalidConfiguration",
            ErrorKind::OutputUnwritable => "OutputUnwritable",
            ErrorKind::PayloadTooLarge => "PayloadTooLarge",
        };
        f.write_str(name)
    }
}

/// Problems found while reading back a container header.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header is {0} bytes, expected at least 44")]
    Truncated(usize),
    #[error("expected {expected:?} marker at offset {offset}")]
    BadMarker {
        offset: usize,
        expected: &'static str,
    },
    #[error("unsupported fmt chunk size {0}")]
    FmtSize(u32),
    #[error("unsupported audio format code {0}, only linear PCM (1) is handled")]
    NotPcm(u16),
    #[error("{field} is {actual}, expected {expected}")]
    Inconsistent {
        field: &'static str,
        actual: u32,
        expected: u32,
    },
}

/// Errors from reading back an existing container.
#[derive(Debug, Error)]
pub enum InspectError {
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path:?} is not a canonical PCM WAV file: {source}")]
    Header {
        path: PathBuf,
        #[source]
        source: HeaderError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        let err = ConvertError::input("missing.raw", io::ErrorKind::NotFound.into());
        assert_eq!(err.kind(), ErrorKind::InputUnreadable);
        assert!(err.to_string().contains("missing.raw"));

        let err = ConvertError::invalid("channels must be positive");
        assert_eq!(err.kind(), ErrorKind::InvalidConfiguration);
        assert_eq!(err.kind().to_string(), "InvalidConfiguration");
    }
}
