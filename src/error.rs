use std::fmt::{Display, Formatter};

/// All error kinds
#[derive(Debug)]
pub enum Error {
    /// Raised when a seek or seek-to-command targets a nonexistent command
    /// or an offset outside of it
    InvalidArgument(String),
    /// Raised when lock acquisition is aborted by shutdown; safe to retry
    Interrupted,
    /// Raised when growing a partial entry fails; the entry is left untouched
    OutOfMemory,
    /// Raised when a user-buffer copy fails (device adapter surface)
    Fault,
    /// Socket or backing-file I/O failure
    IO(std::io::Error),
    /// Raised if an error occurs in the server configuration
    Config(String),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(e) => f.write_fmt(format_args!("Invalid argument: {e}")),
            Error::Interrupted => f.write_str("Interrupted"),
            Error::OutOfMemory => f.write_str("Out of memory"),
            Error::Fault => f.write_str("Bad address"),
            Error::IO(e) => f.write_fmt(format_args!("IO error: {e}")),
            Error::Config(e) => f.write_fmt(format_args!("Config error: {e}")),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::IO(e)
    }
}

impl Error {
    /// `true` for errors a caller may retry after observing shutdown state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Interrupted)
    }
}
