use crate::fn_stream::Operation;
use thiserror::Error;

/// Errors raised by [`Stream`](trait.Stream.html) implementations.
///
/// Errors are always reported to the caller of the offending method.
/// Nothing in this crate retries an operation after an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The stream does not support this operation, e.g. seeking a
    /// non-seekable stream or writing to a read-only stream.
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    /// An argument of the call is not valid for this stream.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The stream is in a state where the operation cannot be performed.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// A [`FnStream`](struct.FnStream.html) operation was called without
    /// a behavior to run.
    #[error("{0} is not implemented by this stream")]
    NotImplemented(Operation),
    /// The stream was closed or detached from its resource.
    #[error("stream is detached")]
    Detached,
    /// Error returned by the underlying `std::io` resource.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn unsupported<S: Into<String>>(what: S) -> Self {
        Error::Unsupported(what.into())
    }

    pub(crate) fn invalid_argument<S: Into<String>>(what: S) -> Self {
        Error::InvalidArgument(what.into())
    }
}

/// Result type of [`Stream`](trait.Stream.html) methods.
/// See [`Error`](enum.Error.html).
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for std::io::Error {
    fn from(e: Error) -> std::io::Error {
        match e {
            Error::Io(e) => e,
            Error::Unsupported(_) | Error::NotImplemented(_) => {
                std::io::Error::new(std::io::ErrorKind::Unsupported, e)
            }
            Error::InvalidArgument(_) => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
            }
            Error::InvalidState(_) | Error::Detached => {
                std::io::Error::new(std::io::ErrorKind::Other, e)
            }
        }
    }
}
