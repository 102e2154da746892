use crate::{Error, Stream};
use std::io::{Read, Seek, Write};
use std::str::FromStr;

/// A resource that a concrete stream reads from and writes to.
///
/// This is the type of the value returned by
/// [`Stream::detach()`](../trait.Stream.html#method.detach).
pub trait Resource: Read + Write + Seek {}
impl<T: Read + Write + Seek> Resource for T {}

/// Access mode of a stream resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    ReadWrite,
}

impl Mode {
    pub fn is_readable(&self) -> bool {
        matches!(self, Mode::Read | Mode::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Mode::Write | Mode::ReadWrite)
    }

    /// Short mode string as found in stream metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Read => "r",
            Mode::Write => "w",
            Mode::ReadWrite => "r+",
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" => Ok(Mode::Read),
            "w" => Ok(Mode::Write),
            "r+" | "w+" => Ok(Mode::ReadWrite),
            _ => Err(Error::invalid_argument(format!(
                "invalid mode {:?}, expected one of r, w, r+",
                s
            ))),
        }
    }
}

/// Conversion of a value into a boxed [`Stream`](../trait.Stream.html).
///
/// Strings and byte vectors become seekable in-memory streams positioned
/// at their beginning. Streams are boxed as they are.
pub trait IntoStream {
    fn into_stream(self) -> Box<dyn Stream>;
}

impl<S: Stream + 'static> IntoStream for S {
    fn into_stream(self) -> Box<dyn Stream> {
        Box::new(self)
    }
}

impl IntoStream for Vec<u8> {
    fn into_stream(self) -> Box<dyn Stream> {
        Box::new(MemoryStream::from_bytes(self))
    }
}

impl IntoStream for &[u8] {
    fn into_stream(self) -> Box<dyn Stream> {
        self.to_vec().into_stream()
    }
}

impl IntoStream for String {
    fn into_stream(self) -> Box<dyn Stream> {
        self.into_bytes().into_stream()
    }
}

impl IntoStream for &str {
    fn into_stream(self) -> Box<dyn Stream> {
        self.as_bytes().into_stream()
    }
}

/// Create a stream from a value.
/// See [`IntoStream`](trait.IntoStream.html).
pub fn stream_for<T: IntoStream>(value: T) -> Box<dyn Stream> {
    value.into_stream()
}

mod io_stream;
#[cfg(feature = "tempfile")]
pub use io_stream::TempStream;
pub use io_stream::{IoStream, MemoryStream};
mod handle;
pub use handle::StreamHandle;
