use crate::{Error, Result, Stream};
use std::io::SeekFrom;

/// Decorator hiding the seek capability of a stream.
///
/// Seeking fails with [`Error::Unsupported`](enum.Error.html) and
/// [`is_seekable()`](trait.Stream.html#method.is_seekable) is `false`.
/// Every other operation is forwarded to the decorated stream.
pub struct NoSeekStream<S: Stream> {
    stream: S,
}

impl<S: Stream> NoSeekStream<S> {
    pub fn new(stream: S) -> Self {
        NoSeekStream { stream }
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Stream> Stream for NoSeekStream<S> {
    fn decorated(&self) -> Option<&dyn Stream> {
        Some(&self.stream)
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        Some(&mut self.stream)
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<()> {
        Err(Error::unsupported("cannot seek a non-seekable stream"))
    }

    fn is_seekable(&self) -> bool {
        false
    }
}
