use std::collections::BTreeMap;
use std::io::SeekFrom;

/// Stream metadata: a map of string keys to string values.
///
/// Keys commonly found in this crate are `uri` (the location of the
/// resource backing the stream), `mode` and `seekable`.
pub type Metadata = BTreeMap<String, String>;

/// Byte stream capability interface.
///
/// `Stream` trait defines the primitives to build a pipeline of byte
/// streams transforming a payload lazily. Every stream of this crate
/// implements it: concrete resources such as [`IoStream`], buffers such as
/// [`RingBuffer`] and [`PumpStream`], compositions such as
/// [`AppendStream`] and [`MultipartStream`] and decorators such as
/// [`CachingStream`], [`LimitStream`] or `InflateStream`.
/// Consumers of a message body only interact with this interface.
///
/// ## Decorators
///
/// A stream wrapping another one returns the wrapped stream from
/// [`decorated()`](trait.Stream.html#method.decorated) and
/// [`decorated_mut()`](trait.Stream.html#method.decorated_mut).
/// All provided methods of this trait then forward the call, unmodified,
/// to the wrapped stream. A decorator only implements the methods whose
/// behavior it changes. Streams that do not wrap anything must implement
/// every method.
///
/// Methods [`rewind()`](trait.Stream.html#method.rewind),
/// [`get_contents()`](trait.Stream.html#method.get_contents) and
/// [`to_bytes()`](trait.Stream.html#method.to_bytes) are written in terms
/// of the other methods of the same stream and are not forwarded.
///
/// ## Closing and detaching
///
/// After [`close()`](trait.Stream.html#method.close) or
/// [`detach()`](trait.Stream.html#method.detach), capability checks
/// report `false` and reads and writes fail with [`Error::Detached`].
/// Both methods can safely be called more than once.
///
/// ## Ownership
///
/// Wrapping a stream into a decorator or appending it to an
/// [`AppendStream`] moves it. A stream has a single reader at a time and
/// none of the implementations of this crate are meant to be shared across
/// threads.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, AppendStream, Stream};
///
/// let mut stream = AppendStream::new();
/// stream.add_stream(stream_for("foo")).unwrap();
/// stream.add_stream(stream_for("bar")).unwrap();
/// assert_eq!(stream.read(4).unwrap(), b"foob");
/// assert_eq!(stream.get_contents().unwrap(), b"ar");
/// assert!(stream.eof());
/// ```
pub trait Stream {
    /// The stream wrapped by this stream, if any.
    fn decorated(&self) -> Option<&dyn Stream> {
        None
    }

    /// Mutable access to the stream wrapped by this stream, if any.
    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        None
    }

    /// Read up to `length` bytes from the stream.
    /// Fewer bytes may be returned. An empty vector is returned when the
    /// end of the stream is reached.
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        self.decorated_mut().ok_or(Error::Detached)?.read(length)
    }

    /// Write bytes to the stream and return the number of bytes written.
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        self.decorated_mut().ok_or(Error::Detached)?.write(bytes)
    }

    /// Move the stream cursor.
    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        self.decorated_mut().ok_or(Error::Detached)?.seek(pos)
    }

    /// Move the stream cursor to the beginning of the stream.
    fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0))
    }

    /// Current position of the stream cursor.
    fn tell(&mut self) -> Result<u64> {
        self.decorated_mut().ok_or(Error::Detached)?.tell()
    }

    /// Whether the stream cursor is at the end of the stream.
    /// A detached stream is always at its end.
    fn eof(&mut self) -> bool {
        match self.decorated_mut() {
            Some(s) => s.eof(),
            None => true,
        }
    }

    /// Size of the stream in bytes, if known.
    fn size(&mut self) -> Option<u64> {
        self.decorated_mut().and_then(|s| s.size())
    }

    fn is_readable(&self) -> bool {
        self.decorated().map_or(false, |s| s.is_readable())
    }

    fn is_writable(&self) -> bool {
        self.decorated().map_or(false, |s| s.is_writable())
    }

    fn is_seekable(&self) -> bool {
        self.decorated().map_or(false, |s| s.is_seekable())
    }

    /// Close the stream and any underlying resource.
    fn close(&mut self) {
        if let Some(s) = self.decorated_mut() {
            s.close()
        }
    }

    /// Separate the underlying resource from the stream.
    /// The stream is unusable afterward. The resource is returned when the
    /// stream owns a single one.
    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.decorated_mut().and_then(|s| s.detach())
    }

    /// The full metadata map of the stream.
    fn metadata(&self) -> Metadata {
        self.decorated().map(|s| s.metadata()).unwrap_or_default()
    }

    /// A single metadata value.
    fn metadata_value(&self, key: &str) -> Option<String> {
        self.metadata().remove(key)
    }

    /// Read the remaining contents of the stream.
    fn get_contents(&mut self) -> Result<Vec<u8>> {
        utils::copy_to_string(self, None)
    }

    /// Read the whole stream, from the start when the stream is
    /// seekable.
    ///
    /// This conversion never fails: if an error occurs, it is logged and
    /// an empty vector is returned.
    fn to_bytes(&mut self) -> Vec<u8> {
        let contents = if self.is_seekable() {
            self.rewind().and_then(|_| self.get_contents())
        } else {
            self.get_contents()
        };
        match contents {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Stream conversion to bytes failed: {}", e);
                Vec::new()
            }
        }
    }
}

impl Stream for Box<dyn Stream> {
    fn decorated(&self) -> Option<&dyn Stream> {
        (**self).decorated()
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        (**self).decorated_mut()
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        (**self).read(length)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        (**self).seek(pos)
    }

    fn rewind(&mut self) -> Result<()> {
        (**self).rewind()
    }

    fn tell(&mut self) -> Result<u64> {
        (**self).tell()
    }

    fn eof(&mut self) -> bool {
        (**self).eof()
    }

    fn size(&mut self) -> Option<u64> {
        (**self).size()
    }

    fn is_readable(&self) -> bool {
        (**self).is_readable()
    }

    fn is_writable(&self) -> bool {
        (**self).is_writable()
    }

    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        (**self).detach()
    }

    fn metadata(&self) -> Metadata {
        (**self).metadata()
    }

    fn metadata_value(&self, key: &str) -> Option<String> {
        (**self).metadata_value(key)
    }

    fn get_contents(&mut self) -> Result<Vec<u8>> {
        (**self).get_contents()
    }

    fn to_bytes(&mut self) -> Vec<u8> {
        (**self).to_bytes()
    }
}

mod error;
pub use error::{Error, Result};

/// Concrete streams over `std::io` resources and the bridge turning any
/// [`Stream`](trait.Stream.html) back into a `std::io` handle.
pub mod stream;
pub use stream::{
    stream_for, IntoStream, IoStream, MemoryStream, Mode, Resource,
    StreamHandle,
};

mod buffer;
pub use buffer::RingBuffer;
mod pump;
pub use pump::PumpStream;
mod append;
pub use append::AppendStream;
mod caching;
pub use caching::{CachingStream, DefaultBuffer};
mod limit;
pub use limit::LimitStream;
mod no_seek;
pub use no_seek::NoSeekStream;
#[cfg(feature = "inflate")]
mod inflate;
#[cfg(feature = "inflate")]
pub use inflate::InflateStream;

/// `multipart/form-data` encoding of named parts into a single stream.
pub mod multipart;
pub use multipart::{Element, MultipartStream};

mod fn_stream;
pub use fn_stream::{FnStream, Methods, Operation};

/// Helpers to copy streams into bytes or other streams.
pub mod utils;

/// URI value type and RFC 3986 reference resolution.
pub mod uri;
pub use uri::Uri;

/// Module to instantiate a stream pipeline from a configuration file.
#[cfg(feature = "config")]
pub mod config;

/// Generic tests of the [`Stream`](trait.Stream.html) contract shared by
/// the test modules of every implementation.
#[cfg(test)]
mod tests;
