use super::{Mode, Resource};
use crate::{Error, Metadata, Result, Stream};
use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
#[cfg(feature = "tempfile")]
use tempfile::SpooledTempFile;

/// Bytes reserved up front by a read.
const READ_CHUNK: usize = 8192;

/// A [`Stream`](../trait.Stream.html) implementation over a `std::io`
/// resource.
///
/// This is the primitive every other stream of this crate is composed
/// over. The resource can be a vector of bytes, a file or any
/// [`Resource`](trait.Resource.html). The stream is dropped along with
/// its resource, unless the resource is taken out with
/// [`detach()`](../trait.Stream.html#method.detach) or
/// [`into_inner()`](struct.IoStream.html#method.into_inner).
///
/// Resources declared non-seekable with
/// [`non_seekable()`](struct.IoStream.html#method.non_seekable) are read
/// forward only: the stream keeps track of its position itself and
/// reaches its end the first time a read hits the end of the resource.
///
/// ## Examples
///
/// ```
/// use byos::{MemoryStream, Stream};
///
/// let mut stream = MemoryStream::from_bytes(b"hello world".to_vec());
/// assert_eq!(stream.read(5).unwrap(), b"hello");
/// assert_eq!(stream.tell().unwrap(), 5);
/// assert_eq!(stream.size(), Some(11));
/// ```
pub struct IoStream<R: Resource> {
    handle: Option<R>,
    mode: Mode,
    seekable: bool,
    uri: Option<String>,
    position: u64,
    eof: bool,
}

/// An [`IoStream`](struct.IoStream.html) in memory.
pub type MemoryStream = IoStream<Cursor<Vec<u8>>>;

/// An [`IoStream`](struct.IoStream.html) kept in memory until it grows
/// past a threshold, then moved to a temporary file.
#[cfg(feature = "tempfile")]
pub type TempStream = IoStream<SpooledTempFile>;

impl<R: Resource> IoStream<R> {
    /// Wrap a readable, writable and seekable resource.
    pub fn new(handle: R) -> Self {
        IoStream {
            handle: Some(handle),
            mode: Mode::ReadWrite,
            seekable: true,
            uri: None,
            position: 0u64,
            eof: false,
        }
    }

    /// Restrict the operations allowed on the resource.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the location reported under the `uri` metadata key.
    pub fn with_uri<S: Into<String>>(mut self, uri: S) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Never seek the resource.
    pub fn non_seekable(mut self) -> Self {
        self.seekable = false;
        self
    }

    /// Take the resource out of the stream.
    pub fn into_inner(mut self) -> Option<R> {
        self.handle.take()
    }

    fn handle(&mut self) -> Result<&mut R> {
        self.handle.as_mut().ok_or(Error::Detached)
    }

    fn stream_len(&mut self) -> Result<u64> {
        let handle = self.handle()?;
        let position = handle.stream_position()?;
        let len = handle.seek(SeekFrom::End(0))?;
        if position != len {
            handle.seek(SeekFrom::Start(position))?;
        }
        Ok(len)
    }
}

impl MemoryStream {
    /// An empty in-memory stream.
    pub fn memory() -> Self {
        Self::from_bytes(Vec::new())
    }

    /// An in-memory stream over `bytes`, positioned at its beginning.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        IoStream::new(Cursor::new(bytes)).with_uri("memory://")
    }
}

impl Default for MemoryStream {
    fn default() -> Self {
        Self::memory()
    }
}

impl IoStream<File> {
    /// Open the file at `path` with the access `mode`.
    ///
    /// Files opened for writing are created if they do not exist.
    /// [`Mode::Write`](enum.Mode.html) truncates the file,
    /// [`Mode::ReadWrite`](enum.Mode.html) does not.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> Result<Self> {
        let path = path.as_ref();
        let file = match mode {
            Mode::Read => OpenOptions::new().read(true).open(path),
            Mode::Write => OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path),
            Mode::ReadWrite => OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(path),
        }?;
        Ok(IoStream::new(file)
            .with_mode(mode)
            .with_uri(path.to_string_lossy()))
    }
}

#[cfg(feature = "tempfile")]
impl TempStream {
    /// A stream kept in memory up to `max_memory` bytes, then spilled
    /// into a temporary file.
    pub fn temp(max_memory: usize) -> Self {
        IoStream::new(SpooledTempFile::new(max_memory)).with_uri("temp://")
    }
}

impl<R: Resource + 'static> Stream for IoStream<R> {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if !self.mode.is_readable() {
            return Err(Error::unsupported(
                "cannot read from a non-readable stream",
            ));
        }
        let handle = self.handle.as_mut().ok_or(Error::Detached)?;
        // Grow with the bytes actually read, not with the request.
        let mut buf = Vec::with_capacity(std::cmp::min(length, READ_CHUNK));
        let filled = handle.take(length as u64).read_to_end(&mut buf)?;
        if filled < length {
            self.eof = true;
        }
        self.position += filled as u64;
        Ok(buf)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if !self.mode.is_writable() {
            return Err(Error::unsupported(
                "cannot write to a non-writable stream",
            ));
        }
        let handle = self.handle()?;
        handle.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(bytes.len())
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        if self.handle.is_none() {
            return Err(Error::Detached);
        }
        if !self.seekable {
            return Err(Error::unsupported("stream is not seekable"));
        }
        let position = self.handle()?.seek(pos)?;
        self.position = position;
        self.eof = false;
        Ok(())
    }

    fn tell(&mut self) -> Result<u64> {
        if self.seekable {
            Ok(self.handle()?.stream_position()?)
        } else {
            self.handle()?;
            Ok(self.position)
        }
    }

    fn eof(&mut self) -> bool {
        if self.handle.is_none() {
            return true;
        }
        if !self.seekable {
            return self.eof;
        }
        let position = match self.handle().and_then(|h| {
            h.stream_position().map_err(Error::Io)
        }) {
            Ok(p) => p,
            Err(_) => return self.eof,
        };
        match self.stream_len() {
            Ok(len) => position >= len,
            Err(_) => self.eof,
        }
    }

    fn size(&mut self) -> Option<u64> {
        if self.handle.is_none() || !self.seekable {
            return None;
        }
        self.stream_len().ok()
    }

    fn is_readable(&self) -> bool {
        self.handle.is_some() && self.mode.is_readable()
    }

    fn is_writable(&self) -> bool {
        self.handle.is_some() && self.mode.is_writable()
    }

    fn is_seekable(&self) -> bool {
        self.handle.is_some() && self.seekable
    }

    fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            // Nothing left to report a flush error to.
            let _ = handle.flush();
        }
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.handle
            .take()
            .map(|handle| Box::new(handle) as Box<dyn Resource>)
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        if self.handle.is_none() {
            return metadata;
        }
        metadata.insert(
            String::from("mode"),
            String::from(self.mode.as_str()),
        );
        metadata.insert(String::from("seekable"), self.seekable.to_string());
        if let Some(uri) = &self.uri {
            metadata.insert(String::from("uri"), uri.clone());
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::{IoStream, MemoryStream};
    use crate::stream::Mode;
    use crate::tests::{test_closed, test_readable, test_seekable};
    use crate::{Error, Stream};
    use std::io::{Cursor, Read, SeekFrom};

    #[test]
    fn test_memory_stream() {
        let bytes = crate::tests::random_bytes(1000);
        test_readable(MemoryStream::from_bytes(bytes.clone()), &bytes);
        test_seekable(MemoryStream::from_bytes(bytes.clone()), &bytes);
        test_closed(MemoryStream::from_bytes(bytes));
    }

    #[test]
    fn test_read_more_than_available() {
        let mut stream = MemoryStream::from_bytes(b"abc".to_vec());
        let bytes = stream.read(1 << 20).unwrap();
        assert_eq!(bytes, b"abc");
        assert!(bytes.capacity() < 1 << 20);
        assert!(stream.eof());

        stream.rewind().unwrap();
        assert_eq!(stream.read(usize::MAX).unwrap(), b"abc");
        assert!(stream.eof());
        assert!(stream.read(usize::MAX).unwrap().is_empty());
    }

    #[test]
    fn test_write_then_read() {
        let mut stream = MemoryStream::memory();
        assert_eq!(stream.write(b"foo").unwrap(), 3);
        assert_eq!(stream.write(b"bar").unwrap(), 3);
        assert_eq!(stream.tell().unwrap(), 6);
        assert!(stream.eof());
        stream.seek(SeekFrom::Start(2)).unwrap();
        assert!(!stream.eof());
        assert_eq!(stream.get_contents().unwrap(), b"obar");
        assert_eq!(stream.to_bytes(), b"foobar");
    }

    #[test]
    fn test_non_seekable() {
        let mut stream =
            IoStream::new(Cursor::new(b"abc".to_vec())).non_seekable();
        assert!(!stream.is_seekable());
        assert_eq!(stream.size(), None);
        assert!(matches!(
            stream.seek(SeekFrom::Start(1)),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(stream.read(2).unwrap(), b"ab");
        assert!(!stream.eof());
        assert_eq!(stream.read(2).unwrap(), b"c");
        assert!(stream.eof());
        assert_eq!(stream.tell().unwrap(), 3);
    }

    #[test]
    fn test_read_only() {
        let mut stream = MemoryStream::from_bytes(b"abc".to_vec())
            .with_mode(Mode::Read);
        assert!(!stream.is_writable());
        assert!(matches!(stream.write(b"x"), Err(Error::Unsupported(_))));
        assert_eq!(stream.metadata_value("mode").unwrap(), "r");
    }

    #[test]
    fn test_detach() {
        let mut stream = MemoryStream::from_bytes(b"abc".to_vec());
        let mut resource = stream.detach().unwrap();
        let mut buf = String::new();
        resource.read_to_string(&mut buf).unwrap();
        assert_eq!(buf, "abc");
        assert!(stream.detach().is_none());
        assert!(matches!(stream.read(1), Err(Error::Detached)));
    }

    #[test]
    fn test_file_stream() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        {
            let mut stream = IoStream::open(&path, Mode::Write).unwrap();
            assert_eq!(stream.write(b"on disk").unwrap(), 7);
            assert!(!stream.is_readable());
            stream.close();
        }
        let mut stream = IoStream::open(&path, Mode::Read).unwrap();
        assert_eq!(
            stream.metadata_value("uri").unwrap(),
            path.to_string_lossy()
        );
        assert_eq!(stream.size(), Some(7));
        assert_eq!(stream.get_contents().unwrap(), b"on disk");
    }

    #[cfg(feature = "tempfile")]
    #[test]
    fn test_temp_stream() {
        let mut stream = super::TempStream::temp(4);
        stream.write(b"spilled to disk").unwrap();
        stream.rewind().unwrap();
        assert_eq!(stream.get_contents().unwrap(), b"spilled to disk");
        assert_eq!(stream.metadata_value("uri").unwrap(), "temp://");
    }
}
