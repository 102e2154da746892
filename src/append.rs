use crate::{Error, IntoStream, Metadata, Resource, Result, Stream};
use log::debug;
use std::io::SeekFrom;

/// Chunk size used when reading forward to a seek target.
const SEEK_CHUNK: u64 = 8096;

/// Read-only stream concatenating a sequence of streams.
///
/// Sub-streams are read in the order they were added, each one drained
/// before moving to the next. The append stream owns its sub-streams.
///
/// The stream is seekable only if every sub-stream is. Since sub-streams
/// may be of any kind, seeking is implemented by rewinding every
/// sub-stream and reading forward up to the target offset: seeking is
/// expensive and only [`SeekFrom::Start`] is supported.
///
/// Streams can be appended until reading moves past the first
/// sub-stream. Past this point, appending fails with
/// [`Error::InvalidState`](enum.Error.html) until the stream is seeked
/// back to its beginning.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, AppendStream, Stream};
///
/// let mut stream = AppendStream::from_streams(vec![
///     stream_for("a"),
///     stream_for("bc"),
/// ]).unwrap();
/// assert_eq!(stream.size(), Some(3));
/// assert_eq!(stream.read(2).unwrap(), b"ab");
/// assert_eq!(stream.tell().unwrap(), 2);
/// ```
pub struct AppendStream {
    streams: Vec<Box<dyn Stream>>,
    current: usize,
    position: u64,
    seekable: bool,
    past_first: bool,
    closed: bool,
}

impl AppendStream {
    pub fn new() -> Self {
        AppendStream {
            streams: Vec::new(),
            current: 0usize,
            position: 0u64,
            seekable: true,
            past_first: false,
            closed: false,
        }
    }

    /// Build an append stream out of a sequence of streams.
    pub fn from_streams<I, S>(streams: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: IntoStream,
    {
        let mut append = Self::new();
        for stream in streams {
            append.add_stream(stream)?;
        }
        Ok(append)
    }

    /// Append a stream at the end of the sequence.
    ///
    /// Fails with [`Error::InvalidArgument`](enum.Error.html) if the
    /// stream is not readable and with
    /// [`Error::InvalidState`](enum.Error.html) if reading already moved
    /// past the first sub-stream.
    pub fn add_stream<S: IntoStream>(&mut self, stream: S) -> Result<()> {
        if self.closed {
            return Err(Error::Detached);
        }
        if self.past_first {
            return Err(Error::InvalidState(String::from(
                "cannot append a stream after reading moved past the \
                 first stream",
            )));
        }
        let stream = stream.into_stream();
        if !stream.is_readable() {
            return Err(Error::invalid_argument(
                "each appended stream must be readable",
            ));
        }
        if !stream.is_seekable() {
            self.seekable = false;
        }
        self.streams.push(stream);
        Ok(())
    }

    /// Number of sub-streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    fn reset(&mut self) {
        self.streams.clear();
        self.current = 0;
        self.position = 0;
        self.seekable = true;
        self.past_first = false;
        self.closed = true;
    }
}

impl Default for AppendStream {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for AppendStream {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::Detached);
        }
        let mut buffer = Vec::new();
        if self.streams.is_empty() {
            return Ok(buffer);
        }

        let last = self.streams.len() - 1;
        let mut progress_to_next = false;
        while buffer.len() < length {
            if progress_to_next || self.streams[self.current].eof() {
                progress_to_next = false;
                if self.current == last {
                    break;
                }
                self.current += 1;
                self.past_first = true;
            }

            let result =
                self.streams[self.current].read(length - buffer.len())?;
            if result.is_empty() {
                progress_to_next = true;
                continue;
            }
            buffer.extend_from_slice(&result);
        }

        self.position += buffer.len() as u64;
        Ok(buffer)
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<usize> {
        Err(Error::unsupported("cannot write to an append stream"))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        if self.closed {
            return Err(Error::Detached);
        }
        if !self.seekable {
            return Err(Error::unsupported(
                "this append stream is not seekable",
            ));
        }
        let offset = match pos {
            SeekFrom::Start(offset) => offset,
            _ => {
                return Err(Error::invalid_argument(
                    "an append stream can only seek from the start",
                ))
            }
        };

        self.position = 0;
        self.current = 0;
        self.past_first = false;
        for (i, stream) in self.streams.iter_mut().enumerate() {
            if let Err(e) = stream.rewind() {
                debug!("Unable to rewind stream {} of append stream.", i);
                return Err(e);
            }
        }

        if offset > 0 {
            debug!("Append stream seeks by reading {} bytes.", offset);
        }
        while self.position < offset && !self.eof() {
            let chunk = std::cmp::min(SEEK_CHUNK, offset - self.position);
            if self.read(chunk as usize)?.is_empty() {
                break;
            }
        }
        Ok(())
    }

    fn tell(&mut self) -> Result<u64> {
        if self.closed {
            return Err(Error::Detached);
        }
        Ok(self.position)
    }

    fn eof(&mut self) -> bool {
        if self.streams.is_empty() {
            return true;
        }
        let last = self.streams.len() - 1;
        self.current >= last && self.streams[self.current].eof()
    }

    fn size(&mut self) -> Option<u64> {
        self.streams.iter_mut().map(|s| s.size()).sum()
    }

    fn is_readable(&self) -> bool {
        !self.closed
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn is_seekable(&self) -> bool {
        !self.closed && self.seekable
    }

    fn close(&mut self) {
        for stream in self.streams.iter_mut() {
            stream.close();
        }
        self.reset();
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        for stream in self.streams.iter_mut() {
            stream.detach();
        }
        self.reset();
        None
    }

    fn metadata(&self) -> Metadata {
        Metadata::new()
    }
}

#[cfg(test)]
mod tests {
    use super::AppendStream;
    use crate::stream::Mode;
    use crate::tests::{
        random_bytes, test_closed, test_readable, test_seekable,
    };
    use crate::{
        stream_for, Error, MemoryStream, NoSeekStream, PumpStream, Stream,
    };
    use std::io::SeekFrom;

    fn split(bytes: &[u8], sizes: &[usize]) -> AppendStream {
        let mut stream = AppendStream::new();
        let mut offset = 0;
        for size in sizes {
            stream
                .add_stream(bytes[offset..offset + size].to_vec())
                .unwrap();
            offset += size;
        }
        stream.add_stream(bytes[offset..].to_vec()).unwrap();
        stream
    }

    #[test]
    fn test_append_stream() {
        let bytes = random_bytes(3000);
        let sizes = [0usize, 1, 999, 0, 1000];
        test_readable(split(&bytes, &sizes), &bytes);
        test_seekable(split(&bytes, &sizes), &bytes);
        test_closed(split(&bytes, &sizes));
    }

    #[test]
    fn test_read_everything_at_once() {
        let mut stream = AppendStream::from_streams(vec!["ab", "cd"]).unwrap();
        assert_eq!(stream.read(usize::MAX).unwrap(), b"abcd");
        assert!(stream.eof());
        assert!(stream.read(usize::MAX).unwrap().is_empty());

        let mut stream = AppendStream::new();
        stream.add_stream(stream_for("ab")).unwrap();
        let chunks = vec![b"cd".to_vec(), b"ef".to_vec()];
        stream.add_stream(PumpStream::from_chunks(chunks)).unwrap();
        assert_eq!(stream.read(usize::MAX).unwrap(), b"abcdef");
    }

    #[test]
    fn test_tell_matches_bytes_read() {
        let bytes = random_bytes(100);
        let mut stream = split(&bytes, &[10, 20, 30]);
        let mut read = Vec::new();
        for k in [1usize, 9, 15, 40, 100] {
            read.extend(stream.read(k).unwrap());
            assert_eq!(stream.tell().unwrap(), read.len() as u64);
        }
        assert_eq!(read, bytes);
        assert!(stream.eof());
    }

    #[test]
    fn test_empty() {
        let mut stream = AppendStream::new();
        assert!(stream.eof());
        assert_eq!(stream.read(10).unwrap(), b"");
        assert_eq!(stream.size(), Some(0));
        assert!(stream.metadata().is_empty());
    }

    #[test]
    fn test_add_non_readable() {
        let mut stream = AppendStream::new();
        let write_only = MemoryStream::memory().with_mode(Mode::Write);
        assert!(matches!(
            stream.add_stream(write_only),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_add_after_reading_past_first() {
        let mut stream =
            AppendStream::from_streams(vec!["ab", "cd"]).unwrap();
        assert_eq!(stream.read(1).unwrap(), b"a");
        stream.add_stream("ef").unwrap();
        assert_eq!(stream.read(3).unwrap(), b"bcd");
        assert!(matches!(
            stream.add_stream("gh"),
            Err(Error::InvalidState(_))
        ));
        stream.rewind().unwrap();
        stream.add_stream("gh").unwrap();
        assert_eq!(stream.get_contents().unwrap(), b"abcdefgh");
    }

    #[test]
    fn test_seek() {
        let mut stream =
            AppendStream::from_streams(vec!["foo", "bar", "baz"]).unwrap();
        stream.seek(SeekFrom::Start(4)).unwrap();
        assert_eq!(stream.tell().unwrap(), 4);
        assert_eq!(stream.read(3).unwrap(), b"arb");
        assert!(matches!(
            stream.seek(SeekFrom::Current(1)),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            stream.seek(SeekFrom::End(0)),
            Err(Error::InvalidArgument(_))
        ));
        // Seeking past the end stops at the end.
        stream.seek(SeekFrom::Start(100)).unwrap();
        assert_eq!(stream.tell().unwrap(), 9);
        assert!(stream.eof());
    }

    #[test]
    fn test_not_seekable() {
        let mut stream = AppendStream::new();
        stream.add_stream("foo").unwrap();
        stream
            .add_stream(NoSeekStream::new(stream_for("bar")))
            .unwrap();
        assert!(!stream.is_seekable());
        assert_eq!(stream.size(), Some(6));
        assert!(matches!(
            stream.seek(SeekFrom::Start(0)),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(stream.write(b"x"), Err(Error::Unsupported(_))));
        assert_eq!(stream.get_contents().unwrap(), b"foobar");
    }

    #[test]
    fn test_unknown_size() {
        let mut stream = AppendStream::new();
        stream.add_stream("foo").unwrap();
        stream
            .add_stream(PumpStream::from_chunks(vec![b"bar".to_vec()]))
            .unwrap();
        assert_eq!(stream.size(), None);
        assert_eq!(stream.get_contents().unwrap(), b"foobar");
    }

    #[test]
    fn test_close_closes_sub_streams() {
        let closed = std::rc::Rc::new(std::cell::Cell::new(0));
        let mut stream = AppendStream::new();
        for _ in 0..3 {
            let count = closed.clone();
            let sub = crate::FnStream::decorate(
                stream_for("x"),
                crate::Methods::new().close(move || count.set(count.get() + 1)),
            );
            stream.add_stream(sub).unwrap();
        }
        stream.close();
        assert_eq!(closed.get(), 3);
        assert!(stream.eof());
        assert!(!stream.is_readable());
    }
}
