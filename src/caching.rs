use crate::{utils, Error, FnStream, Methods, Resource, Result, Stream};
use log::trace;
use std::io::SeekFrom;

#[cfg(not(feature = "tempfile"))]
use crate::MemoryStream;
#[cfg(feature = "tempfile")]
use crate::stream::TempStream;

/// Local copy of a [`CachingStream`](struct.CachingStream.html) when no
/// buffer is given: a temporary file kept in memory up to
/// [`DEFAULT_MEMORY`] bytes.
#[cfg(feature = "tempfile")]
pub type DefaultBuffer = TempStream;

/// Local copy of a [`CachingStream`](struct.CachingStream.html) when no
/// buffer is given.
#[cfg(not(feature = "tempfile"))]
pub type DefaultBuffer = MemoryStream;

/// Bytes of the default buffer kept in memory.
pub const DEFAULT_MEMORY: usize = 2 << 20;

fn default_buffer() -> DefaultBuffer {
    #[cfg(feature = "tempfile")]
    {
        TempStream::temp(DEFAULT_MEMORY)
    }
    #[cfg(not(feature = "tempfile"))]
    {
        MemoryStream::memory()
    }
}

/// Decorator making a forward-only stream seekable.
///
/// Every byte read from the `remote` stream is copied into a local,
/// seekable `buffer`. Seeking back serves bytes from the buffer,
/// seeking past what was read pulls the missing bytes from the remote.
/// Bytes read again after seeking back are always the same as the bytes
/// first read.
///
/// Writes go to the buffer only. When a write extends past what was
/// fetched from the remote, the remote bytes it overwrites are skipped
/// on the next fetch.
///
/// Operations not listed above (position, capabilities, metadata) are
/// those of the buffer.
///
/// ## Examples
///
/// ```
/// use byos::{CachingStream, PumpStream, Stream};
/// use std::io::SeekFrom;
///
/// let remote = PumpStream::from_chunks(vec![b"forward".to_vec()]);
/// let mut stream = CachingStream::new(remote);
/// assert_eq!(stream.read(4).unwrap(), b"forw");
/// stream.seek(SeekFrom::Start(1)).unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"orward");
/// ```
pub struct CachingStream<S: Stream, B: Stream = DefaultBuffer> {
    remote: S,
    buffer: B,
    skip_read_bytes: u64,
}

impl<S: Stream> CachingStream<S> {
    pub fn new(remote: S) -> Self {
        Self::with_buffer(remote, default_buffer())
    }
}

impl<S: Stream, B: Stream> CachingStream<S, B> {
    /// Cache `remote` in `buffer`. The buffer must be readable, writable,
    /// seekable and empty.
    pub fn with_buffer(remote: S, buffer: B) -> Self {
        CachingStream {
            remote,
            buffer,
            skip_read_bytes: 0u64,
        }
    }

    pub fn into_parts(self) -> (S, B) {
        (self.remote, self.buffer)
    }

    fn buffer_size(&mut self) -> Result<u64> {
        self.buffer.size().ok_or_else(|| {
            Error::InvalidState(String::from("cache size is unknown"))
        })
    }

    /// Read the remote stream to its end, caching everything.
    /// Returns the size of the stream.
    fn cache_entire_stream(&mut self) -> Result<u64> {
        let mut sink = FnStream::new(Methods::new().write(|b| Ok(b.len())));
        utils::copy_to_stream(self, &mut sink, None)?;
        self.tell()
    }
}

impl<S: Stream, B: Stream> Stream for CachingStream<S, B> {
    fn decorated(&self) -> Option<&dyn Stream> {
        Some(&self.buffer)
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        Some(&mut self.buffer)
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut data = self.buffer.read(length)?;
        let remaining = length - data.len();
        if remaining == 0 {
            return Ok(data);
        }

        let skip = self.skip_read_bytes;
        let wanted = remaining.saturating_add(skip as usize);
        let mut fetched = self.remote.read(wanted)?;
        trace!(
            "Caching stream fetched {} bytes from remote, {} overwritten.",
            fetched.len(),
            skip
        );
        if skip > 0 {
            let len = fetched.len() as u64;
            fetched.drain(..std::cmp::min(skip, len) as usize);
            self.skip_read_bytes = skip.saturating_sub(len);
        }
        self.buffer.write(&fetched)?;
        data.extend_from_slice(&fetched);
        Ok(data)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        // Remote bytes up to `fetched` are already in the buffer or
        // overwritten.
        let end = self.buffer.tell()? + bytes.len() as u64;
        let fetched = self.remote.tell()? + self.skip_read_bytes;
        if end > fetched {
            self.skip_read_bytes += end - fetched;
        }
        self.buffer.write(bytes)
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => {
                self.buffer.tell()? as i128 + offset as i128
            }
            SeekFrom::End(offset) => {
                let size = match self.remote.size() {
                    Some(size) => size,
                    None => self.cache_entire_stream()?,
                };
                size as i128 + offset as i128
            }
        };
        if target < 0 {
            return Err(Error::invalid_argument(format!(
                "cannot seek to byte {}",
                target
            )));
        }
        let target = target as u64;

        if target > self.buffer_size()? {
            // Pull remote bytes until the target is cached.
            self.buffer.seek(SeekFrom::End(0))?;
            while self.buffer_size()? < target && !self.remote.eof() {
                let missing = target - self.buffer_size()?;
                if self.read(missing as usize)?.is_empty() {
                    break;
                }
            }
            Ok(())
        } else {
            self.buffer.seek(SeekFrom::Start(target))
        }
    }

    fn eof(&mut self) -> bool {
        self.buffer.eof() && self.remote.eof()
    }

    fn size(&mut self) -> Option<u64> {
        let cached = self.buffer.size();
        match self.remote.size() {
            Some(size) => Some(std::cmp::max(size, cached.unwrap_or(0))),
            None if self.remote.eof() => cached,
            None => None,
        }
    }

    fn close(&mut self) {
        self.remote.close();
        self.buffer.close();
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.remote.detach();
        self.buffer.detach()
    }
}
