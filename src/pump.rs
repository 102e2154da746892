use crate::{Error, Metadata, Resource, Result, RingBuffer, Stream};
use log::debug;
use std::io::SeekFrom;

/// Callback producing up to a requested number of bytes, or `None` once
/// the data source is exhausted.
type Source = Box<dyn FnMut(usize) -> Option<Vec<u8>>>;

/// Read-only stream pulling its bytes from a callback.
///
/// The callback is called with the number of bytes the stream still needs
/// and returns some bytes, possibly more or fewer than requested, or
/// `None` (or an empty vector) to signal the end of the data. Bytes
/// produced in excess are kept in a [`RingBuffer`](struct.RingBuffer.html)
/// for the next reads. Once the source has signaled its end, it is
/// dropped and reads only drain what is left in the buffer.
///
/// The stream cannot be seeked nor written.
///
/// ## Examples
///
/// ```
/// use byos::{PumpStream, Stream};
///
/// let mut chunks = vec![b"foo".to_vec(), b"bar".to_vec()].into_iter();
/// let mut stream = PumpStream::new(move |_| chunks.next());
/// assert_eq!(stream.read(4).unwrap(), b"foob");
/// assert_eq!(stream.get_contents().unwrap(), b"ar");
/// assert!(stream.eof());
/// ```
pub struct PumpStream {
    source: Option<Source>,
    size: Option<u64>,
    position: u64,
    metadata: Metadata,
    buffer: RingBuffer,
    detached: bool,
}

impl PumpStream {
    pub fn new<F>(source: F) -> Self
    where
        F: FnMut(usize) -> Option<Vec<u8>> + 'static,
    {
        PumpStream {
            source: Some(Box::new(source)),
            size: None,
            position: 0u64,
            metadata: Metadata::new(),
            buffer: RingBuffer::new(),
            detached: false,
        }
    }

    /// A stream producing the chunks of an iterator in order.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
        I::IntoIter: 'static,
    {
        let mut chunks = chunks.into_iter();
        Self::new(move |_| chunks.next())
    }

    /// Declare the total size of the data the source will produce.
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the metadata reported by the stream.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Call the source until `length` bytes are buffered or the source
    /// is exhausted.
    fn pump(&mut self, mut length: usize) {
        while length > 0 {
            let source = match self.source.as_mut() {
                None => return,
                Some(source) => source,
            };
            match source(length) {
                Some(data) if !data.is_empty() => {
                    length = length.saturating_sub(data.len());
                    self.buffer.write(&data);
                }
                _ => {
                    debug!(
                        "Pump source exhausted after {} bytes.",
                        self.position as usize + self.buffer.len()
                    );
                    self.source = None;
                }
            }
        }
    }
}

impl Stream for PumpStream {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if self.detached {
            return Err(Error::Detached);
        }
        let mut data = self.buffer.read(length);
        self.position += data.len() as u64;
        let remaining = length - data.len();

        if remaining > 0 {
            self.pump(remaining);
            let more = self.buffer.read(remaining);
            self.position += more.len() as u64;
            data.extend_from_slice(&more);
        }
        Ok(data)
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<usize> {
        Err(Error::unsupported("cannot write to a pump stream"))
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<()> {
        Err(Error::unsupported("cannot seek a pump stream"))
    }

    fn rewind(&mut self) -> Result<()> {
        if self.detached {
            return Err(Error::Detached);
        }
        match self.position {
            0 => Ok(()),
            _ => Err(Error::unsupported("cannot rewind a pump stream")),
        }
    }

    fn tell(&mut self) -> Result<u64> {
        if self.detached {
            return Err(Error::Detached);
        }
        Ok(self.position)
    }

    fn eof(&mut self) -> bool {
        self.source.is_none() && self.buffer.is_empty()
    }

    fn size(&mut self) -> Option<u64> {
        self.size
    }

    fn is_readable(&self) -> bool {
        !self.detached
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn close(&mut self) {
        self.detach();
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.position = 0;
        self.source = None;
        self.buffer.clear();
        self.detached = true;
        None
    }

    fn metadata(&self) -> Metadata {
        self.metadata.clone()
    }
}
