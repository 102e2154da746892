use crate::{Error, Metadata, Resource, Result, Stream};
use std::io::SeekFrom;

const MIN_CAPACITY: usize = 64;

/// Growable circular byte buffer.
///
/// Bytes are appended at the tail with
/// [`write()`](struct.RingBuffer.html#method.write) and consumed from the
/// head with [`read()`](struct.RingBuffer.html#method.read). Consumed
/// bytes are discarded, there is no random access. When the buffer is
/// full, its capacity doubles and the content is moved to the front of
/// the new area.
///
/// [`RingBuffer`] is also a [`Stream`](trait.Stream.html): readable,
/// writable but not seekable. Its size is the number of buffered bytes and
/// it is at its end when empty. An optional high water mark makes stream
/// writes return `0` once the buffer holds at least that many bytes, to
/// tell the producer to back off. The bytes are still buffered.
///
/// ## Examples
///
/// ```
/// use byos::RingBuffer;
///
/// let mut buffer = RingBuffer::new();
/// buffer.write(b"hello world");
/// assert_eq!(buffer.read(5), b"hello");
/// assert_eq!(buffer.peek(3), b" wo");
/// assert_eq!(buffer.read(100), b" world");
/// assert!(buffer.is_empty());
/// ```
pub struct RingBuffer {
    data: Vec<u8>,
    head: usize,
    len: usize,
    high_water_mark: Option<usize>,
    closed: bool,
}

impl RingBuffer {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        RingBuffer {
            data: vec![0u8; capacity],
            head: 0usize,
            len: 0usize,
            high_water_mark: None,
            closed: false,
        }
    }

    /// Set the number of buffered bytes at which stream writes report
    /// that the buffer is full.
    pub fn with_high_water_mark(mut self, high_water_mark: usize) -> Self {
        self.high_water_mark = Some(high_water_mark);
        self
    }

    /// Number of buffered bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Whether the high water mark, if any, is reached.
    pub fn is_full(&self) -> bool {
        match self.high_water_mark {
            None => false,
            Some(hwm) => self.len >= hwm,
        }
    }

    /// Append bytes at the tail of the buffer, growing it if needed.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.reserve(bytes.len());
        let capacity = self.data.len();
        if capacity == 0 {
            return 0;
        }

        let tail = (self.head + self.len) % capacity;
        let first = std::cmp::min(bytes.len(), capacity - tail);
        self.data[tail..tail + first].copy_from_slice(&bytes[..first]);
        let rest = bytes.len() - first;
        self.data[..rest].copy_from_slice(&bytes[first..]);
        self.len += bytes.len();
        bytes.len()
    }

    /// Copy up to `n` bytes from the head of the buffer, without
    /// consuming them.
    pub fn peek(&self, n: usize) -> Vec<u8> {
        let n = std::cmp::min(n, self.len);
        let mut out = Vec::with_capacity(n);
        if n == 0 {
            return out;
        }

        let capacity = self.data.len();
        let first = std::cmp::min(n, capacity - self.head);
        out.extend_from_slice(&self.data[self.head..self.head + first]);
        out.extend_from_slice(&self.data[..n - first]);
        out
    }

    /// Consume up to `n` bytes from the head of the buffer.
    pub fn read(&mut self, n: usize) -> Vec<u8> {
        let out = self.peek(n);
        self.len -= out.len();
        self.head = if self.len == 0 {
            0
        } else {
            (self.head + out.len()) % self.data.len()
        };
        out
    }

    /// Discard all buffered bytes.
    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }

    fn reserve(&mut self, additional: usize) {
        let required = self.len + additional;
        let capacity = self.data.len();
        if required <= capacity {
            return;
        }

        let mut new_capacity = std::cmp::max(capacity, MIN_CAPACITY);
        while new_capacity < required {
            new_capacity *= 2;
        }

        // Move the content to the front of the new area.
        let mut data = self.peek(self.len);
        data.resize(new_capacity, 0u8);
        self.data = data;
        self.head = 0;
    }
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stream for RingBuffer {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::Detached);
        }
        Ok(RingBuffer::read(self, length))
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(Error::Detached);
        }
        let written = RingBuffer::write(self, bytes);
        if self.is_full() {
            Ok(0)
        } else {
            Ok(written)
        }
    }

    fn seek(&mut self, _pos: SeekFrom) -> Result<()> {
        Err(Error::unsupported("cannot seek a ring buffer"))
    }

    fn tell(&mut self) -> Result<u64> {
        Err(Error::unsupported("cannot tell the position of a ring buffer"))
    }

    fn eof(&mut self) -> bool {
        self.is_empty()
    }

    fn size(&mut self) -> Option<u64> {
        Some(self.len as u64)
    }

    fn is_readable(&self) -> bool {
        !self.closed
    }

    fn is_writable(&self) -> bool {
        !self.closed
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn close(&mut self) {
        self.clear();
        self.closed = true;
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.close();
        None
    }

    fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        if let Some(hwm) = self.high_water_mark {
            metadata.insert(String::from("hwm"), hwm.to_string());
        }
        metadata
    }
}

#[cfg(test)]
mod tests {
    use super::RingBuffer;
    use crate::tests::random_bytes;
    use crate::{Error, Stream};
    use std::io::SeekFrom;

    #[test]
    fn test_write_then_read() {
        for n in [0usize, 1, 63, 64, 65, 1000] {
            let bytes = random_bytes(n);
            let mut buffer = RingBuffer::new();
            assert_eq!(buffer.write(&bytes), n);
            assert_eq!(buffer.len(), n);
            assert_eq!(buffer.read(n), bytes);
            assert!(buffer.is_empty());
        }
    }

    #[test]
    fn test_read_more_than_written() {
        let mut buffer = RingBuffer::new();
        buffer.write(b"abc");
        assert_eq!(buffer.read(10), b"abc");
        assert_eq!(buffer.read(10), b"");
    }

    #[test]
    fn test_wrap_around() {
        let mut buffer = RingBuffer::with_capacity(8);
        buffer.write(b"abcdef");
        assert_eq!(buffer.read(4), b"abcd");
        // Tail wraps to the front of the area.
        buffer.write(b"ghij");
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.peek(6), b"efghij");
        // Growing while wrapped keeps bytes in order.
        buffer.write(b"klmnop");
        assert!(buffer.capacity() >= 12);
        assert_eq!(buffer.read(100), b"efghijklmnop");
    }

    #[test]
    fn test_interleaved() {
        let bytes = random_bytes(10_000);
        let mut buffer = RingBuffer::with_capacity(16);
        let mut out = Vec::new();
        for chunk in bytes.chunks(37) {
            buffer.write(chunk);
            out.extend(buffer.read(29));
        }
        out.extend(buffer.read(bytes.len()));
        assert_eq!(out, bytes);
    }

    #[test]
    fn test_stream() {
        let mut buffer = RingBuffer::new().with_high_water_mark(4);
        assert_eq!(Stream::write(&mut buffer, b"ab").unwrap(), 2);
        assert_eq!(Stream::write(&mut buffer, b"cd").unwrap(), 0);
        assert!(buffer.is_full());
        assert_eq!(Stream::size(&mut buffer), Some(4));
        assert_eq!(buffer.metadata_value("hwm").unwrap(), "4");
        assert!(matches!(
            buffer.seek(SeekFrom::Start(0)),
            Err(Error::Unsupported(_))
        ));
        assert_eq!(Stream::read(&mut buffer, 10).unwrap(), b"abcd");
        assert!(Stream::eof(&mut buffer));
        crate::tests::test_closed(buffer);
    }
}
