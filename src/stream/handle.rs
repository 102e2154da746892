use super::Mode;
use crate::{Error, Result, Stream};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

/// A `std::io` handle backed by a [`Stream`](../trait.Stream.html).
///
/// The handle implements [`std::io::Read`], [`std::io::Write`] and
/// [`std::io::Seek`] on top of the stream methods so that any stream can
/// be handed to code expecting a native handle, e.g. a decompression
/// filter. The access mode of the handle is chosen from the stream
/// capabilities when the handle is created.
///
/// Bytes returned by the stream beyond the size of the read buffer are
/// kept and served by the next read. Seeking drops them.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, Mode, StreamHandle};
/// use std::io::Read;
///
/// let mut handle = StreamHandle::new(stream_for("text")).unwrap();
/// assert_eq!(handle.mode(), Mode::ReadWrite);
/// let mut s = String::new();
/// handle.read_to_string(&mut s).unwrap();
/// assert_eq!(s, "text");
/// ```
pub struct StreamHandle<S: Stream> {
    stream: S,
    mode: Mode,
    pending: Vec<u8>,
}

impl<S: Stream> StreamHandle<S> {
    /// Bridge `stream` into a handle.
    ///
    /// Returns [`Error::InvalidArgument`](../enum.Error.html) if the
    /// stream is neither readable nor writable.
    pub fn new(stream: S) -> Result<Self> {
        let mode = match (stream.is_readable(), stream.is_writable()) {
            (true, true) => Mode::ReadWrite,
            (true, false) => Mode::Read,
            (false, true) => Mode::Write,
            (false, false) => {
                return Err(Error::invalid_argument(
                    "the stream must be readable, writable, or both",
                ))
            }
        };
        Ok(StreamHandle {
            stream,
            mode,
            pending: Vec::new(),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Stream> Read for StreamHandle<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.mode.is_readable() {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                "handle is not readable",
            ));
        }
        if self.pending.is_empty() {
            self.pending = self.stream.read(buf.len())?;
        }
        let n = std::cmp::min(buf.len(), self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(n)
    }
}

impl<S: Stream> Write for StreamHandle<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !self.mode.is_writable() {
            return Err(std::io::Error::new(
                ErrorKind::Unsupported,
                "handle is not writable",
            ));
        }
        Ok(self.stream.write(buf)?)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<S: Stream> Seek for StreamHandle<S> {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.stream.seek(pos)?;
        self.pending.clear();
        Ok(self.stream.tell()?)
    }
}

#[cfg(test)]
mod tests {
    use super::StreamHandle;
    use crate::stream::Mode;
    use crate::{stream_for, AppendStream, Error, FnStream, Methods};
    use std::io::{Read, Seek, SeekFrom, Write};

    #[test]
    fn test_read_only_handle() {
        let mut stream = AppendStream::new();
        stream.add_stream(stream_for("abc")).unwrap();
        stream.add_stream(stream_for("def")).unwrap();
        let mut handle = StreamHandle::new(stream).unwrap();
        assert_eq!(handle.mode(), Mode::Read);
        let mut out = Vec::new();
        handle.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"abcdef");
        assert!(handle.write(b"x").is_err());
        handle.seek(SeekFrom::Start(4)).unwrap();
        let mut out = String::new();
        handle.read_to_string(&mut out).unwrap();
        assert_eq!(out, "ef");
    }

    #[test]
    fn test_write_only_handle() {
        let written = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = written.clone();
        let stream = FnStream::new(
            Methods::new()
                .is_readable(|| false)
                .is_writable(|| true)
                .write(move |bytes| {
                    sink.borrow_mut().extend_from_slice(bytes);
                    Ok(bytes.len())
                }),
        );
        let mut handle = StreamHandle::new(stream).unwrap();
        assert_eq!(handle.mode(), Mode::Write);
        handle.write_all(b"hello").unwrap();
        assert_eq!(*written.borrow(), b"hello");
        let mut buf = [0u8; 2];
        assert!(handle.read(&mut buf).is_err());
    }

    #[test]
    fn test_read_keeps_extra_bytes() {
        let stream = FnStream::decorate(
            stream_for("abc"),
            Methods::new().read(|_| Ok(b"zy".to_vec())),
        );
        let mut handle = StreamHandle::new(stream).unwrap();
        let mut buf = [0u8; 1];
        assert_eq!(handle.read(&mut buf).unwrap(), 1);
        assert_eq!(&buf, b"z");
        assert_eq!(handle.read(&mut buf).unwrap(), 1);
        assert_eq!(&buf, b"y");
        let mut buf = [0u8; 3];
        assert_eq!(handle.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"zy");
    }

    #[test]
    fn test_invalid_handle() {
        let stream = FnStream::new(
            Methods::new().is_readable(|| false).is_writable(|| false),
        );
        assert!(matches!(
            StreamHandle::new(stream),
            Err(Error::InvalidArgument(_))
        ));
    }
}
