use crate::{Error, Result, Stream};
use std::io::SeekFrom;

/// Window over a section of another stream.
///
/// The window starts `offset` bytes into the decorated stream and spans
/// up to `limit` bytes, or up to the end of the decorated stream when
/// there is no limit. Positions reported by the window are relative to
/// its start.
///
/// When the window is created, the decorated stream is moved to the
/// window start: seekable streams are seeked, other streams are read and
/// the bytes discarded. A non-seekable stream already past the offset
/// cannot be windowed.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, LimitStream, Stream};
///
/// let mut window = LimitStream::new(stream_for("0123456789"), Some(3), 2)
///     .unwrap();
/// assert_eq!(window.size(), Some(3));
/// assert_eq!(window.get_contents().unwrap(), b"234");
/// assert!(window.eof());
/// ```
pub struct LimitStream<S: Stream> {
    stream: S,
    limit: Option<u64>,
    offset: u64,
}

impl<S: Stream> LimitStream<S> {
    pub fn new(stream: S, limit: Option<u64>, offset: u64) -> Result<Self> {
        let mut window = LimitStream {
            stream,
            limit,
            offset: 0u64,
        };
        window.set_offset(offset)?;
        Ok(window)
    }

    /// Window starting at the current position of `stream`, without
    /// asking the stream where it is.
    pub(crate) fn from_current(stream: S) -> Self {
        LimitStream {
            stream,
            limit: None,
            offset: 0u64,
        }
    }

    /// Move the window start to `offset` bytes into the decorated stream.
    pub fn set_offset(&mut self, offset: u64) -> Result<()> {
        let current = self.stream.tell()?;
        if current != offset {
            if self.stream.is_seekable() {
                self.stream.seek(SeekFrom::Start(offset))?;
            } else if current > offset {
                return Err(Error::unsupported(format!(
                    "could not seek to stream offset {}",
                    offset
                )));
            } else {
                let mut missing = offset - current;
                while missing > 0 {
                    let skipped = self.stream.read(missing as usize)?;
                    if skipped.is_empty() {
                        break;
                    }
                    missing -= skipped.len() as u64;
                }
            }
        }
        self.offset = offset;
        Ok(())
    }

    /// Set the maximum number of bytes of the window. `None` lets the
    /// window run to the end of the decorated stream.
    pub fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl<S: Stream> Stream for LimitStream<S> {
    fn decorated(&self) -> Option<&dyn Stream> {
        Some(&self.stream)
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        Some(&mut self.stream)
    }

    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        let limit = match self.limit {
            None => return self.stream.read(length),
            Some(limit) => limit,
        };
        let end = self.offset + limit;
        let position = self.stream.tell()?;
        if end > position {
            let remaining = std::cmp::min(end - position, length as u64);
            self.stream.read(remaining as usize)
        } else {
            Ok(Vec::new())
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        let offset = match pos {
            SeekFrom::Start(offset) => offset,
            _ => {
                return Err(Error::invalid_argument(
                    "a limited stream can only seek from the start",
                ))
            }
        };
        let mut target = self.offset + offset;
        if let Some(limit) = self.limit {
            target = std::cmp::min(target, self.offset + limit);
        }
        self.stream.seek(SeekFrom::Start(target))
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.stream.tell()?.saturating_sub(self.offset))
    }

    fn eof(&mut self) -> bool {
        if self.stream.eof() {
            return true;
        }
        match self.limit {
            None => false,
            Some(limit) => match self.stream.tell() {
                Ok(position) => position >= self.offset + limit,
                Err(_) => true,
            },
        }
    }

    fn size(&mut self) -> Option<u64> {
        let length = self.stream.size()?.saturating_sub(self.offset);
        match self.limit {
            None => Some(length),
            Some(limit) => Some(std::cmp::min(limit, length)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LimitStream;
    use crate::tests::{random_bytes, test_readable, test_seekable};
    use crate::{stream_for, Error, IoStream, MemoryStream, Stream};
    use std::io::{Cursor, SeekFrom};

    #[test]
    fn test_limit_stream() {
        let bytes = random_bytes(1000);
        let window = || {
            LimitStream::new(stream_for(bytes.clone()), Some(500), 100)
                .unwrap()
        };
        test_readable(window(), &bytes[100..600]);
        test_seekable(window(), &bytes[100..600]);
    }

    #[test]
    fn test_no_limit() {
        let mut window =
            LimitStream::new(stream_for("headerbody"), None, 6).unwrap();
        assert_eq!(window.size(), Some(4));
        assert_eq!(window.tell().unwrap(), 0);
        assert_eq!(window.get_contents().unwrap(), b"body");
        window.rewind().unwrap();
        assert_eq!(window.read(2).unwrap(), b"bo");
    }

    #[test]
    fn test_non_seekable_skips_forward() {
        let stream =
            IoStream::new(Cursor::new(b"skipkeep".to_vec())).non_seekable();
        let mut window = LimitStream::new(stream, Some(2), 4).unwrap();
        assert_eq!(window.get_contents().unwrap(), b"ke");
        assert!(window.eof());
    }

    #[test]
    fn test_non_seekable_past_offset() {
        let mut stream =
            IoStream::new(Cursor::new(b"abcdef".to_vec())).non_seekable();
        stream.read(4).unwrap();
        assert!(matches!(
            LimitStream::new(stream, None, 2),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_seek_clamped_to_window() {
        let stream = MemoryStream::from_bytes(b"0123456789".to_vec());
        let mut window = LimitStream::new(stream, Some(4), 3).unwrap();
        window.seek(SeekFrom::Start(10)).unwrap();
        assert_eq!(window.tell().unwrap(), 4);
        assert!(window.eof());
        assert!(matches!(
            window.seek(SeekFrom::End(0)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_writes_pass_through() {
        let stream = MemoryStream::from_bytes(b"abcdef".to_vec());
        let mut window = LimitStream::new(stream, None, 2).unwrap();
        assert!(window.is_writable());
        assert_eq!(window.write(b"XY").unwrap(), 2);
        let inner = window.into_inner().into_inner().unwrap();
        assert_eq!(inner.into_inner(), b"abXYef");
    }
}
