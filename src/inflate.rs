use crate::{
    utils, Error, LimitStream, Metadata, NoSeekStream, Resource, Result,
    Stream, StreamHandle,
};
use flate2::read::DeflateDecoder;
use log::debug;
use std::io::{Read, SeekFrom};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const GZIP_HEADER_LEN: usize = 10;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;
const SKIP_CHUNK: u64 = 8192;
const READ_CHUNK: usize = 8192;

/// Read-only decorator decompressing a gzip stream.
///
/// The gzip header (RFC 1952) is read and skipped when the stream is
/// created, including the optional extra field, file name, comment and
/// header checksum. The DEFLATE payload that follows is decoded on the fly
/// as the stream is read. The gzip trailer is not verified.
///
/// A decorated seekable stream makes the inflate stream seekable from
/// its start: seeking forward decodes and discards bytes, seeking
/// backward decodes again from the beginning of the payload. The size of
/// the decoded payload is never known.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, InflateStream, Stream};
/// use flate2::{write::GzEncoder, Compression};
/// use std::io::Write;
///
/// let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
/// encoder.write_all(b"inflated").unwrap();
/// let gzip = encoder.finish().unwrap();
///
/// let mut stream = InflateStream::new(stream_for(gzip)).unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"inflated");
/// ```
pub struct InflateStream {
    stream: Box<dyn Stream>,
}

impl InflateStream {
    /// Decode the gzip stream `stream`, positioned at the start of the
    /// gzip header.
    ///
    /// Returns [`Error::InvalidArgument`](enum.Error.html) if the stream
    /// does not start with a gzip header.
    pub fn new<S: Stream + 'static>(mut stream: S) -> Result<Self> {
        let seekable = stream.is_seekable();
        let start = if seekable { Some(stream.tell()?) } else { None };
        let header_len = skip_header(&mut stream)?;
        let window = match start {
            Some(start) => LimitStream::new(stream, None, start + header_len)?,
            // Already past the header, and may not know its position.
            None => LimitStream::from_current(stream),
        };
        let decoded = DecodedStream::new(window)?;
        let stream: Box<dyn Stream> = if seekable {
            Box::new(decoded)
        } else {
            Box::new(NoSeekStream::new(decoded))
        };
        Ok(InflateStream { stream })
    }
}

impl Stream for InflateStream {
    fn decorated(&self) -> Option<&dyn Stream> {
        Some(&self.stream)
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        Some(&mut self.stream)
    }
}

fn read_exact<S: Stream>(stream: &mut S, length: usize) -> Result<Vec<u8>> {
    let bytes = utils::copy_to_string(stream, Some(length))?;
    if bytes.len() < length {
        return Err(Error::invalid_argument("truncated gzip header"));
    }
    Ok(bytes)
}

/// Consume a NUL terminated header field and return its length, NUL
/// included.
fn skip_zero_terminated<S: Stream>(stream: &mut S) -> Result<u64> {
    let mut length = 0u64;
    loop {
        let byte = read_exact(stream, 1)?;
        length += 1;
        if byte[0] == 0 {
            return Ok(length);
        }
    }
}

/// Consume the gzip header and return its length.
fn skip_header<S: Stream>(stream: &mut S) -> Result<u64> {
    let header = match read_exact(stream, GZIP_HEADER_LEN) {
        Ok(header) => header,
        Err(_) => return Err(Error::invalid_argument("not a gzip stream")),
    };
    if header[..2] != GZIP_MAGIC {
        return Err(Error::invalid_argument("not a gzip stream"));
    }
    let flags = header[3];
    let mut length = GZIP_HEADER_LEN as u64;

    if flags & FEXTRA != 0 {
        let xlen = read_exact(stream, 2)?;
        let xlen = u16::from_le_bytes([xlen[0], xlen[1]]) as usize;
        read_exact(stream, xlen)?;
        length += 2 + xlen as u64;
    }
    if flags & FNAME != 0 {
        length += skip_zero_terminated(stream)?;
    }
    if flags & FCOMMENT != 0 {
        length += skip_zero_terminated(stream)?;
    }
    if flags & FHCRC != 0 {
        read_exact(stream, 2)?;
        length += 2;
    }
    Ok(length)
}

type Decoder<S> = DeflateDecoder<StreamHandle<LimitStream<S>>>;

/// The DEFLATE payload of a gzip stream, decoded.
struct DecodedStream<S: Stream> {
    decoder: Option<Decoder<S>>,
    position: u64,
    eof: bool,
}

impl<S: Stream> DecodedStream<S> {
    fn new(window: LimitStream<S>) -> Result<Self> {
        Ok(DecodedStream {
            decoder: Some(DeflateDecoder::new(StreamHandle::new(window)?)),
            position: 0u64,
            eof: false,
        })
    }

    fn window(&self) -> Option<&LimitStream<S>> {
        self.decoder.as_ref().map(|d| d.get_ref().get_ref())
    }

    /// Decode the payload again from its start.
    fn restart(&mut self) -> Result<()> {
        let decoder = self.decoder.take().ok_or(Error::Detached)?;
        let mut window = decoder.into_inner().into_inner();
        window.rewind()?;
        debug!(
            "Inflate stream restarts decoding to seek back from byte {}.",
            self.position
        );
        self.decoder = Some(DeflateDecoder::new(StreamHandle::new(window)?));
        self.position = 0;
        self.eof = false;
        Ok(())
    }
}

impl<S: Stream> Stream for DecodedStream<S> {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        let decoder = self.decoder.as_mut().ok_or(Error::Detached)?;
        // Grow with the bytes actually read, not with the request.
        let mut buf = Vec::with_capacity(std::cmp::min(length, READ_CHUNK));
        let filled = decoder.take(length as u64).read_to_end(&mut buf)?;
        if filled < length {
            self.eof = true;
        }
        self.position += filled as u64;
        Ok(buf)
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<usize> {
        Err(Error::unsupported("cannot write to an inflate stream"))
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::Current(offset) => self.position as i128 + offset as i128,
            SeekFrom::End(_) => {
                return Err(Error::unsupported(
                    "cannot seek from the end of an inflate stream",
                ))
            }
        };
        if target < 0 {
            return Err(Error::invalid_argument(format!(
                "cannot seek to byte {}",
                target
            )));
        }
        let target = target as u64;

        if target < self.position {
            self.restart()?;
        }
        while self.position < target {
            let chunk = std::cmp::min(SKIP_CHUNK, target - self.position);
            if self.read(chunk as usize)?.is_empty() {
                break;
            }
        }
        Ok(())
    }

    fn tell(&mut self) -> Result<u64> {
        match self.decoder {
            None => Err(Error::Detached),
            Some(_) => Ok(self.position),
        }
    }

    fn eof(&mut self) -> bool {
        self.decoder.is_none() || self.eof
    }

    fn size(&mut self) -> Option<u64> {
        None
    }

    fn is_readable(&self) -> bool {
        self.decoder.is_some()
    }

    fn is_writable(&self) -> bool {
        false
    }

    fn is_seekable(&self) -> bool {
        self.window().map_or(false, |w| w.is_seekable())
    }

    fn close(&mut self) {
        if let Some(decoder) = self.decoder.take() {
            decoder.into_inner().into_inner().close();
        }
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.decoder
            .take()
            .and_then(|d| d.into_inner().into_inner().detach())
    }

    fn metadata(&self) -> Metadata {
        self.window().map(|w| w.metadata()).unwrap_or_default()
    }
}
