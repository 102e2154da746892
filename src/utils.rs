use crate::{Result, Stream};

/// Chunk size when reading a stream into memory.
const STRING_CHUNK: usize = 1 << 20;
/// Chunk size when copying a stream into another.
const COPY_CHUNK: usize = 8192;

/// Read the remaining bytes of `stream`, at most `max_length` of them if
/// set.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, utils::copy_to_string};
///
/// let mut stream = stream_for("hello world");
/// assert_eq!(copy_to_string(&mut stream, Some(5)).unwrap(), b"hello");
/// assert_eq!(copy_to_string(&mut stream, None).unwrap(), b" world");
/// ```
pub fn copy_to_string<S: Stream + ?Sized>(
    stream: &mut S,
    max_length: Option<usize>,
) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    loop {
        let chunk = match max_length {
            None => STRING_CHUNK,
            Some(max) if buffer.len() >= max => break,
            Some(max) => std::cmp::min(STRING_CHUNK, max - buffer.len()),
        };
        let bytes = stream.read(chunk)?;
        if bytes.is_empty() {
            break;
        }
        buffer.extend_from_slice(&bytes);
    }
    Ok(buffer)
}

/// Copy the remaining bytes of `source` into `dest`, at most `max_length`
/// of them if set. Returns the number of bytes written.
///
/// Copy stops early when `dest` accepts no more bytes.
pub fn copy_to_stream<S, D>(
    source: &mut S,
    dest: &mut D,
    max_length: Option<u64>,
) -> Result<u64>
where
    S: Stream + ?Sized,
    D: Stream + ?Sized,
{
    let mut copied = 0u64;
    loop {
        let chunk = match max_length {
            None => COPY_CHUNK,
            Some(max) if copied >= max => break,
            Some(max) => {
                std::cmp::min(COPY_CHUNK as u64, max - copied) as usize
            }
        };
        let bytes = source.read(chunk)?;
        if bytes.is_empty() {
            break;
        }
        let mut written = 0usize;
        while written < bytes.len() {
            let n = dest.write(&bytes[written..])?;
            if n == 0 {
                return Ok(copied + written as u64);
            }
            written += n;
        }
        copied += written as u64;
    }
    Ok(copied)
}

/// Read a line from `stream`, up to and including the first `\n`, reading
/// at most `max_length` bytes if set.
pub fn read_line<S: Stream + ?Sized>(
    stream: &mut S,
    max_length: Option<usize>,
) -> Result<Vec<u8>> {
    let mut line = Vec::new();
    while max_length.map_or(true, |max| line.len() < max) {
        let byte = stream.read(1)?;
        match byte.first() {
            None => break,
            Some(b) => {
                line.push(*b);
                if *b == b'\n' {
                    break;
                }
            }
        }
    }
    Ok(line)
}
