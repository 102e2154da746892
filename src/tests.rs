extern crate rand;
use crate::{Error, Stream};
use rand::random;
use std::io::SeekFrom;

/// Chunk sizes cycled through when reading a stream under test.
const CHUNKS: [usize; 5] = [1, 7, 100, 0, 4096];

pub fn random_bytes(n: usize) -> Vec<u8> {
    (0..n).map(|_| random::<u8>()).collect()
}

/// Read a fresh `stream` to its end and check that it yields `expected`.
pub fn test_readable<S: Stream>(mut stream: S, expected: &[u8]) {
    assert!(stream.is_readable());
    let mut out = Vec::new();
    let mut i = 0usize;

    loop {
        let chunk = CHUNKS[i % CHUNKS.len()];
        i += 1;
        let bytes = stream.read(chunk).unwrap();
        // Never more than requested.
        assert!(bytes.len() <= chunk);
        if chunk == 0 {
            assert!(bytes.is_empty());
            continue;
        }
        if bytes.is_empty() {
            break;
        }
        out.extend_from_slice(&bytes);
        // The position follows the bytes consumed.
        assert_eq!(stream.tell().unwrap(), out.len() as u64);
    }

    assert_eq!(out.len(), expected.len());
    assert!(out == expected);
    assert!(stream.eof());
    // Reading at the end keeps returning nothing.
    assert!(stream.read(10).unwrap().is_empty());
    assert!(stream.eof());
}

/// Seek a seekable `stream` back and forth and check the bytes read from
/// each position against `expected`.
pub fn test_seekable<S: Stream>(mut stream: S, expected: &[u8]) {
    assert!(stream.is_seekable());
    let len = expected.len() as u64;

    for offset in [len / 2, 0, len, len / 3, 1.min(len)] {
        stream.seek(SeekFrom::Start(offset)).unwrap();
        assert_eq!(stream.tell().unwrap(), offset);
        let rest = stream.get_contents().unwrap();
        assert!(rest == expected[offset as usize..]);
        assert!(stream.eof());
    }

    stream.rewind().unwrap();
    assert_eq!(stream.tell().unwrap(), 0);
    assert!(stream.to_bytes() == expected);
}

/// Close `stream` and check that it cannot be used anymore.
pub fn test_closed<S: Stream>(mut stream: S) {
    stream.close();
    assert!(!stream.is_readable());
    assert!(!stream.is_writable());
    assert!(!stream.is_seekable());
    assert!(matches!(stream.read(1), Err(Error::Detached)));
    assert!(stream.write(b"x").is_err());
    assert!(stream.eof());
    // Closing twice is harmless.
    stream.close();
    assert!(stream.detach().is_none());
}
