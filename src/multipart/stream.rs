use super::{mime, Element};
use crate::{AppendStream, Error, Result, Stream};
use rand::Rng;
use std::fmt::Write;
use std::path::Path;

/// Locations that are not file names.
const INTERNAL_URIS: [&str; 3] = ["memory://", "temp://", "data://"];
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Read-only stream of a `multipart/form-data` body.
///
/// The body is an [`AppendStream`](../struct.AppendStream.html) of, for
/// each element, the delimiter line and headers of the part, the contents
/// of the element and a line break, followed by the closing delimiter.
///
/// Parts get the following headers unless the element already sets them
/// (header names are compared without case):
/// * `Content-Disposition: form-data; name="<name>"` followed by
///   `; filename="<file name>"` when the part has a file name,
/// * `Content-Length` when the size of the contents is known and not zero,
/// * `Content-Type` guessed from the extension of the file name, when the
///   part has a file name.
pub struct MultipartStream {
    boundary: String,
    stream: AppendStream,
}

impl MultipartStream {
    /// Encode `elements` with a random boundary.
    pub fn new<I>(elements: I) -> Result<Self>
    where
        I: IntoIterator<Item = Element>,
    {
        Self::with_boundary(elements, random_boundary())
    }

    /// Encode `elements` delimited with `boundary`.
    ///
    /// Returns [`Error::InvalidArgument`](../enum.Error.html) if an
    /// element has no name or no contents.
    pub fn with_boundary<I, S>(elements: I, boundary: S) -> Result<Self>
    where
        I: IntoIterator<Item = Element>,
        S: Into<String>,
    {
        let boundary = boundary.into();
        let mut stream = AppendStream::new();
        for element in elements {
            add_element(&mut stream, &boundary, element)?;
        }
        stream.add_stream(format!("--{}--\r\n", boundary))?;
        Ok(MultipartStream { boundary, stream })
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value of the `Content-Type` header of a message with this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

impl Stream for MultipartStream {
    fn decorated(&self) -> Option<&dyn Stream> {
        Some(&self.stream)
    }

    fn decorated_mut(&mut self) -> Option<&mut dyn Stream> {
        Some(&mut self.stream)
    }

    fn write(&mut self, _bytes: &[u8]) -> Result<usize> {
        Err(Error::unsupported("cannot write to a multipart stream"))
    }

    fn is_writable(&self) -> bool {
        false
    }
}

/// 40 hexadecimal characters.
fn random_boundary() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// First value of header `key`, ignoring case.
fn header_value<'a>(
    headers: &'a [(String, String)],
    key: &str,
) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

fn is_file_name(uri: &str) -> bool {
    !uri.is_empty() && !INTERNAL_URIS.iter().any(|p| uri.starts_with(p))
}

fn basename(filename: &str) -> String {
    match Path::new(filename).file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => String::from(filename),
    }
}

fn add_element(
    stream: &mut AppendStream,
    boundary: &str,
    element: Element,
) -> Result<()> {
    let name = element.name.ok_or_else(|| {
        Error::invalid_argument("a multipart element requires a name")
    })?;
    let mut contents = element.contents.ok_or_else(|| {
        Error::invalid_argument("a multipart element requires contents")
    })?;

    let filename = match element.filename {
        Some(filename) if !filename.is_empty() => Some(filename),
        _ => contents.metadata_value("uri").filter(|uri| is_file_name(uri)),
    }
    .map(|filename| basename(&filename));

    let mut headers = element.headers;
    if header_value(&headers, "content-disposition").is_none() {
        let disposition = match &filename {
            Some(filename) => format!(
                "form-data; name=\"{}\"; filename=\"{}\"",
                name, filename
            ),
            None => format!("form-data; name=\"{}\"", name),
        };
        headers.push((String::from("Content-Disposition"), disposition));
    }
    if header_value(&headers, "content-length").is_none() {
        if let Some(size) = contents.size().filter(|size| *size > 0) {
            headers.push((String::from("Content-Length"), size.to_string()));
        }
    }
    if header_value(&headers, "content-type").is_none() {
        if let Some(filename) = &filename {
            let content_type =
                mime::from_filename(filename).unwrap_or(DEFAULT_CONTENT_TYPE);
            headers.push((
                String::from("Content-Type"),
                String::from(content_type),
            ));
        }
    }

    let mut block = format!("--{}\r\n", boundary);
    for (key, value) in headers.iter() {
        // Writing to a String cannot fail.
        let _ = write!(block, "{}: {}\r\n", key, value);
    }
    block.push_str("\r\n");

    stream.add_stream(block)?;
    stream.add_stream(contents)?;
    stream.add_stream("\r\n")
}

#[cfg(test)]
mod tests {
    use super::MultipartStream;
    use crate::multipart::Element;
    use crate::{Error, IoStream, Mode, PumpStream, Stream};
    use std::io::Write;

    fn contents(stream: &mut MultipartStream) -> String {
        String::from_utf8(stream.get_contents().unwrap()).unwrap()
    }

    #[test]
    fn test_form_data() {
        let mut stream = MultipartStream::with_boundary(
            vec![
                Element::new().name("field").contents("hello"),
                Element::new()
                    .name("file")
                    .contents(b"file contents".to_vec())
                    .filename("a.txt"),
            ],
            "B",
        )
        .unwrap();
        let expected = "--B\r\n\
            Content-Disposition: form-data; name=\"field\"\r\n\
            Content-Length: 5\r\n\
            \r\n\
            hello\r\n\
            --B\r\n\
            Content-Disposition: form-data; name=\"file\"; \
            filename=\"a.txt\"\r\n\
            Content-Length: 13\r\n\
            Content-Type: text/plain\r\n\
            \r\n\
            file contents\r\n\
            --B--\r\n";
        assert_eq!(stream.size(), Some(expected.len() as u64));
        assert_eq!(contents(&mut stream), expected);
        assert!(stream.eof());
        // Memory parts can be read again.
        stream.rewind().unwrap();
        assert_eq!(contents(&mut stream), expected);
    }

    #[test]
    fn test_empty() {
        let mut stream =
            MultipartStream::with_boundary(Vec::new(), "B").unwrap();
        assert_eq!(contents(&mut stream), "--B--\r\n");
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(
            MultipartStream::new(vec![Element::new().contents("x")]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            MultipartStream::new(vec![Element::new().name("x")]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_custom_headers() {
        let mut stream = MultipartStream::with_boundary(
            vec![Element::new()
                .name("doc")
                .contents("{}")
                .filename("doc.txt")
                .header("content-TYPE", "application/json")
                .header("Content-Type", "text/ignored")
                .header("X-Tag", "1")],
            "B",
        )
        .unwrap();
        let body = contents(&mut stream);
        let head = "--B\r\n\
            content-TYPE: application/json\r\n\
            Content-Type: text/ignored\r\n\
            X-Tag: 1\r\n\
            Content-Disposition: form-data; name=\"doc\"; \
            filename=\"doc.txt\"\r\n\
            Content-Length: 2\r\n\
            \r\n{}\r\n";
        assert!(body.starts_with(head));
    }

    #[test]
    fn test_unknown_size_and_type() {
        let mut stream = MultipartStream::with_boundary(
            vec![Element::new()
                .name("blob")
                .contents(PumpStream::from_chunks(vec![b"xyz".to_vec()]))
                .filename("dir/blob.unknown")],
            "B",
        )
        .unwrap();
        assert_eq!(stream.size(), None);
        assert!(!stream.is_seekable());
        assert_eq!(
            contents(&mut stream),
            "--B\r\n\
             Content-Disposition: form-data; name=\"blob\"; \
             filename=\"blob.unknown\"\r\n\
             Content-Type: application/octet-stream\r\n\
             \r\n\
             xyz\r\n\
             --B--\r\n"
        );
    }

    #[test]
    fn test_filename_from_uri() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        file.write_all(b"[]").unwrap();
        let path = file.path().to_path_buf();
        let basename = path.file_name().unwrap().to_string_lossy();

        let part = IoStream::open(&path, Mode::Read).unwrap();
        let mut stream = MultipartStream::with_boundary(
            vec![Element::new().name("upload").contents(part)],
            "B",
        )
        .unwrap();
        let body = contents(&mut stream);
        assert!(body.contains(&format!(
            "name=\"upload\"; filename=\"{}\"\r\n",
            basename
        )));
        assert!(body.contains("Content-Type: application/json\r\n"));
        assert!(body.contains("\r\n\r\n[]\r\n--B--\r\n"));
    }

    #[test]
    fn test_no_filename_for_memory() {
        let mut stream = MultipartStream::new(vec![Element::new()
            .name("a")
            .contents(crate::MemoryStream::from_bytes(b"1".to_vec()))])
        .unwrap();
        let body = contents(&mut stream);
        assert!(!body.contains("filename"));
        assert!(!body.contains("Content-Type"));
    }

    #[test]
    fn test_boundary() {
        let stream = MultipartStream::new(Vec::new()).unwrap();
        let other = MultipartStream::new(Vec::new()).unwrap();
        assert_eq!(stream.boundary().len(), 40);
        assert!(stream.boundary().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(stream.boundary(), other.boundary());
        assert_eq!(
            stream.content_type(),
            format!("multipart/form-data; boundary={}", stream.boundary())
        );
    }

    #[test]
    fn test_read_only() {
        let mut stream = MultipartStream::new(vec![Element::new()
            .name("a")
            .contents("1")])
        .unwrap();
        assert!(!stream.is_writable());
        assert!(stream.is_readable());
        assert!(matches!(stream.write(b"x"), Err(Error::Unsupported(_))));
        crate::tests::test_closed(stream);
    }
}
