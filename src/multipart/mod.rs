//! Encoding of named parts into a `multipart/form-data` body.
//!
//! A [`MultipartStream`] is built from a list of [`Element`]s. Each element
//! has a name, some contents and optionally a file name and headers. The
//! encoded stream is read lazily, the contents of the parts are never
//! copied in memory.
//!
//! ```
//! use byos::{Element, MultipartStream, Stream};
//!
//! let mut body = MultipartStream::with_boundary(
//!     vec![Element::new().name("greeting").contents("hi")],
//!     "XYZ",
//! )
//! .unwrap();
//! assert_eq!(body.content_type(), "multipart/form-data; boundary=XYZ");
//! assert_eq!(
//!     body.get_contents().unwrap(),
//!     b"--XYZ\r\n\
//!       Content-Disposition: form-data; name=\"greeting\"\r\n\
//!       Content-Length: 2\r\n\
//!       \r\n\
//!       hi\r\n\
//!       --XYZ--\r\n"
//! );
//! ```

mod element;
pub use element::Element;
pub mod mime;
mod stream;
pub use stream::MultipartStream;
