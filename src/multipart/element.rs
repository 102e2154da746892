use crate::{IntoStream, Stream};

/// A part of a `multipart/form-data` body.
///
/// `name` and `contents` are required. When no file name is given, the
/// file name is taken from the `uri` metadata of the contents, unless it
/// points to memory or to a temporary location.
#[derive(Default)]
pub struct Element {
    pub(super) name: Option<String>,
    pub(super) contents: Option<Box<dyn Stream>>,
    pub(super) filename: Option<String>,
    pub(super) headers: Vec<(String, String)>,
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form field name of the part.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn contents<T: IntoStream>(mut self, contents: T) -> Self {
        self.contents = Some(contents.into_stream());
        self
    }

    pub fn filename<S: Into<String>>(mut self, filename: S) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Add a header to the part. Headers given here replace the default
    /// header of the same name.
    pub fn header<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.push((key.into(), value.into()));
        self
    }
}
