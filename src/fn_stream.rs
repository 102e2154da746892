use crate::{Error, Metadata, Resource, Result, Stream};
use std::cell::RefCell;
use std::fmt;
use std::io::SeekFrom;
use std::rc::Rc;

/// The primitive operations of a [`Stream`](trait.Stream.html) that a
/// [`FnStream`](struct.FnStream.html) can be given a behavior for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Read,
    Write,
    Seek,
    Tell,
    Eof,
    Size,
    IsReadable,
    IsWritable,
    IsSeekable,
    Close,
    Detach,
    Metadata,
}

impl Operation {
    pub const ALL: [Operation; 12] = [
        Operation::Read,
        Operation::Write,
        Operation::Seek,
        Operation::Tell,
        Operation::Eof,
        Operation::Size,
        Operation::IsReadable,
        Operation::IsWritable,
        Operation::IsSeekable,
        Operation::Close,
        Operation::Detach,
        Operation::Metadata,
    ];

    /// Name of the stream method.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::Seek => "seek",
            Operation::Tell => "tell",
            Operation::Eof => "eof",
            Operation::Size => "size",
            Operation::IsReadable => "is_readable",
            Operation::IsWritable => "is_writable",
            Operation::IsSeekable => "is_seekable",
            Operation::Close => "close",
            Operation::Detach => "detach",
            Operation::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

type ReadFn = Box<dyn FnMut(usize) -> Result<Vec<u8>>>;
type WriteFn = Box<dyn FnMut(&[u8]) -> Result<usize>>;
type SeekFn = Box<dyn FnMut(SeekFrom) -> Result<()>>;
type TellFn = Box<dyn FnMut() -> Result<u64>>;
type EofFn = Box<dyn FnMut() -> bool>;
type SizeFn = Box<dyn FnMut() -> Option<u64>>;
type CapabilityFn = Box<dyn Fn() -> bool>;
type CloseFn = Box<dyn FnOnce()>;
type DetachFn = Box<dyn FnMut() -> Option<Box<dyn Resource>>>;
type MetadataFn = Box<dyn Fn() -> Metadata>;

/// Set of behaviors of a [`FnStream`](struct.FnStream.html), one optional
/// slot per [`Operation`](enum.Operation.html).
#[derive(Default)]
pub struct Methods {
    read: Option<ReadFn>,
    write: Option<WriteFn>,
    seek: Option<SeekFn>,
    tell: Option<TellFn>,
    eof: Option<EofFn>,
    size: Option<SizeFn>,
    is_readable: Option<CapabilityFn>,
    is_writable: Option<CapabilityFn>,
    is_seekable: Option<CapabilityFn>,
    close: Option<CloseFn>,
    detach: Option<DetachFn>,
    metadata: Option<MetadataFn>,
}

impl Methods {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read<F>(mut self, f: F) -> Self
    where
        F: FnMut(usize) -> Result<Vec<u8>> + 'static,
    {
        self.read = Some(Box::new(f));
        self
    }

    pub fn write<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[u8]) -> Result<usize> + 'static,
    {
        self.write = Some(Box::new(f));
        self
    }

    pub fn seek<F>(mut self, f: F) -> Self
    where
        F: FnMut(SeekFrom) -> Result<()> + 'static,
    {
        self.seek = Some(Box::new(f));
        self
    }

    pub fn tell<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Result<u64> + 'static,
    {
        self.tell = Some(Box::new(f));
        self
    }

    pub fn eof<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> bool + 'static,
    {
        self.eof = Some(Box::new(f));
        self
    }

    pub fn size<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Option<u64> + 'static,
    {
        self.size = Some(Box::new(f));
        self
    }

    pub fn is_readable<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.is_readable = Some(Box::new(f));
        self
    }

    pub fn is_writable<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.is_writable = Some(Box::new(f));
        self
    }

    pub fn is_seekable<F>(mut self, f: F) -> Self
    where
        F: Fn() -> bool + 'static,
    {
        self.is_seekable = Some(Box::new(f));
        self
    }

    /// Behavior run once, when the stream is closed or dropped.
    pub fn close<F>(mut self, f: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        self.close = Some(Box::new(f));
        self
    }

    pub fn detach<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> Option<Box<dyn Resource>> + 'static,
    {
        self.detach = Some(Box::new(f));
        self
    }

    pub fn metadata<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Metadata + 'static,
    {
        self.metadata = Some(Box::new(f));
        self
    }

    /// Whether a behavior is set for `op`.
    pub fn has(&self, op: Operation) -> bool {
        match op {
            Operation::Read => self.read.is_some(),
            Operation::Write => self.write.is_some(),
            Operation::Seek => self.seek.is_some(),
            Operation::Tell => self.tell.is_some(),
            Operation::Eof => self.eof.is_some(),
            Operation::Size => self.size.is_some(),
            Operation::IsReadable => self.is_readable.is_some(),
            Operation::IsWritable => self.is_writable.is_some(),
            Operation::IsSeekable => self.is_seekable.is_some(),
            Operation::Close => self.close.is_some(),
            Operation::Detach => self.detach.is_some(),
            Operation::Metadata => self.metadata.is_some(),
        }
    }

    /// Operations without a behavior, in declaration order.
    pub fn missing(&self) -> Vec<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .filter(|op| !self.has(*op))
            .collect()
    }
}

/// A stream whose behavior is given per operation by closures.
///
/// Operations without a behavior fail when called: fallible operations
/// return [`Error::NotImplemented`](enum.Error.html) and infallible ones
/// panic with the name of the operation. `close` and `detach` are the
/// exception: without a behavior, they only mark the stream closed.
/// [`FnStream::decorate()`](struct.FnStream.html#method.decorate) fills
/// every unset slot with a call to a wrapped stream, which makes it easy
/// to override a single operation of an existing stream.
///
/// The `close` behavior runs at most once, either when the stream is
/// explicitly closed or when it is dropped.
///
/// ## Examples
///
/// ```
/// use byos::{stream_for, FnStream, Methods, Stream};
///
/// let mut stream = FnStream::decorate(
///     stream_for("abc"),
///     Methods::new().size(|| Some(1000)),
/// );
/// assert_eq!(stream.size(), Some(1000));
/// assert_eq!(stream.read(2).unwrap(), b"ab");
/// ```
pub struct FnStream {
    methods: Methods,
    closed: bool,
}

impl FnStream {
    /// A stream with the behaviors of `methods`. Unset slots fail when
    /// called.
    pub fn new(methods: Methods) -> Self {
        FnStream {
            methods,
            closed: false,
        }
    }

    /// A stream with a behavior for every operation.
    ///
    /// Returns [`Error::NotImplemented`](enum.Error.html) with the first
    /// missing operation otherwise.
    pub fn complete(methods: Methods) -> Result<Self> {
        match methods.missing().first() {
            Some(op) => Err(Error::NotImplemented(*op)),
            None => Ok(Self::new(methods)),
        }
    }

    /// Override some operations of `stream` with `methods`. Operations
    /// without a behavior in `methods` are forwarded to `stream`.
    pub fn decorate<S: Stream + 'static>(stream: S, methods: Methods) -> Self {
        let inner = Rc::new(RefCell::new(stream));
        let mut methods = methods;

        if methods.read.is_none() {
            let s = inner.clone();
            methods = methods.read(move |n| s.borrow_mut().read(n));
        }
        if methods.write.is_none() {
            let s = inner.clone();
            methods = methods.write(move |b| s.borrow_mut().write(b));
        }
        if methods.seek.is_none() {
            let s = inner.clone();
            methods = methods.seek(move |pos| s.borrow_mut().seek(pos));
        }
        if methods.tell.is_none() {
            let s = inner.clone();
            methods = methods.tell(move || s.borrow_mut().tell());
        }
        if methods.eof.is_none() {
            let s = inner.clone();
            methods = methods.eof(move || s.borrow_mut().eof());
        }
        if methods.size.is_none() {
            let s = inner.clone();
            methods = methods.size(move || s.borrow_mut().size());
        }
        if methods.is_readable.is_none() {
            let s = inner.clone();
            methods = methods.is_readable(move || s.borrow().is_readable());
        }
        if methods.is_writable.is_none() {
            let s = inner.clone();
            methods = methods.is_writable(move || s.borrow().is_writable());
        }
        if methods.is_seekable.is_none() {
            let s = inner.clone();
            methods = methods.is_seekable(move || s.borrow().is_seekable());
        }
        if methods.close.is_none() {
            let s = inner.clone();
            methods = methods.close(move || s.borrow_mut().close());
        }
        if methods.detach.is_none() {
            let s = inner.clone();
            methods = methods.detach(move || s.borrow_mut().detach());
        }
        if methods.metadata.is_none() {
            methods = methods.metadata(move || inner.borrow().metadata());
        }
        Self::new(methods)
    }

    fn unimplemented(op: Operation) -> ! {
        panic!("{} is not implemented by this stream", op)
    }
}

impl Stream for FnStream {
    fn read(&mut self, length: usize) -> Result<Vec<u8>> {
        if self.closed {
            return Err(Error::Detached);
        }
        match self.methods.read.as_mut() {
            Some(f) => f(length),
            None => Err(Error::NotImplemented(Operation::Read)),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(Error::Detached);
        }
        match self.methods.write.as_mut() {
            Some(f) => f(bytes),
            None => Err(Error::NotImplemented(Operation::Write)),
        }
    }

    fn seek(&mut self, pos: SeekFrom) -> Result<()> {
        if self.closed {
            return Err(Error::Detached);
        }
        match self.methods.seek.as_mut() {
            Some(f) => f(pos),
            None => Err(Error::NotImplemented(Operation::Seek)),
        }
    }

    fn tell(&mut self) -> Result<u64> {
        if self.closed {
            return Err(Error::Detached);
        }
        match self.methods.tell.as_mut() {
            Some(f) => f(),
            None => Err(Error::NotImplemented(Operation::Tell)),
        }
    }

    fn eof(&mut self) -> bool {
        if self.closed {
            return true;
        }
        match self.methods.eof.as_mut() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::Eof),
        }
    }

    fn size(&mut self) -> Option<u64> {
        if self.closed {
            return None;
        }
        match self.methods.size.as_mut() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::Size),
        }
    }

    fn is_readable(&self) -> bool {
        if self.closed {
            return false;
        }
        match self.methods.is_readable.as_ref() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::IsReadable),
        }
    }

    fn is_writable(&self) -> bool {
        if self.closed {
            return false;
        }
        match self.methods.is_writable.as_ref() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::IsWritable),
        }
    }

    fn is_seekable(&self) -> bool {
        if self.closed {
            return false;
        }
        match self.methods.is_seekable.as_ref() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::IsSeekable),
        }
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Some(f) = self.methods.close.take() {
            f()
        }
    }

    fn detach(&mut self) -> Option<Box<dyn Resource>> {
        if self.closed {
            return None;
        }
        let resource = self.methods.detach.as_mut().and_then(|f| f());
        // A detached stream has nothing left to close.
        self.methods.close = None;
        self.closed = true;
        resource
    }

    fn metadata(&self) -> Metadata {
        if self.closed {
            return Metadata::new();
        }
        match self.methods.metadata.as_ref() {
            Some(f) => f(),
            None => Self::unimplemented(Operation::Metadata),
        }
    }
}

impl Drop for FnStream {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Some(f) = self.methods.close.take() {
            self.closed = true;
            f()
        }
    }
}
