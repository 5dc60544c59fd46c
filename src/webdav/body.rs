//! Byte sources for uploads and sinks for downloads.
//!
//! Both come in two flavours. *Owned* streams are opened lazily by a factory
//! when the request actually starts and are closed by the client afterwards
//! (readers are dropped, writers are shut down). *Borrowed* streams belong to
//! the caller: they are only read from or written to and flushed, never
//! closed.

use std::future::{Future, ready};
use std::io;
use std::path::PathBuf;

use bytes::Bytes;
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

pub type DynReader<'a> = Box<dyn AsyncRead + Send + Unpin + 'a>;
pub type DynWriter<'a> = Box<dyn AsyncWrite + Send + Unpin + 'a>;

type OpenReader<'a> = Box<dyn FnOnce() -> BoxFuture<'a, io::Result<DynReader<'a>>> + Send + 'a>;
type OpenWriter<'a> = Box<dyn FnOnce() -> BoxFuture<'a, io::Result<DynWriter<'a>>> + Send + 'a>;

enum Source<'a> {
    Owned(OpenReader<'a>),
    Borrowed(&'a mut (dyn AsyncRead + Send + Unpin)),
}

/// Producer of an upload body.
pub struct StreamSource<'a> {
    inner: Source<'a>,
}

impl<'a> StreamSource<'a> {
    /// Owned source opened by `open` when the upload starts.
    ///
    /// `open` runs on the runtime executing the upload and must not block; use
    /// [`StreamSource::owned_async`] for anything that touches the filesystem or network.
    pub fn owned<F, R>(open: F) -> Self
    where
        F: FnOnce() -> io::Result<R> + Send + 'a,
        R: AsyncRead + Send + Unpin + 'a,
    {
        Self::owned_async(move || ready(open()))
    }

    /// Owned source whose reader is produced by awaiting `open` when the upload starts.
    pub fn owned_async<F, Fut, R>(open: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = io::Result<R>> + Send + 'a,
        R: AsyncRead + Send + Unpin + 'a,
    {
        Self {
            inner: Source::Owned(Box::new(move || {
                async move { open().await.map(|reader| Box::new(reader) as DynReader<'a>) }.boxed()
            })),
        }
    }

    /// Owned source wrapping an already open reader.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'a,
    {
        Self::owned(move || Ok(reader))
    }

    /// Caller-held reader; the client reads it to the end but leaves it open.
    pub fn borrowed<R>(reader: &'a mut R) -> Self
    where
        R: AsyncRead + Send + Unpin,
    {
        Self {
            inner: Source::Borrowed(reader),
        }
    }

    /// Whether the client closes the stream once the upload finishes.
    pub fn closes_after(&self) -> bool {
        matches!(self.inner, Source::Owned(_))
    }

    pub(crate) async fn open(self) -> io::Result<DynReader<'a>> {
        match self.inner {
            Source::Owned(open) => open().await,
            Source::Borrowed(reader) => Ok(Box::new(reader)),
        }
    }
}

impl StreamSource<'static> {
    /// In-memory upload body.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self::from_reader(io::Cursor::new(bytes.into()))
    }

    /// Local file, opened through `tokio::fs` when the upload starts.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::owned_async(move || tokio::fs::File::open(path))
    }
}

enum Sink<'a> {
    Owned(OpenWriter<'a>),
    Borrowed(&'a mut (dyn AsyncWrite + Send + Unpin)),
}

/// Consumer of a download body.
pub struct StreamSink<'a> {
    inner: Sink<'a>,
}

impl<'a> StreamSink<'a> {
    /// Owned sink opened by `open` once a response arrives, shut down after the copy.
    ///
    /// Like [`StreamSource::owned`], `open` must not block.
    pub fn owned<F, W>(open: F) -> Self
    where
        F: FnOnce() -> io::Result<W> + Send + 'a,
        W: AsyncWrite + Send + Unpin + 'a,
    {
        Self::owned_async(move || ready(open()))
    }

    /// Owned sink whose writer is produced by awaiting `open` once a response arrives.
    pub fn owned_async<F, Fut, W>(open: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = io::Result<W>> + Send + 'a,
        W: AsyncWrite + Send + Unpin + 'a,
    {
        Self {
            inner: Sink::Owned(Box::new(move || {
                async move { open().await.map(|writer| Box::new(writer) as DynWriter<'a>) }.boxed()
            })),
        }
    }

    /// Owned sink wrapping an already open writer.
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'a,
    {
        Self::owned(move || Ok(writer))
    }

    /// Caller-held writer; the client writes and flushes it but leaves it open.
    pub fn borrowed<W>(writer: &'a mut W) -> Self
    where
        W: AsyncWrite + Send + Unpin,
    {
        Self {
            inner: Sink::Borrowed(writer),
        }
    }

    /// Whether the client closes the stream once the download finishes.
    pub fn closes_after(&self) -> bool {
        matches!(self.inner, Sink::Owned(_))
    }

    pub(crate) async fn open(self) -> io::Result<OpenSink<'a>> {
        let close_after = self.closes_after();
        let writer = match self.inner {
            Sink::Owned(open) => open().await?,
            Sink::Borrowed(writer) => Box::new(writer),
        };
        Ok(OpenSink {
            writer,
            close_after,
        })
    }
}

impl StreamSink<'static> {
    /// Local file, created (or truncated) through `tokio::fs` when the response arrives.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::owned_async(move || tokio::fs::File::create(path))
    }
}

pub(crate) struct OpenSink<'a> {
    pub(crate) writer: DynWriter<'a>,
    close_after: bool,
}

impl OpenSink<'_> {
    /// Flush, and shut the writer down when the client owns it.
    pub(crate) async fn finish(mut self) -> io::Result<()> {
        if self.close_after {
            self.writer.shutdown().await
        } else {
            self.writer.flush().await
        }
    }
}
