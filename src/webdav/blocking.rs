//! Blocking front-end built on the callback API.
//!
//! [`wait_for`] turns any callback-style operation into a blocking call: the
//! callback sends into a oneshot channel and the calling thread waits on the
//! receiving end. The client owns its own multi-thread runtime, so the
//! exchange progresses on worker threads while the caller is parked.
//!
//! These calls must not be made from inside an async context; tokio panics
//! when a runtime thread blocks on a channel.

use std::path::{Path, PathBuf};

use tokio::runtime::{Builder, Runtime};
use tokio::sync::oneshot;

use crate::common::error::{DavError, Result};
use crate::webdav::body::{StreamSink, StreamSource};
use crate::webdav::callback::CallbackClient;
use crate::webdav::client::WebDavClient;
use crate::webdav::config::{ClientConfig, Credentials};
use crate::webdav::types::{Existence, Listing, RequestOutcome};

/// Single-use completion handed to a callback-style operation.
#[derive(Debug)]
pub struct Completion<T> {
    tx: oneshot::Sender<T>,
}

impl<T> Completion<T> {
    pub fn complete(self, value: T) {
        // The waiter only goes away if its thread is gone.
        let _ = self.tx.send(value);
    }
}

/// Start an operation and block until its completion fires.
///
/// `start` receives the [`Completion`] and must hand it to exactly one callback. An
/// error returned by `start` is surfaced without waiting. If the completion is dropped
/// without firing (for example because the operation's task panicked), the wait ends with
/// [`DavError::Abandoned`].
pub fn wait_for<T, S>(start: S) -> Result<T>
where
    S: FnOnce(Completion<T>) -> Result<()>,
{
    let (tx, rx) = oneshot::channel();
    start(Completion { tx })?;
    rx.blocking_recv().map_err(|_| DavError::Abandoned)
}

/// Blocking WebDAV client.
///
/// Must be created and dropped outside of any tokio runtime.
pub struct BlockingWebDavClient {
    callbacks: CallbackClient,
    _runtime: Runtime,
}

impl BlockingWebDavClient {
    pub fn new(
        server: &str,
        base_path: &str,
        basic_user: Option<&str>,
        basic_pass: Option<&str>,
    ) -> Result<Self> {
        let mut config = ClientConfig::new(server, base_path)?;
        if let (Some(u), Some(p)) = (basic_user, basic_pass) {
            config = config.with_credentials(Credentials::basic(u, p));
        }
        Self::with_config(config)
    }

    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("webdav-blocking")
            .enable_all()
            .build()?;
        let client = {
            let _guard = runtime.enter();
            WebDavClient::with_config(config)?
        };
        Ok(Self {
            callbacks: CallbackClient::new(client, runtime.handle().clone()),
            _runtime: runtime,
        })
    }

    pub fn client(&self) -> &WebDavClient {
        self.callbacks.client()
    }

    pub fn set_credentials(&self, credentials: Credentials) {
        self.client().set_credentials(credentials);
    }

    pub fn list(&self, directory: &str, relative: bool) -> Result<Listing> {
        wait_for(|done| {
            self.callbacks
                .list(directory, relative, move |res| done.complete(res))
        })?
    }

    pub fn upload(
        &self,
        source: StreamSource<'static>,
        destination: &str,
    ) -> Result<RequestOutcome> {
        wait_for(|done| {
            self.callbacks
                .upload(source, destination, move |res| done.complete(res))
        })
    }

    pub fn download(&self, source: &str, sink: StreamSink<'static>) -> Result<RequestOutcome> {
        wait_for(|done| {
            self.callbacks
                .download(source, sink, move |res| done.complete(res))
        })
    }

    pub fn create_directory(&self, path: &str) -> Result<RequestOutcome> {
        wait_for(|done| {
            self.callbacks
                .create_directory(path, move |res| done.complete(res))
        })
    }

    pub fn delete(&self, path: &str) -> Result<RequestOutcome> {
        wait_for(|done| self.callbacks.delete(path, move |res| done.complete(res)))
    }

    pub fn exists(&self, path: &str) -> Result<Existence> {
        wait_for(|done| self.callbacks.exists(path, move |res| done.complete(res)))
    }

    pub fn upload_file(&self, local: impl AsRef<Path>, destination: &str) -> Result<RequestOutcome> {
        let local: PathBuf = local.as_ref().to_path_buf();
        self.upload(StreamSource::file(local), destination)
    }

    pub fn download_file(&self, source: &str, local: impl AsRef<Path>) -> Result<RequestOutcome> {
        let local: PathBuf = local.as_ref().to_path_buf();
        self.download(source, StreamSink::file(local))
    }
}
