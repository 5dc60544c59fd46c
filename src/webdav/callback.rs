//! Callback-style front-end over [`WebDavClient`].
//!
//! Each verb validates its arguments and builds its request on the calling
//! thread, then schedules the exchange on a tokio runtime and returns. The
//! completion callback runs exactly once, on a runtime worker.

use tokio::runtime::Handle;

use crate::common::error::Result;
use crate::webdav::body::{StreamSink, StreamSource};
use crate::webdav::client::WebDavClient;
use crate::webdav::types::{Existence, Listing, RequestOutcome};

/// Schedules [`WebDavClient`] operations on a runtime and reports through callbacks.
#[derive(Clone, Debug)]
pub struct CallbackClient {
    client: WebDavClient,
    handle: Handle,
}

impl CallbackClient {
    pub fn new(client: WebDavClient, handle: Handle) -> Self {
        Self { client, handle }
    }

    /// Use the runtime the caller is currently running on.
    ///
    /// Fails with [`DavError::NoRuntime`](crate::DavError::NoRuntime) outside of a runtime
    /// context.
    pub fn from_current(client: WebDavClient) -> Result<Self> {
        Ok(Self::new(client, Handle::try_current()?))
    }

    pub fn client(&self) -> &WebDavClient {
        &self.client
    }

    pub fn list<F>(&self, directory: &str, relative: bool, on_done: F) -> Result<()>
    where
        F: FnOnce(Result<Listing>) + Send + 'static,
    {
        let req = self.client.build_list(directory)?;
        let scope = relative.then(|| self.client.listing_scope(directory));
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(client.execute_list(req, scope).await);
        });
        Ok(())
    }

    pub fn upload<F>(
        &self,
        source: StreamSource<'static>,
        destination: &str,
        on_done: F,
    ) -> Result<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let req = self.client.build_upload(destination)?;
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(client.execute_upload(req, source).await);
        });
        Ok(())
    }

    pub fn download<F>(&self, source: &str, sink: StreamSink<'static>, on_done: F) -> Result<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let req = self.client.build_download(source)?;
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(client.execute_download(req, sink).await);
        });
        Ok(())
    }

    pub fn create_directory<F>(&self, path: &str, on_done: F) -> Result<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let req = self.client.build_create_directory(path)?;
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(client.execute(req).await);
        });
        Ok(())
    }

    pub fn delete<F>(&self, path: &str, on_done: F) -> Result<()>
    where
        F: FnOnce(RequestOutcome) + Send + 'static,
    {
        let req = self.client.build_delete(path)?;
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(client.execute(req).await);
        });
        Ok(())
    }

    pub fn exists<F>(&self, path: &str, on_done: F) -> Result<()>
    where
        F: FnOnce(Existence) + Send + 'static,
    {
        let req = self.client.build_exists(path)?;
        let client = self.client.clone();
        self.handle.spawn(async move {
            on_done(Existence::from_outcome(client.execute(req).await));
        });
        Ok(())
    }
}
