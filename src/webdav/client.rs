use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::SinkExt;
use futures::channel::mpsc;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Frame, Incoming};
use hyper::{Response, Uri};
use tokio::io::AsyncReadExt;

use crate::common::compression::{decompress_body, decompress_stream, detect_encodings};
use crate::common::error::{DavError, Result};
use crate::common::http::{DavBody, HyperClient, build_hyper_client};
use crate::webdav::body::{DynReader, StreamSink, StreamSource};
use crate::webdav::config::{ClientConfig, Credentials};
use crate::webdav::request::{DavRequest, Verb};
use crate::webdav::types::{Existence, Listing, RequestOutcome};
use crate::webdav::xml::{ListingScope, parse_listing};

/// Size of the chunks read from an upload source.
const UPLOAD_CHUNK: usize = 64 * 1024;
/// Chunks buffered between the source reader and the request body.
const UPLOAD_QUEUE_DEPTH: usize = 4;

/// Asynchronous WebDAV client.
///
/// Every verb resolves its target, builds its request (snapshotting the current
/// credentials), executes it and classifies the status. Transport failures and
/// rejected statuses both come back as a [`RequestOutcome`]; `Err` is reserved for
/// bad arguments and unparseable listings.
///
/// Cloning is cheap and yields a handle to the same client, including its credentials.
#[derive(Clone, Debug)]
pub struct WebDavClient {
    config: Arc<ClientConfig>,
    client: HyperClient,
}

impl WebDavClient {
    /// Create a new client for `server` (`scheme://host[:port]`) rooted at `base_path`,
    /// with optional **Basic** credentials.
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
        Ok(Self::with_transport(config, build_hyper_client()?))
    }

    /// Use a caller-built hyper client as transport.
    pub fn with_transport(config: ClientConfig, client: HyperClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Credentials the next operation will use.
    pub fn credentials(&self) -> Credentials {
        self.config.credentials()
    }

    /// Swap the identity used by subsequent operations.
    ///
    /// Requests already built keep the credentials they were built with. Changing
    /// credentials while operations are in flight is the caller's concern.
    pub fn set_credentials(&self, credentials: Credentials) {
        self.config.set_credentials(credentials);
    }

    /// Resolve `path` against the server and base path.
    pub fn resolve(&self, path: &str, collection: bool) -> Result<Uri> {
        self.config.resolve(path, collection)
    }

    /// Scope used to rewrite a listing of `directory` relative to the base path.
    pub fn listing_scope(&self, directory: &str) -> ListingScope {
        ListingScope::new(self.config.origin(), self.config.base_path(), directory)
    }

    // ----------- Request builders -----------

    pub fn build_list(&self, directory: &str) -> Result<DavRequest> {
        let uri = self.resolve(directory, true)?;
        DavRequest::propfind(&self.config, &self.credentials(), uri)
    }

    pub fn build_upload(&self, destination: &str) -> Result<DavRequest> {
        let uri = self.resolve(require_target(destination, "destination path")?, false)?;
        DavRequest::put(&self.config, &self.credentials(), uri)
    }

    pub fn build_download(&self, source: &str) -> Result<DavRequest> {
        let uri = self.resolve(require_target(source, "source path")?, false)?;
        DavRequest::new(&self.config, &self.credentials(), Verb::Get, uri)
    }

    pub fn build_create_directory(&self, path: &str) -> Result<DavRequest> {
        let uri = self.resolve(require_target(path, "directory path")?, true)?;
        DavRequest::new(&self.config, &self.credentials(), Verb::Mkcol, uri)
    }

    /// A path ending in `/` is deleted as a collection, anything else as a plain resource.
    pub fn build_delete(&self, path: &str) -> Result<DavRequest> {
        let target = require_target(path, "path")?;
        let uri = self.resolve(target, target.ends_with('/'))?;
        DavRequest::new(&self.config, &self.credentials(), Verb::Delete, uri)
    }

    /// `"/"` probes the base collection; an empty or blank path is rejected.
    pub fn build_exists(&self, path: &str) -> Result<DavRequest> {
        if path.trim().is_empty() {
            return Err(DavError::invalid("path must not be empty"));
        }
        let uri = self.resolve(path, false)?;
        DavRequest::new(&self.config, &self.credentials(), Verb::Head, uri)
    }

    // ----------- Verbs -----------

    /// List the members of `directory` (`PROPFIND`, `Depth: 1`).
    ///
    /// With `relative` set, entries are rewritten relative to the base path and the
    /// directory's own entry is dropped. Otherwise every decoded `href` is returned.
    pub async fn list(&self, directory: &str, relative: bool) -> Result<Listing> {
        let req = self.build_list(directory)?;
        let scope = relative.then(|| self.listing_scope(directory));
        self.execute_list(req, scope).await
    }

    /// Upload `source` to `destination` (`PUT`), streaming the body.
    pub async fn upload(
        &self,
        source: StreamSource<'_>,
        destination: &str,
    ) -> Result<RequestOutcome> {
        let req = self.build_upload(destination)?;
        Ok(self.execute_upload(req, source).await)
    }

    /// Download `source` (`GET`) into `sink`.
    ///
    /// Whatever body the server sends is copied, even for error statuses; check the
    /// outcome to tell content from an error page.
    pub async fn download(&self, source: &str, sink: StreamSink<'_>) -> Result<RequestOutcome> {
        let req = self.build_download(source)?;
        Ok(self.execute_download(req, sink).await)
    }

    /// Create a collection (`MKCOL`).
    pub async fn create_directory(&self, path: &str) -> Result<RequestOutcome> {
        let req = self.build_create_directory(path)?;
        Ok(self.execute(req).await)
    }

    /// Delete a resource or collection (`DELETE`).
    pub async fn delete(&self, path: &str) -> Result<RequestOutcome> {
        let req = self.build_delete(path)?;
        Ok(self.execute(req).await)
    }

    /// Probe a resource (`HEAD`).
    pub async fn exists(&self, path: &str) -> Result<Existence> {
        let req = self.build_exists(path)?;
        Ok(Existence::from_outcome(self.execute(req).await))
    }

    /// Upload a local file.
    pub async fn upload_file(
        &self,
        local: impl AsRef<Path>,
        destination: &str,
    ) -> Result<RequestOutcome> {
        self.upload(StreamSource::file(local.as_ref()), destination)
            .await
    }

    /// Download into a local file, creating or truncating it.
    pub async fn download_file(
        &self,
        source: &str,
        local: impl AsRef<Path>,
    ) -> Result<RequestOutcome> {
        self.download(source, StreamSink::file(local.as_ref())).await
    }

    // ----------- Execution -----------

    async fn round_trip(
        &self,
        req: DavRequest,
        streamed: Option<DavBody>,
    ) -> Option<Response<Incoming>> {
        let verb = req.verb;
        let uri = req.uri.clone();
        tracing::debug!(verb = verb.as_str(), %uri, "sending request");

        let request = match req.into_http(streamed) {
            Ok(r) => r,
            Err(err) => {
                tracing::warn!(verb = verb.as_str(), %uri, error = %err, "request rejected");
                return None;
            }
        };

        match self.client.request(request).await {
            Ok(resp) => {
                tracing::debug!(
                    verb = verb.as_str(),
                    %uri,
                    status = resp.status().as_u16(),
                    "response received"
                );
                Some(resp)
            }
            Err(err) => {
                tracing::warn!(verb = verb.as_str(), %uri, error = %err, "transport failure");
                None
            }
        }
    }

    /// Execute a request with a fixed (or no) body and classify its status.
    pub(crate) async fn execute(&self, req: DavRequest) -> RequestOutcome {
        let verb = req.verb;
        match self.round_trip(req, None).await {
            Some(resp) => RequestOutcome::classify(verb, resp.status().as_u16()),
            None => RequestOutcome::no_response(),
        }
    }

    pub(crate) async fn execute_list(
        &self,
        req: DavRequest,
        scope: Option<ListingScope>,
    ) -> Result<Listing> {
        let Some(resp) = self.round_trip(req, None).await else {
            return Ok(Listing {
                outcome: RequestOutcome::no_response(),
                entries: Vec::new(),
            });
        };

        let mut outcome = RequestOutcome::classify(Verb::Propfind, resp.status().as_u16());
        if !outcome.success {
            return Ok(Listing {
                outcome,
                entries: Vec::new(),
            });
        }

        let encodings = detect_encodings(resp.headers());
        let body = match decompress_body(resp.into_body(), &encodings).await {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read listing body");
                outcome.success = false;
                return Ok(Listing {
                    outcome,
                    entries: Vec::new(),
                });
            }
        };

        let entries = parse_listing(&body, scope.as_ref()).inspect_err(|err| {
            tracing::warn!(error = %err, "unparseable multistatus body");
        })?;
        Ok(Listing { outcome, entries })
    }

    pub(crate) async fn execute_upload(
        &self,
        req: DavRequest,
        source: StreamSource<'_>,
    ) -> RequestOutcome {
        let reader = match source.open().await {
            Ok(reader) => reader,
            Err(err) => {
                tracing::warn!(uri = %req.uri, error = %err, "failed to open upload source");
                return RequestOutcome::no_response();
            }
        };

        let (tx, rx) = mpsc::channel(UPLOAD_QUEUE_DEPTH);
        let body = StreamBody::new(rx).boxed_unsync();
        let (response, pumped) =
            tokio::join!(self.round_trip(req, Some(body)), pump_body(reader, tx));

        let Some(resp) = response else {
            return RequestOutcome::no_response();
        };
        let mut outcome = RequestOutcome::classify(Verb::Put, resp.status().as_u16());
        match pumped {
            Ok(sent) => tracing::debug!(bytes = sent, "upload body sent"),
            Err(err) => {
                tracing::warn!(error = %err, "upload body was not fully sent");
                outcome.success = false;
            }
        }
        outcome
    }

    pub(crate) async fn execute_download(
        &self,
        req: DavRequest,
        sink: StreamSink<'_>,
    ) -> RequestOutcome {
        let Some(resp) = self.round_trip(req, None).await else {
            return RequestOutcome::no_response();
        };

        let mut outcome = RequestOutcome::classify(Verb::Get, resp.status().as_u16());
        let encodings = detect_encodings(resp.headers());
        let mut reader = decompress_stream(resp.into_body(), &encodings);

        let copied = async {
            let mut sink = sink.open().await?;
            let written = tokio::io::copy_buf(&mut reader, &mut sink.writer).await?;
            sink.finish().await?;
            Ok::<_, io::Error>(written)
        }
        .await;

        match copied {
            Ok(written) => tracing::debug!(bytes = written, "download body received"),
            Err(err) => {
                tracing::warn!(error = %err, "download body was not fully written");
                outcome.success = false;
            }
        }
        outcome
    }
}

/// Feed `reader` into the request body channel chunk by chunk.
///
/// Read errors are forwarded into the body so the transport aborts the request.
async fn pump_body(
    mut reader: DynReader<'_>,
    mut tx: mpsc::Sender<io::Result<Frame<Bytes>>>,
) -> io::Result<u64> {
    let mut sent = 0u64;
    loop {
        let mut chunk = BytesMut::with_capacity(UPLOAD_CHUNK);
        match reader.read_buf(&mut chunk).await {
            Ok(0) => return Ok(sent),
            Ok(n) => {
                sent += n as u64;
                if tx.send(Ok(Frame::data(chunk.freeze()))).await.is_err() {
                    return Err(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "request body closed by the transport",
                    ));
                }
            }
            Err(err) => {
                let _ = tx.send(Err(io::Error::new(err.kind(), err.to_string()))).await;
                return Err(err);
            }
        }
    }
}

fn require_target<'p>(path: &'p str, what: &str) -> Result<&'p str> {
    if path.trim().trim_matches('/').is_empty() {
        return Err(DavError::invalid(format!("{what} must not be empty")));
    }
    Ok(path)
}
