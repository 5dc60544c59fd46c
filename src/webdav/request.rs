use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty, Full};
use hyper::{HeaderMap, Method, Request, Uri, header};

use crate::common::compression::add_accept_encoding;
use crate::common::error::{DavError, Result};
use crate::common::http::DavBody;
use crate::webdav::config::{ClientConfig, Credentials};
use crate::webdav::xml::PROPFIND_RESOURCETYPE_BODY;

/// WebDAV verbs issued by the client, each with its own success classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Propfind,
    Put,
    Get,
    Mkcol,
    Delete,
    Head,
}

impl Verb {
    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Propfind => "PROPFIND",
            Verb::Put => "PUT",
            Verb::Get => "GET",
            Verb::Mkcol => "MKCOL",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
        }
    }

    pub fn method(self) -> Result<Method> {
        match self {
            Verb::Put => Ok(Method::PUT),
            Verb::Get => Ok(Method::GET),
            Verb::Delete => Ok(Method::DELETE),
            Verb::Head => Ok(Method::HEAD),
            Verb::Propfind | Verb::Mkcol => Method::from_bytes(self.as_str().as_bytes())
                .map_err(|e| DavError::invalid(format!("bad method {}: {e}", self.as_str()))),
        }
    }

    /// Whether `status` counts as success for this verb.
    ///
    /// `0` (no response) is never a success.
    pub fn is_success(self, status: u16) -> bool {
        match self {
            Verb::Propfind => status == 207,
            Verb::Put | Verb::Mkcol => matches!(status, 200 | 201),
            Verb::Get | Verb::Head => status == 200,
            Verb::Delete => matches!(status, 200 | 204),
        }
    }

    fn reads_body(self) -> bool {
        matches!(self, Verb::Propfind | Verb::Get)
    }
}

/// A fully composed request, ready to hand to the transport.
#[derive(Debug, Clone)]
pub struct DavRequest {
    pub verb: Verb,
    pub uri: Uri,
    pub headers: HeaderMap,
    /// Fixed body; streamed uploads supply theirs at execution time.
    pub body: Option<Bytes>,
}

impl DavRequest {
    /// Compose a request for `verb` against `uri`, attaching credentials from the snapshot.
    pub fn new(
        config: &ClientConfig,
        credentials: &Credentials,
        verb: Verb,
        uri: Uri,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(auth) = authorization(config, credentials)? {
            headers.insert(header::AUTHORIZATION, auth);
        }
        if verb.reads_body() {
            add_accept_encoding(&mut headers);
        }
        Ok(Self {
            verb,
            uri,
            headers,
            body: None,
        })
    }

    /// `PROPFIND` asking for `resourcetype` one level deep.
    pub fn propfind(config: &ClientConfig, credentials: &Credentials, uri: Uri) -> Result<Self> {
        let mut req = Self::new(config, credentials, Verb::Propfind, uri)?;
        req.headers
            .insert("Depth", header::HeaderValue::from_static("1"));
        req.headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("text/xml; charset=utf-8"),
        );
        req.body = Some(Bytes::from_static(PROPFIND_RESOURCETYPE_BODY.as_bytes()));
        Ok(req)
    }

    /// `PUT` whose body will be streamed by the engine.
    pub fn put(config: &ClientConfig, credentials: &Credentials, uri: Uri) -> Result<Self> {
        let mut req = Self::new(config, credentials, Verb::Put, uri)?;
        req.headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/octet-stream"),
        );
        Ok(req)
    }

    /// Turn the descriptor into a hyper request. `streamed` replaces the fixed body when given.
    pub fn into_http(self, streamed: Option<DavBody>) -> Result<Request<DavBody>> {
        let mut req_builder = Request::builder()
            .method(self.verb.method()?)
            .uri(self.uri);
        for (k, v) in self.headers.iter() {
            req_builder = req_builder.header(k, v);
        }
        let body = streamed.unwrap_or_else(|| fixed_body(self.body));
        req_builder
            .body(body)
            .map_err(|e| DavError::invalid(format!("cannot build request: {e}")))
    }
}

/// Body for requests whose payload is known up front (possibly none).
pub fn fixed_body(body: Option<Bytes>) -> DavBody {
    match body {
        Some(bytes) => Full::new(bytes).map_err(|never| match never {}).boxed_unsync(),
        None => Empty::<Bytes>::new()
            .map_err(|never| match never {})
            .boxed_unsync(),
    }
}

/// Build the `Authorization` header value for a credentials snapshot.
pub fn authorization(
    config: &ClientConfig,
    credentials: &Credentials,
) -> Result<Option<header::HeaderValue>> {
    let raw = match credentials {
        Credentials::Ambient => match config.origin_userinfo() {
            Some((user, pass)) => basic_value(user, pass),
            None => return Ok(None),
        },
        Credentials::Basic { username, password } => basic_value(username, password),
        Credentials::Bearer(token) => format!("Bearer {token}"),
    };

    let mut value = header::HeaderValue::from_str(&raw)
        .map_err(|_| DavError::invalid("credentials contain characters not allowed in a header"))?;
    value.set_sensitive(true);
    Ok(Some(value))
}

fn basic_value(user: &str, pass: &str) -> String {
    let token = format!("{}:{}", user, pass);
    format!("Basic {}", B64.encode(token))
}
