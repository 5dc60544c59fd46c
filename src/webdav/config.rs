//! Client configuration and URI resolution.
//!
//! A [`ClientConfig`] pins a server origin and a base path. Every operation
//! addresses `origin + base path + resource path`, where the resource path is
//! whatever the caller passed with surrounding `/` trimmed.

use std::fmt;
use std::sync::{Arc, RwLock};

use hyper::Uri;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::common::error::{DavError, Result};

/// Characters escaped when a raw path is placed into a request URI. `/` is kept.
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Identity presented to the server.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Credentials {
    /// No explicit credentials. Userinfo embedded in the server origin is sent as
    /// Basic auth; otherwise nothing is attached.
    #[default]
    Ambient,
    Basic {
        username: String,
        password: String,
    },
    Bearer(String),
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self, Self::Ambient)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ambient => f.write_str("Ambient"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

/// Server origin, base path and credentials for one client.
///
/// Origin and base path are fixed at construction. Credentials sit behind a lock and may be
/// swapped between calls; a client and every clone of it share that lock. Cloning the
/// config itself copies the current credentials into a fresh lock.
#[derive(Debug)]
pub struct ClientConfig {
    origin: String,
    base_path: String,
    origin_userinfo: Option<(String, String)>,
    credentials: Arc<RwLock<Credentials>>,
}

impl Clone for ClientConfig {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin.clone(),
            base_path: self.base_path.clone(),
            origin_userinfo: self.origin_userinfo.clone(),
            credentials: Arc::new(RwLock::new(self.credentials())),
        }
    }
}

impl ClientConfig {
    /// Create a configuration from a server origin (`scheme://host[:port]`) and a base path.
    ///
    /// The base path is normalized to start and end with `/`; `"/"` addresses the server root.
    /// Fails with [`DavError::InvalidArgument`] when either value is empty, the server is not an
    /// `http`/`https` origin, or the server carries a path or query of its own.
    pub fn new(server: &str, base_path: &str) -> Result<Self> {
        let server = server.trim();
        if server.is_empty() {
            return Err(DavError::invalid("server must not be empty"));
        }
        if base_path.trim().is_empty() {
            return Err(DavError::invalid("base path must not be empty"));
        }

        let uri: Uri = server
            .parse()
            .map_err(|e| DavError::invalid(format!("invalid server {server:?}: {e}")))?;

        let scheme = match uri.scheme_str() {
            Some(s) if s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https") => {
                s.to_ascii_lowercase()
            }
            Some(other) => {
                return Err(DavError::invalid(format!(
                    "unsupported scheme {other:?} in server {server:?}"
                )));
            }
            None => {
                return Err(DavError::invalid(format!(
                    "server {server:?} must include a scheme"
                )));
            }
        };
        let Some(authority) = uri.authority() else {
            return Err(DavError::invalid(format!(
                "server {server:?} must include a host"
            )));
        };
        if uri.query().is_some() || !matches!(uri.path(), "" | "/") {
            return Err(DavError::invalid(format!(
                "server {server:?} must be an origin; put paths in the base path"
            )));
        }

        let origin = match authority.port_u16() {
            Some(port) => format!("{scheme}://{}:{port}", authority.host()),
            None => format!("{scheme}://{}", authority.host()),
        };

        let origin_userinfo = authority
            .as_str()
            .rsplit_once('@')
            .map(|(userinfo, _)| {
                let (user, pass) = userinfo.split_once(':').unwrap_or((userinfo, ""));
                (decode(user), decode(pass))
            });

        let trimmed = base_path.trim().trim_matches('/');
        let base_path = if trimmed.is_empty() {
            "/".to_string()
        } else {
            format!("/{trimmed}/")
        };

        Ok(Self {
            origin,
            base_path,
            origin_userinfo,
            credentials: Arc::new(RwLock::new(Credentials::Ambient)),
        })
    }

    pub fn with_credentials(self, credentials: Credentials) -> Self {
        self.set_credentials(credentials);
        self
    }

    /// `scheme://host[:port]` without userinfo or trailing slash.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Normalized, unencoded base path (always starts and ends with `/`).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Credentials the next request will be built with.
    pub fn credentials(&self) -> Credentials {
        match self.credentials.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Swap the identity used by requests built from now on.
    pub fn set_credentials(&self, credentials: Credentials) {
        match self.credentials.write() {
            Ok(mut guard) => *guard = credentials,
            Err(poisoned) => *poisoned.into_inner() = credentials,
        }
    }

    pub(crate) fn origin_userinfo(&self) -> Option<(&str, &str)> {
        self.origin_userinfo
            .as_ref()
            .map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Resolve a client-relative path into an absolute URI.
    ///
    /// Leading and trailing `/` are trimmed from `path`; a single trailing `/` is appended when
    /// `collection` is set. An empty path resolves to the base path itself.
    pub fn resolve(&self, path: &str, collection: bool) -> Result<Uri> {
        let trimmed = path.trim_matches('/');

        let mut target = String::with_capacity(
            self.origin.len() + self.base_path.len() + trimmed.len() + 1,
        );
        target.push_str(&self.origin);
        target.extend(utf8_percent_encode(&self.base_path, PATH_ESCAPE));
        target.extend(utf8_percent_encode(trimmed, PATH_ESCAPE));
        if collection && !trimmed.is_empty() {
            target.push('/');
        }

        target
            .parse()
            .map_err(|e| DavError::invalid(format!("cannot build URI for {path:?}: {e}")))
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}
