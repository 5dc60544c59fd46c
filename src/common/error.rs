//! Error type shared by every client front-end.
//!
//! Transport and protocol failures are not represented here; they are folded
//! into [`RequestOutcome`](crate::webdav::RequestOutcome), with status `0`
//! meaning no response was received.

use thiserror::Error;

/// Errors surfaced by the WebDAV client.
#[derive(Debug, Error)]
pub enum DavError {
    /// A required identifier (server, base path, resource path) was missing or unusable.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A `207 Multi-Status` body could not be parsed.
    #[error("multistatus parse error: {0}")]
    Parse(String),

    /// The runtime backing the blocking client could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[from] std::io::Error),

    /// The callback front-end was created outside of any tokio runtime.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    /// An operation finished without delivering its completion.
    #[error("operation ended without delivering a result")]
    Abandoned,
}

impl DavError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DavError>;
