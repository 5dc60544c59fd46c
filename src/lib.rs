//! WebDAV client library for Rust.
//!
//! This library provides an asynchronous WebDAV (RFC 4918) client built on hyper 1.x,
//! rustls and tokio, with a callback front-end and a blocking front-end layered on the
//! same engine.
//!
//! # Features
//!
//! - Directory listing through `PROPFIND` with namespace-aware multistatus parsing
//! - Streaming uploads (`PUT`) and downloads (`GET`) from/to any tokio reader or writer
//! - Collection creation (`MKCOL`), deletion and existence probes (`HEAD`)
//! - Transparent response decompression (br/zstd/gzip)
//! - Swappable credentials (Basic, Bearer, or userinfo embedded in the server origin)
//! - Async, callback and blocking APIs with identical semantics
//!
//! Every completed operation yields a [`RequestOutcome`]: `success` follows the verb's
//! status contract (`PROPFIND` 207, `PUT`/`MKCOL` 200 or 201, `GET`/`HEAD` 200,
//! `DELETE` 200 or 204) and `status` is the HTTP status, or `0` when no response was
//! received. Only argument errors and unparseable listings are reported as [`DavError`].
//!
//! # Examples
//!
//! ## Async
//!
//! ```no_run
//! use fast_webdav::{StreamSink, StreamSource, WebDavClient};
//!
//! #[tokio::main]
//! async fn main() -> fast_webdav::Result<()> {
//!     let client = WebDavClient::new(
//!         "https://dav.example.com",
//!         "/remote.php/webdav/",
//!         Some("username"),
//!         Some("password"),
//!     )?;
//!
//!     let created = client.create_directory("reports").await?;
//!     println!("MKCOL -> {}", created.status);
//!
//!     let outcome = client
//!         .upload(StreamSource::from_bytes("hello"), "reports/hello.txt")
//!         .await?;
//!     assert!(outcome.success);
//!
//!     let listing = client.list("reports", true).await?;
//!     for entry in &listing.entries {
//!         println!("{entry}");
//!     }
//!
//!     let mut buf = Vec::new();
//!     client
//!         .download("reports/hello.txt", StreamSink::borrowed(&mut buf))
//!         .await?;
//!     assert_eq!(buf, b"hello");
//!
//!     client.delete("reports/").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Blocking
//!
//! ```no_run
//! use fast_webdav::BlockingWebDavClient;
//!
//! fn main() -> fast_webdav::Result<()> {
//!     let client = BlockingWebDavClient::new("http://localhost:8080", "/dav/", None, None)?;
//!
//!     if client.exists("notes.txt")?.exists() {
//!         client.download_file("notes.txt", "/tmp/notes.txt")?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Callbacks
//!
//! ```no_run
//! use fast_webdav::{CallbackClient, WebDavClient};
//!
//! # async fn example(client: WebDavClient) -> fast_webdav::Result<()> {
//! let callbacks = CallbackClient::from_current(client)?;
//! callbacks.exists("notes.txt", |existence| {
//!     println!("notes.txt: {existence:?}");
//! })?;
//! # Ok(())
//! # }
//! ```
pub mod common;
pub mod webdav;

pub use common::compression::{ContentEncoding, detect_encodings};
pub use common::error::{DavError, Result};
pub use webdav::{
    BlockingWebDavClient, CallbackClient, ClientConfig, Credentials, DavRequest, Existence,
    Listing, ListingScope, RequestOutcome, StreamSink, StreamSource, Verb, WebDavClient,
    parse_listing, parse_multistatus_hrefs,
};
