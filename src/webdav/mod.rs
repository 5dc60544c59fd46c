pub mod blocking;
pub mod body;
pub mod callback;
pub mod client;
pub mod config;
pub mod request;
pub mod types;
pub mod xml;

pub use blocking::{BlockingWebDavClient, Completion, wait_for};
pub use body::{StreamSink, StreamSource};
pub use callback::CallbackClient;
pub use client::WebDavClient;
pub use config::{ClientConfig, Credentials};
pub use request::{DavRequest, Verb};
pub use types::{Existence, Listing, RequestOutcome};
pub use xml::{
    ListingScope, PROPFIND_RESOURCETYPE_BODY, parse_listing, parse_multistatus_hrefs,
    parse_multistatus_hrefs_visit,
};
