pub mod compression;
pub mod error;
pub mod http;

pub use compression::{
    ContentEncoding, add_accept_encoding, decompress_body, decompress_stream, detect_encodings,
};
pub use error::{DavError, Result};
pub use http::{DavBody, HyperClient, build_hyper_client};
