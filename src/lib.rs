//! # crawlwire
//!
//! Canonical representation of an outbound HTTP request inside a crawling
//! pipeline: a validated, largely immutable descriptor that schedulers,
//! downloaders and duplicate filters can pass around, clone with
//! modifications, and serialize losslessly for persistence or
//! inter-process transfer.
//!
//! Network I/O is deliberately absent - fetching belongs to a downloader
//! collaborator. This crate owns the construction and round-tripping
//! contract: URL canonicalization, binary-safe bodies, copy-on-write
//! `replace`, and a dict format that resolves callbacks to stable names
//! and back.
//!
//! ## Example
//!
//! ```
//! use crawlwire::codec::MsgPackCodec;
//! use crawlwire::handler::{Callback, HandlerRegistry};
//! use crawlwire::request::Request;
//!
//! // Pipeline setup: register handlers under stable names.
//! let mut registry = HandlerRegistry::new();
//! let parse = registry.register("parse", |_payload| Ok(()));
//!
//! let request = Request::builder("http://example.com/page#!ref=home")
//!     .callback(Callback::Handler(parse))
//!     .header("Accept", "text/html")
//!     .priority(10)
//!     .build()
//!     .unwrap();
//!
//! // Persist through the dict format and restore an equivalent request.
//! let bytes = MsgPackCodec::encode(&request.to_dict(Some(&registry)).unwrap()).unwrap();
//! let restored = Request::from_dict(MsgPackCodec::decode(&bytes).unwrap(), Some(&registry)).unwrap();
//! assert_eq!(restored, request);
//! ```

pub mod codec;
pub mod curl;
pub mod dict;
pub mod encoding;
pub mod error;
pub mod handler;
pub mod headers;
pub mod request;
pub mod url;

pub use dict::{CallbackSpec, RequestDict};
pub use error::{CrawlwireError, Result};
pub use handler::{Callback, HandlerFn, HandlerRegistry};
pub use headers::Headers;
pub use request::{Body, Cookies, Request, RequestBuilder};
