//! Codec module - persistence encodings for request dicts.
//!
//! A [`crate::dict::RequestDict`] is a plain serde value; these codecs turn
//! it into bytes for queue storage or inter-process transfer:
//!
//! - [`MsgPackCodec`] - compact binary via `rmp-serde` (struct-as-map, so
//!   non-Rust pipeline consumers see field names)
//! - [`JsonCodec`] - human-readable JSON via `serde_json`
//!
//! # Design
//!
//! Codecs are marker structs with static methods rather than trait objects,
//! which keeps codec selection a compile-time choice.
//!
//! # Example
//!
//! ```
//! use crawlwire::codec::{JsonCodec, MsgPackCodec};
//! use crawlwire::request::Request;
//!
//! let dict = Request::get("http://example.com/").unwrap().to_dict(None).unwrap();
//!
//! let packed = MsgPackCodec::encode(&dict).unwrap();
//! let restored: crawlwire::RequestDict = MsgPackCodec::decode(&packed).unwrap();
//! assert_eq!(dict, restored);
//!
//! let json = JsonCodec::encode(&dict).unwrap();
//! let restored: crawlwire::RequestDict = JsonCodec::decode(&json).unwrap();
//! assert_eq!(dict, restored);
//! ```

mod json;
mod msgpack;

pub use json::JsonCodec;
pub use msgpack::MsgPackCodec;
