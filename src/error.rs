//! Error types for crawlwire.

use thiserror::Error;

/// Main error type for all crawlwire operations.
#[derive(Debug, Error)]
pub enum CrawlwireError {
    /// The request URL carries no scheme after normalization.
    #[error("missing scheme in request url: {0}")]
    MissingScheme(String),

    /// The declared encoding label is not a known codec.
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),

    /// The no-callback sentinel was asked to produce a handler.
    #[error(
        "the no-callback sentinel was dispatched; it marks requests whose \
         result is never meant to reach a callback"
    )]
    NoCallbackInvoked,

    /// No handler registered under the given name.
    #[error("handler not found for name: {0}")]
    HandlerNotFound(String),

    /// A live handler could not be matched back to a registered name
    /// during serialization.
    #[error("handler {handler} is not registered in {registry}")]
    HandlerNotResolvable {
        /// Description of the unmatched handler.
        handler: String,
        /// Description of the registry that was searched.
        registry: String,
    },

    /// A serialized request carries a `_class` tag this crate does not know.
    #[error("unknown request class tag: {0}")]
    UnknownRequestClass(String),

    /// The curl command parser reported a problem (malformed command,
    /// missing URL, or an unknown option in strict mode).
    #[error("curl command error: {0}")]
    Curl(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// MsgPack serialization error.
    #[error("MsgPack encode error: {0}")]
    MsgPackEncode(#[from] rmp_serde::encode::Error),

    /// MsgPack deserialization error.
    #[error("MsgPack decode error: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),
}

/// Result type alias using CrawlwireError.
pub type Result<T> = std::result::Result<T, CrawlwireError>;
