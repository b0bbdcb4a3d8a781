//! Handler module - callback variants and the name-keyed registry.
//!
//! Provides:
//! - [`Callback`] - what should happen to a request's result: the
//!   pipeline default, the no-callback sentinel, a stable handler name, or
//!   a live handler
//! - [`HandlerRegistry`] - maps stable names to handlers so callbacks can
//!   be serialized to names and restored to handlers
//!
//! # Example
//!
//! ```
//! use crawlwire::handler::{Callback, HandlerRegistry};
//!
//! let mut registry = HandlerRegistry::new();
//! let parse = registry.register("parse", |_payload| Ok(()));
//!
//! let callback = Callback::Handler(parse);
//! let handler = callback.resolve(Some(&registry)).unwrap().unwrap();
//! handler(b"page bytes").unwrap();
//!
//! // The sentinel refuses to produce a handler at all.
//! assert!(Callback::NoCallback.resolve(Some(&registry)).is_err());
//! ```

mod registry;

pub use registry::HandlerRegistry;

use std::fmt;
use std::sync::Arc;

use crate::error::{CrawlwireError, Result};

/// Result type for handler functions.
pub type HandlerResult = Result<()>;

/// Object-safe handler trait, blanket-implemented for any matching closure.
pub trait Handler: Fn(&[u8]) -> HandlerResult + Send + Sync {}

impl<T: Fn(&[u8]) -> HandlerResult + Send + Sync> Handler for T {}

impl fmt::Debug for dyn Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<handler>")
    }
}

/// A dispatchable handler over the raw result payload.
pub type HandlerFn = Arc<dyn Handler>;

/// What should handle a request's result.
///
/// `Default` and `NoCallback` are distinct on purpose: the former defers to
/// the pipeline's default handler, the latter declares that no handler is
/// ever meant to run (internally issued requests), and asking it for one
/// is an error.
#[derive(Clone, Default)]
pub enum Callback {
    /// Use the pipeline's default handler.
    #[default]
    Default,
    /// No handler is ever expected to run for this request.
    NoCallback,
    /// A stable handler name, resolvable through a [`HandlerRegistry`].
    Named(String),
    /// A live handler.
    Handler(HandlerFn),
}

impl Callback {
    /// Whether this is the pipeline-default marker.
    pub fn is_default(&self) -> bool {
        matches!(self, Callback::Default)
    }

    /// Whether this is the no-callback sentinel.
    pub fn is_no_callback(&self) -> bool {
        matches!(self, Callback::NoCallback)
    }

    /// Resolve to a dispatchable handler.
    ///
    /// Returns `Ok(None)` for [`Callback::Default`] - the caller supplies
    /// its own default handler in that case.
    ///
    /// # Errors
    ///
    /// - [`CrawlwireError::NoCallbackInvoked`] for the sentinel; requests
    ///   carrying it must never reach dispatch.
    /// - [`CrawlwireError::HandlerNotFound`] for a name missing from the
    ///   registry, or any name when no registry is supplied.
    pub fn resolve(&self, registry: Option<&HandlerRegistry>) -> Result<Option<HandlerFn>> {
        match self {
            Callback::Default => Ok(None),
            Callback::NoCallback => Err(CrawlwireError::NoCallbackInvoked),
            Callback::Named(name) => registry
                .and_then(|r| r.get(name))
                .map(Some)
                .ok_or_else(|| CrawlwireError::HandlerNotFound(name.clone())),
            Callback::Handler(handler) => Ok(Some(handler.clone())),
        }
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::Default => write!(f, "Default"),
            Callback::NoCallback => write!(f, "NoCallback"),
            Callback::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Callback::Handler(handler) => {
                write!(f, "Handler({:p})", Arc::as_ptr(handler))
            }
        }
    }
}

impl PartialEq for Callback {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callback::Default, Callback::Default) => true,
            (Callback::NoCallback, Callback::NoCallback) => true,
            (Callback::Named(a), Callback::Named(b)) => a == b,
            // Live handlers compare by identity: a new wrapper around the
            // same closure is a different handler.
            (Callback::Handler(a), Callback::Handler(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<HandlerFn> for Callback {
    fn from(handler: HandlerFn) -> Self {
        Callback::Handler(handler)
    }
}

impl From<&str> for Callback {
    fn from(name: &str) -> Self {
        Callback::Named(name.to_string())
    }
}

impl From<String> for Callback {
    fn from(name: String) -> Self {
        Callback::Named(name)
    }
}
