//! Handler registry mapping stable names to handlers.
//!
//! Serialization needs to turn a live handler back into a stable name and a
//! restored name back into a live handler. Each pipeline component registers
//! its handlers under explicit names at setup time; lookups then go by name,
//! and reverse lookups go by handler identity.
//!
//! # Example
//!
//! ```
//! use crawlwire::handler::HandlerRegistry;
//!
//! let mut registry = HandlerRegistry::new();
//! let parse = registry.register("parse", |_payload| Ok(()));
//! let _detail = registry.register("parse_detail", |_payload| Ok(()));
//!
//! assert_eq!(registry.name_of(&parse), Some("parse"));
//! assert!(registry.get("parse_detail").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::{HandlerFn, HandlerResult};

/// Registry of named handlers.
///
/// Registration order is preserved, which keeps reverse lookups and debug
/// output deterministic.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, HandlerFn>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a stable name.
    ///
    /// Returns the stored handler so it can be attached to requests
    /// directly; attaching the returned value (rather than a fresh closure)
    /// is what makes reverse lookup by identity work.
    ///
    /// Registering the same name twice replaces the previous handler.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> HandlerFn
    where
        F: Fn(&[u8]) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: HandlerFn = Arc::new(handler);
        self.handlers.insert(name.into(), handler.clone());
        handler
    }

    /// Look up a handler by name.
    pub fn get(&self, name: &str) -> Option<HandlerFn> {
        self.handlers.get(name).cloned()
    }

    /// Reverse lookup: find the name a handler was registered under.
    ///
    /// Matches by identity of the stored handler, not by any notion of
    /// closure equality.
    pub fn name_of(&self, handler: &HandlerFn) -> Option<&str> {
        self.handlers
            .iter()
            .find(|(_, stored)| Arc::ptr_eq(stored, handler))
            .map(|(name, _)| name.as_str())
    }

    /// Whether a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("names", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}
