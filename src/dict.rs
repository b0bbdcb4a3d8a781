//! Dict serialization: the lossless persistence shape of a request.
//!
//! [`RequestDict`] is a plain serde mapping whose keys are exactly the
//! declared attribute set ([`Request::ATTRIBUTES`]) plus an optional
//! `_class` tag for foreign request variants. [`Request::to_dict`] resolves
//! live handlers back to their registered names; [`Request::from_dict`]
//! restores names back to live handlers. Push the dict through a codec in
//! [`crate::codec`] for storage or inter-process transfer.
//!
//! # Example
//!
//! ```
//! use crawlwire::handler::{Callback, HandlerRegistry};
//! use crawlwire::request::Request;
//!
//! let mut registry = HandlerRegistry::new();
//! let parse = registry.register("parse", |_| Ok(()));
//!
//! let request = Request::builder("http://example.com/")
//!     .callback(Callback::Handler(parse))
//!     .build()
//!     .unwrap();
//!
//! let dict = request.to_dict(Some(&registry)).unwrap();
//! let restored = Request::from_dict(dict, Some(&registry)).unwrap();
//! assert_eq!(restored, request);
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{CrawlwireError, Result};
use crate::handler::{Callback, HandlerRegistry};
use crate::request::{Cookies, Request, RequestBuilder};

/// Serialized form of a callback or errback.
///
/// Absent (`null`) means "use the pipeline default"; the no-callback
/// sentinel keeps its own identity so it is never confused with either a
/// default or a named handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackSpec {
    /// The no-callback sentinel.
    NoCallback,
    /// A stable handler name.
    Named(String),
}

/// Plain mapping fully describing a request.
///
/// Field order follows [`Request::ATTRIBUTES`]; a test pins the serialized
/// key set to that list so the schema cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDict {
    /// Normalized, safety-escaped URL.
    pub url: String,
    /// Resolved callback, `None` for the pipeline default.
    pub callback: Option<CallbackSpec>,
    /// Uppercased method.
    pub method: String,
    /// Headers as a plain ordered mapping of decoded values.
    pub headers: IndexMap<String, Vec<String>>,
    /// Body bytes, binary-safe.
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
    /// Cookie jar(s).
    pub cookies: Cookies,
    /// Annotation map.
    pub meta: Map<String, Value>,
    /// Declared encoding label.
    pub encoding: String,
    /// Scheduling priority.
    pub priority: i32,
    /// Duplicate-filter opt-out.
    pub dont_filter: bool,
    /// Resolved errback, `None` for the pipeline default.
    pub errback: Option<CallbackSpec>,
    /// Free-form string tags.
    pub flags: Vec<String>,
    /// Callback keyword arguments.
    pub cb_kwargs: Map<String, Value>,
    /// Type tag for request variants outside this crate; the base type
    /// never writes it.
    #[serde(rename = "_class", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
}

impl Request {
    /// Serialize into a plain mapping.
    ///
    /// Live handlers are matched back to their registered names by
    /// identity. A handler that cannot be named is a hard error - a dict
    /// holding an anonymous function could not be restored.
    ///
    /// # Errors
    ///
    /// [`CrawlwireError::HandlerNotResolvable`] when a live handler has no
    /// name in `registry` (or no registry was supplied).
    pub fn to_dict(&self, registry: Option<&HandlerRegistry>) -> Result<RequestDict> {
        Ok(RequestDict {
            url: self.url().to_string(),
            callback: spec_of(self.callback(), registry)?,
            method: self.method().to_string(),
            headers: self.headers().to_string_map(),
            body: self.body().to_vec(),
            cookies: self.cookies().clone(),
            meta: self.meta().clone(),
            encoding: self.encoding().to_string(),
            priority: self.priority(),
            dont_filter: self.dont_filter(),
            errback: spec_of(self.errback(), registry)?,
            flags: self.flags().to_vec(),
            cb_kwargs: self.cb_kwargs().clone(),
            class: None,
        })
    }

    /// Rebuild a request from its dict form.
    ///
    /// Named callbacks become live handlers when a registry is supplied and
    /// stay symbolic otherwise. All construction-time validation reapplies;
    /// URL normalization is idempotent so a stored URL round-trips
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`CrawlwireError::UnknownRequestClass`] for a `_class` tag this
    ///   crate does not recognize.
    /// - [`CrawlwireError::HandlerNotFound`] for a name missing from the
    ///   supplied registry.
    pub fn from_dict(dict: RequestDict, registry: Option<&HandlerRegistry>) -> Result<Request> {
        if let Some(class) = dict.class {
            return Err(CrawlwireError::UnknownRequestClass(class));
        }
        RequestBuilder::new(dict.url)
            .callback(callback_of(dict.callback, registry)?)
            .method(dict.method)
            .headers(dict.headers.into_iter().flat_map(|(name, values)| {
                values.into_iter().map(move |value| (name.clone(), value))
            }))
            .body(dict.body)
            .cookies(dict.cookies)
            .meta(dict.meta)
            .encoding(dict.encoding)
            .priority(dict.priority)
            .dont_filter(dict.dont_filter)
            .errback(callback_of(dict.errback, registry)?)
            .flags(dict.flags)
            .cb_kwargs(dict.cb_kwargs)
            .build()
    }
}

/// Resolve a callback to its serialized spec.
fn spec_of(callback: &Callback, registry: Option<&HandlerRegistry>) -> Result<Option<CallbackSpec>> {
    match callback {
        Callback::Default => Ok(None),
        Callback::NoCallback => Ok(Some(CallbackSpec::NoCallback)),
        // Already symbolic; passes through unchanged.
        Callback::Named(name) => Ok(Some(CallbackSpec::Named(name.clone()))),
        Callback::Handler(handler) => {
            let name = registry
                .and_then(|r| r.name_of(handler))
                .ok_or_else(|| CrawlwireError::HandlerNotResolvable {
                    handler: format!("at {:p}", Arc::as_ptr(handler)),
                    registry: match registry {
                        Some(r) => format!("registry of {:?}", r.names().collect::<Vec<_>>()),
                        None => "no registry (none supplied)".to_string(),
                    },
                })?;
            Ok(Some(CallbackSpec::Named(name.to_string())))
        }
    }
}

/// Restore a callback from its serialized spec.
fn callback_of(spec: Option<CallbackSpec>, registry: Option<&HandlerRegistry>) -> Result<Callback> {
    Ok(match spec {
        None => Callback::Default,
        Some(CallbackSpec::NoCallback) => Callback::NoCallback,
        Some(CallbackSpec::Named(name)) => match registry {
            Some(registry) => {
                let handler = registry.get(&name);
                Callback::Handler(handler.ok_or(CrawlwireError::HandlerNotFound(name))?)
            }
            None => Callback::Named(name),
        },
    })
}
