//! Request value type with validating builder and copy-on-write replace.
//!
//! A [`Request`] is the canonical description of one pending or historical
//! fetch: normalized URL, uppercased method, byte-safe headers and body,
//! scheduling hints and callback wiring. It is built once, validated
//! fail-fast, and never mutated afterwards except for the two annotation
//! maps (`meta`, `cb_kwargs`) that pipeline stages fill in as the request
//! travels. A changed request is always a new instance produced through
//! [`Request::replace`].
//!
//! # Example
//!
//! ```
//! use crawlwire::request::Request;
//!
//! let request = Request::builder("http://example.com/page#!state=1")
//!     .method("get")
//!     .header("Accept", "text/html")
//!     .priority(5)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(request.method(), "GET");
//! assert_eq!(request.url(), "http://example.com/page?_escaped_fragment_=state%3D1");
//!
//! let post = request.replace().method("POST").build().unwrap();
//! assert_eq!(post.method(), "POST");
//! assert_eq!(post.url(), request.url());
//! ```

use std::fmt;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::encoding;
use crate::error::{CrawlwireError, Result};
use crate::handler::Callback;
use crate::headers::{HeaderValue, Headers};
use crate::url::{escape_ajax, has_scheme, safe_url_string};

/// Cookie input: one jar, or an ordered sequence of jars for requests that
/// span multiple domains. Opaque to this crate beyond storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cookies {
    /// A single name/value jar.
    Jar(IndexMap<String, String>),
    /// Multiple jars, order preserved.
    Jars(Vec<IndexMap<String, String>>),
}

impl Cookies {
    /// Whether no cookie is stored at all.
    pub fn is_empty(&self) -> bool {
        match self {
            Cookies::Jar(jar) => jar.is_empty(),
            Cookies::Jars(jars) => jars.iter().all(IndexMap::is_empty),
        }
    }
}

impl Default for Cookies {
    fn default() -> Self {
        Cookies::Jar(IndexMap::new())
    }
}

impl From<IndexMap<String, String>> for Cookies {
    fn from(jar: IndexMap<String, String>) -> Self {
        Cookies::Jar(jar)
    }
}

impl From<Vec<IndexMap<String, String>>> for Cookies {
    fn from(jars: Vec<IndexMap<String, String>>) -> Self {
        Cookies::Jars(jars)
    }
}

impl FromIterator<(String, String)> for Cookies {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Cookies::Jar(iter.into_iter().collect())
    }
}

/// Body input before normalization.
///
/// Absent input becomes empty bytes; text is encoded with the request's
/// declared encoding at build time.
#[derive(Debug, Clone, Default)]
pub enum Body {
    /// No body; normalizes to empty bytes.
    #[default]
    Empty,
    /// Text, encoded with the declared encoding.
    Text(String),
    /// Raw bytes, stored as-is.
    Bytes(Bytes),
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Body::Text(value.to_string())
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Body::Text(value)
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Body::Bytes(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Body::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Body {
    fn from(value: &[u8]) -> Self {
        Body::Bytes(Bytes::copy_from_slice(value))
    }
}

/// One pending or historical fetch instruction.
///
/// Immutable after construction apart from [`Request::meta_mut`] and
/// [`Request::cb_kwargs_mut`]; produce modified copies with
/// [`Request::replace`].
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    url: String,
    method: String,
    headers: Headers,
    body: Bytes,
    cookies: Cookies,
    meta: Map<String, Value>,
    cb_kwargs: Map<String, Value>,
    encoding: String,
    priority: i32,
    dont_filter: bool,
    callback: Callback,
    errback: Callback,
    flags: Vec<String>,
}

impl Request {
    /// The declared attribute set: the single source of truth for what
    /// `replace`, `copy` and the dict serialization operate over.
    ///
    /// [`RequestBuilder`] carries exactly these fields and
    /// [`crate::dict::RequestDict`] serializes exactly these keys; a test
    /// pins the dict key set to this list so the three cannot drift apart.
    pub const ATTRIBUTES: [&'static str; 13] = [
        "url",
        "callback",
        "method",
        "headers",
        "body",
        "cookies",
        "meta",
        "encoding",
        "priority",
        "dont_filter",
        "errback",
        "flags",
        "cb_kwargs",
    ];

    /// Start building a request for a URL.
    pub fn builder(url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(url)
    }

    /// Build a GET request with all defaults.
    pub fn get(url: impl Into<String>) -> Result<Request> {
        RequestBuilder::new(url).build()
    }

    /// The normalized, percent-escaped absolute URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The uppercased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Request body; always present, possibly empty.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Cookie jar(s).
    pub fn cookies(&self) -> &Cookies {
        &self.cookies
    }

    /// Free-form cross-component annotations.
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Mutable access to the annotation map.
    ///
    /// The map is owned by this instance; mutating it never affects the
    /// construction-time source or any sibling produced by `replace`.
    pub fn meta_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.meta
    }

    /// Keyword arguments forwarded to the callback at dispatch time.
    pub fn cb_kwargs(&self) -> &Map<String, Value> {
        &self.cb_kwargs
    }

    /// Mutable access to the callback keyword arguments.
    pub fn cb_kwargs_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.cb_kwargs
    }

    /// The declared encoding label, fixed at construction.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Scheduling priority; higher is more urgent.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether duplicate filters should skip this request.
    pub fn dont_filter(&self) -> bool {
        self.dont_filter
    }

    /// Success handler.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Failure handler.
    pub fn errback(&self) -> &Callback {
        &self.errback
    }

    /// Free-form string tags, order preserved.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Start a copy-on-write modification.
    ///
    /// The returned builder is preloaded with every declared attribute of
    /// this instance; setters override individual fields and
    /// [`RequestBuilder::build`] produces the new request. Because the
    /// builder's field set is the closed attribute schema, no attribute can
    /// silently drop out of the copy.
    pub fn replace(&self) -> RequestBuilder {
        RequestBuilder {
            url: self.url.clone(),
            method: self.method.clone(),
            // Carry normalized byte values so no decode/re-encode happens.
            headers: self
                .headers
                .iter()
                .flat_map(|(name, values)| {
                    values
                        .iter()
                        .map(move |v| (name.to_string(), HeaderValue::Bytes(v.clone())))
                })
                .collect(),
            body: Body::Bytes(self.body.clone()),
            cookies: self.cookies.clone(),
            meta: self.meta.clone(),
            cb_kwargs: self.cb_kwargs.clone(),
            encoding: self.encoding.clone(),
            priority: self.priority,
            dont_filter: self.dont_filter,
            callback: self.callback.clone(),
            errback: self.errback.clone(),
            flags: self.flags.clone(),
        }
    }

    /// An independent copy: `replace()` with no overrides.
    pub fn copy(&self) -> Result<Request> {
        self.replace().build()
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.method, self.url)
    }
}

/// Builder for [`Request`] carrying the full declared attribute set.
///
/// All validation happens in [`RequestBuilder::build`]; a `Request` is
/// either fully valid or does not exist.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: String,
    method: String,
    headers: Vec<(String, HeaderValue)>,
    body: Body,
    cookies: Cookies,
    meta: Map<String, Value>,
    cb_kwargs: Map<String, Value>,
    encoding: String,
    priority: i32,
    dont_filter: bool,
    callback: Callback,
    errback: Callback,
    flags: Vec<String>,
}

impl RequestBuilder {
    /// Start a builder with defaults: GET, utf-8, priority 0, no filters
    /// skipped, default callback, empty containers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            headers: Vec::new(),
            body: Body::Empty,
            cookies: Cookies::default(),
            meta: Map::new(),
            cb_kwargs: Map::new(),
            encoding: "utf-8".to_string(),
            priority: 0,
            dont_filter: false,
            callback: Callback::Default,
            errback: Callback::Default,
            flags: Vec::new(),
        }
    }

    /// Override the URL.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the HTTP method; uppercased at build time.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Append one header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderValue>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replace all headers with the given pairs (mapping or pair-iterable).
    pub fn headers<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<HeaderValue>,
    {
        self.headers = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Set the body (text or bytes).
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the cookie jar(s).
    pub fn cookies(mut self, cookies: impl Into<Cookies>) -> Self {
        self.cookies = cookies.into();
        self
    }

    /// Replace the annotation map. The builder owns its copy; mutating the
    /// built request never touches the caller's source mapping.
    pub fn meta(mut self, meta: Map<String, Value>) -> Self {
        self.meta = meta;
        self
    }

    /// Insert one annotation.
    pub fn meta_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Replace the callback keyword arguments.
    pub fn cb_kwargs(mut self, cb_kwargs: Map<String, Value>) -> Self {
        self.cb_kwargs = cb_kwargs;
        self
    }

    /// Insert one callback keyword argument.
    pub fn cb_kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.cb_kwargs.insert(key.into(), value.into());
        self
    }

    /// Set the encoding label used for URL, body and header normalization.
    pub fn encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    /// Set the scheduling priority.
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Ask duplicate filters to skip this request.
    pub fn dont_filter(mut self, dont_filter: bool) -> Self {
        self.dont_filter = dont_filter;
        self
    }

    /// Set the success handler.
    pub fn callback(mut self, callback: impl Into<Callback>) -> Self {
        self.callback = callback.into();
        self
    }

    /// Set the failure handler.
    pub fn errback(mut self, errback: impl Into<Callback>) -> Self {
        self.errback = errback.into();
        self
    }

    /// Append one flag.
    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.push(flag.into());
        self
    }

    /// Replace all flags.
    pub fn flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags = flags.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and construct the request.
    ///
    /// The encoding label is resolved first since URL, body and header
    /// normalization all depend on it. The URL is safety-escaped, its `#!`
    /// fragment rewritten, and then required to carry a scheme.
    ///
    /// # Errors
    ///
    /// - [`CrawlwireError::UnknownEncoding`] for an unresolvable label.
    /// - [`CrawlwireError::MissingScheme`] for a URL without `://` that is
    ///   neither `about:` nor `data:`.
    pub fn build(self) -> Result<Request> {
        let codec = encoding::resolve(&self.encoding)?;

        let method = self.method.to_ascii_uppercase();

        let url = escape_ajax(&safe_url_string(&self.url, codec));
        if !has_scheme(&url) {
            return Err(CrawlwireError::MissingScheme(url));
        }

        let body = match self.body {
            Body::Empty => Bytes::new(),
            Body::Text(text) => encoding::encode(&text, codec),
            Body::Bytes(bytes) => bytes,
        };

        let headers = Headers::from_pairs(self.headers, codec);

        Ok(Request {
            url,
            method,
            headers,
            body,
            cookies: self.cookies,
            meta: self.meta,
            cb_kwargs: self.cb_kwargs,
            encoding: self.encoding,
            priority: self.priority,
            dont_filter: self.dont_filter,
            callback: self.callback,
            errback: self.errback,
            flags: self.flags,
        })
    }
}
