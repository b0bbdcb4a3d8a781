//! Construction from a curl-style command line.
//!
//! The command parser itself is an external collaborator; this module pins
//! down the contract with it. A parser turns a textual `curl ...`
//! invocation into [`CurlArgs`] (method, url, headers, cookies, body), and
//! [`RequestBuilder::from_curl`] seeds a builder from that output. Any
//! setter called on the returned builder overrides the parsed value -
//! explicit always wins over parsed - and the normal build-time validation
//! applies regardless of origin.
//!
//! # Example
//!
//! ```
//! use crawlwire::curl::{CurlArgs, CurlCommandParser};
//! use crawlwire::request::RequestBuilder;
//!
//! struct FixedParser;
//!
//! impl CurlCommandParser for FixedParser {
//!     fn parse(&self, _command: &str, _strict: bool) -> crawlwire::Result<CurlArgs> {
//!         Ok(CurlArgs {
//!             url: Some("http://example.com/".to_string()),
//!             method: Some("POST".to_string()),
//!             ..CurlArgs::default()
//!         })
//!     }
//! }
//!
//! let request = RequestBuilder::from_curl(&FixedParser, "curl http://example.com/", false)
//!     .unwrap()
//!     .method("PUT") // explicit override beats the parsed POST
//!     .build()
//!     .unwrap();
//! assert_eq!(request.method(), "PUT");
//! ```

use indexmap::IndexMap;

use crate::error::{CrawlwireError, Result};
use crate::request::RequestBuilder;

/// Constructor arguments produced by a curl command parser.
#[derive(Debug, Clone, Default)]
pub struct CurlArgs {
    /// Target URL; required for a usable request.
    pub url: Option<String>,
    /// HTTP method, when the command implies one.
    pub method: Option<String>,
    /// Header pairs in command order.
    pub headers: Vec<(String, String)>,
    /// Cookies from `-b`/`--cookie` options.
    pub cookies: IndexMap<String, String>,
    /// Request body from `-d`/`--data` options.
    pub body: Option<String>,
}

/// External collaborator that parses curl command lines.
///
/// With `strict` set, an unknown option must fail the parse (reported as
/// [`CrawlwireError::Curl`]); otherwise unknown options are skipped.
pub trait CurlCommandParser {
    /// Parse one command invocation into request arguments.
    fn parse(&self, command: &str, strict: bool) -> Result<CurlArgs>;
}

impl RequestBuilder {
    /// Seed a builder from a parsed curl command.
    ///
    /// Builder setters applied afterwards override the parsed values.
    ///
    /// # Errors
    ///
    /// Propagates parser errors, and fails with [`CrawlwireError::Curl`]
    /// when the command yields no URL.
    pub fn from_curl<P>(parser: &P, command: &str, strict: bool) -> Result<RequestBuilder>
    where
        P: CurlCommandParser + ?Sized,
    {
        let args = parser.parse(command, strict)?;
        let url = args
            .url
            .ok_or_else(|| CrawlwireError::Curl("command did not contain a url".to_string()))?;

        let mut builder = RequestBuilder::new(url);
        if let Some(method) = args.method {
            builder = builder.method(method);
        }
        if !args.headers.is_empty() {
            builder = builder.headers(args.headers);
        }
        if !args.cookies.is_empty() {
            builder = builder.cookies(args.cookies);
        }
        if let Some(body) = args.body {
            builder = builder.body(body);
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Cookies;

    /// Stub collaborator returning canned arguments; the real parser lives
    /// outside this crate.
    struct StubParser {
        args: CurlArgs,
    }

    impl CurlCommandParser for StubParser {
        fn parse(&self, command: &str, strict: bool) -> Result<CurlArgs> {
            if strict && command.contains("--unknown-option") {
                return Err(CrawlwireError::Curl(
                    "unknown option: --unknown-option".to_string(),
                ));
            }
            Ok(self.args.clone())
        }
    }

    fn stub() -> StubParser {
        StubParser {
            args: CurlArgs {
                url: Some("http://example.com/login".to_string()),
                method: Some("POST".to_string()),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                cookies: IndexMap::from([("session".to_string(), "abc".to_string())]),
                body: Some(r#"{"user":"x"}"#.to_string()),
            },
        }
    }

    #[test]
    fn test_parsed_arguments_populate_builder() {
        let request = RequestBuilder::from_curl(&stub(), "curl ...", false)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(request.url(), "http://example.com/login");
        assert_eq!(request.method(), "POST");
        assert_eq!(
            request.headers().get("content-type").unwrap().as_ref(),
            b"application/json"
        );
        assert_eq!(request.body().as_ref(), br#"{"user":"x"}"#);
        assert!(matches!(request.cookies(), Cookies::Jar(j) if j["session"] == "abc"));
    }

    #[test]
    fn test_explicit_overrides_beat_parsed_values() {
        let request = RequestBuilder::from_curl(&stub(), "curl ...", false)
            .unwrap()
            .method("GET")
            .body("override")
            .build()
            .unwrap();

        assert_eq!(request.method(), "GET");
        assert_eq!(request.body().as_ref(), b"override");
        // Untouched parsed values survive.
        assert_eq!(request.url(), "http://example.com/login");
    }

    #[test]
    fn test_strict_mode_propagates_parser_failure() {
        let err =
            RequestBuilder::from_curl(&stub(), "curl --unknown-option x", true).unwrap_err();
        assert!(matches!(err, CrawlwireError::Curl(_)));
    }

    #[test]
    fn test_missing_url_fails() {
        let parser = StubParser {
            args: CurlArgs::default(),
        };
        let err = RequestBuilder::from_curl(&parser, "curl", false).unwrap_err();
        assert!(matches!(err, CrawlwireError::Curl(_)));
    }

    #[test]
    fn test_parsed_request_still_validated() {
        let parser = StubParser {
            args: CurlArgs {
                url: Some("no-scheme-here".to_string()),
                ..CurlArgs::default()
            },
        };
        let err = RequestBuilder::from_curl(&parser, "curl no-scheme-here", false)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, CrawlwireError::MissingScheme(_)));
    }
}
