//! URL safety escaping and ajax-fragment rewriting.
//!
//! Request URLs are normalized once, at construction:
//!
//! 1. [`safe_url_string`] percent-escapes every byte that is not RFC 3986
//!    reserved/unreserved (non-ASCII text is first encoded with the
//!    request's declared encoding). Existing `%XX` escapes are preserved,
//!    which makes the pass idempotent — revalidating an already-normalized
//!    URL is a no-op.
//! 2. [`escape_ajax`] rewrites `#!` fragments into the
//!    `_escaped_fragment_=` query convention so single-page-app "clean
//!    URLs" stay followable.
//!
//! # Example
//!
//! ```
//! use crawlwire::url::{escape_ajax, safe_url_string};
//!
//! let enc = encoding_rs::UTF_8;
//! let safe = safe_url_string("http://example.com/price is 10€", enc);
//! assert_eq!(safe, "http://example.com/price%20is%2010%E2%82%AC");
//!
//! let ajax = escape_ajax("http://example.com/page#!state=1");
//! assert_eq!(ajax, "http://example.com/page?_escaped_fragment_=state%3D1");
//! ```

use encoding_rs::Encoding;
use percent_encoding::{percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};

/// ASCII bytes that must be escaped in a URL.
///
/// Everything printable except RFC 3986 gen-delims, sub-delims, unreserved
/// characters and `%` (kept so existing escapes survive).
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Escaping set for query parameter values: only unreserved bytes pass.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Query parameter name used by the ajax-crawling convention.
const ESCAPED_FRAGMENT: &str = "_escaped_fragment_";

/// Percent-escape a URL into a transport-safe ASCII string.
///
/// Leading and trailing whitespace is stripped; non-ASCII characters are
/// encoded with `encoding` before escaping. Already-escaped sequences are
/// left untouched.
pub fn safe_url_string(url: &str, encoding: &'static Encoding) -> String {
    let trimmed = url.trim();
    let (bytes, _, _) = encoding.encode(trimmed);
    percent_encode(&bytes, URL_UNSAFE).to_string()
}

/// Rewrite an ajax-crawlable `#!` fragment into a query parameter.
///
/// URLs without a `#!` fragment are returned unchanged. The fragment value
/// is escaped as a query parameter value (`=` becomes `%3D` and so on).
pub fn escape_ajax(url: &str) -> String {
    let Some((base, fragment)) = url.split_once('#') else {
        return url.to_string();
    };
    let Some(state) = fragment.strip_prefix('!') else {
        return url.to_string();
    };
    let separator = if base.contains('?') { '&' } else { '?' };
    let value = percent_encode(state.as_bytes(), QUERY_VALUE);
    format!("{base}{separator}{ESCAPED_FRAGMENT}={value}")
}

/// Whether a normalized URL carries a scheme.
///
/// `about:` and `data:` URLs have no `://` separator but are still valid
/// fetch targets.
pub fn has_scheme(url: &str) -> bool {
    url.contains("://") || url.starts_with("about:") || url.starts_with("data:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_8, WINDOWS_1252};

    #[test]
    fn test_safe_url_passthrough() {
        let url = "http://www.example.com/do?a=1&b=2&c=3";
        assert_eq!(safe_url_string(url, UTF_8), url);
    }

    #[test]
    fn test_safe_url_escapes_spaces_and_quotes() {
        assert_eq!(
            safe_url_string("http://example.com/a b\"c", UTF_8),
            "http://example.com/a%20b%22c"
        );
    }

    #[test]
    fn test_safe_url_keeps_existing_escapes() {
        let url = "http://example.com/a%20b?x=%7B1%7D";
        assert_eq!(safe_url_string(url, UTF_8), url);
    }

    #[test]
    fn test_safe_url_idempotent() {
        let once = safe_url_string("http://example.com/€ rate", UTF_8);
        assert_eq!(safe_url_string(&once, UTF_8), once);
    }

    #[test]
    fn test_safe_url_uses_declared_encoding() {
        // é is one byte in windows-1252 and two in utf-8
        assert_eq!(
            safe_url_string("http://example.com/é", WINDOWS_1252),
            "http://example.com/%E9"
        );
        assert_eq!(
            safe_url_string("http://example.com/é", UTF_8),
            "http://example.com/%C3%A9"
        );
    }

    #[test]
    fn test_safe_url_strips_whitespace() {
        assert_eq!(
            safe_url_string("  http://example.com/ \n", UTF_8),
            "http://example.com/"
        );
    }

    #[test]
    fn test_escape_ajax_basic() {
        assert_eq!(
            escape_ajax("www.example.com/ajax.html#!key=value"),
            "www.example.com/ajax.html?_escaped_fragment_=key%3Dvalue"
        );
    }

    #[test]
    fn test_escape_ajax_with_existing_query() {
        assert_eq!(
            escape_ajax("www.example.com/ajax.html?k1=v1#!key=value"),
            "www.example.com/ajax.html?k1=v1&_escaped_fragment_=key%3Dvalue"
        );
    }

    #[test]
    fn test_escape_ajax_empty_state() {
        assert_eq!(
            escape_ajax("www.example.com/page#!"),
            "www.example.com/page?_escaped_fragment_="
        );
    }

    #[test]
    fn test_escape_ajax_ignores_plain_fragment() {
        assert_eq!(
            escape_ajax("www.example.com/page#section"),
            "www.example.com/page#section"
        );
        assert_eq!(escape_ajax("www.example.com/page"), "www.example.com/page");
    }

    #[test]
    fn test_has_scheme() {
        assert!(has_scheme("http://example.com"));
        assert!(has_scheme("ftp://example.com"));
        assert!(has_scheme("about:blank"));
        assert!(has_scheme("data:,Hello"));
        assert!(!has_scheme("example.com"));
        assert!(!has_scheme("/relative/path"));
    }
}
