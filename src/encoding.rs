//! Declared-encoding helpers.
//!
//! A request carries an encoding label (e.g. `"utf-8"`, `"latin1"`) that is
//! fixed at construction and drives URL escaping, body encoding and header
//! value normalization. Labels are resolved through `encoding_rs`, which
//! understands the WHATWG label registry.

use bytes::Bytes;
use encoding_rs::Encoding;

use crate::error::{CrawlwireError, Result};

/// Resolve an encoding label to a codec.
///
/// # Errors
///
/// Returns [`CrawlwireError::UnknownEncoding`] if the label is not in the
/// WHATWG registry.
pub fn resolve(label: &str) -> Result<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
        .ok_or_else(|| CrawlwireError::UnknownEncoding(label.to_string()))
}

/// Encode text to bytes using the given codec.
///
/// Characters the codec cannot represent are replaced with numeric
/// character references, matching `encoding_rs` encoder semantics.
pub fn encode(text: &str, encoding: &'static Encoding) -> Bytes {
    let (bytes, _, _) = encoding.encode(text);
    Bytes::from(bytes.into_owned())
}

/// Decode bytes to text using the given codec.
///
/// Malformed sequences decode to U+FFFD rather than failing; header and
/// body bytes always came from this crate's own encoding pass or from a
/// caller-supplied byte value, so a lossy view is only used for display
/// and dict output.
pub fn decode(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
