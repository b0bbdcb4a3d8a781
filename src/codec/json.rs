//! JSON codec using `serde_json`.
//!
//! The readable alternative to [`super::MsgPackCodec`] for debugging and
//! for stores that want text payloads. Note that request bodies serialize
//! as JSON number arrays; prefer MsgPack when bodies are large or binary.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// JSON codec for request dicts and other structured data.
pub struct JsonCodec;

impl JsonCodec {
    /// Encode a value to JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(value)?)
    }

    /// Decode JSON bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dict::RequestDict;
    use crate::request::Request;

    #[test]
    fn test_dict_roundtrip() {
        let dict = Request::builder("http://example.com/")
            .method("POST")
            .header("Accept", "text/html")
            .flag("seed")
            .build()
            .unwrap()
            .to_dict(None)
            .unwrap();

        let encoded = JsonCodec::encode(&dict).unwrap();
        let decoded: RequestDict = JsonCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, dict);
    }

    #[test]
    fn test_output_is_plain_json_mapping() {
        let dict = Request::get("http://example.com/")
            .unwrap()
            .to_dict(None)
            .unwrap();
        let encoded = JsonCodec::encode(&dict).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(value["url"], "http://example.com/");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["callback"], serde_json::Value::Null);
        // The base type never writes a _class tag.
        assert!(value.get("_class").is_none());
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let result: Result<RequestDict> = JsonCodec::decode(b"{broken");
        assert!(result.is_err());
    }
}
