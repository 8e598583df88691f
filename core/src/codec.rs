//! Lenient JSON decoding for response bodies.
//!
//! The backend occasionally emits a BOM, trailing bytes after the document,
//! ids as numbers on some routes and as strings on others, and numeric
//! pagination fields as strings. Decoding tolerates all of these; anything
//! structurally wrong still surfaces as [`ApiError::Deserialization`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::ApiError;

/// A response type an endpoint can declare.
pub trait ResponseShape: Sized {
    fn decode(body: &str) -> Result<Self, ApiError>;
}

/// The response body as text, left for the caller to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBody(pub String);

impl RawBody {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the body later, once the caller knows which shape the server
    /// actually produced.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        decode_lenient(&self.0)
    }
}

impl ResponseShape for RawBody {
    fn decode(body: &str) -> Result<Self, ApiError> {
        Ok(RawBody(body.to_string()))
    }
}

/// Decode the first JSON value in `body`, ignoring a leading BOM and any
/// trailing content.
pub fn decode_lenient<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let text = body.trim_start_matches('\u{feff}').trim_start();
    if text.is_empty() {
        return Err(ApiError::Deserialization("empty response body".to_string()));
    }
    let mut values = serde_json::Deserializer::from_str(text).into_iter::<T>();
    match values.next() {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => Err(ApiError::Deserialization(e.to_string())),
        None => Err(ApiError::Deserialization("empty response body".to_string())),
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Unsigned(n) => n.to_string(),
            Scalar::Signed(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// Identifiers that may arrive as a JSON string or number.
pub(crate) mod id {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Scalar::deserialize(d).map(Scalar::into_text)
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<Scalar>::deserialize(d)?.map(Scalar::into_text))
    }
}

/// Counters that may arrive as a JSON number or a numeric string.
pub(crate) mod count {
    use super::*;
    use serde::de::Error;

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
        Ok(optional(d)?.unwrap_or(0))
    }

    pub fn optional<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Option::<Scalar>::deserialize(d)?.map(from_scalar).transpose()
    }

    fn from_scalar<E: Error>(value: Scalar) -> Result<u64, E> {
        match value {
            Scalar::Unsigned(n) => Ok(n),
            Scalar::Signed(n) => Ok(n.max(0) as u64),
            Scalar::Float(n) => Ok(n.max(0.0) as u64),
            Scalar::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected a count, got {s:?}"))),
            Scalar::Bool(b) => Err(E::custom(format!("expected a count, got {b}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Item {
        #[serde(deserialize_with = "id::deserialize")]
        id: String,
        #[serde(default, deserialize_with = "count::deserialize")]
        total: u64,
    }

    #[test]
    fn numeric_and_string_ids_decode_to_text() {
        let a: Item = decode_lenient(r#"{"id":42}"#).unwrap();
        let b: Item = decode_lenient(r#"{"id":"42"}"#).unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn counts_accept_numeric_strings_and_default_when_missing() {
        let item: Item = decode_lenient(r#"{"id":"a","total":"17"}"#).unwrap();
        assert_eq!(item.total, 17);
        let item: Item = decode_lenient(r#"{"id":"a"}"#).unwrap();
        assert_eq!(item.total, 0);
    }

    #[test]
    fn bom_and_trailing_content_are_tolerated() {
        let item: Item = decode_lenient("\u{feff}  {\"id\":\"x\"}\n<!-- served by node -->").unwrap();
        assert_eq!(item.id, "x");
    }

    #[test]
    fn empty_body_is_a_deserialization_error() {
        let err = decode_lenient::<Item>("   ").unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn wrong_shape_is_a_deserialization_error() {
        let err = decode_lenient::<Item>(r#"{"name":"no id"}"#).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn raw_body_keeps_text_untouched() {
        let raw = <RawBody as ResponseShape>::decode("not json at all").unwrap();
        assert_eq!(raw.as_str(), "not json at all");
    }
}
