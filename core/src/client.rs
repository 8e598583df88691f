//! Stateless HTTP request builder and response parser for the reader API.
//!
//! # Design
//! `ReaderClient` holds only a `base_url` and carries no mutable state between
//! calls. `build` turns any [`Endpoint`] into an `HttpRequest` and `parse`
//! turns an `HttpResponse` into the endpoint's declared response shape. The
//! round-trip in between is somebody else's job, which keeps this part
//! deterministic and free of I/O.

use crate::codec::ResponseShape;
use crate::endpoints::{Endpoint, Payload};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

pub const CONTENT_TYPE: &str = "content-type";
pub const AUTHORIZATION: &str = "authorization";

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Synchronous, stateless request builder / response parser.
#[derive(Debug, Clone)]
pub struct ReaderClient {
    base_url: String,
}

impl ReaderClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `endpoint` into a concrete request: path parameters
    /// substituted, absent query parameters dropped, body encoded.
    pub fn build<E: Endpoint>(&self, endpoint: &E) -> Result<HttpRequest, ApiError> {
        let mut path = format!(
            "{}/{}",
            self.base_url,
            endpoint.path().trim_start_matches('/')
        );
        let query = endpoint.query();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&encode_pairs(&query));
        }

        let mut headers = Vec::new();
        let body = match endpoint.payload()? {
            Payload::Empty => None,
            Payload::Json(json) => {
                headers.push((CONTENT_TYPE.to_string(), JSON.to_string()));
                Some(json)
            }
            Payload::Form(fields) => {
                headers.push((CONTENT_TYPE.to_string(), FORM.to_string()));
                Some(encode_pairs(&fields))
            }
        };

        if let Some(value) = endpoint.authorization().and_then(bearer) {
            headers.push((AUTHORIZATION.to_string(), value));
        }

        Ok(HttpRequest {
            method: E::METHOD,
            path,
            headers,
            body,
        })
    }

    /// Decode `response` into `E::Response`.
    ///
    /// Only transport-level status is checked. A 2xx envelope saying
    /// `success: false` is returned as-is.
    pub fn parse<E: Endpoint>(&self, response: HttpResponse) -> Result<E::Response, ApiError> {
        check_status(&response)?;
        if response.status == 204 && response.body.trim().is_empty() {
            return E::Response::decode(NO_CONTENT);
        }
        E::Response::decode(&response.body)
    }
}

/// Stand-in body for `204 No Content`.
const NO_CONTENT: &str = r#"{"success":true,"message":""}"#;

/// `Bearer <token>` for a token given bare or with the scheme already on it.
/// Blank tokens, and a scheme with nothing after it, yield `None`.
pub fn bearer(token: &str) -> Option<String> {
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token).trim();
    if token.is_empty() {
        None
    } else {
        Some(format!("Bearer {token}"))
    }
}

fn encode_pairs(pairs: &[(&'static str, String)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish()
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
