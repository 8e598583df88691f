//! Request decoration and header logging.

use std::sync::Arc;

use crate::client::{bearer, AUTHORIZATION};
use crate::credentials::TokenProvider;
use crate::http::{HttpRequest, HttpResponse};

/// Attaches `authorization: Bearer <token>` to requests that do not already
/// carry an authorization header.
#[derive(Clone)]
pub struct AuthInterceptor {
    tokens: Arc<dyn TokenProvider>,
}

impl AuthInterceptor {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self { tokens }
    }

    /// Returns whether a header was added.
    pub fn intercept(&self, request: &mut HttpRequest) -> bool {
        if request.has_header(AUTHORIZATION) {
            return false;
        }
        match self.tokens.access_token().as_deref().and_then(bearer) {
            Some(value) => {
                request.headers.push((AUTHORIZATION.to_string(), value));
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor").finish_non_exhaustive()
    }
}

const REDACTED: &str = "<redacted>";

/// Logs request and response headers at `debug` level. Bodies are never
/// logged, and the authorization value is redacted.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderLogger;

impl HeaderLogger {
    pub fn log_request(&self, request: &HttpRequest) {
        for line in request_lines(request) {
            tracing::debug!(target: "reader_core::http", "{line}");
        }
    }

    pub fn log_response(&self, request: &HttpRequest, response: &HttpResponse) {
        for line in response_lines(request, response) {
            tracing::debug!(target: "reader_core::http", "{line}");
        }
    }
}

pub(crate) fn request_lines(request: &HttpRequest) -> Vec<String> {
    let mut lines = vec![format!("--> {} {}", request.method, request.path)];
    lines.extend(header_lines(&request.headers));
    lines.push(format!("--> END {}", request.method));
    lines
}

pub(crate) fn response_lines(request: &HttpRequest, response: &HttpResponse) -> Vec<String> {
    let mut lines = vec![format!("<-- {} {}", response.status, request.path)];
    lines.extend(header_lines(&response.headers));
    lines.push("<-- END HTTP".to_string());
    lines
}

fn header_lines(headers: &[(String, String)]) -> impl Iterator<Item = String> + '_ {
    headers.iter().map(|(name, value)| {
        if name.eq_ignore_ascii_case(AUTHORIZATION) {
            format!("{name}: {REDACTED}")
        } else {
            format!("{name}: {value}")
        }
    })
}
