//! The networked client handle.
//!
//! `ReaderApi` wires the stateless [`ReaderClient`] to an
//! [`AuthInterceptor`], an optional [`HeaderLogger`] and a [`Transport`].
//! It holds no per-call mutable state, so one handle can serve any number
//! of threads at once.

use std::sync::Arc;

use crate::client::ReaderClient;
use crate::config::ClientConfig;
use crate::credentials::TokenProvider;
use crate::endpoints::Endpoint;
use crate::error::ApiError;
use crate::interceptor::{AuthInterceptor, HeaderLogger};
use crate::transport::{Transport, UreqTransport};

pub struct ReaderApi {
    client: ReaderClient,
    interceptor: AuthInterceptor,
    logger: Option<HeaderLogger>,
    transport: Box<dyn Transport>,
}

impl ReaderApi {
    /// Build a handle over the real network.
    pub fn connect(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, ApiError> {
        config.validate()?;
        let transport = UreqTransport::new(config);
        Ok(Self::new(config, Box::new(transport), tokens))
    }

    /// Build a handle over any transport.
    pub fn new(
        config: &ClientConfig,
        transport: Box<dyn Transport>,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client: ReaderClient::new(&config.base_url),
            interceptor: AuthInterceptor::new(tokens),
            logger: config.header_logging_enabled().then_some(HeaderLogger),
            transport,
        }
    }

    pub fn client(&self) -> &ReaderClient {
        &self.client
    }

    /// Perform one catalog operation: build, decorate, send, decode.
    pub fn call<E: Endpoint>(&self, endpoint: &E) -> Result<E::Response, ApiError> {
        let mut request = self.client.build(endpoint)?;
        let authorized = self.interceptor.intercept(&mut request);
        tracing::debug!(
            endpoint = E::NAME,
            method = %request.method,
            authorized,
            "sending request"
        );

        if let Some(logger) = &self.logger {
            logger.log_request(&request);
        }
        let response = self.transport.execute(&request)?;
        if let Some(logger) = &self.logger {
            logger.log_response(&request, &response);
        }

        let status = response.status;
        self.client.parse::<E>(response).inspect_err(|e| {
            tracing::debug!(endpoint = E::NAME, status, error = %e, "call failed");
        })
    }
}

impl std::fmt::Debug for ReaderApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderApi")
            .field("client", &self.client)
            .field("log_headers", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::{MemoryCredentialStore, NoToken, StoredToken, ACCESS_TOKEN_KEY};
    use crate::endpoints::{ChangePassword, DeleteBook, ListBooks, SaveBookmark};
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use std::sync::Mutex;

    /// Records every request and answers with a canned response.
    struct Recorder {
        seen: Arc<Mutex<Vec<HttpRequest>>>,
        reply: Result<HttpResponse, String>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply.clone().map_err(ApiError::Network)
        }
    }

    fn api_with(
        tokens: Arc<dyn TokenProvider>,
        reply: Result<HttpResponse, String>,
    ) -> (ReaderApi, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = Recorder {
            seen: seen.clone(),
            reply,
        };
        let config = ClientConfig::new("https://reader.example.com");
        (ReaderApi::new(&config, Box::new(transport), tokens), seen)
    }

    fn ok(body: &str) -> Result<HttpResponse, String> {
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn list_books_sends_one_request_and_decodes_page() {
        let (api, seen) = api_with(
            Arc::new(NoToken),
            ok(r#"{"success":true,"message":"","data":[{"id":1,"title":"A"},{"id":2,"title":"B"}],
                "pagination":{"page":1,"limit":20,"total":2}}"#),
        );
        let env = api
            .call(&ListBooks {
                category: Some("fiction".to_string()),
                status: Some("active".to_string()),
                page: Some(1),
                limit: Some(20),
            })
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(
            seen[0].path,
            "https://reader.example.com/api/books?category=fiction&status=active&page=1&limit=20"
        );
        assert_eq!(env.data.unwrap().len(), 2);
        assert_eq!(env.pagination.unwrap().total, 2);
    }

    #[test]
    fn save_bookmark_gets_stored_token() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(ACCESS_TOKEN_KEY, "tok-1");
        let (api, seen) = api_with(
            Arc::new(StoredToken::new(store)),
            ok(r#"{"success":true,"message":"saved","data":{"userId":"u1","bookId":"b2","chapterId":"c3"}}"#),
        );

        let env = api.call(&SaveBookmark::new("u1", "b2", "c3")).unwrap();
        assert_eq!(env.data.unwrap().chapter_id, "c3");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].path, "https://reader.example.com/api/history/bookmark");
        assert_eq!(seen[0].body.as_deref(), Some("userId=u1&bookId=b2&chapterId=c3"));
        assert_eq!(seen[0].header("authorization"), Some("Bearer tok-1"));
    }

    #[test]
    fn token_refresh_is_picked_up_on_next_call() {
        let store = Arc::new(MemoryCredentialStore::new());
        store.set(ACCESS_TOKEN_KEY, "old");
        let (api, seen) = api_with(
            Arc::new(StoredToken::new(store.clone())),
            ok(r#"{"success":true,"message":""}"#),
        );

        api.call(&DeleteBook::new(1)).unwrap();
        store.set(ACCESS_TOKEN_KEY, "new");
        api.call(&DeleteBook::new(1)).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].header("authorization"), Some("Bearer old"));
        assert_eq!(seen[1].header("authorization"), Some("Bearer new"));
    }

    #[test]
    fn delete_without_token_sends_no_authorization() {
        let (api, seen) = api_with(
            Arc::new(NoToken),
            Ok(HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: r#"{"success":false,"message":"Unauthorized"}"#.to_string(),
            }),
        );

        let err = api.call(&DeleteBook::new(42)).unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 401, .. }));

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].path, "https://reader.example.com/api/admin/books/42");
        assert!(!seen[0].has_header("authorization"));
    }

    #[test]
    fn explicit_header_wins_over_stored_token() {
        let (api, seen) = api_with(
            Arc::new(|| Some("stored".to_string())),
            ok(r#"{"success":true,"message":"changed"}"#),
        );
        api.call(&ChangePassword::new("a", "b").with_token("explicit"))
            .unwrap();

        let seen = seen.lock().unwrap();
        let auth: Vec<_> = seen[0]
            .headers
            .iter()
            .filter(|(k, _)| k == "authorization")
            .collect();
        assert_eq!(auth.len(), 1);
        assert_eq!(auth[0].1, "Bearer explicit");
    }

    #[test]
    fn blank_explicit_token_falls_back_to_stored_token() {
        for blank in ["", "   "] {
            let (api, seen) = api_with(
                Arc::new(|| Some("stored".to_string())),
                ok(r#"{"success":true,"message":"changed"}"#),
            );
            api.call(&ChangePassword::new("a", "b").with_token(blank))
                .unwrap();

            let seen = seen.lock().unwrap();
            let auth: Vec<_> = seen[0]
                .headers
                .iter()
                .filter(|(k, _)| k == "authorization")
                .collect();
            assert_eq!(auth.len(), 1, "token {blank:?}");
            assert_eq!(auth[0].1, "Bearer stored");
        }
    }

    #[test]
    fn transport_failure_surfaces_as_network_error() {
        let (api, _) = api_with(Arc::new(NoToken), Err("connection refused".to_string()));
        let err = api.call(&ListBooks::default()).unwrap_err();
        assert!(matches!(err, ApiError::Network(ref m) if m == "connection refused"));
    }

    #[test]
    fn connect_rejects_invalid_config() {
        let err = ReaderApi::connect(&ClientConfig::new(""), Arc::new(NoToken)).unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }
}
