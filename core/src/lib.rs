//! Typed client for the reading-app backend.
//!
//! # Overview
//! Every remote capability (auth, books, categories, favorites, reading
//! history, EPUB transport, profile, feedback, admin CRUD) is an
//! [`Endpoint`] value. [`ReaderClient`] turns endpoints into plain
//! `HttpRequest`s and plain `HttpResponse`s back into typed envelopes
//! without touching the network. [`ReaderApi`] adds bearer-token injection,
//! debug-build header logging and a blocking transport on top, and
//! [`factory`] holds the one shared handle a process uses.
//!
//! # Design
//! - `ReaderClient` is stateless; it holds only `base_url`.
//! - Tokens come from an injected [`TokenProvider`] and are read per
//!   request, never cached.
//! - Decoding is lenient; a 2xx envelope with `success: false` is returned,
//!   not turned into an error.
//! - No retry, no backoff: one call is one exchange.

pub mod api;
pub mod client;
pub mod codec;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod error;
pub mod factory;
pub mod http;
pub mod interceptor;
pub mod transport;
pub mod types;

pub use api::ReaderApi;
pub use client::ReaderClient;
pub use codec::{RawBody, ResponseShape};
pub use config::ClientConfig;
pub use credentials::{CredentialStore, TokenProvider};
pub use endpoints::{Endpoint, Loose, Raw};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{Ack, Envelope, LooseEnvelope, Pagination};
