//! Process-wide client handle.
//!
//! Call [`init`] once at startup; afterwards [`client`] returns the same
//! `&'static ReaderApi` for the rest of the process. There is no lazy
//! construction and no way to rebuild the handle: picking up a new
//! configuration requires a new process.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use reader_core::credentials::{JsonFileCredentialStore, StoredToken};
//! use reader_core::endpoints::LatestBooks;
//! use reader_core::{factory, ClientConfig};
//!
//! let tokens = StoredToken::new(JsonFileCredentialStore::new("prefs.json"));
//! factory::init(ClientConfig::from_env()?, Arc::new(tokens))?;
//!
//! let latest = factory::client()?.call(&LatestBooks { limit: Some(10) })?;
//! # Ok::<(), reader_core::ApiError>(())
//! ```

use std::sync::{Arc, OnceLock};

use crate::api::ReaderApi;
use crate::config::ClientConfig;
use crate::credentials::TokenProvider;
use crate::error::ApiError;

static CLIENT: OnceLock<ReaderApi> = OnceLock::new();

/// Build the shared handle over the real network.
///
/// # Errors
///
/// `Configuration` if `config` does not validate, `AlreadyInitialized` on
/// any call after the first successful one.
pub fn init(
    config: ClientConfig,
    tokens: Arc<dyn TokenProvider>,
) -> Result<&'static ReaderApi, ApiError> {
    let api = ReaderApi::connect(&config, tokens)?;
    install(api)
}

/// Install a prebuilt handle, e.g. one over a custom transport.
pub fn install(api: ReaderApi) -> Result<&'static ReaderApi, ApiError> {
    CLIENT.set(api).map_err(|_| ApiError::AlreadyInitialized)?;
    let api = client()?;
    tracing::info!(base_url = api.client().base_url(), "reader client initialized");
    Ok(api)
}

/// The shared handle.
pub fn client() -> Result<&'static ReaderApi, ApiError> {
    CLIENT.get().ok_or(ApiError::NotInitialized)
}
