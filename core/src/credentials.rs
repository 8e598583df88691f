//! Where the bearer token comes from.
//!
//! The client never writes credentials. It asks a [`TokenProvider`] for the
//! current token on every request, so a token refreshed by the host app is
//! picked up on the next call without rebuilding anything.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Key under which the access token is stored.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Namespace the app keeps its auth preferences under.
pub const DEFAULT_NAMESPACE: &str = "reader_prefs";

/// Yields the token to send, if any. Evaluated per request.
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

impl<F> TokenProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn access_token(&self) -> Option<String> {
        self()
    }
}

/// Never supplies a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenProvider for NoToken {
    fn access_token(&self) -> Option<String> {
        None
    }
}

/// A fixed token, for scripts and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenProvider for StaticToken {
    fn access_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Read-only view of a namespaced key-value store.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads [`ACCESS_TOKEN_KEY`] from a [`CredentialStore`] on every call.
#[derive(Debug, Clone)]
pub struct StoredToken<S> {
    store: S,
}

impl<S: CredentialStore> StoredToken<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: CredentialStore> TokenProvider for StoredToken<S> {
    fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }
}

/// In-process store. The host app owns writes.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.into());
        }
    }

    pub fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

impl<S: CredentialStore> CredentialStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }
}

/// A JSON preferences file of the form
/// `{"<namespace>": {"<key>": "<value>", ...}, ...}`.
///
/// The file is re-read on every lookup. A missing or unreadable file means
/// "no value".
#[derive(Debug, Clone)]
pub struct JsonFileCredentialStore {
    path: PathBuf,
    namespace: String,
}

impl JsonFileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_namespace(path, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(path: impl Into<PathBuf>, namespace: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            namespace: namespace.into(),
        }
    }
}

impl CredentialStore for JsonFileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                tracing::trace!(path = %self.path.display(), error = %e, "credential file not readable");
                return None;
            }
        };
        let prefs: serde_json::Value = match serde_json::from_str(&text) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "credential file is not valid JSON");
                return None;
            }
        };
        prefs
            .get(&self.namespace)?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn stored_token_reads_on_every_call() {
        let store = std::sync::Arc::new(MemoryCredentialStore::new());
        let provider = StoredToken::new(store.clone());
        assert_eq!(provider.access_token(), None);

        store.set(ACCESS_TOKEN_KEY, "first");
        assert_eq!(provider.access_token().as_deref(), Some("first"));

        store.set(ACCESS_TOKEN_KEY, "refreshed");
        assert_eq!(provider.access_token().as_deref(), Some("refreshed"));

        store.remove(ACCESS_TOKEN_KEY);
        assert_eq!(provider.access_token(), None);
    }

    #[test]
    fn closures_are_providers() {
        let provider = || Some("from-closure".to_string());
        assert_eq!(provider.access_token().as_deref(), Some("from-closure"));
        assert_eq!(NoToken.access_token(), None);
    }

    #[test]
    fn json_file_store_reads_namespaced_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"reader_prefs": {{"access_token": "abc"}}, "other": {{"access_token": "nope"}}}}"#
        )
        .unwrap();

        let store = JsonFileCredentialStore::new(file.path());
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("abc"));

        let store = JsonFileCredentialStore::with_namespace(file.path(), "missing");
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    }

    #[test]
    fn json_file_store_tolerates_missing_and_corrupt_files() {
        let store = JsonFileCredentialStore::new("/nonexistent/reader/prefs.json");
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let store = JsonFileCredentialStore::new(file.path());
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
    }
}
