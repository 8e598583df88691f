//! The endpoint catalog.
//!
//! # Design
//! Each remote capability is one struct implementing [`Endpoint`]: the
//! struct's fields are the call's parameters, and the trait impl declares the
//! method, path template, query string, payload and response shape. Changing
//! a backend route means editing exactly one impl.
//!
//! Some admin routes have been seen returning bodies that do not match the
//! envelope they are documented to return. Endpoints on those routes carry
//! the [`InconsistentShape`] marker, which unlocks the [`Raw`] and [`Loose`]
//! wrappers: the same request, decoded as plain text or as an untyped
//! envelope.

mod admin;
mod auth;
mod books;
mod categories;
mod epub;
mod favorites;
mod feedback;
mod history;
mod users;

pub use admin::{
    CreateBook, CreateCategory, DeleteBook, DeleteCategory, HardDeleteBook, HardDeleteCategory,
    ListDeletedBooks, RestoreBook, UpdateBook, UpdateCategory,
};
pub use auth::{
    ChangePassword, ForgotPassword, Login, Logout, Register, ResendOtp, ResetPassword, VerifyOtp,
};
pub use books::{GetBook, GetBooksByIds, LatestBooks, ListAdminBooks, ListBooks, SearchBooks};
pub use categories::ListCategories;
pub use epub::{GetChapterContent, GetEpubChapters, GetEpubMetadata, ValidateEpubUrl};
pub use favorites::{AddFavorite, ListFavorites, RemoveFavorite};
pub use feedback::{
    CreateFeedback, DeleteFeedback, GetFeedback, ListAllFeedback, ListMyFeedback, UpdateFeedback,
};
pub use history::{DeleteBookmark, GetBookmark, ListHistory, SaveBookmark, SortOrder};
pub use users::{FindUserByEmail, GetProfile, UpdateProfile};

use serde::Serialize;

use crate::codec::{RawBody, ResponseShape};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::LooseEnvelope;

/// A typed remote call.
pub trait Endpoint {
    /// The declared success shape. Used for decoding only.
    type Response: ResponseShape;

    const METHOD: HttpMethod;

    /// Short name used in logs.
    const NAME: &'static str;

    /// Path relative to the base URL, with path parameters substituted.
    fn path(&self) -> String;

    /// Query parameters, already stripped of absent values.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Ok(Payload::Empty)
    }

    /// Bearer token supplied by the caller. When set it is sent as-is and
    /// the stored token is not consulted.
    fn authorization(&self) -> Option<&str> {
        None
    }
}

/// Request body of an endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(String),
    Form(Vec<(&'static str, String)>),
}

impl Payload {
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        serde_json::to_string(value)
            .map(Payload::Json)
            .map_err(|e| ApiError::Serialization(e.to_string()))
    }
}

/// Marks endpoints on routes whose response body is known to drift from
/// the declared envelope.
pub trait InconsistentShape: Endpoint {}

/// Sends `E`'s request and returns the body undecoded.
#[derive(Debug, Clone)]
pub struct Raw<E>(pub E);

/// Sends `E`'s request and decodes the envelope with untyped `data`.
#[derive(Debug, Clone)]
pub struct Loose<E>(pub E);

impl<E: InconsistentShape> Endpoint for Raw<E> {
    type Response = RawBody;
    const METHOD: HttpMethod = E::METHOD;
    const NAME: &'static str = E::NAME;

    fn path(&self) -> String {
        self.0.path()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.0.query()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        self.0.payload()
    }

    fn authorization(&self) -> Option<&str> {
        self.0.authorization()
    }
}

impl<E: InconsistentShape> Endpoint for Loose<E> {
    type Response = LooseEnvelope;
    const METHOD: HttpMethod = E::METHOD;
    const NAME: &'static str = E::NAME;

    fn path(&self) -> String {
        self.0.path()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.0.query()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        self.0.payload()
    }

    fn authorization(&self) -> Option<&str> {
        self.0.authorization()
    }
}

/// Percent-encode a path parameter so ids containing `/` or spaces stay one
/// segment.
pub(crate) fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Collects query pairs in declaration order, dropping `None`s.
#[derive(Debug, Default)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn put(mut self, key: &'static str, value: impl ToString) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub(crate) fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.put(key, v),
            None => self,
        }
    }

    pub(crate) fn finish(self) -> Vec<(&'static str, String)> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_escapes_reserved_characters() {
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
        assert_eq!(segment("42"), "42");
    }

    #[test]
    fn query_drops_absent_values_and_keeps_order() {
        let pairs = Query::new()
            .opt("category", Some("fiction"))
            .opt::<&str>("status", None)
            .put("page", 1)
            .finish();
        assert_eq!(
            pairs,
            vec![("category", "fiction".to_string()), ("page", "1".to_string())]
        );
    }

    #[test]
    fn raw_and_loose_reuse_the_wrapped_request() {
        let inner = ListCategories::with_status("active");
        assert_eq!(Raw(inner.clone()).path(), inner.path());
        assert_eq!(Loose(inner.clone()).query(), inner.query());
        assert_eq!(<Raw<ListCategories> as Endpoint>::METHOD, HttpMethod::Get);
    }
}
