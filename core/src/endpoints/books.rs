//! Reader-facing book routes, plus the admin listing.

use super::{segment, Endpoint, InconsistentShape, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Book, BookIds, Envelope};

/// List books, filtered and paged. Every filter is optional.
#[derive(Debug, Clone, Default)]
pub struct ListBooks {
    pub category: Option<String>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Endpoint for ListBooks {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_books";

    fn path(&self) -> String {
        "api/books".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("category", self.category.as_deref())
            .opt("status", self.status.as_deref())
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}

/// Fetch several books in one round-trip, e.g. to hydrate a favorites list.
#[derive(Debug, Clone)]
pub struct GetBooksByIds {
    pub ids: Vec<String>,
}

impl GetBooksByIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            ids: ids.into_iter().map(|id| id.to_string()).collect(),
        }
    }
}

impl Endpoint for GetBooksByIds {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "get_books_by_ids";

    fn path(&self) -> String {
        "api/books/batch".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&BookIds {
            ids: self.ids.clone(),
        })
    }
}

/// Admin view of the catalogue, including drafts and hidden books.
#[derive(Debug, Clone, Default)]
pub struct ListAdminBooks {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Endpoint for ListAdminBooks {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_admin_books";

    fn path(&self) -> String {
        "api/admin/books".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("status", self.status.as_deref())
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}

impl InconsistentShape for ListAdminBooks {}

#[derive(Debug, Clone)]
pub struct SearchBooks {
    pub query: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SearchBooks {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: None,
            limit: None,
        }
    }
}

impl Endpoint for SearchBooks {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "search_books";

    fn path(&self) -> String {
        "api/books/search".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .put("q", &self.query)
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GetBook {
    pub id: String,
}

impl GetBook {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for GetBook {
    type Response = Envelope<Book>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_book";

    fn path(&self) -> String {
        format!("api/books/{}", segment(&self.id))
    }
}

/// Most recently added books, newest first.
#[derive(Debug, Clone, Default)]
pub struct LatestBooks {
    pub limit: Option<u32>,
}

impl Endpoint for LatestBooks {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "latest_books";

    fn path(&self) -> String {
        "api/books/latest".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new().opt("limit", self.limit).finish()
    }
}
