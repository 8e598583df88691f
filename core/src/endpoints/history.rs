//! Reading history and per-book bookmarks.

use std::fmt;

use super::{segment, Endpoint, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Ack, Bookmark, Envelope, ReadingHistory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        })
    }
}

/// A user's reading history, paged and sorted server-side.
#[derive(Debug, Clone)]
pub struct ListHistory {
    pub user_id: String,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ListHistory {
    pub fn new(user_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            page: None,
            limit: None,
            sort_by: None,
            sort_order: None,
        }
    }

    pub fn paged(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn sorted(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }
}

impl Endpoint for ListHistory {
    type Response = Envelope<Vec<ReadingHistory>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_history";

    fn path(&self) -> String {
        format!("api/history/{}", segment(&self.user_id))
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("page", self.page)
            .opt("limit", self.limit)
            .opt("sortBy", self.sort_by.as_deref())
            .opt("sortOrder", self.sort_order)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GetBookmark {
    pub user_id: String,
    pub book_id: String,
}

impl GetBookmark {
    pub fn new(user_id: impl ToString, book_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

impl Endpoint for GetBookmark {
    type Response = Envelope<Bookmark>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "get_bookmark";

    fn path(&self) -> String {
        format!(
            "api/history/bookmark/{}/{}",
            segment(&self.user_id),
            segment(&self.book_id)
        )
    }
}

/// Record the chapter a user stopped at. Sent form-encoded.
#[derive(Debug, Clone)]
pub struct SaveBookmark {
    pub user_id: String,
    pub book_id: String,
    pub chapter_id: String,
}

impl SaveBookmark {
    pub fn new(user_id: impl ToString, book_id: impl ToString, chapter_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
            chapter_id: chapter_id.to_string(),
        }
    }
}

impl Endpoint for SaveBookmark {
    type Response = Envelope<Bookmark>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "save_bookmark";

    fn path(&self) -> String {
        "api/history/bookmark".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Ok(Payload::Form(vec![
            ("userId", self.user_id.clone()),
            ("bookId", self.book_id.clone()),
            ("chapterId", self.chapter_id.clone()),
        ]))
    }
}

#[derive(Debug, Clone)]
pub struct DeleteBookmark {
    pub user_id: String,
    pub book_id: String,
}

impl DeleteBookmark {
    pub fn new(user_id: impl ToString, book_id: impl ToString) -> Self {
        Self {
            user_id: user_id.to_string(),
            book_id: book_id.to_string(),
        }
    }
}

impl Endpoint for DeleteBookmark {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "delete_bookmark";

    fn path(&self) -> String {
        format!(
            "api/history/bookmark/{}/{}",
            segment(&self.user_id),
            segment(&self.book_id)
        )
    }
}
