use super::{Endpoint, InconsistentShape, Query};
use crate::http::HttpMethod;
use crate::types::{Category, Envelope};

/// List categories, optionally filtered by status and paged.
///
/// A `None` status asks for every status. The list route has returned
/// non-envelope bodies in the past; use `Raw(ListCategories::all())` to
/// parse it by hand.
#[derive(Debug, Clone, Default)]
pub struct ListCategories {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListCategories {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    pub fn paged(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }
}

impl Endpoint for ListCategories {
    type Response = Envelope<Vec<Category>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_categories";

    fn path(&self) -> String {
        "api/categories".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("status", self.status.as_deref())
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}

impl InconsistentShape for ListCategories {}
