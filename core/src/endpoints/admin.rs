//! Admin management of books and categories.
//!
//! Soft deletes move a record to the trash (`deletedAt` set) where it can be
//! listed and restored; hard deletes remove it permanently. All mutations
//! here are marked [`InconsistentShape`].

use super::{segment, Endpoint, InconsistentShape, Payload, Query};
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    Ack, Book, BookUpdate, Category, CategoryUpdate, Envelope, NewBook, NewCategory,
};

#[derive(Debug, Clone)]
pub struct CreateBook(pub NewBook);

impl Endpoint for CreateBook {
    type Response = Envelope<Book>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "create_book";

    fn path(&self) -> String {
        "api/admin/books".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateBook {
    pub id: String,
    pub update: BookUpdate,
}

impl UpdateBook {
    pub fn new(id: impl ToString, update: BookUpdate) -> Self {
        Self {
            id: id.to_string(),
            update,
        }
    }
}

impl Endpoint for UpdateBook {
    type Response = Envelope<Book>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const NAME: &'static str = "update_book";

    fn path(&self) -> String {
        format!("api/admin/books/{}", segment(&self.id))
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.update)
    }
}

/// Soft delete.
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub id: String,
}

impl DeleteBook {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for DeleteBook {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "delete_book";

    fn path(&self) -> String {
        format!("api/admin/books/{}", segment(&self.id))
    }
}

#[derive(Debug, Clone)]
pub struct HardDeleteBook {
    pub id: String,
}

impl HardDeleteBook {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for HardDeleteBook {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "hard_delete_book";

    fn path(&self) -> String {
        format!("api/admin/books/{}/permanent", segment(&self.id))
    }
}

#[derive(Debug, Clone)]
pub struct RestoreBook {
    pub id: String,
}

impl RestoreBook {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for RestoreBook {
    type Response = Envelope<Book>;
    const METHOD: HttpMethod = HttpMethod::Patch;
    const NAME: &'static str = "restore_book";

    fn path(&self) -> String {
        format!("api/admin/books/{}/restore", segment(&self.id))
    }
}

/// Books currently in the trash.
#[derive(Debug, Clone, Default)]
pub struct ListDeletedBooks {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl Endpoint for ListDeletedBooks {
    type Response = Envelope<Vec<Book>>;
    const METHOD: HttpMethod = HttpMethod::Get;
    const NAME: &'static str = "list_deleted_books";

    fn path(&self) -> String {
        "api/admin/books/deleted".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        Query::new()
            .opt("page", self.page)
            .opt("limit", self.limit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategory(pub NewCategory);

impl Endpoint for CreateCategory {
    type Response = Envelope<Category>;
    const METHOD: HttpMethod = HttpMethod::Post;
    const NAME: &'static str = "create_category";

    fn path(&self) -> String {
        "api/admin/categories".to_string()
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub id: String,
    pub update: CategoryUpdate,
}

impl UpdateCategory {
    pub fn new(id: impl ToString, update: CategoryUpdate) -> Self {
        Self {
            id: id.to_string(),
            update,
        }
    }
}

impl Endpoint for UpdateCategory {
    type Response = Envelope<Category>;
    const METHOD: HttpMethod = HttpMethod::Put;
    const NAME: &'static str = "update_category";

    fn path(&self) -> String {
        format!("api/admin/categories/{}", segment(&self.id))
    }

    fn payload(&self) -> Result<Payload, ApiError> {
        Payload::json(&self.update)
    }
}

/// Soft delete.
#[derive(Debug, Clone)]
pub struct DeleteCategory {
    pub id: String,
}

impl DeleteCategory {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for DeleteCategory {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "delete_category";

    fn path(&self) -> String {
        format!("api/admin/categories/{}", segment(&self.id))
    }
}

#[derive(Debug, Clone)]
pub struct HardDeleteCategory {
    pub id: String,
}

impl HardDeleteCategory {
    pub fn new(id: impl ToString) -> Self {
        Self { id: id.to_string() }
    }
}

impl Endpoint for HardDeleteCategory {
    type Response = Ack;
    const METHOD: HttpMethod = HttpMethod::Delete;
    const NAME: &'static str = "hard_delete_category";

    fn path(&self) -> String {
        format!("api/admin/categories/{}/permanent", segment(&self.id))
    }
}

impl InconsistentShape for CreateBook {}
impl InconsistentShape for UpdateBook {}
impl InconsistentShape for DeleteBook {}
impl InconsistentShape for HardDeleteBook {}
impl InconsistentShape for RestoreBook {}
impl InconsistentShape for ListDeletedBooks {}
impl InconsistentShape for CreateCategory {}
impl InconsistentShape for UpdateCategory {}
impl InconsistentShape for DeleteCategory {}
impl InconsistentShape for HardDeleteCategory {}
