//! In-memory data for the mock backend.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Every OTP the mock sends is this code.
pub const OTP_CODE: &str = "123456";

pub const ADMIN_EMAIL: &str = "admin@reader.test";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const READER_EMAIL: &str = "reader@reader.test";
pub const READER_PASSWORD: &str = "reader123";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub role: String,
    pub is_verified: bool,
    #[serde(skip)]
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: String,
    #[serde(skip)]
    pub deleted: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epub_url: Option<String>,
    pub category: String,
    pub category_id: u64,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub user_id: String,
    pub book_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<Book>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub user_id: String,
    pub book_id: String,
    pub chapter_id: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub chapter_id: String,
    pub last_read_at: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: u64,
    pub user_id: String,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    pub status: String,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: HashMap<String, User>,
    /// token -> user id
    pub sessions: HashMap<String, String>,
    pub categories: BTreeMap<u64, Category>,
    pub books: BTreeMap<u64, Book>,
    pub favorites: Vec<Favorite>,
    pub bookmarks: HashMap<(String, String), Bookmark>,
    pub history: Vec<HistoryEntry>,
    pub feedback: BTreeMap<u64, Feedback>,
    next_id: u64,
    clock: u64,
}

pub type Db = Arc<RwLock<Store>>;

impl Store {
    /// Two users (one admin), three categories and a handful of books.
    pub fn seeded() -> Self {
        let mut store = Self::default();
        store.insert_user("Admin", ADMIN_EMAIL, ADMIN_PASSWORD, "admin", true);
        store.insert_user("Reader", READER_EMAIL, READER_PASSWORD, "user", true);

        let fiction = store.insert_category("Fiction", "active");
        let science = store.insert_category("Science", "active");
        store.insert_category("Archive", "inactive");

        store.insert_book("Dune", "Frank Herbert", fiction, "active");
        store.insert_book("Emma", "Jane Austen", fiction, "active");
        store.insert_book("Cosmos", "Carl Sagan", science, "active");
        store.insert_book("Draft Notes", "Staff", science, "draft");
        store
    }

    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Monotonic fake timestamp, so "latest" ordering is deterministic.
    pub fn now(&mut self) -> String {
        self.clock += 1;
        format!(
            "2024-01-01T{:02}:{:02}:{:02}Z",
            self.clock / 3600 % 24,
            self.clock / 60 % 60,
            self.clock % 60
        )
    }

    pub fn insert_user(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
        verified: bool,
    ) -> User {
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            avatar: None,
            role: role.to_string(),
            is_verified: verified,
            password: password.to_string(),
        };
        self.users.insert(user.id.clone(), user.clone());
        user
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email.eq_ignore_ascii_case(email))
    }

    pub fn issue_token(&mut self, user_id: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), user_id.to_string());
        token
    }

    pub fn insert_category(&mut self, name: &str, status: &str) -> u64 {
        let id = self.next_id();
        self.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                description: None,
                status: status.to_string(),
                deleted: false,
            },
        );
        id
    }

    pub fn insert_book(&mut self, title: &str, author: &str, category_id: u64, status: &str) -> u64 {
        let id = self.next_id();
        let created_at = self.now();
        let category = self
            .categories
            .get(&category_id)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        self.books.insert(
            id,
            Book {
                id,
                title: title.to_string(),
                author: author.to_string(),
                description: None,
                cover_image: None,
                epub_url: Some(format!("https://cdn.reader.test/books/{id}.epub")),
                category,
                category_id,
                status: status.to_string(),
                created_at,
                deleted_at: None,
            },
        );
        id
    }

    /// Books that are not in the trash.
    pub fn live_books(&self) -> impl Iterator<Item = &Book> {
        self.books.values().filter(|b| b.deleted_at.is_none())
    }
}

pub fn new_db() -> Db {
    Arc::new(RwLock::new(Store::seeded()))
}
