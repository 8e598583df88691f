use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::state::{Bookmark, Db, Favorite, Feedback, HistoryEntry, User, OTP_CODE};
use crate::{created, done, fail, ok, page};

type Reply = Result<Response, Response>;

const DEFAULT_LIMIT: usize = 20;

// ---------------------------------------------------------------------------
// Auth helpers
// ---------------------------------------------------------------------------

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn current_user(db: &Db, headers: &HeaderMap) -> Result<User, Response> {
    let unauthorized = || fail(StatusCode::UNAUTHORIZED, "Unauthorized");
    let token = bearer(headers).ok_or_else(unauthorized)?;
    let store = db.read().await;
    let user_id = store.sessions.get(token).ok_or_else(unauthorized)?;
    store.users.get(user_id).cloned().ok_or_else(unauthorized)
}

async fn current_admin(db: &Db, headers: &HeaderMap) -> Result<User, Response> {
    let user = current_user(db, headers).await?;
    if user.role != "admin" {
        return Err(fail(StatusCode::FORBIDDEN, "Admin access required"));
    }
    Ok(user)
}

fn parse_id(raw: &str) -> Result<u64, Response> {
    raw.parse()
        .map_err(|_| fail(StatusCode::BAD_REQUEST, "Invalid id"))
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct SignUp {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct OtpInput {
    email: String,
    otp: String,
}

#[derive(Deserialize)]
pub struct EmailInput {
    email: String,
}

#[derive(Deserialize)]
pub struct Credentials {
    email: String,
    password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetInput {
    email: String,
    otp: String,
    new_password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInput {
    current_password: String,
    new_password: String,
}

pub(crate) async fn register(State(db): State<Db>, Json(input): Json<SignUp>) -> Reply {
    let mut store = db.write().await;
    if store.user_by_email(&input.email).is_some() {
        return Err(fail(StatusCode::CONFLICT, "Email already registered"));
    }
    let user = store.insert_user(&input.name, &input.email, &input.password, "user", false);
    tracing::info!(email = %user.email, "registered user, OTP sent");
    Ok(created("OTP sent to email", user))
}

pub(crate) async fn verify_otp(State(db): State<Db>, Json(input): Json<OtpInput>) -> Reply {
    let mut store = db.write().await;
    let user_id = store
        .user_by_email(&input.email)
        .map(|u| u.id.clone())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    if input.otp != OTP_CODE {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid OTP"));
    }
    let user = store.users.get_mut(&user_id).map(|u| {
        u.is_verified = true;
        u.clone()
    });
    let token = store.issue_token(&user_id);
    Ok(ok("Email verified", json!({ "accessToken": token, "user": user })))
}

pub(crate) async fn resend_otp(State(db): State<Db>, Json(input): Json<EmailInput>) -> Reply {
    let store = db.read().await;
    if store.user_by_email(&input.email).is_none() {
        return Err(fail(StatusCode::NOT_FOUND, "User not found"));
    }
    Ok(done("OTP resent"))
}

pub(crate) async fn login(State(db): State<Db>, Json(input): Json<Credentials>) -> Reply {
    let mut store = db.write().await;
    let user = store
        .user_by_email(&input.email)
        .filter(|u| u.password == input.password)
        .cloned()
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Invalid email or password"))?;
    if !user.is_verified {
        return Err(fail(StatusCode::FORBIDDEN, "Email not verified"));
    }
    let token = store.issue_token(&user.id);
    tracing::info!(email = %user.email, "login");
    Ok(ok("Login successful", json!({ "accessToken": token, "user": user })))
}

/// Answers the same whether or not the account exists.
pub(crate) async fn forgot_password(Json(_): Json<EmailInput>) -> Reply {
    Ok(done("If the account exists, an OTP has been sent"))
}

pub(crate) async fn reset_password(State(db): State<Db>, Json(input): Json<ResetInput>) -> Reply {
    if input.otp != OTP_CODE {
        return Err(fail(StatusCode::BAD_REQUEST, "Invalid OTP"));
    }
    let mut store = db.write().await;
    let user_id = store
        .user_by_email(&input.email)
        .map(|u| u.id.clone())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    if let Some(user) = store.users.get_mut(&user_id) {
        user.password = input.new_password;
    }
    Ok(done("Password reset"))
}

pub(crate) async fn change_password(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<ChangeInput>,
) -> Reply {
    let user = current_user(&db, &headers).await?;
    if user.password != input.current_password {
        return Err(fail(StatusCode::BAD_REQUEST, "Current password is incorrect"));
    }
    let mut store = db.write().await;
    if let Some(user) = store.users.get_mut(&user.id) {
        user.password = input.new_password;
    }
    Ok(done("Password changed"))
}

pub(crate) async fn logout(State(db): State<Db>, headers: HeaderMap) -> Reply {
    current_user(&db, &headers).await?;
    if let Some(token) = bearer(&headers) {
        db.write().await.sessions.remove(token);
    }
    Ok(done("Logged out"))
}

// ---------------------------------------------------------------------------
// Categories & books
// ---------------------------------------------------------------------------

#[derive(Deserialize, Default)]
pub struct Listing {
    category: Option<String>,
    status: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
}

pub(crate) async fn list_categories(State(db): State<Db>, Query(q): Query<Listing>) -> Reply {
    let store = db.read().await;
    let items: Vec<_> = store
        .categories
        .values()
        .filter(|c| !c.deleted)
        .filter(|c| q.status.as_deref().is_none_or(|s| c.status == s))
        .cloned()
        .collect();
    Ok(page(
        "Categories",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(100),
    ))
}

pub(crate) async fn list_books(State(db): State<Db>, Query(q): Query<Listing>) -> Reply {
    let store = db.read().await;
    let items: Vec<_> = store
        .live_books()
        .filter(|b| {
            q.category
                .as_deref()
                .is_none_or(|c| b.category.eq_ignore_ascii_case(c))
        })
        .filter(|b| q.status.as_deref().is_none_or(|s| b.status == s))
        .cloned()
        .collect();
    Ok(page(
        "Books",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

#[derive(Deserialize)]
pub struct IdList {
    ids: Vec<String>,
}

pub(crate) async fn books_by_ids(State(db): State<Db>, Json(input): Json<IdList>) -> Reply {
    let store = db.read().await;
    let items: Vec<_> = input
        .ids
        .iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .filter_map(|id| store.books.get(&id))
        .filter(|b| b.deleted_at.is_none())
        .cloned()
        .collect();
    Ok(ok("Books", items))
}

#[derive(Deserialize)]
pub struct Search {
    q: String,
    page: Option<usize>,
    limit: Option<usize>,
}

pub(crate) async fn search_books(State(db): State<Db>, Query(s): Query<Search>) -> Reply {
    let needle = s.q.to_lowercase();
    let store = db.read().await;
    let items: Vec<_> = store
        .live_books()
        .filter(|b| {
            b.title.to_lowercase().contains(&needle) || b.author.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect();
    Ok(page(
        "Search results",
        items,
        s.page.unwrap_or(1),
        s.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

#[derive(Deserialize)]
pub struct Limit {
    limit: Option<usize>,
}

pub(crate) async fn latest_books(State(db): State<Db>, Query(l): Query<Limit>) -> Reply {
    let store = db.read().await;
    let mut items: Vec<_> = store
        .live_books()
        .filter(|b| b.status == "active")
        .cloned()
        .collect();
    items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    items.truncate(l.limit.unwrap_or(10));
    Ok(ok("Latest books", items))
}

pub(crate) async fn get_book(State(db): State<Db>, Path(id): Path<String>) -> Reply {
    let id = parse_id(&id)?;
    let store = db.read().await;
    store
        .books
        .get(&id)
        .filter(|b| b.deleted_at.is_none())
        .map(|b| ok("Book", b))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Book not found"))
}

// ---------------------------------------------------------------------------
// Favorites & history
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteInput {
    user_id: String,
    book_id: String,
}

pub(crate) async fn list_favorites(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Reply {
    current_user(&db, &headers).await?;
    let store = db.read().await;
    let items: Vec<_> = store
        .favorites
        .iter()
        .filter(|f| f.user_id == user_id)
        .map(|f| Favorite {
            book: store.books.get(&f.book_id).cloned(),
            ..f.clone()
        })
        .collect();
    Ok(ok("Favorites", items))
}

pub(crate) async fn add_favorite(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<FavoriteInput>,
) -> Reply {
    current_user(&db, &headers).await?;
    let book_id = parse_id(&input.book_id)?;
    let mut store = db.write().await;
    if !store.books.contains_key(&book_id) {
        return Err(fail(StatusCode::NOT_FOUND, "Book not found"));
    }
    if let Some(existing) = store
        .favorites
        .iter()
        .find(|f| f.user_id == input.user_id && f.book_id == book_id)
    {
        return Ok(ok("Already in favorites", existing.clone()));
    }
    let favorite = Favorite {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: input.user_id,
        book_id,
        book: None,
    };
    store.favorites.push(favorite.clone());
    Ok(created("Added to favorites", favorite))
}

pub(crate) async fn remove_favorite(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((user_id, book_id)): Path<(String, String)>,
) -> Reply {
    current_user(&db, &headers).await?;
    let book_id = parse_id(&book_id)?;
    let mut store = db.write().await;
    let before = store.favorites.len();
    store
        .favorites
        .retain(|f| !(f.user_id == user_id && f.book_id == book_id));
    if store.favorites.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Favorite not found"));
    }
    Ok(done("Removed from favorites"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    page: Option<usize>,
    limit: Option<usize>,
    sort_by: Option<String>,
    sort_order: Option<String>,
}

pub(crate) async fn list_history(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> Reply {
    current_user(&db, &headers).await?;
    let store = db.read().await;
    let mut items: Vec<HistoryEntry> = store
        .history
        .iter()
        .filter(|h| h.user_id == user_id)
        .cloned()
        .collect();
    // Only `lastReadAt` is sortable.
    if q.sort_by.as_deref().is_none_or(|s| s == "lastReadAt") {
        items.sort_by(|a, b| a.last_read_at.cmp(&b.last_read_at));
        if q.sort_order.as_deref() != Some("asc") {
            items.reverse();
        }
    }
    Ok(page(
        "History",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkInput {
    user_id: String,
    book_id: String,
    chapter_id: String,
}

pub(crate) async fn save_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Form(input): Form<BookmarkInput>,
) -> Reply {
    current_user(&db, &headers).await?;
    let mut store = db.write().await;
    let updated_at = store.now();
    let bookmark = Bookmark {
        user_id: input.user_id.clone(),
        book_id: input.book_id.clone(),
        chapter_id: input.chapter_id.clone(),
        updated_at: updated_at.clone(),
    };
    store
        .bookmarks
        .insert((input.user_id.clone(), input.book_id.clone()), bookmark.clone());

    let existing = store
        .history
        .iter()
        .position(|h| h.user_id == input.user_id && h.book_id == input.book_id);
    match existing {
        Some(i) => {
            let entry = &mut store.history[i];
            entry.chapter_id = input.chapter_id;
            entry.last_read_at = updated_at;
        }
        None => store.history.push(HistoryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: input.user_id,
            book_id: input.book_id,
            chapter_id: input.chapter_id,
            last_read_at: updated_at,
        }),
    }
    Ok(ok("Bookmark saved", bookmark))
}

pub(crate) async fn get_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<(String, String)>,
) -> Reply {
    current_user(&db, &headers).await?;
    let store = db.read().await;
    store
        .bookmarks
        .get(&key)
        .map(|b| ok("Bookmark", b))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Bookmark not found"))
}

pub(crate) async fn delete_bookmark(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<(String, String)>,
) -> Reply {
    current_user(&db, &headers).await?;
    let mut store = db.write().await;
    store
        .bookmarks
        .remove(&key)
        .map(|_| done("Bookmark deleted"))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Bookmark not found"))
}

// ---------------------------------------------------------------------------
// EPUB
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpubQuery {
    url: String,
    chapter_id: Option<String>,
}

fn is_epub(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://")) && url.ends_with(".epub")
}

const CHAPTERS: [&str; 3] = ["Prologue", "The Journey", "Epilogue"];

pub(crate) async fn validate_epub(Json(input): Json<EpubQuery>) -> Reply {
    let valid = is_epub(&input.url);
    let reason = (!valid).then_some("URL does not point to an .epub file");
    Ok(ok("Validated", json!({ "valid": valid, "reason": reason })))
}

pub(crate) async fn epub_metadata(Query(q): Query<EpubQuery>) -> Reply {
    if !is_epub(&q.url) {
        return Err(fail(StatusCode::BAD_REQUEST, "Not an EPUB URL"));
    }
    Ok(ok(
        "Metadata",
        json!({ "title": "Sample Book", "author": "Anonymous", "language": "en" }),
    ))
}

pub(crate) async fn epub_chapters(Query(q): Query<EpubQuery>) -> Reply {
    if !is_epub(&q.url) {
        return Err(fail(StatusCode::BAD_REQUEST, "Not an EPUB URL"));
    }
    let chapters: Vec<_> = CHAPTERS
        .iter()
        .enumerate()
        .map(|(i, title)| json!({ "id": format!("ch{}", i + 1), "title": title, "order": i + 1 }))
        .collect();
    Ok(ok("Chapters", chapters))
}

pub(crate) async fn epub_chapter(Query(q): Query<EpubQuery>) -> Reply {
    if !is_epub(&q.url) {
        return Err(fail(StatusCode::BAD_REQUEST, "Not an EPUB URL"));
    }
    let chapter_id = q
        .chapter_id
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "chapterId is required"))?;
    let index = chapter_id
        .strip_prefix("ch")
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=CHAPTERS.len()).contains(n))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Chapter not found"))?;
    let title = CHAPTERS[index - 1];
    Ok(ok(
        "Chapter",
        json!({
            "chapterId": chapter_id,
            "title": title,
            "content": format!("<h1>{title}</h1><p>Lorem ipsum.</p>"),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct ProfileInput {
    name: Option<String>,
    avatar: Option<String>,
}

pub(crate) async fn get_profile(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let user = current_user(&db, &headers).await?;
    Ok(ok("Profile", user))
}

pub(crate) async fn update_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ProfileInput>,
) -> Reply {
    let user = current_user(&db, &headers).await?;
    let mut store = db.write().await;
    let user = store
        .users
        .get_mut(&user.id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))?;
    if let Some(name) = input.name {
        user.name = name;
    }
    if input.avatar.is_some() {
        user.avatar = input.avatar;
    }
    Ok(ok("Profile updated", user.clone()))
}

pub(crate) async fn user_by_email(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(input): Query<EmailInput>,
) -> Reply {
    current_user(&db, &headers).await?;
    let store = db.read().await;
    store
        .user_by_email(&input.email)
        .map(|u| ok("User", u))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "User not found"))
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct FeedbackInput {
    subject: Option<String>,
    message: Option<String>,
    rating: Option<u8>,
    status: Option<String>,
}

pub(crate) async fn create_feedback(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<FeedbackInput>,
) -> Reply {
    let user = current_user(&db, &headers).await?;
    let (Some(subject), Some(message)) = (input.subject, input.message) else {
        return Err(fail(StatusCode::BAD_REQUEST, "subject and message are required"));
    };
    let mut store = db.write().await;
    let id = store.next_id();
    let feedback = Feedback {
        id,
        user_id: user.id,
        subject,
        message,
        rating: input.rating,
        status: "open".to_string(),
    };
    store.feedback.insert(id, feedback.clone());
    Ok(created("Feedback submitted", feedback))
}

pub(crate) async fn my_feedback(State(db): State<Db>, headers: HeaderMap) -> Reply {
    let user = current_user(&db, &headers).await?;
    let store = db.read().await;
    let items: Vec<_> = store
        .feedback
        .values()
        .filter(|f| f.user_id == user.id)
        .cloned()
        .collect();
    Ok(ok("Feedback", items))
}

/// Owners and admins may see or change a feedback entry.
async fn owned_feedback(db: &Db, headers: &HeaderMap, raw_id: &str) -> Result<u64, Response> {
    let user = current_user(db, headers).await?;
    let id = parse_id(raw_id)?;
    let store = db.read().await;
    let feedback = store
        .feedback
        .get(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Feedback not found"))?;
    if feedback.user_id != user.id && user.role != "admin" {
        return Err(fail(StatusCode::FORBIDDEN, "Not your feedback"));
    }
    Ok(id)
}

pub(crate) async fn get_feedback(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let id = owned_feedback(&db, &headers, &id).await?;
    let store = db.read().await;
    store
        .feedback
        .get(&id)
        .map(|f| ok("Feedback", f))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Feedback not found"))
}

pub(crate) async fn update_feedback(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<FeedbackInput>,
) -> Reply {
    let id = owned_feedback(&db, &headers, &id).await?;
    let mut store = db.write().await;
    let feedback = store
        .feedback
        .get_mut(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Feedback not found"))?;
    if let Some(subject) = input.subject {
        feedback.subject = subject;
    }
    if let Some(message) = input.message {
        feedback.message = message;
    }
    if input.rating.is_some() {
        feedback.rating = input.rating;
    }
    if let Some(status) = input.status {
        feedback.status = status;
    }
    Ok(ok("Feedback updated", feedback.clone()))
}

pub(crate) async fn delete_feedback(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    let id = owned_feedback(&db, &headers, &id).await?;
    db.write().await.feedback.remove(&id);
    Ok(done("Feedback deleted"))
}

pub(crate) async fn all_feedback(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(q): Query<Listing>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let store = db.read().await;
    let items: Vec<_> = store
        .feedback
        .values()
        .filter(|f| q.status.as_deref().is_none_or(|s| f.status == s))
        .cloned()
        .collect();
    Ok(page(
        "All feedback",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

// ---------------------------------------------------------------------------
// Admin: books
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    title: Option<String>,
    author: Option<String>,
    description: Option<String>,
    cover_image: Option<String>,
    epub_url: Option<String>,
    category_id: Option<String>,
    status: Option<String>,
}

pub(crate) async fn admin_books(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(q): Query<Listing>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let store = db.read().await;
    let items: Vec<_> = store
        .live_books()
        .filter(|b| q.status.as_deref().is_none_or(|s| b.status == s))
        .cloned()
        .collect();
    Ok(page(
        "Books",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

pub(crate) async fn create_book(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<BookInput>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let (Some(title), Some(author)) = (input.title, input.author) else {
        return Err(fail(StatusCode::BAD_REQUEST, "title and author are required"));
    };
    let category_id = match input.category_id.as_deref() {
        Some(raw) => parse_id(raw)?,
        None => 0,
    };
    let mut store = db.write().await;
    let id = store.insert_book(
        &title,
        &author,
        category_id,
        input.status.as_deref().unwrap_or("active"),
    );
    let book = store
        .books
        .get_mut(&id)
        .ok_or_else(|| fail(StatusCode::INTERNAL_SERVER_ERROR, "Insert failed"))?;
    book.description = input.description;
    book.cover_image = input.cover_image;
    if input.epub_url.is_some() {
        book.epub_url = input.epub_url;
    }
    tracing::info!(id, "book created");
    Ok(created("Book created", book.clone()))
}

pub(crate) async fn update_book(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<BookInput>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let category_id = input.category_id.as_deref().map(parse_id).transpose()?;
    let mut store = db.write().await;
    let category = category_id.and_then(|c| store.categories.get(&c).map(|c| c.name.clone()));
    let book = store
        .books
        .get_mut(&id)
        .filter(|b| b.deleted_at.is_none())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Book not found"))?;
    if let Some(title) = input.title {
        book.title = title;
    }
    if let Some(author) = input.author {
        book.author = author;
    }
    if input.description.is_some() {
        book.description = input.description;
    }
    if input.cover_image.is_some() {
        book.cover_image = input.cover_image;
    }
    if input.epub_url.is_some() {
        book.epub_url = input.epub_url;
    }
    if let Some(status) = input.status {
        book.status = status;
    }
    if let Some(category_id) = category_id {
        book.category_id = category_id;
        book.category = category.unwrap_or_default();
    }
    Ok(ok("Book updated", book.clone()))
}

pub(crate) async fn soft_delete_book(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let now = store.now();
    let book = store
        .books
        .get_mut(&id)
        .filter(|b| b.deleted_at.is_none())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Book not found"))?;
    book.deleted_at = Some(now);
    Ok(done("Book moved to trash"))
}

pub(crate) async fn hard_delete_book(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store
        .books
        .remove(&id)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Book not found"))?;
    store.favorites.retain(|f| f.book_id != id);
    Ok(done("Book permanently deleted"))
}

pub(crate) async fn restore_book(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let book = store
        .books
        .get_mut(&id)
        .filter(|b| b.deleted_at.is_some())
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Book not in trash"))?;
    book.deleted_at = None;
    Ok(ok("Book restored", book.clone()))
}

pub(crate) async fn deleted_books(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(q): Query<Listing>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let store = db.read().await;
    let items: Vec<_> = store
        .books
        .values()
        .filter(|b| b.deleted_at.is_some())
        .cloned()
        .collect();
    Ok(page(
        "Deleted books",
        items,
        q.page.unwrap_or(1),
        q.limit.unwrap_or(DEFAULT_LIMIT),
    ))
}

// ---------------------------------------------------------------------------
// Admin: categories
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CategoryInput {
    name: Option<String>,
    description: Option<String>,
    status: Option<String>,
}

/// The production backend wraps the created category in a one-element list
/// instead of returning the object; reproduced here.
pub(crate) async fn create_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CategoryInput>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let name = input
        .name
        .ok_or_else(|| fail(StatusCode::BAD_REQUEST, "name is required"))?;
    let mut store = db.write().await;
    let id = store.insert_category(&name, input.status.as_deref().unwrap_or("active"));
    let category = store
        .categories
        .get_mut(&id)
        .ok_or_else(|| fail(StatusCode::INTERNAL_SERVER_ERROR, "Insert failed"))?;
    category.description = input.description;
    Ok(created("Category created", vec![category.clone()]))
}

pub(crate) async fn update_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<CategoryInput>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let category = store
        .categories
        .get_mut(&id)
        .filter(|c| !c.deleted)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Category not found"))?;
    if let Some(name) = input.name {
        category.name = name;
    }
    if input.description.is_some() {
        category.description = input.description;
    }
    if let Some(status) = input.status {
        category.status = status;
    }
    Ok(ok("Category updated", category.clone()))
}

pub(crate) async fn soft_delete_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    let category = store
        .categories
        .get_mut(&id)
        .filter(|c| !c.deleted)
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Category not found"))?;
    category.deleted = true;
    Ok(done("Category moved to trash"))
}

pub(crate) async fn hard_delete_category(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply {
    current_admin(&db, &headers).await?;
    let id = parse_id(&id)?;
    let mut store = db.write().await;
    store
        .categories
        .remove(&id)
        .map(|_| done("Category permanently deleted"))
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Category not found"))
}
