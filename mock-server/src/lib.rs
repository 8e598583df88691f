//! In-memory imitation of the reading-app backend.
//!
//! Serves the same routes and `{success, message, data, pagination}`
//! envelopes as the real server so the client can be exercised end-to-end.
//! Protected routes expect `Authorization: Bearer <token>` with a token
//! issued by login or OTP verification.

mod handlers;
pub mod state;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;

pub use state::{Db, Store};

#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

pub(crate) fn ok<T: Serialize>(message: &str, data: T) -> Response {
    respond(StatusCode::OK, message, serde_json::to_value(data).ok(), None)
}

pub(crate) fn created<T: Serialize>(message: &str, data: T) -> Response {
    respond(StatusCode::CREATED, message, serde_json::to_value(data).ok(), None)
}

pub(crate) fn done(message: &str) -> Response {
    respond(StatusCode::OK, message, None, None)
}

pub(crate) fn page<T: Serialize>(message: &str, items: Vec<T>, page: usize, limit: usize) -> Response {
    let total = items.len();
    let limit = limit.max(1);
    let page = page.max(1);
    let slice: Vec<T> = items.into_iter().skip((page - 1).saturating_mul(limit)).take(limit).collect();
    let pagination = Pagination {
        page,
        limit,
        total,
        total_pages: total.div_ceil(limit),
    };
    respond(
        StatusCode::OK,
        message,
        serde_json::to_value(slice).ok(),
        Some(pagination),
    )
}

pub(crate) fn fail(status: StatusCode, message: &str) -> Response {
    let body = Envelope {
        success: false,
        message: message.to_string(),
        data: None,
        pagination: None,
    };
    (status, Json(body)).into_response()
}

fn respond(
    status: StatusCode,
    message: &str,
    data: Option<Value>,
    pagination: Option<Pagination>,
) -> Response {
    let body = Envelope {
        success: true,
        message: message.to_string(),
        data,
        pagination,
    };
    (status, Json(body)).into_response()
}

pub fn app() -> Router {
    app_with(state::new_db())
}

pub fn app_with(db: Db) -> Router {
    use handlers::*;

    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/verify-otp", post(verify_otp))
        .route("/api/auth/resend-otp", post(resend_otp))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/auth/change-password", post(change_password))
        .route("/api/auth/logout", post(logout))
        .route("/api/categories", get(list_categories))
        .route("/api/books", get(list_books))
        .route("/api/books/batch", post(books_by_ids))
        .route("/api/books/search", get(search_books))
        .route("/api/books/latest", get(latest_books))
        .route("/api/books/{id}", get(get_book))
        .route("/api/favorites", post(add_favorite))
        .route("/api/favorites/{user_id}", get(list_favorites))
        .route("/api/favorites/{user_id}/{book_id}", delete(remove_favorite))
        .route("/api/history/bookmark", post(save_bookmark))
        .route(
            "/api/history/bookmark/{user_id}/{book_id}",
            get(get_bookmark).delete(delete_bookmark),
        )
        .route("/api/history/{user_id}", get(list_history))
        .route("/api/epub/validate", post(validate_epub))
        .route("/api/epub/metadata", get(epub_metadata))
        .route("/api/epub/chapters", get(epub_chapters))
        .route("/api/epub/chapter", get(epub_chapter))
        .route("/api/users/profile", get(get_profile).put(update_profile))
        .route("/api/users/by-email", get(user_by_email))
        .route("/api/feedback", post(create_feedback))
        .route("/api/feedback/mine", get(my_feedback))
        .route(
            "/api/feedback/{id}",
            get(get_feedback).put(update_feedback).delete(delete_feedback),
        )
        .route("/api/admin/feedback", get(all_feedback))
        .route("/api/admin/books", get(admin_books).post(create_book))
        .route("/api/admin/books/deleted", get(deleted_books))
        .route("/api/admin/books/{id}", put(update_book).delete(soft_delete_book))
        .route("/api/admin/books/{id}/permanent", delete(hard_delete_book))
        .route("/api/admin/books/{id}/restore", patch(restore_book))
        .route("/api/admin/categories", post(create_category))
        .route(
            "/api/admin/categories/{id}",
            put(update_category).delete(soft_delete_category),
        )
        .route("/api/admin/categories/{id}/permanent", delete(hard_delete_category))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    use http_body_util::BodyExt;

    #[tokio::test]
    async fn page_slices_and_reports_totals() {
        let items: Vec<u32> = (1..=5).collect();
        let response = page("ok", items, 2, 2);
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"], serde_json::json!([3, 4]));
        assert_eq!(body["pagination"]["page"], 2);
        assert_eq!(body["pagination"]["limit"], 2);
        assert_eq!(body["pagination"]["total"], 5);
        assert_eq!(body["pagination"]["totalPages"], 3);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let response = page("ok", vec![1u32, 2], 9, 2);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["data"], serde_json::json!([]));
        assert_eq!(body["pagination"]["total"], 2);
    }

    #[test]
    fn envelope_omits_absent_data() {
        let body = Envelope {
            success: false,
            message: "nope".to_string(),
            data: None,
            pagination: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "nope"}));
    }

    #[test]
    fn seeded_store_has_admin_and_books() {
        let store = Store::seeded();
        assert_eq!(store.user_by_email(state::ADMIN_EMAIL).unwrap().role, "admin");
        assert_eq!(store.live_books().count(), 4);
    }
}
