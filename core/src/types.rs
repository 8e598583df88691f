//! Wire types for the reader backend.
//!
//! # Design
//! Every response is wrapped in an [`Envelope`]. Entities mirror the JSON
//! payloads field for field: unknown fields are ignored, optional fields
//! default, and identifiers are kept as opaque strings whether the server
//! sends them as strings or numbers. No invariants are enforced beyond
//! field presence and type.

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

use crate::codec::{self, ResponseShape};
use crate::error::ApiError;

/// The `{success, message, data, pagination}` wrapper shared by all routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default = "none")]
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

// `#[serde(default)]` on `data` would demand `T: Default`.
fn none<T>() -> Option<T> {
    None
}

impl<T> Envelope<T> {
    /// Treat `success: false` as a failure carrying the server's message.
    ///
    /// The client itself never calls this; application failures are left to
    /// the caller.
    pub fn into_result(self) -> Result<Option<T>, String> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self.message)
        }
    }
}

impl<T: DeserializeOwned> ResponseShape for Envelope<T> {
    fn decode(body: &str) -> Result<Self, ApiError> {
        codec::decode_lenient(body)
    }
}

/// An envelope whose `data` is not inspected.
pub type Ack = Envelope<IgnoredAny>;

/// An envelope whose `data` is kept as untyped JSON.
pub type LooseEnvelope = Envelope<serde_json::Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default, deserialize_with = "codec::count::deserialize")]
    pub page: u64,
    #[serde(default, deserialize_with = "codec::count::deserialize")]
    pub limit: u64,
    #[serde(default, deserialize_with = "codec::count::deserialize")]
    pub total: u64,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "codec::count::optional"
    )]
    pub total_pages: Option<u64>,
}

/// Bearer credential as stored locally and returned by the auth routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub access_token: String,
}

/// Payload of a successful login or OTP verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub access_token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthData {
    pub fn credential(&self) -> Credential {
        Credential {
            access_token: self.access_token.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "codec::count::optional")]
    pub book_count: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub epub_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "codec::id::optional")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub user_id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub book_id: String,
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingHistory {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub user_id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub book_id: String,
    #[serde(default)]
    pub book: Option<Book>,
    #[serde(default, deserialize_with = "codec::id::optional")]
    pub chapter_id: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub last_read_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub user_id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub book_id: String,
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub chapter_id: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpubValidation {
    pub valid: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpubMetadata {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpubChapter {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "codec::count::deserialize")]
    pub order: u64,
    #[serde(default)]
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContent {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub chapter_id: String,
    #[serde(default)]
    pub title: String,
    /// XHTML of the chapter body, as extracted by the server.
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    #[serde(deserialize_with = "codec::id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "codec::id::optional")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpVerification {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookIds {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: String,
    pub book_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpubUrl {
    pub url: String,
}

/// Fields accepted by profile update. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFeedback {
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epub_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Partial book update. Only the fields present in the JSON are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epub_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_with_list_and_pagination() {
        let body = r#"{
            "success": true,
            "message": "ok",
            "data": [{"id": 7, "title": "Dune", "author": "Herbert", "coverImage": "c.png"}],
            "pagination": {"page": 1, "limit": "20", "total": 1, "totalPages": 1}
        }"#;
        let env = Envelope::<Vec<Book>>::decode(body).unwrap();
        assert!(env.success);
        let books = env.data.unwrap();
        assert_eq!(books[0].id, "7");
        assert_eq!(books[0].cover_image.as_deref(), Some("c.png"));
        let page = env.pagination.unwrap();
        assert_eq!((page.page, page.limit, page.total), (1, 20, 1));
    }

    #[test]
    fn application_failure_decodes_and_is_left_to_caller() {
        let env = Envelope::<User>::decode(r#"{"success":false,"message":"Email taken"}"#).unwrap();
        assert!(!env.success);
        assert!(env.data.is_none());
        assert_eq!(env.into_result().unwrap_err(), "Email taken");
    }

    #[test]
    fn ack_ignores_any_data_shape() {
        let env = Ack::decode(r#"{"success":true,"message":"deleted","data":[1,{"x":null}]}"#).unwrap();
        assert!(env.success);
        assert_eq!(env.message, "deleted");
    }

    #[test]
    fn update_payloads_skip_absent_fields() {
        let update = BookUpdate {
            title: Some("New".to_string()),
            ..BookUpdate::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"title": "New"}));
    }

    #[test]
    fn login_payload_exposes_credential() {
        let env = Envelope::<AuthData>::decode(
            r#"{"success":true,"message":"","data":{"accessToken":"abc","user":{"id":"u1","email":"a@b.c"}}}"#,
        )
        .unwrap();
        let auth = env.data.unwrap();
        assert_eq!(auth.credential().access_token, "abc");
        assert_eq!(auth.user.unwrap().id, "u1");
    }
}
