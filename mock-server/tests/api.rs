use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::state::{new_db, ADMIN_EMAIL, OTP_CODE, READER_EMAIL, READER_PASSWORD};
use mock_server::{app, app_with, Db};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str, token: Option<&str>) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(body.to_string()).unwrap()
}

fn form_request(uri: &str, body: &str, token: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body.to_string())
        .unwrap()
}

async fn token_for(db: &Db, email: &str) -> (String, String) {
    let mut store = db.write().await;
    let user_id = store.user_by_email(email).unwrap().id.clone();
    (store.issue_token(&user_id), user_id)
}

// --- auth ---

#[tokio::test]
async fn login_returns_token_and_user() {
    let body = format!(r#"{{"email":"{READER_EMAIL}","password":"{READER_PASSWORD}"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", &body, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    assert!(json["data"]["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(json["data"]["user"]["email"], READER_EMAIL);
    assert!(json["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_returns_401_envelope() {
    let body = format!(r#"{{"email":"{READER_EMAIL}","password":"nope"}}"#);
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", &body, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid email or password");
}

#[tokio::test]
async fn register_then_verify_unlocks_login() {
    let db = new_db();
    let signup = r#"{"name":"New","email":"new@reader.test","password":"pw123456"}"#;
    let resp = app_with(db.clone())
        .oneshot(json_request("POST", "/api/auth/register", signup, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let login = r#"{"email":"new@reader.test","password":"pw123456"}"#;
    let resp = app_with(db.clone())
        .oneshot(json_request("POST", "/api/auth/login", login, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let verify = format!(r#"{{"email":"new@reader.test","otp":"{OTP_CODE}"}}"#);
    let resp = app_with(db.clone())
        .oneshot(json_request("POST", "/api/auth/verify-otp", &verify, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app_with(db)
        .oneshot(json_request("POST", "/api/auth/login", login, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn protected_route_without_token_returns_401() {
    let resp = app().oneshot(get("/api/users/profile", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn change_password_accepts_form_body() {
    let db = new_db();
    let (token, _) = token_for(&db, READER_EMAIL).await;
    let body = format!("currentPassword={READER_PASSWORD}&newPassword=changed1");
    let resp = app_with(db.clone())
        .oneshot(form_request("/api/auth/change-password", &body, &token))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let login = format!(r#"{{"email":"{READER_EMAIL}","password":"changed1"}}"#);
    let resp = app_with(db)
        .oneshot(json_request("POST", "/api/auth/login", &login, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- catalog ---

#[tokio::test]
async fn list_books_filters_and_paginates() {
    let resp = app()
        .oneshot(get("/api/books?category=Fiction&page=1&limit=1", None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["total"], 2);
    assert_eq!(json["pagination"]["totalPages"], 2);
}

#[tokio::test]
async fn list_categories_by_status() {
    let resp = app()
        .oneshot(get("/api/categories?status=active", None))
        .await
        .unwrap();

    let json = body_json(resp).await;
    let names: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Fiction", "Science"]);
}

#[tokio::test]
async fn search_matches_title_or_author() {
    let resp = app().oneshot(get("/api/books/search?q=sagan", None)).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["title"], "Cosmos");
}

#[tokio::test]
async fn get_book_not_found_and_bad_id() {
    let resp = app().oneshot(get("/api/books/9999", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = app().oneshot(get("/api/books/not-a-number", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let resp = app()
        .oneshot(json_request("POST", "/api/auth/login", r#"{"email":1}"#, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!body_bytes(resp).await.is_empty());
}

// --- reading ---

#[tokio::test]
async fn bookmark_upsert_updates_history() {
    let db = new_db();
    let (token, user_id) = token_for(&db, READER_EMAIL).await;

    for chapter in ["ch1", "ch2"] {
        let body = format!("userId={user_id}&bookId=1&chapterId={chapter}");
        let resp = app_with(db.clone())
            .oneshot(form_request("/api/history/bookmark", &body, &token))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = app_with(db.clone())
        .oneshot(get(&format!("/api/history/bookmark/{user_id}/1"), Some(&token)))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["chapterId"], "ch2");

    let resp = app_with(db)
        .oneshot(get(&format!("/api/history/{user_id}"), Some(&token)))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn epub_chapter_requires_known_id() {
    let url = "https://cdn.reader.test/books/1.epub";
    let resp = app()
        .oneshot(get(&format!("/api/epub/chapter?url={url}&chapterId=ch2"), None))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"]["title"], "The Journey");

    let resp = app()
        .oneshot(get(&format!("/api/epub/chapter?url={url}&chapterId=ch9"), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- admin ---

#[tokio::test]
async fn admin_routes_reject_plain_users() {
    let db = new_db();
    let (token, _) = token_for(&db, READER_EMAIL).await;
    let resp = app_with(db)
        .oneshot(get("/api/admin/books", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn created_category_is_wrapped_in_a_list() {
    let db = new_db();
    let (token, _) = token_for(&db, ADMIN_EMAIL).await;
    let resp = app_with(db)
        .oneshot(json_request(
            "POST",
            "/api/admin/categories",
            r#"{"name":"Poetry"}"#,
            Some(&token),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["name"], "Poetry");
}

#[tokio::test]
async fn soft_delete_restore_and_purge() {
    use tower::Service;

    let db = new_db();
    let (token, _) = token_for(&db, ADMIN_EMAIL).await;
    let mut app = app_with(db).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/api/admin/books/4", "", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/admin/books/deleted", Some(&token)))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["id"], 4);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("PATCH", "/api/admin/books/4/restore", "", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("DELETE", "/api/admin/books/4/permanent", "", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/books/4", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
