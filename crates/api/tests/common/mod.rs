#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use soundloft_api::auth::jwt::JwtConfig;
use soundloft_api::config::{MediaConfig, ServerConfig};
use soundloft_api::router::build_app_router;
use soundloft_api::state::AppState;
use soundloft_core::storage::LocalBlobStore;
use sqlx::PgPool;
use tower::ServiceExt;

pub const PUBLIC_BASE_URL: &str = "http://testserver";
pub const PASSWORD: &str = "test_password_123!";

/// Smallest byte string `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media: MediaConfig {
            root: media_root.to_path_buf(),
            public_base_url: PUBLIC_BASE_URL.to_string(),
            max_upload_bytes: 10 * 1024 * 1024,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, storing blobs under `media_root`.
pub fn build_test_app_with_media(pool: PgPool, media_root: &Path) -> Router {
    let config = test_config(media_root);
    let blobs = LocalBlobStore::new(media_root, &config.media.base_url());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs: Arc::new(blobs),
    };
    build_app_router(state, &config)
}

/// Build the full application router with a shared scratch media root.
///
/// Blob keys are random, so tests sharing the directory never collide.
pub fn build_test_app(pool: PgPool) -> Router {
    let media_root = std::env::temp_dir().join("soundloft-api-tests");
    build_test_app_with_media(pool, &media_root)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should not fail")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header(AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = builder(Method::GET, uri, None).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = builder(Method::GET, uri, Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = builder(Method::DELETE, uri, Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_empty_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = builder(Method::POST, uri, Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn patch_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    json_request(app, Method::PATCH, uri, Some(token), body).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Assert the exact 404 body for `entity` `id`. Foreign rows and missing
/// rows must both produce this body, differing only in the id echoed back.
pub async fn assert_not_found(response: Response<Body>, entity: &str, id: i64) {
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": format!("{entity} with id {id} not found"),
            "code": "NOT_FOUND",
        })
    );
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// One part of a hand-built `multipart/form-data` body.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        data: &'a [u8],
    },
}

const BOUNDARY: &str = "soundloft-test-boundary";

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    token: &str,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = builder(method, uri, Some(token))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Accounts and fixtures
// ---------------------------------------------------------------------------

/// Register a user through the API and return the created user JSON.
pub async fn register(app: Router, username: &str, is_creator: bool) -> Value {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": PASSWORD,
        "is_creator": is_creator,
    });
    let response = post_json(app, "/api/v1/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in and return the full auth response.
pub async fn login(app: Router, username: &str) -> Value {
    let body = json!({ "username": username, "password": PASSWORD });
    let response = post_json(app, "/api/v1/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Register and log in, returning `(user_id, access_token)`.
pub async fn signup(app: &Router, username: &str) -> (i64, String) {
    let user = register(app.clone(), username, true).await;
    let auth = login(app.clone(), username).await;
    let token = auth["access_token"]
        .as_str()
        .expect("access_token should be a string")
        .to_string();
    (user["id"].as_i64().expect("id should be an integer"), token)
}

/// Upload a track with the given title and return its JSON.
pub async fn upload_track(app: &Router, token: &str, title: &str, genre: &str) -> Value {
    let response = multipart_auth(
        app.clone(),
        Method::POST,
        "/api/v1/tracks",
        token,
        &[
            Part::Text("title", title),
            Part::Text("genre", genre),
            Part::File {
                name: "audio_file",
                file_name: "take.mp3",
                data: b"ID3 fake audio",
            },
        ],
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}
