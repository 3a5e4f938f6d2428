//! Shared helpers for driving the router in integration tests.
//!
//! Each test file is compiled as its own crate, so not every helper is used
//! everywhere.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use inventory_service::db::Database;
use inventory_service::storage::LocalStorage;
use inventory_service::store::{ItemStore, MemoryItemStore, SqlItemStore};
use inventory_service::{create_router, AppState};

pub const HOST: &str = "inventory.test:3000";
const BOUNDARY: &str = "X-INVENTORY-TEST-BOUNDARY";

/// Router plus the directories backing it
pub struct TestApp {
    pub router: Router,
    pub photo_dir: TempDir,
    _db_dir: Option<TempDir>,
}

impl TestApp {
    pub fn photo_count(&self) -> usize {
        std::fs::read_dir(self.photo_dir.path()).unwrap().count()
    }
}

/// App over the in-memory item store
pub fn memory_app() -> TestApp {
    let photo_dir = tempfile::tempdir().unwrap();
    let items: Arc<dyn ItemStore> = Arc::new(MemoryItemStore::new());
    let state = AppState::new(items, LocalStorage::new(photo_dir.path()));

    TestApp {
        router: create_router(state),
        photo_dir,
        _db_dir: None,
    }
}

/// App over the SQL item store, backed by a throwaway SQLite file
pub async fn database_app() -> TestApp {
    let photo_dir = tempfile::tempdir().unwrap();
    let db_dir = tempfile::tempdir().unwrap();
    let url = format!(
        "sqlite://{}?mode=rwc",
        db_dir.path().join("inventory.db").display()
    );

    let db = Database::new(&url, 1).await.unwrap();
    db.run_migrations().await.unwrap();

    let items: Arc<dyn ItemStore> = Arc::new(SqlItemStore::new(db));
    let state = AppState::new(items, LocalStorage::new(photo_dir.path()));

    TestApp {
        router: create_router(state),
        photo_dir,
        _db_dir: Some(db_dir),
    }
}

/// One part of a multipart body
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, filename, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, filename
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, HOST)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::HOST, HOST)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::HOST, HOST)
        .body(Body::empty())
        .unwrap()
}

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Send a request and return status plus decoded JSON body
pub async fn call_json(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = send(app, request).await;
    let status = response.status();
    (status, body_json(response).await)
}

/// Register an item through the API and return its id
pub async fn register(app: &TestApp, name: &str, description: &str, photo: Option<&[u8]>) -> String {
    let mut parts = vec![
        Part::Text("inventory_name", name),
        Part::Text("description", description),
    ];
    if let Some(data) = photo {
        parts.push(Part::File("photo", "photo.jpg", data));
    }

    let (status, body) = call_json(app, multipart_request("POST", "/register", &parts)).await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}
