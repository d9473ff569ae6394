#![allow(dead_code)]

use catalog_admin::auth::{MemoryCookieStore, Session};
use catalog_admin::prelude::*;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use std::sync::Mutex;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Counts show/hide calls
#[derive(Debug, Default)]
pub struct RecordingModal {
    calls: Mutex<Vec<&'static str>>,
}

impl RecordingModal {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

impl Modal for RecordingModal {
    fn show(&self) {
        self.calls.lock().unwrap().push("show");
    }

    fn hide(&self) {
        self.calls.lock().unwrap().push("hide");
    }
}

/// Keeps every notification
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(String, NoticeKind)>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<(String, NoticeKind)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<(String, NoticeKind)> {
        self.notices.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn fire(&self, text: &str, kind: NoticeKind) {
        self.notices.lock().unwrap().push((text.to_string(), kind));
    }
}

pub type TestConsole = AdminConsole<RecordingModal, RecordingNotifier>;

pub const API_PATH: &str = "shop";
pub const PRODUCTS_PATH: &str = "/api/shop/admin/products";

pub fn config_for(server: &MockServer, cookie_path: impl Into<std::path::PathBuf>) -> ConsoleConfig {
    ConsoleConfig::new(&server.uri(), API_PATH, cookie_path).unwrap()
}

/// Console whose cookie lives in memory
pub fn console_for(server: &MockServer) -> TestConsole {
    AdminConsole::new(
        &config_for(server, "unused-cookie"),
        &ClientOptions::default(),
        RecordingModal::default(),
        RecordingNotifier::default(),
    )
    .unwrap()
    .with_cookie_store(Box::new(MemoryCookieStore::new()))
}

pub fn live_session(token: &str) -> Session {
    Session::new(token, Utc::now() + Duration::days(1))
}

/// Console holding a verified session with token `T`.
///
/// Mounts the session check; the product listing mocks are up to the caller.
pub async fn signed_in_console(server: &MockServer) -> TestConsole {
    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(server)
        .await;

    let mut console = console_for(server)
        .with_cookie_store(Box::new(MemoryCookieStore::with_session(&live_session("T"))));
    assert!(console.restore_session().await.unwrap());
    console
}

pub fn product_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": "tea",
        "origin_price": 300,
        "price": 250,
        "unit": "box",
        "description": "roasted",
        "content": "100g",
        "is_enabled": 1,
        "imageUrl": "https://img.example/main.png",
        "imagesUrl": ["https://img.example/a.png"],
        "num": 2
    })
}

pub fn listing(products: Vec<Value>) -> Value {
    json!({
        "success": true,
        "products": products,
        "pagination": {
            "total_pages": 1,
            "current_page": 1,
            "has_pre": false,
            "has_next": false,
            "category": ""
        },
        "messages": []
    })
}
