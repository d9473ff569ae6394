mod common;

use catalog_admin::auth::{CookieStore, FileCookieStore, MemoryCookieStore, Session};
use catalog_admin::prelude::*;
use chrono::{Duration, Utc};
use common::*;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_authenticates_and_refreshes_once() {
    // モックサーバーの起動
    let mock_server = MockServer::start().await;
    let cookie_dir = tempfile::tempdir().unwrap();
    let cookie_path = cookie_dir.path().join("cookie");
    let expired = (Utc::now() + Duration::days(7)).timestamp_millis();

    Mock::given(method("POST"))
        .and(path("/admin/signin"))
        .and(body_json(json!({ "username": "a@b.com", "password": "x" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "登入成功",
            "token": "T",
            "expired": expired
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(header("Authorization", "T"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(vec![product_json("p1", "Oolong")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut console = AdminConsole::new(
        &config_for(&mock_server, &cookie_path),
        &ClientOptions::default(),
        RecordingModal::default(),
        RecordingNotifier::default(),
    )
    .unwrap();

    *console.login_form_mut() = Credentials::new("a@b.com", "x");
    console.submit_login().await.unwrap();

    assert!(console.is_authenticated());
    assert_eq!(console.session().unwrap().token(), "T");
    assert_eq!(console.products().len(), 1);
    assert_eq!(console.products()[0].title, "Oolong");
    // ログインフォームは送信後に破棄される
    assert_eq!(console.login_form(), &Credentials::default());
    assert_eq!(
        console.notifier().notices(),
        vec![("Signed in".to_string(), NoticeKind::Success)]
    );

    let cookie = std::fs::read_to_string(&cookie_path).unwrap();
    assert!(cookie.starts_with("hexToken=T; expires="));
    let stored = FileCookieStore::new(&cookie_path).load().await.unwrap().unwrap();
    assert_eq!(stored.token(), "T");
    assert_eq!(stored.expires().timestamp(), expired / 1000);
}

#[tokio::test]
async fn test_failed_login_stays_signed_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/signin"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "message": "登入失敗"
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut console = console_for(&mock_server);
    *console.login_form_mut() = Credentials::new("a@b.com", "wrong");
    let result = console.submit_login().await;

    assert!(result.is_err());
    assert!(!console.is_authenticated());
    assert_eq!(
        console.notifier().last(),
        Some(("登入失敗".to_string(), NoticeKind::Error))
    );
}

#[tokio::test]
async fn test_failed_login_drops_previous_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/signin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "success": false,
            "message": "帳號或密碼錯誤"
        })))
        .mount(&mock_server)
        .await;

    let mut console = signed_in_console(&mock_server).await;
    assert!(console.is_authenticated());

    *console.login_form_mut() = Credentials::new("other@b.com", "nope");
    assert!(console.submit_login().await.is_err());
    assert!(!console.is_authenticated());
}

#[tokio::test]
async fn test_rejected_restore_drops_previous_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .mount(&mock_server)
        .await;

    // 1回目の確認は成功、2回目は拒否
    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "請重新登入"
        })))
        .mount(&mock_server)
        .await;

    let mut console = console_for(&mock_server)
        .with_cookie_store(Box::new(MemoryCookieStore::with_session(&live_session("T"))));
    assert!(console.restore_session().await.unwrap());
    assert!(console.is_authenticated());

    assert!(console.restore_session().await.is_err());
    assert!(!console.is_authenticated());
    assert_eq!(
        console.notifier().last(),
        Some(("請重新登入".to_string(), NoticeKind::Error))
    );
}

#[tokio::test]
async fn test_restore_session_from_cookie() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .and(header("Authorization", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "uid": "uid-1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .and(header("Authorization", "T"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing(vec![product_json("p1", "Oolong")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut console = console_for(&mock_server)
        .with_cookie_store(Box::new(MemoryCookieStore::with_session(&live_session("T"))));

    assert!(console.restore_session().await.unwrap());
    assert!(console.is_authenticated());
    assert_eq!(console.products().len(), 1);
    assert_eq!(
        console.notifier().last(),
        Some(("Session restored".to_string(), NoticeKind::Success))
    );
}

#[tokio::test]
async fn test_restore_without_cookie_does_nothing() {
    let mock_server = MockServer::start().await;
    let mut console = console_for(&mock_server);

    assert!(!console.restore_session().await.unwrap());
    assert!(!console.is_authenticated());
    assert!(console.notifier().notices().is_empty());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_expired_cookie_is_not_sent() {
    let mock_server = MockServer::start().await;
    let stale = Session::new("old", Utc::now() - Duration::hours(2));
    let mut console =
        console_for(&mock_server).with_cookie_store(Box::new(MemoryCookieStore::with_session(&stale)));

    assert!(!console.restore_session().await.unwrap());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_cookie_is_kept() {
    let mock_server = MockServer::start().await;
    let cookie_dir = tempfile::tempdir().unwrap();
    let cookie_path = cookie_dir.path().join("cookie");
    FileCookieStore::new(&cookie_path)
        .save(&live_session("revoked"))
        .await
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "success": false,
            "message": "請重新登入"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut console = AdminConsole::new(
        &config_for(&mock_server, &cookie_path),
        &ClientOptions::default(),
        RecordingModal::default(),
        RecordingNotifier::default(),
    )
    .unwrap();

    assert!(console.restore_session().await.is_err());
    assert!(!console.is_authenticated());
    assert_eq!(
        console.notifier().last(),
        Some(("請重新登入".to_string(), NoticeKind::Error))
    );
    assert!(cookie_path.exists());
}

#[tokio::test]
async fn test_sign_out_clears_cookie() {
    let mock_server = MockServer::start().await;
    let cookie_dir = tempfile::tempdir().unwrap();
    let cookie_path = cookie_dir.path().join("cookie");
    FileCookieStore::new(&cookie_path)
        .save(&live_session("T"))
        .await
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/user/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(PRODUCTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(vec![])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/logout"))
        .and(header("Authorization", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "已登出"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut console = AdminConsole::new(
        &config_for(&mock_server, &cookie_path),
        &ClientOptions::default(),
        RecordingModal::default(),
        RecordingNotifier::default(),
    )
    .unwrap();

    assert!(console.restore_session().await.unwrap());
    console.sign_out().await.unwrap();

    assert!(!console.is_authenticated());
    assert!(!cookie_path.exists());
    assert_eq!(
        console.notifier().last(),
        Some(("Signed out".to_string(), NoticeKind::Success))
    );
}

#[tokio::test]
async fn test_unreachable_server_is_reported() {
    // 接続できないアドレス
    let config = ConsoleConfig::new("http://127.0.0.1:1", API_PATH, "unused").unwrap();
    let mut console = AdminConsole::new(
        &config,
        &ClientOptions::default(),
        RecordingModal::default(),
        RecordingNotifier::default(),
    )
    .unwrap()
    .with_cookie_store(Box::new(MemoryCookieStore::new()));

    *console.login_form_mut() = Credentials::new("a@b.com", "x");
    let err = console.submit_login().await.unwrap_err();

    assert!(!console.is_authenticated());
    let (text, kind) = console.notifier().last().unwrap();
    assert_eq!(kind, NoticeKind::Error);
    assert_eq!(text, err.user_message());
}
