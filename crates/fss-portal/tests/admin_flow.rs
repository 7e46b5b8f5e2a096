//! Admin flow tests against a mock HTTP API.
//!
//! These tests verify:
//! - Signing in opens the dashboard and the enquiry board loads over HTTP
//! - A revoked session empties the board and sends the dashboard to login

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use fss_client::{ApiClient, EnquiryFilters, Error, MemoryStorage};
use fss_portal::{
    Credentials, Decision, EnquiryBoard, Navigator, Route, SessionManager, SessionStatus, View,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token(exp_offset_secs: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD
        .encode(json!({"sub": "a1", "exp": Utc::now().timestamp() + exp_offset_secs}).to_string());
    format!("{}.{}.sig", header, payload)
}

async fn signed_in(server: &MockServer) -> Arc<SessionManager> {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": token(3600),
            "refreshToken": token(86400),
            "admin": {"id": "a1", "name": "Tony", "email": "tony@example.com", "role": "admin"}
        })))
        .mount(server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .storage(Arc::new(MemoryStorage::new()))
        .build()
        .unwrap();
    let session = Arc::new(SessionManager::new(client));
    session.initialize();
    session
        .login(&Credentials::new("tony@example.com", "hunter2"))
        .await
        .unwrap();
    session
}

fn page() -> serde_json::Value {
    json!({
        "enquiries": [{
            "_id": "e1",
            "name": "Asha Menon",
            "email": "asha@example.com",
            "phone": "+919876543210",
            "service": "Mentoring",
            "message": "Looking for weekly mentoring sessions",
            "status": "new",
            "priority": "low"
        }],
        "total": 1
    })
}

#[tokio::test]
async fn test_signed_in_admin_loads_board() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page()))
        .expect(1)
        .mount(&server)
        .await;

    let navigator = Navigator::new(signed_in(&server).await);
    assert_eq!(
        navigator.navigate("/admin/dashboard"),
        Decision::Render(View::AdminDashboard)
    );

    let mut board = EnquiryBoard::new(navigator.session().client().clone());
    board.list(EnquiryFilters::default()).await.unwrap();
    assert_eq!(board.total(), 1);
    assert_eq!(board.find("e1").map(|e| e.name.as_str()), Some("Asha Menon"));
}

#[tokio::test]
async fn test_revoked_session_redirects_dashboard_to_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page()))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Token revoked"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid refresh token"})))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in(&server).await;
    let navigator = Navigator::new(session.clone());
    let mut board = EnquiryBoard::new(session.client().clone());
    board.list(EnquiryFilters::default()).await.unwrap();
    assert_eq!(board.enquiries().len(), 1);

    let err = board.reload().await.unwrap_err();
    assert!(matches!(err, Error::SessionExpired));
    assert!(board.enquiries().is_empty());
    assert_eq!(board.total(), 0);

    assert_eq!(session.status(), SessionStatus::Anonymous);
    assert!(session.client().tokens().access_token().is_none());
    assert_eq!(
        navigator.navigate("/admin/dashboard"),
        Decision::Redirect(Route::AdminLogin)
    );
}
