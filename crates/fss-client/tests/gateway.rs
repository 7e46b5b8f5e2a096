//! End-to-end tests of the client against a mock HTTP API.
//!
//! These tests verify:
//! - Credentials are stored on login and attached to later requests
//! - An expired access token is refreshed exactly once and the call retried
//! - A dead session is cleared without retry loops
//! - Failures are classified into the typed error kinds

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use fss_client::{
    ApiClient, CreateEnquiryRequest, EnquiryFilters, EnquiryStatus, Error, MemoryStorage,
    NETWORK_ERROR_MESSAGE, Service, SessionSignal, Storage,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn token(exp_offset_secs: i64, tag: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({"sub": tag, "exp": Utc::now().timestamp() + exp_offset_secs}).to_string(),
    );
    format!("{}.{}.sig", header, payload)
}

fn client_for(server: &MockServer, storage: Arc<MemoryStorage>) -> ApiClient {
    ApiClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .storage(storage)
        .build()
        .unwrap()
}

fn enquiry_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": "Asha Menon",
        "email": "asha@example.com",
        "phone": "+919876543210",
        "service": "Software Development",
        "message": "Need a booking system for my clinic",
        "status": "new",
        "priority": "medium",
        "createdAt": "2024-05-02T09:30:00Z"
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Login and bearer attachment
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_credentials_and_attaches_bearer() {
    let server = MockServer::start().await;
    let access = token(3600, "access");
    let refresh = token(86400, "refresh");

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"email": "tony@example.com", "password": "hunter2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": access,
            "refreshToken": refresh,
            "admin": {"id": "a1", "name": "Tony", "email": "tony@example.com", "role": "admin"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/enquiries/stats"))
        .and(header("authorization", format!("Bearer {}", access).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 3})))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    let client = client_for(&server, storage.clone());
    let mut signals = client.subscribe();

    let response = client
        .auth()
        .login("tony@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(response.admin.unwrap().name, "Tony");
    assert_eq!(*signals.borrow_and_update(), SessionSignal::Active);

    assert_eq!(storage.get("authToken").unwrap(), Some(access));
    assert_eq!(storage.get("refreshToken").unwrap(), Some(refresh));
    assert_eq!(client.tokens().user().unwrap().unwrap().id, "a1");

    let stats = client.enquiries().stats().await.unwrap();
    assert_eq!(stats.total, 3);
}

#[tokio::test]
async fn test_bad_credentials_are_an_api_error_without_refresh() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    let err = client.auth().login("tony@example.com", "wrong").await.unwrap_err();

    match err {
        Error::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(client.tokens().access_token().is_none());
}

// ─────────────────────────────────────────────────────────────────────────────
// Refresh and termination
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_expired_access_token_is_refreshed_and_request_retried() {
    let server = MockServer::start().await;
    let stale = token(-60, "stale");
    let fresh = token(3600, "fresh");
    let refresh = token(86400, "refresh");

    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .and(header("authorization", format!("Bearer {}", stale).as_str()))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "jwt expired"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .and(body_json(json!({"refreshToken": refresh})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"accessToken": fresh})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .and(header("authorization", format!("Bearer {}", fresh).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enquiries": [enquiry_json("e1")],
            "total": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set("authToken", &stale).unwrap();
    storage.set("refreshToken", &refresh).unwrap();
    let client = client_for(&server, storage.clone());

    let page = client
        .enquiries()
        .list(&EnquiryFilters::default())
        .await
        .unwrap();

    assert_eq!(page.total, 1);
    assert_eq!(page.enquiries[0].id, "e1");
    assert_eq!(storage.get("authToken").unwrap(), Some(fresh));
    assert_eq!(storage.get("refreshToken").unwrap(), Some(refresh));
}

#[tokio::test]
async fn test_both_tokens_expired_terminates_session() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/refresh"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set("authToken", &token(-60, "stale")).unwrap();
    storage.set("refreshToken", &token(-10, "stale-refresh")).unwrap();
    storage.set("user", r#"{"id":"a1","name":"Tony","email":"t@example.com"}"#).unwrap();
    let client = client_for(&server, storage.clone());
    let mut signals = client.subscribe();

    let err = client
        .enquiries()
        .list(&EnquiryFilters::default())
        .await
        .unwrap_err();

    assert!(err.is_session_expired());
    assert!(storage.is_empty());
    assert!(signals.has_changed().unwrap());
    assert_eq!(*signals.borrow_and_update(), SessionSignal::Terminated);
}

// ─────────────────────────────────────────────────────────────────────────────
// Error classification
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_server_validation_errors_are_mapped_per_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/enquiries"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Validation failed",
            "errors": [{"field": "email", "message": "Email domain not accepted"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    let err = client
        .enquiries()
        .create(&CreateEnquiryRequest {
            name: "Asha".into(),
            email: "asha@mailinator.com".into(),
            phone: "+919876543210".into(),
            service: Service::Mentoring,
            message: "Looking for a mentor".into(),
        })
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(
        err.field_errors().unwrap().get("email"),
        Some("Email domain not accepted")
    );
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let client = ApiClient::builder()
        .base_url("http://127.0.0.1:1/api")
        .timeout(Duration::from_secs(2))
        .build()
        .unwrap();

    let err = client.health().check().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
    assert!(!client.health().is_healthy().await);
}

#[tokio::test]
async fn test_slow_response_times_out_as_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "ok"}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = ApiClient::builder()
        .base_url(format!("{}/api", server.uri()))
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();

    let err = client.health().check().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

// ─────────────────────────────────────────────────────────────────────────────
// Enquiry endpoints
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_only_set_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/enquiries"))
        .and(query_param("status", "in-progress"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "enquiries": [],
            "total": 11
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    let page = client
        .enquiries()
        .list(&EnquiryFilters {
            page: Some(2),
            limit: Some(10),
            status: Some(EnquiryStatus::InProgress),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(page.enquiries.is_empty());
    assert_eq!(page.total, 11);
}

#[tokio::test]
async fn test_deleting_twice_fails_the_second_time() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/enquiries/e1"))
        .respond_with(ResponseTemplate::new(204))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/enquiries/e1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Enquiry not found"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStorage::new()));

    client.enquiries().delete("e1").await.unwrap();
    let err = client.enquiries().delete("e1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_status_update_and_note_bodies() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/enquiries/e1/status"))
        .and(body_json(json!({"status": "completed", "reason": "Delivered"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/enquiries/e1/notes"))
        .and(body_json(json!({"note": "Called back", "isPrivate": true})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Arc::new(MemoryStorage::new()));
    client
        .enquiries()
        .update_status("e1", EnquiryStatus::Completed, Some("Delivered"))
        .await
        .unwrap();
    client
        .enquiries()
        .add_note("e1", "Called back", true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_logout_clears_even_when_server_fails() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let storage = Arc::new(MemoryStorage::new());
    storage.set("authToken", &token(3600, "access")).unwrap();
    storage.set("refreshToken", &token(86400, "refresh")).unwrap();
    let client = client_for(&server, storage.clone());

    client.auth().logout().await;

    assert!(storage.is_empty());
}
