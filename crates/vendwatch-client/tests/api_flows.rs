//! End-to-end client behavior against a mocked backend

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vendwatch_client::{
    AuthSession, ClientConfig, FileTokenStore, MemoryTokenStore, RegisterRequest, TokenPair,
    TokenStore, VendorClient,
};
use vendwatch_core::model::{PageRequest, VendorPayload, VendorStatus};
use vendwatch_core::status::StatusColor;

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(format!("{}/api", server.uri()))
}

fn client_with_handles(server: &MockServer) -> (VendorClient, AuthSession, Arc<MemoryTokenStore>) {
    let session = AuthSession::new();
    let store = Arc::new(MemoryTokenStore::new());
    let client = VendorClient::new(config_for(server), session.clone(), store.clone())
        .expect("client should build");
    (client, session, store)
}

fn vendor_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "contact_person": "Dana Fox",
        "email": "dana@acme.test",
        "phone": "+1-555-0100",
        "status": "Active",
        "services": [],
        "active_services_count": 0,
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-01-02T09:00:00Z"
    })
}

fn service_json(id: i64, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "vendor": 1,
        "vendor_name": "Acme Hosting",
        "service_name": name,
        "start_date": "2024-01-01",
        "expiry_date": "2024-12-31",
        "payment_due_date": "2024-06-15",
        "amount": "150.00",
        "status": "Active",
        "status_color": "green",
        "created_at": "2024-01-01T09:00:00Z",
        "updated_at": "2024-05-01T09:00:00Z"
    })
}

fn page_json(results: Vec<serde_json::Value>) -> serde_json::Value {
    json!({
        "count": results.len(),
        "next": null,
        "previous": null,
        "results": results
    })
}

#[tokio::test]
async fn login_initializes_session_and_caches_tokens() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"username": "admin", "password": "correct-horse"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "acc-1",
            "refresh": "ref-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, store) = client_with_handles(&server);
    let pair = client.login("admin", "correct-horse").await.unwrap();

    assert_eq!(pair.access, "acc-1");
    assert!(session.is_authenticated().await);
    assert_eq!(
        store.load().await.unwrap(),
        Some(TokenPair::new("acc-1", "ref-1"))
    );
}

#[tokio::test]
async fn login_with_bad_credentials_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    let err = client.login("admin", "wrong").await.unwrap_err();

    assert!(err.is_auth_error());
    assert!(!session.is_authenticated().await);
}

#[tokio::test]
async fn requests_carry_the_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/"))
        .and(header("Authorization", "Bearer acc-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            vendor_json(1, "Acme Hosting"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc-1", "ref-1")).await;

    let page = client.list_vendors(PageRequest::default()).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].name, "Acme Hosting");
    assert_eq!(page.results[0].status, VendorStatus::Active);
}

#[tokio::test]
async fn refreshes_access_token_once_on_401() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/"))
        .and(header("Authorization", "Bearer stale"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({"refresh": "ref-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "fresh"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/services/"))
        .and(header("Authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            service_json(1, "Web Hosting"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, store) = client_with_handles(&server);
    session.init(TokenPair::new("stale", "ref-1")).await;

    let page = client.list_services(PageRequest::default()).await.unwrap();
    assert_eq!(page.count, 1);
    assert_eq!(page.results[0].amount, dec!(150.00));
    assert_eq!(
        page.results[0].expiry_date,
        NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
    );

    // The session holds the fresh access token and kept its refresh token,
    // and the refreshed pair reached the store.
    assert_eq!(session.access_token().await.as_deref(), Some("fresh"));
    assert_eq!(
        store.load().await.unwrap(),
        Some(TokenPair::new("fresh", "ref-1"))
    );
}

#[tokio::test]
async fn failed_refresh_ends_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Given token not valid for any token type"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .mount(&server)
        .await;

    let (client, session, store) = client_with_handles(&server);
    session.init(TokenPair::new("stale", "dead-ref")).await;
    store
        .save(&TokenPair::new("stale", "dead-ref"))
        .await
        .unwrap();

    let err = client.list_services(PageRequest::default()).await.unwrap_err();
    assert!(err.is_auth_error());
    assert!(!session.is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
}

#[tokio::test]
async fn unauthenticated_request_fails_without_refresh() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Authentication credentials were not provided."
        })))
        .mount(&server)
        .await;

    let (client, _, _) = client_with_handles(&server);
    let err = client.list_vendors(PageRequest::default()).await.unwrap_err();
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn pagination_parameters_are_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/"))
        .and(query_param("page", "3"))
        .and(query_param("page_size", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 120,
            "next": "http://localhost:8000/api/vendors/?page=4&page_size=50",
            "previous": "http://localhost:8000/api/vendors/?page=2&page_size=50",
            "results": [vendor_json(101, "Globex")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let page = client.list_vendors(PageRequest::new(3, 50)).await.unwrap();
    assert_eq!(page.count, 120);
    assert!(page.has_next());
    assert!(page.has_previous());
    assert_eq!(page.total_pages(50), 3);
}

#[tokio::test]
async fn create_vendor_posts_the_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/vendors/"))
        .and(body_json(json!({
            "name": "Acme Hosting",
            "contact_person": "Dana Fox",
            "email": "dana@acme.test",
            "phone": "+1-555-0100",
            "status": "Active"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(vendor_json(7, "Acme Hosting")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let payload = VendorPayload::new(
        "Acme Hosting",
        "Dana Fox",
        "dana@acme.test",
        "+1-555-0100",
        VendorStatus::Active,
    )
    .unwrap();
    let vendor = client.create_vendor(&payload).await.unwrap();
    assert_eq!(vendor.id, 7);
}

#[tokio::test]
async fn delete_returns_unit_on_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/services/7/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    client.delete_service(7).await.unwrap();
}

#[tokio::test]
async fn missing_resource_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/99/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found."})))
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let err = client.get_vendor(99).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn services_by_color_decodes_grouped_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/services/services_by_color/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "green": {"count": 0, "services": []},
            "yellow": {"count": 1, "services": [service_json(3, "SSL Certificate")]},
            "red": {"count": 0, "services": []},
            "orange": {"count": 0, "services": []},
            "gray": {"count": 0, "services": []}
        })))
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let groups = client.services_by_color().await.unwrap();
    assert_eq!(groups.len(), 5);
    let yellow = &groups[&StatusColor::Yellow];
    assert_eq!(yellow.count, 1);
    assert_eq!(yellow.services[0].service_name, "SSL Certificate");
}

#[tokio::test]
async fn check_reminders_posts_window_and_decodes_summary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/services/check_reminders/"))
        .and(body_json(json!({"days": 30})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Reminder check completed",
            "summary": {
                "total_services_flagged": 3,
                "emails_sent": 2,
                "emails_failed": 1,
                "expiring_count": 2,
                "payment_due_count": 1
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let outcome = client.check_reminders(30).await.unwrap();
    assert_eq!(outcome.message, "Reminder check completed");
    assert_eq!(outcome.summary.total_services_flagged, 3);
    assert_eq!(outcome.summary.emails_sent, 2);
    assert_eq!(outcome.summary.emails_failed, 1);
}

#[tokio::test]
async fn register_returns_the_created_account() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register/"))
        .and(body_json(json!({
            "username": "maria",
            "email": "maria@example.com",
            "password": "s3cretpass",
            "password2": "s3cretpass"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "username": "maria",
            "email": "maria@example.com",
            "first_name": "",
            "last_name": ""
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _, _) = client_with_handles(&server);
    let request = RegisterRequest::new("maria", "maria@example.com", "s3cretpass");
    let user = client.register(&request).await.unwrap();
    assert_eq!(user.username, "maria");
}

#[tokio::test]
async fn dashboard_aggregates_count_endpoints() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/vendors/"))
        .and(query_param("page_size", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 12,
            "next": "http://localhost:8000/api/vendors/?page=2&page_size=5",
            "previous": null,
            "results": [vendor_json(1, "Acme Hosting"), vendor_json(2, "Globex")]
        })))
        .mount(&server)
        .await;
    for (endpoint, count) in [
        ("active_services", 7),
        ("expiring_soon", 3),
        ("payment_due_soon", 2),
        ("expired_services", 5),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/api/services/{}/", endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "count": count,
                "next": null,
                "previous": null,
                "results": []
            })))
            .mount(&server)
            .await;
    }

    let (client, session, _) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;

    let summary = client.dashboard().await.unwrap();
    assert_eq!(summary.total_vendors, 12);
    assert_eq!(summary.active_services, 7);
    assert_eq!(summary.expiring_soon, 3);
    assert_eq!(summary.payment_due, 2);
    assert_eq!(summary.expired_services, 5);
    assert_eq!(summary.recent_vendors.len(), 2);
}

#[tokio::test]
async fn restore_session_loads_cached_tokens() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tokens.json");

    let seed = FileTokenStore::new(&path);
    seed.save(&TokenPair::new("acc", "ref")).await.unwrap();

    let session = AuthSession::new();
    let client = VendorClient::new(
        config_for(&server),
        session.clone(),
        Arc::new(FileTokenStore::new(&path)),
    )
    .unwrap();

    assert!(client.restore_session().await.unwrap());
    assert!(session.is_authenticated().await);
    assert_eq!(session.access_token().await.as_deref(), Some("acc"));
}

#[tokio::test]
async fn logout_clears_session_and_cache() {
    let server = MockServer::start().await;
    let (client, session, store) = client_with_handles(&server);
    session.init(TokenPair::new("acc", "ref")).await;
    store.save(&TokenPair::new("acc", "ref")).await.unwrap();

    client.logout().await.unwrap();
    assert!(!session.is_authenticated().await);
    assert_eq!(store.load().await.unwrap(), None);
}
