//! Integration tests for the API client against a mock Axum backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use keikichi_client::api_client::{ApiClient, MemoryTokens, Upload};
use keikichi_shared::auth::Session;
use keikichi_shared::{ApiError, PaymentStatus, UserRole};
use rstest::rstest;
use serde_json::{json, Value};
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct MockState {
    me_calls: Arc<AtomicUsize>,
    refresh_calls: Arc<AtomicUsize>,
    upload_parts: Arc<Mutex<Vec<(String, Option<String>)>>>,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Could not validate credentials" })),
    )
        .into_response()
}

async fn me(State(state): State<MockState>, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) != Some("fresh-access") {
        return unauthorized();
    }
    Json(json!({
        "id": "u1",
        "email": "ana@example.com",
        "full_name": "Ana Ruiz",
        "role": "client",
        "is_active": true,
        "is_verified": true
    }))
    .into_response()
}

async fn refresh(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body["access_token"] != "good-refresh" {
        return unauthorized();
    }
    Json(json!({
        "access_token": "fresh-access",
        "refresh_token": "rotated-refresh",
        "token_type": "bearer"
    }))
    .into_response()
}

async fn record_parts(state: &MockState, mut multipart: Multipart) {
    let mut parts = state.upload_parts.lock().await;
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        parts.push((name, file_name));
    }
}

async fn payment_proof(State(state): State<MockState>, multipart: Multipart) -> Response {
    record_parts(&state, multipart).await;
    Json(json!({
        "message": "Proof received",
        "reservation_id": "r1",
        "payment_status": "pending_review",
        "payment_proof_path": "uploads/r1/proof.pdf"
    }))
    .into_response()
}

async fn ine(State(state): State<MockState>, multipart: Multipart) -> Response {
    record_parts(&state, multipart).await;
    (
        StatusCode::ACCEPTED,
        Json(json!({ "message": "Documents received" })),
    )
        .into_response()
}

async fn products() -> Json<Value> {
    Json(json!([
        { "id": 1, "name_es": "Aguacate", "name_en": "Avocado", "is_active": true },
        { "id": 2, "name_es": "Limón", "is_active": true }
    ]))
}

async fn units() -> Json<Value> {
    Json(json!([
        { "id": 1, "name": "Caja", "abbreviation": "cj", "is_active": true },
        { "id": 2, "name": "Tarima", "is_active": true }
    ]))
}

async fn packaging_history() -> Response {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}

async fn label_prices() -> Json<Value> {
    Json(json!([{ "id": "lp1", "dimensions": "10x15 cm", "price": 2.5 }]))
}

async fn ticket() -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                r#"attachment; filename="ticket_R-001.pdf""#,
            ),
        ],
        b"%PDF-1.4".to_vec(),
    )
        .into_response()
}

async fn start_mock(state: MockState) -> String {
    let app = Router::new()
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/reservations/{id}/payment-proof", post(payment_proof))
        .route("/api/v1/reservations/{id}/ticket", get(ticket))
        .route("/api/v1/admin/verifications/ine", post(ine))
        .route("/api/v1/catalog/products", get(products))
        .route("/api/v1/catalog/units", get(units))
        .route("/api/v1/users/me/packaging-history", get(packaging_history))
        .route("/api/v1/label-prices/", get(label_prices))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1")
}

fn session(access: &str, refresh: Option<&str>) -> MemoryTokens {
    MemoryTokens::new(Session {
        access_token: Some(access.to_string()),
        refresh_token: refresh.map(str::to_string),
        user: None,
    })
}

#[rstest]
#[tokio::test]
async fn expired_token_is_refreshed_and_request_retried_once() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let tokens = session("stale-access", Some("good-refresh"));
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(tokens.clone());

    let user = client.me().await.unwrap();

    assert_eq!(user.role, UserRole::Client);
    assert_eq!(state.me_calls.load(Ordering::SeqCst), 2);
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    let stored = tokens.session();
    assert_eq!(stored.access_token.as_deref(), Some("fresh-access"));
    assert_eq!(stored.refresh_token.as_deref(), Some("rotated-refresh"));
}

#[rstest]
#[tokio::test]
async fn failed_refresh_clears_session() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let tokens = session("stale-access", Some("revoked-refresh"));
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(tokens.clone());

    let err = client.me().await.unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
    assert_eq!(state.me_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tokens.session(), Session::default());
}

#[rstest]
#[tokio::test]
async fn unauthorized_without_refresh_token_is_not_retried() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(session("stale-access", None));

    let err = client.me().await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert_eq!(err.user_message(), "Could not validate credentials");
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn payment_proof_is_sent_as_multipart_file() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(session("fresh-access", None));
    let upload = Upload {
        file_name: "proof.pdf".to_string(),
        mime: Some("application/pdf".to_string()),
        bytes: b"%PDF-1.4".to_vec(),
    };

    let res = client.upload_payment_proof("r1", &upload).await.unwrap();

    assert_eq!(res.payment_status, PaymentStatus::PendingReview);
    assert_eq!(res.payment_proof_path, "uploads/r1/proof.pdf");
    let parts = state.upload_parts.lock().await.clone();
    assert_eq!(
        parts,
        vec![("file".to_string(), Some("proof.pdf".to_string()))]
    );
}

#[rstest]
#[tokio::test]
async fn ticket_download_keeps_server_file_name() {
    let base = start_mock(MockState::default()).await;
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(session("fresh-access", None));

    let download = client.ticket_pdf("r1").await.unwrap();

    assert_eq!(download.file_name.as_deref(), Some("ticket_R-001.pdf"));
    assert_eq!(download.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(download.bytes, b"%PDF-1.4");
}

#[rstest]
#[tokio::test]
async fn expired_session_is_refreshed_up_front() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let tokens = session("stale-access", Some("good-refresh"));
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(tokens.clone());

    client.refresh_session().await.unwrap();
    client.me().await.unwrap();

    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.me_calls.load(Ordering::SeqCst), 1);
    assert_eq!(tokens.session().refresh_token.as_deref(), Some("rotated-refresh"));
}

#[rstest]
#[tokio::test]
async fn refresh_session_without_refresh_token_fails_without_request() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let tokens = session("stale-access", None);
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(tokens.clone());

    assert_eq!(client.refresh_session().await, Err(ApiError::Unauthorized));
    assert_eq!(state.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(tokens.session().access_token.as_deref(), Some("stale-access"));
}

#[rstest]
#[tokio::test]
async fn ine_photos_are_sent_under_their_own_fields() {
    let state = MockState::default();
    let base = start_mock(state.clone()).await;
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(session("fresh-access", None));
    let photo = |name: &str| Upload {
        file_name: name.to_string(),
        mime: Some("image/jpeg".to_string()),
        bytes: vec![0xff, 0xd8],
    };

    let res = client
        .upload_ine(&photo("front.jpg"), &photo("back.jpg"), &photo("me.jpg"))
        .await
        .unwrap();

    assert_eq!(res.message, "Documents received");
    let parts = state.upload_parts.lock().await.clone();
    assert_eq!(
        parts,
        vec![
            ("ine_front".to_string(), Some("front.jpg".to_string())),
            ("ine_back".to_string(), Some("back.jpg".to_string())),
            ("ine_selfie".to_string(), Some("me.jpg".to_string())),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn wizard_catalog_survives_missing_packaging_history() {
    let base = start_mock(MockState::default()).await;
    let client = ApiClient::new()
        .with_base_url(base)
        .with_tokens(session("fresh-access", None));

    let catalog = client.wizard_catalog().await.unwrap();

    assert_eq!(catalog.products, vec!["Aguacate/Avocado", "Limón"]);
    assert_eq!(catalog.packaging, vec!["Caja", "Tarima"]);
    assert_eq!(catalog.label_prices.len(), 1);
    assert_eq!(catalog.label_prices[0].price, 2.5);
}
