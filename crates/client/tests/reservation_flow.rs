//! Holding selected spaces through a mock backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use keikichi_client::api_client::ApiClient;
use keikichi_client::reservation_flow::{reserve_selected, ReserveOutcome};
use keikichi_shared::selection::SpaceSelection;
use keikichi_shared::{Space, Trip};
use rstest::{fixture, rstest};
use serde_json::{json, Value};

const HOLD_EXPIRES: &str = "2025-06-01T12:15:00Z";

#[derive(Clone, Default)]
struct MockState {
    holds: Arc<AtomicUsize>,
}

async fn hold(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.holds.fetch_add(1, Ordering::SeqCst);
    if body["space_ids"] == json!(["s9"]) {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "detail": "Space 9 is no longer available" })),
        )
            .into_response();
    }
    Json(json!({
        "message": "Spaces held",
        "trip_id": body["trip_id"],
        "space_ids": body["space_ids"],
        "spaces_count": 1,
        "hold_expires_at": HOLD_EXPIRES,
        "expires_in_minutes": 15
    }))
    .into_response()
}

async fn start_mock(state: MockState) -> ApiClient {
    let app = Router::new()
        .route("/reservations/hold", post(hold))
        .with_state(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    ApiClient::new().with_base_url(format!("http://{addr}"))
}

#[fixture]
fn trip() -> Trip {
    serde_json::from_value(json!({
        "id": "t1",
        "origin": "Monterrey",
        "destination": "Laredo",
        "departure_date": "2025-06-10",
        "status": "scheduled",
        "total_spaces": 28,
        "price_per_space": "1500.00",
        "currency": "USD"
    }))
    .unwrap()
}

fn space(id: &str, number: u32, status: &str, mine: bool, pending: bool) -> Space {
    serde_json::from_value(json!({
        "id": id,
        "space_number": number,
        "status": status,
        "is_mine": mine,
        "has_pending_reservation": pending
    }))
    .unwrap()
}

fn select(spaces: &[Space], ids: &[&str]) -> SpaceSelection {
    let mut selection = SpaceSelection::new();
    for space in spaces.iter().filter(|s| ids.contains(&s.id.as_str())) {
        selection.toggle(space);
    }
    selection
}

#[rstest]
#[tokio::test]
async fn held_spaces_open_the_reservation_wizard(trip: Trip) {
    let state = MockState::default();
    let api = start_mock(state.clone()).await;
    let spaces = vec![
        space("s1", 1, "available", false, false),
        space("s2", 2, "reserved", false, false),
    ];
    let selection = select(&spaces, &["s1"]);

    let outcome = reserve_selected(&api, &trip, &spaces, &selection).await.unwrap();

    let ReserveOutcome::CreateReservation(pending) = outcome else {
        panic!("expected a hold, got {outcome:?}");
    };
    assert_eq!(pending.trip_id(), "t1");
    assert_eq!(pending.space_ids(), vec!["s1".to_string()]);
    assert_eq!(
        pending.hold.hold_expires_at,
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 15, 0).unwrap()
    );
    assert_eq!(state.holds.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test]
async fn empty_selection_makes_no_request(trip: Trip) {
    let state = MockState::default();
    let api = start_mock(state.clone()).await;
    let spaces = vec![space("s1", 1, "available", false, false)];

    let outcome = reserve_selected(&api, &trip, &spaces, &SpaceSelection::new())
        .await
        .unwrap();

    assert_eq!(outcome, ReserveOutcome::NothingSelected);
    assert_eq!(state.holds.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn my_pending_reservation_redirects_instead_of_holding(trip: Trip) {
    let state = MockState::default();
    let api = start_mock(state.clone()).await;
    let spaces = vec![
        space("s1", 1, "available", false, false),
        space("s3", 3, "on_hold", true, true),
    ];
    let selection = select(&spaces, &["s1", "s3"]);
    assert_eq!(selection.len(), 2);

    let outcome = reserve_selected(&api, &trip, &spaces, &selection).await.unwrap();

    assert_eq!(outcome, ReserveOutcome::ExistingReservation);
    assert_eq!(state.holds.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn conflict_is_reported_without_retry(trip: Trip) {
    let state = MockState::default();
    let api = start_mock(state.clone()).await;
    let spaces = vec![space("s9", 9, "available", false, false)];
    let selection = select(&spaces, &["s9"]);

    let err = reserve_selected(&api, &trip, &spaces, &selection)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(409));
    assert_eq!(err.user_message(), "Space 9 is no longer available");
    assert_eq!(state.holds.load(Ordering::SeqCst), 1);
}
