//! WebSocket envelopes, query scopes and the DATA_UPDATE invalidation table.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{NotificationType, SpaceStatus};

/// Space socket: the token was rejected, do not reconnect.
pub const CLOSE_INVALID_TOKEN: u16 = 4001;
/// Notification socket: the server refused the connection (bad token or user mismatch).
pub const CLOSE_POLICY_VIOLATION: u16 = 1008;

pub const TOPIC_DATA_UPDATE: &str = "DATA_UPDATE";
pub const TOPIC_NOTIFICATION: &str = "NOTIFICATION";

const SPACE_UPDATE_EVENT: &str = "space_update";

/// `{ws_base}/spaces/ws/trip/{trip_id}?token=...`
pub fn space_socket_url(ws_base: &str, trip_id: &str, token: &str) -> String {
    format!(
        "{}/spaces/ws/trip/{}?token={}",
        ws_base.trim_end_matches('/'),
        urlencoding::encode(trip_id),
        urlencoding::encode(token)
    )
}

/// `{ws_base}/notifications/ws/{user_id}?token=...`
pub fn notification_socket_url(ws_base: &str, user_id: &str, token: &str) -> String {
    format!(
        "{}/notifications/ws/{}?token={}",
        ws_base.trim_end_matches('/'),
        urlencoding::encode(user_id),
        urlencoding::encode(token)
    )
}

// --- Space socket ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpaceUpdate {
    pub space_id: String,
    pub space_number: u32,
    pub status: SpaceStatus,
    pub trip_id: String,
}

#[derive(Debug, Deserialize)]
struct SpaceEnvelope {
    event: String,
    #[serde(default)]
    data: Option<SpaceUpdate>,
}

/// Parse a space-socket frame. `Ok(None)` for well-formed frames that are not
/// space updates.
pub fn parse_space_message(text: &str) -> Result<Option<SpaceUpdate>, serde_json::Error> {
    let envelope: SpaceEnvelope = serde_json::from_str(text)?;
    if envelope.event != SPACE_UPDATE_EVENT {
        return Ok(None);
    }
    Ok(envelope.data)
}

// --- Notification socket ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPayload {
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: NotificationType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "DATA_UPDATE")]
    DataUpdate {
        event: String,
        #[serde(default)]
        data: Value,
    },
    #[serde(rename = "NOTIFICATION")]
    Notification { payload: NotificationPayload },
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Topics this message is delivered to: its `type`, and for data updates
    /// also the `event` name.
    pub fn topics(&self) -> Vec<&str> {
        match self {
            ServerMessage::DataUpdate { event, .. } => vec![TOPIC_DATA_UPDATE, event.as_str()],
            ServerMessage::Notification { .. } => vec![TOPIC_NOTIFICATION],
            ServerMessage::Unknown => Vec::new(),
        }
    }
}

// --- Query scopes ---

/// Cache keys the views fetch under. Invalidating a scope makes every
/// resource reading it re-fetch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryScope {
    Trips,
    AdminTrips,
    Trip(String),
    /// Spaces of one trip, or of every trip when `None`.
    TripSpaces(Option<String>),
    Reservations,
    AdminReservations,
    Reservation(String),
    Notifications,
    /// The signed-in user record behind the session.
    CurrentUser,
    Verifications,
    DashboardStats,
    /// Product names, packaging units and label prices for the wizard.
    Catalog,
}

impl QueryScope {
    pub fn trip_spaces(trip_id: impl Into<String>) -> Self {
        QueryScope::TripSpaces(Some(trip_id.into()))
    }

    /// Whether invalidating `self` also invalidates `other`. List scopes
    /// cover the detail scopes of their entries.
    pub fn covers(&self, other: &QueryScope) -> bool {
        match (self, other) {
            (QueryScope::TripSpaces(None), QueryScope::TripSpaces(_)) => true,
            (QueryScope::Trips, QueryScope::Trip(_)) => true,
            (QueryScope::Reservations, QueryScope::Reservation(_)) => true,
            _ => self == other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl From<NotificationType> for ToastKind {
    fn from(kind: NotificationType) -> Self {
        match kind {
            NotificationType::Info => ToastKind::Info,
            NotificationType::Success => ToastKind::Success,
            NotificationType::Warning => ToastKind::Warning,
            NotificationType::Error => ToastKind::Error,
        }
    }
}

/// What a server push should do to the client caches and toasts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invalidation {
    pub scopes: Vec<QueryScope>,
    pub toast: Option<(ToastKind, String)>,
}

impl Invalidation {
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty() && self.toast.is_none()
    }
}

fn message_or(data: &Value, fallback: &str) -> String {
    data.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Map a DATA_UPDATE event name to the scopes it invalidates and the toast
/// it raises. Unknown events map to an empty invalidation.
pub fn invalidations_for(event: &str, data: &Value) -> Invalidation {
    match event {
        "TRIP_CREATED" | "TRIP_UPDATED" | "TRIP_CANCELLED" | "TRIP_DELETED" => Invalidation {
            scopes: vec![QueryScope::Trips, QueryScope::AdminTrips],
            toast: Some((ToastKind::Info, message_or(data, "Trips updated"))),
        },
        "RESERVATION_CREATED"
        | "RESERVATION_UPDATED"
        | "RESERVATION_CANCELLED"
        | "RESERVATION_CONFIRMED" => Invalidation {
            scopes: vec![QueryScope::Reservations, QueryScope::AdminReservations],
            toast: Some((ToastKind::Info, message_or(data, "Reservations updated"))),
        },
        "PAYMENT_APPROVED" | "PAYMENT_REJECTED" | "PAYMENT_PENDING" => Invalidation {
            scopes: vec![QueryScope::Reservations, QueryScope::AdminReservations],
            toast: None,
        },
        "SPACE_RELEASED" => Invalidation {
            scopes: vec![QueryScope::Trips, QueryScope::TripSpaces(None)],
            toast: Some((ToastKind::Success, "New spaces available".to_string())),
        },
        "ACCOUNT_VERIFIED" => Invalidation {
            scopes: vec![QueryScope::CurrentUser],
            toast: None,
        },
        _ => Invalidation::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("TRIP_CREATED", vec![QueryScope::Trips, QueryScope::AdminTrips], Some(ToastKind::Info))]
    #[case("TRIP_DELETED", vec![QueryScope::Trips, QueryScope::AdminTrips], Some(ToastKind::Info))]
    #[case(
        "RESERVATION_CONFIRMED",
        vec![QueryScope::Reservations, QueryScope::AdminReservations],
        Some(ToastKind::Info)
    )]
    #[case(
        "PAYMENT_REJECTED",
        vec![QueryScope::Reservations, QueryScope::AdminReservations],
        None
    )]
    #[case(
        "SPACE_RELEASED",
        vec![QueryScope::Trips, QueryScope::TripSpaces(None)],
        Some(ToastKind::Success)
    )]
    #[case("ACCOUNT_VERIFIED", vec![QueryScope::CurrentUser], None)]
    #[case("SOMETHING_NEW", vec![], None)]
    fn data_update_table(
        #[case] event: &str,
        #[case] scopes: Vec<QueryScope>,
        #[case] toast: Option<ToastKind>,
    ) {
        let inv = invalidations_for(event, &Value::Null);
        assert_eq!(inv.scopes, scopes);
        assert_eq!(inv.toast.map(|(kind, _)| kind), toast);
    }

    #[test]
    fn toast_prefers_event_message() {
        let inv = invalidations_for("TRIP_UPDATED", &json!({"message": "Trip 12 moved"}));
        assert_eq!(inv.toast, Some((ToastKind::Info, "Trip 12 moved".to_string())));

        let inv = invalidations_for("TRIP_UPDATED", &json!({"message": ""}));
        assert_eq!(inv.toast, Some((ToastKind::Info, "Trips updated".to_string())));
    }

    #[test]
    fn unknown_events_invalidate_nothing() {
        assert!(invalidations_for("PING", &json!({})).is_empty());
    }

    #[rstest]
    #[case(QueryScope::Trips, QueryScope::Trip("t1".into()), true)]
    #[case(QueryScope::Reservations, QueryScope::Reservation("r1".into()), true)]
    #[case(QueryScope::TripSpaces(None), QueryScope::trip_spaces("t1"), true)]
    #[case(QueryScope::AdminTrips, QueryScope::Trip("t1".into()), false)]
    #[case(QueryScope::Trip("t1".into()), QueryScope::Trips, false)]
    #[case(QueryScope::trip_spaces("t1"), QueryScope::trip_spaces("t2"), false)]
    fn list_scopes_cover_their_details(
        #[case] broad: QueryScope,
        #[case] narrow: QueryScope,
        #[case] covered: bool,
    ) {
        assert_eq!(broad.covers(&narrow), covered);
    }

    #[test]
    fn server_messages_dispatch_by_type_and_event() {
        let msg = ServerMessage::parse(
            r#"{"type":"DATA_UPDATE","event":"TRIP_CREATED","data":{"trip_id":"t1"}}"#,
        )
        .unwrap();
        assert_eq!(msg.topics(), vec!["DATA_UPDATE", "TRIP_CREATED"]);

        let msg = ServerMessage::parse(
            r#"{"type":"NOTIFICATION","payload":{"title":"Pago","message":"Aprobado","type":"success"}}"#,
        )
        .unwrap();
        assert_eq!(msg.topics(), vec!["NOTIFICATION"]);
        match msg {
            ServerMessage::Notification { payload } => {
                assert_eq!(payload.kind, NotificationType::Success);
                assert!(payload.link.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }

        let msg = ServerMessage::parse(r#"{"type":"PONG"}"#).unwrap();
        assert!(msg.topics().is_empty());
        assert!(ServerMessage::parse("not json").is_err());
    }

    #[test]
    fn space_frames() {
        let update = parse_space_message(
            r#"{"event":"space_update","data":{"space_id":"s1","space_number":1,"status":"reserved","trip_id":"t1"}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(update.status, SpaceStatus::Reserved);

        assert_eq!(parse_space_message(r#"{"event":"pong"}"#).unwrap(), None);
        assert!(parse_space_message("{").is_err());
    }

    #[test]
    fn all_trip_spaces_covers_each_trip() {
        assert!(QueryScope::TripSpaces(None).covers(&QueryScope::trip_spaces("t1")));
        assert!(!QueryScope::trip_spaces("t1").covers(&QueryScope::trip_spaces("t2")));
        assert!(!QueryScope::Trips.covers(&QueryScope::AdminTrips));
    }

    #[test]
    fn socket_urls_encode_the_token() {
        assert_eq!(
            space_socket_url("ws://localhost:8000/api/v1/", "t1", "a b+c"),
            "ws://localhost:8000/api/v1/spaces/ws/trip/t1?token=a%20b%2Bc"
        );
        assert_eq!(
            notification_socket_url("ws://h/api/v1", "u1", "tok"),
            "ws://h/api/v1/notifications/ws/u1?token=tok"
        );
    }
}
