//! The hold handed from the trip page to the reservation wizard.

use dioxus::prelude::*;
use keikichi_shared::hold::PendingHold;

pub static PENDING_HOLD: GlobalSignal<Option<PendingHold>> = Signal::global(|| None);

pub fn set_pending_hold(hold: PendingHold) {
    *PENDING_HOLD.write() = Some(hold);
}

/// `hold`, if it belongs to `trip_id`.
pub fn hold_for_trip(hold: Option<&PendingHold>, trip_id: &str) -> Option<PendingHold> {
    hold.filter(|h| h.trip_id() == trip_id).cloned()
}

/// The pending hold, if it belongs to `trip_id`.
pub fn pending_hold_for(trip_id: &str) -> Option<PendingHold> {
    hold_for_trip(PENDING_HOLD.read().as_ref(), trip_id)
}

pub fn clear_pending_hold() {
    *PENDING_HOLD.write() = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pending(trip_id: &str) -> PendingHold {
        PendingHold {
            hold: serde_json::from_value(json!({
                "message": "Spaces held",
                "trip_id": trip_id,
                "space_ids": ["s1"],
                "spaces_count": 1,
                "hold_expires_at": "2025-06-01T12:15:00Z",
                "expires_in_minutes": 15
            }))
            .unwrap(),
            trip: serde_json::from_value(json!({
                "id": trip_id,
                "origin": "Monterrey",
                "destination": "Laredo",
                "departure_date": "2025-06-10",
                "status": "scheduled",
                "total_spaces": 28,
                "price_per_space": "1500.00"
            }))
            .unwrap(),
            spaces: vec![serde_json::from_value(json!({
                "id": "s1",
                "space_number": 1,
                "status": "on_hold",
                "is_mine": true
            }))
            .unwrap()],
        }
    }

    #[test]
    fn hold_is_only_handed_to_its_own_trip() {
        let hold = pending("t1");

        let found = hold_for_trip(Some(&hold), "t1").unwrap();
        assert_eq!(found.space_ids(), vec!["s1".to_string()]);

        assert_eq!(hold_for_trip(Some(&hold), "t2"), None);
        assert_eq!(hold_for_trip(None, "t1"), None);
    }
}
