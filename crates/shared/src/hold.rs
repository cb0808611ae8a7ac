//! Active hold handed from the trip page to the reservation wizard.

use chrono::{DateTime, Duration, Utc};

use crate::models::{HoldSpacesResponse, Space, Trip};

#[derive(Debug, Clone, PartialEq)]
pub struct PendingHold {
    pub hold: HoldSpacesResponse,
    pub trip: Trip,
    pub spaces: Vec<Space>,
}

impl PendingHold {
    pub fn trip_id(&self) -> &str {
        &self.trip.id
    }

    pub fn space_ids(&self) -> Vec<String> {
        self.spaces.iter().map(|s| s.id.clone()).collect()
    }

    /// Time left on the hold, zero once it has passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.hold.hold_expires_at - now).max(Duration::zero())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.remaining(now).is_zero()
    }
}

/// `mm:ss` countdown text.
pub fn format_countdown(left: Duration) -> String {
    let secs = left.num_seconds().max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::tests::{space, trip};
    use chrono::TimeZone;

    fn pending(expires_at: DateTime<Utc>) -> PendingHold {
        PendingHold {
            hold: HoldSpacesResponse {
                message: "held".into(),
                trip_id: "t1".into(),
                space_ids: vec!["s1".into()],
                spaces_count: 1,
                hold_expires_at: expires_at,
                expires_in_minutes: 15,
            },
            trip: trip(false),
            spaces: vec![space("s1", 1)],
        }
    }

    #[test]
    fn remaining_counts_down_to_zero() {
        let expires = Utc.with_ymd_and_hms(2025, 6, 1, 12, 15, 0).unwrap();
        let hold = pending(expires);

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 30).unwrap();
        assert_eq!(hold.remaining(now), Duration::seconds(870));
        assert_eq!(format_countdown(hold.remaining(now)), "14:30");
        assert!(!hold.is_expired(now));

        let later = Utc.with_ymd_and_hms(2025, 6, 1, 13, 0, 0).unwrap();
        assert_eq!(hold.remaining(later), Duration::zero());
        assert!(hold.is_expired(later));
        assert_eq!(format_countdown(hold.remaining(later)), "00:00");
    }

    #[test]
    fn exposes_trip_and_space_ids() {
        let hold = pending(Utc::now());
        assert_eq!(hold.trip_id(), "t1");
        assert_eq!(hold.space_ids(), vec!["s1".to_string()]);
    }
}
