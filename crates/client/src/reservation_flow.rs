//! Turning a space selection into a hold.

use keikichi_shared::hold::PendingHold;
use keikichi_shared::selection::{has_existing_reservation, SpaceSelection};
use keikichi_shared::{ApiError, HoldSpacesRequest, Space, Trip};

use crate::api_client::ApiClient;

#[derive(Debug, Clone, PartialEq)]
pub enum ReserveOutcome {
    NothingSelected,
    /// A selected space already sits in one of my pending reservations.
    ExistingReservation,
    CreateReservation(PendingHold),
}

/// Hold the selected spaces. Makes at most one request and never retries;
/// conflicts come back as the backend's error.
pub async fn reserve_selected(
    api: &ApiClient,
    trip: &Trip,
    spaces: &[Space],
    selection: &SpaceSelection,
) -> Result<ReserveOutcome, ApiError> {
    let selected = selection.selected_spaces(spaces);
    if selected.is_empty() {
        return Ok(ReserveOutcome::NothingSelected);
    }
    if has_existing_reservation(&selected) {
        return Ok(ReserveOutcome::ExistingReservation);
    }

    let req = HoldSpacesRequest {
        trip_id: trip.id.clone(),
        space_ids: selected.iter().map(|s| s.id.clone()).collect(),
    };
    let hold = api.hold_spaces(&req).await?;
    crate::log_info!(
        "Held {} space(s) on trip {} until {}",
        hold.space_ids.len(),
        trip.id,
        hold.hold_expires_at
    );
    Ok(ReserveOutcome::CreateReservation(PendingHold {
        hold,
        trip: trip.clone(),
        spaces: selected,
    }))
}
