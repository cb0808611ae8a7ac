//! Staff space map: block, release and reserve spaces internally.

use dioxus::prelude::*;
use keikichi_shared::{AdminReservationCreate, QueryScope, Space, SpaceStatus, TripSpacesResponse};

use crate::auth_session::AuthContext;
use crate::components::ui::{space_status_label, Button, ButtonVariant, Card, ErrorBox, Loading, TextField};
use crate::components::{SpaceLegend, SpaceMap};
use crate::hooks::{use_query, use_reconcile_interval};
use crate::routes::Route;
use crate::stores::{invalidate_all, toasts};
use crate::ws::use_space_socket;

/// Statuses staff may set directly; holds and reservations go through their flows.
const SETTABLE: [SpaceStatus; 3] = [SpaceStatus::Available, SpaceStatus::Blocked, SpaceStatus::Internal];

#[component]
pub fn AdminTripSpaces(trip_id: ReadSignal<String>) -> Element {
    let auth = use_context::<AuthContext>();

    let trip = use_query(
        move || QueryScope::Trip(trip_id()),
        move || async move { auth.client().trip(&trip_id()).await },
    );
    let spaces = use_query(
        move || QueryScope::trip_spaces(trip_id()),
        move || async move { auth.client().trip_spaces(&trip_id()).await },
    );
    use_space_socket(trip_id);
    use_reconcile_interval(
        move || QueryScope::trip_spaces(trip_id()),
        auth.config().admin_space_refresh,
    );

    let title = match trip.read().as_ref() {
        Some(Ok(t)) => t.route_label(),
        _ => "Trip spaces".to_string(),
    };

    rsx! {
        div { class: "space-y-4",
            Link { to: Route::AdminTrips {}, class: "text-sm text-blue-600 hover:underline", "← Trips" }
            h1 { class: "text-2xl font-bold", "{title}" }
            match spaces.read().as_ref() {
                Some(Ok(layout)) => rsx! {
                    SpaceAdmin { layout: layout.clone() }
                },
                Some(Err(e)) => rsx! {
                    ErrorBox { message: e.user_message() }
                },
                None => rsx! {
                    Loading { label: "Loading spaces..." }
                },
            }
        }
    }
}

#[component]
fn SpaceAdmin(layout: TripSpacesResponse) -> Element {
    let auth = use_context::<AuthContext>();
    let mut selected = use_signal(Vec::<String>::new);
    let mut notes = use_signal(String::new);
    let mut busy = use_signal(|| false);

    // Drop ids that vanished from the map.
    let known: Vec<String> = layout.spaces.iter().map(|s| s.id.clone()).collect();
    use_effect(use_reactive!(|known| {
        selected.write().retain(|id| known.contains(id));
    }));

    let trip_id = layout.trip_id.clone();
    let count = selected.read().len();

    let toggle = move |space: Space| {
        let mut ids = selected.write();
        match ids.iter().position(|id| *id == space.id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(space.id),
        }
    };

    let refresh = {
        let trip_id = trip_id.clone();
        move || {
            invalidate_all([
                QueryScope::trip_spaces(trip_id.clone()),
                QueryScope::Trip(trip_id.clone()),
                QueryScope::AdminTrips,
                QueryScope::Trips,
            ])
        }
    };

    let set_status = {
        let refresh = refresh.clone();
        move |status: SpaceStatus| {
            let refresh = refresh.clone();
            async move {
                busy.set(true);
                let ids = selected();
                let client = auth.client();
                let mut failed = 0;
                for id in &ids {
                    if let Err(e) = client.set_space_status(id, status).await {
                        crate::log_warn!("Failed to set space {} to {}: {}", id, status, e);
                        failed += 1;
                        toasts::error(&e);
                    }
                }
                if failed == 0 {
                    toasts::success(format!("{} space(s) set to {}", ids.len(), space_status_label(status).0));
                }
                selected.set(Vec::new());
                refresh();
                busy.set(false);
            }
        }
    };

    let reserve_internal = {
        let trip_id = trip_id.clone();
        move |_| {
            let trip_id = trip_id.clone();
            let refresh = refresh.clone();
            async move {
                busy.set(true);
                let note = notes.read().trim().to_string();
                let req = AdminReservationCreate {
                    trip_id,
                    space_ids: selected(),
                    client_id: None,
                    notes: (!note.is_empty()).then_some(note),
                };
                match auth.client().create_admin_reservation(&req).await {
                    Ok(reservation) => {
                        crate::log_info!("Internal reservation {} created", reservation.id);
                        toasts::success("Internal reservation created");
                        selected.set(Vec::new());
                        notes.set(String::new());
                        invalidate_all([QueryScope::AdminReservations, QueryScope::DashboardStats]);
                        refresh();
                    }
                    Err(e) => toasts::error(&e),
                }
                busy.set(false);
            }
        }
    };

    rsx! {
        div { class: "grid gap-6 lg:grid-cols-[1fr_18rem]",
            Card {
                div { class: "mb-4",
                    SpaceLegend { summary: layout.summary.clone() }
                }
                SpaceMap {
                    spaces: layout.spaces.clone(),
                    selected: selected(),
                    on_toggle: toggle,
                    admin: true,
                }
            }
            Card { title: "Actions", class: "h-fit",
                p { class: "mb-3 text-sm text-slate-500", "{count} space(s) selected" }
                div { class: "space-y-2",
                    for status in SETTABLE {
                        {
                            let set_status = set_status.clone();
                            let label = format!("Mark {}", space_status_label(status).0.to_lowercase());
                            rsx! {
                                Button {
                                    key: "{status}",
                                    variant: ButtonVariant::Secondary,
                                    class: "w-full",
                                    disabled: count == 0 || busy(),
                                    onclick: move |_| set_status(status),
                                    "{label}"
                                }
                            }
                        }
                    }
                }
                div { class: "mt-4 space-y-2 border-t border-slate-200 pt-4 dark:border-slate-700",
                    TextField {
                        label: "Internal notes",
                        value: notes.cloned(),
                        oninput: move |v| notes.set(v),
                    }
                    Button {
                        variant: ButtonVariant::Primary,
                        class: "w-full",
                        disabled: count == 0,
                        loading: busy(),
                        onclick: reserve_internal,
                        "Reserve internally"
                    }
                }
            }
        }
    }
}
