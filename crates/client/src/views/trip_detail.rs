//! Trip page: live space map, selection and hold.

use dioxus::prelude::*;
use keikichi_shared::selection::SpaceSelection;
use keikichi_shared::{QueryScope, Space, Trip, TripSpacesResponse};

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, Card, ErrorBox, Loading, TripStatusBadge};
use crate::components::{SpaceLegend, SpaceMap};
use crate::format;
use crate::hooks::use_query;
use crate::reservation_flow::{reserve_selected, ReserveOutcome};
use crate::routes::Route;
use crate::stores::{set_pending_hold, toasts};
use crate::ws::use_space_socket;

#[component]
pub fn TripDetail(trip_id: ReadSignal<String>) -> Element {
    let auth = use_context::<AuthContext>();

    let trip = use_query(
        move || QueryScope::Trip(trip_id()),
        move || async move { auth.client().trip(&trip_id()).await },
    );
    let spaces = use_query(
        move || QueryScope::trip_spaces(trip_id()),
        move || async move { auth.client().trip_spaces(&trip_id()).await },
    );
    let live = use_space_socket(trip_id);

    let trip_value = trip.read().as_ref().cloned();
    match trip_value {
        Some(Ok(trip)) => rsx! {
            TripHeader { trip: trip.clone(), live: live.read().is_connected() }
            match spaces.read().as_ref() {
                Some(Ok(layout)) => rsx! {
                    SpacePicker { trip, layout: layout.clone() }
                },
                Some(Err(e)) => rsx! {
                    ErrorBox { message: e.user_message() }
                },
                None => rsx! {
                    Loading { label: "Loading spaces..." }
                },
            }
        },
        Some(Err(e)) => rsx! {
            ErrorBox { message: e.user_message() }
        },
        None => rsx! {
            Loading {}
        },
    }
}

#[component]
fn TripHeader(trip: Trip, live: bool) -> Element {
    let date = format::date(trip.departure_date);
    let price = format::money(trip.price_per_space, &trip.currency);
    rsx! {
        div { class: "mb-6 flex flex-wrap items-start justify-between gap-4",
            div {
                Link { to: Route::Trips {}, class: "text-sm text-blue-600 hover:underline", "← All trips" }
                h1 { class: "mt-1 text-2xl font-bold", {trip.route_label()} }
                p { class: "text-sm text-slate-500", "Departs {date} · {price} per space" }
                if let Some(notes) = trip.notes_public.clone().filter(|n| !n.is_empty()) {
                    p { class: "mt-2 max-w-2xl text-sm", "{notes}" }
                }
            }
            div { class: "flex items-center gap-3",
                TripStatusBadge { status: trip.status }
                if live {
                    span { class: "text-xs text-green-600", "● live" }
                }
            }
        }
    }
}

#[component]
fn SpacePicker(trip: Trip, layout: TripSpacesResponse) -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut selection = use_signal(SpaceSelection::new);
    let mut is_holding = use_signal(|| false);

    // Every refetch may take spaces away from us.
    let spaces_for_reconcile = layout.spaces.clone();
    use_effect(use_reactive!(|spaces_for_reconcile| {
        let dropped = selection.write().reconcile(&spaces_for_reconcile);
        if dropped > 0 {
            toasts::info(format!("{dropped} selected space(s) are no longer available"));
        }
    }));

    let selected_ids = selection.read().ids();
    let selected = selection.read().selected_spaces(&layout.spaces);
    let count = selected.len();
    let subtotal = selected
        .iter()
        .map(|s| s.price.unwrap_or(trip.price_per_space))
        .sum::<f64>();

    let on_toggle = move |space: Space| {
        selection.write().toggle(&space);
    };

    let spaces = layout.spaces.clone();
    let trip_for_hold = trip.clone();
    let reserve = move |_| {
        let trip = trip_for_hold.clone();
        let spaces = spaces.clone();
        async move {
            if is_holding() {
                return;
            }
            is_holding.set(true);
            let current = selection.read().clone();
            match reserve_selected(&auth.client(), &trip, &spaces, &current).await {
                Ok(ReserveOutcome::NothingSelected) => toasts::info("Select at least one space"),
                Ok(ReserveOutcome::ExistingReservation) => {
                    toasts::info("You already have a pending reservation for these spaces");
                    nav.push(Route::MyReservations {});
                }
                Ok(ReserveOutcome::CreateReservation(hold)) => {
                    let trip_id = hold.trip_id().to_string();
                    set_pending_hold(hold);
                    nav.push(Route::CreateReservation { trip_id });
                }
                Err(e) => toasts::error(&e),
            }
            is_holding.set(false);
        }
    };

    rsx! {
        div { class: "grid gap-6 lg:grid-cols-[1fr_18rem]",
            Card { title: "Spaces",
                div { class: "mb-4",
                    SpaceLegend { summary: layout.summary.clone() }
                }
                SpaceMap {
                    spaces: layout.spaces.clone(),
                    selected: selected_ids,
                    on_toggle,
                }
            }
            Card { title: "Your selection", class: "h-fit lg:sticky lg:top-20",
                if count == 0 {
                    p { class: "text-sm text-slate-500", "Click free spaces on the map to select them." }
                } else {
                    ul { class: "mb-3 flex flex-wrap gap-1",
                        for space in selected.iter() {
                            li { key: "{space.id}", class: "rounded bg-blue-100 px-2 py-0.5 text-xs text-blue-800 dark:bg-blue-950 dark:text-blue-300",
                                "#{space.space_number}"
                            }
                        }
                    }
                    p { class: "mb-4 text-sm",
                        "{count} space(s) · "
                        span { class: "font-semibold", {format::money(subtotal, &trip.currency)} }
                    }
                }
                Button {
                    variant: ButtonVariant::Primary,
                    class: "w-full",
                    disabled: count == 0,
                    loading: is_holding(),
                    onclick: reserve,
                    "Reserve"
                }
                if count > 0 {
                    Button {
                        variant: ButtonVariant::Ghost,
                        class: "mt-2 w-full",
                        onclick: move |_| selection.write().clear(),
                        "Clear selection"
                    }
                }
            }
        }
    }
}
