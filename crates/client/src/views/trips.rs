//! Trip list for clients.

use dioxus::prelude::*;
use keikichi_shared::{QueryScope, Trip, TripStatus};

use crate::auth_session::AuthContext;
use crate::components::ui::{Card, ErrorBox, Loading, TripStatusBadge};
use crate::format;
use crate::hooks::use_query;
use crate::routes::Route;

#[component]
pub fn Trips() -> Element {
    let auth = use_context::<AuthContext>();
    let trips = use_query(
        || QueryScope::Trips,
        move || async move { auth.client().trips().await },
    );

    rsx! {
        div { class: "space-y-4",
            h1 { class: "text-2xl font-bold", "Upcoming trips" }
            match trips.read().as_ref() {
                Some(Ok(list)) => {
                    let open: Vec<Trip> = list
                        .iter()
                        .filter(|t| t.status == TripStatus::Scheduled)
                        .cloned()
                        .collect();
                    if open.is_empty() {
                        rsx! {
                            p { class: "py-12 text-center text-slate-500", "No trips are open for booking right now." }
                        }
                    } else {
                        rsx! {
                            div { class: "grid gap-4 sm:grid-cols-2 lg:grid-cols-3",
                                for trip in open {
                                    TripCard { key: "{trip.id}", trip }
                                }
                            }
                        }
                    }
                }
                Some(Err(e)) => rsx! {
                    ErrorBox { message: e.user_message() }
                },
                None => rsx! {
                    Loading {}
                },
            }
        }
    }
}

#[component]
fn TripCard(trip: Trip) -> Element {
    let date = format::date(trip.departure_date);
    let price = format::money(trip.price_per_space, &trip.currency);
    let available = trip.available_spaces.unwrap_or(trip.total_spaces);
    let time = trip
        .departure_time
        .map(|t| t.format(" %H:%M").to_string())
        .unwrap_or_default();

    rsx! {
        Link { to: Route::TripDetail { trip_id: trip.id.clone() },
            Card { class: "transition-shadow hover:shadow-md",
                div { class: "mb-2 flex items-start justify-between gap-2",
                    h3 { class: "text-lg font-semibold", {trip.route_label()} }
                    TripStatusBadge { status: trip.status }
                }
                p { class: "text-sm text-slate-500",
                    "{date}{time}"
                }
                div { class: "mt-3 flex items-center justify-between text-sm",
                    span { "{available} of {trip.total_spaces} spaces free" }
                    span { class: "font-semibold", "{price}" }
                }
                if trip.is_international {
                    p { class: "mt-2 text-xs font-medium text-purple-700 dark:text-purple-400", "International" }
                }
            }
        }
    }
}
