use dioxus::prelude::*;
use keikichi_shared::{QueryScope, Trip, TripStatus};

use crate::auth_session::AuthContext;
use crate::components::ui::{trip_status_label, Button, ButtonVariant, ErrorBox, Loading};
use crate::format;
use crate::hooks::use_query;
use crate::routes::Route;
use crate::stores::{invalidate_all, toasts};

fn refresh() {
    invalidate_all([QueryScope::Trips, QueryScope::AdminTrips, QueryScope::DashboardStats]);
}

#[component]
pub fn AdminTrips() -> Element {
    let auth = use_context::<AuthContext>();
    let trips = use_query(
        || QueryScope::AdminTrips,
        move || async move { auth.client().trips().await },
    );

    rsx! {
        div { class: "space-y-4",
            div { class: "flex items-center justify-between",
                h1 { class: "text-2xl font-bold", "Trips" }
                Link {
                    to: Route::AdminCreateTrip {},
                    class: "rounded-md bg-blue-600 px-4 py-2 text-sm font-medium text-white hover:bg-blue-700",
                    "New trip"
                }
            }
            match trips.read().as_ref() {
                Some(Ok(list)) if list.is_empty() => rsx! {
                    p { class: "py-12 text-center text-slate-500", "No trips yet." }
                },
                Some(Ok(list)) => rsx! {
                    div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white dark:border-slate-800 dark:bg-slate-900",
                        table { class: "w-full text-left text-sm",
                            thead { class: "bg-slate-50 text-xs uppercase text-slate-500 dark:bg-slate-800",
                                tr {
                                    th { class: "px-4 py-2", "Route" }
                                    th { class: "px-4 py-2", "Departure" }
                                    th { class: "px-4 py-2", "Spaces" }
                                    th { class: "px-4 py-2", "Price" }
                                    th { class: "px-4 py-2", "Status" }
                                    th { class: "px-4 py-2", "" }
                                }
                            }
                            tbody {
                                for trip in list.iter().cloned() {
                                    TripRow { key: "{trip.id}", trip }
                                }
                            }
                        }
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
    }
}

#[component]
fn TripRow(trip: Trip) -> Element {
    let auth = use_context::<AuthContext>();
    let id = trip.id.clone();
    let available = trip.available_spaces.unwrap_or(trip.total_spaces);

    let change_status = {
        let id = id.clone();
        move |evt: FormEvent| {
            let id = id.clone();
            async move {
                let value = evt.value();
                let Some(status) = TripStatus::ALL.into_iter().find(|s| s.as_str() == value) else {
                    return;
                };
                match auth.client().set_trip_status(&id, status).await {
                    Ok(updated) => {
                        toasts::success(format!("Trip is now {}", trip_status_label(updated.status).0));
                        refresh();
                    }
                    Err(e) => toasts::error(&e),
                }
            }
        }
    };

    let delete = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            async move {
                match auth.client().delete_trip(&id).await {
                    Ok(()) => {
                        toasts::success("Trip deleted");
                        refresh();
                    }
                    Err(e) => toasts::error(&e),
                }
            }
        }
    };

    rsx! {
        tr { class: "border-t border-slate-100 dark:border-slate-800",
            td { class: "px-4 py-3 font-medium",
                {trip.route_label()}
                if trip.is_international {
                    span { class: "ml-2 text-xs text-purple-600", "intl" }
                }
            }
            td { class: "px-4 py-3", {format::date(trip.departure_date)} }
            td { class: "px-4 py-3", "{available}/{trip.total_spaces}" }
            td { class: "px-4 py-3", {format::money(trip.price_per_space, &trip.currency)} }
            td { class: "px-4 py-3",
                select {
                    class: "rounded border border-slate-300 bg-transparent px-2 py-1 text-xs dark:border-slate-600",
                    onchange: change_status,
                    for status in TripStatus::ALL {
                        option {
                            value: status.as_str(),
                            selected: status == trip.status,
                            {trip_status_label(status).0}
                        }
                    }
                }
            }
            td { class: "px-4 py-3",
                div { class: "flex justify-end gap-2",
                    Link {
                        to: Route::AdminTripSpaces { trip_id: id.clone() },
                        class: "rounded-md px-3 py-2 text-sm font-medium text-blue-700 hover:bg-blue-50 dark:text-blue-400 dark:hover:bg-slate-800",
                        "Spaces"
                    }
                    Link {
                        to: Route::AdminEditTrip { trip_id: id.clone() },
                        class: "rounded-md px-3 py-2 text-sm font-medium text-slate-700 hover:bg-slate-100 dark:text-slate-300 dark:hover:bg-slate-800",
                        "Edit"
                    }
                    Button { variant: ButtonVariant::Danger, onclick: delete, "Delete" }
                }
            }
        }
    }
}
