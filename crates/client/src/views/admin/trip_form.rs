//! Create and edit trips.

use chrono::{NaiveDate, NaiveTime};
use dioxus::prelude::*;
use keikichi_shared::{QueryScope, Trip, TripCreate, TripUpdate};

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, Card, Checkbox, ErrorBox, Loading, SelectField, TextField};
use crate::hooks::use_query;
use crate::routes::Route;
use crate::stores::{invalidate_all, toasts};

const CURRENCIES: [&str; 2] = ["USD", "MXN"];

/// The trip form as typed; parsed on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct TripDraft {
    origin: String,
    destination: String,
    departure_date: String,
    departure_time: String,
    total_spaces: String,
    price_per_space: String,
    currency: String,
    is_international: bool,
    tax_included: bool,
    tax_rate: String,
    payment_deadline_hours: String,
    notes_public: String,
    notes_internal: String,
}

impl Default for TripDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            departure_date: String::new(),
            departure_time: String::new(),
            total_spaces: "28".to_string(),
            price_per_space: String::new(),
            currency: "USD".to_string(),
            is_international: false,
            tax_included: false,
            tax_rate: "0.16".to_string(),
            payment_deadline_hours: "24".to_string(),
            notes_public: String::new(),
            notes_internal: String::new(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl TripDraft {
    fn from_trip(trip: &Trip) -> Self {
        let defaults = Self::default();
        Self {
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            departure_date: trip.departure_date.format("%Y-%m-%d").to_string(),
            departure_time: trip
                .departure_time
                .map(|t| t.format("%H:%M").to_string())
                .unwrap_or_default(),
            total_spaces: trip.total_spaces.to_string(),
            price_per_space: trip.price_per_space.to_string(),
            currency: trip.currency.clone(),
            is_international: trip.is_international,
            tax_included: trip.tax_included,
            tax_rate: trip.tax_rate.map(|r| r.to_string()).unwrap_or(defaults.tax_rate),
            payment_deadline_hours: trip
                .payment_deadline_hours
                .map(|h| h.to_string())
                .unwrap_or(defaults.payment_deadline_hours),
            notes_public: trip.notes_public.clone().unwrap_or_default(),
            notes_internal: trip.notes_internal.clone().unwrap_or_default(),
        }
    }

    fn to_request(&self) -> Result<TripCreate, String> {
        let origin = non_empty(&self.origin).ok_or("Origin is required")?;
        let destination = non_empty(&self.destination).ok_or("Destination is required")?;
        let departure_date = NaiveDate::parse_from_str(self.departure_date.trim(), "%Y-%m-%d")
            .map_err(|_| "Pick a departure date")?;
        let departure_time = match non_empty(&self.departure_time) {
            Some(t) => Some(NaiveTime::parse_from_str(&t, "%H:%M").map_err(|_| "Departure time must be HH:MM")?),
            None => None,
        };
        let total_spaces: u32 = self
            .total_spaces
            .trim()
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or("Spaces must be a positive number")?;
        let price_per_space: f64 = self
            .price_per_space
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| *p >= 0.0)
            .ok_or("Price must be a number")?;
        let tax_rate: f64 = self.tax_rate.trim().parse().map_err(|_| "Tax rate must be a number")?;
        let payment_deadline_hours: u32 = self
            .payment_deadline_hours
            .trim()
            .parse()
            .map_err(|_| "Payment deadline must be a whole number of hours")?;

        Ok(TripCreate {
            origin,
            destination,
            departure_date,
            departure_time,
            total_spaces,
            price_per_space,
            currency: self.currency.clone(),
            is_international: self.is_international,
            tax_included: self.tax_included,
            tax_rate,
            payment_deadline_hours,
            notes_public: non_empty(&self.notes_public),
            notes_internal: non_empty(&self.notes_internal),
        })
    }

    /// Only the fields the backend lets staff change after creation.
    fn to_update(&self) -> Result<TripUpdate, String> {
        let req = self.to_request()?;
        Ok(TripUpdate {
            origin: Some(req.origin),
            destination: Some(req.destination),
            departure_date: Some(req.departure_date),
            total_spaces: Some(req.total_spaces),
            price_per_space: Some(req.price_per_space),
            notes_public: req.notes_public,
            notes_internal: req.notes_internal,
        })
    }
}

#[component]
pub fn AdminCreateTrip() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let save = move |draft: TripDraft| async move {
        let req = match draft.to_request() {
            Ok(req) => req,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        match auth.client().create_trip(&req).await {
            Ok(trip) => {
                crate::log_info!("Created trip {}", trip.id);
                toasts::success("Trip created");
                invalidate_all([QueryScope::Trips, QueryScope::AdminTrips]);
                nav.replace(Route::AdminTripSpaces { trip_id: trip.id });
            }
            Err(e) => error.set(Some(e.user_message())),
        }
        saving.set(false);
    };

    rsx! {
        div { class: "max-w-3xl space-y-4",
            h1 { class: "text-2xl font-bold", "New trip" }
            TripForm {
                initial: TripDraft::default(),
                creating: true,
                submit_label: "Create trip",
                saving: saving(),
                error: error.cloned(),
                onsave: save,
            }
        }
    }
}

#[component]
pub fn AdminEditTrip(trip_id: ReadSignal<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let trip = use_query(
        move || QueryScope::Trip(trip_id()),
        move || async move { auth.client().trip(&trip_id()).await },
    );

    let save = move |draft: TripDraft| async move {
        let req = match draft.to_update() {
            Ok(req) => req,
            Err(msg) => {
                error.set(Some(msg));
                return;
            }
        };
        error.set(None);
        saving.set(true);
        let id = trip_id();
        match auth.client().update_trip(&id, &req).await {
            Ok(trip) => {
                crate::log_info!("Updated trip {}", trip.id);
                toasts::success("Trip updated");
                invalidate_all([
                    QueryScope::Trips,
                    QueryScope::AdminTrips,
                    QueryScope::Trip(id),
                ]);
                nav.push(Route::AdminTrips {});
            }
            Err(e) => error.set(Some(e.user_message())),
        }
        saving.set(false);
    };

    rsx! {
        div { class: "max-w-3xl space-y-4",
            h1 { class: "text-2xl font-bold", "Edit trip" }
            match trip.read().as_ref() {
                Some(Ok(trip)) => rsx! {
                    TripForm {
                        key: "{trip.id}",
                        initial: TripDraft::from_trip(trip),
                        creating: false,
                        submit_label: "Save changes",
                        saving: saving(),
                        error: error.cloned(),
                        onsave: save,
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

/// Currency, departure time and tax settings are fixed once a trip exists,
/// so `creating: false` hides them.
#[component]
fn TripForm(
    initial: TripDraft,
    creating: bool,
    submit_label: String,
    saving: bool,
    error: Option<String>,
    onsave: EventHandler<TripDraft>,
) -> Element {
    let nav = use_navigator();
    let mut draft = use_signal(move || initial);
    let d = draft();

    rsx! {
        if let Some(e) = error {
            ErrorBox { message: e }
        }
        form {
            class: "space-y-4",
            onsubmit: move |e| {
                e.prevent_default();
                onsave.call(draft());
            },
            Card { title: "Route",
                div { class: "grid gap-4 sm:grid-cols-2",
                    TextField { label: "Origin", value: d.origin.clone(), required: true, oninput: move |v| draft.write().origin = v }
                    TextField { label: "Destination", value: d.destination.clone(), required: true, oninput: move |v| draft.write().destination = v }
                    TextField { label: "Departure date", r#type: "date", value: d.departure_date.clone(), required: true, oninput: move |v| draft.write().departure_date = v }
                    if creating {
                        TextField { label: "Departure time", r#type: "time", value: d.departure_time.clone(), oninput: move |v| draft.write().departure_time = v }
                    }
                }
                if creating {
                    div { class: "mt-4",
                        Checkbox { label: "International (crosses the border)", checked: d.is_international, onchange: move |c| draft.write().is_international = c }
                    }
                }
            }
            Card { title: "Pricing",
                div { class: "grid gap-4 sm:grid-cols-2",
                    TextField { label: "Spaces", r#type: "number", value: d.total_spaces.clone(), oninput: move |v| draft.write().total_spaces = v }
                    TextField { label: "Price per space", r#type: "number", value: d.price_per_space.clone(), required: true, oninput: move |v| draft.write().price_per_space = v }
                    if creating {
                        SelectField {
                            label: "Currency",
                            value: d.currency.clone(),
                            options: CURRENCIES.iter().map(|c| (c.to_string(), c.to_string())).collect::<Vec<_>>(),
                            onchange: move |v| draft.write().currency = v,
                        }
                        TextField { label: "Tax rate", r#type: "number", value: d.tax_rate.clone(), oninput: move |v| draft.write().tax_rate = v }
                        TextField { label: "Payment deadline (hours)", r#type: "number", value: d.payment_deadline_hours.clone(), oninput: move |v| draft.write().payment_deadline_hours = v }
                    }
                }
                if creating {
                    div { class: "mt-4",
                        Checkbox { label: "Prices include tax", checked: d.tax_included, onchange: move |c| draft.write().tax_included = c }
                    }
                }
            }
            Card { title: "Notes",
                div { class: "grid gap-4",
                    TextField { label: "Public notes", value: d.notes_public.clone(), oninput: move |v| draft.write().notes_public = v }
                    TextField { label: "Internal notes", value: d.notes_internal.clone(), oninput: move |v| draft.write().notes_internal = v }
                }
            }
            div { class: "flex justify-end gap-2",
                Button { variant: ButtonVariant::Ghost, onclick: move |_| { nav.push(Route::AdminTrips {}); }, "Cancel" }
                Button { r#type: "submit", variant: ButtonVariant::Primary, loading: saving, "{submit_label}" }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TripDraft {
        TripDraft {
            origin: "Monterrey".into(),
            destination: "Laredo".into(),
            departure_date: "2025-06-01".into(),
            departure_time: "06:30".into(),
            price_per_space: "150".into(),
            ..TripDraft::default()
        }
    }

    #[test]
    fn builds_request_from_form_text() {
        let req = filled().to_request().unwrap();
        assert_eq!(req.total_spaces, 28);
        assert_eq!(req.price_per_space, 150.0);
        assert_eq!(req.departure_time, NaiveTime::from_hms_opt(6, 30, 0));
        assert_eq!(req.notes_public, None);
    }

    #[test]
    fn rejects_missing_fields() {
        let mut draft = filled();
        draft.origin = "  ".into();
        assert_eq!(draft.to_request().unwrap_err(), "Origin is required");

        let mut draft = filled();
        draft.total_spaces = "0".into();
        assert!(draft.to_request().is_err());

        let mut draft = filled();
        draft.departure_date = "June".into();
        assert_eq!(draft.to_request().unwrap_err(), "Pick a departure date");
    }

    #[test]
    fn update_carries_only_editable_fields() {
        let mut draft = filled();
        draft.notes_internal = "dock 4".into();
        let update = draft.to_update().unwrap();
        assert_eq!(update.origin.as_deref(), Some("Monterrey"));
        assert_eq!(update.departure_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(update.notes_internal.as_deref(), Some("dock 4"));
        assert_eq!(update.notes_public, None);
    }
}
