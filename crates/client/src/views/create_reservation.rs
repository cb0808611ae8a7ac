//! Two-step reservation wizard for a held set of spaces.
//!
//! The page only works with a pending hold for its trip; without one it sends
//! the user back to the trip list. The form is mirrored to local storage on
//! every change and restored from there on mount.

use std::time::Duration;

use chrono::Utc;
use dioxus::prelude::*;
use keikichi_shared::catalog::{WizardCatalog, CUSTOM_LABEL_DIMENSIONS};
use keikichi_shared::draft::{draft_key, restore, ReservationDraft};
use keikichi_shared::hold::{format_countdown, PendingHold};
use keikichi_shared::wizard::{FormError, ItemField, ItemForm, ReservationForm, WizardStep};
use keikichi_shared::{PaymentMethod, QueryScope, Space, Trip};

use crate::api_client::Upload;
use crate::auth_session::AuthContext;
use crate::components::ui::{
    payment_method_label, AutocompleteField, Button, ButtonVariant, Card, Checkbox, SelectField,
    TextField,
};
use crate::components::FilePicker;
use crate::format;
use crate::hooks::use_query;
use crate::routes::Route;
use crate::stores::{clear_pending_hold, invalidate_all, pending_hold_for, toasts};
use crate::storage;

const WEIGHT_UNITS: [&str; 2] = ["kg", "lb"];

#[component]
pub fn CreateReservation(trip_id: ReadSignal<String>) -> Element {
    let nav = use_navigator();
    let hold = use_memo(move || pending_hold_for(&trip_id()));

    use_effect(move || {
        if hold.read().is_none() {
            toasts::info("Select spaces on a trip first");
            nav.replace(Route::Trips {});
        }
    });

    match hold() {
        Some(hold) => rsx! {
            ReservationWizard { hold }
        },
        None => rsx! {},
    }
}

#[component]
fn ReservationWizard(hold: PendingHold) -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    let trip = hold.trip.clone();
    let spaces = hold.spaces.clone();
    let key = draft_key(&trip.id);

    let mut form = use_signal({
        let (trip, spaces, key) = (trip.clone(), spaces.clone(), key.clone());
        move || restore(storage::load::<ReservationDraft>(&key), &trip, &spaces)
    });
    let mut step = use_signal(WizardStep::default);
    let mut errors = use_signal(Vec::<FormError>::new);
    let mut is_submitting = use_signal(|| false);

    // Mirror every change to the draft.
    let draft_trip = trip.id.clone();
    use_effect(move || {
        let draft = ReservationDraft::new(&draft_trip, &form.read());
        if let Err(e) = storage::save(&draft.key(), &draft) {
            crate::log_warn!("Failed to save reservation draft: {}", e);
        }
    });

    let mut now = use_signal(Utc::now);
    use_future(move || async move {
        loop {
            crate::timer::sleep(Duration::from_secs(1)).await;
            now.set(Utc::now());
        }
    });
    let expired = hold.is_expired(now());
    let countdown = format_countdown(hold.remaining(now()));

    let next = move |_| match form.read().advance(step()) {
        Ok(s) => {
            errors.set(Vec::new());
            step.set(s);
        }
        Err(e) => errors.set(e),
    };

    let submit_hold = hold.clone();
    let submit = move |_| {
        let hold = submit_hold.clone();
        let key = key.clone();
        async move {
            if is_submitting() {
                return;
            }
            if let Err(e) = form.read().validate_payment() {
                errors.set(e);
                return;
            }
            errors.set(Vec::new());
            is_submitting.set(true);

            let req = form.read().to_request(hold.trip_id(), hold.space_ids());
            match auth.client().create_reservation(&req).await {
                Ok(reservation) => {
                    crate::log_info!("Created reservation {}", reservation.id);
                    storage::remove(&key);
                    clear_pending_hold();
                    invalidate_all([
                        QueryScope::Reservations,
                        QueryScope::AdminReservations,
                        QueryScope::trip_spaces(hold.trip_id()),
                    ]);
                    toasts::success("Reservation created");
                    nav.replace(Route::MyReservations {});
                }
                Err(e) => toasts::error(&e),
            }
            is_submitting.set(false);
        }
    };

    let error_lines: Vec<String> = {
        let current = form.read();
        errors
            .read()
            .iter()
            .map(|e| describe_error(e, &current.items, &spaces))
            .collect()
    };

    let current_step = step();
    let step_class = |s: WizardStep| {
        if s == current_step {
            "font-semibold text-blue-700 dark:text-blue-400"
        } else {
            "text-slate-400"
        }
    };

    rsx! {
        div { class: "space-y-6",
            div { class: "flex flex-wrap items-center justify-between gap-4",
                div {
                    h1 { class: "text-2xl font-bold", "New reservation" }
                    p { class: "text-sm text-slate-500",
                        {trip.route_label()}
                        " · "
                        {format::date(trip.departure_date)}
                    }
                }
                div {
                    class: if expired { "rounded-md bg-red-100 px-3 py-2 text-sm font-medium text-red-800" } else { "rounded-md bg-amber-100 px-3 py-2 text-sm font-medium text-amber-900" },
                    if expired {
                        "Your hold has expired"
                    } else {
                        "Spaces held for {countdown}"
                    }
                }
            }

            ol { class: "flex gap-6 text-sm",
                li { class: step_class(WizardStep::Spaces), "1. Load details" }
                li { class: step_class(WizardStep::Payment), "2. Services & payment" }
            }

            if !error_lines.is_empty() {
                ul { class: "list-inside list-disc rounded-md border border-red-200 bg-red-50 p-3 text-sm text-red-700 dark:border-red-900 dark:bg-red-950 dark:text-red-300",
                    for line in error_lines {
                        li { "{line}" }
                    }
                }
            }

            div { class: "grid gap-6 lg:grid-cols-[1fr_20rem]",
                div {
                    match current_step {
                        WizardStep::Spaces => rsx! {
                            ItemsStep { form, spaces: spaces.clone() }
                        },
                        WizardStep::Payment => rsx! {
                            PaymentStep { form, trip: trip.clone() }
                        },
                    }
                }
                div { class: "space-y-4",
                    CostSummary { form, trip: trip.clone(), space_count: spaces.len() }
                    match current_step {
                        WizardStep::Spaces => rsx! {
                            Button {
                                variant: ButtonVariant::Primary,
                                class: "w-full",
                                disabled: expired,
                                onclick: next,
                                "Continue"
                            }
                        },
                        WizardStep::Payment => rsx! {
                            Button {
                                variant: ButtonVariant::Primary,
                                class: "w-full",
                                disabled: expired,
                                loading: is_submitting(),
                                onclick: submit,
                                "Confirm reservation"
                            }
                            Button {
                                variant: ButtonVariant::Ghost,
                                class: "w-full",
                                onclick: move |_| step.set(WizardStep::Spaces),
                                "Back"
                            }
                        },
                    }
                }
            }
        }
    }
}

fn describe_error(error: &FormError, items: &[ItemForm], spaces: &[Space]) -> String {
    match error {
        FormError::Item { index, .. } => {
            let number = items
                .get(*index)
                .and_then(|item| item.space_id.as_deref())
                .and_then(|id| spaces.iter().find(|s| s.id == id))
                .map(|s| s.space_number.to_string())
                .unwrap_or_else(|| (index + 1).to_string());
            format!("Space {number}: {}", error.message())
        }
        _ => error.message().to_string(),
    }
}

fn item_has_error(errors: &[FormError], index: usize, field: ItemField) -> bool {
    errors
        .iter()
        .any(|e| matches!(e, FormError::Item { index: i, field: f } if *i == index && *f == field))
}

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
fn ItemsStep(form: Signal<ReservationForm>, spaces: Vec<Space>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut form = form;
    let count = form.read().items.len();
    let errors = form.read().validate_items().err().unwrap_or_default();
    let mut uploading = use_signal(|| None::<usize>);

    // Suggestions only; the fields stay free text when the catalog is down.
    let catalog = use_query(
        || QueryScope::Catalog,
        move || async move {
            auth.client()
                .wizard_catalog()
                .await
                .inspect_err(|e| crate::log_warn!("Catalog unavailable: {}", e))
        },
    );
    let catalog: WizardCatalog = catalog
        .read()
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .cloned()
        .unwrap_or_default();
    let dimension_options: Vec<(String, String)> = std::iter::once((String::new(), "Select...".to_string()))
        .chain(catalog.label_prices.iter().map(|p| {
            (p.dimensions.clone(), format!("{} - ${:.2}", p.dimensions, p.price))
        }))
        .chain(std::iter::once((CUSTOM_LABEL_DIMENSIONS.to_string(), "Other (quote)".to_string())))
        .collect();

    let upload_label = move |index: usize, file: Upload| async move {
        uploading.set(Some(index));
        match auth.client().upload_document(&file, "label").await {
            Ok(doc) => {
                if let Some(item) = form.write().items.get_mut(index) {
                    item.labeling_file_id = Some(doc.id);
                }
                toasts::success(format!("Uploaded {}", file.file_name));
            }
            Err(e) => toasts::error(&e),
        }
        uploading.set(None);
    };

    rsx! {
        div { class: "space-y-4",
            if count > 1 {
                div { class: "flex justify-end",
                    Button {
                        variant: ButtonVariant::Secondary,
                        onclick: move |_| form.write().copy_first_to_all(),
                        "Copy first configuration to all"
                    }
                }
            }
            for index in 0..count {
                {
                    let item = form.read().items[index].clone();
                    let number = item
                        .space_id
                        .as_deref()
                        .and_then(|id| spaces.iter().find(|s| s.id == id))
                        .map(|s| s.space_number.to_string())
                        .unwrap_or_else(|| "?".to_string());
                    let product_error = item_has_error(&errors, index, ItemField::ProductName)
                        .then(|| "Select a product".to_string());
                    let boxes_error = item_has_error(&errors, index, ItemField::BoxCount)
                        .then(|| "At least 1 box".to_string());
                    let total_weight = item.total_weight();
                    let custom_dimensions = catalog.is_custom_dimensions(item.labeling_dimensions.as_deref());
                    let dimension_choice = if custom_dimensions {
                        CUSTOM_LABEL_DIMENSIONS.to_string()
                    } else {
                        item.labeling_dimensions.clone().unwrap_or_default()
                    };
                    let custom_value = item
                        .labeling_dimensions
                        .clone()
                        .filter(|d| d != CUSTOM_LABEL_DIMENSIONS)
                        .unwrap_or_default();
                    let picker_label = if uploading() == Some(index) { "Uploading..." } else { "Label artwork" };
                    rsx! {
                        Card { key: "{index}", title: format!("Space #{number}"),
                            div { class: "grid gap-4 sm:grid-cols-2",
                                AutocompleteField {
                                    label: "Product",
                                    list_id: format!("products-{index}"),
                                    value: item.product_name.clone(),
                                    options: catalog.products.clone(),
                                    placeholder: "Type to search...",
                                    error: product_error,
                                    oninput: move |v| form.write().items[index].product_name = v,
                                }
                                AutocompleteField {
                                    label: "Packaging",
                                    list_id: format!("packaging-{index}"),
                                    value: item.packaging_type.clone().unwrap_or_default(),
                                    options: catalog.packaging.clone(),
                                    placeholder: "e.g. Standard box",
                                    oninput: move |v| form.write().items[index].packaging_type = optional(v),
                                }
                                TextField {
                                    label: "Boxes",
                                    r#type: "number",
                                    value: item.box_count.to_string(),
                                    error: boxes_error,
                                    oninput: move |v: String| form.write().items[index].box_count = v.parse().unwrap_or(0),
                                }
                                div { class: "flex gap-2",
                                    div { class: "flex-1",
                                        TextField {
                                            label: "Weight per box",
                                            r#type: "number",
                                            value: item.weight_per_unit.to_string(),
                                            oninput: move |v: String| form.write().items[index].weight_per_unit = v.parse().unwrap_or(0.0),
                                        }
                                    }
                                    SelectField {
                                        label: "Unit",
                                        value: item.weight_unit.clone(),
                                        options: WEIGHT_UNITS.iter().map(|u| (u.to_string(), u.to_string())).collect::<Vec<_>>(),
                                        onchange: move |v| form.write().items[index].weight_unit = v,
                                    }
                                }
                            }
                            p { class: "mt-2 text-xs text-slate-500", "Total weight: {total_weight} {item.weight_unit}" }
                            div { class: "mt-4 space-y-3 border-t border-slate-100 pt-4 dark:border-slate-800",
                                Checkbox {
                                    label: "Needs labeling",
                                    checked: item.needs_labeling,
                                    onchange: move |checked| form.write().items[index].needs_labeling = checked,
                                }
                                if item.needs_labeling {
                                    div { class: "grid gap-4 sm:grid-cols-2",
                                        TextField {
                                            label: "Number of labels",
                                            r#type: "number",
                                            value: item.labeling_quantity.map(|q| q.to_string()).unwrap_or_default(),
                                            oninput: move |v: String| form.write().items[index].labeling_quantity = v.parse().ok(),
                                        }
                                        SelectField {
                                            label: "Label size",
                                            value: dimension_choice,
                                            options: dimension_options.clone(),
                                            onchange: move |v| form.write().items[index].labeling_dimensions = optional(v),
                                        }
                                    }
                                    if custom_dimensions {
                                        TextField {
                                            label: "Custom size",
                                            value: custom_value,
                                            placeholder: "e.g. 15x15 cm",
                                            oninput: move |v: String| {
                                                let size = optional(v).unwrap_or_else(|| CUSTOM_LABEL_DIMENSIONS.to_string());
                                                form.write().items[index].labeling_dimensions = Some(size);
                                            },
                                        }
                                    }
                                    FilePicker {
                                        label: picker_label,
                                        picked: item.labeling_file_id.clone().map(|_| "label file".to_string()),
                                        onpick: move |file| {
                                            spawn(upload_label(index, file));
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PaymentStep(form: Signal<ReservationForm>, trip: Trip) -> Element {
    let auth = use_context::<AuthContext>();
    let mut form = form;
    let current = form.read().clone();

    let upload_bond = move |file: Upload| async move {
        match auth.client().upload_document(&file, "bond").await {
            Ok(doc) => {
                form.write().bond_file_id = Some(doc.id);
                toasts::success(format!("Uploaded {}", file.file_name));
            }
            Err(e) => toasts::error(&e),
        }
    };

    let pickup_label = match (trip.pickup_cost, trip.pickup_cost_type.as_deref()) {
        (Some(cost), Some("per_pallet")) => format!("Request pickup ({} per pallet)", format::money(cost, &trip.currency)),
        (Some(cost), _) => format!("Request pickup ({})", format::money(cost, &trip.currency)),
        (None, _) => "Request pickup".to_string(),
    };

    rsx! {
        div { class: "space-y-4",
            if trip.is_international {
                Card { title: "Customs bond",
                    Checkbox {
                        label: "I will use my own bond",
                        checked: current.use_own_bond,
                        onchange: move |checked| form.write().use_own_bond = checked,
                    }
                    if current.use_own_bond {
                        div { class: "mt-3",
                            FilePicker {
                                label: "Bond document",
                                picked: current.bond_file_id.clone().map(|_| "bond document".to_string()),
                                onpick: move |file| {
                                    spawn(upload_bond(file));
                                },
                            }
                        }
                    } else {
                        p { class: "mt-2 text-xs text-slate-500", "A bond will be provided and charged with the reservation." }
                    }
                }
            }

            Card { title: "Pickup",
                Checkbox {
                    label: pickup_label,
                    checked: current.request_pickup,
                    onchange: move |checked| form.write().request_pickup = checked,
                }
                if current.request_pickup {
                    div { class: "mt-3 grid gap-4 sm:grid-cols-2",
                        TextField {
                            label: "Address",
                            value: current.pickup_details.address.clone().unwrap_or_default(),
                            oninput: move |v| form.write().pickup_details.address = optional(v),
                        }
                        TextField {
                            label: "Contact name",
                            value: current.pickup_details.contact_name.clone().unwrap_or_default(),
                            oninput: move |v| form.write().pickup_details.contact_name = optional(v),
                        }
                        TextField {
                            label: "Contact phone",
                            r#type: "tel",
                            value: current.pickup_details.contact_phone.clone().unwrap_or_default(),
                            oninput: move |v| form.write().pickup_details.contact_phone = optional(v),
                        }
                        TextField {
                            label: "Preferred time",
                            value: current.pickup_details.time.clone().unwrap_or_default(),
                            oninput: move |v| form.write().pickup_details.time = optional(v),
                        }
                        TextField {
                            label: "Notes",
                            value: current.pickup_details.notes.clone().unwrap_or_default(),
                            oninput: move |v| form.write().pickup_details.notes = optional(v),
                        }
                    }
                }
            }

            Card { title: "Invoice",
                Checkbox {
                    label: "I need an invoice (CFDI)",
                    checked: current.requires_invoice,
                    onchange: move |checked| form.write().requires_invoice = checked,
                }
                if current.requires_invoice {
                    div { class: "mt-3 grid gap-4 sm:grid-cols-2",
                        TextField {
                            label: "Company name",
                            value: current.billing_company_name.clone().unwrap_or_default(),
                            required: true,
                            oninput: move |v| form.write().billing_company_name = optional(v),
                        }
                        TextField {
                            label: "RFC",
                            value: current.billing_rfc.clone().unwrap_or_default(),
                            required: true,
                            oninput: move |v| form.write().billing_rfc = optional(v),
                        }
                        TextField {
                            label: "CFDI use",
                            value: current.cfdi_use.clone().unwrap_or_default(),
                            placeholder: "G03",
                            oninput: move |v| form.write().cfdi_use = optional(v),
                        }
                        TextField {
                            label: "Send invoice to",
                            value: current.billing_contact_methods.clone().unwrap_or_default(),
                            placeholder: "email or WhatsApp",
                            oninput: move |v| form.write().billing_contact_methods = optional(v),
                        }
                    }
                }
            }

            Card { title: "Payment",
                SelectField {
                    label: "Payment method",
                    value: current.payment_method.as_str().to_string(),
                    options: PaymentMethod::ALL
                        .iter()
                        .map(|m| (m.as_str().to_string(), payment_method_label(*m).to_string()))
                        .collect::<Vec<_>>(),
                    onchange: move |v: String| {
                        if let Some(method) = PaymentMethod::parse(&v) {
                            form.write().payment_method = method;
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn CostSummary(form: Signal<ReservationForm>, trip: Trip, space_count: usize) -> Element {
    let estimate = form.read().estimate(&trip, space_count);
    let currency = trip.currency.clone();
    rsx! {
        Card { title: "Estimated cost",
            dl { class: "grid grid-cols-2 gap-y-1 text-sm",
                dt { class: "text-slate-500", "{space_count} space(s)" }
                dd { class: "text-right", {format::money(estimate.spaces, &currency)} }
                if estimate.pickup > 0.0 {
                    dt { class: "text-slate-500", "Pickup" }
                    dd { class: "text-right", {format::money(estimate.pickup, &currency)} }
                }
                if estimate.labeling > 0.0 {
                    dt { class: "text-slate-500", "Labeling" }
                    dd { class: "text-right", {format::money(estimate.labeling, &currency)} }
                }
                if estimate.bond > 0.0 {
                    dt { class: "text-slate-500", "Bond" }
                    dd { class: "text-right", {format::money(estimate.bond, &currency)} }
                }
                dt { class: "border-t border-slate-200 pt-1 font-semibold dark:border-slate-700", "Total" }
                dd { class: "border-t border-slate-200 pt-1 text-right font-semibold dark:border-slate-700",
                    {format::money(estimate.total, &currency)}
                }
                if let Some(mxn) = estimate.total_mxn {
                    dt { class: "text-xs text-slate-400", "Approx." }
                    dd { class: "text-right text-xs text-slate-400", {format::money(mxn, "MXN")} }
                }
            }
            p { class: "mt-3 text-xs text-slate-400", "Taxes and the final amount are calculated when the reservation is created." }
        }
    }
}
