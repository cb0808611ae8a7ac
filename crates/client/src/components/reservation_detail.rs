//! Reservation detail modal, with the audit trail for staff.

use dioxus::prelude::*;
use keikichi_shared::{AuditLogEntry, QueryScope, Reservation};

use crate::auth_session::AuthContext;
use crate::components::ui::{
    payment_method_label, ErrorBox, Loading, Modal, PaymentStatusBadge, ReservationStatusBadge,
};
use crate::format;
use crate::hooks::use_query;

#[component]
pub fn ReservationDetailModal(
    reservation_id: ReadSignal<String>,
    #[props(default)] show_audit: bool,
    onclose: EventHandler<()>,
) -> Element {
    let auth = use_context::<AuthContext>();

    let reservation = use_query(
        move || QueryScope::Reservation(reservation_id()),
        move || async move { auth.client().reservation(&reservation_id()).await },
    );

    let audit = use_resource(move || async move {
        if !show_audit {
            return Ok(Vec::new());
        }
        auth.client()
            .audit_history(&reservation_id())
            .await
            .map(|h| h.audit_history)
    });

    let title = format!("Reservation {}", format::short_id(&reservation_id()));

    rsx! {
        Modal { title, onclose,
            match reservation.read().as_ref() {
                Some(Ok(r)) => rsx! {
                    ReservationBody { reservation: r.clone() }
                },
                Some(Err(e)) => rsx! {
                    ErrorBox { message: e.user_message() }
                },
                None => rsx! {
                    Loading {}
                },
            }

            if show_audit {
                div { class: "mt-6",
                    h3 { class: "mb-2 text-sm font-semibold uppercase tracking-wide text-slate-500", "History" }
                    match audit.read().as_ref() {
                        Some(Ok(entries)) if entries.is_empty() => rsx! {
                            p { class: "text-sm text-slate-500", "No changes recorded" }
                        },
                        Some(Ok(entries)) => rsx! {
                            ul { class: "space-y-2",
                                for entry in entries.iter().cloned() {
                                    AuditRow { key: "{entry.id}", entry }
                                }
                            }
                        },
                        Some(Err(e)) => rsx! {
                            ErrorBox { message: e.user_message() }
                        },
                        None => rsx! {
                            Loading { label: "Loading history..." }
                        },
                    }
                }
            }
        }
    }
}

#[component]
fn ReservationBody(reservation: Reservation) -> Element {
    let currency = reservation
        .trip
        .as_ref()
        .and_then(|t| t.currency.clone())
        .unwrap_or_else(|| "USD".to_string());
    let route = reservation
        .trip
        .as_ref()
        .map(|t| format!("{} → {} ({})", t.origin, t.destination, t.departure_date))
        .unwrap_or_default();
    let spaces = reservation
        .spaces
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|s| s.space_number.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let items = reservation.items.clone().unwrap_or_default();
    let client = reservation
        .client_name
        .clone()
        .or_else(|| reservation.client_email.clone())
        .unwrap_or_default();

    rsx! {
        div { class: "space-y-4 text-sm",
            div { class: "flex flex-wrap items-center gap-2",
                ReservationStatusBadge { status: reservation.status }
                PaymentStatusBadge { status: reservation.payment_status }
                span { class: "text-slate-500", {payment_method_label(reservation.payment_method)} }
            }
            dl { class: "grid grid-cols-2 gap-x-4 gap-y-2",
                dt { class: "text-slate-500", "Route" }
                dd { "{route}" }
                if !client.is_empty() {
                    dt { class: "text-slate-500", "Client" }
                    dd { "{client}" }
                }
                dt { class: "text-slate-500", "Spaces" }
                dd { "{spaces}" }
                dt { class: "text-slate-500", "Subtotal" }
                dd { {format::money(reservation.subtotal, &currency)} }
                dt { class: "text-slate-500", "Tax" }
                dd { {format::money(reservation.tax_amount, &currency)} }
                dt { class: "font-semibold", "Total" }
                dd { class: "font-semibold", {format::money(reservation.total_amount, &currency)} }
                dt { class: "text-slate-500", "Created" }
                dd { {format::timestamp(reservation.created_at)} }
            }
            if !items.is_empty() {
                table { class: "w-full text-left text-xs",
                    thead {
                        tr { class: "border-b border-slate-200 dark:border-slate-700",
                            th { class: "py-1", "Product" }
                            th { "Boxes" }
                            th { "Weight" }
                            th { "Labeling" }
                        }
                    }
                    tbody {
                        for item in items {
                            tr { key: "{item.id}", class: "border-b border-slate-100 dark:border-slate-800",
                                td { class: "py-1", "{item.product_name}" }
                                td { "{item.box_count}" }
                                td { "{item.total_weight} {item.weight_unit.clone().unwrap_or_default()}" }
                                td {
                                    if item.labeling_required {
                                        "{item.label_quantity.unwrap_or(0)} labels"
                                    } else {
                                        "No"
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
fn AuditRow(entry: AuditLogEntry) -> Element {
    let when = format::timestamp(entry.created_at);
    let changes = entry
        .new_values
        .as_ref()
        .map(|v| v.to_string())
        .unwrap_or_default();
    rsx! {
        li { class: "rounded border border-slate-200 p-2 text-xs dark:border-slate-700",
            div { class: "flex justify-between",
                span { class: "font-medium", "{entry.action}" }
                span { class: "text-slate-400", "{when}" }
            }
            p { class: "text-slate-500", "by {entry.performed_by}" }
            if !changes.is_empty() {
                code { class: "mt-1 block break-all text-[10px] text-slate-500", "{changes}" }
            }
        }
    }
}
