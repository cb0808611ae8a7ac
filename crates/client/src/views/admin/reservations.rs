use dioxus::prelude::*;
use keikichi_shared::{
    ConfirmPaymentRequest, PaymentStatus, QueryScope, ReservationFilters, ReservationListItem,
    ReservationStatus,
};

use crate::auth_session::AuthContext;
use crate::components::ui::{
    payment_method_label, payment_status_label, reservation_status_label, Button, ButtonVariant,
    ErrorBox, Loading, Pagination, PaymentStatusBadge, ReservationStatusBadge, SelectField,
};
use crate::components::ReservationDetailModal;
use crate::format;
use crate::hooks::use_query;
use crate::stores::{invalidate_all, toasts};

const PAGE_SIZE: u32 = 20;

fn refresh(id: &str) {
    invalidate_all([
        QueryScope::Reservations,
        QueryScope::AdminReservations,
        QueryScope::Reservation(id.to_string()),
        QueryScope::DashboardStats,
    ]);
}

fn with_any(options: impl Iterator<Item = (String, String)>) -> Vec<(String, String)> {
    std::iter::once((String::new(), "Any".to_string()))
        .chain(options)
        .collect()
}

#[component]
pub fn AdminReservations() -> Element {
    let auth = use_context::<AuthContext>();
    let mut page = use_signal(|| 1u32);
    let mut filters = use_signal(ReservationFilters::default);
    let mut detail = use_signal(|| None::<String>);

    let reservations = use_query(
        || QueryScope::AdminReservations,
        move || async move {
            let current = filters();
            auth.client().reservations(page(), PAGE_SIZE, &current).await
        },
    );

    let status_options = with_any(
        ReservationStatus::ALL
            .into_iter()
            .map(|s| (s.as_str().to_string(), reservation_status_label(s).0.to_string())),
    );
    let payment_options = with_any(
        PaymentStatus::ALL
            .into_iter()
            .map(|s| (s.as_str().to_string(), payment_status_label(s).0.to_string())),
    );
    let current = filters();

    rsx! {
        div { class: "space-y-4",
            h1 { class: "text-2xl font-bold", "Reservations" }
            div { class: "grid max-w-xl gap-4 sm:grid-cols-2",
                SelectField {
                    label: "Status",
                    value: current.status.map(|s| s.as_str().to_string()).unwrap_or_default(),
                    options: status_options,
                    onchange: move |v: String| {
                        filters.write().status = ReservationStatus::ALL.into_iter().find(|s| s.as_str() == v);
                        page.set(1);
                    },
                }
                SelectField {
                    label: "Payment",
                    value: current.payment_status.map(|s| s.as_str().to_string()).unwrap_or_default(),
                    options: payment_options,
                    onchange: move |v: String| {
                        filters.write().payment_status = PaymentStatus::ALL.into_iter().find(|s| s.as_str() == v);
                        page.set(1);
                    },
                }
            }

            match reservations.read().as_ref() {
                Some(Ok(result)) if result.items.is_empty() => rsx! {
                    p { class: "py-12 text-center text-slate-500", "No reservations match these filters." }
                },
                Some(Ok(result)) => rsx! {
                    div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white dark:border-slate-800 dark:bg-slate-900",
                        table { class: "w-full text-left text-sm",
                            thead { class: "bg-slate-50 text-xs uppercase text-slate-500 dark:bg-slate-800",
                                tr {
                                    th { class: "px-4 py-2", "Client" }
                                    th { class: "px-4 py-2", "Trip" }
                                    th { class: "px-4 py-2", "Spaces" }
                                    th { class: "px-4 py-2", "Total" }
                                    th { class: "px-4 py-2", "Status" }
                                    th { class: "px-4 py-2", "Payment" }
                                    th { class: "px-4 py-2", "" }
                                }
                            }
                            tbody {
                                for item in result.items.iter().cloned() {
                                    AdminReservationRow {
                                        key: "{item.id}",
                                        item,
                                        ondetail: move |id| detail.set(Some(id)),
                                    }
                                }
                            }
                        }
                    }
                    Pagination {
                        page: result.page,
                        pages: result.pages,
                        total: result.total,
                        onpage: move |p| page.set(p),
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

        if let Some(id) = detail() {
            ReservationDetailModal {
                reservation_id: id,
                show_audit: true,
                onclose: move |_| detail.set(None),
            }
        }
    }
}

#[component]
fn AdminReservationRow(item: ReservationListItem, ondetail: EventHandler<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut busy = use_signal(|| false);

    let currency = item.currency.clone().unwrap_or_else(|| "USD".to_string());
    let route = match (&item.trip_origin, &item.trip_destination) {
        (Some(from), Some(to)) => format!("{from} → {to}"),
        _ => format::short_id(&item.trip_id).to_string(),
    };
    let client = item.client_name.clone().unwrap_or_else(|| "-".to_string());
    let reviewable = item.payment_status == PaymentStatus::PendingReview
        || (item.payment_status == PaymentStatus::Unpaid && item.status == ReservationStatus::Pending);
    let cancellable = item.status != ReservationStatus::Cancelled;
    let id = item.id.clone();

    let review = {
        let id = id.clone();
        move |approved: bool| {
            let id = id.clone();
            async move {
                busy.set(true);
                let req = ConfirmPaymentRequest { approved, notes: None };
                match auth.client().confirm_payment(&id, &req).await {
                    Ok(res) => {
                        toasts::success(res.message);
                        refresh(&id);
                    }
                    Err(e) => toasts::error(&e),
                }
                busy.set(false);
            }
        }
    };
    let approve = review.clone();
    let reject = review;

    let cancel = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            async move {
                busy.set(true);
                match auth.client().cancel_reservation(&id).await {
                    Ok(()) => {
                        toasts::success("Reservation cancelled");
                        refresh(&id);
                    }
                    Err(e) => toasts::error(&e),
                }
                busy.set(false);
            }
        }
    };

    let delete = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            async move {
                busy.set(true);
                match auth.client().delete_reservation(&id).await {
                    Ok(()) => {
                        toasts::success("Reservation deleted");
                        refresh(&id);
                    }
                    Err(e) => toasts::error(&e),
                }
                busy.set(false);
            }
        }
    };

    rsx! {
        tr { class: "border-t border-slate-100 align-top dark:border-slate-800",
            td { class: "px-4 py-3",
                p { class: "font-medium", "{client}" }
                p { class: "text-xs text-slate-500", {format::timestamp(item.created_at)} }
            }
            td { class: "px-4 py-3", "{route}" }
            td { class: "px-4 py-3", "{item.spaces_count}" }
            td { class: "px-4 py-3", {format::money(item.total_amount, &currency)} }
            td { class: "px-4 py-3",
                ReservationStatusBadge { status: item.status }
            }
            td { class: "px-4 py-3 space-y-1",
                PaymentStatusBadge { status: item.payment_status }
                p { class: "text-xs text-slate-500", {payment_method_label(item.payment_method)} }
            }
            td { class: "px-4 py-3",
                div { class: "flex flex-wrap justify-end gap-2",
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| ondetail.call(id.clone()),
                        "Details"
                    }
                    if reviewable {
                        Button {
                            variant: ButtonVariant::Primary,
                            disabled: busy(),
                            onclick: move |_| approve(true),
                            "Confirm payment"
                        }
                        Button {
                            variant: ButtonVariant::Secondary,
                            disabled: busy(),
                            onclick: move |_| reject(false),
                            "Reject"
                        }
                    }
                    if cancellable {
                        Button {
                            variant: ButtonVariant::Secondary,
                            disabled: busy(),
                            onclick: cancel,
                            "Cancel"
                        }
                    }
                    Button {
                        variant: ButtonVariant::Danger,
                        disabled: busy(),
                        onclick: delete,
                        "Delete"
                    }
                }
            }
        }
    }
}
