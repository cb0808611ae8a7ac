//! The signed-in client's reservations.

use dioxus::prelude::*;
use keikichi_shared::{
    PaymentMethod, PaymentStatus, QueryScope, ReservationFilters, ReservationListItem,
    ReservationStatus, ReservationUpdate,
};

use crate::auth_session::AuthContext;
use crate::components::ui::{
    payment_method_label, Button, ButtonVariant, ErrorBox, Loading, Pagination,
    PaymentStatusBadge, ReservationStatusBadge,
};
use crate::components::{read_upload, ReservationDetailModal};
use crate::downloads;
use crate::format;
use crate::hooks::use_query;
use crate::stores::{invalidate_all, toasts};

pub const PAGE_SIZE: u32 = 10;

fn refresh(id: &str) {
    invalidate_all([
        QueryScope::Reservations,
        QueryScope::AdminReservations,
        QueryScope::Reservation(id.to_string()),
    ]);
}

#[component]
pub fn MyReservations() -> Element {
    let auth = use_context::<AuthContext>();
    let mut page = use_signal(|| 1u32);
    let mut detail = use_signal(|| None::<String>);

    let reservations = use_query(
        || QueryScope::Reservations,
        move || async move {
            let filters = ReservationFilters {
                client_id: auth.user().map(|u| u.id),
                ..Default::default()
            };
            auth.client().reservations(page(), PAGE_SIZE, &filters).await
        },
    );

    rsx! {
        div { class: "space-y-4",
            h1 { class: "text-2xl font-bold", "My reservations" }
            match reservations.read().as_ref() {
                Some(Ok(result)) if result.items.is_empty() => rsx! {
                    p { class: "py-12 text-center text-slate-500", "You have no reservations yet." }
                },
                Some(Ok(result)) => rsx! {
                    div { class: "overflow-x-auto rounded-lg border border-slate-200 bg-white dark:border-slate-800 dark:bg-slate-900",
                        table { class: "w-full text-left text-sm",
                            thead { class: "bg-slate-50 text-xs uppercase text-slate-500 dark:bg-slate-800",
                                tr {
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
                                    ReservationRow {
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
                onclose: move |_| detail.set(None),
            }
        }
    }
}

#[component]
fn ReservationRow(item: ReservationListItem, ondetail: EventHandler<String>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut busy = use_signal(|| false);

    let currency = item.currency.clone().unwrap_or_else(|| "USD".to_string());
    let route = match (&item.trip_origin, &item.trip_destination) {
        (Some(from), Some(to)) => format!("{from} → {to}"),
        _ => format::short_id(&item.trip_id).to_string(),
    };
    let date = item.trip_departure_date.clone().unwrap_or_default();
    let pending = item.status == ReservationStatus::Pending;
    let can_pay = pending && item.payment_status == PaymentStatus::Unpaid;
    let confirmed = item.status == ReservationStatus::Confirmed;
    let id = item.id.clone();

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

    let upload_proof = {
        let id = id.clone();
        move |evt: FormEvent| {
            let id = id.clone();
            async move {
                let Some(file) = read_upload(evt).await else {
                    return;
                };
                busy.set(true);
                match auth.client().upload_payment_proof(&id, &file).await {
                    Ok(res) => {
                        crate::log_info!("Payment proof stored at {}", res.payment_proof_path);
                        toasts::success("Payment proof uploaded, we will review it shortly");
                        refresh(&id);
                    }
                    Err(e) => toasts::error(&e),
                }
                busy.set(false);
            }
        }
    };

    let change_method = {
        let id = id.clone();
        move |evt: FormEvent| {
            let id = id.clone();
            async move {
                let Some(method) = PaymentMethod::parse(&evt.value()) else {
                    return;
                };
                let req = ReservationUpdate {
                    payment_method: Some(method),
                    ..Default::default()
                };
                match auth.client().update_reservation(&id, &req).await {
                    Ok(_) => {
                        toasts::success("Payment method updated");
                        refresh(&id);
                    }
                    Err(e) => toasts::error(&e),
                }
            }
        }
    };

    let ticket = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            async move {
                let fallback = format!("ticket_{}.pdf", format::short_id(&id));
                downloads::deliver(auth.client().ticket_pdf(&id).await, &fallback);
            }
        }
    };

    let summary = {
        let id = id.clone();
        move |_| {
            let id = id.clone();
            async move {
                let fallback = format!("reservation_{}.pdf", format::short_id(&id));
                downloads::deliver(auth.client().summary_pdf(&id).await, &fallback);
            }
        }
    };

    rsx! {
        tr { class: "border-t border-slate-100 align-top dark:border-slate-800",
            td { class: "px-4 py-3",
                p { class: "font-medium", "{route}" }
                p { class: "text-xs text-slate-500", "{date}" }
            }
            td { class: "px-4 py-3", "{item.spaces_count}" }
            td { class: "px-4 py-3", {format::money(item.total_amount, &currency)} }
            td { class: "px-4 py-3",
                ReservationStatusBadge { status: item.status }
            }
            td { class: "px-4 py-3 space-y-1",
                PaymentStatusBadge { status: item.payment_status }
                if can_pay {
                    select {
                        class: "block rounded border border-slate-300 bg-transparent px-1 py-0.5 text-xs dark:border-slate-600",
                        onchange: change_method,
                        for method in PaymentMethod::ALL {
                            option {
                                value: method.as_str(),
                                selected: method == item.payment_method,
                                {payment_method_label(method)}
                            }
                        }
                    }
                } else {
                    p { class: "text-xs text-slate-500", {payment_method_label(item.payment_method)} }
                }
            }
            td { class: "px-4 py-3",
                div { class: "flex flex-wrap justify-end gap-2",
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| ondetail.call(id.clone()),
                        "Details"
                    }
                    Button { variant: ButtonVariant::Ghost, onclick: summary, "Summary PDF" }
                    if confirmed {
                        Button { variant: ButtonVariant::Secondary, onclick: ticket, "Ticket" }
                    }
                    if can_pay && item.payment_method != PaymentMethod::Cash {
                        label { class: "cursor-pointer rounded-md bg-blue-50 px-3 py-2 text-sm font-medium text-blue-700 hover:bg-blue-100 dark:bg-blue-950 dark:text-blue-300",
                            "Upload proof"
                            input {
                                r#type: "file",
                                class: "hidden",
                                accept: ".pdf,.jpg,.jpeg,.png",
                                disabled: busy(),
                                onchange: upload_proof,
                            }
                        }
                    }
                    if pending {
                        Button {
                            variant: ButtonVariant::Danger,
                            loading: busy(),
                            onclick: cancel,
                            "Cancel"
                        }
                    }
                }
            }
        }
    }
}
