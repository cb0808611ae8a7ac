use dioxus::prelude::*;
use keikichi_shared::{PaymentMethod, PaymentStatus, ReservationStatus, SpaceStatus, TripStatus};

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

impl Tone {
    fn class(self) -> &'static str {
        match self {
            Tone::Neutral => "bg-slate-100 text-slate-700 dark:bg-slate-800 dark:text-slate-300",
            Tone::Info => "bg-blue-100 text-blue-800 dark:bg-blue-950 dark:text-blue-300",
            Tone::Success => "bg-green-100 text-green-800 dark:bg-green-950 dark:text-green-300",
            Tone::Warning => "bg-yellow-100 text-yellow-800 dark:bg-yellow-950 dark:text-yellow-300",
            Tone::Danger => "bg-red-100 text-red-800 dark:bg-red-950 dark:text-red-300",
        }
    }
}

#[component]
pub fn Badge(tone: Tone, label: String) -> Element {
    rsx! {
        span { class: "inline-flex items-center rounded-full px-2 py-0.5 text-xs font-medium {tone.class()}",
            "{label}"
        }
    }
}

pub fn trip_status_label(status: TripStatus) -> (&'static str, Tone) {
    match status {
        TripStatus::Scheduled => ("Scheduled", Tone::Info),
        TripStatus::InTransit => ("In transit", Tone::Warning),
        TripStatus::Completed => ("Completed", Tone::Success),
        TripStatus::Cancelled => ("Cancelled", Tone::Danger),
    }
}

pub fn space_status_label(status: SpaceStatus) -> (&'static str, Tone) {
    match status {
        SpaceStatus::Available => ("Available", Tone::Success),
        SpaceStatus::OnHold => ("On hold", Tone::Warning),
        SpaceStatus::Reserved => ("Reserved", Tone::Danger),
        SpaceStatus::Blocked => ("Blocked", Tone::Neutral),
        SpaceStatus::Internal => ("Internal", Tone::Info),
    }
}

pub fn reservation_status_label(status: ReservationStatus) -> (&'static str, Tone) {
    match status {
        ReservationStatus::Pending => ("Pending", Tone::Warning),
        ReservationStatus::Confirmed => ("Confirmed", Tone::Success),
        ReservationStatus::Cancelled => ("Cancelled", Tone::Danger),
    }
}

pub fn payment_status_label(status: PaymentStatus) -> (&'static str, Tone) {
    match status {
        PaymentStatus::Unpaid => ("Unpaid", Tone::Neutral),
        PaymentStatus::PendingReview => ("Pending review", Tone::Warning),
        PaymentStatus::Paid => ("Paid", Tone::Success),
        PaymentStatus::Refunded => ("Refunded", Tone::Info),
    }
}

#[component]
pub fn TripStatusBadge(status: TripStatus) -> Element {
    let (label, tone) = trip_status_label(status);
    rsx! { Badge { tone, label } }
}

#[component]
pub fn ReservationStatusBadge(status: ReservationStatus) -> Element {
    let (label, tone) = reservation_status_label(status);
    rsx! { Badge { tone, label } }
}

#[component]
pub fn PaymentStatusBadge(status: PaymentStatus) -> Element {
    let (label, tone) = payment_status_label(status);
    rsx! { Badge { tone, label } }
}

pub fn payment_method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cash => "Cash",
        PaymentMethod::BankTransfer => "Bank transfer",
        PaymentMethod::Mercadopago => "Mercado Pago",
    }
}
