use std::time::Duration;

use dioxus::prelude::*;
use keikichi_shared::ToastKind;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::stores::toasts::{self, TOASTS};

/// Renders the toast queue in a corner of the screen.
#[component]
pub fn ToastHost() -> Element {
    let ttl = use_context::<ClientConfig>().toast_ttl;
    let toasts: Vec<_> = TOASTS.read().iter().cloned().collect();

    rsx! {
        div { class: "pointer-events-none fixed bottom-4 right-4 z-50 flex w-80 flex-col gap-2",
            for toast in toasts {
                ToastItem {
                    key: "{toast.id}",
                    id: toast.id,
                    kind: toast.kind,
                    text: toast.text,
                    ttl,
                }
            }
        }
    }
}

#[component]
fn ToastItem(id: Uuid, kind: ToastKind, text: String, ttl: Duration) -> Element {
    use_future(move || async move {
        crate::timer::sleep(ttl).await;
        toasts::dismiss(id);
    });

    let palette = match kind {
        ToastKind::Info => "border-blue-300 bg-blue-50 text-blue-900",
        ToastKind::Success => "border-green-300 bg-green-50 text-green-900",
        ToastKind::Warning => "border-yellow-300 bg-yellow-50 text-yellow-900",
        ToastKind::Error => "border-red-300 bg-red-50 text-red-900",
    };

    rsx! {
        div { class: "pointer-events-auto flex items-start justify-between gap-3 rounded-md border p-3 text-sm shadow-md {palette}",
            span { "{text}" }
            button {
                class: "text-xs opacity-60 hover:opacity-100",
                onclick: move |_| toasts::dismiss(id),
                "✕"
            }
        }
    }
}
