//! Header bell with the notification dropdown.

use dioxus::prelude::*;
use keikichi_shared::notifications::{unread_count, NotificationBell};
use keikichi_shared::{Notification, NotificationType, QueryScope};

use crate::auth_session::AuthContext;
use crate::hooks::{use_query, use_reconcile_interval};
use crate::routes::Route;
use crate::stores::{invalidate, toasts};

#[component]
pub fn NotificationBellMenu() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut bell = use_signal(NotificationBell::default);

    let notifications = use_query(
        || QueryScope::Notifications,
        move || async move { auth.client().notifications().await },
    );
    use_reconcile_interval(
        || QueryScope::Notifications,
        auth.config().notifications_reconcile,
    );

    let list: Vec<Notification> = match notifications.read().as_ref() {
        Some(Ok(list)) => list.clone(),
        _ => Vec::new(),
    };
    let unread = unread_count(&list);

    let toggle = move |_| {
        if bell.write().toggle(unread) {
            spawn(async move {
                match auth.client().mark_all_notifications_read().await {
                    Ok(()) => invalidate(QueryScope::Notifications),
                    Err(e) => crate::log_warn!("Failed to mark notifications read: {}", e),
                }
            });
        }
    };

    let mut open_notification = move |n: Notification| {
        let click = bell.write().click(&n);
        if let Some(id) = click.mark_read {
            spawn(async move {
                if let Err(e) = auth.client().mark_notification_read(&id).await {
                    crate::log_warn!("Failed to mark notification {} read: {}", id, e);
                }
                invalidate(QueryScope::Notifications);
            });
        }
        if let Some(link) = click.navigate_to {
            match link.parse::<Route>() {
                Ok(route) => {
                    nav.push(route);
                }
                Err(_) => crate::log_debug!("Ignoring notification link {}", link),
            }
        }
    };

    let delete_one = move |id: String| {
        spawn(async move {
            match auth.client().delete_notification(&id).await {
                Ok(()) => invalidate(QueryScope::Notifications),
                Err(e) => toasts::error(&e),
            }
        });
    };

    let clear_all = move |_| {
        spawn(async move {
            match auth.client().clear_notifications().await {
                Ok(()) => invalidate(QueryScope::Notifications),
                Err(e) => toasts::error(&e),
            }
        });
    };

    rsx! {
        div { class: "relative",
            button {
                class: "relative rounded-full p-2 text-slate-600 hover:bg-slate-100 dark:text-slate-300 dark:hover:bg-slate-800",
                title: "Notifications",
                onclick: toggle,
                svg {
                    class: "h-6 w-6",
                    fill: "none",
                    stroke: "currentColor",
                    view_box: "0 0 24 24",
                    path {
                        stroke_linecap: "round",
                        stroke_linejoin: "round",
                        stroke_width: "2",
                        d: "M15 17h5l-1.405-1.405A2.032 2.032 0 0118 14.158V11a6.002 6.002 0 00-4-5.659V5a2 2 0 10-4 0v.341C7.67 6.165 6 8.388 6 11v3.159c0 .538-.214 1.055-.595 1.436L4 17h5m6 0v1a3 3 0 11-6 0v-1m6 0H9",
                    }
                }
                if unread > 0 {
                    span { class: "absolute -right-0.5 -top-0.5 flex h-5 min-w-5 items-center justify-center rounded-full bg-red-600 px-1 text-[10px] font-bold text-white",
                        if unread > 9 { "9+" } else { "{unread}" }
                    }
                }
            }

            if bell.read().is_open() {
                div { class: "absolute right-0 z-30 mt-2 w-80 rounded-lg border border-slate-200 bg-white shadow-lg dark:border-slate-700 dark:bg-slate-900",
                    div { class: "flex items-center justify-between border-b border-slate-200 px-4 py-2 dark:border-slate-700",
                        span { class: "text-sm font-semibold", "Notifications" }
                        if !list.is_empty() {
                            button {
                                class: "text-xs text-slate-500 hover:text-red-600",
                                onclick: clear_all,
                                "Clear all"
                            }
                        }
                    }
                    div { class: "max-h-96 overflow-y-auto",
                        if list.is_empty() {
                            p { class: "px-4 py-6 text-center text-sm text-slate-500", "No notifications" }
                        }
                        for n in list {
                            {
                                let id = n.id.clone();
                                let dot = match n.kind {
                                    NotificationType::Info => "bg-blue-500",
                                    NotificationType::Success => "bg-green-500",
                                    NotificationType::Warning => "bg-yellow-500",
                                    NotificationType::Error => "bg-red-500",
                                };
                                let row = if n.is_read { "" } else { "bg-blue-50/60 dark:bg-blue-950/40" };
                                let when = crate::format::timestamp(n.created_at);
                                rsx! {
                                    div {
                                        key: "{n.id}",
                                        class: "group flex cursor-pointer gap-3 border-b border-slate-100 px-4 py-3 hover:bg-slate-50 dark:border-slate-800 dark:hover:bg-slate-800 {row}",
                                        onclick: {
                                            let n = n.clone();
                                            move |_| open_notification(n.clone())
                                        },
                                        span { class: "mt-1.5 h-2 w-2 shrink-0 rounded-full {dot}" }
                                        div { class: "min-w-0 flex-1",
                                            p { class: "text-sm font-medium", "{n.title}" }
                                            p { class: "text-xs text-slate-600 dark:text-slate-400", "{n.message}" }
                                            p { class: "mt-1 text-[10px] text-slate-400", "{when}" }
                                        }
                                        button {
                                            class: "invisible text-xs text-slate-400 hover:text-red-600 group-hover:visible",
                                            title: "Delete",
                                            onclick: move |evt| {
                                                evt.stop_propagation();
                                                delete_one(id.clone());
                                            },
                                            "✕"
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
}
