//! Authenticated shell: header, navigation and the notification socket.

use dioxus::prelude::*;
use keikichi_shared::auth::VerificationState;

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant};
use crate::components::NotificationBellMenu;
use crate::routes::Route;
use crate::stores::{set_theme, Theme, THEME};
use crate::ws::{use_connection_state, use_notification_socket};

/// Layout for every signed-in page. Redirects to login without a session.
#[component]
pub fn AppLayout() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        if !auth.is_authenticated() {
            nav.replace(Route::Login {});
        }
    });

    if !auth.is_authenticated() {
        return rsx! {
            div { class: "flex min-h-screen items-center justify-center text-slate-500", "Redirecting..." }
        };
    }

    rsx! {
        SignedInShell {}
    }
}

#[component]
fn SignedInShell() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    use_notification_socket();
    let socket = use_connection_state();

    let name = auth.user().map(|u| u.full_name).unwrap_or_default();
    let is_staff = auth.is_staff();
    let needs_verification = !is_staff
        && auth
            .user()
            .is_some_and(|u| VerificationState::of(&u) != VerificationState::Verified);
    let link_class = "rounded-md px-3 py-2 text-sm font-medium text-slate-600 hover:bg-slate-100 hover:text-slate-900 dark:text-slate-300 dark:hover:bg-slate-800";
    let active_class = "bg-slate-100 text-slate-900 dark:bg-slate-800 dark:text-white";
    let live_class = if socket.is_connected() { "bg-green-500" } else { "bg-slate-400" };

    rsx! {
        div { class: "min-h-screen bg-slate-50 text-slate-900 dark:bg-slate-950 dark:text-slate-100",
            header { class: "sticky top-0 z-20 border-b border-slate-200 bg-white/90 backdrop-blur dark:border-slate-800 dark:bg-slate-900/90",
                div { class: "mx-auto flex h-14 max-w-7xl items-center gap-4 px-4",
                    Link { to: Route::Trips {}, class: "text-lg font-bold text-blue-700 dark:text-blue-400", "Keikichi" }
                    nav { class: "flex flex-1 items-center gap-1",
                        Link { to: Route::Trips {}, class: link_class, active_class, "Trips" }
                        Link { to: Route::MyReservations {}, class: link_class, active_class, "My reservations" }
                        if is_staff {
                            Link { to: Route::AdminDashboard {}, class: link_class, active_class, "Admin" }
                        }
                        if needs_verification {
                            Link { to: Route::Verification {}, class: link_class, active_class, "Verify account" }
                        }
                    }
                    span {
                        class: "h-2 w-2 rounded-full {live_class}",
                        title: if socket.is_connected() { "Live updates on" } else { "Live updates off" },
                    }
                    ThemeSwitch {}
                    NotificationBellMenu {}
                    span { class: "hidden text-sm text-slate-500 sm:inline", "{name}" }
                    Button {
                        variant: ButtonVariant::Ghost,
                        onclick: move |_| {
                            spawn(async move {
                                auth.logout().await;
                                nav.replace(Route::Login {});
                            });
                        },
                        "Log out"
                    }
                }
            }
            main { class: "mx-auto max-w-7xl px-4 py-6",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn ThemeSwitch() -> Element {
    let current = *THEME.read();
    rsx! {
        select {
            class: "rounded-md border border-slate-300 bg-transparent px-2 py-1 text-xs dark:border-slate-600",
            title: "Theme",
            onchange: move |evt| {
                if let Some(theme) = Theme::ALL.into_iter().find(|t| t.label() == evt.value()) {
                    set_theme(theme);
                }
            },
            for theme in Theme::ALL {
                option {
                    value: theme.label(),
                    selected: theme == current,
                    {theme.label()}
                }
            }
        }
    }
}
