use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::routes::Route;

/// Centered card for the signed-out pages. Signed-in users go to the trips.
#[component]
pub fn AuthLayout() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        if auth.is_authenticated() {
            nav.replace(Route::Trips {});
        }
    });

    rsx! {
        div { class: "flex min-h-screen items-center justify-center bg-gradient-to-br from-slate-100 to-blue-50 px-4 py-12 dark:from-slate-950 dark:to-slate-900",
            div { class: "w-full max-w-md",
                h1 { class: "mb-6 text-center text-3xl font-bold text-blue-700 dark:text-blue-400", "Keikichi Logistics" }
                div { class: "rounded-lg border border-slate-200 bg-white p-6 shadow-sm dark:border-slate-800 dark:bg-slate-900",
                    Outlet::<Route> {}
                }
            }
        }
    }
}
