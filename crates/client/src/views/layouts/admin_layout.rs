use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::routes::Route;

/// Admin area: staff only, with its own sub-navigation.
#[component]
pub fn AdminLayout() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        if auth.is_authenticated() && !auth.is_staff() {
            nav.replace(Route::Trips {});
        }
    });

    if !auth.is_staff() {
        return rsx! {};
    }

    let tab = "border-b-2 border-transparent px-3 py-2 text-sm font-medium text-slate-500 hover:text-slate-800 dark:hover:text-slate-200";
    let active = "border-blue-600 text-blue-700 dark:text-blue-400";

    rsx! {
        div { class: "space-y-6",
            nav { class: "flex gap-2 border-b border-slate-200 dark:border-slate-800",
                Link { to: Route::AdminDashboard {}, class: tab, active_class: active, "Dashboard" }
                Link { to: Route::AdminReservations {}, class: tab, active_class: active, "Reservations" }
                Link { to: Route::AdminTrips {}, class: tab, active_class: active, "Trips" }
                Link { to: Route::AdminVerifications {}, class: tab, active_class: active, "Verifications" }
            }
            Outlet::<Route> {}
        }
    }
}
