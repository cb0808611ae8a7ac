use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::routes::Route;

/// Landing route: staff go to the dashboard, clients to the trip list.
#[component]
pub fn Home() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();

    use_effect(move || {
        let target = if auth.is_staff() {
            Route::AdminDashboard {}
        } else {
            Route::Trips {}
        };
        nav.replace(target);
    });

    rsx! {
        div { class: "flex items-center justify-center py-12 text-slate-500", "Redirecting..." }
    }
}
