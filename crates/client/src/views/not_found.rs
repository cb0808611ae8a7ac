use dioxus::prelude::*;

use crate::routes::Route;

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");
    rsx! {
        div { class: "flex min-h-screen flex-col items-center justify-center gap-4 text-slate-600 dark:text-slate-300",
            h1 { class: "text-4xl font-bold", "404" }
            p { "Nothing lives at /{path}" }
            Link { to: Route::Home {}, class: "text-blue-600 hover:underline", "Go home" }
        }
    }
}
