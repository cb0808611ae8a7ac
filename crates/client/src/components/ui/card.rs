use dioxus::prelude::*;

#[component]
pub fn Card(
    #[props(optional)] title: Option<String>,
    #[props(optional)] class: Option<String>,
    children: Element,
) -> Element {
    let class = format!(
        "rounded-lg border border-slate-200 bg-white p-4 shadow-sm dark:border-slate-700 dark:bg-slate-900 {}",
        class.unwrap_or_default()
    );
    rsx! {
        div { class,
            if let Some(title) = title {
                h3 { class: "mb-3 text-lg font-semibold text-slate-800 dark:text-slate-100", "{title}" }
            }
            {children}
        }
    }
}

/// Centered loading line used while a query is in flight.
#[component]
pub fn Loading(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "flex items-center justify-center py-12 text-sm text-slate-500", "{label}" }
    }
}

#[component]
pub fn ErrorBox(message: String) -> Element {
    rsx! {
        div { class: "rounded-md border border-red-200 bg-red-50 p-4 text-sm text-red-700 dark:border-red-900 dark:bg-red-950 dark:text-red-300",
            "{message}"
        }
    }
}
