use dioxus::prelude::*;

#[component]
pub fn Modal(title: String, onclose: EventHandler<()>, children: Element) -> Element {
    rsx! {
        div {
            class: "fixed inset-0 z-40 flex items-center justify-center bg-black/50 p-4",
            onclick: move |_| onclose.call(()),
            div {
                class: "max-h-[90vh] w-full max-w-2xl overflow-y-auto rounded-lg bg-white p-6 shadow-xl dark:bg-slate-900",
                onclick: move |evt| evt.stop_propagation(),
                div { class: "mb-4 flex items-center justify-between",
                    h2 { class: "text-lg font-semibold text-slate-900 dark:text-slate-100", "{title}" }
                    button {
                        class: "rounded p-1 text-slate-500 hover:bg-slate-100 dark:hover:bg-slate-800",
                        onclick: move |_| onclose.call(()),
                        "✕"
                    }
                }
                {children}
            }
        }
    }
}
