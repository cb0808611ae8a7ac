use dioxus::prelude::*;

/// Previous/next pager. `page` is 1-based.
#[component]
pub fn Pagination(page: u32, pages: u32, total: u32, onpage: EventHandler<u32>) -> Element {
    let pages = pages.max(1);
    let btn = "rounded-md border border-slate-300 px-3 py-1 text-sm disabled:opacity-40 dark:border-slate-600";
    rsx! {
        div { class: "mt-4 flex items-center justify-between text-sm text-slate-500",
            span { "{total} result(s)" }
            div { class: "flex items-center gap-2",
                button {
                    class: btn,
                    disabled: page <= 1,
                    onclick: move |_| onpage.call(page.saturating_sub(1).max(1)),
                    "Previous"
                }
                span { "Page {page} of {pages}" }
                button {
                    class: btn,
                    disabled: page >= pages,
                    onclick: move |_| onpage.call((page + 1).min(pages)),
                    "Next"
                }
            }
        }
    }
}
