//! Grid of trip spaces.

use dioxus::prelude::*;
use keikichi_shared::selection::is_clickable;
use keikichi_shared::{Space, SpaceStatus, SpaceSummary};

use crate::components::ui::space_status_label;

fn tile_class(space: &Space, selected: bool, clickable: bool) -> String {
    let palette = if selected {
        "bg-blue-600 text-white border-blue-700"
    } else {
        match space.status {
            SpaceStatus::Available => "bg-green-50 text-green-800 border-green-300 dark:bg-green-950 dark:text-green-300 dark:border-green-800",
            SpaceStatus::OnHold if space.is_mine() => "bg-amber-100 text-amber-900 border-amber-400 dark:bg-amber-950 dark:text-amber-200",
            SpaceStatus::OnHold => "bg-yellow-50 text-yellow-800 border-yellow-300 dark:bg-yellow-950 dark:text-yellow-300",
            SpaceStatus::Reserved if space.is_mine() => "bg-indigo-100 text-indigo-900 border-indigo-400 dark:bg-indigo-950 dark:text-indigo-200",
            SpaceStatus::Reserved => "bg-red-50 text-red-800 border-red-300 dark:bg-red-950 dark:text-red-300",
            SpaceStatus::Blocked => "bg-slate-200 text-slate-500 border-slate-300 dark:bg-slate-800 dark:text-slate-500",
            SpaceStatus::Internal => "bg-purple-50 text-purple-800 border-purple-300 dark:bg-purple-950 dark:text-purple-300",
        }
    };
    let cursor = if clickable {
        "cursor-pointer hover:scale-105"
    } else {
        "cursor-not-allowed opacity-70"
    };
    format!("flex h-16 flex-col items-center justify-center rounded-md border-2 text-xs font-medium transition-transform {palette} {cursor}")
}

/// Client mode only lets clickable spaces be picked; admin mode lets every
/// space be picked.
#[component]
pub fn SpaceMap(
    spaces: Vec<Space>,
    selected: Vec<String>,
    on_toggle: EventHandler<Space>,
    #[props(default)] admin: bool,
) -> Element {
    rsx! {
        div { class: "grid grid-cols-4 gap-2 sm:grid-cols-6 lg:grid-cols-10",
            for space in spaces {
                {
                    let is_selected = selected.contains(&space.id);
                    let clickable = admin || is_selected || is_clickable(&space);
                    let (label, _) = space_status_label(space.status);
                    let title = if space.is_mine() { format!("{label} (yours)") } else { label.to_string() };
                    rsx! {
                        button {
                            key: "{space.id}",
                            class: tile_class(&space, is_selected, clickable),
                            title: "{title}",
                            disabled: !clickable,
                            onclick: {
                                let space = space.clone();
                                move |_| on_toggle.call(space.clone())
                            },
                            span { class: "text-base font-bold", "{space.space_number}" }
                            span { class: "text-[10px] uppercase tracking-wide", "{label}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
pub fn SpaceLegend(summary: SpaceSummary) -> Element {
    rsx! {
        div { class: "flex flex-wrap gap-3 text-xs text-slate-600 dark:text-slate-400",
            for status in SpaceStatus::ALL {
                {
                    let (label, _) = space_status_label(status);
                    let count = summary.count(status);
                    rsx! {
                        span { key: "{status}", "{label}: {count}" }
                    }
                }
            }
        }
    }
}
