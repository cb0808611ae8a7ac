use dioxus::prelude::*;
use keikichi_shared::catalog::matching;

const FIELD_CLASS: &str = "w-full rounded-md border border-slate-300 bg-white px-3 py-2 text-sm focus:border-blue-500 focus:outline-none focus:ring-1 focus:ring-blue-500 dark:border-slate-600 dark:bg-slate-800 dark:text-slate-100";

#[derive(Props, Clone, PartialEq)]
pub struct TextFieldProps {
    pub label: String,
    pub value: String,
    pub oninput: EventHandler<String>,
    #[props(default = "text".to_string())]
    pub r#type: String,
    #[props(optional)]
    pub placeholder: Option<String>,
    #[props(optional)]
    pub error: Option<String>,
    #[props(default)]
    pub required: bool,
}

#[component]
pub fn TextField(props: TextFieldProps) -> Element {
    rsx! {
        label { class: "block space-y-1",
            span { class: "text-sm font-medium text-slate-700 dark:text-slate-300", "{props.label}" }
            input {
                class: FIELD_CLASS,
                r#type: "{props.r#type}",
                value: "{props.value}",
                placeholder: props.placeholder.clone().unwrap_or_default(),
                required: props.required,
                oninput: move |evt| props.oninput.call(evt.value()),
            }
            if let Some(error) = &props.error {
                span { class: "text-xs text-red-600", "{error}" }
            }
        }
    }
}

/// Most suggestions an [`AutocompleteField`] lists at once.
const MAX_SUGGESTIONS: usize = 8;

/// Free text input with suggestions from `options` that contain what has
/// been typed so far.
#[component]
pub fn AutocompleteField(
    label: String,
    /// Unique per page; ties the input to its suggestion list.
    list_id: String,
    value: String,
    options: Vec<String>,
    #[props(optional)] placeholder: Option<String>,
    #[props(optional)] error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    let suggestions: Vec<String> = matching(&options, &value)
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect();
    rsx! {
        label { class: "block space-y-1",
            span { class: "text-sm font-medium text-slate-700 dark:text-slate-300", "{label}" }
            input {
                class: FIELD_CLASS,
                r#type: "text",
                list: "{list_id}",
                autocomplete: "off",
                value: "{value}",
                placeholder: placeholder.unwrap_or_default(),
                oninput: move |evt| oninput.call(evt.value()),
            }
            datalist { id: "{list_id}",
                for suggestion in suggestions {
                    option { key: "{suggestion}", value: "{suggestion}" }
                }
            }
            if let Some(error) = &error {
                span { class: "text-xs text-red-600", "{error}" }
            }
        }
    }
}

#[component]
pub fn Checkbox(label: String, checked: bool, onchange: EventHandler<bool>) -> Element {
    rsx! {
        label { class: "flex items-center gap-2 text-sm text-slate-700 dark:text-slate-300",
            input {
                r#type: "checkbox",
                class: "h-4 w-4 rounded border-slate-300",
                checked,
                onchange: move |evt| onchange.call(evt.checked()),
            }
            "{label}"
        }
    }
}

/// A `<select>` over `(value, label)` pairs.
#[component]
pub fn SelectField(
    label: String,
    value: String,
    options: Vec<(String, String)>,
    onchange: EventHandler<String>,
) -> Element {
    rsx! {
        label { class: "block space-y-1",
            span { class: "text-sm font-medium text-slate-700 dark:text-slate-300", "{label}" }
            select {
                class: FIELD_CLASS,
                value: "{value}",
                onchange: move |evt| onchange.call(evt.value()),
                for (option_value, option_label) in options {
                    option {
                        value: "{option_value}",
                        selected: option_value == value,
                        "{option_label}"
                    }
                }
            }
        }
    }
}
