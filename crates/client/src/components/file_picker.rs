use dioxus::prelude::*;

use crate::api_client::Upload;

/// Read the first file of a file-input change event.
pub async fn read_upload(evt: FormEvent) -> Option<Upload> {
    let file = evt.files().into_iter().next()?;
    let file_name = file.name();
    let mime = file.content_type();
    match file.read_bytes().await {
        Ok(bytes) => Some(Upload {
            file_name,
            mime,
            bytes: bytes.to_vec(),
        }),
        Err(e) => {
            crate::log_warn!("Could not read {}: {}", file_name, e);
            None
        }
    }
}

/// File input that hands the picked file to `onpick`.
#[component]
pub fn FilePicker(
    label: String,
    #[props(default = ".pdf,.jpg,.jpeg,.png".to_string())] accept: String,
    #[props(optional)] picked: Option<String>,
    onpick: EventHandler<Upload>,
) -> Element {
    rsx! {
        label { class: "block space-y-1",
            span { class: "text-sm font-medium text-slate-700 dark:text-slate-300", "{label}" }
            input {
                r#type: "file",
                accept: "{accept}",
                class: "block w-full text-sm text-slate-600 file:mr-3 file:rounded-md file:border-0 file:bg-blue-50 file:px-3 file:py-1.5 file:text-blue-700 dark:text-slate-400",
                onchange: move |evt| async move {
                    if let Some(upload) = read_upload(evt).await {
                        onpick.call(upload);
                    }
                },
            }
            if let Some(name) = picked {
                span { class: "text-xs text-green-700 dark:text-green-400", "Attached: {name}" }
            }
        }
    }
}
