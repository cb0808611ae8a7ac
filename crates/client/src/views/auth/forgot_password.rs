use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, ErrorBox, TextField};
use crate::routes::Route;

#[component]
pub fn ForgotPassword() -> Element {
    let auth = use_context::<AuthContext>();
    let mut email = use_signal(String::new);
    let mut sent = use_signal(|| None::<String>);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);

    rsx! {
        h2 { class: "mb-2 text-xl font-semibold", "Reset your password" }
        p { class: "mb-4 text-sm text-slate-500",
            "We will email you a link to choose a new password."
        }
        if let Some(message) = sent.cloned() {
            div { class: "rounded-md border border-green-200 bg-green-50 p-4 text-sm text-green-800", "{message}" }
        } else {
            if let Some(e) = error.cloned() {
                div { class: "mb-4",
                    ErrorBox { message: e }
                }
            }
            form {
                class: "space-y-4",
                onsubmit: move |e| async move {
                    e.prevent_default();
                    is_submitting.set(true);
                    error.set(None);
                    let email_value = email.read().trim().to_string();
                    match auth.client().forgot_password(&email_value).await {
                        Ok(res) => sent.set(Some(res.message)),
                        Err(e) => error.set(Some(e.user_message())),
                    }
                    is_submitting.set(false);
                },
                TextField {
                    label: "Email",
                    r#type: "email",
                    value: email.cloned(),
                    required: true,
                    oninput: move |v| email.set(v),
                }
                Button {
                    r#type: "submit",
                    variant: ButtonVariant::Primary,
                    class: "w-full",
                    loading: is_submitting(),
                    "Send reset link"
                }
            }
        }
        p { class: "mt-4 text-center text-sm",
            Link { to: Route::Login {}, class: "text-blue-600 hover:underline", "Back to sign in" }
        }
    }
}
