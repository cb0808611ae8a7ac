use dioxus::prelude::*;
use keikichi_shared::RegisterRequest;

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, ErrorBox, TextField};
use crate::routes::Route;
use crate::stores::toasts;

const MIN_PASSWORD_LEN: usize = 8;

#[component]
pub fn Register() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);

    rsx! {
        h2 { class: "mb-4 text-xl font-semibold", "Create an account" }
        if let Some(e) = error.cloned() {
            div { class: "mb-4",
                ErrorBox { message: e }
            }
        }
        form {
            class: "space-y-4",
            onsubmit: move |e| async move {
                e.prevent_default();
                if is_submitting() {
                    return;
                }
                if password.read().len() < MIN_PASSWORD_LEN {
                    error.set(Some(format!("Password must have at least {MIN_PASSWORD_LEN} characters")));
                    return;
                }
                if *password.read() != *confirm.read() {
                    error.set(Some("Passwords do not match".to_string()));
                    return;
                }
                is_submitting.set(true);
                error.set(None);

                let phone_value = phone.read().trim().to_string();
                let req = RegisterRequest {
                    email: email.read().trim().to_string(),
                    password: password.cloned(),
                    full_name: full_name.read().trim().to_string(),
                    phone: (!phone_value.is_empty()).then_some(phone_value),
                };
                match auth.client().register(&req).await {
                    Ok(user) => {
                        crate::log_info!("Registered {}", user.email);
                        toasts::success("Account created. You can sign in now.");
                        nav.replace(Route::Login {});
                    }
                    Err(e) => error.set(Some(e.user_message())),
                }
                is_submitting.set(false);
            },
            TextField {
                label: "Full name",
                value: full_name.cloned(),
                required: true,
                oninput: move |v| full_name.set(v),
            }
            TextField {
                label: "Email",
                r#type: "email",
                value: email.cloned(),
                required: true,
                oninput: move |v| email.set(v),
            }
            TextField {
                label: "Phone (optional)",
                r#type: "tel",
                value: phone.cloned(),
                oninput: move |v| phone.set(v),
            }
            TextField {
                label: "Password",
                r#type: "password",
                value: password.cloned(),
                required: true,
                oninput: move |v| password.set(v),
            }
            TextField {
                label: "Confirm password",
                r#type: "password",
                value: confirm.cloned(),
                required: true,
                oninput: move |v| confirm.set(v),
            }
            Button {
                r#type: "submit",
                variant: ButtonVariant::Primary,
                class: "w-full",
                loading: is_submitting(),
                "Create account"
            }
        }
        p { class: "mt-4 text-center text-sm text-slate-500",
            "Already have an account? "
            Link { to: Route::Login {}, class: "text-blue-600 hover:underline", "Sign in" }
        }
    }
}
