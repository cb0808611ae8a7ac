use dioxus::prelude::*;

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, ErrorBox, TextField};
use crate::routes::Route;

#[component]
pub fn Login() -> Element {
    let auth = use_context::<AuthContext>();
    let nav = use_navigator();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut is_submitting = use_signal(|| false);

    rsx! {
        h2 { class: "mb-4 text-xl font-semibold", "Sign in" }
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
                is_submitting.set(true);
                error.set(None);

                let email_value = email.read().trim().to_string();
                let password_value = password.cloned();
                match auth.login(&email_value, &password_value).await {
                    Ok(user) => {
                        let target = if user.role.is_staff() {
                            Route::AdminDashboard {}
                        } else {
                            Route::Trips {}
                        };
                        nav.replace(target);
                    }
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
            TextField {
                label: "Password",
                r#type: "password",
                value: password.cloned(),
                required: true,
                oninput: move |v| password.set(v),
            }
            Button {
                r#type: "submit",
                variant: ButtonVariant::Primary,
                class: "w-full",
                loading: is_submitting(),
                "Sign in"
            }
        }
        div { class: "mt-4 flex justify-between text-sm",
            Link { to: Route::ForgotPassword {}, class: "text-blue-600 hover:underline", "Forgot your password?" }
            Link { to: Route::Register {}, class: "text-blue-600 hover:underline", "Create an account" }
        }
    }
}
