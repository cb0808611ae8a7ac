use dioxus::prelude::*;
use keikichi_shared::{QueryScope, User};

use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, Card, ErrorBox, Loading, Modal, TextField};
use crate::hooks::use_query;
use crate::stores::{invalidate_all, toasts};

#[derive(Clone, PartialEq)]
enum Decision {
    Approve(User),
    Reject(User),
}

#[component]
pub fn AdminVerifications() -> Element {
    let auth = use_context::<AuthContext>();
    let mut deciding = use_signal(|| None::<Decision>);

    let pending = use_query(
        || QueryScope::Verifications,
        move || async move { auth.client().pending_verifications().await },
    );

    rsx! {
        h1 { class: "text-2xl font-bold", "Pending verifications" }
        match pending.read().as_ref() {
            Some(Ok(users)) if users.is_empty() => rsx! {
                p { class: "py-12 text-center text-slate-500", "Nobody is waiting for verification." }
            },
            Some(Ok(users)) => rsx! {
                div { class: "grid gap-4 md:grid-cols-2",
                    for user in users.iter().cloned() {
                        Card { key: "{user.id}",
                            p { class: "font-semibold", "{user.full_name}" }
                            p { class: "text-sm text-slate-500", "{user.email}" }
                            if let Some(phone) = user.phone.clone() {
                                p { class: "text-sm text-slate-500", "{phone}" }
                            }
                            div { class: "mt-3 flex gap-2",
                                Button {
                                    variant: ButtonVariant::Primary,
                                    onclick: {
                                        let user = user.clone();
                                        move |_| deciding.set(Some(Decision::Approve(user.clone())))
                                    },
                                    "Approve"
                                }
                                Button {
                                    variant: ButtonVariant::Danger,
                                    onclick: {
                                        let user = user.clone();
                                        move |_| deciding.set(Some(Decision::Reject(user.clone())))
                                    },
                                    "Reject"
                                }
                            }
                        }
                    }
                }
            },
            Some(Err(e)) => rsx! {
                ErrorBox { message: e.user_message() }
            },
            None => rsx! {
                Loading {}
            },
        }

        if let Some(decision) = deciding() {
            DecisionModal { decision, onclose: move |_| deciding.set(None) }
        }
    }
}

#[component]
fn DecisionModal(decision: Decision, onclose: EventHandler<()>) -> Element {
    let auth = use_context::<AuthContext>();
    let mut text = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let (title, label, approve, user) = match &decision {
        Decision::Approve(u) => ("Approve account", "Notes (optional)", true, u.clone()),
        Decision::Reject(u) => ("Reject account", "Reason", false, u.clone()),
    };

    let variant = if approve { ButtonVariant::Primary } else { ButtonVariant::Danger };

    let confirm = move |_| {
        let user = user.clone();
        async move {
            let value = text.read().trim().to_string();
            if !approve && value.is_empty() {
                error.set(Some("A reason is required".to_string()));
                return;
            }
            saving.set(true);
            let client = auth.client();
            let result = if approve {
                client.approve_verification(&user.id, &value).await
            } else {
                client.reject_verification(&user.id, &value).await
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    toasts::success(if approve { "Account approved" } else { "Account rejected" });
                    invalidate_all([QueryScope::Verifications, QueryScope::DashboardStats]);
                    onclose.call(());
                }
                Err(e) => error.set(Some(e.user_message())),
            }
        }
    };

    rsx! {
        Modal { title: title.to_string(), onclose,
            p { class: "mb-3 text-sm", "{decision_subject(&decision)}" }
            if let Some(e) = error.cloned() {
                div { class: "mb-3",
                    ErrorBox { message: e }
                }
            }
            TextField {
                label,
                value: text.cloned(),
                oninput: move |v| text.set(v),
            }
            div { class: "mt-4 flex justify-end gap-2",
                Button { variant: ButtonVariant::Ghost, onclick: move |_| onclose.call(()), "Cancel" }
                Button {
                    variant,
                    loading: saving(),
                    onclick: confirm,
                    if approve { "Approve" } else { "Reject" }
                }
            }
        }
    }
}

fn decision_subject(decision: &Decision) -> String {
    match decision {
        Decision::Approve(u) | Decision::Reject(u) => format!("{} <{}>", u.full_name, u.email),
    }
}
