//! ID verification for client accounts.

use dioxus::prelude::*;
use keikichi_shared::auth::VerificationState;
use keikichi_shared::QueryScope;

use crate::api_client::Upload;
use crate::auth_session::AuthContext;
use crate::components::ui::{Button, ButtonVariant, Card, ErrorBox};
use crate::components::FilePicker;
use crate::routes::Route;
use crate::stores::{invalidate, toasts};

#[component]
pub fn Verification() -> Element {
    let auth = use_context::<AuthContext>();
    let state = auth
        .user()
        .map(|u| VerificationState::of(&u))
        .unwrap_or(VerificationState::Unverified);

    match state {
        VerificationState::Verified => rsx! {
            StatusPanel {
                title: "You are verified",
                message: "Your identity has been confirmed. You can book without restrictions.",
            }
        },
        VerificationState::PendingReview => rsx! {
            StatusPanel {
                title: "Verification in progress",
                message: "We are reviewing your documents and will notify you once your account is active. This usually takes less than 24 hours.",
            }
        },
        VerificationState::Unverified => rsx! {
            IneUploadForm {}
        },
    }
}

#[component]
fn StatusPanel(title: String, message: String) -> Element {
    let nav = use_navigator();
    rsx! {
        div { class: "mx-auto max-w-2xl py-12 text-center",
            h1 { class: "mb-4 text-2xl font-bold", "{title}" }
            p { class: "mb-8 text-slate-600 dark:text-slate-400", "{message}" }
            Button {
                variant: ButtonVariant::Primary,
                onclick: move |_| {
                    nav.push(Route::Trips {});
                },
                "Back to trips"
            }
        }
    }
}

#[component]
fn IneUploadForm() -> Element {
    let auth = use_context::<AuthContext>();
    let mut front = use_signal(|| None::<Upload>);
    let mut back = use_signal(|| None::<Upload>);
    let mut selfie = use_signal(|| None::<Upload>);
    let mut error = use_signal(|| None::<String>);
    let mut sending = use_signal(|| false);

    let picked = |slot: Signal<Option<Upload>>| slot.read().as_ref().map(|u| u.file_name.clone());

    let submit = move |_| async move {
        let (Some(f), Some(b), Some(s)) = (front.cloned(), back.cloned(), selfie.cloned()) else {
            error.set(Some("Attach the front, the back and a selfie".to_string()));
            return;
        };
        error.set(None);
        sending.set(true);
        match auth.client().upload_ine(&f, &b, &s).await {
            Ok(res) => {
                crate::log_info!("ID documents submitted");
                toasts::success(res.message);
                invalidate(QueryScope::CurrentUser);
            }
            Err(e) => error.set(Some(e.user_message())),
        }
        sending.set(false);
    };

    rsx! {
        div { class: "mx-auto max-w-2xl space-y-4",
            h1 { class: "text-2xl font-bold", "Verify your identity" }
            p { class: "text-sm text-slate-500",
                "Upload both sides of your INE and a selfie holding it. An administrator reviews them before your first booking."
            }
            if let Some(message) = error.cloned() {
                ErrorBox { message }
            }
            Card {
                div { class: "space-y-4",
                    FilePicker {
                        label: "INE front",
                        accept: ".jpg,.jpeg,.png",
                        picked: picked(front),
                        onpick: move |file| front.set(Some(file)),
                    }
                    FilePicker {
                        label: "INE back",
                        accept: ".jpg,.jpeg,.png",
                        picked: picked(back),
                        onpick: move |file| back.set(Some(file)),
                    }
                    FilePicker {
                        label: "Selfie with your INE",
                        accept: ".jpg,.jpeg,.png",
                        picked: picked(selfie),
                        onpick: move |file| selfie.set(Some(file)),
                    }
                }
            }
            div { class: "flex justify-end",
                Button {
                    variant: ButtonVariant::Primary,
                    loading: sending(),
                    onclick: submit,
                    "Submit for review"
                }
            }
        }
    }
}
