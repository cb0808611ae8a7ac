//! Keikichi client - Main entry point
//!
//! Supports both web (WASM) and desktop platforms.

#![allow(non_snake_case)]

use dioxus::prelude::*;
use keikichi_client::components::ToastHost;
use keikichi_client::stores::{theme, THEME};
use keikichi_client::ws::SocketProvider;
use keikichi_client::{logging, AuthProvider, ClientConfig, Route};

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    logging::init();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(ClientConfig::from_env);
    let dark = THEME.read().is_dark(theme::system_prefers_dark());

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Script { src: "https://cdn.tailwindcss.com" }
        document::Script { "tailwind.config = {{ darkMode: 'class' }}" }

        div { class: if dark { "dark" } else { "" },
            AuthProvider {
                SocketProvider {
                    Router::<Route> {}
                }
            }
            ToastHost {}
        }
    }
}
