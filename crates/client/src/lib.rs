//! Keikichi client - Dioxus web/desktop front-end for freight space reservations.
//!
//! This crate holds the API client, the real-time socket layer, the client
//! stores and every page of the application.

pub mod api_client;
pub mod auth_session;
pub mod config;
pub mod downloads;
pub mod format;
pub mod logging;
pub mod reservation_flow;
pub mod storage;
pub mod timer;

pub mod components;
pub mod hooks;
pub mod routes;
pub mod stores;
pub mod views;
pub mod ws;

pub use api_client::ApiClient;
pub use auth_session::{AuthContext, AuthProvider};
pub use config::ClientConfig;
pub use routes::Route;
