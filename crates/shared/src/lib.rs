//! Shared types and client-state logic for the Keikichi client.

pub mod auth;
pub mod catalog;
pub mod draft;
pub mod error;
pub mod hold;
pub mod models;
pub mod notifications;
pub mod protocol;
pub mod selection;
pub mod serde_ext;
pub mod wizard;

pub use error::*;
pub use models::*;
pub use protocol::*;
