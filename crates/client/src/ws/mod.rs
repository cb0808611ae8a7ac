//! Real-time updates over WebSocket.
//!
//! ```text
//!  SocketProvider ── SocketManager ── notification socket ─┐
//!                        │ topics: DATA_UPDATE,             │ SocketEvent
//!                        │ NOTIFICATION, event names        │ (channel)
//!                        ▼                                  ▼
//!                 query invalidation + toasts  ◄──── UI-side drain task
//!
//!  use_space_socket(trip) ── space socket ── space_update ── invalidate trip spaces
//! ```
//!
//! Socket loops never touch signals; they forward [`SocketEvent`]s through a
//! channel that a task spawned in the owning component drains. Components
//! read query results, not socket events.

mod connection;
mod hooks;
mod manager;
mod space_socket;

pub use connection::{
    open, redact_token, ConnectionState, ReconnectPolicy, SocketConnection, SocketEvent,
};
pub use hooks::{use_connection_state, use_notification_socket};
pub use manager::{SocketManager, SocketProvider, SocketState, Subscription};
pub use space_socket::{space_frame_scope, use_space_socket};
