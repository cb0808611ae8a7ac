//! WebSocket-related hooks for Dioxus components.

use dioxus::prelude::*;

use super::connection::ConnectionState;
use super::manager::{SocketManager, SocketState};

/// Hold the notification socket open while the calling component is mounted.
pub fn use_notification_socket() {
    let manager = use_hook(|| {
        let manager = consume_context::<SocketManager>();
        manager.connect();
        manager
    });
    use_drop(move || manager.disconnect());
}

/// Current state of the notification socket.
pub fn use_connection_state() -> ConnectionState {
    use_context::<SocketState>().0.read().clone()
}
