//! Per-trip space socket. Every `space_update` re-fetches the trip's space
//! map; payloads are never applied as deltas.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::unbounded;
use futures_util::StreamExt;
use keikichi_shared::{parse_space_message, space_socket_url, QueryScope, CLOSE_INVALID_TOKEN};

use super::connection::{self, ConnectionState, ReconnectPolicy, SocketConnection, SocketEvent};
use crate::auth_session::AuthContext;
use crate::config::ClientConfig;
use crate::stores::queries;

/// Scope a space-socket frame invalidates, if any.
pub fn space_frame_scope(text: &str) -> Option<QueryScope> {
    match parse_space_message(text) {
        Ok(Some(update)) => {
            crate::log_debug!(
                "Space {} of trip {} is now {}",
                update.space_number,
                update.trip_id,
                update.status
            );
            Some(QueryScope::trip_spaces(update.trip_id))
        }
        Ok(None) => None,
        Err(e) => {
            crate::log_warn!("Dropping unparseable space message: {}", e);
            None
        }
    }
}

/// Keep a space socket open for `trip_id` while the calling component is
/// mounted. Reconnects every `reconnect_delay` until the server rejects the
/// token with 4001.
pub fn use_space_socket(trip_id: ReadSignal<String>) -> Signal<ConnectionState> {
    let auth = use_context::<AuthContext>();
    let config = use_context::<ClientConfig>();
    let mut state = use_signal(|| ConnectionState::Disconnected);
    let slot = use_hook(|| Rc::new(RefCell::new(None::<(String, SocketConnection)>)));

    let events = use_hook(|| {
        let (tx, mut rx) = unbounded::<SocketEvent>();
        spawn(async move {
            while let Some(event) = rx.next().await {
                match event {
                    SocketEvent::Message(text) => {
                        if let Some(scope) = space_frame_scope(&text) {
                            queries::invalidate(scope);
                        }
                    }
                    SocketEvent::State(next) => state.set(next),
                    SocketEvent::Closed { .. } => {}
                }
            }
        });
        tx
    });

    let policy = ReconnectPolicy::new(config.reconnect_delay).stop_on(CLOSE_INVALID_TOKEN);
    let ws_base = config.ws_base.clone();
    let effect_slot = slot.clone();
    use_effect(move || {
        let trip = trip_id.read().clone();
        let token = auth.session.read().access_token.clone();
        let url = token
            .filter(|_| !trip.is_empty())
            .map(|t| space_socket_url(&ws_base, &trip, &t));

        let mut current = effect_slot.borrow_mut();
        if current.as_ref().map(|(u, _)| u) == url.as_ref() {
            return;
        }
        *current = url.map(|u| {
            let conn = connection::open(u.clone(), policy.clone(), events.clone());
            (u, conn)
        });
    });

    use_drop(move || {
        slot.borrow_mut().take();
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn space_updates_invalidate_their_trip() {
        let frame = r#"{"event":"space_update","data":{"space_id":"s1","space_number":1,"status":"on_hold","trip_id":"t1"}}"#;
        assert_eq!(space_frame_scope(frame), Some(QueryScope::trip_spaces("t1")));
    }

    #[test]
    fn other_frames_invalidate_nothing() {
        assert_eq!(space_frame_scope(r#"{"event":"pong"}"#), None);
        assert_eq!(space_frame_scope("garbage"), None);
    }
}
