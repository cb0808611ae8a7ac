//! The shared notification socket: topic registry plus a reference-counted
//! connection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use dioxus::prelude::*;
use futures_channel::mpsc::unbounded;
use futures_util::StreamExt;
use keikichi_shared::{
    invalidations_for, notification_socket_url, Invalidation, QueryScope, ServerMessage,
    ToastKind, CLOSE_POLICY_VIOLATION, TOPIC_DATA_UPDATE, TOPIC_NOTIFICATION,
};
use uuid::Uuid;

use super::connection::{self, ConnectionState, ReconnectPolicy, SocketConnection, SocketEvent};
use crate::auth_session::AuthContext;
use crate::config::ClientConfig;
use crate::stores::{queries, toasts};

type Handler = Rc<dyn Fn(&ServerMessage)>;
type Opener = Rc<dyn Fn(&str) -> SocketConnection>;

/// Handle returned by [`SocketManager::subscribe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    topic: String,
    id: Uuid,
}

impl Subscription {
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

struct Inner {
    subscribers: HashMap<String, Vec<(Uuid, Handler)>>,
    refs: usize,
    target: Option<String>,
    connection: Option<SocketConnection>,
    opener: Opener,
}

impl Inner {
    fn open(&mut self) {
        if let Some(url) = self.target.as_deref() {
            crate::log_info!("Opening notification socket {}", connection::redact_token(url));
            self.connection = Some((self.opener)(url));
        }
    }
}

/// Shared notification WebSocket, provided through context.
///
/// `connect` and `disconnect` are reference counted: the socket opens on the
/// first `connect` and closes when the last holder disconnects.
#[derive(Clone)]
pub struct SocketManager {
    inner: Rc<RefCell<Inner>>,
}

impl PartialEq for SocketManager {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl SocketManager {
    /// `opener` starts a connection loop for a socket URL.
    pub fn new(opener: impl Fn(&str) -> SocketConnection + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                subscribers: HashMap::new(),
                refs: 0,
                target: None,
                connection: None,
                opener: Rc::new(opener),
            })),
        }
    }

    pub fn subscribe(
        &self,
        topic: &str,
        handler: impl Fn(&ServerMessage) + 'static,
    ) -> Subscription {
        let id = Uuid::new_v4();
        self.inner
            .borrow_mut()
            .subscribers
            .entry(topic.to_string())
            .or_default()
            .push((id, Rc::new(handler)));
        Subscription {
            topic: topic.to_string(),
            id,
        }
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        let mut inner = self.inner.borrow_mut();
        let Some(handlers) = inner.subscribers.get_mut(&subscription.topic) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(id, _)| *id != subscription.id);
        let removed = handlers.len() != before;
        if handlers.is_empty() {
            inner.subscribers.remove(&subscription.topic);
        }
        removed
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.inner
            .borrow()
            .subscribers
            .get(topic)
            .map_or(0, Vec::len)
    }

    /// Deliver `message` to every subscriber of each of its topics. Returns
    /// the number of handlers called.
    pub fn dispatch(&self, message: &ServerMessage) -> usize {
        let handlers: Vec<Handler> = {
            let inner = self.inner.borrow();
            message
                .topics()
                .into_iter()
                .filter_map(|topic| inner.subscribers.get(topic))
                .flat_map(|hs| hs.iter().map(|(_, h)| h.clone()))
                .collect()
        };
        for handler in &handlers {
            handler(message);
        }
        handlers.len()
    }

    /// Parse a raw frame and dispatch it. Malformed frames are logged and
    /// dropped.
    pub fn handle_text(&self, text: &str) -> usize {
        match ServerMessage::parse(text) {
            Ok(message) => {
                let delivered = self.dispatch(&message);
                crate::log_debug!("Socket message delivered to {} subscriber(s)", delivered);
                delivered
            }
            Err(e) => {
                crate::log_warn!("Dropping unparseable socket message: {}", e);
                0
            }
        }
    }

    /// Point the manager at a socket URL, or at nothing once the session is
    /// gone. A changed target reopens the connection if anyone holds it.
    pub fn set_target(&self, target: Option<String>) {
        let mut inner = self.inner.borrow_mut();
        if inner.target == target {
            return;
        }
        inner.target = target;
        inner.connection = None;
        if inner.refs > 0 {
            inner.open();
        }
    }

    pub fn connect(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.refs += 1;
        if inner.refs == 1 && inner.connection.is_none() {
            inner.open();
        }
    }

    pub fn disconnect(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.refs = inner.refs.saturating_sub(1);
        if inner.refs == 0 && inner.connection.take().is_some() {
            crate::log_info!("Closing notification socket");
        }
    }

    pub fn ref_count(&self) -> usize {
        self.inner.borrow().refs
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().connection.is_some()
    }
}

/// Connection state of the notification socket, provided through context.
#[derive(Clone, Copy)]
pub struct SocketState(pub Signal<ConnectionState>);

/// Invalidations and toast a server push calls for.
pub fn server_message_effects(message: &ServerMessage) -> Invalidation {
    match message {
        ServerMessage::DataUpdate { event, data } => invalidations_for(event, data),
        ServerMessage::Notification { payload } => Invalidation {
            scopes: vec![QueryScope::Notifications],
            toast: Some((
                ToastKind::from(payload.kind),
                format!("{}: {}", payload.title, payload.message),
            )),
        },
        ServerMessage::Unknown => Invalidation::default(),
    }
}

fn apply_server_message(message: &ServerMessage) {
    let effects = server_message_effects(message);
    if effects.is_empty() {
        crate::log_debug!("Ignoring socket message {:?}", message);
        return;
    }
    queries::invalidate_all(effects.scopes);
    if let Some((kind, text)) = effects.toast {
        toasts::show(kind, text);
    }
}

/// Owns the [`SocketManager`] for the app and drives it from the session.
#[component]
pub fn SocketProvider(children: Element) -> Element {
    let auth = use_context::<AuthContext>();
    let config = use_context::<ClientConfig>();
    let state = use_context_provider(|| SocketState(Signal::new(ConnectionState::Disconnected)));
    let reconnect_delay = config.reconnect_delay;

    let manager = use_context_provider(move || {
        let (tx, mut rx) = unbounded::<SocketEvent>();
        let policy = ReconnectPolicy::new(reconnect_delay).stop_on(CLOSE_POLICY_VIOLATION);
        let manager = SocketManager::new(move |url| {
            connection::open(url.to_string(), policy.clone(), tx.clone())
        });
        manager.subscribe(TOPIC_DATA_UPDATE, apply_server_message);
        manager.subscribe(TOPIC_NOTIFICATION, apply_server_message);

        let drain = manager.clone();
        let mut state = state.0;
        spawn(async move {
            while let Some(event) = rx.next().await {
                match event {
                    SocketEvent::Message(text) => {
                        drain.handle_text(&text);
                    }
                    SocketEvent::State(next) => state.set(next),
                    SocketEvent::Closed {
                        code: Some(CLOSE_POLICY_VIOLATION),
                    } => {
                        crate::log_warn!("Notification socket rejected by server");
                    }
                    SocketEvent::Closed { .. } => {}
                }
            }
        });
        manager
    });

    let ws_base = config.ws_base.clone();
    let effect_manager = manager.clone();
    use_effect(move || {
        let session = auth.session.read();
        let target = match (session.user.as_ref(), session.access_token.as_deref()) {
            (Some(user), Some(token)) => Some(notification_socket_url(&ws_base, &user.id, token)),
            _ => None,
        };
        effect_manager.set_target(target);
    });

    use_drop(move || {
        manager.set_target(None);
    });

    children
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::queries::QueryGenerations;
    use futures_channel::oneshot;
    use serde_json::json;
    use std::cell::Cell;

    fn manager_with_counter() -> (SocketManager, Rc<Cell<usize>>) {
        let opened = Rc::new(Cell::new(0));
        let counter = opened.clone();
        let manager = SocketManager::new(move |_url| {
            counter.set(counter.get() + 1);
            let (tx, _rx) = oneshot::channel();
            SocketConnection::new(tx)
        });
        (manager, opened)
    }

    fn data_update(event: &str) -> ServerMessage {
        ServerMessage::DataUpdate {
            event: event.to_string(),
            data: json!({}),
        }
    }

    #[test]
    fn delivers_to_every_subscriber_of_topic() {
        let (manager, _) = manager_with_counter();
        let hits = Rc::new(Cell::new(0));
        let (a, b) = (hits.clone(), hits.clone());
        manager.subscribe(TOPIC_DATA_UPDATE, move |_| a.set(a.get() + 1));
        manager.subscribe(TOPIC_DATA_UPDATE, move |_| b.set(b.get() + 1));
        manager.subscribe(TOPIC_NOTIFICATION, |_| panic!("wrong topic"));

        assert_eq!(manager.dispatch(&data_update("TRIP_CREATED")), 2);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn event_names_are_topics_too() {
        let (manager, _) = manager_with_counter();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        manager.subscribe("SPACE_RELEASED", move |_| h.set(h.get() + 1));

        manager.dispatch(&data_update("TRIP_CREATED"));
        manager.dispatch(&data_update("SPACE_RELEASED"));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let (manager, _) = manager_with_counter();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = manager.subscribe(TOPIC_DATA_UPDATE, move |_| h.set(h.get() + 1));

        manager.dispatch(&data_update("TRIP_UPDATED"));
        assert!(manager.unsubscribe(&sub));
        assert!(!manager.unsubscribe(&sub));
        manager.dispatch(&data_update("TRIP_UPDATED"));

        assert_eq!(hits.get(), 1);
        assert_eq!(manager.subscriber_count(TOPIC_DATA_UPDATE), 0);
    }

    #[test]
    fn handlers_may_unsubscribe_themselves() {
        let (manager, _) = manager_with_counter();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::default();
        let (m, s) = (manager.clone(), slot.clone());
        let sub = manager.subscribe(TOPIC_NOTIFICATION, move |_| {
            if let Some(sub) = s.borrow_mut().take() {
                m.unsubscribe(&sub);
            }
        });
        *slot.borrow_mut() = Some(sub);

        let text = r#"{"type":"NOTIFICATION","payload":{"title":"Pago","message":"ok","type":"success"}}"#;
        assert_eq!(manager.handle_text(text), 1);
        assert_eq!(manager.handle_text(text), 0);
    }

    #[test]
    fn malformed_frames_are_dropped() {
        let (manager, _) = manager_with_counter();
        manager.subscribe(TOPIC_DATA_UPDATE, |_| panic!("should not be called"));
        assert_eq!(manager.handle_text("not json"), 0);
    }

    #[test]
    fn opens_and_closes_by_reference_count() {
        let (manager, opened) = manager_with_counter();
        manager.set_target(Some("ws://h/notifications/ws/u1?token=t".into()));
        assert!(!manager.is_open());

        manager.connect();
        manager.connect();
        assert_eq!(opened.get(), 1);
        assert!(manager.is_open());

        manager.disconnect();
        assert!(manager.is_open());
        manager.disconnect();
        assert!(!manager.is_open());
        assert_eq!(manager.ref_count(), 0);

        manager.disconnect();
        assert_eq!(manager.ref_count(), 0);
    }

    #[test]
    fn no_session_means_no_socket() {
        let (manager, opened) = manager_with_counter();
        manager.connect();
        assert!(!manager.is_open());

        manager.set_target(Some("ws://h/notifications/ws/u1?token=a".into()));
        assert!(manager.is_open());

        manager.set_target(Some("ws://h/notifications/ws/u1?token=b".into()));
        assert_eq!(opened.get(), 2);

        manager.set_target(None);
        assert!(!manager.is_open());
    }

    #[test]
    fn notification_push_refreshes_bell_and_toasts() {
        let text = r#"{"type":"NOTIFICATION","payload":{"title":"Pago","message":"Aprobado","type":"warning"}}"#;
        let message = ServerMessage::parse(text).unwrap();

        let effects = server_message_effects(&message);

        assert_eq!(effects.scopes, vec![QueryScope::Notifications]);
        assert_eq!(
            effects.toast,
            Some((ToastKind::Warning, "Pago: Aprobado".to_string()))
        );
    }

    #[test]
    fn data_update_effects_bump_query_generations() {
        let mut queries = QueryGenerations::default();
        queries.invalidate(&QueryScope::Reservation("r1".into()));
        let detail = queries.generation(&QueryScope::Reservation("r1".into()));

        let effects = server_message_effects(&data_update("RESERVATION_UPDATED"));
        for scope in &effects.scopes {
            queries.invalidate(scope);
        }

        assert!(queries.generation(&QueryScope::Reservation("r1".into())) > detail);
        assert_ne!(queries.generation(&QueryScope::AdminReservations), 0);
        assert_eq!(queries.generation(&QueryScope::Trips), 0);
        assert_eq!(effects.toast.map(|(kind, _)| kind), Some(ToastKind::Info));
    }

    #[test]
    fn unknown_pushes_have_no_effect() {
        assert!(server_message_effects(&ServerMessage::Unknown).is_empty());
        assert!(server_message_effects(&data_update("SOMETHING_NEW")).is_empty());
    }
}
