//! WebSocket connection loop with fixed-delay reconnect.
//!
//! The loop never touches UI state. Everything it observes is forwarded as a
//! [`SocketEvent`] into an unbounded channel that a UI-side task drains.
//! Platform-specific socket handling lives in `connection_native` and
//! `connection_wasm`.

use std::time::Duration;

use futures_channel::mpsc::UnboundedSender;
use futures_channel::oneshot;
use futures_util::future::{select, Either};

/// Connection state for a WebSocket
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
    /// The server closed with a code that forbids reconnecting.
    Stopped { code: Option<u16> },
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(
            self,
            ConnectionState::Connecting | ConnectionState::Reconnecting { .. }
        )
    }
}

/// Reconnect behaviour: a fixed delay, no ceiling, and a set of close codes
/// after which the loop gives up.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub stop_codes: Vec<u16>,
}

impl ReconnectPolicy {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            stop_codes: Vec::new(),
        }
    }

    pub fn stop_on(mut self, code: u16) -> Self {
        self.stop_codes.push(code);
        self
    }

    /// Delay before the next attempt, or `None` to stop.
    pub fn next_delay(&self, close_code: Option<u16>) -> Option<Duration> {
        match close_code {
            Some(code) if self.stop_codes.contains(&code) => None,
            _ => Some(self.delay),
        }
    }
}

/// What the connection loop reports to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    State(ConnectionState),
    Message(String),
    Closed { code: Option<u16> },
}

/// Result of a single connection attempt.
#[derive(Debug)]
enum Outcome {
    Closed { code: Option<u16>, was_open: bool },
    Shutdown,
}

/// A running connection loop. Dropping it closes the socket and stops
/// reconnecting.
#[derive(Debug)]
pub struct SocketConnection {
    shutdown: Option<oneshot::Sender<()>>,
}

impl SocketConnection {
    pub(crate) fn new(shutdown: oneshot::Sender<()>) -> Self {
        Self {
            shutdown: Some(shutdown),
        }
    }

    pub fn close(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for SocketConnection {
    fn drop(&mut self) {
        self.close();
    }
}

/// Start a connection loop for `url` in the background.
pub fn open(
    url: String,
    policy: ReconnectPolicy,
    events: UnboundedSender<SocketEvent>,
) -> SocketConnection {
    let (tx, rx) = oneshot::channel();
    platform::spawn(run_socket(url, policy, events, rx));
    SocketConnection::new(tx)
}

async fn run_socket(
    url: String,
    policy: ReconnectPolicy,
    events: UnboundedSender<SocketEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let endpoint = redact_token(&url);
    let mut attempt = 0u32;

    loop {
        let state = if attempt == 0 {
            ConnectionState::Connecting
        } else {
            ConnectionState::Reconnecting { attempt }
        };
        if events.unbounded_send(SocketEvent::State(state)).is_err() {
            return;
        }

        let code = match platform::run_once(&url, &events, &mut shutdown).await {
            Outcome::Shutdown => break,
            Outcome::Closed { code, was_open } => {
                if was_open {
                    attempt = 0;
                }
                let _ = events.unbounded_send(SocketEvent::Closed { code });
                code
            }
        };

        let Some(delay) = policy.next_delay(code) else {
            crate::log_info!("Socket {} closed with {:?}, not reconnecting", endpoint, code);
            let _ = events.unbounded_send(SocketEvent::State(ConnectionState::Stopped { code }));
            return;
        };

        crate::log_info!(
            "Reconnecting to {} in {}ms (attempt {})",
            endpoint,
            delay.as_millis(),
            attempt + 1
        );
        let sleep = Box::pin(crate::timer::sleep(delay));
        if let Either::Right(_) = select(sleep, &mut shutdown).await {
            break;
        }
        attempt += 1;
    }

    let _ = events.unbounded_send(SocketEvent::State(ConnectionState::Disconnected));
}

/// The URL with its `token` query value masked, for logs.
pub fn redact_token(url: &str) -> String {
    match url.split_once("token=") {
        Some((head, tail)) => {
            let rest = tail.find('&').map(|i| &tail[i..]).unwrap_or("");
            format!("{head}token=***{rest}")
        }
        None => url.to_string(),
    }
}

#[cfg(target_arch = "wasm32")]
mod connection_wasm;
#[cfg(target_arch = "wasm32")]
use connection_wasm as platform;

#[cfg(not(target_arch = "wasm32"))]
mod connection_native;
#[cfg(not(target_arch = "wasm32"))]
use connection_native as platform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_delay_until_stop_code() {
        let policy = ReconnectPolicy::new(Duration::from_secs(3)).stop_on(4001);
        assert_eq!(policy.next_delay(None), Some(Duration::from_secs(3)));
        assert_eq!(policy.next_delay(Some(1006)), Some(Duration::from_secs(3)));
        assert_eq!(policy.next_delay(Some(4001)), None);
    }

    #[test]
    fn dropping_connection_signals_shutdown() {
        let (tx, mut rx) = oneshot::channel();
        let conn = SocketConnection::new(tx);
        assert_eq!(rx.try_recv(), Ok(None));
        drop(conn);
        assert_eq!(rx.try_recv(), Ok(Some(())));
    }

    #[test]
    fn tokens_are_masked_in_logs() {
        assert_eq!(
            redact_token("ws://h/api/v1/spaces/ws/trip/t1?token=abc.def"),
            "ws://h/api/v1/spaces/ws/trip/t1?token=***"
        );
        assert_eq!(redact_token("ws://h/x?token=a&b=1"), "ws://h/x?token=***&b=1");
        assert_eq!(redact_token("ws://h/x"), "ws://h/x");
    }
}
