//! Native/Desktop WebSocket implementation using tokio-tungstenite.

use std::future::Future;

use futures_channel::mpsc::UnboundedSender;
use futures_channel::oneshot;
use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use super::{ConnectionState, Outcome, SocketEvent};

pub(super) fn spawn(fut: impl Future<Output = ()> + Send + 'static) {
    tokio::spawn(fut);
}

/// Connect once and pump frames until the socket closes or shutdown fires.
pub(super) async fn run_once(
    url: &str,
    events: &UnboundedSender<SocketEvent>,
    shutdown: &mut oneshot::Receiver<()>,
) -> Outcome {
    let connect = tokio::select! {
        _ = &mut *shutdown => return Outcome::Shutdown,
        res = connect_async(url) => res,
    };
    let mut stream = match connect {
        Ok((stream, _response)) => stream,
        Err(e) => {
            crate::log_error!("WebSocket connect failed: {}", e);
            return Outcome::Closed {
                code: None,
                was_open: false,
            };
        }
    };

    crate::log_info!("WebSocket connected to {}", super::redact_token(url));
    if events
        .unbounded_send(SocketEvent::State(ConnectionState::Connected))
        .is_err()
    {
        let _ = stream.close(None).await;
        return Outcome::Shutdown;
    }

    loop {
        tokio::select! {
            _ = &mut *shutdown => {
                let _ = stream.close(None).await;
                return Outcome::Shutdown;
            }
            msg = stream.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    if events.unbounded_send(SocketEvent::Message(text.as_str().to_owned())).is_err() {
                        let _ = stream.close(None).await;
                        return Outcome::Shutdown;
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let code = frame.map(|f| u16::from(f.code));
                    crate::log_info!("WebSocket received close frame {:?}", code);
                    return Outcome::Closed { code, was_open: true };
                }
                Some(Ok(Message::Ping(_))) => {
                    // tungstenite answers pings itself
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    crate::log_error!("WebSocket read error: {}", e);
                    return Outcome::Closed { code: None, was_open: true };
                }
                None => return Outcome::Closed { code: None, was_open: true },
            }
        }
    }
}
