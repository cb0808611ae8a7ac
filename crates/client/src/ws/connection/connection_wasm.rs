//! WASM/Web-specific WebSocket implementation using web_sys::WebSocket.

use std::future::Future;

use futures_channel::mpsc::{unbounded, UnboundedSender};
use futures_channel::oneshot;
use futures_util::future::{select, Either};
use futures_util::StreamExt;
use wasm_bindgen::prelude::*;
use web_sys::{js_sys, CloseEvent, ErrorEvent, Event, MessageEvent, WebSocket};

use super::{ConnectionState, Outcome, SocketEvent};

pub(super) fn spawn(fut: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(fut);
}

/// Browser socket callbacks, funnelled into one stream.
enum Frame {
    Open,
    Text(String),
    Close(u16),
    Error,
}

/// Keeps the JS callbacks alive for the lifetime of one socket.
struct Handlers {
    ws: WebSocket,
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
    _error: Closure<dyn FnMut(ErrorEvent)>,
}

impl Drop for Handlers {
    fn drop(&mut self) {
        self.ws.set_onopen(None);
        self.ws.set_onmessage(None);
        self.ws.set_onclose(None);
        self.ws.set_onerror(None);
    }
}

fn attach(ws: WebSocket, tx: UnboundedSender<Frame>) -> Handlers {
    let open_tx = tx.clone();
    let open = Closure::wrap(Box::new(move |_: Event| {
        let _ = open_tx.unbounded_send(Frame::Open);
    }) as Box<dyn FnMut(Event)>);
    ws.set_onopen(Some(open.as_ref().unchecked_ref()));

    let message_tx = tx.clone();
    let message = Closure::wrap(Box::new(move |e: MessageEvent| {
        if let Ok(text) = e.data().dyn_into::<js_sys::JsString>() {
            let _ = message_tx.unbounded_send(Frame::Text(text.into()));
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    ws.set_onmessage(Some(message.as_ref().unchecked_ref()));

    let close_tx = tx.clone();
    let close = Closure::wrap(Box::new(move |e: CloseEvent| {
        let _ = close_tx.unbounded_send(Frame::Close(e.code()));
    }) as Box<dyn FnMut(CloseEvent)>);
    ws.set_onclose(Some(close.as_ref().unchecked_ref()));

    let error = Closure::wrap(Box::new(move |_: ErrorEvent| {
        let _ = tx.unbounded_send(Frame::Error);
    }) as Box<dyn FnMut(ErrorEvent)>);
    ws.set_onerror(Some(error.as_ref().unchecked_ref()));

    Handlers {
        ws,
        _open: open,
        _message: message,
        _close: close,
        _error: error,
    }
}

/// Connect once and pump frames until the socket closes or shutdown fires.
pub(super) async fn run_once(
    url: &str,
    events: &UnboundedSender<SocketEvent>,
    shutdown: &mut oneshot::Receiver<()>,
) -> Outcome {
    let ws = match WebSocket::new(url) {
        Ok(ws) => ws,
        Err(e) => {
            crate::log_error!("Failed to create WebSocket: {:?}", e);
            return Outcome::Closed {
                code: None,
                was_open: false,
            };
        }
    };

    let (tx, mut rx) = unbounded();
    let handlers = attach(ws.clone(), tx);
    let mut was_open = false;

    loop {
        let frame = match select(rx.next(), &mut *shutdown).await {
            Either::Left((frame, _)) => frame,
            Either::Right(_) => {
                drop(handlers);
                let _ = ws.close();
                return Outcome::Shutdown;
            }
        };

        match frame {
            Some(Frame::Open) => {
                was_open = true;
                crate::log_info!("WebSocket connected to {}", super::redact_token(url));
                if events
                    .unbounded_send(SocketEvent::State(ConnectionState::Connected))
                    .is_err()
                {
                    drop(handlers);
                    let _ = ws.close();
                    return Outcome::Shutdown;
                }
            }
            Some(Frame::Text(text)) => {
                if events.unbounded_send(SocketEvent::Message(text)).is_err() {
                    drop(handlers);
                    let _ = ws.close();
                    return Outcome::Shutdown;
                }
            }
            Some(Frame::Error) => {
                // a close event always follows
                crate::log_warn!("WebSocket error on {}", super::redact_token(url));
            }
            Some(Frame::Close(code)) => {
                crate::log_info!("WebSocket closed with code {}", code);
                return Outcome::Closed {
                    code: Some(code),
                    was_open,
                };
            }
            None => {
                return Outcome::Closed {
                    code: None,
                    was_open,
                }
            }
        }
    }
}
