//! Transient toasts, auto-dismissed by the toast host.

use dioxus::prelude::*;
use keikichi_shared::{ApiError, ToastKind};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub kind: ToastKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.toasts.push(Toast {
            id,
            kind,
            text: text.into(),
        });
        id
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|t| t.id != id);
        self.toasts.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

pub static TOASTS: GlobalSignal<ToastQueue> = Signal::global(ToastQueue::default);

pub fn show(kind: ToastKind, text: impl Into<String>) {
    TOASTS.write().push(kind, text);
}

pub fn success(text: impl Into<String>) {
    show(ToastKind::Success, text);
}

pub fn info(text: impl Into<String>) {
    show(ToastKind::Info, text);
}

/// Surface an API failure with the backend's message when it has one.
pub fn error(err: &ApiError) {
    crate::log_warn!("Request failed: {}", err);
    show(ToastKind::Error, err.user_message());
}

pub fn dismiss(id: Uuid) {
    TOASTS.write().dismiss(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dismiss_removes_only_that_toast() {
        let mut queue = ToastQueue::default();
        let first = queue.push(ToastKind::Info, "Trips updated");
        let second = queue.push(ToastKind::Error, "Space already held");
        assert!(queue.dismiss(first));
        assert!(!queue.dismiss(first));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.iter().next().map(|t| t.id), Some(second));
    }
}
