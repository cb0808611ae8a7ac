//! Global stores for application state.

pub mod pending_hold;
pub mod queries;
pub mod theme;
pub mod toasts;

pub use pending_hold::{clear_pending_hold, pending_hold_for, set_pending_hold, PENDING_HOLD};
pub use queries::{invalidate, invalidate_all, QueryGenerations, QUERIES};
pub use theme::{set_theme, Theme, THEME};
pub use toasts::{Toast, ToastQueue, TOASTS};
