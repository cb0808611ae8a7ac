//! UI primitives (Button, Card, inputs, badges, modal, pager)

pub mod badge;
pub mod button;
pub mod card;
pub mod input;
pub mod modal;
pub mod pagination;

pub use badge::*;
pub use button::*;
pub use card::*;
pub use input::*;
pub use modal::*;
pub use pagination::*;
