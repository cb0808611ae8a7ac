//! Reusable components.

pub mod file_picker;
pub mod notification_bell;
pub mod reservation_detail;
pub mod space_map;
pub mod toast_host;
pub mod ui;

pub use file_picker::{read_upload, FilePicker};
pub use notification_bell::NotificationBellMenu;
pub use reservation_detail::ReservationDetailModal;
pub use space_map::{SpaceLegend, SpaceMap};
pub use toast_host::ToastHost;
