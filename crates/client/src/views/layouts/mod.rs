mod admin_layout;
mod app_layout;
mod auth_layout;

pub use admin_layout::AdminLayout;
pub use app_layout::AppLayout;
pub use auth_layout::AuthLayout;
