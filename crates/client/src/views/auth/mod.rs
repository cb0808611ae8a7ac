mod forgot_password;
mod login;
mod register;

pub use forgot_password::ForgotPassword;
pub use login::Login;
pub use register::Register;
