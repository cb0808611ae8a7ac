//! Page components, one per route.

pub mod admin;
pub mod auth;
pub mod create_reservation;
pub mod home;
pub mod layouts;
pub mod my_reservations;
pub mod not_found;
pub mod trip_detail;
pub mod trips;
pub mod verification;

pub use admin::{
    AdminCreateTrip, AdminDashboard, AdminEditTrip, AdminReservations, AdminTripSpaces, AdminTrips,
    AdminVerifications,
};
pub use auth::{ForgotPassword, Login, Register};
pub use create_reservation::CreateReservation;
pub use home::Home;
pub use layouts::{AdminLayout, AppLayout, AuthLayout};
pub use my_reservations::MyReservations;
pub use not_found::NotFound;
pub use trip_detail::TripDetail;
pub use trips::Trips;
pub use verification::Verification;
