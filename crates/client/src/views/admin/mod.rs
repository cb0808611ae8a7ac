//! Staff pages.

mod dashboard;
mod reservations;
mod trip_form;
mod trip_spaces;
mod trips;
mod verifications;

pub use dashboard::AdminDashboard;
pub use reservations::AdminReservations;
pub use trip_form::{AdminCreateTrip, AdminEditTrip};
pub use trip_spaces::AdminTripSpaces;
pub use trips::AdminTrips;
pub use verifications::AdminVerifications;
